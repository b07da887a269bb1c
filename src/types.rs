//! Well-known type descriptors
//!
//! Descriptors for the types the built-in converters target, built once per
//! process. Reference types declare their supertypes so compatible-fallback
//! lookups (`Number`, `CharSequence`, ...) resolve against them.

use once_cell::sync::Lazy;

use crate::descriptor::TypeDescriptor;

static OBJECT: Lazy<TypeDescriptor> = Lazy::new(|| TypeDescriptor::class("Object"));

static COMPARABLE: Lazy<TypeDescriptor> =
    Lazy::new(|| TypeDescriptor::builder("Comparable").supertype(object()).build());

static CHAR_SEQUENCE: Lazy<TypeDescriptor> =
    Lazy::new(|| TypeDescriptor::builder("CharSequence").supertype(object()).build());

static NUMBER: Lazy<TypeDescriptor> =
    Lazy::new(|| TypeDescriptor::builder("Number").supertype(object()).build());

static STRING: Lazy<TypeDescriptor> = Lazy::new(|| {
    TypeDescriptor::builder("String")
        .supertypes([char_sequence(), comparable()])
        .build()
});

static CHAR_ARRAY: Lazy<TypeDescriptor> =
    Lazy::new(|| TypeDescriptor::builder("char[]").supertype(object()).build());

static PATH: Lazy<TypeDescriptor> =
    Lazy::new(|| TypeDescriptor::builder("Path").supertype(comparable()).build());

static PATTERN: Lazy<TypeDescriptor> =
    Lazy::new(|| TypeDescriptor::builder("Pattern").supertype(object()).build());

static VERSION: Lazy<TypeDescriptor> =
    Lazy::new(|| TypeDescriptor::builder("Version").supertype(comparable()).build());

static DATE_TIME: Lazy<TypeDescriptor> =
    Lazy::new(|| TypeDescriptor::builder("DateTime").supertype(comparable()).build());

/// Reference form and primitive form of each boxed scalar
static PRIMITIVE_PAIRS: Lazy<Vec<(TypeDescriptor, TypeDescriptor)>> = Lazy::new(|| {
    let numeric = |name: &str| {
        TypeDescriptor::builder(name)
            .supertypes([number(), comparable()])
            .build()
    };
    vec![
        (
            TypeDescriptor::builder("Boolean").supertype(comparable()).build(),
            TypeDescriptor::primitive("bool"),
        ),
        (numeric("Byte"), TypeDescriptor::primitive("i8")),
        (
            TypeDescriptor::builder("Character").supertype(comparable()).build(),
            TypeDescriptor::primitive("char"),
        ),
        (numeric("Double"), TypeDescriptor::primitive("f64")),
        (numeric("Float"), TypeDescriptor::primitive("f32")),
        (numeric("Integer"), TypeDescriptor::primitive("i32")),
        (numeric("Long"), TypeDescriptor::primitive("i64")),
        (numeric("Short"), TypeDescriptor::primitive("i16")),
    ]
});

pub fn object() -> TypeDescriptor {
    OBJECT.clone()
}

pub fn comparable() -> TypeDescriptor {
    COMPARABLE.clone()
}

pub fn char_sequence() -> TypeDescriptor {
    CHAR_SEQUENCE.clone()
}

pub fn number() -> TypeDescriptor {
    NUMBER.clone()
}

pub fn string() -> TypeDescriptor {
    STRING.clone()
}

pub fn char_array() -> TypeDescriptor {
    CHAR_ARRAY.clone()
}

pub fn path() -> TypeDescriptor {
    PATH.clone()
}

pub fn pattern() -> TypeDescriptor {
    PATTERN.clone()
}

pub fn version() -> TypeDescriptor {
    VERSION.clone()
}

pub fn date_time() -> TypeDescriptor {
    DATE_TIME.clone()
}

fn pair(index: usize) -> &'static (TypeDescriptor, TypeDescriptor) {
    &PRIMITIVE_PAIRS[index]
}

pub fn boolean() -> TypeDescriptor {
    pair(0).0.clone()
}

pub fn bool_primitive() -> TypeDescriptor {
    pair(0).1.clone()
}

pub fn byte() -> TypeDescriptor {
    pair(1).0.clone()
}

pub fn byte_primitive() -> TypeDescriptor {
    pair(1).1.clone()
}

pub fn character() -> TypeDescriptor {
    pair(2).0.clone()
}

pub fn char_primitive() -> TypeDescriptor {
    pair(2).1.clone()
}

pub fn double() -> TypeDescriptor {
    pair(3).0.clone()
}

pub fn double_primitive() -> TypeDescriptor {
    pair(3).1.clone()
}

pub fn float() -> TypeDescriptor {
    pair(4).0.clone()
}

pub fn float_primitive() -> TypeDescriptor {
    pair(4).1.clone()
}

pub fn integer() -> TypeDescriptor {
    pair(5).0.clone()
}

pub fn int_primitive() -> TypeDescriptor {
    pair(5).1.clone()
}

pub fn long() -> TypeDescriptor {
    pair(6).0.clone()
}

pub fn long_primitive() -> TypeDescriptor {
    pair(6).1.clone()
}

pub fn short() -> TypeDescriptor {
    pair(7).0.clone()
}

pub fn short_primitive() -> TypeDescriptor {
    pair(7).1.clone()
}

/// `(reference, primitive)` pairs aliased at bootstrap
pub fn primitive_pairs() -> &'static [(TypeDescriptor, TypeDescriptor)] {
    &PRIMITIVE_PAIRS
}

/// Every well-known descriptor, supertypes first
pub fn well_known() -> Vec<TypeDescriptor> {
    let mut all = vec![object(), comparable(), char_sequence(), number(), string()];
    for (reference, primitive) in primitive_pairs() {
        all.push(reference.clone());
        all.push(primitive.clone());
    }
    all.extend([char_array(), path(), pattern(), version(), date_time()]);
    all
}

/// Look up a well-known descriptor by canonical name
pub fn by_name(name: &str) -> Option<TypeDescriptor> {
    well_known().into_iter().find(|t| t.name() == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptors_are_shared() {
        assert_eq!(integer(), integer());
        assert_eq!(by_name("Integer"), Some(integer()));
        assert_eq!(by_name("i32"), Some(int_primitive()));
        assert!(by_name("Integr").is_none());
    }

    #[test]
    fn test_hierarchy() {
        assert!(number().is_assignable_from(&integer()));
        assert!(char_sequence().is_assignable_from(&string()));
        assert!(object().is_assignable_from(&long()));
        assert!(!number().is_assignable_from(&string()));
        assert!(!number().is_assignable_from(&int_primitive()));
    }

    #[test]
    fn test_primitive_pairs() {
        assert_eq!(primitive_pairs().len(), 8);
        assert!(primitive_pairs().iter().all(|(r, p)| !r.is_primitive() && p.is_primitive()));
    }
}
