//! Type descriptors
//!
//! A [`TypeDescriptor`] names a conversion target. Descriptors are cheap to
//! clone and compare by canonical name, so they can key the registry directly.
//!
//! The shape of a type (class, primitive, enum, parameterized, wildcard) is
//! fixed when the descriptor is built, together with its direct supertypes.
//! Assignability is computed from that declared hierarchy alone.

use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Shape of a described type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    /// A class or interface
    Class,
    /// A primitive value type (`bool`, `i32`, ...)
    Primitive,
    /// An enum with its member names in declaration order
    Enum(Arc<[String]>),
    /// A generic type applied to arguments, e.g. `List<String>`
    Parameterized {
        raw: TypeDescriptor,
        args: Vec<TypeDescriptor>,
    },
    /// A wildcard argument; an empty bound list means any reference type
    Wildcard { upper_bounds: Vec<TypeDescriptor> },
}

#[derive(Debug)]
struct DescriptorInner {
    name: String,
    kind: TypeKind,
    supertypes: Vec<TypeDescriptor>,
}

/// Identifier for a conversion target type
#[derive(Clone)]
pub struct TypeDescriptor(Arc<DescriptorInner>);

impl TypeDescriptor {
    /// Describe a class with no declared supertypes
    pub fn class(name: impl Into<String>) -> Self {
        Self::builder(name).build()
    }

    /// Describe a primitive value type
    pub fn primitive(name: impl Into<String>) -> Self {
        Self::from_parts(name.into(), TypeKind::Primitive, Vec::new())
    }

    /// Describe an enum by its member names
    pub fn enumeration<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::builder(name).members(members).build()
    }

    /// Apply a generic type to arguments
    pub fn parameterized(raw: &TypeDescriptor, args: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        let args: Vec<TypeDescriptor> = args.into_iter().collect();
        let rendered: Vec<&str> = args.iter().map(|a| a.name()).collect();
        let name = format!("{}<{}>", raw.name(), rendered.join(", "));
        Self::from_parts(
            name,
            TypeKind::Parameterized {
                raw: raw.clone(),
                args,
            },
            Vec::new(),
        )
    }

    /// A wildcard argument bounded above by every type in `upper_bounds`
    pub fn wildcard(upper_bounds: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        let upper_bounds: Vec<TypeDescriptor> = upper_bounds.into_iter().collect();
        let name = if upper_bounds.is_empty() {
            "?".to_string()
        } else {
            let rendered: Vec<&str> = upper_bounds.iter().map(|b| b.name()).collect();
            format!("? extends {}", rendered.join(" & "))
        };
        Self::from_parts(name, TypeKind::Wildcard { upper_bounds }, Vec::new())
    }

    /// Start building a class or enum descriptor with supertypes
    pub fn builder(name: impl Into<String>) -> TypeDescriptorBuilder {
        TypeDescriptorBuilder {
            name: name.into(),
            kind: TypeKind::Class,
            supertypes: Vec::new(),
        }
    }

    fn from_parts(name: String, kind: TypeKind, supertypes: Vec<TypeDescriptor>) -> Self {
        Self(Arc::new(DescriptorInner {
            name,
            kind,
            supertypes,
        }))
    }

    /// Canonical name, e.g. `Integer` or `List<String>`
    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn kind(&self) -> &TypeKind {
        &self.0.kind
    }

    /// Direct supertypes, as declared
    pub fn supertypes(&self) -> &[TypeDescriptor] {
        &self.0.supertypes
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.0.kind, TypeKind::Primitive)
    }

    /// Member names when this descriptor denotes an enum
    pub fn enum_members(&self) -> Option<&[String]> {
        match &self.0.kind {
            TypeKind::Enum(members) => Some(members),
            _ => None,
        }
    }

    /// Whether a value of `candidate` may be assigned to a variable of this type
    pub fn is_assignable_from(&self, candidate: &TypeDescriptor) -> bool {
        if self == candidate {
            return true;
        }

        match self.kind() {
            TypeKind::Primitive => false,
            TypeKind::Wildcard { upper_bounds } => {
                if candidate.is_primitive() {
                    return false;
                }
                upper_bounds.iter().all(|bound| bound.is_assignable_from(candidate))
            }
            TypeKind::Parameterized { raw, args } => match candidate.kind() {
                TypeKind::Parameterized {
                    raw: candidate_raw,
                    args: candidate_args,
                } if raw.is_assignable_from(candidate_raw)
                    && args.len() == candidate_args.len()
                    && args
                        .iter()
                        .zip(candidate_args)
                        .all(|(arg, candidate_arg)| arg.accepts_argument(candidate_arg)) =>
                {
                    true
                }
                _ => self.assignable_from_supertypes(candidate),
            },
            TypeKind::Class | TypeKind::Enum(_) => match candidate.kind() {
                TypeKind::Primitive => false,
                // raw type accepts any parameterization of it
                TypeKind::Parameterized { raw, .. } => {
                    self.is_assignable_from(raw) || self.assignable_from_supertypes(candidate)
                }
                TypeKind::Wildcard { upper_bounds } => {
                    upper_bounds.iter().any(|bound| self.is_assignable_from(bound))
                }
                TypeKind::Class | TypeKind::Enum(_) => self.assignable_from_supertypes(candidate),
            },
        }
    }

    fn assignable_from_supertypes(&self, candidate: &TypeDescriptor) -> bool {
        candidate
            .supertypes()
            .iter()
            .any(|supertype| self.is_assignable_from(supertype))
    }

    // Type arguments are invariant unless this argument is a wildcard.
    fn accepts_argument(&self, argument: &TypeDescriptor) -> bool {
        match self.kind() {
            TypeKind::Wildcard { .. } => self.is_assignable_from(argument),
            _ => self == argument,
        }
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.name == other.0.name
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.name)
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeDescriptor").field(&self.0.name).finish()
    }
}

impl Serialize for TypeDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Builder for class and enum descriptors
#[derive(Debug)]
pub struct TypeDescriptorBuilder {
    name: String,
    kind: TypeKind,
    supertypes: Vec<TypeDescriptor>,
}

impl TypeDescriptorBuilder {
    /// Declare a direct supertype or implemented interface
    pub fn supertype(mut self, supertype: TypeDescriptor) -> Self {
        self.supertypes.push(supertype);
        self
    }

    pub fn supertypes(mut self, supertypes: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        self.supertypes.extend(supertypes);
        self
    }

    /// Make this an enum with the given members
    pub fn members<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let members: Vec<String> = members.into_iter().map(Into::into).collect();
        self.kind = TypeKind::Enum(members.into());
        self
    }

    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::from_parts(self.name, self.kind, self.supertypes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hierarchy() -> (TypeDescriptor, TypeDescriptor, TypeDescriptor) {
        let object = TypeDescriptor::class("Object");
        let sequence = TypeDescriptor::builder("CharSequence").supertype(object.clone()).build();
        let string = TypeDescriptor::builder("String").supertype(sequence.clone()).build();
        (object, sequence, string)
    }

    #[test]
    fn test_equality_by_name() {
        let a = TypeDescriptor::class("Widget");
        let b = TypeDescriptor::class("Widget");
        assert_eq!(a, b);
        assert_ne!(a, TypeDescriptor::class("Gadget"));
    }

    #[test]
    fn test_subtype_is_assignable_to_supertype() {
        let (object, sequence, string) = hierarchy();
        assert!(sequence.is_assignable_from(&string));
        assert!(object.is_assignable_from(&string));
        assert!(!string.is_assignable_from(&sequence));
    }

    #[test]
    fn test_primitives_only_accept_themselves() {
        let int = TypeDescriptor::primitive("i32");
        let boxed = TypeDescriptor::class("Integer");
        assert!(int.is_assignable_from(&int.clone()));
        assert!(!int.is_assignable_from(&boxed));
        assert!(!TypeDescriptor::class("Object").is_assignable_from(&int));
    }

    #[test]
    fn test_unbounded_wildcard_rejects_primitives() {
        let (object, _, string) = hierarchy();
        let any = TypeDescriptor::wildcard([]);
        assert_eq!(any.name(), "?");
        assert!(any.is_assignable_from(&string));
        assert!(any.is_assignable_from(&object));
        assert!(!any.is_assignable_from(&TypeDescriptor::primitive("i32")));
    }

    #[test]
    fn test_parameterized_arguments_are_invariant() {
        let (object, sequence, string) = hierarchy();
        let list = TypeDescriptor::class("List");
        let of_string = TypeDescriptor::parameterized(&list, [string.clone()]);
        let of_sequence = TypeDescriptor::parameterized(&list, [sequence.clone()]);

        assert_eq!(of_string.name(), "List<String>");
        assert!(!of_sequence.is_assignable_from(&of_string));
        assert!(list.is_assignable_from(&of_string));

        let of_any_sequence = TypeDescriptor::parameterized(&list, [TypeDescriptor::wildcard([sequence])]);
        assert_eq!(of_any_sequence.name(), "List<? extends CharSequence>");
        assert!(of_any_sequence.is_assignable_from(&of_string));

        let of_object = TypeDescriptor::parameterized(&list, [object]);
        assert!(!of_any_sequence.is_assignable_from(&of_object));
    }

    #[test]
    fn test_enum_members() {
        let level = TypeDescriptor::enumeration("Level", ["DEBUG", "INFO"]);
        assert_eq!(level.enum_members().unwrap(), ["DEBUG", "INFO"]);
        assert!(TypeDescriptor::class("Level").enum_members().is_none());
    }
}
