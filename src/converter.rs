//! The converter capability
//!
//! A [`Converter`] turns text into a value of one declared type. Converters may
//! carry a [`Precedence`] so that, when two of them claim the same type, the
//! registry can decide which one stays effective.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::descriptor::{TypeDescriptor, TypeKind};
use crate::error::ConversionError;
use crate::value::{EnumValue, Value};

/// Shared handle to a registered converter
pub type ConverterRef = Arc<dyn Converter>;

/// Relative priority among converters that fill the same role
///
/// Only converters with the same `role` are comparable. Lower ranks sort
/// first and win conflicts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Precedence {
    pub role: Cow<'static, str>,
    pub rank: i32,
}

impl Precedence {
    pub fn new(role: impl Into<Cow<'static, str>>, rank: i32) -> Self {
        Self {
            role: role.into(),
            rank,
        }
    }
}

/// Converts text to a value of one declared type
pub trait Converter: Send + Sync + fmt::Debug {
    /// Interpret `text` as the converter's target type
    fn convert(&self, text: &str) -> Result<Value, ConversionError>;

    /// Human readable name used in diagnostics
    fn name(&self) -> &str;

    /// Optional priority among converters of the same role
    fn precedence(&self) -> Option<Precedence> {
        None
    }

    /// Order `self` against `other`; `None` means no applicable ordering
    fn compare_to(&self, other: &dyn Converter) -> Option<Ordering> {
        let mine = self.precedence()?;
        let theirs = other.precedence()?;
        (mine.role == theirs.role).then(|| mine.rank.cmp(&theirs.rank))
    }
}

type ConvertFn = dyn Fn(&str) -> Result<Value, ConversionError> + Send + Sync;

/// Converter backed by a closure
pub struct FnConverter {
    name: Cow<'static, str>,
    precedence: Option<Precedence>,
    convert: Box<ConvertFn>,
}

impl FnConverter {
    pub fn new<F>(name: impl Into<Cow<'static, str>>, convert: F) -> Self
    where
        F: Fn(&str) -> Result<Value, ConversionError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            precedence: None,
            convert: Box::new(convert),
        }
    }

    /// Attach a precedence used for conflict resolution
    pub fn with_precedence(mut self, precedence: Precedence) -> Self {
        self.precedence = Some(precedence);
        self
    }

    pub fn into_ref(self) -> ConverterRef {
        Arc::new(self)
    }
}

impl Converter for FnConverter {
    fn convert(&self, text: &str) -> Result<Value, ConversionError> {
        (self.convert)(text)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn precedence(&self) -> Option<Precedence> {
        self.precedence.clone()
    }
}

impl fmt::Debug for FnConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnConverter")
            .field("name", &self.name)
            .field("precedence", &self.precedence)
            .finish_non_exhaustive()
    }
}

/// Case-insensitive member-name converter synthesized for enum types
#[derive(Debug)]
pub struct EnumConverter {
    name: String,
    type_name: String,
    members: Arc<[String]>,
}

impl EnumConverter {
    /// Build a converter for `ty`, or `None` when `ty` is not an enum
    pub fn for_type(ty: &TypeDescriptor) -> Option<Self> {
        let TypeKind::Enum(members) = ty.kind() else {
            return None;
        };
        Some(Self {
            name: format!("EnumConverter<{}>", ty.name()),
            type_name: ty.name().to_string(),
            members: members.clone(),
        })
    }
}

impl Converter for EnumConverter {
    fn convert(&self, text: &str) -> Result<Value, ConversionError> {
        if text.is_empty() {
            return Err(ConversionError::new(&self.type_name, text, "empty enum member name"));
        }
        self.members
            .iter()
            .position(|member| eq_ignore_case(member, text))
            .map(|ordinal| {
                Value::new(EnumValue {
                    type_name: self.type_name.clone(),
                    ordinal,
                    name: self.members[ordinal].clone(),
                })
            })
            .ok_or_else(|| {
                ConversionError::new(
                    &self.type_name,
                    text,
                    format!("no member matches (expected one of {})", self.members.join(", ")),
                )
            })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(role: &'static str, rank: i32) -> FnConverter {
        FnConverter::new(format!("{role}#{rank}"), |text| Ok(Value::new(text.to_string())))
            .with_precedence(Precedence::new(role, rank))
    }

    #[test]
    fn test_compare_within_role() {
        let specific = ranked("number", 0);
        let generic = ranked("number", 10);
        assert_eq!(specific.compare_to(&generic), Some(Ordering::Less));
        assert_eq!(generic.compare_to(&specific), Some(Ordering::Greater));
    }

    #[test]
    fn test_no_ordering_across_roles_or_without_precedence() {
        let a = ranked("number", 0);
        let b = ranked("text", 0);
        let plain = FnConverter::new("plain", |text| Ok(Value::new(text.len())));
        assert_eq!(a.compare_to(&b), None);
        assert_eq!(a.compare_to(&plain), None);
        assert_eq!(plain.compare_to(&a), None);
    }

    #[test]
    fn test_enum_converter_ignores_case() {
        let ty = TypeDescriptor::enumeration("Foo", ["I", "PITY", "THE"]);
        let converter = EnumConverter::for_type(&ty).unwrap();

        let pity = converter.convert("pItY").unwrap();
        let pity = pity.downcast_ref::<EnumValue>().unwrap();
        assert_eq!(pity.name, "PITY");
        assert_eq!(pity.ordinal, 1);

        assert!(converter.convert("").is_err());
        assert!(converter.convert("FOOL").is_err());

        let accented = TypeDescriptor::enumeration("Accent", ["ÉTÉ"]);
        let converter = EnumConverter::for_type(&accented).unwrap();
        assert!(converter.convert("été").is_ok());
    }

    #[test]
    fn test_enum_converter_requires_enum() {
        assert!(EnumConverter::for_type(&TypeDescriptor::class("Foo")).is_none());
    }
}
