//! Converted values

use std::any::Any;
use std::fmt;

/// Type-erased result of a conversion
pub struct Value {
    inner: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Value {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Box::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Rust type name of the wrapped value
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Take the wrapped value, handing `self` back if it is not a `T`
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        let type_name = self.type_name;
        match self.inner.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(inner) => Err(Self { inner, type_name }),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value").field("type", &self.type_name).finish_non_exhaustive()
    }
}

/// An enum member produced by a synthesized enum converter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    /// Canonical name of the enum type
    pub type_name: String,
    /// Position of the member in declaration order
    pub ordinal: usize,
    /// Declared member name (original casing)
    pub name: String,
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downcast() {
        let value = Value::new(42i32);
        assert!(value.is::<i32>());
        assert_eq!(value.downcast_ref::<i32>(), Some(&42));
        assert!(value.downcast_ref::<i64>().is_none());

        let value = value.downcast::<String>().unwrap_err();
        assert_eq!(value.type_name(), "i32");
        assert_eq!(value.downcast::<i32>().unwrap(), 42);
    }
}
