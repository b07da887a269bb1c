//! Built-in converters
//!
//! String to scalar, text, path, pattern, version and timestamp converters.
//! [`crate::catalog::BuiltinCatalog`] publishes them for bootstrap.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use regex::Regex;
use semver::Version;

use crate::converter::Converter;
use crate::error::ConversionError;
use crate::value::Value;

/// Parses trimmed text with the target's `FromStr` implementation
pub struct FromStrConverter<T> {
    name: &'static str,
    target: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> FromStrConverter<T> {
    pub const fn new(name: &'static str, target: &'static str) -> Self {
        Self {
            name,
            target,
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for FromStrConverter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromStrConverter")
            .field("name", &self.name)
            .field("target", &self.target)
            .finish()
    }
}

impl<T> Converter for FromStrConverter<T>
where
    T: FromStr + Any + Send + Sync,
    T::Err: fmt::Display,
{
    fn convert(&self, text: &str) -> Result<Value, ConversionError> {
        text.trim()
            .parse::<T>()
            .map(Value::new)
            .map_err(|e| ConversionError::new(self.target, text, e))
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// `"true"` in any case is true; every other input is false
#[derive(Debug, Default)]
pub struct BooleanConverter;

impl Converter for BooleanConverter {
    fn convert(&self, text: &str) -> Result<Value, ConversionError> {
        Ok(Value::new(text.eq_ignore_ascii_case("true")))
    }

    fn name(&self) -> &str {
        "BooleanConverter"
    }
}

/// Accepts exactly one character
#[derive(Debug, Default)]
pub struct CharacterConverter;

impl Converter for CharacterConverter {
    fn convert(&self, text: &str) -> Result<Value, ConversionError> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Value::new(c)),
            _ => Err(ConversionError::new(
                "Character",
                text,
                "character string must be of length 1",
            )),
        }
    }

    fn name(&self) -> &str {
        "CharacterConverter"
    }
}

#[derive(Debug, Default)]
pub struct StringConverter;

impl Converter for StringConverter {
    fn convert(&self, text: &str) -> Result<Value, ConversionError> {
        Ok(Value::new(text.to_string()))
    }

    fn name(&self) -> &str {
        "StringConverter"
    }
}

#[derive(Debug, Default)]
pub struct CharArrayConverter;

impl Converter for CharArrayConverter {
    fn convert(&self, text: &str) -> Result<Value, ConversionError> {
        Ok(Value::new(text.chars().collect::<Vec<char>>()))
    }

    fn name(&self) -> &str {
        "CharArrayConverter"
    }
}

#[derive(Debug, Default)]
pub struct PathConverter;

impl Converter for PathConverter {
    fn convert(&self, text: &str) -> Result<Value, ConversionError> {
        if text.is_empty() {
            return Err(ConversionError::new("Path", text, "empty path"));
        }
        Ok(Value::new(PathBuf::from(text)))
    }

    fn name(&self) -> &str {
        "PathConverter"
    }
}

/// Compiles a regular expression
#[derive(Debug, Default)]
pub struct PatternConverter;

impl Converter for PatternConverter {
    fn convert(&self, text: &str) -> Result<Value, ConversionError> {
        Regex::new(text)
            .map(Value::new)
            .map_err(|e| ConversionError::new("Pattern", text, e))
    }

    fn name(&self) -> &str {
        "PatternConverter"
    }
}

/// Semantic version, with or without a leading `v`
#[derive(Debug, Default)]
pub struct VersionConverter;

impl Converter for VersionConverter {
    fn convert(&self, text: &str) -> Result<Value, ConversionError> {
        let trimmed = text.trim();
        let version_str = trimmed.strip_prefix('v').unwrap_or(trimmed);
        Version::parse(version_str)
            .map(Value::new)
            .map_err(|e| ConversionError::new("Version", text, e))
    }

    fn name(&self) -> &str {
        "VersionConverter"
    }
}

/// RFC 3339 timestamp, normalized to UTC
#[derive(Debug, Default)]
pub struct DateTimeConverter;

impl Converter for DateTimeConverter {
    fn convert(&self, text: &str) -> Result<Value, ConversionError> {
        DateTime::parse_from_rfc3339(text.trim())
            .map(|dt| Value::new(dt.with_timezone(&Utc)))
            .map_err(|e| ConversionError::new("DateTime", text, e))
    }

    fn name(&self) -> &str {
        "DateTimeConverter"
    }
}

pub type ByteConverter = FromStrConverter<i8>;
pub type ShortConverter = FromStrConverter<i16>;
pub type IntegerConverter = FromStrConverter<i32>;
pub type LongConverter = FromStrConverter<i64>;
pub type FloatConverter = FromStrConverter<f32>;
pub type DoubleConverter = FromStrConverter<f64>;

pub const BYTE: ByteConverter = FromStrConverter::new("ByteConverter", "Byte");
pub const SHORT: ShortConverter = FromStrConverter::new("ShortConverter", "Short");
pub const INTEGER: IntegerConverter = FromStrConverter::new("IntegerConverter", "Integer");
pub const LONG: LongConverter = FromStrConverter::new("LongConverter", "Long");
pub const FLOAT: FloatConverter = FromStrConverter::new("FloatConverter", "Float");
pub const DOUBLE: DoubleConverter = FromStrConverter::new("DoubleConverter", "Double");
