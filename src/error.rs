//! Error types for the converter registry

use thiserror::Error;

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, ConverterError>;

/// Converter registry errors
#[derive(Error, Debug)]
pub enum ConverterError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown type conversion: {0}")]
    UnknownTypeConversion(String),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("Converter for {ty} produced {actual}, not the requested {expected}")]
    TypeMismatch {
        ty: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Cannot locate converter for {reference} (needed by primitive alias {primitive})")]
    MissingAliasTarget { reference: String, primitive: String },

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Raised by a converter when text cannot be interpreted as its target type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot convert {input:?} to {target}: {reason}")]
pub struct ConversionError {
    /// Display name of the target type
    pub target: String,
    /// The offending input text
    pub input: String,
    /// Why the text was rejected
    pub reason: String,
}

impl ConversionError {
    pub fn new(target: impl Into<String>, input: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            target: target.into(),
            input: input.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_error_message() {
        let err = ConversionError::new("Integer", "4x2", "invalid digit found in string");
        assert_eq!(
            err.to_string(),
            "Cannot convert \"4x2\" to Integer: invalid digit found in string"
        );
    }

    #[test]
    fn test_conversion_error_passes_through() {
        let err: ConverterError = ConversionError::new("Character", "ab", "expected one character").into();
        assert!(matches!(err, ConverterError::Conversion(_)));
        assert!(err.to_string().starts_with("Cannot convert"));
    }
}
