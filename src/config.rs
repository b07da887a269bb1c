//! Configuration management for the converter registry
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (converters.toml)
//! - Environment variables (CONVERTERS__*)
//!
//! ## Example config file (converters.toml):
//! ```toml
//! [registry]
//! primitive_aliases = true
//! strict_aliases = false
//! enum_synthesis = true
//! compatible_fallback = true
//!
//! [catalog]
//! disabled = ["DateTimeConverter"]
//!
//! [[enums]]
//! name = "Level"
//! members = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR"]
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::descriptor::TypeDescriptor;
use crate::error::Result;
use crate::registry::RegistryOptions;
use crate::types;

/// Main configuration for the converter registry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Registry settings
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Catalog settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Enum types resolvable by name
    #[serde(default)]
    pub enums: Vec<EnumConfig>,
}

/// Registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Alias primitive types to their reference type's converter
    #[serde(default = "default_true")]
    pub primitive_aliases: bool,

    /// Fail bootstrap when a primitive alias has no backing converter
    #[serde(default)]
    pub strict_aliases: bool,

    /// Synthesize converters for enum types
    #[serde(default = "default_true")]
    pub enum_synthesis: bool,

    /// Fall back to assignment-compatible converters
    #[serde(default = "default_true")]
    pub compatible_fallback: bool,
}

/// Catalog configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog entry names to skip at bootstrap
    #[serde(default)]
    pub disabled: Vec<String>,
}

/// A named enum type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumConfig {
    pub name: String,
    pub members: Vec<String>,
}

impl EnumConfig {
    pub fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::builder(&self.name)
            .supertype(types::comparable())
            .members(self.members.iter().cloned())
            .build()
    }
}

fn default_true() -> bool {
    true
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            primitive_aliases: true,
            strict_aliases: false,
            enum_synthesis: true,
            compatible_fallback: true,
        }
    }
}

impl ConverterConfig {
    /// Load configuration from default locations
    pub fn load() -> std::result::Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> std::result::Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "converters.toml",
            ".converters.toml",
            "config/converters.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "converters") {
            let xdg_config = config_dir.config_dir().join("converters.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("CONVERTERS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Options for [`crate::ConverterRegistry::bootstrap`]
    pub fn registry_options(&self) -> RegistryOptions {
        RegistryOptions {
            primitive_aliases: self.registry.primitive_aliases,
            strict_aliases: self.registry.strict_aliases,
            enum_synthesis: self.registry.enum_synthesis,
            compatible_fallback: self.registry.compatible_fallback,
            disabled: self.catalog.disabled.clone(),
        }
    }

    /// Resolve a type name against configured enums, then well-known types
    pub fn resolve_type(&self, name: &str) -> Option<TypeDescriptor> {
        self.enums
            .iter()
            .find(|e| e.name == name)
            .map(EnumConfig::descriptor)
            .or_else(|| types::by_name(name))
    }
}
