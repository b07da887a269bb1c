//! Converter catalogs
//!
//! A catalog enumerates the converter implementations known at startup, each
//! with the type it declares support for. The registry consumes a catalog
//! once, during bootstrap.

use std::fmt;
use std::sync::Arc;

use crate::converter::ConverterRef;
use crate::converters::{
    BooleanConverter, CharArrayConverter, CharacterConverter, DateTimeConverter, PathConverter,
    PatternConverter, StringConverter, VersionConverter, BYTE, DOUBLE, FLOAT, INTEGER, LONG, SHORT,
};
use crate::descriptor::TypeDescriptor;
use crate::types;

type Factory = dyn Fn() -> ConverterRef + Send + Sync;

/// A known converter implementation and the type it supports
#[derive(Clone)]
pub struct CatalogEntry {
    /// Implementation name, used for diagnostics and `[catalog] disabled`
    pub name: String,
    /// Declared supported type; `None` entries are skipped at bootstrap
    pub supported_type: Option<TypeDescriptor>,
    factory: Arc<Factory>,
}

impl CatalogEntry {
    pub fn new<F>(name: impl Into<String>, supported_type: Option<TypeDescriptor>, factory: F) -> Self
    where
        F: Fn() -> ConverterRef + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            supported_type,
            factory: Arc::new(factory),
        }
    }

    /// Create a fresh converter instance
    pub fn instantiate(&self) -> ConverterRef {
        (self.factory)()
    }
}

impl fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("name", &self.name)
            .field("supported_type", &self.supported_type)
            .finish_non_exhaustive()
    }
}

/// Source of known converters
pub trait ConverterCatalog {
    /// Known converters, in registration order
    fn list_known_converters(&self) -> Vec<CatalogEntry>;
}

/// Catalog backed by an explicit table
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entries: Vec<CatalogEntry>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry declaring support for `ty`
    pub fn with<F>(mut self, name: impl Into<String>, ty: TypeDescriptor, factory: F) -> Self
    where
        F: Fn() -> ConverterRef + Send + Sync + 'static,
    {
        self.entries.push(CatalogEntry::new(name, Some(ty), factory));
        self
    }

    pub fn push(&mut self, entry: CatalogEntry) {
        self.entries.push(entry);
    }

    /// Extend with every entry of another catalog
    pub fn extend_from(mut self, other: &dyn ConverterCatalog) -> Self {
        self.entries.extend(other.list_known_converters());
        self
    }
}

impl ConverterCatalog for StaticCatalog {
    fn list_known_converters(&self) -> Vec<CatalogEntry> {
        self.entries.clone()
    }
}

/// The converters shipped with this crate
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl ConverterCatalog for BuiltinCatalog {
    fn list_known_converters(&self) -> Vec<CatalogEntry> {
        StaticCatalog::new()
            .with("BooleanConverter", types::boolean(), || Arc::new(BooleanConverter))
            .with("ByteConverter", types::byte(), || Arc::new(BYTE))
            .with("CharacterConverter", types::character(), || Arc::new(CharacterConverter))
            .with("DoubleConverter", types::double(), || Arc::new(DOUBLE))
            .with("FloatConverter", types::float(), || Arc::new(FLOAT))
            .with("IntegerConverter", types::integer(), || Arc::new(INTEGER))
            .with("LongConverter", types::long(), || Arc::new(LONG))
            .with("ShortConverter", types::short(), || Arc::new(SHORT))
            .with("StringConverter", types::string(), || Arc::new(StringConverter))
            .with("CharArrayConverter", types::char_array(), || Arc::new(CharArrayConverter))
            .with("PathConverter", types::path(), || Arc::new(PathConverter))
            .with("PatternConverter", types::pattern(), || Arc::new(PatternConverter))
            .with("VersionConverter", types::version(), || Arc::new(VersionConverter))
            .with("DateTimeConverter", types::date_time(), || Arc::new(DateTimeConverter))
            .entries
    }
}
