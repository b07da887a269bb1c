//! Familiar Converter Registry
//!
//! Resolves a declared target type to a converter that builds values of that
//! type from text. Configuration loaders use it to coerce string-valued fields
//! into primitives, reference types, enums and anything else a converter has
//! been registered for.
//!
//! ## Features
//!
//! - **Exact lookup**: converters registered for a type are returned directly
//! - **Enum synthesis**: enum types get a case-insensitive member converter on demand
//! - **Compatible fallback**: an unregistered type borrows the converter of an
//!   assignable registered type, and the result is cached
//! - **Primitive aliasing**: `i32` resolves to the `Integer` converter, and so on
//! - **Conflict resolution**: converters may declare a precedence; otherwise the
//!   first registration wins
//!
//! ## Lookup
//!
//! ```text
//! find_compatible_converter(T)
//! ├── exact entry for T ─────────────────────────► converter
//! ├── T is an enum ──► synthesize, register(T) ──► effective converter
//! ├── first entry K with K assignable to T
//! │                ──► register(T, converter(K)) ► effective converter
//! └── UnknownTypeConversion(T)
//! ```

pub mod catalog;
pub mod config;
pub mod converter;
pub mod converters;
pub mod descriptor;
pub mod error;
pub mod registry;
pub mod types;
pub mod value;

pub use catalog::{BuiltinCatalog, CatalogEntry, ConverterCatalog, StaticCatalog};
pub use config::ConverterConfig;
pub use converter::{Converter, ConverterRef, EnumConverter, FnConverter, Precedence};
pub use descriptor::{TypeDescriptor, TypeKind};
pub use error::{ConversionError, ConverterError, Result};
pub use registry::{BootstrapReport, ConverterRegistry, RegistryOptions, RegistryStats};
pub use value::{EnumValue, Value};
