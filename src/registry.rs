//! Converter Registry
//!
//! Maps a requested target type to a converter. Lookups try, in order:
//!
//! 1. an exact entry for the type,
//! 2. a converter synthesized for enum types,
//! 3. the first entry (in table order) whose type is assignable to the
//!    requested one.
//!
//! Successful enum and fallback resolutions are cached under the requested
//! type, so the table only grows.
//!
//! Reads load an immutable snapshot of the table and never block. Every
//! mutation takes `write_lock`, decides against the latest snapshot and
//! publishes a copy, so two racing registrations of one type cannot both see
//! it as vacant.

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, error, trace, warn};

use crate::catalog::{CatalogEntry, ConverterCatalog};
use crate::converter::{ConverterRef, EnumConverter};
use crate::descriptor::TypeDescriptor;
use crate::error::{ConverterError, Result};
use crate::types;
use crate::value::Value;

type Table = IndexMap<TypeDescriptor, ConverterRef>;

/// Switches for the optional parts of bootstrap and lookup
#[derive(Debug, Clone)]
pub struct RegistryOptions {
    /// Alias primitive types to their reference type's converter
    pub primitive_aliases: bool,
    /// Fail bootstrap when an alias has no reference-type converter
    pub strict_aliases: bool,
    /// Synthesize converters for enum types on lookup
    pub enum_synthesis: bool,
    /// Fall back to assignment-compatible entries on lookup
    pub compatible_fallback: bool,
    /// Catalog entry names to skip at bootstrap
    pub disabled: Vec<String>,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            primitive_aliases: true,
            strict_aliases: false,
            enum_synthesis: true,
            compatible_fallback: true,
            disabled: Vec::new(),
        }
    }
}

/// A primitive alias whose reference type had no converter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingAlias {
    pub reference: String,
    pub primitive: String,
}

/// What happened to each catalog entry during bootstrap
#[derive(Debug, Clone, Default, Serialize)]
pub struct BootstrapReport {
    /// Entries that became effective for their type
    pub registered: Vec<String>,
    /// Entries that lost a conflict against an earlier one
    pub ignored: Vec<String>,
    /// Entries without a supported type, or disabled by configuration
    pub skipped: Vec<String>,
    /// Primitive aliases that could not be registered
    pub missing_aliases: Vec<MissingAlias>,
}

/// Lookup counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub exact_hits: u64,
    pub enums_synthesized: u64,
    pub fallback_resolutions: u64,
    pub misses: u64,
}

#[derive(Debug, Default)]
struct Counters {
    exact_hits: AtomicU64,
    enums_synthesized: AtomicU64,
    fallback_resolutions: AtomicU64,
    misses: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, AtomicOrdering::Relaxed);
    }

    fn snapshot(&self) -> RegistryStats {
        RegistryStats {
            exact_hits: self.exact_hits.load(AtomicOrdering::Relaxed),
            enums_synthesized: self.enums_synthesized.load(AtomicOrdering::Relaxed),
            fallback_resolutions: self.fallback_resolutions.load(AtomicOrdering::Relaxed),
            misses: self.misses.load(AtomicOrdering::Relaxed),
        }
    }
}

/// The converter registry
pub struct ConverterRegistry {
    /// Published table; replaced wholesale on every mutation
    table: ArcSwap<Table>,
    /// Serializes read-decide-write on `table`
    write_lock: Mutex<()>,
    options: RegistryOptions,
    counters: Counters,
}

impl ConverterRegistry {
    /// Create an empty registry
    pub fn new(options: RegistryOptions) -> Self {
        Self {
            table: ArcSwap::from_pointee(Table::new()),
            write_lock: Mutex::new(()),
            options,
            counters: Counters::default(),
        }
    }

    /// Build a registry from a catalog, then register primitive aliases
    pub fn bootstrap(catalog: &dyn ConverterCatalog, options: RegistryOptions) -> Result<Self> {
        Self::bootstrap_with_report(catalog, options).map(|(registry, _)| registry)
    }

    /// Like [`ConverterRegistry::bootstrap`], also reporting per-entry outcomes
    pub fn bootstrap_with_report(
        catalog: &dyn ConverterCatalog,
        options: RegistryOptions,
    ) -> Result<(Self, BootstrapReport)> {
        trace!("ConverterRegistry initializing");
        let registry = Self::new(options);
        let mut report = BootstrapReport::default();

        registry.load_known_converters(catalog.list_known_converters(), &mut report);
        if registry.options.primitive_aliases {
            registry.register_primitive_types(&mut report)?;
        }

        debug!(
            registered = report.registered.len(),
            ignored = report.ignored.len(),
            skipped = report.skipped.len(),
            entries = registry.len(),
            "ConverterRegistry initialized"
        );
        Ok((registry, report))
    }

    pub fn options(&self) -> &RegistryOptions {
        &self.options
    }

    /// Find a converter for `ty`, falling back to an assignment-compatible one
    ///
    /// If `ty` has no entry but another registered type can be assigned to
    /// it, that type's converter is registered under `ty` and returned.
    ///
    /// # Errors
    /// `InvalidArgument` when no type is given; `UnknownTypeConversion` when
    /// nothing matches.
    pub fn find_compatible_converter<'a>(
        &self,
        ty: impl Into<Option<&'a TypeDescriptor>>,
    ) -> Result<ConverterRef> {
        let ty = ty
            .into()
            .ok_or_else(|| ConverterError::InvalidArgument("No type was provided".to_string()))?;

        let snapshot = self.table.load();
        if let Some(primary) = snapshot.get(ty) {
            Counters::bump(&self.counters.exact_hits);
            return Ok(primary.clone());
        }

        if self.options.enum_synthesis {
            if let Some(converter) = EnumConverter::for_type(ty) {
                let synthesized: ConverterRef = Arc::new(converter);
                let effective = self.register_converter(ty.clone(), synthesized.clone());
                if Arc::ptr_eq(&effective, &synthesized) {
                    debug!("Synthesized EnumConverter for type [{}].", ty);
                    Counters::bump(&self.counters.enums_synthesized);
                }
                return Ok(effective);
            }
        }

        if self.options.compatible_fallback {
            let compatible = snapshot
                .iter()
                .find(|(key, _)| ty.is_assignable_from(key))
                .map(|(key, value)| (key.clone(), value.clone()));
            if let Some((key, value)) = compatible {
                debug!("Found compatible converter<{}> for type [{}].", key, ty);
                Counters::bump(&self.counters.fallback_resolutions);
                return Ok(self.register_converter(ty.clone(), value));
            }
        }

        Counters::bump(&self.counters.misses);
        Err(ConverterError::UnknownTypeConversion(ty.to_string()))
    }

    /// Register `converter` for `ty` and return the effective converter
    ///
    /// When `ty` already has a converter, the candidate replaces it only if
    /// the candidate orders before it, or (when the candidate offers no
    /// ordering) the existing one orders after it. Otherwise the existing
    /// converter stays and is returned.
    pub fn register_converter(&self, ty: TypeDescriptor, converter: ConverterRef) -> ConverterRef {
        let _guard = self.write_lock.lock();
        let current = self.table.load_full();

        let Some(conflicting) = current.get(&ty) else {
            self.publish(&current, ty, converter.clone());
            return converter;
        };

        if Arc::ptr_eq(conflicting, &converter) {
            return converter;
        }

        let overridable = match converter.compare_to(conflicting.as_ref()) {
            Some(ordering) => ordering == Ordering::Less,
            None => conflicting.compare_to(converter.as_ref()) == Some(Ordering::Greater),
        };

        if overridable {
            debug!(
                "Replacing converter [{}] for type [{}] with [{}] after comparison.",
                conflicting.name(),
                ty,
                converter.name()
            );
            self.publish(&current, ty, converter.clone());
            converter
        } else {
            warn!(
                "Ignoring converter [{}] for type [{}] that conflicts with [{}], since they are not comparable.",
                converter.name(),
                ty,
                conflicting.name()
            );
            conflicting.clone()
        }
    }

    /// Exact entry for `ty`, without fallback
    pub fn get(&self, ty: &TypeDescriptor) -> Option<ConverterRef> {
        self.table.load().get(ty).cloned()
    }

    /// Current entries in table order
    pub fn entries(&self) -> Vec<(TypeDescriptor, ConverterRef)> {
        self.table
            .load()
            .iter()
            .map(|(ty, converter)| (ty.clone(), converter.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.table.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.load().is_empty()
    }

    pub fn stats(&self) -> RegistryStats {
        self.counters.snapshot()
    }

    /// Resolve a converter for `ty` and convert `text` with it
    pub fn convert(&self, ty: &TypeDescriptor, text: &str) -> Result<Value> {
        let converter = self.find_compatible_converter(ty)?;
        Ok(converter.convert(text)?)
    }

    /// Convert `text` and take the result as a `T`
    pub fn convert_to<T: Any>(&self, ty: &TypeDescriptor, text: &str) -> Result<T> {
        self.convert(ty, text)?
            .downcast::<T>()
            .map_err(|value| ConverterError::TypeMismatch {
                ty: ty.to_string(),
                expected: std::any::type_name::<T>(),
                actual: value.type_name(),
            })
    }

    fn load_known_converters(&self, entries: Vec<CatalogEntry>, report: &mut BootstrapReport) {
        for entry in entries {
            if self.options.disabled.iter().any(|name| *name == entry.name) {
                debug!("Skipping disabled converter [{}].", entry.name);
                report.skipped.push(entry.name);
                continue;
            }
            let Some(ty) = entry.supported_type.clone() else {
                debug!("Skipping converter [{}] with no supported type.", entry.name);
                report.skipped.push(entry.name);
                continue;
            };

            let converter = entry.instantiate();
            let effective = self.register_converter(ty, converter.clone());
            if Arc::ptr_eq(&effective, &converter) {
                report.registered.push(entry.name);
            } else {
                report.ignored.push(entry.name);
            }
        }
    }

    fn register_primitive_types(&self, report: &mut BootstrapReport) -> Result<()> {
        for (reference, primitive) in types::primitive_pairs() {
            if !self.register_type_alias(reference, primitive) {
                error!("Cannot locate converter for {}", reference);
                let missing = MissingAlias {
                    reference: reference.to_string(),
                    primitive: primitive.to_string(),
                };
                if self.options.strict_aliases {
                    return Err(ConverterError::MissingAliasTarget {
                        reference: missing.reference,
                        primitive: missing.primitive,
                    });
                }
                report.missing_aliases.push(missing);
            }
        }
        Ok(())
    }

    /// Register the reference type's converter under `alias` if vacant;
    /// false when the reference type has no converter
    fn register_type_alias(&self, known: &TypeDescriptor, alias: &TypeDescriptor) -> bool {
        let _guard = self.write_lock.lock();
        let current = self.table.load_full();
        let Some(converter) = current.get(known) else {
            return false;
        };
        if !current.contains_key(alias) {
            self.publish(&current, alias.clone(), converter.clone());
        }
        true
    }

    // Caller holds `write_lock`.
    fn publish(&self, current: &Table, ty: TypeDescriptor, converter: ConverterRef) {
        let mut next = current.clone();
        next.insert(ty, converter);
        self.table.store(Arc::new(next));
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new(RegistryOptions::default())
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("entries", &self.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::{Converter, FnConverter, Precedence};

    fn plain(name: &'static str) -> ConverterRef {
        FnConverter::new(name, |text| Ok(Value::new(text.to_string()))).into_ref()
    }

    fn ranked(name: &'static str, rank: i32) -> ConverterRef {
        FnConverter::new(name, |text| Ok(Value::new(text.to_string())))
            .with_precedence(Precedence::new("widget", rank))
            .into_ref()
    }

    #[test]
    fn test_register_into_vacant_slot() {
        let registry = ConverterRegistry::default();
        let ty = TypeDescriptor::class("Widget");
        let converter = plain("a");
        let effective = registry.register_converter(ty.clone(), converter.clone());
        assert!(Arc::ptr_eq(&effective, &converter));
        assert!(Arc::ptr_eq(&registry.get(&ty).unwrap(), &converter));
    }

    #[test]
    fn test_higher_priority_replaces_existing() {
        let registry = ConverterRegistry::default();
        let ty = TypeDescriptor::class("Widget");
        let generic = ranked("generic", 10);
        let specific = ranked("specific", 0);

        registry.register_converter(ty.clone(), generic);
        let effective = registry.register_converter(ty.clone(), specific.clone());
        assert!(Arc::ptr_eq(&effective, &specific));
        assert!(Arc::ptr_eq(&registry.get(&ty).unwrap(), &specific));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lower_priority_is_discarded() {
        let registry = ConverterRegistry::default();
        let ty = TypeDescriptor::class("Widget");
        let specific = ranked("specific", 0);
        let generic = ranked("generic", 10);

        registry.register_converter(ty.clone(), specific.clone());
        let effective = registry.register_converter(ty.clone(), generic);
        assert!(Arc::ptr_eq(&effective, &specific));
    }

    /// Orders itself after every other converter
    #[derive(Debug)]
    struct Yielding;

    impl Converter for Yielding {
        fn convert(&self, text: &str) -> std::result::Result<Value, crate::error::ConversionError> {
            Ok(Value::new(text.len()))
        }

        fn name(&self) -> &str {
            "yielding"
        }

        fn compare_to(&self, _other: &dyn Converter) -> Option<Ordering> {
            Some(Ordering::Greater)
        }
    }

    #[test]
    fn test_existing_ordering_consulted_when_candidate_has_none() {
        let registry = ConverterRegistry::default();
        let ty = TypeDescriptor::class("Widget");
        let candidate = plain("plain");

        registry.register_converter(ty.clone(), Arc::new(Yielding));
        let effective = registry.register_converter(ty.clone(), candidate.clone());
        assert!(Arc::ptr_eq(&effective, &candidate));
    }

    #[test]
    fn test_candidate_ordering_is_final() {
        let registry = ConverterRegistry::default();
        let ty = TypeDescriptor::class("Widget");
        let existing = plain("plain");

        registry.register_converter(ty.clone(), existing.clone());
        let effective = registry.register_converter(ty.clone(), Arc::new(Yielding));
        assert!(Arc::ptr_eq(&effective, &existing));
    }

    #[test]
    fn test_unordered_first_wins() {
        let registry = ConverterRegistry::default();
        let ty = TypeDescriptor::class("Widget");
        let first = plain("first");

        registry.register_converter(ty.clone(), first.clone());
        for name in ["second", "third"] {
            let effective = registry.register_converter(ty.clone(), plain(name));
            assert!(Arc::ptr_eq(&effective, &first));
        }
    }

    #[test]
    fn test_missing_alias_is_reported() {
        let catalog = crate::catalog::StaticCatalog::new();
        let (registry, report) =
            ConverterRegistry::bootstrap_with_report(&catalog, RegistryOptions::default()).unwrap();
        assert!(registry.is_empty());
        assert_eq!(report.missing_aliases.len(), types::primitive_pairs().len());
    }

    #[test]
    fn test_strict_aliases_fail_bootstrap() {
        let catalog = crate::catalog::StaticCatalog::new();
        let options = RegistryOptions {
            strict_aliases: true,
            ..RegistryOptions::default()
        };
        let err = ConverterRegistry::bootstrap(&catalog, options).unwrap_err();
        assert!(matches!(err, ConverterError::MissingAliasTarget { .. }));
    }

    #[test]
    fn test_disabled_entries_are_skipped() {
        let options = RegistryOptions {
            disabled: vec!["PathConverter".to_string()],
            ..RegistryOptions::default()
        };
        let (registry, report) =
            ConverterRegistry::bootstrap_with_report(&crate::catalog::BuiltinCatalog, options).unwrap();
        assert!(registry.get(&types::path()).is_none());
        assert_eq!(report.skipped, vec!["PathConverter".to_string()]);
    }
}
