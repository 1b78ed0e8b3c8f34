//! Versioned schema catalog
//!
//! Schemas are registered under qualified names such as
//! `worker_vitals_v1`: a family name plus a numeric version. Archives name
//! the exact schema they were written with, so older versions stay
//! resolvable after newer ones land.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use apache_avro::Schema;
use aura_core::EntityKind;

use crate::SchemaError;

/// Namespace every Aura schema is registered under
pub const NAMESPACE: &str = "io.aura";

/// What the catalog knows about one registered schema
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaMetadata {
    /// Family name, e.g. `machine_telemetry`
    pub name: String,
    /// Version label, e.g. `v2`
    pub version: String,
    pub qualified_name: String,
    pub namespace: String,
    pub deprecated: bool,
    /// Qualified name of the schema superseding this one
    pub replacement: Option<String>,
    /// Entity the records describe, if any
    pub entity: Option<EntityKind>,
}

impl SchemaMetadata {
    /// Metadata for a qualified name, family and version parsed from it
    pub fn for_name(qualified_name: &str, entity: Option<EntityKind>) -> Self {
        let (name, version) = split_qualified(qualified_name);
        Self {
            name: name.to_string(),
            version: format!("v{}", version),
            qualified_name: qualified_name.to_string(),
            namespace: NAMESPACE.to_string(),
            deprecated: false,
            replacement: None,
            entity,
        }
    }

    pub fn version_number(&self) -> u32 {
        self.version
            .strip_prefix('v')
            .and_then(|n| n.parse().ok())
            .unwrap_or(0)
    }
}

/// `"worker_vitals_v12"` → `("worker_vitals", 12)`; names without a
/// version suffix are version 1
fn split_qualified(name: &str) -> (&str, u32) {
    name.rsplit_once("_v")
        .and_then(|(family, digits)| Some((family, digits.parse().ok()?)))
        .filter(|(family, _)| !family.is_empty())
        .unwrap_or((name, 1))
}

#[derive(Debug, Default)]
struct Catalog {
    entries: HashMap<String, (Schema, SchemaMetadata)>,
    /// family → version number → qualified name
    families: HashMap<String, BTreeMap<u32, String>>,
}

/// Thread-safe schema catalog
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    catalog: RwLock<Catalog>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog preloaded with the history record schemas
    pub fn with_defaults() -> Result<Self, SchemaError> {
        let registry = Self::new();
        registry.load_defaults()?;
        Ok(registry)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Catalog>, SchemaError> {
        self.catalog.read().map_err(|_| SchemaError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Catalog>, SchemaError> {
        self.catalog.write().map_err(|_| SchemaError::Poisoned)
    }

    /// Add a schema under `metadata.qualified_name`.
    ///
    /// Only record schemas are accepted, and a qualified name or a
    /// family/version pair can be taken once.
    pub fn register_with_metadata(&self, schema: Schema, metadata: SchemaMetadata) -> Result<(), SchemaError> {
        if !matches!(schema, Schema::Record(_)) {
            return Err(SchemaError::ValidationError(format!(
                "{} must be a record schema",
                metadata.qualified_name
            )));
        }

        let mut catalog = self.write()?;
        let version = metadata.version_number();
        let taken = catalog.entries.contains_key(&metadata.qualified_name)
            || catalog
                .families
                .get(&metadata.name)
                .map_or(false, |versions| versions.contains_key(&version));
        if taken {
            return Err(SchemaError::ValidationError(format!(
                "{} is already registered",
                metadata.qualified_name
            )));
        }

        catalog
            .families
            .entry(metadata.name.clone())
            .or_default()
            .insert(version, metadata.qualified_name.clone());
        log::debug!("registered schema {} ({})", metadata.qualified_name, metadata.namespace);
        catalog
            .entries
            .insert(metadata.qualified_name.clone(), (schema, metadata));
        Ok(())
    }

    /// Add a schema, taking family and version from its qualified name
    pub fn register(&self, qualified_name: &str, schema: Schema) -> Result<(), SchemaError> {
        self.register_for(qualified_name, schema, None)
    }

    /// Add a schema describing records of one entity kind
    pub fn register_for(
        &self,
        qualified_name: &str,
        schema: Schema,
        entity: Option<EntityKind>,
    ) -> Result<(), SchemaError> {
        self.register_with_metadata(schema, SchemaMetadata::for_name(qualified_name, entity))
    }

    pub fn get(&self, qualified_name: &str) -> Result<Schema, SchemaError> {
        self.read()?
            .entries
            .get(qualified_name)
            .map(|(schema, _)| schema.clone())
            .ok_or_else(|| SchemaError::NotFound(qualified_name.to_string()))
    }

    /// Highest version registered for a family
    pub fn get_latest(&self, family: &str) -> Result<Schema, SchemaError> {
        let catalog = self.read()?;
        catalog
            .families
            .get(family)
            .and_then(|versions| versions.values().next_back())
            .and_then(|qualified| catalog.entries.get(qualified))
            .map(|(schema, _)| schema.clone())
            .ok_or_else(|| SchemaError::NotFound(format!("no versions of {}", family)))
    }

    /// Version labels of a family, oldest first
    pub fn get_versions(&self, family: &str) -> Result<Vec<String>, SchemaError> {
        Ok(self
            .read()?
            .families
            .get(family)
            .map(|versions| versions.keys().map(|v| format!("v{}", v)).collect())
            .unwrap_or_default())
    }

    pub fn get_metadata(&self, qualified_name: &str) -> Result<SchemaMetadata, SchemaError> {
        self.read()?
            .entries
            .get(qualified_name)
            .map(|(_, metadata)| metadata.clone())
            .ok_or_else(|| SchemaError::NotFound(qualified_name.to_string()))
    }

    /// Whether data written with `writer` can be read as `reader`: both
    /// must be records with the same full name.
    pub fn is_compatible(&self, writer: &str, reader: &str) -> Result<bool, SchemaError> {
        Ok(self.get(writer)?.name() == self.get(reader)?.name())
    }

    /// Flag a schema as superseded. It stays resolvable by name.
    pub fn deprecate(&self, qualified_name: &str, replacement: Option<String>) -> Result<(), SchemaError> {
        let mut catalog = self.write()?;
        let (_, metadata) = catalog
            .entries
            .get_mut(qualified_name)
            .ok_or_else(|| SchemaError::NotFound(qualified_name.to_string()))?;
        metadata.deprecated = true;
        metadata.replacement = replacement;
        log::info!("schema {} deprecated", qualified_name);
        Ok(())
    }

    /// Register the worker vitals and machine telemetry schemas
    pub fn load_defaults(&self) -> Result<(), SchemaError> {
        use crate::schemas::{
            machine_telemetry_v1, worker_vitals_v1, MACHINE_TELEMETRY_V1, WORKER_VITALS_V1,
        };

        self.register_for(WORKER_VITALS_V1, worker_vitals_v1()?, Some(EntityKind::Worker))?;
        self.register_for(MACHINE_TELEMETRY_V1, machine_telemetry_v1()?, Some(EntityKind::Machine))
    }
}

lazy_static::lazy_static! {
    /// Process-wide catalog with the history schemas loaded
    pub static ref GLOBAL_REGISTRY: SchemaRegistry = {
        let registry = SchemaRegistry::new();
        if let Err(e) = registry.load_defaults() {
            log::error!("failed to load default schemas: {}", e);
        }
        registry
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::{self, machine_telemetry_v1, worker_vitals_v1};

    #[test]
    fn lookup_by_qualified_name() {
        let registry = SchemaRegistry::new();
        registry.register("shift_summary_v1", worker_vitals_v1().unwrap()).unwrap();

        assert_eq!(
            registry.get("shift_summary_v1").unwrap().name(),
            worker_vitals_v1().unwrap().name()
        );
        assert!(matches!(registry.get("shift_summary_v2"), Err(SchemaError::NotFound(_))));
    }

    #[test]
    fn a_version_can_be_taken_once() {
        let registry = SchemaRegistry::new();
        registry.register("dup_v1", worker_vitals_v1().unwrap()).unwrap();
        let err = registry.register("dup_v1", machine_telemetry_v1().unwrap()).unwrap_err();
        assert!(matches!(err, SchemaError::ValidationError(_)));
    }

    #[test]
    fn only_records_are_accepted() {
        let registry = SchemaRegistry::new();
        let err = registry.register("bare_v1", Schema::Long).unwrap_err();
        assert!(matches!(err, SchemaError::ValidationError(_)));
    }

    #[test]
    fn versions_are_ordered_numerically() {
        let registry = SchemaRegistry::new();
        registry.register("sensor_v10", machine_telemetry_v1().unwrap()).unwrap();
        registry.register("sensor_v2", worker_vitals_v1().unwrap()).unwrap();
        registry.register("sensor_v9", worker_vitals_v1().unwrap()).unwrap();

        assert_eq!(registry.get_versions("sensor").unwrap(), ["v2", "v9", "v10"]);
        assert_eq!(
            registry.get_latest("sensor").unwrap().name(),
            machine_telemetry_v1().unwrap().name()
        );
        assert!(registry.get_versions("missing").unwrap().is_empty());
        assert!(registry.get_latest("missing").is_err());
    }

    #[test]
    fn qualified_names_split_into_family_and_version() {
        assert_eq!(split_qualified("worker_vitals_v1"), ("worker_vitals", 1));
        assert_eq!(split_qualified("worker_vitals_v12"), ("worker_vitals", 12));
        assert_eq!(split_qualified("archive"), ("archive", 1));
        assert_eq!(split_qualified("my_value"), ("my_value", 1));
        assert_eq!(split_qualified("_v3"), ("_v3", 1));
    }

    #[test]
    fn deprecated_schemas_stay_resolvable() {
        let registry = SchemaRegistry::new();
        registry.register("legacy_v1", worker_vitals_v1().unwrap()).unwrap();
        registry.deprecate("legacy_v1", Some("legacy_v2".to_string())).unwrap();

        let metadata = registry.get_metadata("legacy_v1").unwrap();
        assert!(metadata.deprecated);
        assert_eq!(metadata.replacement.as_deref(), Some("legacy_v2"));
        assert_eq!(metadata.namespace, NAMESPACE);
        assert!(registry.get("legacy_v1").is_ok());
        assert!(registry.deprecate("legacy_v9", None).is_err());
    }

    #[test]
    fn defaults_are_tagged_by_entity() {
        let registry = SchemaRegistry::with_defaults().unwrap();
        let worker = registry.get_metadata(schemas::WORKER_VITALS_V1).unwrap();
        assert_eq!(worker.entity, Some(EntityKind::Worker));
        assert_eq!(worker.name, "worker_vitals");
        assert!(registry.get_latest("machine_telemetry").is_ok());
        assert!(registry.is_compatible(schemas::WORKER_VITALS_V1, schemas::WORKER_VITALS_V1).unwrap());
        assert!(!registry.is_compatible(schemas::WORKER_VITALS_V1, schemas::MACHINE_TELEMETRY_V1).unwrap());
    }

    #[test]
    fn global_registry_has_defaults() {
        assert!(GLOBAL_REGISTRY.get(schemas::WORKER_VITALS_V1).is_ok());
        assert!(GLOBAL_REGISTRY.get(schemas::MACHINE_TELEMETRY_V1).is_ok());
    }
}
