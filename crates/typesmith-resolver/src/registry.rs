//! In-memory availability registry with JSON snapshots.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::provider::{KnownType, LookupResult, TypeProvider};

/// In-memory [`TypeProvider`] backed by a name-to-shape map.
///
/// This is the reference local-environment implementation. Tests register
/// exactly the types a scenario treats as natively available and leave
/// everything else unregistered to make it unknown; production callers can
/// capture an environment survey once and reload it from a JSON snapshot.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct LocalTypeRegistry {
    types: IndexMap<String, KnownType>,
}

impl LocalTypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type as natively available.
    ///
    /// Re-registering a name replaces the previous shape.
    pub fn register(&mut self, name: impl Into<String>, shape: KnownType) {
        let name = name.into();
        if self.types.insert(name.clone(), shape).is_some() {
            warn!(type_name = %name, "replaced registered type shape");
        }
    }

    /// Check whether a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Get the number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Serialize the registry to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing type registry")
    }

    /// Parse a registry from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("parsing type registry")
    }

    /// Write a JSON snapshot to disk.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        fs::write(path, json)
            .with_context(|| format!("writing registry snapshot to {}", path.display()))?;
        debug!(
            path = %path.display(),
            types = self.types.len(),
            "saved registry snapshot"
        );
        Ok(())
    }

    /// Load a registry from a JSON snapshot on disk.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading registry snapshot from {}", path.display()))?;
        let registry = Self::from_json(&json)?;
        debug!(
            path = %path.display(),
            types = registry.types.len(),
            "loaded registry snapshot"
        );
        Ok(registry)
    }
}

impl TypeProvider for LocalTypeRegistry {
    fn lookup(&self, name: &str) -> Result<LookupResult> {
        Ok(match self.types.get(name) {
            Some(shape) => LookupResult::Known(shape.clone()),
            None => LookupResult::Unknown,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry() {
        let registry = LocalTypeRegistry::new();
        assert_eq!(registry.len(), 0);
        assert!(registry.is_empty());
        assert!(!registry.contains("Anything"));
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = LocalTypeRegistry::new();
        registry.register("Customer", KnownType::new().with_field("id", "u64"));

        assert!(registry.contains("Customer"));
        assert_eq!(registry.len(), 1);

        let result = registry.lookup("Customer").unwrap();
        match result {
            LookupResult::Known(shape) => {
                assert_eq!(shape.fields.get("id").map(String::as_str), Some("u64"));
            }
            LookupResult::Unknown => panic!("registered type should be known"),
        }

        assert_eq!(registry.lookup("Order").unwrap(), LookupResult::Unknown);
    }

    #[test]
    fn test_reregister_replaces_shape() {
        let mut registry = LocalTypeRegistry::new();
        registry.register("T", KnownType::new().with_field("a", "i32"));
        registry.register("T", KnownType::new().with_field("a", "i64"));

        assert_eq!(registry.len(), 1);
        match registry.lookup("T").unwrap() {
            LookupResult::Known(shape) => {
                assert_eq!(shape.fields.get("a").map(String::as_str), Some("i64"));
            }
            LookupResult::Unknown => panic!("T should be known"),
        }
    }

    #[test]
    fn test_json_round_trip() {
        let mut registry = LocalTypeRegistry::new();
        registry.register(
            "Customer",
            KnownType::new()
                .with_field("id", "u64")
                .with_superclass("Party"),
        );
        registry.register("Party", KnownType::new().with_field("name", "string"));

        let json = registry.to_json().unwrap();
        let back = LocalTypeRegistry::from_json(&json).unwrap();
        assert_eq!(back.len(), 2);
        assert!(back.contains("Customer"));
        assert!(back.contains("Party"));
    }

    #[test]
    fn test_file_snapshot_round_trip() {
        let mut registry = LocalTypeRegistry::new();
        registry.register("Pet", KnownType::new().with_field("name", "string").as_interface());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.json");
        registry.save_to_file(&path).unwrap();

        let back = LocalTypeRegistry::load_from_file(&path).unwrap();
        assert!(back.contains("Pet"));
        match back.lookup("Pet").unwrap() {
            LookupResult::Known(shape) => assert!(shape.is_interface),
            LookupResult::Unknown => panic!("Pet should be known"),
        }
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(LocalTypeRegistry::load_from_file(&path).is_err());
    }
}
