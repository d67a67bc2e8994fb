//! Availability oracle: is a type natively present in the local environment?

use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// What the environment knows about one natively available type.
///
/// Field tables map field name to canonical descriptor, in declaration
/// order. For interfaces the table lists required accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownType {
    /// Field name to descriptor, declaration order
    #[serde(default)]
    pub fields: IndexMap<String, String>,

    /// Superclass name, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superclass: Option<String>,

    /// Declared interface names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,

    /// Whether the type is an interface
    #[serde(default)]
    pub is_interface: bool,
}

impl KnownType {
    /// Create an empty shape.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field with its canonical descriptor.
    pub fn with_field(mut self, name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        self.fields.insert(name.into(), descriptor.into());
        self
    }

    /// Set the superclass name.
    pub fn with_superclass(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// Append a declared interface name.
    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Mark the shape as an interface.
    pub fn as_interface(mut self) -> Self {
        self.is_interface = true;
        self
    }
}

/// Outcome of an availability lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult {
    /// The type is natively available; its real shape is attached.
    Known(KnownType),
    /// The type is absent locally and must be synthesized.
    Unknown,
}

impl LookupResult {
    /// Check whether the lookup found a native type.
    pub fn is_known(&self) -> bool {
        matches!(self, LookupResult::Known(_))
    }
}

/// Trait answering type availability queries.
///
/// Implementations must answer consistently within one resolution run; the
/// engine memoizes lookups so each name is queried at most once per run,
/// but two runs against a changed environment may legitimately disagree.
///
/// A lookup failure (a backing store that cannot answer) is an error, not
/// [`LookupResult::Unknown`]. The run aborts rather than treating the type
/// as synthesizable.
pub trait TypeProvider {
    /// Report whether `name` is natively available, and its shape if so.
    fn lookup(&self, name: &str) -> Result<LookupResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_type_builder() {
        let shape = KnownType::new()
            .with_field("id", "u64")
            .with_field("name", "string")
            .with_superclass("Document")
            .with_interface("Auditable");

        assert_eq!(shape.fields.len(), 2);
        assert_eq!(shape.fields.get("id").map(String::as_str), Some("u64"));
        assert_eq!(shape.superclass.as_deref(), Some("Document"));
        assert!(!shape.is_interface);
    }

    #[test]
    fn test_interface_shape() {
        let shape = KnownType::new().with_field("name", "string").as_interface();
        assert!(shape.is_interface);
    }

    #[test]
    fn test_lookup_result_is_known() {
        assert!(LookupResult::Known(KnownType::new()).is_known());
        assert!(!LookupResult::Unknown.is_known());
    }
}
