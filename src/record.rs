//! In-memory reference materializer producing plain record descriptions.

use anyhow::bail;
use indexmap::IndexMap;
use typesmith_resolver::BuildStep;

use crate::materialize::Materializer;

/// A synthesized record: the final flattened field table of one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordType {
    /// Type name
    pub name: String,
    /// Field name to canonical descriptor, inherited fields included
    pub layout: IndexMap<String, String>,
    /// Whether the record stands for an interface
    pub is_interface: bool,
}

impl RecordType {
    /// Descriptor of a field, if present.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.layout.get(name).map(String::as_str)
    }
}

/// Materializer that keeps every synthesized record in memory.
///
/// Useful in tests and for callers that only need final layouts rather
/// than live runtime types.
#[derive(Debug, Default)]
pub struct RecordMaterializer {
    produced: IndexMap<String, RecordType>,
}

impl RecordMaterializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record synthesized for a name, if any.
    pub fn get(&self, name: &str) -> Option<&RecordType> {
        self.produced.get(name)
    }

    /// Number of synthesized records.
    pub fn len(&self) -> usize {
        self.produced.len()
    }

    /// Check if nothing was synthesized.
    pub fn is_empty(&self) -> bool {
        self.produced.is_empty()
    }
}

impl Materializer for RecordMaterializer {
    type Output = RecordType;
    type Error = anyhow::Error;

    fn materialize(&mut self, step: &BuildStep) -> Result<RecordType, anyhow::Error> {
        let name = step.name().to_string();
        if self.produced.contains_key(&name) {
            bail!("type {} already materialized", name);
        }
        let record = RecordType {
            name: name.clone(),
            layout: step.layout.clone(),
            is_interface: step.node.is_interface(),
        };
        self.produced.insert(name, record.clone());
        Ok(record)
    }
}
