//! Schema nodes: the immutable description of one named type.
//!
//! A [`SchemaNode`] records everything the wire metadata says about one
//! type: its fields in declaration order, an optional superclass name, the
//! interfaces it declares, and whether it is itself an interface. Nodes are
//! built through [`SchemaNodeBuilder`] and frozen by `build()`, which also
//! derives the canonical descriptor table used for every field comparison
//! later in resolution.

use indexmap::IndexMap;

use crate::type_ref::TypeRef;

/// One named type as described by decoded wire metadata.
///
/// Field order is the declaration order from the wire. When the same field
/// name appears twice, the later type reference wins but the field keeps
/// the position of its first occurrence, matching how the decoder folds
/// repeated attributes.
///
/// Superclass and interfaces are by-name references; the node set passed to
/// resolution is keyed by name and a referenced node may be shared by many
/// dependents. Interface nodes read their fields as required-accessor
/// contracts rather than storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaNode {
    name: String,
    fields: IndexMap<String, TypeRef>,
    superclass: Option<String>,
    interfaces: Vec<String>,
    is_interface: bool,
    descriptors: IndexMap<String, String>,
}

impl SchemaNode {
    /// Start building a class node.
    pub fn class(name: impl Into<String>) -> SchemaNodeBuilder {
        SchemaNodeBuilder::new(name.into(), false)
    }

    /// Start building an interface node.
    pub fn interface(name: impl Into<String>) -> SchemaNodeBuilder {
        SchemaNodeBuilder::new(name.into(), true)
    }

    /// The type name, unique within one resolution run.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &IndexMap<String, TypeRef> {
        &self.fields
    }

    /// The superclass name, if one was declared.
    pub fn superclass(&self) -> Option<&str> {
        self.superclass.as_deref()
    }

    /// Declared interfaces, first occurrence order.
    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    /// Whether this node describes an interface.
    pub fn is_interface(&self) -> bool {
        self.is_interface
    }

    /// Canonical descriptor table: field name to descriptor string, in
    /// field order. Computed once at construction and never mutated.
    pub fn descriptors(&self) -> &IndexMap<String, String> {
        &self.descriptors
    }

    /// Number of declared fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

/// Builder for [`SchemaNode`].
///
/// `build()` derives the descriptor table and freezes the node.
#[derive(Debug, Clone)]
pub struct SchemaNodeBuilder {
    name: String,
    fields: IndexMap<String, TypeRef>,
    superclass: Option<String>,
    interfaces: Vec<String>,
    is_interface: bool,
}

impl SchemaNodeBuilder {
    fn new(name: String, is_interface: bool) -> Self {
        Self {
            name,
            fields: IndexMap::new(),
            superclass: None,
            interfaces: Vec::new(),
            is_interface,
        }
    }

    /// Add a field. A repeated name keeps its original position and takes
    /// the new type reference.
    pub fn field(mut self, name: impl Into<String>, type_ref: impl Into<TypeRef>) -> Self {
        self.fields.insert(name.into(), type_ref.into());
        self
    }

    /// Set the superclass by name.
    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// Declare an implemented (or, for interfaces, extended) interface.
    /// Duplicates keep their first position.
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        let name = interface.into();
        if !self.interfaces.contains(&name) {
            self.interfaces.push(name);
        }
        self
    }

    /// Freeze into an immutable node, deriving the descriptor table.
    pub fn build(self) -> SchemaNode {
        let descriptors = self
            .fields
            .iter()
            .map(|(name, type_ref)| (name.clone(), type_ref.descriptor().to_string()))
            .collect();
        SchemaNode {
            name: self.name,
            fields: self.fields,
            superclass: self.superclass,
            interfaces: self.interfaces,
            is_interface: self.is_interface,
            descriptors,
        }
    }
}
