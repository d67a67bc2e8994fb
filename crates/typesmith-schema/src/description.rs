//! Decoded wire metadata, one step before schema nodes.
//!
//! [`TypeDescription`] mirrors the shape the wire decoder emits per type.
//! Converting into a [`SchemaNode`] is infallible: repeated fields and
//! interfaces fold by the node's own rules, and structural problems are
//! reported later by resolution, which can name the offending type.

use serde::{Deserialize, Serialize};

use crate::node::SchemaNode;
use crate::type_ref::TypeRef;

/// One field as it appears in decoded type metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescription {
    /// Field name
    pub name: String,

    /// Type reference: a primitive token or a composite type name
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
}

/// A type description as emitted by the wire decoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescription {
    /// Type name
    pub name: String,

    /// Fields in declaration order
    #[serde(default)]
    pub fields: Vec<FieldDescription>,

    /// Superclass name, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superclass: Option<String>,

    /// Declared interface names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,

    /// Whether this type is an interface
    #[serde(default, rename = "interface")]
    pub is_interface: bool,
}

impl TypeDescription {
    /// Create a description with no fields, superclass, or interfaces.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            is_interface: false,
        }
    }

    /// Append a field.
    pub fn with_field(mut self, name: impl Into<String>, type_ref: impl Into<TypeRef>) -> Self {
        self.fields.push(FieldDescription {
            name: name.into(),
            type_ref: type_ref.into(),
        });
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

    /// Mark this description as an interface.
    pub fn as_interface(mut self) -> Self {
        self.is_interface = true;
        self
    }
}

impl From<TypeDescription> for SchemaNode {
    fn from(desc: TypeDescription) -> Self {
        let mut builder = if desc.is_interface {
            SchemaNode::interface(desc.name)
        } else {
            SchemaNode::class(desc.name)
        };
        for field in desc.fields {
            builder = builder.field(field.name, field.type_ref);
        }
        if let Some(superclass) = desc.superclass {
            builder = builder.extends(superclass);
        }
        for interface in desc.interfaces {
            builder = builder.implements(interface);
        }
        builder.build()
    }
}
