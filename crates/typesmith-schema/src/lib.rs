//! Schema data model for the typesmith workspace.
//!
//! This crate provides the foundational types shared by the resolver and
//! materializer layers:
//! - [`Primitive`] / [`TypeRef`] - field type references and their canonical
//!   descriptor strings
//! - [`SchemaNode`] - the immutable description of one named type
//! - [`TypeDescription`] - the serde layer mirroring decoded wire metadata
//!
//! It is pure data: no I/O and no fallible constructors. Aggregate validity
//! (unresolvable references, cycles, conflicting redefinitions) is the
//! resolver crate's concern.

pub mod description;
pub mod node;
pub mod primitive;
pub mod type_ref;

// Re-export the core types at crate root
pub use description::{FieldDescription, TypeDescription};
pub use node::{SchemaNode, SchemaNodeBuilder};
pub use primitive::Primitive;
pub use type_ref::TypeRef;
