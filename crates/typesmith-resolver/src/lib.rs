//! Schema Resolution Engine
//!
//! Turns decoded schema nodes into validated, dependency-ordered build
//! plans:
//!
//! - **Partitioning**: classify every supplied node as known or unknown
//!   through a [`TypeProvider`]
//! - **Resolution**: build the dependency graph over unknown nodes and
//!   reject unresolvable references
//! - **Validation**: reject cycles, field conflicts, and unsatisfied
//!   interfaces
//! - **Planning**: emit a deterministic [`BuildPlan`] whose steps carry
//!   merged field layouts
//!
//! A run either returns a complete plan or the first error; no partial
//! plan is ever produced. See [`graph`] for the engine and [`registry`]
//! for a file-backed provider useful in tests and tooling.

pub mod error;
pub mod graph;
pub mod plan;
pub mod provider;
pub mod registry;

pub use error::ResolveError;
pub use graph::{Origin, SchemaGraph};
pub use plan::{BuildPlan, BuildStep};
pub use provider::{KnownType, LookupResult, TypeProvider};
pub use registry::LocalTypeRegistry;

use typesmith_schema::{SchemaNode, TypeDescription};

/// Resolve a node set against a provider in one call.
///
/// Equivalent to [`SchemaGraph::build`] followed by
/// [`SchemaGraph::into_plan`].
pub fn resolve<P: TypeProvider>(
    nodes: Vec<SchemaNode>,
    provider: &P,
) -> Result<BuildPlan, ResolveError> {
    SchemaGraph::build(nodes, provider)?.into_plan()
}

/// Decode wire descriptions into schema nodes and resolve them.
pub fn resolve_descriptions<P: TypeProvider>(
    descriptions: Vec<TypeDescription>,
    provider: &P,
) -> Result<BuildPlan, ResolveError> {
    let nodes = descriptions.into_iter().map(SchemaNode::from).collect();
    resolve(nodes, provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use typesmith_schema::Primitive;

    #[test]
    fn test_resolve_orders_dependencies() {
        let nodes = vec![
            SchemaNode::class("B")
                .field("a", "A")
                .field("b", Primitive::I32)
                .build(),
            SchemaNode::class("A").field("a", Primitive::I32).build(),
        ];
        let plan = resolve(nodes, &LocalTypeRegistry::new()).unwrap();
        assert_eq!(plan.names(), vec!["A", "B"]);
    }

    #[test]
    fn test_resolve_descriptions_decodes_wire_form() {
        let json = r#"[
            {"name": "B", "fields": [{"name": "a", "type": "A"}]},
            {"name": "A", "fields": [{"name": "x", "type": "i64"}]}
        ]"#;
        let descriptions: Vec<TypeDescription> = serde_json::from_str(json).unwrap();
        let plan = resolve_descriptions(descriptions, &LocalTypeRegistry::new()).unwrap();
        assert_eq!(plan.names(), vec!["A", "B"]);
    }
}
