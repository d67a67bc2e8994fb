//! Typesmith
//!
//! Wire-format schema resolution and type synthesis planning:
//!
//! - **Schema model**: ordered field tables with canonical type
//!   descriptors ([`typesmith_schema`])
//! - **Resolution**: availability partitioning, dependency graphs, and
//!   validation ([`typesmith_resolver`])
//! - **Materialization**: drive a [`Materializer`] over a validated
//!   [`BuildPlan`], dependencies first
//!
//! See [`materialize`] for the plan driver and [`record`] for the
//! in-memory reference materializer.

pub mod materialize;
pub mod record;

pub use typesmith_resolver::{
    resolve, resolve_descriptions, BuildPlan, BuildStep, KnownType, LocalTypeRegistry,
    LookupResult, Origin, ResolveError, SchemaGraph, TypeProvider,
};
pub use typesmith_schema::{
    FieldDescription, Primitive, SchemaNode, SchemaNodeBuilder, TypeDescription, TypeRef,
};

pub use materialize::{materialize_plan, Materializer};
pub use record::{RecordMaterializer, RecordType};
