//! Materialization driver tests
//!
//! Test coverage areas:
//! - Step ordering and one-call-per-node guarantees
//! - Failure propagation (first error stops the run, unchanged)
//! - Record backend output (layouts, interface flags, duplicates)

use anyhow::{anyhow, bail};
use typesmith::{
    materialize_plan, resolve, BuildStep, KnownType, LocalTypeRegistry, Materializer, Primitive,
    RecordMaterializer, SchemaNode,
};

fn empty_registry() -> LocalTypeRegistry {
    LocalTypeRegistry::new()
}

/// Backend that fails on one configured name and counts every call.
struct TripwireMaterializer {
    fail_on: String,
    calls: Vec<String>,
}

impl TripwireMaterializer {
    fn new(fail_on: &str) -> Self {
        Self {
            fail_on: fail_on.to_string(),
            calls: Vec::new(),
        }
    }
}

impl Materializer for TripwireMaterializer {
    type Output = ();
    type Error = anyhow::Error;

    fn materialize(&mut self, step: &BuildStep) -> Result<(), anyhow::Error> {
        self.calls.push(step.name().to_string());
        if step.name() == self.fail_on {
            return Err(anyhow!("backend rejected {}", step.name()));
        }
        Ok(())
    }
}

// =============================================================================
// Driver Tests
// =============================================================================

mod driver_tests {
    use super::*;

    #[test]
    fn test_each_step_visited_once_in_order() {
        let nodes = vec![
            SchemaNode::class("C").field("b", "B").build(),
            SchemaNode::class("B").field("a", "A").build(),
            SchemaNode::class("A").build(),
        ];
        let plan = resolve(nodes, &empty_registry()).unwrap();

        let mut backend = TripwireMaterializer::new("never");
        let outputs = materialize_plan(&plan, &mut backend).unwrap();

        assert_eq!(backend.calls, vec!["A", "B", "C"]);
        let names: Vec<&str> = outputs.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_first_failure_stops_the_run() {
        let nodes = vec![
            SchemaNode::class("C").field("b", "B").build(),
            SchemaNode::class("B").field("a", "A").build(),
            SchemaNode::class("A").build(),
        ];
        let plan = resolve(nodes, &empty_registry()).unwrap();

        let mut backend = TripwireMaterializer::new("B");
        let err = materialize_plan(&plan, &mut backend).unwrap_err();

        // A succeeded, B failed, C was never attempted
        assert_eq!(backend.calls, vec!["A", "B"]);
        assert_eq!(err.to_string(), "backend rejected B");
    }

    #[test]
    fn test_empty_plan_never_calls_backend() {
        let mut registry = LocalTypeRegistry::new();
        registry.register("K", KnownType::new());
        let plan = resolve(vec![SchemaNode::class("K").build()], &registry).unwrap();

        let mut backend = TripwireMaterializer::new("never");
        let outputs = materialize_plan(&plan, &mut backend).unwrap();
        assert!(outputs.is_empty());
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn test_backend_error_type_is_callers_choice() {
        struct StringError;
        impl Materializer for StringError {
            type Output = ();
            type Error = String;
            fn materialize(&mut self, step: &BuildStep) -> Result<(), String> {
                Err(format!("no backend for {}", step.name()))
            }
        }

        let plan = resolve(vec![SchemaNode::class("T").build()], &empty_registry()).unwrap();
        let err = materialize_plan(&plan, &mut StringError).unwrap_err();
        assert_eq!(err, "no backend for T");
    }
}

// =============================================================================
// Record Backend Tests
// =============================================================================

mod record_backend_tests {
    use super::*;

    #[test]
    fn test_records_carry_merged_layouts() {
        let mut registry = LocalTypeRegistry::new();
        registry.register("Base", KnownType::new().with_field("id", "u64"));

        let nodes = vec![
            SchemaNode::interface("Named").field("name", Primitive::Str).build(),
            SchemaNode::class("User")
                .extends("Base")
                .implements("Named")
                .field("name", Primitive::Str)
                .field("age", Primitive::U8)
                .build(),
        ];
        let plan = resolve(nodes, &registry).unwrap();

        let mut backend = RecordMaterializer::new();
        materialize_plan(&plan, &mut backend).unwrap();

        assert_eq!(backend.len(), 2);
        let user = backend.get("User").unwrap();
        assert_eq!(user.field("id"), Some("u64"));
        assert_eq!(user.field("name"), Some("string"));
        assert_eq!(user.field("age"), Some("u8"));
        assert!(!user.is_interface);
        assert!(backend.get("Named").unwrap().is_interface);
    }

    #[test]
    fn test_replaying_a_plan_into_same_backend_fails() {
        let plan = resolve(vec![SchemaNode::class("T").build()], &empty_registry()).unwrap();

        let mut backend = RecordMaterializer::new();
        materialize_plan(&plan, &mut backend).unwrap();
        let err = materialize_plan(&plan, &mut backend).unwrap_err();
        assert!(err.to_string().contains("already materialized"));
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn test_end_to_end_wire_to_records() {
        let json = r#"[
            {"name": "Order", "fields": [
                {"name": "customer", "type": "Customer"},
                {"name": "total", "type": "u64"}
            ]},
            {"name": "Customer", "fields": [{"name": "name", "type": "string"}]}
        ]"#;
        let descriptions: Vec<typesmith::TypeDescription> = serde_json::from_str(json).unwrap();
        let plan =
            typesmith::resolve_descriptions(descriptions, &empty_registry()).unwrap();

        let mut backend = RecordMaterializer::new();
        let outputs = materialize_plan(&plan, &mut backend).unwrap();

        let names: Vec<&str> = outputs.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["Customer", "Order"]);
        assert_eq!(
            backend.get("Order").unwrap().field("customer"),
            Some("Customer")
        );
    }
}

// =============================================================================
// Failure Edge Tests
// =============================================================================

mod failure_edge_tests {
    use super::*;

    /// Backend that always refuses interfaces.
    struct ClassesOnly;

    impl Materializer for ClassesOnly {
        type Output = String;
        type Error = anyhow::Error;

        fn materialize(&mut self, step: &BuildStep) -> Result<String, anyhow::Error> {
            if step.node.is_interface() {
                bail!("interfaces unsupported");
            }
            Ok(step.name().to_string())
        }
    }

    #[test]
    fn test_error_surfaces_before_later_steps() {
        let nodes = vec![
            SchemaNode::interface("Named").field("name", Primitive::Str).build(),
            SchemaNode::class("User")
                .implements("Named")
                .field("name", Primitive::Str)
                .build(),
        ];
        let plan = resolve(nodes, &empty_registry()).unwrap();

        // The interface orders first and the run dies there
        let err = materialize_plan(&plan, &mut ClassesOnly).unwrap_err();
        assert_eq!(err.to_string(), "interfaces unsupported");
    }
}
