//! Build plans, the ordered output of a successful resolution run.

use indexmap::IndexMap;
use typesmith_schema::SchemaNode;

/// One synthesis step: the node to build plus its validated field layout.
///
/// The layout includes inherited fields, root-most first, each mapped to
/// its canonical descriptor. Everything a materializer needs is in the
/// step; dependencies of this node always appear earlier in the plan.
#[derive(Debug, Clone)]
pub struct BuildStep {
    /// The schema node to synthesize
    pub node: SchemaNode,
    /// Field name to canonical descriptor, inherited fields included
    pub layout: IndexMap<String, String>,
}

impl BuildStep {
    /// Name of the node this step builds.
    pub fn name(&self) -> &str {
        self.node.name()
    }
}

/// Dependency-ordered synthesis plan over one run's unknown nodes.
///
/// Known nodes never appear. A run whose nodes are all known produces an
/// empty plan, and the plan for equal inputs is always identical.
#[derive(Debug, Clone, Default)]
pub struct BuildPlan {
    steps: Vec<BuildStep>,
}

impl BuildPlan {
    pub(crate) fn from_steps(steps: Vec<BuildStep>) -> Self {
        Self { steps }
    }

    /// Steps in dependency order.
    pub fn steps(&self) -> &[BuildStep] {
        &self.steps
    }

    /// Node names in plan order.
    pub fn names(&self) -> Vec<&str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    /// Number of planned nodes.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if nothing needs to be built.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
