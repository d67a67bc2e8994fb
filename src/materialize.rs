//! Plan driver: hands each build step to a materializer, in order.

use tracing::debug;
use typesmith_resolver::{BuildPlan, BuildStep};

/// Backend that synthesizes one runtime type per build step.
///
/// Implementations are environment-specific;
/// [`RecordMaterializer`](crate::record::RecordMaterializer) is the
/// in-memory reference backend.
pub trait Materializer {
    /// Handle produced for each synthesized type.
    type Output;

    /// Failure type, surfaced unchanged by [`materialize_plan`].
    type Error;

    /// Synthesize the type for one step. Every dependency of the step was
    /// handed over in an earlier call.
    fn materialize(&mut self, step: &BuildStep) -> Result<Self::Output, Self::Error>;
}

/// Drive a materializer over a validated plan.
///
/// Visits each step exactly once, in plan order, so dependency handles
/// exist before their dependents are built. The first failure stops the
/// run and is returned unchanged; steps already completed are not rolled
/// back.
pub fn materialize_plan<M: Materializer>(
    plan: &BuildPlan,
    materializer: &mut M,
) -> Result<Vec<(String, M::Output)>, M::Error> {
    let mut outputs = Vec::with_capacity(plan.len());
    for step in plan.steps() {
        debug!("materializing {}", step.name());
        let output = materializer.materialize(step)?;
        outputs.push((step.name().to_string(), output));
    }
    Ok(outputs)
}
