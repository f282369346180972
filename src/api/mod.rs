// Facade for API module; delegates to submodules under src/api/

use std::path::Path;

use crate::logging::{AuditSink, FactsEmitter};
use crate::policy::Policy;
use crate::types::{ApplyMode, ExecutionReport, Plan, PlanInput, PreflightReport};

mod apply;
pub mod errors;
pub mod parse;
mod plan;
mod preflight;

pub use parse::parse_steps;

/// The edit-plan executor. Generic over a structured facts stream and a
/// human-readable audit sink; `NullSink` serves as a no-op for both.
pub struct Patchplan<E: FactsEmitter, A: AuditSink> {
    facts: E,
    audit: A,
    policy: Policy,
}

impl<E: FactsEmitter, A: AuditSink> Patchplan<E, A> {
    pub fn new(facts: E, audit: A, policy: Policy) -> Self {
        Self {
            facts,
            audit,
            policy,
        }
    }

    #[must_use]
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.policy.fail_fast = fail_fast;
        self
    }

    /// Build a plan from input, preserving step order, and emit plan facts.
    pub fn plan(&self, input: PlanInput) -> Plan {
        plan::build(self, input)
    }

    /// Assess a plan against the tree under `root` without mutating anything.
    pub fn preflight(&self, plan: &Plan, root: &Path) -> Result<PreflightReport, errors::ApiError> {
        check_root(root)?;
        Ok(preflight::run(self, plan, root))
    }

    /// Apply a plan under `root`. Per-step failures land in the report, never
    /// in `Err`; the only `Err` is a non-absolute root.
    pub fn apply(
        &self,
        plan: &Plan,
        root: &Path,
        mode: ApplyMode,
    ) -> Result<ExecutionReport, errors::ApiError> {
        check_root(root)?;
        Ok(apply::run(self, plan, root, mode))
    }
}

fn check_root(root: &Path) -> Result<(), errors::ApiError> {
    if !root.is_absolute() {
        return Err(errors::ApiError::InvalidRoot(format!(
            "root must be absolute, got {}",
            root.display()
        )));
    }
    Ok(())
}
