//! Execution policy knobs.
//!
//! Defaults encode the documented best-effort batch-apply behavior; knobs
//! exist for callers that want stricter semantics.

/// Policy configuration consumed by the apply stage.
#[derive(Clone, Debug)]
pub struct Policy {
    /// When true, the first `failed` step stops the plan; the remaining steps
    /// are reported `skipped` with a "not attempted" detail. Default false:
    /// a failed step never aborts the plan.
    pub fail_fast: bool,
    /// When true (default), a step whose entire alternative chain fails to
    /// apply is reported `failed`. When false, it degrades to `skipped`,
    /// matching the permissive behavior of hand-written setup scripts.
    pub exhausted_alternatives_fail: bool,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            fail_fast: false,
            exhausted_alternatives_fail: true,
        }
    }
}
