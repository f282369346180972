use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::step::ActionKind;

/// Outcome of one step after alternative resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    /// Primary action landed.
    Applied,
    /// Precondition not met and no alternative declared; tree untouched.
    Skipped,
    /// Primary precondition not met; an alternative landed instead.
    FellBack,
    /// I/O error, unknown action, escaping path, or exhausted alternatives.
    Failed,
}

impl StepOutcome {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            StepOutcome::Applied => "applied",
            StepOutcome::Skipped => "skipped",
            StepOutcome::FellBack => "fell_back",
            StepOutcome::Failed => "failed",
        }
    }
}

/// One report row per plan step, in plan order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StepReport {
    pub action: ActionKind,
    pub path: String,
    pub outcome: StepOutcome,
    /// Human-readable description of what happened (or why it did not).
    pub detail: String,
}

/// Per-step outcome record returned by the executor. A failed row never
/// implies other rows were skipped; callers decide what failure means.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub steps: Vec<StepReport>,
    pub duration_ms: u64,
    pub plan_uuid: Option<Uuid>,
}

impl ExecutionReport {
    #[must_use]
    pub fn applied(&self) -> usize {
        self.count(StepOutcome::Applied)
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(StepOutcome::Skipped)
    }

    #[must_use]
    pub fn fell_back(&self) -> usize {
        self.count(StepOutcome::FellBack)
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(StepOutcome::Failed)
    }

    /// True when no row failed; skipped and fell-back rows are fine.
    #[must_use]
    pub fn ok(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, o: StepOutcome) -> usize {
        self.steps.iter().filter(|s| s.outcome == o).count()
    }
}

/// Result of a non-mutating preflight pass over a plan.
#[derive(Clone, Debug, Default)]
pub struct PreflightReport {
    pub ok: bool,
    pub warnings: Vec<String>,
    pub stops: Vec<String>,
}
