use serde::{Deserialize, Serialize};

use super::step::Step;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ApplyMode {
    /// Evaluate every step against the current tree without writing anything.
    #[default]
    DryRun,
    Commit,
}

/// Raw input to `plan()`: the steps as supplied by the caller (hand-authored
/// or parsed from model output). Order is preserved verbatim.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PlanInput {
    pub steps: Vec<Step>,
}

/// An ordered sequence of steps. Constructed once, consumed exactly once by
/// `apply`; the executor holds no state across plans except the tree itself.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Plan {
    pub steps: Vec<Step>,
}

impl Plan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }
}
