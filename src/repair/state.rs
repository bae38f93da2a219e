use crate::command::CommandBatch;
use crate::executor::ExecutionFailure;

/// Where the repair loop is.
///
/// `Succeeded` and `Cancelled` are terminal. Fatal outcomes are not states:
/// the transition function returns them as errors.
#[derive(Debug)]
pub enum RepairState {
    /// Asking the model for the first batch.
    Generating,
    /// Waiting for the user to approve `batch`. `repairing` holds the failure
    /// the batch is meant to fix, or `None` for the first batch.
    Confirming {
        batch: CommandBatch,
        repairing: Option<ExecutionFailure>,
    },
    Executing { batch: CommandBatch },
    /// Asking the model to fix `failure`.
    GeneratingFix { failure: ExecutionFailure },
    Succeeded,
    /// The user declined the first batch.
    Cancelled,
}

impl RepairState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RepairState::Succeeded | RepairState::Cancelled)
    }

    pub fn name(&self) -> &'static str {
        match self {
            RepairState::Generating => "generating",
            RepairState::Confirming { repairing, .. } if repairing.is_some() => "confirming-fix",
            RepairState::Confirming { .. } => "confirming",
            RepairState::Executing { .. } => "executing",
            RepairState::GeneratingFix { .. } => "generating-fix",
            RepairState::Succeeded => "succeeded",
            RepairState::Cancelled => "cancelled",
        }
    }
}

/// Fix attempts used so far out of the allowed maximum. Never reset within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    used: usize,
    max: usize,
}

impl RetryBudget {
    pub fn new(max: usize) -> Self {
        Self { used: 0, max }
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn is_exhausted(&self) -> bool {
        self.used >= self.max
    }

    /// Take one attempt and return its 1-based number, or `None` when none are left.
    pub fn consume(&mut self) -> Option<usize> {
        if self.is_exhausted() {
            return None;
        }
        self.used += 1;
        Some(self.used)
    }
}
