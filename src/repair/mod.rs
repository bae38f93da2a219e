//! Generate, confirm, execute, and repair
//!
//! The loop is an explicit state machine. [`RepairLoop::step`] performs one
//! transition; [`RepairLoop::run`] drives it from `Generating` to a terminal
//! state or a fatal error. Every batch, first or fix, goes through the
//! confirmation gate before it runs.

mod state;

pub use state::{RepairState, RetryBudget};

use std::sync::Arc;
use tracing::debug;

use crate::command::{strip_code_fences, CommandBatch};
use crate::error::AlfredError;
use crate::executor::ShellExecutor;
use crate::generation::CommandGenerator;
use crate::interaction::{ConfirmationGate, ProgressDisplay, FIX_HEADING, GENERATED_HEADING};

/// Fix cycles allowed per invocation.
pub const DEFAULT_MAX_RETRIES: usize = 2;

/// How a run ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairOutcome {
    /// A batch ran to completion after `retries_used` fix cycles.
    Completed { retries_used: usize },
    /// The user declined the first batch.
    Cancelled,
}

pub struct RepairLoop {
    generator: Arc<dyn CommandGenerator>,
    gate: ConfirmationGate,
    executor: ShellExecutor,
    display: Arc<dyn ProgressDisplay>,
    system_prompt: String,
    env_context: String,
    max_retries: usize,
}

impl RepairLoop {
    pub fn new(
        generator: Arc<dyn CommandGenerator>,
        gate: ConfirmationGate,
        executor: ShellExecutor,
        display: Arc<dyn ProgressDisplay>,
    ) -> Self {
        Self {
            generator,
            gate,
            executor,
            display,
            system_prompt: String::new(),
            env_context: String::new(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    /// Formatted environment block passed to the first generation.
    pub fn with_env_context(mut self, env_context: impl Into<String>) -> Self {
        self.env_context = env_context.into();
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Run the whole loop for one query.
    pub async fn run(&self, query: &str) -> Result<RepairOutcome, AlfredError> {
        let mut budget = RetryBudget::new(self.max_retries);
        let mut state = RepairState::Generating;

        while !state.is_terminal() {
            let from = state.name();
            state = self.step(state, query, &mut budget).await?;
            debug!("Repair loop: {} -> {}", from, state.name());
        }

        match state {
            RepairState::Cancelled => {
                self.display.info("Command execution cancelled.");
                Ok(RepairOutcome::Cancelled)
            }
            _ => Ok(RepairOutcome::Completed {
                retries_used: budget.used(),
            }),
        }
    }

    /// Perform one transition.
    pub async fn step(
        &self,
        state: RepairState,
        query: &str,
        budget: &mut RetryBudget,
    ) -> Result<RepairState, AlfredError> {
        match state {
            RepairState::Generating => {
                self.display.progress("Generating command...");
                let text = self
                    .generator
                    .generate(&self.system_prompt, query, &self.env_context)
                    .await
                    .map_err(AlfredError::Generation)?;

                let batch = parse_generated(&text).ok_or(AlfredError::EmptyGeneration)?;
                Ok(RepairState::Confirming {
                    batch,
                    repairing: None,
                })
            }

            RepairState::Confirming { batch, repairing } => {
                let heading = if repairing.is_some() {
                    FIX_HEADING
                } else {
                    GENERATED_HEADING
                };

                let approved = match self.gate.confirm(heading, &batch).await {
                    Ok(approved) => approved,
                    Err(source) => {
                        return Err(AlfredError::Confirmation {
                            source,
                            original: repairing.map(Box::new),
                        })
                    }
                };

                match (approved, repairing) {
                    (true, _) => Ok(RepairState::Executing { batch }),
                    (false, None) => Ok(RepairState::Cancelled),
                    (false, Some(failure)) => Err(AlfredError::FixCancelled {
                        original: Box::new(failure),
                    }),
                }
            }

            RepairState::Executing { batch } => {
                let error = match self.executor.execute(&batch).await {
                    Ok(()) => return Ok(RepairState::Succeeded),
                    Err(error) => error,
                };

                let failure = error.into_failure().map_err(AlfredError::Execution)?;
                let Some(attempt) = budget.consume() else {
                    return Err(AlfredError::RetriesExhausted {
                        retries: budget.max(),
                        failure: Box::new(failure),
                    });
                };

                debug!("Command {} failed: {}", failure.position, failure.error);
                self.display.warning(&format!(
                    "Command failed. Attempting to generate a fix (attempt {}/{})...",
                    attempt,
                    budget.max()
                ));
                Ok(RepairState::GeneratingFix { failure })
            }

            RepairState::GeneratingFix { failure } => {
                let text = match self
                    .generator
                    .fix(query, &failure.command, &failure.combined)
                    .await
                {
                    Ok(text) => text,
                    Err(source) => {
                        return Err(AlfredError::FixGeneration {
                            source,
                            original: Box::new(failure),
                        })
                    }
                };

                match parse_generated(&text) {
                    Some(batch) => Ok(RepairState::Confirming {
                        batch,
                        repairing: Some(failure),
                    }),
                    None => Err(AlfredError::EmptyFix {
                        original: Box::new(failure),
                    }),
                }
            }

            terminal @ (RepairState::Succeeded | RepairState::Cancelled) => Ok(terminal),
        }
    }
}

/// `None` when nothing is left once fences are removed.
fn parse_generated(text: &str) -> Option<CommandBatch> {
    if strip_code_fences(text).is_empty() {
        return None;
    }
    Some(CommandBatch::from_generated(text))
}
