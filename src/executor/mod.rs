//! Sequential batch execution
//!
//! Runs every command of a [`CommandBatch`] through the platform shell, in
//! order, in the directory the previous `cd` left behind. The first failure
//! stops the batch.

mod failure;
mod workdir;

pub use failure::ExecutionFailure;
pub use workdir::{home_dir, is_directory_change, WorkingDirectory};

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::command::CommandBatch;
use crate::interaction::ProgressDisplay;
use crate::subprocess::ShellRunner;

#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("no commands to execute")]
    EmptyBatch,

    #[error("failed to determine working directory: {0}")]
    WorkingDirectory(#[source] io::Error),

    #[error("{0}")]
    Failed(#[from] ExecutionFailure),
}

impl ExecuteError {
    /// The failed command, if this error is a command failure.
    pub fn into_failure(self) -> Result<ExecutionFailure, Self> {
        match self {
            ExecuteError::Failed(failure) => Ok(failure),
            other => Err(other),
        }
    }
}

pub struct ShellExecutor {
    shell: Arc<dyn ShellRunner>,
    display: Arc<dyn ProgressDisplay>,
}

impl ShellExecutor {
    pub fn new(shell: Arc<dyn ShellRunner>, display: Arc<dyn ProgressDisplay>) -> Self {
        Self { shell, display }
    }

    /// Run the batch starting from the process's current directory.
    pub async fn execute(&self, batch: &CommandBatch) -> Result<(), ExecuteError> {
        let start = std::env::current_dir().map_err(ExecuteError::WorkingDirectory)?;
        self.execute_from(batch, start).await
    }

    /// Run the batch starting from `start_dir`.
    pub async fn execute_from(
        &self,
        batch: &CommandBatch,
        start_dir: PathBuf,
    ) -> Result<(), ExecuteError> {
        if batch.is_empty() {
            return Err(ExecuteError::EmptyBatch);
        }

        let mut working_dir = WorkingDirectory::new(start_dir);
        let total = batch.len();

        self.display.info("\nExecuting commands...");
        self.display.rule();

        for (index, command) in batch.iter().enumerate() {
            let position = index + 1;
            if command.trim().is_empty() {
                debug!("Skipping blank command at position {}", position);
                continue;
            }

            if total > 1 {
                self.display
                    .progress(&format!("\n[{position}/{total}] Executing: {command}"));
            }

            debug!(
                shell = self.shell.shell_name(),
                "Running {:?} in {:?}",
                command,
                working_dir.path()
            );

            let output = match self.shell.run(command, working_dir.path()).await {
                Ok(output) => output,
                Err(error) => {
                    debug!("Command {} could not be launched: {}", position, error);
                    let failure = ExecutionFailure::new(command.as_str(), position, error, "", "");
                    return Err(failure.into());
                }
            };

            if let Some(error) = output.status.to_error() {
                debug!(
                    "Command {} failed after {:?}: {}",
                    position, output.duration, error
                );
                return Err(ExecutionFailure::new(
                    command.as_str(),
                    position,
                    error,
                    &output.stdout,
                    &output.stderr,
                )
                .into());
            }

            if is_directory_change(command) {
                working_dir.observe(command);
            }
        }

        self.display.rule();
        if total > 1 {
            self.display
                .success(&format!("All {total} commands completed successfully."));
        } else {
            self.display.success("Command completed.");
        }
        info!("Batch of {} command(s) completed", total);

        Ok(())
    }
}
