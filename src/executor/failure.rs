use std::fmt;

use crate::subprocess::ProcessError;

/// Everything known about the first command of a batch that failed.
#[derive(Debug)]
pub struct ExecutionFailure {
    /// The command text as it appeared in the batch.
    pub command: String,
    /// 1-based position of the command in its batch.
    pub position: usize,
    /// Why the process failed: non-zero exit, signal, or launch failure.
    pub error: ProcessError,
    pub stdout: String,
    pub stderr: String,
    /// `stdout` and `stderr` joined by a newline and trimmed.
    pub combined: String,
}

impl ExecutionFailure {
    pub fn new(
        command: impl Into<String>,
        position: usize,
        error: ProcessError,
        stdout: &str,
        stderr: &str,
    ) -> Self {
        let stdout = stdout.trim().to_string();
        let stderr = stderr.trim().to_string();
        let combined = format!("{stdout}\n{stderr}").trim().to_string();

        Self {
            command: command.into(),
            position,
            error,
            stdout,
            stderr,
            combined,
        }
    }
}

impl fmt::Display for ExecutionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "command {} failed: {}\nError: {}\nOutput: {}",
            self.position, self.command, self.error, self.combined
        )
    }
}

impl std::error::Error for ExecutionFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
