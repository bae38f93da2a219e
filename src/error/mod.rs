//! Errors that end an `alfred-cli` run
//!
//! Every variant is fatal: it is printed as `Error: <message>` and the process
//! exits with status 1. Variants raised after a command already failed carry
//! that failure so the user sees what went wrong first.

use std::io;
use thiserror::Error;

use crate::config::ConfigError;
use crate::executor::{ExecuteError, ExecutionFailure};
use crate::generation::GenerationError;
use crate::subprocess::UnsupportedPlatform;

#[derive(Debug, Error)]
pub enum AlfredError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    UnsupportedPlatform(#[from] UnsupportedPlatform),

    #[error("failed to generate command: {0}")]
    Generation(#[source] GenerationError),

    #[error("generated command is empty")]
    EmptyGeneration,

    #[error("failed to get confirmation: {source}{}", original_suffix(.original.as_deref()))]
    Confirmation {
        source: io::Error,
        original: Option<Box<ExecutionFailure>>,
    },

    #[error("execution failed: {0}")]
    Execution(#[source] ExecuteError),

    #[error("execution failed after {retries} retries: {failure}")]
    RetriesExhausted {
        retries: usize,
        #[source]
        failure: Box<ExecutionFailure>,
    },

    #[error("failed to generate fix: {source}\nOriginal error: {original}")]
    FixGeneration {
        source: GenerationError,
        original: Box<ExecutionFailure>,
    },

    #[error("generated fix is empty\nOriginal error: {original}")]
    EmptyFix { original: Box<ExecutionFailure> },

    #[error("fix execution cancelled\nOriginal error: {original}")]
    FixCancelled { original: Box<ExecutionFailure> },
}

impl AlfredError {
    /// The command failure this error followed, if any.
    pub fn original_failure(&self) -> Option<&ExecutionFailure> {
        match self {
            AlfredError::Confirmation { original, .. } => original.as_deref(),
            AlfredError::RetriesExhausted { failure, .. } => Some(failure),
            AlfredError::FixGeneration { original, .. }
            | AlfredError::EmptyFix { original }
            | AlfredError::FixCancelled { original } => Some(original),
            _ => None,
        }
    }
}

fn original_suffix(original: Option<&ExecutionFailure>) -> String {
    original
        .map(|failure| format!("\nOriginal error: {failure}"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subprocess::ProcessError;

    fn failure() -> Box<ExecutionFailure> {
        Box::new(ExecutionFailure::new(
            "ls /missing",
            1,
            ProcessError::ExitCode(2),
            "",
            "ls: /missing: No such file or directory",
        ))
    }

    const FAILURE_TEXT: &str = "command 1 failed: ls /missing\n\
                                Error: exit status 2\n\
                                Output: ls: /missing: No such file or directory";

    #[test]
    fn test_retries_exhausted_message() {
        let err = AlfredError::RetriesExhausted {
            retries: 2,
            failure: failure(),
        };
        assert_eq!(
            err.to_string(),
            format!("execution failed after 2 retries: {FAILURE_TEXT}")
        );
        assert!(err.original_failure().is_some());
    }

    #[test]
    fn test_fix_errors_carry_original_failure() {
        let cancelled = AlfredError::FixCancelled {
            original: failure(),
        };
        assert_eq!(
            cancelled.to_string(),
            format!("fix execution cancelled\nOriginal error: {FAILURE_TEXT}")
        );

        let empty = AlfredError::EmptyFix {
            original: failure(),
        };
        assert_eq!(
            empty.to_string(),
            format!("generated fix is empty\nOriginal error: {FAILURE_TEXT}")
        );

        let generation = AlfredError::FixGeneration {
            source: GenerationError::Api("model not loaded".to_string()),
            original: failure(),
        };
        assert_eq!(
            generation.to_string(),
            format!(
                "failed to generate fix: Ollama API error: model not loaded\n\
                 Original error: {FAILURE_TEXT}"
            )
        );
    }

    #[test]
    fn test_confirmation_error_with_and_without_original() {
        let first = AlfredError::Confirmation {
            source: io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"),
            original: None,
        };
        assert_eq!(
            first.to_string(),
            "failed to get confirmation: input closed"
        );
        assert!(first.original_failure().is_none());

        let during_fix = AlfredError::Confirmation {
            source: io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"),
            original: Some(failure()),
        };
        assert_eq!(
            during_fix.to_string(),
            format!("failed to get confirmation: input closed\nOriginal error: {FAILURE_TEXT}")
        );
    }

    #[test]
    fn test_simple_messages() {
        assert_eq!(
            AlfredError::EmptyGeneration.to_string(),
            "generated command is empty"
        );
        assert_eq!(
            AlfredError::UnsupportedPlatform(UnsupportedPlatform("haiku".to_string())).to_string(),
            "unsupported operating system: haiku"
        );
        assert_eq!(
            AlfredError::Execution(ExecuteError::EmptyBatch).to_string(),
            "execution failed: no commands to execute"
        );
    }
}
