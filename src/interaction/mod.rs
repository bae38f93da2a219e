//! User interaction: progress output and the confirmation gate
//!
//! Nothing is executed until the user has seen the exact commands and
//! answered yes.

pub mod display;
pub mod prompts;

pub use display::{ProgressDisplay, ProgressDisplayImpl};
pub use prompts::{is_affirmative, ConsolePrompter, UserPrompter};

use crate::command::CommandBatch;
use std::io;
use std::sync::Arc;

/// Question asked before any batch runs.
pub const CONFIRM_QUESTION: &str = "Execute these commands?";

/// Heading shown above a freshly generated batch.
pub const GENERATED_HEADING: &str = "Generated command(s):";

/// Heading shown above a batch proposed to repair a failure.
pub const FIX_HEADING: &str = "Suggested fix:";

/// Render a batch under a heading: one command bare, several as a numbered list.
pub fn render_batch(heading: &str, batch: &CommandBatch) -> String {
    format!("\n{heading}\n{batch}\n")
}

/// Shows a batch and asks for explicit approval.
#[derive(Clone)]
pub struct ConfirmationGate {
    prompter: Arc<dyn UserPrompter>,
    display: Arc<dyn ProgressDisplay>,
}

impl ConfirmationGate {
    pub fn new(prompter: Arc<dyn UserPrompter>, display: Arc<dyn ProgressDisplay>) -> Self {
        Self { prompter, display }
    }

    /// Returns `true` only if the user typed `y` or `yes`.
    pub async fn confirm(&self, heading: &str, batch: &CommandBatch) -> io::Result<bool> {
        self.display.info(&render_batch(heading, batch));
        let approved = self.prompter.prompt_yes_no(CONFIRM_QUESTION).await?;
        tracing::debug!(approved, commands = batch.len(), "Confirmation answered");
        Ok(approved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::mocks::{MockProgressDisplay, MockPrompter};
    use std::io::Cursor;

    #[test]
    fn test_render_single_command() {
        let rendered = render_batch(GENERATED_HEADING, &CommandBatch::single("ls -la"));
        assert_eq!(rendered, "\nGenerated command(s):\nls -la\n");
    }

    #[test]
    fn test_render_numbered_list() {
        let batch = CommandBatch::new(vec!["mkdir x".to_string(), "cd x".to_string()]).unwrap();
        let rendered = render_batch(FIX_HEADING, &batch);
        assert_eq!(rendered, "\nSuggested fix:\n1. mkdir x\n2. cd x\n");
    }

    #[tokio::test]
    async fn test_gate_shows_batch_then_asks() {
        let display = Arc::new(MockProgressDisplay::new());
        let prompter = Arc::new(MockPrompter::new(vec![true]));
        let gate = ConfirmationGate::new(prompter.clone(), display.clone());

        let approved = gate
            .confirm(GENERATED_HEADING, &CommandBatch::single("whoami"))
            .await
            .unwrap();

        assert!(approved);
        assert_eq!(
            display.get_messages(),
            vec!["INFO: \nGenerated command(s):\nwhoami\n".to_string()]
        );
        assert_eq!(prompter.questions(), vec![CONFIRM_QUESTION.to_string()]);
    }

    #[tokio::test]
    async fn test_gate_with_console_prompter_declines_on_no() {
        let display = Arc::new(MockProgressDisplay::new());
        let prompter = Arc::new(ConsolePrompter::new(Cursor::new(b"no\n".to_vec()), Vec::new()));
        let gate = ConfirmationGate::new(prompter, display);

        let approved = gate
            .confirm(GENERATED_HEADING, &CommandBatch::single("rm -rf build"))
            .await
            .unwrap();
        assert!(!approved);
    }

    #[tokio::test]
    async fn test_gate_propagates_closed_input() {
        let display = Arc::new(MockProgressDisplay::new());
        let prompter = Arc::new(ConsolePrompter::new(Cursor::new(Vec::new()), Vec::new()));
        let gate = ConfirmationGate::new(prompter, display);

        let err = gate
            .confirm(GENERATED_HEADING, &CommandBatch::single("ls"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
