//! User prompting implementation

use async_trait::async_trait;
use std::io::{self, BufRead, Write};
use std::sync::Mutex;

/// Trait for user prompting
#[async_trait]
pub trait UserPrompter: Send + Sync {
    /// Ask a yes/no question that defaults to "no".
    ///
    /// Fails when the input stream cannot be read or is already closed.
    async fn prompt_yes_no(&self, message: &str) -> io::Result<bool>;
}

/// True only for `y` or `yes`, ignoring case and surrounding whitespace.
pub fn is_affirmative(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

enum Input {
    Stdin,
    Reader(Box<dyn BufRead + Send>),
}

impl Input {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        match self {
            // Process-wide handle, not a private BufReader: keeps at most
            // std's shared buffer between us and subprocesses that inherit stdin.
            Input::Stdin => io::stdin().read_line(buf),
            Input::Reader(reader) => reader.read_line(buf),
        }
    }
}

/// Prompter that writes questions to `W` and reads one line per answer.
pub struct ConsolePrompter<W> {
    input: Mutex<Input>,
    output: Mutex<W>,
}

impl ConsolePrompter<io::Stdout> {
    pub fn stdio() -> Self {
        Self {
            input: Mutex::new(Input::Stdin),
            output: Mutex::new(io::stdout()),
        }
    }
}

impl<W: Write + Send> ConsolePrompter<W> {
    pub fn new(reader: impl BufRead + Send + 'static, output: W) -> Self {
        Self {
            input: Mutex::new(Input::Reader(Box::new(reader))),
            output: Mutex::new(output),
        }
    }

    pub fn into_output(self) -> W {
        self.output
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read_answer(&self) -> io::Result<String> {
        let mut input = self
            .input
            .lock()
            .map_err(|_| io::Error::other("prompt input lock poisoned"))?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input stream closed before an answer was given",
            ));
        }
        Ok(line)
    }
}

#[async_trait]
impl<W: Write + Send> UserPrompter for ConsolePrompter<W> {
    async fn prompt_yes_no(&self, message: &str) -> io::Result<bool> {
        {
            let mut output = self
                .output
                .lock()
                .map_err(|_| io::Error::other("prompt output lock poisoned"))?;
            write!(output, "{message} [y/N]: ")?;
            output.flush()?;
        }

        let answer = self.read_answer()?;
        tracing::trace!("Prompt answer: {:?}", answer.trim());
        Ok(is_affirmative(&answer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Cursor;

    #[test]
    fn test_is_affirmative_accepts_y_and_yes() {
        for input in ["y", "yes", "Y", "YES", "Yes", " y\n", "yes\r\n", "Y "] {
            assert!(is_affirmative(input), "expected {input:?} to be accepted");
        }
    }

    #[test]
    fn test_is_affirmative_rejects_everything_else() {
        for input in ["", "\n", "n", "no", "yess", "ye", "yes please", "1", "true"] {
            assert!(!is_affirmative(input), "expected {input:?} to be rejected");
        }
    }

    #[tokio::test]
    async fn test_console_prompter_reads_one_line() {
        let prompter = ConsolePrompter::new(Cursor::new(b"yes\nno\n".to_vec()), Vec::new());

        assert!(prompter.prompt_yes_no("Continue?").await.unwrap());
        assert!(!prompter.prompt_yes_no("Continue?").await.unwrap());

        let output = String::from_utf8(prompter.into_output()).unwrap();
        assert_eq!(output, "Continue? [y/N]: Continue? [y/N]: ");
    }

    #[tokio::test]
    async fn test_console_prompter_empty_line_is_no() {
        let prompter = ConsolePrompter::new(Cursor::new(b"\n".to_vec()), Vec::new());
        assert!(!prompter.prompt_yes_no("Continue?").await.unwrap());
    }

    #[tokio::test]
    async fn test_console_prompter_accepts_answer_without_newline() {
        let prompter = ConsolePrompter::new(Cursor::new(b"y".to_vec()), Vec::new());
        assert!(prompter.prompt_yes_no("Continue?").await.unwrap());
    }

    #[tokio::test]
    async fn test_console_prompter_closed_input_is_an_error() {
        let prompter = ConsolePrompter::new(Cursor::new(Vec::new()), Vec::new());
        let err = prompter.prompt_yes_no("Continue?").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    proptest! {
        #[test]
        fn prop_is_affirmative_matches_normalized_tokens(input in "[ \tyYeEsSnNoO]{0,6}") {
            let normalized = input.trim().to_lowercase();
            prop_assert_eq!(
                is_affirmative(&input),
                normalized == "y" || normalized == "yes"
            );
        }
    }
}
