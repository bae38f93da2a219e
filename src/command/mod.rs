//! Command batches produced from model output
//!
//! A [`CommandBatch`] is the unit the rest of the tool works with: the
//! confirmation gate renders it, the executor runs it, and the repair loop
//! swaps it for a fix when something fails.

pub mod parser;

pub use parser::{parse_commands, strip_code_fences};

use std::fmt;

/// Ordered, never-empty list of shell commands. Insertion order is execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBatch {
    commands: Vec<String>,
}

impl CommandBatch {
    /// Build a batch from already-split commands. Returns `None` for an empty list.
    pub fn new(commands: Vec<String>) -> Option<Self> {
        if commands.is_empty() {
            None
        } else {
            Some(Self { commands })
        }
    }

    /// A batch holding exactly one command, used verbatim.
    pub fn single(command: impl Into<String>) -> Self {
        Self {
            commands: vec![command.into()],
        }
    }

    /// Parse raw generated text, stripping a surrounding code fence first.
    pub fn from_generated(text: &str) -> Self {
        parse_commands(&strip_code_fences(text))
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn is_single(&self) -> bool {
        self.commands.len() == 1
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.commands.iter()
    }
}

impl<'a> IntoIterator for &'a CommandBatch {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

impl fmt::Display for CommandBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let [only] = self.commands.as_slice() {
            return write!(f, "{only}");
        }
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}. {}", i + 1, command)?;
        }
        Ok(())
    }
}
