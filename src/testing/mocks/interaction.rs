//! Mock prompter and display

use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use crate::interaction::{ProgressDisplay, UserPrompter};

/// Prompter that answers from a fixed queue of responses.
///
/// Once the queue is empty every prompt fails as if stdin were closed.
#[derive(Clone)]
pub struct MockPrompter {
    answers: Arc<Mutex<VecDeque<bool>>>,
    questions: Arc<Mutex<Vec<String>>>,
}

impl MockPrompter {
    pub fn new(answers: Vec<bool>) -> Self {
        Self {
            answers: Arc::new(Mutex::new(answers.into())),
            questions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserPrompter for MockPrompter {
    async fn prompt_yes_no(&self, message: &str) -> io::Result<bool> {
        self.questions.lock().unwrap().push(message.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more scripted answers"))
    }
}

/// Display that records messages instead of printing them.
#[derive(Clone, Default)]
pub struct MockProgressDisplay {
    messages: Arc<Mutex<Vec<String>>>,
}

impl MockProgressDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    fn push(&self, message: String) {
        self.messages.lock().unwrap().push(message);
    }
}

impl ProgressDisplay for MockProgressDisplay {
    fn info(&self, message: &str) {
        self.push(format!("INFO: {message}"));
    }

    fn warning(&self, message: &str) {
        self.push(format!("WARN: {message}"));
    }

    fn progress(&self, message: &str) {
        self.push(format!("PROGRESS: {message}"));
    }

    fn success(&self, message: &str) {
        self.push(format!("SUCCESS: {message}"));
    }

    fn rule(&self) {
        self.push("RULE".to_string());
    }
}
