//! Mock command generator

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::generation::{CommandGenerator, GenerationError};

/// Arguments of one `generate` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateCall {
    pub system_prompt: String,
    pub query: String,
    pub env_context: String,
}

/// Arguments of one `fix` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixCall {
    pub original_query: String,
    pub failed_command: String,
    pub failure_output: String,
}

type Responses = Arc<Mutex<VecDeque<Result<String, GenerationError>>>>;

/// Builder for creating configured mock generators
pub struct MockGeneratorBuilder {
    generations: VecDeque<Result<String, GenerationError>>,
    fixes: VecDeque<Result<String, GenerationError>>,
}

impl MockGeneratorBuilder {
    pub fn new() -> Self {
        Self {
            generations: VecDeque::new(),
            fixes: VecDeque::new(),
        }
    }

    pub fn with_generation(mut self, text: &str) -> Self {
        self.generations.push_back(Ok(text.to_string()));
        self
    }

    pub fn with_generation_error(mut self, error: GenerationError) -> Self {
        self.generations.push_back(Err(error));
        self
    }

    pub fn with_fix(mut self, text: &str) -> Self {
        self.fixes.push_back(Ok(text.to_string()));
        self
    }

    pub fn with_fix_error(mut self, error: GenerationError) -> Self {
        self.fixes.push_back(Err(error));
        self
    }

    pub fn build(self) -> MockGenerator {
        MockGenerator {
            generations: Arc::new(Mutex::new(self.generations)),
            fixes: Arc::new(Mutex::new(self.fixes)),
            generate_calls: Arc::new(Mutex::new(Vec::new())),
            fix_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Default for MockGeneratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Generator that replays scripted responses in order and records every call.
///
/// Running out of scripted responses is reported as an API error.
#[derive(Clone)]
pub struct MockGenerator {
    generations: Responses,
    fixes: Responses,
    generate_calls: Arc<Mutex<Vec<GenerateCall>>>,
    fix_calls: Arc<Mutex<Vec<FixCall>>>,
}

impl MockGenerator {
    pub fn builder() -> MockGeneratorBuilder {
        MockGeneratorBuilder::new()
    }

    pub fn generate_calls(&self) -> Vec<GenerateCall> {
        self.generate_calls.lock().unwrap().clone()
    }

    pub fn fix_calls(&self) -> Vec<FixCall> {
        self.fix_calls.lock().unwrap().clone()
    }

    fn next(responses: &Responses, kind: &str) -> Result<String, GenerationError> {
        responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::Api(format!("no scripted {kind} response"))))
    }
}

#[async_trait]
impl CommandGenerator for MockGenerator {
    async fn generate(
        &self,
        system_prompt: &str,
        query: &str,
        env_context: &str,
    ) -> Result<String, GenerationError> {
        let call = GenerateCall {
            system_prompt: system_prompt.to_string(),
            query: query.to_string(),
            env_context: env_context.to_string(),
        };
        self.generate_calls.lock().unwrap().push(call);
        Self::next(&self.generations, "generation")
    }

    async fn fix(
        &self,
        original_query: &str,
        failed_command: &str,
        failure_output: &str,
    ) -> Result<String, GenerationError> {
        let call = FixCall {
            original_query: original_query.to_string(),
            failed_command: failed_command.to_string(),
            failure_output: failure_output.to_string(),
        };
        self.fix_calls.lock().unwrap().push(call);
        Self::next(&self.fixes, "fix")
    }
}
