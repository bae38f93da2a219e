use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::error::ProcessError;
use super::runner::{ExitStatus, ProcessOutput};
use super::shell::ShellRunner;

/// Scripted [`ShellRunner`] that records every command and the directory it ran in.
#[derive(Clone)]
pub struct MockShellRunner {
    expectations: Arc<Mutex<Vec<MockExpectation>>>,
    call_history: Arc<Mutex<Vec<ShellCall>>>,
}

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCall {
    pub command: String,
    pub working_dir: PathBuf,
}

struct MockExpectation {
    command: String,
    response: MockResponse,
    times_called: usize,
    expected_times: Option<usize>,
}

#[derive(Clone)]
enum MockResponse {
    Output(ProcessOutput),
    SpawnFailure(String),
}

pub struct MockCommandConfig {
    runner: MockShellRunner,
    expectation: MockExpectation,
}

impl MockShellRunner {
    pub fn new() -> Self {
        Self {
            expectations: Arc::new(Mutex::new(Vec::new())),
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Start scripting the response for an exact command line.
    pub fn expect_command(&self, command: &str) -> MockCommandConfig {
        MockCommandConfig {
            runner: self.clone(),
            expectation: MockExpectation {
                command: command.to_string(),
                response: MockResponse::Output(ProcessOutput {
                    status: ExitStatus::Success,
                    stdout: String::new(),
                    stderr: String::new(),
                    duration: Duration::from_millis(10),
                }),
                times_called: 0,
                expected_times: None,
            },
        }
    }

    pub fn verify_called(&self, command: &str, times: usize) -> bool {
        let history = self.call_history.lock().unwrap();
        let count = history.iter().filter(|c| c.command == command).count();
        count == times
    }

    pub fn get_call_history(&self) -> Vec<ShellCall> {
        self.call_history.lock().unwrap().clone()
    }

    pub fn executed_commands(&self) -> Vec<String> {
        self.get_call_history()
            .into_iter()
            .map(|call| call.command)
            .collect()
    }
}

impl Default for MockShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ShellRunner for MockShellRunner {
    fn shell_name(&self) -> &str {
        "mock"
    }

    async fn run(&self, command: &str, working_dir: &Path) -> Result<ProcessOutput, ProcessError> {
        let call = ShellCall {
            command: command.to_string(),
            working_dir: working_dir.to_path_buf(),
        };
        self.call_history.lock().unwrap().push(call);

        let mut expectations = self.expectations.lock().unwrap();

        for expectation in expectations.iter_mut() {
            if expectation.command != command {
                continue;
            }

            expectation.times_called += 1;

            if let Some(expected) = expectation.expected_times {
                if expectation.times_called > expected {
                    return Err(ProcessError::MockExpectationNotMet(format!(
                        "Command '{}' called {} times, expected {}",
                        command, expectation.times_called, expected
                    )));
                }
            }

            return match &expectation.response {
                MockResponse::Output(output) => Ok(output.clone()),
                MockResponse::SpawnFailure(program) => {
                    Err(ProcessError::CommandNotFound(program.clone()))
                }
            };
        }

        Err(ProcessError::MockExpectationNotMet(format!(
            "No expectation found for command: {command}"
        )))
    }
}

impl MockCommandConfig {
    pub fn returns_stdout(mut self, stdout: &str) -> Self {
        if let MockResponse::Output(output) = &mut self.expectation.response {
            output.stdout = stdout.to_string();
        }
        self
    }

    pub fn returns_stderr(mut self, stderr: &str) -> Self {
        if let MockResponse::Output(output) = &mut self.expectation.response {
            output.stderr = stderr.to_string();
        }
        self
    }

    pub fn returns_exit_code(mut self, code: i32) -> Self {
        if let MockResponse::Output(output) = &mut self.expectation.response {
            output.status = if code == 0 {
                ExitStatus::Success
            } else {
                ExitStatus::Error(code)
            };
        }
        self
    }

    pub fn returns_success(self) -> Self {
        self.returns_exit_code(0)
    }

    /// Simulate the interpreter itself failing to launch.
    pub fn fails_to_spawn(mut self, program: &str) -> Self {
        self.expectation.response = MockResponse::SpawnFailure(program.to_string());
        self
    }

    pub fn times(mut self, n: usize) -> Self {
        self.expectation.expected_times = Some(n);
        self
    }

    pub fn finish(self) {
        self.runner
            .expectations
            .lock()
            .unwrap()
            .push(self.expectation);
    }
}
