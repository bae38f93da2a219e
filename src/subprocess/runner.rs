use async_trait::async_trait;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::ProcessError;
use super::tee::Tee;

#[derive(Debug, Clone)]
pub struct ProcessCommand {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Error(i32),
    Signal(i32),
}

impl ExitStatus {
    pub fn success(&self) -> bool {
        matches!(self, ExitStatus::Success)
    }

    pub fn code(&self) -> Option<i32> {
        match self {
            ExitStatus::Success => Some(0),
            ExitStatus::Error(code) => Some(*code),
            ExitStatus::Signal(_) => None,
        }
    }

    /// The error describing a non-successful status, if any.
    pub fn to_error(&self) -> Option<ProcessError> {
        match self {
            ExitStatus::Success => None,
            ExitStatus::Error(code) => Some(ProcessError::ExitCode(*code)),
            ExitStatus::Signal(signal) => Some(ProcessError::Signal(*signal)),
        }
    }
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError>;
}

/// Runs processes with inherited stdin; stdout and stderr are echoed to the
/// console as they arrive and also captured for the caller.
pub struct TokioProcessRunner {
    echo: bool,
}

impl Default for TokioProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self { echo: true }
    }

    /// Capture output without echoing it to the console.
    pub fn quiet() -> Self {
        Self { echo: false }
    }

    fn console(&self, stream: ConsoleStream) -> Box<dyn Write + Send> {
        match (self.echo, stream) {
            (false, _) => Box::new(io::sink()),
            (true, ConsoleStream::Stdout) => Box::new(io::stdout()),
            (true, ConsoleStream::Stderr) => Box::new(io::stderr()),
        }
    }

    fn log_command_start(command: &ProcessCommand) {
        tracing::debug!(
            "Executing subprocess: {} {}",
            command.program,
            command.args.join(" ")
        );

        if let Some(ref dir) = command.working_dir {
            tracing::trace!("Working directory: {:?}", dir);
        }
    }

    fn configure_command(command: &ProcessCommand) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&command.program);
        cmd.args(&command.args);

        if let Some(dir) = &command.working_dir {
            cmd.current_dir(dir);
        }

        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    /// Convert process exit status to our ExitStatus enum
    fn parse_exit_status(status: std::process::ExitStatus) -> ExitStatus {
        if status.success() {
            ExitStatus::Success
        } else if let Some(code) = status.code() {
            ExitStatus::Error(code)
        } else {
            Self::parse_signal_status(status)
        }
    }

    #[cfg(unix)]
    fn parse_signal_status(status: std::process::ExitStatus) -> ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            ExitStatus::Signal(signal)
        } else {
            ExitStatus::Error(1)
        }
    }

    #[cfg(not(unix))]
    fn parse_signal_status(_status: std::process::ExitStatus) -> ExitStatus {
        ExitStatus::Error(1)
    }

    /// Map spawn error to ProcessError
    ///
    /// A missing working directory also surfaces as `NotFound`, so it is
    /// checked before blaming the program.
    fn map_spawn_error(error: io::Error, command: &ProcessCommand) -> ProcessError {
        if error.kind() == io::ErrorKind::NotFound {
            if let Some(dir) = command.working_dir.as_ref().filter(|dir| !dir.is_dir()) {
                return ProcessError::WorkingDirectoryMissing(dir.clone());
            }
            return ProcessError::CommandNotFound(command.program.clone());
        }

        ProcessError::SpawnFailed {
            command: format!("{} {}", command.program, command.args.join(" ")),
            source: error,
        }
    }

    fn log_result(result: &ProcessOutput, command: &ProcessCommand) {
        match &result.status {
            ExitStatus::Success => {
                tracing::debug!(
                    "Subprocess completed successfully in {:?}: {}",
                    result.duration,
                    command.program
                );
                tracing::trace!("Stdout length: {} bytes", result.stdout.len());
                tracing::trace!("Stderr length: {} bytes", result.stderr.len());
            }
            ExitStatus::Error(code) => {
                tracing::debug!(
                    "Subprocess failed with exit code {} in {:?}: {}",
                    code,
                    result.duration,
                    command.program
                );
            }
            ExitStatus::Signal(signal) => {
                tracing::warn!(
                    "Subprocess terminated by signal {} in {:?}: {}",
                    signal,
                    result.duration,
                    command.program
                );
            }
        }
    }
}

#[derive(Clone, Copy)]
enum ConsoleStream {
    Stdout,
    Stderr,
}

/// Copy a child pipe into a tee until EOF and hand back the captured bytes.
async fn pump<R, W>(mut reader: R, mut tee: Tee<W, Vec<u8>>) -> io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
    W: Write,
{
    let mut chunk = [0u8; 8192];
    loop {
        let read = reader.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        tee.write_all(&chunk[..read])?;
        tee.flush()?;
    }
    Ok(tee.into_parts().1)
}

async fn drain<R>(reader: Option<R>, console: Box<dyn Write + Send>) -> io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    match reader {
        Some(reader) => pump(reader, Tee::new(console, Vec::new())).await,
        None => Ok(Vec::new()),
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError> {
        Self::log_command_start(&command);
        let started = Instant::now();

        let mut child = Self::configure_command(&command)
            .spawn()
            .map_err(|e| Self::map_spawn_error(e, &command))?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Both pipes are read while the child runs so neither can fill up and stall it.
        let (captured_out, captured_err, status) = tokio::join!(
            drain(stdout, self.console(ConsoleStream::Stdout)),
            drain(stderr, self.console(ConsoleStream::Stderr)),
            child.wait(),
        );

        let status = Self::parse_exit_status(status?);
        let output = ProcessOutput {
            status,
            stdout: String::from_utf8_lossy(&captured_out?).into_owned(),
            stderr: String::from_utf8_lossy(&captured_err?).into_owned(),
            duration: started.elapsed(),
        };

        Self::log_result(&output, &command);
        Ok(output)
    }
}
