//! Platform shell strategies
//!
//! The host shell is picked once at startup and injected wherever commands
//! are run, so nothing downstream branches on the operating system.

use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::builder::ProcessCommandBuilder;
use super::error::ProcessError;
use super::runner::{ProcessCommand, ProcessOutput, ProcessRunner};

/// Runs one command line through the host's command interpreter.
#[async_trait]
pub trait ShellRunner: Send + Sync {
    /// Human-readable name of the interpreter, used for logging.
    fn shell_name(&self) -> &str;

    /// Run `command` with `working_dir` as the process's current directory.
    async fn run(&self, command: &str, working_dir: &Path) -> Result<ProcessOutput, ProcessError>;
}

/// Operating-system families with a known way to invoke a shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformFamily {
    Windows,
    Unix,
}

impl PlatformFamily {
    /// Map a `std::env::consts::OS` value to its family.
    pub fn from_os(os: &str) -> Option<Self> {
        match os {
            "windows" => Some(Self::Windows),
            "linux" | "macos" | "freebsd" | "openbsd" | "netbsd" | "dragonfly" => Some(Self::Unix),
            _ => None,
        }
    }
}

/// Concrete interpreter and the flag that hands it a command string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellFlavor {
    PowerShell,
    Cmd,
    Bash,
    Sh,
}

impl ShellFlavor {
    pub fn program(&self) -> &'static str {
        match self {
            ShellFlavor::PowerShell => "powershell.exe",
            ShellFlavor::Cmd => "cmd.exe",
            ShellFlavor::Bash => "bash",
            ShellFlavor::Sh => "/bin/sh",
        }
    }

    pub fn command_flag(&self) -> &'static str {
        match self {
            ShellFlavor::PowerShell => "-Command",
            ShellFlavor::Cmd => "/c",
            ShellFlavor::Bash | ShellFlavor::Sh => "-c",
        }
    }

    /// Preferred interpreter for a family, falling back when it is not installed.
    pub fn for_family(family: PlatformFamily, is_available: impl Fn(&str) -> bool) -> Self {
        match family {
            PlatformFamily::Windows if is_available("powershell.exe") => ShellFlavor::PowerShell,
            PlatformFamily::Windows => ShellFlavor::Cmd,
            PlatformFamily::Unix if is_available("bash") => ShellFlavor::Bash,
            PlatformFamily::Unix => ShellFlavor::Sh,
        }
    }

    /// Pick the interpreter for an OS name, or report the OS as unsupported.
    pub fn for_os(
        os: &str,
        is_available: impl Fn(&str) -> bool,
    ) -> Result<Self, UnsupportedPlatform> {
        PlatformFamily::from_os(os)
            .map(|family| Self::for_family(family, is_available))
            .ok_or_else(|| UnsupportedPlatform(os.to_string()))
    }

    pub fn detect() -> Result<Self, UnsupportedPlatform> {
        Self::for_os(std::env::consts::OS, |program| {
            find_in_path(program).is_some()
        })
    }
}

impl fmt::Display for ShellFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// The host OS has no known shell invocation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported operating system: {0}")]
pub struct UnsupportedPlatform(pub String);

/// Shell runner backed by a real interpreter and a [`ProcessRunner`].
pub struct PlatformShell {
    flavor: ShellFlavor,
    process: Arc<dyn ProcessRunner>,
}

impl PlatformShell {
    pub fn new(flavor: ShellFlavor, process: Arc<dyn ProcessRunner>) -> Self {
        Self { flavor, process }
    }

    /// Detect the host shell once; fails on operating systems we cannot drive.
    pub fn detect(process: Arc<dyn ProcessRunner>) -> Result<Self, UnsupportedPlatform> {
        let flavor = ShellFlavor::detect()?;
        tracing::debug!("Selected shell: {}", flavor);
        Ok(Self::new(flavor, process))
    }

    pub fn command_for(&self, command: &str, working_dir: &Path) -> ProcessCommand {
        ProcessCommandBuilder::new(self.flavor.program())
            .args([self.flavor.command_flag(), command])
            .current_dir(working_dir)
            .build()
    }
}

#[async_trait]
impl ShellRunner for PlatformShell {
    fn shell_name(&self) -> &str {
        self.flavor.program()
    }

    async fn run(&self, command: &str, working_dir: &Path) -> Result<ProcessOutput, ProcessError> {
        self.process.run(self.command_for(command, working_dir)).await
    }
}

/// Look a program up on `PATH` the way a shell would.
pub fn find_in_path(program: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}
