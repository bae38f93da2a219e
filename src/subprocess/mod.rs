pub mod builder;
pub mod error;
pub mod mock;
pub mod runner;
pub mod shell;
pub mod tee;


pub use builder::ProcessCommandBuilder;
pub use error::ProcessError;
pub use mock::{MockCommandConfig, MockShellRunner, ShellCall};
pub use runner::{ExitStatus, ProcessCommand, ProcessOutput, ProcessRunner, TokioProcessRunner};
pub use shell::{
    find_in_path, PlatformFamily, PlatformShell, ShellFlavor, ShellRunner, UnsupportedPlatform,
};
pub use tee::Tee;
