//! Testing utilities
//!
//! Scripted stand-ins for the traits the repair loop depends on, so the loop
//! can be driven end to end without a model, a terminal or a shell.

pub mod mocks;

pub use crate::subprocess::{MockCommandConfig, MockShellRunner, ShellCall};
pub use mocks::{
    FixCall, GenerateCall, MockGenerator, MockGeneratorBuilder, MockProgressDisplay, MockPrompter,
};
