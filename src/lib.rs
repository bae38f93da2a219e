//! # alfred-cli
//!
//! Turn a plain-language request into shell commands with a local Ollama
//! model, confirm them, run them, and ask the model for a fix when one fails.
//!
//! ## Usage
//!
//! ```bash
//! alfred-cli [--config <path>] [--verbose] <query...>
//! ```
//!
//! ## Modules
//!
//! - `command` - Command batches and parsing of model output
//! - `interaction` - Prompts, progress output and the confirmation gate
//! - `subprocess` - Process spawning, output capture and per-platform shells
//! - `executor` - Sequential batch execution with working-directory tracking
//! - `repair` - The generate/confirm/execute/repair state machine
//! - `generation` - Command generation port and the Ollama client
//! - `context` - Environment facts passed to the model
//! - `config` - YAML configuration with environment overrides
//! - `error` - Fatal error taxonomy
//! - `app` - Logging and fatal error reporting for the binary
//! - `testing` - Mocks for driving the loop in tests
pub mod app;
pub mod command;
pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod generation;
pub mod interaction;
pub mod repair;
pub mod subprocess;

pub mod testing;

pub use error::AlfredError;
