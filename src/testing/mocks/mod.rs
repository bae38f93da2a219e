//! Mock implementations for testing

pub mod generation;
pub mod interaction;

pub use generation::{FixCall, GenerateCall, MockGenerator, MockGeneratorBuilder};
pub use interaction::{MockProgressDisplay, MockPrompter};
