//! Error handling utilities
//!
//! This module provides centralized error handling for the application.

use tracing::debug;

/// Print a fatal error and exit with status 1
///
/// # Verbose Mode Behavior
/// - `verbose = 0`: The error message only
/// - `verbose >= 1`: Also the chain of underlying causes
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    debug!("Fatal error: {:?}", error);
    eprintln!("{}", render_fatal_error(&error, verbose));
    std::process::exit(1)
}

/// Text printed to stderr for a fatal error.
pub fn render_fatal_error(error: &anyhow::Error, verbose: u8) -> String {
    let mut rendered = format!("Error: {error}");

    if verbose >= 1 {
        rendered.push_str("\n\nError chain:");
        for (i, cause) in error.chain().enumerate() {
            rendered.push_str(&format!("\n  {i}: {cause}"));
        }
    }

    rendered
}
