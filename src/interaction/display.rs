//! Progress and message display implementation

/// Width of the rule printed around command output.
pub const RULE_WIDTH: usize = 50;

/// Trait for displaying progress and messages
pub trait ProgressDisplay: Send + Sync {
    /// Display a plain message
    fn info(&self, message: &str);

    /// Display warning message
    fn warning(&self, message: &str);

    /// Display progress message
    fn progress(&self, message: &str);

    /// Display success message
    fn success(&self, message: &str);

    /// Display a horizontal rule
    fn rule(&self);
}

/// Real implementation of progress display
pub struct ProgressDisplayImpl;

impl Default for ProgressDisplayImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressDisplayImpl {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressDisplay for ProgressDisplayImpl {
    fn info(&self, message: &str) {
        println!("{message}");
    }

    fn warning(&self, message: &str) {
        println!("\n⚠️  {message}");
    }

    fn progress(&self, message: &str) {
        println!("{message}");
    }

    fn success(&self, message: &str) {
        println!("{message}");
    }

    fn rule(&self) {
        println!("{}", "-".repeat(RULE_WIDTH));
    }
}
