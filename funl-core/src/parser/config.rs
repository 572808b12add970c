//! Evaluator configuration

/// Default ceiling on nested call frames
pub const MAX_SCOPE_DEPTH: usize = 1000;

/// Knobs for one [`Evaluator`](crate::Evaluator)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalConfig {
    /// Allow `val` to rebind a name that is already visible
    pub interactive: bool,
    /// Maximum number of nested call frames
    pub max_depth: usize,
}

impl EvalConfig {
    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            interactive: false,
            max_depth: MAX_SCOPE_DEPTH,
        }
    }
}
