//! REPL configuration

use anyhow::{Context, Result};
use funl_core::parser::MAX_SCOPE_DEPTH;
use funl_core::EvalConfig;

/// Environment variable overriding the call depth ceiling
pub const MAX_DEPTH_VAR: &str = "FUNL_MAX_DEPTH";

/// Settings for one REPL session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplConfig {
    /// Prompt text shown before each line
    pub prompt: String,
    /// Allow `val` to rebind names at the prompt
    pub interactive: bool,
    /// Maximum number of nested call frames
    pub max_depth: usize,
}

impl ReplConfig {
    /// Defaults, with the depth ceiling taken from `FUNL_MAX_DEPTH` when set
    pub fn from_env() -> Result<Self> {
        let config = ReplConfig::default();
        match std::env::var(MAX_DEPTH_VAR) {
            Ok(value) => config.with_max_depth_str(&value),
            Err(_) => Ok(config),
        }
    }

    fn with_max_depth_str(mut self, value: &str) -> Result<Self> {
        self.max_depth = value
            .trim()
            .parse::<usize>()
            .with_context(|| format!("invalid {} value '{}'", MAX_DEPTH_VAR, value))?;
        Ok(self)
    }

    /// Evaluator settings for this session
    pub fn eval_config(&self) -> EvalConfig {
        EvalConfig::default()
            .with_interactive(self.interactive)
            .with_max_depth(self.max_depth)
    }
}

impl Default for ReplConfig {
    fn default() -> Self {
        ReplConfig {
            prompt: "funl>".to_string(),
            interactive: true,
            max_depth: MAX_SCOPE_DEPTH,
        }
    }
}
