//! # Funl
//!
//! Interactive front-end for the Funl functional language. The language itself
//! (lexer, tree, parser, evaluator) lives in `funl-core`; this crate adds the
//! console around it.
//!
//! ## Modules
//!
//! - `commands`: REPL commands such as `load`, `functions` and `tree`.
//! - `config`: session settings, including the `FUNL_MAX_DEPTH` override.
//! - `repl`: the Read-Eval-Print Loop built on rustyline.

pub mod commands;
pub mod config;
pub mod repl;

// Re-export commonly used types for convenience
pub use funl_core::{FunlError, Interpreter, Tree};
