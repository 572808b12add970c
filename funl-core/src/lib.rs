//! # Funl Core
//!
//! I/O-free core of the Funl functional language: lexer, generic tree, parser and
//! tree-walking evaluator. Programs and results share one representation, a
//! [`Tree`] of [`Token`]s.
//!
//! Console handling, program loading and the line editor live in the `funl`
//! front-end crate; the core only *invokes* a [`NumberSource`] when a program
//! executes `read`.
//!
//! ## Example
//!
//! ```
//! use funl_core::Interpreter;
//!
//! let mut funl = Interpreter::new();
//! funl.define("def minus x y = x - y end").unwrap();
//! let result = funl.eval_line("minus(10, 4)").unwrap();
//! assert_eq!(result.to_string(), "6.0");
//! ```

pub mod parser;
mod stack;
pub mod types;

pub use parser::{
    EvalConfig, Evaluator, FunctionTable, FunlError, Interpreter, Lexer, NumberSource, Parser,
    RuntimeError, SyntaxError, Token, TokenKind,
};
pub use types::{Tree, TreeError};
