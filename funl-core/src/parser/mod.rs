// funl-core/src/parser/mod.rs

pub mod ast;
pub mod config;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod interpreter;
pub mod lexer;
#[allow(clippy::module_inception)]
pub mod parser;


pub use ast::{lift, ArithOp, FunctionTable, NodeKind};
pub use config::{EvalConfig, MAX_SCOPE_DEPTH};
pub use environment::{Environment, Frame};
pub use error::{FunlError, RuntimeError, SyntaxError};
pub use evaluator::{Evaluator, LineSource, NoInput, NumberSource};
pub use interpreter::Interpreter;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{parse_one_expression, parse_top_level, Parser};
