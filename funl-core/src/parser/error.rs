use crate::parser::lexer::Token;
use thiserror::Error;

/// A grammar production committed to by its leading token could not complete
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Syntax Error: {message}, found {found}")]
pub struct SyntaxError {
    /// The continuation the parser expected
    pub message: String,
    /// Description of what was there instead
    pub found: String,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, found: &Token) -> Self {
        SyntaxError {
            message: message.into(),
            found: found.describe(),
        }
    }
}

/// Failures raised while evaluating a tree
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("Runtime Error: cannot resolve '{name}' to a variable or function name")]
    UnresolvedName { name: String },

    #[error("Runtime Error: cannot resolve '{name}' to a function name")]
    UnknownFunction { name: String },

    #[error("Runtime Error: '{name}' is bound to a number, not a function")]
    NotCallable { name: String },

    #[error(
        "Runtime Error: wrong number of arguments for function '{name}'. Expected: {expected}, actual: {actual}"
    )]
    ArityMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Runtime Error: variable with name '{name}' already exists")]
    DuplicateVariable { name: String },

    #[error("Runtime Error: function with name '{name}' already exists")]
    DuplicateFunction { name: String },

    #[error("Runtime Error: operand of '{op}' evaluates to a function")]
    NonNumericOperand { op: String },

    #[error("Runtime Error: condition of an if expression evaluates to a function")]
    NonNumericCondition,

    #[error("Runtime Error: read accepts numbers only, got '{input}'")]
    NonNumericInput { input: String },

    #[error("Runtime Error: no input available for read: {reason}")]
    InputUnavailable { reason: String },

    #[error("Runtime Error: exceeded maximum nested scope depth of {limit}")]
    DepthExceeded { limit: usize },

    #[error("Runtime Error: cannot evaluate an empty expression sequence")]
    EmptySequence,

    #[error("Runtime Error: malformed '{tag}' node: {reason}")]
    Malformed { tag: String, reason: String },
}

/// Any failure surfaced to a caller of the interpreter
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FunlError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("Syntax Error: expression '{0}' not understood")]
    NotUnderstood(String),

    #[error("Input Error: no function definitions found")]
    NoDefinitions,
}
