//! AST vocabulary
//!
//! Funl programs and results are both `Tree<Token>`. The root token of each node
//! is its tag; [`NodeKind`] is the closed set of tags the evaluator understands.

use crate::parser::lexer::{format_number, Token, TokenKind, KEYWORDS};
use crate::types::Tree;
use std::collections::HashMap;
use std::fmt;

/// Synthetic tag for an ordered list of expressions
pub const SEQ: &str = "$seq";

/// Synthetic tag for a function invocation
pub const CALL: &str = "$call";

/// Function name → its `def(name $seq(params) $seq(body))` tree
pub type FunctionTable = HashMap<String, Tree<Token>>;

/// The four arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub fn from_symbol(symbol: &str) -> Option<ArithOp> {
        match symbol {
            "+" => Some(ArithOp::Add),
            "-" => Some(ArithOp::Sub),
            "*" => Some(ArithOp::Mul),
            "/" => Some(ArithOp::Div),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }

    /// IEEE arithmetic; division by zero yields infinity or NaN
    pub fn apply(&self, left: f64, right: f64) -> f64 {
        match self {
            ArithOp::Add => left + right,
            ArithOp::Sub => left - right,
            ArithOp::Mul => left * right,
            ArithOp::Div => left / right,
        }
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Node kinds, selected by the text of the root token (tags) or by its kind
/// (leaves)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// `def(name $seq(param...) $seq(body...))`
    Def,
    /// `$seq(expr...)`
    Seq,
    /// `$call(name $seq(arg...))`
    Call,
    /// `val(name expr)`
    Val,
    /// `if($seq $seq $seq)`
    If,
    /// `read(prompt)`
    Read,
    /// `op(left right)`
    Arith(ArithOp),
    Name,
    Number,
}

impl NodeKind {
    /// Classify a node's root token; `None` for tokens that never head an
    /// evaluable node (strings, stray symbols, sentinels)
    pub fn of(token: &Token) -> Option<NodeKind> {
        let kind = match token.text() {
            "def" => NodeKind::Def,
            SEQ => NodeKind::Seq,
            CALL => NodeKind::Call,
            "val" => NodeKind::Val,
            "if" => NodeKind::If,
            "read" => NodeKind::Read,
            text => match ArithOp::from_symbol(text) {
                Some(op) => NodeKind::Arith(op),
                None => match token.kind() {
                    TokenKind::Name => NodeKind::Name,
                    TokenKind::Number => NodeKind::Number,
                    _ => return None,
                },
            },
        };
        Some(kind)
    }
}

impl Token {
    /// The synthetic `$seq` tag
    pub fn seq() -> Self {
        Token::keyword(SEQ)
    }

    /// The synthetic `$call` tag
    pub fn call() -> Self {
        Token::keyword(CALL)
    }
}

/// Recover a token from bare node text, as found in a `Tree<String>` fixture
pub fn token_for_text(text: &str) -> Token {
    if text == SEQ || text == CALL || KEYWORDS.contains(&text) {
        return Token::keyword(text);
    }
    if ArithOp::from_symbol(text).is_some() {
        return Token::symbol(text);
    }
    let numeric = text
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '-' || c == '.');
    if numeric {
        if let Ok(value) = text.parse::<f64>() {
            return Token::new(TokenKind::Number, format_number(value));
        }
    }
    Token::name(text)
}

/// Lift a textual tree description into an AST
pub fn lift(tree: Tree<String>) -> Tree<Token> {
    tree.map(|text| token_for_text(&text))
}

/// The numeric value of a result tree, if it is a number leaf
pub fn as_number(tree: &Tree<Token>) -> Option<f64> {
    let token = tree.value();
    if tree.is_leaf() && token.kind() == TokenKind::Number {
        token.text().parse::<f64>().ok()
    } else {
        None
    }
}

/// Whether a result tree is a function definition
pub fn is_function(tree: &Tree<Token>) -> bool {
    NodeKind::of(tree.value()) == Some(NodeKind::Def)
}
