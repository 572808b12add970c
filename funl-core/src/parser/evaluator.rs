//! Tree-walking evaluator
//!
//! Evaluates a `Tree<Token>` AST against a function table and an environment
//! stack, producing another tree: a number leaf or a function definition.

use crate::parser::ast::{as_number, is_function, ArithOp, FunctionTable, NodeKind};
use crate::parser::config::EvalConfig;
use crate::parser::environment::{Environment, Frame};
use crate::parser::error::RuntimeError;
use crate::parser::lexer::{Token, TokenKind};
use crate::stack::ensure_sufficient_stack;
use crate::types::Tree;
use std::io::{BufRead, Write};
use tracing::{debug, trace, warn};

/// Source of numbers for `read` expressions
pub trait NumberSource {
    /// Show `prompt` and produce one number
    fn read_number(&mut self, prompt: &str) -> Result<f64, RuntimeError>;
}

/// A source with nothing to read; every `read` fails
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl NumberSource for NoInput {
    fn read_number(&mut self, _prompt: &str) -> Result<f64, RuntimeError> {
        Err(RuntimeError::InputUnavailable {
            reason: "no input source attached".to_string(),
        })
    }
}

/// Reads one number per line from `reader`, writing prompts to `writer`
pub struct LineSource<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LineSource<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        LineSource { reader, writer }
    }

    /// The prompt sink, e.g. to inspect what was shown
    pub fn writer(&self) -> &W {
        &self.writer
    }
}

impl<R: BufRead, W: Write> NumberSource for LineSource<R, W> {
    fn read_number(&mut self, prompt: &str) -> Result<f64, RuntimeError> {
        let unavailable = |e: std::io::Error| RuntimeError::InputUnavailable {
            reason: e.to_string(),
        };

        write!(self.writer, "{}", prompt).map_err(unavailable)?;
        self.writer.flush().map_err(unavailable)?;

        let mut line = String::new();
        let read = self.reader.read_line(&mut line).map_err(unavailable)?;
        if read == 0 {
            return Err(RuntimeError::InputUnavailable {
                reason: "end of input".to_string(),
            });
        }

        let input = line.trim();
        input
            .parse::<f64>()
            .map_err(|_| RuntimeError::NonNumericInput {
                input: input.to_string(),
            })
    }
}

/// Evaluates Funl trees
pub struct Evaluator {
    functions: FunctionTable,
    environment: Environment,
    config: EvalConfig,
    input: Box<dyn NumberSource>,
}

impl Evaluator {
    /// Create an evaluator with an empty function table and no input source
    pub fn new(config: EvalConfig) -> Self {
        Evaluator::with_input(config, Box::new(NoInput))
    }

    pub fn with_input(config: EvalConfig, input: Box<dyn NumberSource>) -> Self {
        Evaluator {
            functions: FunctionTable::new(),
            environment: Environment::new(),
            config,
            input,
        }
    }

    pub fn set_input(&mut self, input: Box<dyn NumberSource>) {
        self.input = input;
    }

    pub fn functions(&self) -> &FunctionTable {
        &self.functions
    }

    /// Swap in a new function table, returning the old one
    pub fn replace_functions(&mut self, functions: FunctionTable) -> FunctionTable {
        std::mem::replace(&mut self.functions, functions)
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Reset the environment to a single empty global frame
    pub fn clear_scopes(&mut self) {
        self.environment.clear();
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        self.config.interactive = interactive;
    }

    /// Number of call frames currently pushed
    pub fn depth(&self) -> usize {
        self.environment.depth() - 1
    }

    /// Evaluate a tree to a number leaf or a function definition
    pub fn eval(&mut self, tree: &Tree<Token>) -> Result<Tree<Token>, RuntimeError> {
        ensure_sufficient_stack(|| self.dispatch(tree))
    }

    fn dispatch(&mut self, tree: &Tree<Token>) -> Result<Tree<Token>, RuntimeError> {
        let token = tree.value();
        let Some(kind) = NodeKind::of(token) else {
            return Err(malformed(token, "not an evaluable node"));
        };
        trace!(node = %token, children = tree.child_count(), "eval");

        match kind {
            NodeKind::Def => self.eval_def(tree),
            NodeKind::Seq => self.eval_seq(tree),
            NodeKind::Call => self.eval_call(tree),
            NodeKind::Val => self.eval_val(tree),
            NodeKind::If => self.eval_if(tree),
            NodeKind::Read => self.eval_read(tree),
            NodeKind::Arith(op) => self.eval_arith(op, tree),
            NodeKind::Name => self.eval_name(tree),
            NodeKind::Number => Ok(tree.clone()),
        }
    }

    /// `def(name $seq(params) $seq(body))`: record and return the definition
    fn eval_def(&mut self, tree: &Tree<Token>) -> Result<Tree<Token>, RuntimeError> {
        expect_children(tree, 3)?;
        let name = name_of(tree, 0)?;
        debug!(function = %name, "defined function");
        self.functions.insert(name, tree.clone());
        Ok(tree.clone())
    }

    /// `$seq(expr...)`: evaluate in order, yield the last
    fn eval_seq(&mut self, tree: &Tree<Token>) -> Result<Tree<Token>, RuntimeError> {
        let mut last = None;
        for child in tree.children() {
            last = Some(self.eval(child)?);
        }
        last.ok_or(RuntimeError::EmptySequence)
    }

    /// `$call(name $seq(args))`
    fn eval_call(&mut self, tree: &Tree<Token>) -> Result<Tree<Token>, RuntimeError> {
        expect_children(tree, 2)?;
        let name = name_of(tree, 0)?;
        let args = child(tree, 1)?;

        let function = self.resolve_function(&name)?;
        let params = child(&function, 1)?;
        let body = child(&function, 2)?;

        if params.child_count() != args.child_count() {
            return Err(RuntimeError::ArityMismatch {
                name,
                expected: params.child_count(),
                actual: args.child_count(),
            });
        }

        // Arguments see the caller's bindings
        let mut frame = Frame::new();
        for (param, arg) in params.children().iter().zip(args.children()) {
            let value = self.eval(arg)?;
            frame.insert(param.value().text().to_string(), value);
        }

        if self.depth() >= self.config.max_depth {
            warn!(function = %name, limit = self.config.max_depth, "call depth exceeded");
            return Err(RuntimeError::DepthExceeded {
                limit: self.config.max_depth,
            });
        }

        debug!(function = %name, depth = self.depth() + 1, "enter");
        self.environment.push_scope(frame);
        let result = self.eval(body);
        self.environment.pop_scope();
        debug!(function = %name, depth = self.depth(), ok = result.is_ok(), "exit");

        result
    }

    /// Callee lookup: a binding in the innermost frame shadows the function table
    fn resolve_function(&self, name: &str) -> Result<Tree<Token>, RuntimeError> {
        if let Some(local) = self.environment.get_local(name) {
            if is_function(local) {
                return Ok(local.clone());
            }
            return Err(RuntimeError::NotCallable {
                name: name.to_string(),
            });
        }
        self.functions
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownFunction {
                name: name.to_string(),
            })
    }

    /// `val(name expr)`: bind in the innermost frame and yield the value
    fn eval_val(&mut self, tree: &Tree<Token>) -> Result<Tree<Token>, RuntimeError> {
        expect_children(tree, 2)?;
        let name = name_of(tree, 0)?;

        if self.environment.is_defined(&name) && !self.config.interactive {
            return Err(RuntimeError::DuplicateVariable { name });
        }
        if self.functions.contains_key(&name) {
            return Err(RuntimeError::DuplicateFunction { name });
        }

        let value = self.eval(child(tree, 1)?)?;
        debug!(variable = %name, value = %value, "bound");
        self.environment.define(name, value.clone());
        Ok(value)
    }

    /// `if(cond then else)`: positive conditions take the first branch
    fn eval_if(&mut self, tree: &Tree<Token>) -> Result<Tree<Token>, RuntimeError> {
        expect_children(tree, 3)?;
        let condition = self.eval(child(tree, 0)?)?;
        let Some(condition) = as_number(&condition) else {
            return Err(RuntimeError::NonNumericCondition);
        };

        let branch = if condition > 0.0 { 1 } else { 2 };
        self.eval(child(tree, branch)?)
    }

    /// `read(prompt)`
    fn eval_read(&mut self, tree: &Tree<Token>) -> Result<Tree<Token>, RuntimeError> {
        expect_children(tree, 1)?;
        let prompt = child(tree, 0)?.value().text().to_string();
        let value = self.input.read_number(&prompt)?;
        Ok(Tree::new(Token::number(value)))
    }

    fn eval_arith(&mut self, op: ArithOp, tree: &Tree<Token>) -> Result<Tree<Token>, RuntimeError> {
        expect_children(tree, 2)?;
        let left = self.eval_operand(op, child(tree, 0)?)?;
        let right = self.eval_operand(op, child(tree, 1)?)?;
        Ok(Tree::new(Token::number(op.apply(left, right))))
    }

    fn eval_operand(&mut self, op: ArithOp, tree: &Tree<Token>) -> Result<f64, RuntimeError> {
        let value = self.eval(tree)?;
        as_number(&value).ok_or_else(|| RuntimeError::NonNumericOperand {
            op: op.to_string(),
        })
    }

    /// Variables first, innermost frame outward, then functions
    fn eval_name(&mut self, tree: &Tree<Token>) -> Result<Tree<Token>, RuntimeError> {
        let name = tree.value().text();
        if let Some(value) = self.environment.get(name) {
            return Ok(value.clone());
        }
        if let Some(function) = self.functions.get(name) {
            return Ok(function.clone());
        }
        Err(RuntimeError::UnresolvedName {
            name: name.to_string(),
        })
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new(EvalConfig::default())
    }
}

fn malformed(token: &Token, reason: impl Into<String>) -> RuntimeError {
    RuntimeError::Malformed {
        tag: token.text().to_string(),
        reason: reason.into(),
    }
}

fn expect_children(tree: &Tree<Token>, count: usize) -> Result<(), RuntimeError> {
    if tree.child_count() == count {
        Ok(())
    } else {
        Err(malformed(
            tree.value(),
            format!("expected {} children, found {}", count, tree.child_count()),
        ))
    }
}

fn child(tree: &Tree<Token>, index: usize) -> Result<&Tree<Token>, RuntimeError> {
    tree.child(index)
        .map_err(|e| malformed(tree.value(), e.to_string()))
}

/// The name held by child `index`, which must be a Name leaf
fn name_of(tree: &Tree<Token>, index: usize) -> Result<String, RuntimeError> {
    let node = child(tree, index)?;
    if node.is_leaf() && node.value().kind() == TokenKind::Name {
        Ok(node.value().text().to_string())
    } else {
        Err(malformed(
            tree.value(),
            format!("expected a name, found '{}'", node),
        ))
    }
}
