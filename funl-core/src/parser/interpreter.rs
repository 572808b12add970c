//! Interpreter session
//!
//! Ties parsing and evaluation together for a front-end: loading a program,
//! evaluating one line of input, and inspecting what is defined.

use crate::parser::config::EvalConfig;
use crate::parser::error::FunlError;
use crate::parser::evaluator::{Evaluator, NumberSource};
use crate::parser::lexer::Token;
use crate::parser::parser::{parse_one_expression, parse_top_level};
use crate::types::Tree;
use tracing::{debug, info};

/// One Funl session: a function table and environment that persist across
/// evaluated lines
pub struct Interpreter {
    evaluator: Evaluator,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter::with_config(EvalConfig::default())
    }

    pub fn with_config(config: EvalConfig) -> Self {
        Interpreter {
            evaluator: Evaluator::new(config),
        }
    }

    pub fn with_input(config: EvalConfig, input: Box<dyn NumberSource>) -> Self {
        Interpreter {
            evaluator: Evaluator::with_input(config, input),
        }
    }

    /// Replace the function table with the definitions in `program`.
    ///
    /// All or nothing: on a syntax error, or when the program defines no
    /// functions, the previous table is kept. On success every scope is
    /// cleared. Returns the defined names, sorted.
    pub fn define(&mut self, program: &str) -> Result<Vec<String>, FunlError> {
        let functions = parse_top_level(program)?;
        if functions.is_empty() {
            return Err(FunlError::NoDefinitions);
        }

        let mut names: Vec<String> = functions.keys().cloned().collect();
        names.sort();
        info!(count = names.len(), "loaded function definitions");

        self.evaluator.replace_functions(functions);
        self.evaluator.clear_scopes();
        Ok(names)
    }

    /// Parse one line of input into a tree without evaluating it
    pub fn parse_input(&self, line: &str) -> Result<Tree<Token>, FunlError> {
        let trimmed = line.trim();
        parse_one_expression(trimmed)?
            .ok_or_else(|| FunlError::NotUnderstood(trimmed.to_string()))
    }

    /// Evaluate an already parsed tree
    pub fn eval(&mut self, tree: &Tree<Token>) -> Result<Tree<Token>, FunlError> {
        Ok(self.evaluator.eval(tree)?)
    }

    /// Parse and evaluate one line of input
    pub fn eval_line(&mut self, line: &str) -> Result<Tree<Token>, FunlError> {
        let tree = self.parse_input(line)?;
        debug!(input = %tree, "evaluating line");
        self.eval(&tree)
    }

    /// Defined function names, sorted
    pub fn function_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.evaluator.functions().keys().cloned().collect();
        names.sort();
        names
    }

    /// The definition tree of function `name`
    pub fn function(&self, name: &str) -> Option<&Tree<Token>> {
        self.evaluator.functions().get(name)
    }

    /// Visible variable bindings as `(name, value)` pairs, sorted by name
    pub fn bindings(&self) -> Vec<(String, String)> {
        self.evaluator
            .environment()
            .all_bindings()
            .into_iter()
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect()
    }

    /// Forget every variable binding; functions are kept
    pub fn clear_scopes(&mut self) {
        self.evaluator.clear_scopes();
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        self.evaluator.set_interactive(interactive);
    }

    pub fn config(&self) -> &EvalConfig {
        self.evaluator.config()
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::error::{RuntimeError, SyntaxError};

    #[test]
    fn test_define_returns_sorted_names() {
        let mut funl = Interpreter::new();
        let names = funl
            .define("def minus x y = x - y end def add x y = x + y end")
            .unwrap();
        assert_eq!(names, vec!["add", "minus"]);
        assert_eq!(
            funl.function("minus").unwrap().to_string(),
            "def(minus $seq(x y)$seq(-(x y)))"
        );
    }

    #[test]
    fn test_define_replaces_table() {
        let mut funl = Interpreter::new();
        funl.define("def a = 1 end").unwrap();
        funl.define("def b = 2 end").unwrap();
        assert_eq!(funl.function_names(), vec!["b"]);
    }

    #[test]
    fn test_failed_define_keeps_previous_table() {
        let mut funl = Interpreter::new();
        funl.define("def a = 1 end").unwrap();

        let err = funl.define("def b = 2 end def = 3 end").unwrap_err();
        assert!(matches!(err, FunlError::Syntax(SyntaxError { .. })));
        assert_eq!(funl.define("   ").unwrap_err(), FunlError::NoDefinitions);

        assert_eq!(funl.function_names(), vec!["a"]);
        assert_eq!(funl.eval_line("a()").unwrap().to_string(), "1.0");
    }

    #[test]
    fn test_define_clears_scopes() {
        let mut funl = Interpreter::new();
        funl.eval_line("val x = 3").unwrap();
        assert_eq!(funl.bindings(), vec![("x".to_string(), "3.0".to_string())]);

        funl.define("def a = 1 end").unwrap();
        assert!(funl.bindings().is_empty());
    }

    #[test]
    fn test_eval_line() {
        let mut funl = Interpreter::new();
        funl.define("def minus x y = x - y end").unwrap();
        assert_eq!(funl.eval_line("  minus(10, 4)  ").unwrap().to_string(), "6.0");
    }

    #[test]
    fn test_not_understood() {
        let mut funl = Interpreter::new();
        let err = funl.eval_line("* 3").unwrap_err();
        assert_eq!(err, FunlError::NotUnderstood("* 3".to_string()));
        assert_eq!(err.to_string(), "Syntax Error: expression '* 3' not understood");
    }

    #[test]
    fn test_runtime_errors_surface() {
        let mut funl = Interpreter::new();
        let err = funl.eval_line("missing").unwrap_err();
        assert_eq!(
            err,
            FunlError::Runtime(RuntimeError::UnresolvedName {
                name: "missing".to_string()
            })
        );
    }

    #[test]
    fn test_interactive_rebinding() {
        let mut funl = Interpreter::with_config(EvalConfig::default().with_interactive(true));
        funl.eval_line("val x = 1").unwrap();
        assert_eq!(funl.eval_line("val x = x + 1").unwrap().to_string(), "2.0");

        funl.set_interactive(false);
        assert!(funl.eval_line("val x = 5").is_err());
        assert!(!funl.config().interactive);
    }

    #[test]
    fn test_clear_scopes_keeps_functions() {
        let mut funl = Interpreter::new();
        funl.define("def a = 1 end").unwrap();
        funl.eval_line("val x = 1").unwrap();

        funl.clear_scopes();
        assert!(funl.bindings().is_empty());
        assert_eq!(funl.function_names(), vec!["a"]);
    }
}
