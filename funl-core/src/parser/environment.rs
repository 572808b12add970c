//! Environment for variable scopes
//!
//! A stack of frames mapping names to already-evaluated result trees. The
//! outermost frame holds top-level `val` bindings and is never popped; every
//! function call pushes one frame for its parameters.

use crate::parser::lexer::Token;
use crate::types::Tree;
use std::collections::HashMap;

/// One layer of bindings
pub type Frame = HashMap<String, Tree<Token>>;

/// Scoped environment for variable storage
#[derive(Debug)]
pub struct Environment {
    /// Stack of frames (inner frames shadow outer ones)
    scopes: Vec<Frame>,
}

impl Environment {
    /// Create a new environment with a global frame
    pub fn new() -> Self {
        Environment {
            scopes: vec![Frame::new()],
        }
    }

    /// Drop every frame and reset to a fresh global frame
    pub fn clear(&mut self) {
        self.scopes.clear();
        self.scopes.push(Frame::new());
    }

    /// Push a prepared frame (call entry)
    pub fn push_scope(&mut self, frame: Frame) {
        self.scopes.push(frame);
    }

    /// Pop the innermost frame (call exit)
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
        // Never pop the global frame
    }

    /// Bind `name` in the innermost frame
    pub fn define(&mut self, name: String, value: Tree<Token>) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, value);
        }
    }

    /// Look a name up, innermost frame first
    pub fn get(&self, name: &str) -> Option<&Tree<Token>> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Look a name up in the innermost frame only
    pub fn get_local(&self, name: &str) -> Option<&Tree<Token>> {
        self.scopes.last().and_then(|scope| scope.get(name))
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Visible bindings, inner frames shadowing outer ones, sorted by name
    pub fn all_bindings(&self) -> Vec<(&String, &Tree<Token>)> {
        let mut seen = std::collections::HashSet::new();
        let mut result = Vec::new();
        for scope in self.scopes.iter().rev() {
            for (name, value) in scope.iter() {
                if seen.insert(name) {
                    result.push((name, value));
                }
            }
        }
        result.sort_by(|a, b| a.0.cmp(b.0));
        result
    }

    /// Current frame count (1 = global only)
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
