//! Core data types shared by the parser and evaluator

pub mod tree;

pub use tree::{Tree, TreeError};
