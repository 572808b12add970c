//! Generic ordered n-ary tree
//!
//! [`Tree`] is both the AST representation used by the parser and evaluator and
//! a human-readable debugging format: `value(child child ...)`, where a childless
//! node is written as its bare value.
//!
//! Children are owned exclusively by their parent. That makes the tree acyclic by
//! construction: a node can never be attached beneath one of its own
//! descendants, because doing so would move the node while the descendant is
//! still borrowed from it.
//!
//! ```compile_fail
//! use funl_core::Tree;
//!
//! let mut root = Tree::with_children("root".to_string(), [Tree::new("leaf".to_string())]);
//! let leaf = root.child_mut(0).unwrap();
//! leaf.add_child(root);
//! ```
//!
//! Trees compare by value: two trees are equal iff their serialized forms are
//! equal, regardless of the node value type.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Failures raised by tree construction and by the textual tree parser
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("child index {index} is out of range for a node with {len} children")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("too many closing parentheses: {0}")]
    TooManyClosing(String),

    #[error("not enough closing parentheses: {0}")]
    NotEnoughClosing(String),

    #[error("tree description is empty")]
    Empty,

    #[error("unexpected open parenthesis before {0:?}")]
    UnexpectedOpenParen(Vec<String>),

    #[error("multiple roots in tree description, extra tokens: {0:?}")]
    MultipleRoots(Vec<String>),

    #[error("leftover tokens: {0:?}")]
    LeftoverTokens(Vec<String>),
}

/// An ordered tree whose nodes each hold a value and any number of children
#[derive(Debug, Clone)]
pub struct Tree<V> {
    value: V,
    children: Vec<Tree<V>>,
}

impl<V> Tree<V> {
    /// Create a childless node
    pub fn new(value: V) -> Self {
        Tree {
            value,
            children: Vec::new(),
        }
    }

    /// Create a node owning the given children, in order
    pub fn with_children(value: V, children: impl IntoIterator<Item = Tree<V>>) -> Self {
        Tree {
            value,
            children: children.into_iter().collect(),
        }
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    /// Rebind the value held at this node; the topology is left untouched
    pub fn set_value(&mut self, value: V) {
        self.value = value;
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn children(&self) -> &[Tree<V>] {
        &self.children
    }

    /// Get the `index`th child
    pub fn child(&self, index: usize) -> Result<&Tree<V>, TreeError> {
        let len = self.children.len();
        self.children
            .get(index)
            .ok_or(TreeError::IndexOutOfRange { index, len })
    }

    /// Get the `index`th child mutably
    pub fn child_mut(&mut self, index: usize) -> Result<&mut Tree<V>, TreeError> {
        let len = self.children.len();
        self.children
            .get_mut(index)
            .ok_or(TreeError::IndexOutOfRange { index, len })
    }

    /// Append a child after any current children
    pub fn add_child(&mut self, child: Tree<V>) {
        self.children.push(child);
    }

    /// Insert a child so that it becomes the `index`th child.
    /// `index` may equal the current child count (append).
    pub fn insert_child(&mut self, index: usize, child: Tree<V>) -> Result<(), TreeError> {
        let len = self.children.len();
        if index > len {
            return Err(TreeError::IndexOutOfRange { index, len });
        }
        self.children.insert(index, child);
        Ok(())
    }

    /// Append several children after any current children
    pub fn add_children(&mut self, children: impl IntoIterator<Item = Tree<V>>) {
        self.children.extend(children);
    }

    /// Convert every value in the tree, preserving shape
    pub fn map<U>(self, mut f: impl FnMut(V) -> U) -> Tree<U> {
        self.map_with(&mut f)
    }

    fn map_with<U>(self, f: &mut impl FnMut(V) -> U) -> Tree<U> {
        let value = f(self.value);
        let children = self.children.into_iter().map(|c| c.map_with(f)).collect();
        Tree { value, children }
    }
}

impl<V: fmt::Display> Tree<V> {
    /// Whether `node` equals this tree or any subtree of it
    pub fn contains<U: fmt::Display>(&self, node: &Tree<U>) -> bool {
        self.contains_serialized(&node.to_string())
    }

    fn contains_serialized(&self, target: &str) -> bool {
        self.to_string() == target || self.children.iter().any(|c| c.contains_serialized(target))
    }

    /// Multi-line rendering, one node per line, indented by depth
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        self.write_pretty(0, &mut out);
        out
    }

    fn write_pretty(&self, depth: usize, out: &mut String) {
        for _ in 0..depth {
            out.push_str("|  ");
        }
        out.push_str(&self.value.to_string());
        out.push('\n');
        for child in &self.children {
            child.write_pretty(depth + 1, out);
        }
    }
}

impl Tree<String> {
    /// Parse a description of the form `value(child child ... child)`.
    ///
    /// Values are any run of characters other than whitespace and parentheses;
    /// whitespace is only needed to separate adjacent values.
    pub fn parse(description: &str) -> Result<Self, TreeError> {
        check_parentheses(description)?;
        let mut tokens: VecDeque<String> = Self::tokenize(description).into();
        let tree = parse_tokens(&mut tokens)?.ok_or(TreeError::Empty)?;
        if let Some(next) = tokens.front() {
            let rest: Vec<String> = tokens.iter().cloned().collect();
            return Err(if is_paren(next) {
                TreeError::LeftoverTokens(rest)
            } else {
                TreeError::MultipleRoots(rest)
            });
        }
        Ok(tree)
    }

    /// Split a description into values and parentheses
    pub fn tokenize(description: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut current = String::new();
        for ch in description.chars() {
            if ch == '(' || ch == ')' || ch.is_whitespace() {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                if !ch.is_whitespace() {
                    tokens.push(ch.to_string());
                }
            } else {
                current.push(ch);
            }
        }
        if !current.is_empty() {
            tokens.push(current);
        }
        tokens
    }
}

impl FromStr for Tree<String> {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn is_paren(token: &str) -> bool {
    token == "(" || token == ")"
}

fn check_parentheses(s: &str) -> Result<(), TreeError> {
    let mut depth: usize = 0;
    for ch in s.chars() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| TreeError::TooManyClosing(s.to_string()))?;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(TreeError::NotEnoughClosing(s.to_string()));
    }
    Ok(())
}

/// Consume one tree from the front of `tokens`; `None` at a closing parenthesis
/// or when no tokens remain
fn parse_tokens(tokens: &mut VecDeque<String>) -> Result<Option<Tree<String>>, TreeError> {
    let Some(token) = tokens.pop_front() else {
        return Ok(None);
    };
    match token.as_str() {
        "(" => Err(TreeError::UnexpectedOpenParen(
            tokens.iter().cloned().collect(),
        )),
        ")" => Ok(None),
        _ => {
            let mut tree = Tree::new(token);
            if tokens.front().map(String::as_str) == Some("(") {
                tokens.pop_front();
                while let Some(child) = parse_tokens(tokens)? {
                    tree.add_child(child);
                }
            }
            Ok(Some(tree))
        }
    }
}

impl<V: fmt::Display> fmt::Display for Tree<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)?;
        if self.children.is_empty() {
            return Ok(());
        }
        f.write_str("(")?;
        let last = self.children.len() - 1;
        for (i, child) in self.children.iter().enumerate() {
            write!(f, "{}", child)?;
            if child.is_leaf() && i != last {
                f.write_str(" ")?;
            }
        }
        f.write_str(")")
    }
}

impl<V: fmt::Display, U: fmt::Display> PartialEq<Tree<U>> for Tree<V> {
    fn eq(&self, other: &Tree<U>) -> bool {
        self.to_string() == other.to_string()
    }
}

impl<V: fmt::Display> Eq for Tree<V> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(value: &str) -> Tree<String> {
        Tree::new(value.to_string())
    }

    fn node(value: &str, children: Vec<Tree<String>>) -> Tree<String> {
        Tree::with_children(value.to_string(), children)
    }

    /// one(two three(five) four(six(eight) seven) nine)
    fn sample() -> Tree<String> {
        let six = node("six", vec![leaf("eight")]);
        let four = node("four", vec![six, leaf("seven")]);
        let three = node("three", vec![leaf("five")]);
        node("one", vec![leaf("two"), three, four, leaf("nine")])
    }

    #[test]
    fn test_construction() {
        let tree1 = node("new", vec![leaf("two"), leaf("three")]);
        let tree2 = node("new", vec![leaf("two"), leaf("three")]);
        let tree3 = node("old", vec![leaf("two"), leaf("three")]);

        assert_eq!(tree1.value(), "new");
        assert_eq!(tree1.child_count(), 2);
        assert_eq!(tree1, tree2);
        assert_ne!(tree1, tree3);
    }

    #[test]
    fn test_set_value() {
        let mut root = sample();
        root.set_value("new".to_string());
        assert_eq!(root.value(), "new");
        assert_eq!(root.to_string(), "new(two three(five)four(six(eight)seven)nine)");
    }

    #[test]
    fn test_insert_child() {
        let mut tree = node("tree", vec![leaf("eight")]);
        tree.insert_child(0, leaf("two")).unwrap();
        assert_eq!(tree, node("tree", vec![leaf("two"), leaf("eight")]));

        // Inserting at the end is an append
        tree.insert_child(2, leaf("nine")).unwrap();
        assert_eq!(tree.to_string(), "tree(two eight nine)");
    }

    #[test]
    fn test_insert_child_out_of_range() {
        let mut root = sample();
        let result = root.insert_child(10, leaf("two"));
        assert_eq!(result, Err(TreeError::IndexOutOfRange { index: 10, len: 4 }));
        assert_eq!(root.child_count(), 4);
    }

    #[test]
    fn test_add_child_and_children() {
        let mut tree = leaf("tree");
        tree.add_child(leaf("two"));
        assert_eq!(tree, node("tree", vec![leaf("two")]));

        tree.add_children(vec![leaf("nine"), node("six", vec![leaf("eight")])]);
        assert_eq!(tree.to_string(), "tree(two nine six(eight))");
    }

    #[test]
    fn test_child_access() {
        let root = sample();
        assert_eq!(root.child_count(), 4);
        assert_eq!(root.child(0).unwrap(), &leaf("two"));
        assert_eq!(root.child(1).unwrap().child_count(), 1);
        assert!(root.child(3).unwrap().is_leaf());
        assert_eq!(
            root.child(10).unwrap_err(),
            TreeError::IndexOutOfRange { index: 10, len: 4 }
        );
    }

    #[test]
    fn test_contains() {
        let root = sample();
        assert!(root.contains(&leaf("eight")));
        assert!(root.contains(&leaf("two")));
        assert!(root.contains(&node("six", vec![leaf("eight")])));
        assert!(root.contains(&root));
        assert!(!leaf("five").contains(&root));
        assert!(!root.contains(&node("six", vec![leaf("seven")])));
    }

    #[test]
    fn test_to_string() {
        assert_eq!(
            sample().to_string(),
            "one(two three(five)four(six(eight)seven)nine)"
        );
        assert_eq!(leaf("alone").to_string(), "alone");
    }

    #[test]
    fn test_parse() {
        let root = sample();
        assert_eq!(
            Tree::parse("one ( two three(five)four  ( six(eight ) seven) nine)  ").unwrap(),
            root
        );
        assert_ne!(
            Tree::parse("one ( two three(five)four  ( six(eight ) ) nine)  ").unwrap(),
            root
        );
        assert_ne!(
            Tree::parse("one ( two three(five)four  ( six(eight ) BUZZ ) nine)  ").unwrap(),
            root
        );
    }

    #[test]
    fn test_parse_round_trip() {
        let trees = [
            sample(),
            leaf("x"),
            node("$seq", vec![]),
            node("def", vec![leaf("f"), leaf("$seq"), node("$seq", vec![leaf("1.0")])]),
        ];
        for tree in trees {
            let reparsed: Tree<String> = tree.to_string().parse().unwrap();
            assert_eq!(reparsed, tree);
        }
    }

    mod round_trip {
        use super::*;
        use proptest::prelude::*;

        const VALUE: &str = "[a-zA-Z0-9_$+*/=.,-]{1,6}";

        fn arb_tree() -> impl Strategy<Value = Tree<String>> {
            VALUE.prop_map(Tree::new).prop_recursive(5, 64, 6, |inner| {
                (VALUE, proptest::collection::vec(inner, 0..6))
                    .prop_map(|(value, children)| Tree::with_children(value, children))
            })
        }

        proptest! {
            #[test]
            fn serialized_tree_parses_back(tree in arb_tree()) {
                let text = tree.to_string();
                let reparsed = Tree::parse(&text)
                    .map_err(|e| TestCaseError::fail(format!("{text}: {e}")))?;
                prop_assert_eq!(reparsed.to_string(), text);
                prop_assert_eq!(reparsed.pretty(), tree.pretty());
            }
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Tree::parse("one (( ) )) two three(five)four  ( six(eight ) seven) nine)  "),
            Err(TreeError::TooManyClosing(_))
        ));
        assert!(matches!(
            Tree::parse("one ( two ( three )"),
            Err(TreeError::NotEnoughClosing(_))
        ));
        assert_eq!(Tree::parse("  \t\r\n  "), Err(TreeError::Empty));
        assert!(matches!(
            Tree::parse("(one two)"),
            Err(TreeError::UnexpectedOpenParen(_))
        ));
        assert!(matches!(
            Tree::parse("one(two) three"),
            Err(TreeError::MultipleRoots(_))
        ));
        assert!(matches!(
            Tree::parse("one(two)(three)"),
            Err(TreeError::LeftoverTokens(_))
        ));
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            Tree::tokenize("one (   two(three)four  )"),
            vec!["one", "(", "two", "(", "three", ")", "four", ")"]
        );
    }

    #[test]
    fn test_map_preserves_shape() {
        let lengths = sample().map(|v| v.len());
        assert_eq!(lengths.to_string(), "3(3 5(4)4(3(5)5)4)");
    }

    #[test]
    fn test_pretty() {
        let tree = node("four", vec![node("six", vec![leaf("eight")]), leaf("seven")]);
        assert_eq!(tree.pretty(), "four\n|  six\n|  |  eight\n|  seven\n");
    }
}
