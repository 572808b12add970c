use crate::parser::ast::FunctionTable;
use crate::parser::error::SyntaxError;
use crate::parser::lexer::{Lexer, Token, TokenKind};
use crate::stack::ensure_sufficient_stack;
use crate::types::Tree;

/// Recursive descent parser for Funl.
///
/// Every grammar rule is a recognizer returning `Ok(true)` after pushing the subtree
/// it recognized onto the operand stack, or `Ok(false)` with the lookahead
/// untouched when the rule does not start here. Once a rule has consumed its
/// leading token, a missing continuation is a [`SyntaxError`].
///
/// Line breaks are insignificant to the grammar.
pub struct Parser {
    lexer: Lexer,
    stack: Vec<Tree<Token>>,
}

impl Parser {
    /// Create a new parser from input string
    pub fn new(input: &str) -> Self {
        Parser::from_lexer(Lexer::new(input))
    }

    pub fn from_lexer(lexer: Lexer) -> Self {
        Parser {
            lexer,
            stack: Vec::new(),
        }
    }

    /// The most recently completed subtree
    pub fn top(&self) -> Option<&Tree<Token>> {
        self.stack.last()
    }

    /// Number of subtrees on the operand stack
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Remove and return the most recently completed subtree
    pub fn take(&mut self) -> Option<Tree<Token>> {
        self.stack.pop()
    }

    /// Parse a whole program: any number of function definitions, then end of
    /// input
    /// Grammar: program = {functionDefinition}
    pub fn program(&mut self) -> Result<FunctionTable, SyntaxError> {
        let mut functions = FunctionTable::new();

        while self.function_definition()? {
            let function = self.pop()?;
            let name = function
                .child(0)
                .map(|n| n.value().text().to_string())
                .map_err(|_| self.internal("definition without a name"))?;
            functions.insert(name, function);
        }

        self.expect_end("function definition")?;
        Ok(functions)
    }

    /// Grammar: functionDefinition = "def" name {parameter} "=" expressions "end"
    pub fn function_definition(&mut self) -> Result<bool, SyntaxError> {
        if !self.keyword("def")? {
            return Ok(false);
        }
        self.push(Token::keyword("def"));
        if !self.name()? {
            return Err(self.error("no name after keyword 'def'"));
        }
        let mut params = Tree::new(Token::seq());
        while self.parameter()? {
            params.add_child(self.pop()?);
        }
        self.stack.push(params);
        if !self.symbol("=")? {
            return Err(self.error("no equal sign ('=') after parameters"));
        }
        if !self.expressions()? {
            return Err(self.error("no expressions after equal sign ('=')"));
        }
        if !self.keyword("end")? {
            return Err(self.error("function definition ends without keyword 'end'"));
        }
        self.make_tree(4, &[3, 2, 1])?;
        Ok(true)
    }

    /// Grammar: parameter = name
    pub fn parameter(&mut self) -> Result<bool, SyntaxError> {
        self.name()
    }

    /// Grammar: expressions = expression {"," expression}
    pub fn expressions(&mut self) -> Result<bool, SyntaxError> {
        if !self.expression()? {
            return Ok(false);
        }
        let first = self.pop()?;
        self.stack
            .push(Tree::with_children(Token::seq(), [first]));
        while self.symbol(",")? {
            if !self.expression()? {
                return Err(self.error("no expression after comma (',')"));
            }
            self.make_tree(2, &[1])?;
        }
        Ok(true)
    }

    /// Grammar: expression = valueDefinition | addTerm
    pub fn expression(&mut self) -> Result<bool, SyntaxError> {
        ensure_sufficient_stack(|| -> Result<bool, SyntaxError> {
            Ok(self.value_definition()? || self.add_term()?)
        })
    }

    /// Grammar: valueDefinition = "val" name "=" expression
    pub fn value_definition(&mut self) -> Result<bool, SyntaxError> {
        if !self.keyword("val")? {
            return Ok(false);
        }
        self.push(Token::keyword("val"));
        if !self.name()? {
            return Err(self.error("no name after keyword 'val'"));
        }
        if !self.symbol("=")? {
            return Err(self.error("no equal sign ('=') after name"));
        }
        if !self.expression()? {
            return Err(self.error("no expression after equal sign ('=')"));
        }
        self.make_tree(3, &[2, 1])?;
        Ok(true)
    }

    /// Left-associative sum of terms
    /// Grammar: addTerm = term {("+" | "-") term}
    pub fn add_term(&mut self) -> Result<bool, SyntaxError> {
        if !self.term()? {
            return Ok(false);
        }
        while self.add_operator()? {
            if !self.term()? {
                return Err(self.error("no term after '+' or '-'"));
            }
            self.make_tree(2, &[3, 1])?;
        }
        Ok(true)
    }

    /// Left-associative product of factors
    /// Grammar: term = factor {("*" | "/") factor}
    pub fn term(&mut self) -> Result<bool, SyntaxError> {
        if !self.factor()? {
            return Ok(false);
        }
        while self.multiply_operator()? {
            if !self.factor()? {
                return Err(self.error("no factor after '*' or '/'"));
            }
            self.make_tree(2, &[3, 1])?;
        }
        Ok(true)
    }

    /// Grammar: factor = nameOrCall | ifExpr | number | readExpr | "(" expression ")"
    pub fn factor(&mut self) -> Result<bool, SyntaxError> {
        Ok(self.name_or_call()?
            || self.if_expression()?
            || self.number()?
            || self.read_expression()?
            || self.parenthesized_expression()?)
    }

    /// A bare name, or a call when followed by a parenthesized argument list.
    /// An empty argument list still yields an (empty) `$seq`.
    /// Grammar: nameOrCall = name ["(" [expressions] ")"]
    pub fn name_or_call(&mut self) -> Result<bool, SyntaxError> {
        if !self.name()? {
            return Ok(false);
        }
        if self.symbol("(")? {
            self.push(Token::call());
            if !self.expressions()? {
                self.push(Token::seq());
            }
            if !self.symbol(")")? {
                return Err(self.error("no closing parenthesis (')') after arguments of a call"));
            }
            self.make_tree(2, &[3, 1])?;
        }
        Ok(true)
    }

    /// Grammar: ifExpr = "if" expressions "then" expressions "else" expressions "end"
    pub fn if_expression(&mut self) -> Result<bool, SyntaxError> {
        if !self.keyword("if")? {
            return Ok(false);
        }
        self.push(Token::keyword("if"));
        if !self.expressions()? {
            return Err(self.error("no expressions after keyword 'if'"));
        }
        if !self.keyword("then")? {
            return Err(self.error("no keyword 'then' after condition"));
        }
        if !self.expressions()? {
            return Err(self.error("no expressions after keyword 'then'"));
        }
        if !self.keyword("else")? {
            return Err(self.error("no keyword 'else' after expressions"));
        }
        if !self.expressions()? {
            return Err(self.error("no expressions after keyword 'else'"));
        }
        if !self.keyword("end")? {
            return Err(self.error("no keyword 'end' after last expressions"));
        }
        self.make_tree(4, &[3, 2, 1])?;
        Ok(true)
    }

    /// Grammar: readExpr = "read" quotedString
    pub fn read_expression(&mut self) -> Result<bool, SyntaxError> {
        if !self.keyword("read")? {
            return Ok(false);
        }
        self.push(Token::keyword("read"));
        if !self.quoted_string()? {
            return Err(self.error("no quoted string after keyword 'read'"));
        }
        self.make_tree(2, &[1])?;
        Ok(true)
    }

    /// Grammar: "(" expression ")"
    fn parenthesized_expression(&mut self) -> Result<bool, SyntaxError> {
        if !self.symbol("(")? {
            return Ok(false);
        }
        if !self.expression()? {
            return Err(self.error("no expression after opening parenthesis ('(')"));
        }
        if !self.symbol(")")? {
            return Err(self.error("no closing parenthesis (')') after expression"));
        }
        Ok(true)
    }

    pub fn add_operator(&mut self) -> Result<bool, SyntaxError> {
        Ok(self.operator("+")? || self.operator("-")?)
    }

    pub fn multiply_operator(&mut self) -> Result<bool, SyntaxError> {
        Ok(self.operator("*")? || self.operator("/")?)
    }

    fn operator(&mut self, op: &str) -> Result<bool, SyntaxError> {
        if !self.symbol(op)? {
            return Ok(false);
        }
        self.push(Token::symbol(op));
        Ok(true)
    }

    pub fn number(&mut self) -> Result<bool, SyntaxError> {
        self.next_token_is_kind(TokenKind::Number)
    }

    pub fn name(&mut self) -> Result<bool, SyntaxError> {
        self.next_token_is_kind(TokenKind::Name)
    }

    fn quoted_string(&mut self) -> Result<bool, SyntaxError> {
        self.next_token_is_kind(TokenKind::String)
    }

    fn keyword(&mut self, keyword: &str) -> Result<bool, SyntaxError> {
        self.next_token_is(TokenKind::Keyword, keyword)
    }

    fn symbol(&mut self, symbol: &str) -> Result<bool, SyntaxError> {
        self.next_token_is(TokenKind::Symbol, symbol)
    }

    /// Whether the input starts with the given keyword; consumes nothing
    pub fn starts_with_keyword(&mut self, keyword: &str) -> Result<bool, SyntaxError> {
        let token = self.next_token()?;
        self.lexer.push_back();
        Ok(token.is_keyword(keyword))
    }

    /// Fail unless all input has been consumed
    pub fn expect_end(&mut self, after: &str) -> Result<(), SyntaxError> {
        let token = self.next_token()?;
        if token.kind() == TokenKind::EndOfInput {
            return Ok(());
        }
        Err(SyntaxError::new(
            format!("unexpected input after {}", after),
            &token,
        ))
    }

    /// Consume a token of `kind` (any text) and push it as a leaf
    fn next_token_is_kind(&mut self, kind: TokenKind) -> Result<bool, SyntaxError> {
        let token = self.next_token()?;
        if token.kind() == kind {
            self.push(token);
            return Ok(true);
        }
        self.lexer.push_back();
        Ok(false)
    }

    /// Consume a token matching both `kind` and `text`; nothing is pushed
    fn next_token_is(&mut self, kind: TokenKind, text: &str) -> Result<bool, SyntaxError> {
        let token = self.next_token()?;
        if token.kind() == kind && token.text() == text {
            return Ok(true);
        }
        self.lexer.push_back();
        Ok(false)
    }

    /// Next grammatically significant token. Line breaks are skipped and a
    /// lexer error token ends the parse.
    fn next_token(&mut self) -> Result<Token, SyntaxError> {
        loop {
            let token = self.lexer.next();
            match token.kind() {
                TokenKind::EndOfLine => continue,
                TokenKind::Error => {
                    return Err(SyntaxError {
                        message: "cannot continue lexing".to_string(),
                        found: token.describe(),
                    });
                }
                _ => return Ok(token),
            }
        }
    }

    /// Build a syntax error describing the upcoming token
    fn error(&mut self, message: &str) -> SyntaxError {
        match self.next_token() {
            Ok(found) => {
                self.lexer.push_back();
                SyntaxError::new(message, &found)
            }
            Err(lexer_error) => lexer_error,
        }
    }

    fn internal(&self, what: &str) -> SyntaxError {
        SyntaxError {
            message: format!("internal parser error: {}", what),
            found: format!("{} operand(s)", self.stack.len()),
        }
    }

    fn push(&mut self, token: Token) {
        self.stack.push(Tree::new(token));
    }

    fn pop(&mut self) -> Result<Tree<Token>, SyntaxError> {
        match self.stack.pop() {
            Some(tree) => Ok(tree),
            None => Err(self.internal("operand stack underflow")),
        }
    }

    /// Reduce the top of the operand stack into one tree. Positions count from
    /// the top of the stack (1 = top); `root` and `children` together must name
    /// exactly the topmost `children.len() + 1` entries.
    fn make_tree(&mut self, root: usize, children: &[usize]) -> Result<(), SyntaxError> {
        let count = children.len() + 1;
        let base = self
            .stack
            .len()
            .checked_sub(count)
            .ok_or_else(|| self.internal("operand stack underflow"))?;
        let mut operands: Vec<Option<Tree<Token>>> =
            self.stack.drain(base..).map(Some).collect();

        let mut take = |position: usize| {
            count
                .checked_sub(position)
                .and_then(|index| operands.get_mut(index))
                .and_then(Option::take)
        };

        let Some(mut tree) = take(root) else {
            return Err(self.internal("bad reduction root"));
        };
        for &position in children {
            let Some(child) = take(position) else {
                return Err(self.internal("bad reduction child"));
            };
            tree.add_child(child);
        }
        self.stack.push(tree);
        Ok(())
    }
}

/// Parse a batch of function definitions into a fresh function table
pub fn parse_top_level(input: &str) -> Result<FunctionTable, SyntaxError> {
    Parser::new(input).program()
}

/// Parse one line of interactive input.
///
/// Input starting with `def` is a function definition, input containing a
/// comma is an expression sequence, anything else a single expression.
/// Returns `Ok(None)` when nothing at all could be recognized.
pub fn parse_one_expression(input: &str) -> Result<Option<Tree<Token>>, SyntaxError> {
    let mut parser = Parser::new(input);

    let matched = if parser.starts_with_keyword("def")? {
        parser.function_definition()?
    } else if input.contains(',') {
        parser.expressions()?
    } else {
        parser.expression()?
    };
    if !matched {
        return Ok(None);
    }

    parser.expect_end("expression")?;
    Ok(parser.take())
}
