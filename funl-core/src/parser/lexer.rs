use std::fmt;
use std::io::Read;

/// Words the lexer classifies as [`TokenKind::Keyword`]
pub const KEYWORDS: [&str; 7] = ["def", "val", "if", "else", "then", "end", "read"];

/// Classification of a lexed token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Name,
    Keyword,
    Number,
    Symbol,
    String,
    EndOfLine,
    EndOfInput,
    Error,
}

/// A classified piece of source text.
///
/// Numbers always carry their normalized floating-point text (`1` lexes as
/// `1.0`), strings carry their contents without quotes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    kind: TokenKind,
    text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
        }
    }

    pub fn name(text: impl Into<String>) -> Self {
        Token::new(TokenKind::Name, text)
    }

    pub fn keyword(text: impl Into<String>) -> Self {
        Token::new(TokenKind::Keyword, text)
    }

    pub fn symbol(text: impl Into<String>) -> Self {
        Token::new(TokenKind::Symbol, text)
    }

    pub fn string(text: impl Into<String>) -> Self {
        Token::new(TokenKind::String, text)
    }

    /// A number token holding the normalized text of `value`
    pub fn number(value: f64) -> Self {
        Token::new(TokenKind::Number, format_number(value))
    }

    pub fn error(message: impl Into<String>) -> Self {
        Token::new(TokenKind::Error, message)
    }

    /// Sentinel for a significant line break
    pub fn end_of_line() -> Self {
        Token::new(TokenKind::EndOfLine, "\n")
    }

    /// Sentinel for exhausted input
    pub fn end_of_input() -> Self {
        Token::new(TokenKind::EndOfInput, "")
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == keyword
    }

    /// Human-readable description for error messages
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::EndOfInput => "end of input".to_string(),
            TokenKind::EndOfLine => "end of line".to_string(),
            TokenKind::String => format!("\"{}\"", self.text),
            TokenKind::Error => format!("invalid input ({})", self.text),
            _ => format!("'{}'", self.text),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Canonical text of a number: always floating point (`6` → `6.0`,
/// `1e16` → `1.0e16`)
pub fn format_number(value: f64) -> String {
    let text = format!("{:?}", value);
    match text.split_once('e') {
        Some((mantissa, exponent)) if !mantissa.contains('.') => {
            format!("{}.0e{}", mantissa, exponent)
        }
        _ => text,
    }
}

/// Tokenizes source text with one token of push-back
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    current_char: Option<char>,
    /// Failure while reading the source; reported once the readable part is consumed
    read_error: Option<String>,
    last_token: Option<Token>,
    /// Last token other than end of line; decides whether `-` is a sign
    last_significant: Option<Token>,
    pushed_back: bool,
}

impl Lexer {
    /// Create a new lexer for the given input
    pub fn new(input: &str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let current_char = chars.first().copied();

        Lexer {
            input: chars,
            position: 0,
            current_char,
            read_error: None,
            last_token: None,
            last_significant: None,
            pushed_back: false,
        }
    }

    /// Create a lexer over everything `reader` yields. A read failure surfaces
    /// as an [`TokenKind::Error`] token after the text read so far.
    pub fn from_reader(mut reader: impl Read) -> Self {
        let mut bytes = Vec::new();
        let result = reader.read_to_end(&mut bytes);
        let mut lexer = Lexer::new(&String::from_utf8_lossy(&bytes));
        if let Err(e) = result {
            lexer.read_error = Some(e.to_string());
        }
        lexer
    }

    /// Return the next token, advancing past it
    pub fn next(&mut self) -> Token {
        if self.pushed_back {
            if let Some(token) = &self.last_token {
                self.pushed_back = false;
                return token.clone();
            }
        }
        let token = self.scan();
        if token.kind() != TokenKind::EndOfLine {
            self.last_significant = Some(token.clone());
        }
        self.last_token = Some(token.clone());
        token
    }

    /// Un-read the most recently returned token. Only one token of push-back
    /// is supported; a second call before `next` has no further effect.
    pub fn push_back(&mut self) {
        if self.last_token.is_some() {
            self.pushed_back = true;
        }
    }

    /// Tokenize the rest of the input, up to and including end of input or
    /// the first error token
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next();
            let done = matches!(token.kind(), TokenKind::EndOfInput | TokenKind::Error);
            tokens.push(token);

            if done {
                break;
            }
        }

        tokens
    }

    fn advance(&mut self) {
        self.position += 1;
        self.current_char = self.input.get(self.position).copied();
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    /// Skip whitespace other than line breaks
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char {
            if ch.is_whitespace() && ch != '\n' && ch != '\r' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.current_char {
            if ch == '\n' || ch == '\r' {
                break;
            }
            self.advance();
        }
    }

    fn skip_block_comment(&mut self) {
        self.advance(); // '/'
        self.advance(); // '*'
        while let Some(ch) = self.current_char {
            if ch == '*' && self.peek() == Some('/') {
                self.advance();
                self.advance();
                return;
            }
            self.advance();
        }
    }

    /// Whether the previous token could end an operand, in which case a
    /// following `-` is subtraction rather than a sign. Line breaks are
    /// transparent, matching the parser.
    fn previous_ends_operand(&self) -> bool {
        match &self.last_significant {
            Some(token) => match token.kind() {
                TokenKind::Name | TokenKind::Number => true,
                TokenKind::Symbol => token.text() == ")",
                _ => false,
            },
            None => false,
        }
    }

    fn starts_number(&self, ch: char) -> bool {
        ch.is_ascii_digit() || (ch == '.' && self.peek().is_some_and(|c| c.is_ascii_digit()))
    }

    /// Read an optionally signed decimal literal
    fn read_number(&mut self) -> Token {
        let mut literal = String::new();

        if self.current_char == Some('-') {
            literal.push('-');
            self.advance();
        }

        let mut seen_dot = false;
        while let Some(ch) = self.current_char {
            if ch.is_ascii_digit() {
                literal.push(ch);
            } else if ch == '.' && !seen_dot {
                seen_dot = true;
                literal.push(ch);
            } else {
                break;
            }
            self.advance();
        }

        match literal.parse::<f64>() {
            Ok(value) => Token::number(value),
            Err(_) => Token::error(format!("malformed number '{}'", literal)),
        }
    }

    fn read_word(&mut self) -> Token {
        let mut word = String::new();

        while let Some(ch) = self.current_char {
            if ch.is_alphanumeric() || ch == '_' {
                word.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if KEYWORDS.contains(&word.as_str()) {
            Token::keyword(word)
        } else {
            Token::name(word)
        }
    }

    fn read_string(&mut self) -> Token {
        self.advance(); // opening quote
        let mut contents = String::new();

        while let Some(ch) = self.current_char {
            match ch {
                '"' => {
                    self.advance();
                    return Token::string(contents);
                }
                '\n' | '\r' => break,
                '\\' => {
                    self.advance();
                    match self.current_char {
                        Some('n') => contents.push('\n'),
                        Some('t') => contents.push('\t'),
                        Some(other) => contents.push(other),
                        None => break,
                    }
                    self.advance();
                }
                _ => {
                    contents.push(ch);
                    self.advance();
                }
            }
        }

        Token::error(format!("unterminated string literal \"{}", contents))
    }

    fn scan(&mut self) -> Token {
        loop {
            self.skip_whitespace();

            match self.current_char {
                None => {
                    return match self.read_error.take() {
                        Some(message) => Token::error(message),
                        None => Token::end_of_input(),
                    };
                }

                Some('\r') => {
                    self.advance();
                    if self.current_char == Some('\n') {
                        self.advance();
                    }
                    return Token::end_of_line();
                }

                Some('\n') => {
                    self.advance();
                    return Token::end_of_line();
                }

                Some('/') if self.peek() == Some('/') => self.skip_line_comment(),

                Some('/') if self.peek() == Some('*') => self.skip_block_comment(),

                Some('"') => return self.read_string(),

                Some('-')
                    if self.peek().is_some_and(|c| c.is_ascii_digit())
                        && !self.previous_ends_operand() =>
                {
                    return self.read_number();
                }

                Some(ch) if self.starts_number(ch) => return self.read_number(),

                Some(ch) if ch.is_alphabetic() || ch == '_' => return self.read_word(),

                Some(ch) => {
                    self.advance();
                    return Token::symbol(ch.to_string());
                }
            }
        }
    }
}
