//! SQL Tokenizer implementation.

use super::{Keyword, Span, Token, TokenKind};

/// A pull-based lexer that tokenizes SQL input.
///
/// The lexer never fails: input it cannot classify becomes a
/// [`TokenKind::Error`] token and the parser turns that into a lexical error
/// when it tries to use it.
pub struct Lexer<'a> {
    /// The input source code.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
    /// Whether `` `name` `` is a delimited identifier.
    backticks: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
            backticks: false,
        }
    }

    /// Enables or disables backtick-delimited identifiers.
    #[must_use]
    pub const fn backtick_identifiers(mut self, enabled: bool) -> Self {
        self.backticks = enabled;
        self
    }

    /// Returns the source text being tokenized.
    #[must_use]
    pub const fn source(&self) -> &'a str {
        self.input
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skips whitespace and comments.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.advance();
            }

            // -- line comment
            if self.peek() == Some('-') && self.peek_next() == Some('-') {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }

            // /* block comment */
            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                self.advance();
                self.advance();
                loop {
                    match self.advance() {
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            break;
                        }
                        None => break,
                        _ => {}
                    }
                }
                continue;
            }

            break;
        }
    }

    /// Creates a token spanning from the token start to the current position.
    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, Span::new(self.start, self.pos))
    }

    fn error(&self, message: impl Into<String>) -> Token {
        self.make_token(TokenKind::Error(message.into()))
    }

    /// Scans an identifier or keyword.
    fn scan_word(&mut self) -> Token {
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.advance();
        }

        let text = &self.input[self.start..self.pos];
        match Keyword::from_str(text) {
            Some(keyword) => self.make_token(TokenKind::Keyword(keyword)),
            None => self.make_token(TokenKind::Identifier(text.to_string())),
        }
    }

    /// Scans a delimited identifier; the opening quote is already consumed.
    fn scan_delimited_identifier(&mut self, quote: char) -> Token {
        let mut name = String::new();
        loop {
            match self.advance() {
                Some(c) if c == quote => {
                    if self.peek() == Some(quote) {
                        self.advance();
                        name.push(quote);
                    } else {
                        break;
                    }
                }
                Some(c) => name.push(c),
                None => return self.error("Unterminated delimited identifier"),
            }
        }

        if name.is_empty() {
            return self.error("Zero-length delimited identifier");
        }
        self.make_token(TokenKind::QuotedIdentifier(name))
    }

    /// Scans a numeric literal; exponent forms are approximate numbers.
    fn scan_number(&mut self) -> Token {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if self.peek() == Some('.') {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let mut approximate = false;
        if self.peek().is_some_and(|c| c == 'e' || c == 'E') {
            approximate = true;
            self.advance();
            if self.peek().is_some_and(|c| c == '+' || c == '-') {
                self.advance();
            }
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                return self.error("Missing exponent digits in numeric literal");
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        if self.peek().is_some_and(|c| c.is_alphabetic() || c == '_') {
            while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
                self.advance();
            }
            let text = &self.input[self.start..self.pos];
            return self.error(format!("Invalid numeric literal: {text}"));
        }

        let text = self.input[self.start..self.pos].to_string();
        if approximate {
            self.make_token(TokenKind::ApproxNumber(text))
        } else {
            self.make_token(TokenKind::ExactNumber(text))
        }
    }

    /// Scans a string literal; the opening quote is already consumed.
    fn scan_string(&mut self) -> Token {
        let mut value = String::new();
        loop {
            match self.advance() {
                Some('\'') => {
                    if self.peek() == Some('\'') {
                        self.advance();
                        value.push('\'');
                    } else {
                        break;
                    }
                }
                Some(c) => value.push(c),
                None => return self.error("Unterminated string literal"),
            }
        }
        self.make_token(TokenKind::String(value))
    }

    /// Scans a hex literal body (`X'...'`); the `X'` prefix is already consumed.
    fn scan_hex_string(&mut self) -> Token {
        let mut digits = String::new();
        loop {
            match self.advance() {
                Some('\'') => break,
                Some(c) if c.is_ascii_hexdigit() => digits.push(c),
                Some(_) => return self.error("Invalid character in hex literal"),
                None => return self.error("Unterminated hex literal"),
            }
        }

        if digits.len() % 2 != 0 {
            return self.error("Odd number of hex digits in hex literal");
        }

        let bytes = (0..digits.len())
            .step_by(2)
            .filter_map(|i| u8::from_str_radix(&digits[i..i + 2], 16).ok())
            .collect();
        self.make_token(TokenKind::HexString(bytes))
    }

    /// Scans `$n`; the `$` is already consumed.
    fn scan_positional_parameter(&mut self) -> Token {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        let digits = &self.input[self.start + 1..self.pos];
        match digits.parse::<u32>() {
            Ok(n) => self.make_token(TokenKind::Parameter(n)),
            Err(_) => self.error(format!("Invalid positional parameter: ${digits}")),
        }
    }

    /// Scans the next token.
    #[must_use]
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();
        self.start = self.pos;

        let Some(c) = self.advance() else {
            return self.make_token(TokenKind::Eof);
        };

        match c {
            '(' => self.make_token(TokenKind::LeftParen),
            ')' => self.make_token(TokenKind::RightParen),
            ',' => self.make_token(TokenKind::Comma),
            ';' => self.make_token(TokenKind::Semicolon),
            '+' => self.make_token(TokenKind::Plus),
            '-' => self.make_token(TokenKind::Minus),
            '*' => self.make_token(TokenKind::Star),
            '/' => self.make_token(TokenKind::Slash),
            '%' => self.make_token(TokenKind::Percent),
            '~' => self.make_token(TokenKind::BitNot),
            '^' => self.make_token(TokenKind::BitXor),
            '&' => self.make_token(TokenKind::BitAnd),
            '?' => self.make_token(TokenKind::Question),
            ':' => self.make_token(TokenKind::Colon),
            '=' => self.make_token(TokenKind::Eq),
            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => {
                self.pos = self.start;
                self.scan_number()
            }
            '.' => self.make_token(TokenKind::Dot),
            '<' => match self.peek() {
                Some('=') => {
                    self.advance();
                    self.make_token(TokenKind::LtEq)
                }
                Some('>') => {
                    self.advance();
                    self.make_token(TokenKind::NotEq)
                }
                Some('<') => {
                    self.advance();
                    self.make_token(TokenKind::LeftShift)
                }
                _ => self.make_token(TokenKind::Lt),
            },
            '>' => match self.peek() {
                Some('=') => {
                    self.advance();
                    self.make_token(TokenKind::GtEq)
                }
                Some('>') => {
                    self.advance();
                    self.make_token(TokenKind::RightShift)
                }
                _ => self.make_token(TokenKind::Gt),
            },
            '!' if self.peek() == Some('=') => {
                self.advance();
                self.make_token(TokenKind::NotEq)
            }
            '|' if self.peek() == Some('|') => {
                self.advance();
                self.make_token(TokenKind::Concat)
            }
            '|' => self.make_token(TokenKind::BitOr),
            '\'' => self.scan_string(),
            '"' => self.scan_delimited_identifier('"'),
            '`' if self.backticks => self.scan_delimited_identifier('`'),
            '$' if self.peek().is_some_and(|c| c.is_ascii_digit()) => {
                self.scan_positional_parameter()
            }
            'X' | 'x' if self.peek() == Some('\'') => {
                self.advance();
                self.scan_hex_string()
            }
            c if c.is_ascii_digit() => {
                self.pos = self.start;
                self.scan_number()
            }
            c if c.is_alphabetic() || c == '_' => {
                self.pos = self.start;
                self.scan_word()
            }
            _ => self.error(format!("Unexpected character: {c}")),
        }
    }

    /// Tokenizes the entire input and returns all tokens, ending with EOF.
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input).tokenize().into_iter().map(|t| t.kind).collect()
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Identifier(name.to_string())
    }

    fn number(text: &str) -> TokenKind {
        TokenKind::ExactNumber(text.to_string())
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(token_kinds("   \n\t  "), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            token_kinds("SELECT -- comment\n /* block */ FROM"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(
            token_kinds("select FROM wHeRe"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Keyword(Keyword::Where),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(
            token_kinds("foo bar_baz \"Mixed Case\""),
            vec![
                ident("foo"),
                ident("bar_baz"),
                TokenKind::QuotedIdentifier("Mixed Case".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_backticks_are_gated() {
        let tokens = token_kinds("`name`");
        assert!(matches!(tokens[0], TokenKind::Error(_)));

        let tokens: Vec<_> = Lexer::new("`na``me`")
            .backtick_identifiers(true)
            .tokenize()
            .into_iter()
            .map(|t| t.kind)
            .collect();
        assert_eq!(tokens[0], TokenKind::QuotedIdentifier("na`me".to_string()));
    }

    #[test]
    fn test_numbers_keep_raw_text() {
        assert_eq!(
            token_kinds("42 3.50 .5 1e10 2.5E-3"),
            vec![
                number("42"),
                number("3.50"),
                number(".5"),
                TokenKind::ApproxNumber("1e10".to_string()),
                TokenKind::ApproxNumber("2.5E-3".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_malformed_number_is_error() {
        assert!(matches!(token_kinds("12abc")[0], TokenKind::Error(_)));
        assert!(matches!(token_kinds("1e")[0], TokenKind::Error(_)));
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            token_kinds("'it''s' X'CAFE'"),
            vec![
                TokenKind::String("it's".to_string()),
                TokenKind::HexString(vec![0xCA, 0xFE]),
                TokenKind::Eof,
            ]
        );
        assert!(matches!(token_kinds("'open")[0], TokenKind::Error(_)));
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            token_kinds("+ - * / % = != <> < <= > >= || & | ^ ~ << >>"),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Percent,
                TokenKind::Eq,
                TokenKind::NotEq,
                TokenKind::NotEq,
                TokenKind::Lt,
                TokenKind::LtEq,
                TokenKind::Gt,
                TokenKind::GtEq,
                TokenKind::Concat,
                TokenKind::BitAnd,
                TokenKind::BitOr,
                TokenKind::BitXor,
                TokenKind::BitNot,
                TokenKind::LeftShift,
                TokenKind::RightShift,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_parameters() {
        assert_eq!(
            token_kinds("? $1 $12"),
            vec![
                TokenKind::Question,
                TokenKind::Parameter(1),
                TokenKind::Parameter(12),
                TokenKind::Eof,
            ]
        );
        assert_eq!(token_kinds("$0")[0], TokenKind::Parameter(0));
        assert!(matches!(token_kinds("$99999999999")[0], TokenKind::Error(_)));
    }

    #[test]
    fn test_span_tracking() {
        let tokens = Lexer::new("SELECT id").tokenize();
        assert_eq!(tokens[0].span, Span::new(0, 6));
        assert_eq!(tokens[1].span, Span::new(7, 9));
        assert_eq!(tokens[2].span, Span::new(9, 9));
    }
}
