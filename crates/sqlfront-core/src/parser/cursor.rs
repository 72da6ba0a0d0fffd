//! Token cursor with mark/reset.
//!
//! Tokens are pulled from the lexer on demand and kept in a per-statement
//! buffer, so peeking arbitrarily far ahead and rolling back to a
//! [`Checkpoint`] are both cheap: a checkpoint is just a buffer index plus the
//! identifier window.

use std::collections::{BTreeMap, BTreeSet};

use super::error::{Expected, ParseError, Result};
use crate::lexer::{Lexer, Span, Token, TokenKind};

/// A saved cursor state. Only valid for the statement it was taken in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pos: usize,
    window: [Option<usize>; 2],
    generation: u64,
}

/// Bounded lookahead and commit/rollback over the token stream.
pub struct TokenCursor<'a> {
    lexer: Lexer<'a>,
    tokens: Vec<Token>,
    pos: usize,
    /// Buffer indices of the last two identifier tokens consumed, oldest
    /// first.
    window: [Option<usize>; 2],
    generation: u64,
    exhausted: bool,
    eof: Token,
    /// Expectations by token position. Kept until the statement ends so a
    /// rollback to an earlier position still sees what was tried there.
    ledger: BTreeMap<usize, BTreeSet<Expected>>,
}

impl<'a> TokenCursor<'a> {
    /// Creates a cursor over the tokens of `lexer`.
    #[must_use]
    pub fn new(lexer: Lexer<'a>) -> Self {
        let end = lexer.source().len();
        Self {
            lexer,
            tokens: Vec::new(),
            pos: 0,
            window: [None, None],
            generation: 0,
            exhausted: false,
            eof: Token::new(TokenKind::Eof, Span::empty(end)),
            ledger: BTreeMap::new(),
        }
    }

    /// The source text being parsed.
    #[must_use]
    pub const fn source(&self) -> &'a str {
        self.lexer.source()
    }

    fn fill(&mut self, len: usize) {
        while self.tokens.len() < len && !self.exhausted {
            let token = self.lexer.next_token();
            if token.is_eof() {
                self.exhausted = true;
                self.eof = token;
            } else {
                self.tokens.push(token);
            }
        }
    }

    /// Returns the token `k` positions ahead without consuming; `k = 1` is
    /// the next token. Past the end of input this is the EOF token.
    pub fn peek(&mut self, k: usize) -> &Token {
        debug_assert!(k >= 1, "peek distance starts at 1");
        let index = self.pos + k.saturating_sub(1);
        self.fill(index + 1);
        self.tokens.get(index).unwrap_or(&self.eof)
    }

    /// Kind of the token `k` positions ahead.
    pub fn peek_kind(&mut self, k: usize) -> &TokenKind {
        &self.peek(k).kind
    }

    /// Consumes and returns the next token. At end of input the EOF token is
    /// returned and the position does not move.
    pub fn advance(&mut self) -> Token {
        let token = self.peek(1).clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Consumes the next token, which must have the same kind as `expected`.
    ///
    /// # Errors
    ///
    /// Returns an unexpected-token error, carrying every expectation recorded
    /// at this position, when the kinds differ.
    pub fn consume(&mut self, expected: &TokenKind) -> Result<Token> {
        if self.peek(1).kind.same_variant(expected) {
            return Ok(self.advance());
        }
        self.record(Expected::token(expected));
        Err(self.unexpected())
    }

    /// Builds an error for the next token from the expectations recorded at
    /// its position. Error tokens from the lexer become lexical errors.
    pub fn unexpected(&mut self) -> ParseError {
        let token = self.peek(1).clone();
        if let TokenKind::Error(message) = &token.kind {
            return ParseError::lexical(message.clone(), token.span);
        }
        ParseError::unexpected(self.expected_here(), token.kind, token.span)
    }

    /// Records that `expected` would have been accepted at the current
    /// position.
    pub fn record(&mut self, expected: Expected) {
        self.ledger.entry(self.pos).or_default().insert(expected);
    }

    /// Every expectation recorded at the current position, in order.
    #[must_use]
    pub fn expected_here(&self) -> Vec<Expected> {
        self.ledger
            .get(&self.pos)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Index of the next token within the current statement.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Bumped every time a new statement starts.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Span of the most recently consumed token.
    #[must_use]
    pub fn previous_span(&self) -> Span {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(token) => token.span,
            None => {
                let start = self.tokens.first().map_or(self.eof.span.start, |t| t.span.start);
                Span::empty(start)
            }
        }
    }

    /// Captures the current state.
    #[must_use]
    pub const fn mark(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            window: self.window,
            generation: self.generation,
        }
    }

    /// Restores the state captured by `checkpoint`.
    pub fn reset(&mut self, checkpoint: Checkpoint) {
        debug_assert_eq!(
            checkpoint.generation, self.generation,
            "checkpoint taken in an earlier statement"
        );
        self.pos = checkpoint.pos;
        self.window = checkpoint.window;
    }

    /// Starts a new statement: drops consumed tokens, invalidates older
    /// checkpoints and clears the identifier window and expectations.
    pub fn begin_statement(&mut self) {
        self.tokens.drain(..self.pos);
        self.pos = 0;
        self.window = [None, None];
        self.ledger.clear();
        self.generation += 1;
    }

    /// Marks the token just consumed as an identifier.
    pub fn note_identifier(&mut self) {
        if let Some(index) = self.pos.checked_sub(1) {
            self.window = [self.window[1], Some(index)];
        }
    }

    /// The last two identifier tokens consumed, oldest first.
    #[must_use]
    pub fn identifier_window(&self) -> [Option<&Token>; 2] {
        self.window
            .map(|slot| slot.and_then(|index| self.tokens.get(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Keyword;
    use proptest::prelude::*;

    fn cursor(sql: &str) -> TokenCursor<'_> {
        TokenCursor::new(Lexer::new(sql))
    }

    fn upcoming(cursor: &mut TokenCursor<'_>, n: usize) -> Vec<TokenKind> {
        (1..=n).map(|k| cursor.peek_kind(k).clone()).collect()
    }

    #[test]
    fn test_peek_past_end_is_eof() {
        let mut cursor = cursor("SELECT 1");
        assert_eq!(cursor.peek_kind(1), &TokenKind::Keyword(Keyword::Select));
        assert!(cursor.peek(3).is_eof());
        assert!(cursor.peek(50).is_eof());
        cursor.advance();
        cursor.advance();
        assert!(cursor.advance().is_eof());
        assert!(cursor.advance().is_eof());
    }

    #[test]
    fn test_consume_mismatch_reports_expectation() {
        let mut cursor = cursor("SELECT x");
        let err = cursor.consume(&TokenKind::LeftParen).unwrap_err();
        assert_eq!(err.expected, vec![Expected::Token("(")]);
        assert_eq!(err.found, Some(TokenKind::Keyword(Keyword::Select)));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_reset_restores_identifier_window() {
        let mut cursor = cursor("a . b . c");
        cursor.advance();
        cursor.note_identifier();
        let checkpoint = cursor.mark();
        cursor.advance();
        cursor.advance();
        cursor.note_identifier();
        assert!(cursor.identifier_window()[0].is_some());
        cursor.reset(checkpoint);
        let [older, newer] = cursor.identifier_window();
        assert!(older.is_none());
        assert_eq!(newer.map(|t| t.span), Some(Span::new(0, 1)));
    }

    #[test]
    fn test_ledger_tracks_current_position() {
        let mut cursor = cursor("SELECT a");
        cursor.record(Expected::Keyword(Keyword::Insert));
        cursor.record(Expected::Keyword(Keyword::Insert));
        assert_eq!(cursor.expected_here().len(), 1);
        cursor.advance();
        assert!(cursor.expected_here().is_empty());
    }

    #[test]
    fn test_reset_keeps_expectations_at_checkpoint() {
        let mut cursor = cursor("(1 + 2");
        cursor.record(Expected::Keyword(Keyword::Default));
        let checkpoint = cursor.mark();
        cursor.advance();
        cursor.advance();
        cursor.record(Expected::Token(")"));
        cursor.reset(checkpoint);
        assert_eq!(
            cursor.expected_here(),
            vec![Expected::Keyword(Keyword::Default)]
        );
    }

    #[test]
    fn test_begin_statement_drops_consumed_tokens() {
        let mut cursor = cursor("SELECT 1; SELECT 2");
        cursor.advance();
        cursor.advance();
        cursor.advance();
        let generation = cursor.generation();
        cursor.begin_statement();
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.generation(), generation + 1);
        assert_eq!(cursor.peek_kind(1), &TokenKind::Keyword(Keyword::Select));
        assert_eq!(cursor.peek(1).span, Span::new(10, 16));
    }

    #[test]
    fn test_lexical_error_token() {
        let mut cursor = cursor("SELECT @");
        cursor.advance();
        let err = cursor.unexpected();
        assert_eq!(err.kind, crate::parser::ParseErrorKind::Lexical);
    }

    fn spans(cursor: &TokenCursor<'_>) -> Vec<Option<Span>> {
        cursor
            .identifier_window()
            .iter()
            .map(|token| token.map(|t| t.span))
            .collect()
    }

    #[derive(Debug, Clone)]
    enum Step {
        Peek(usize),
        Advance,
        Identifier,
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            (1usize..6).prop_map(Step::Peek),
            Just(Step::Advance),
            Just(Step::Identifier),
        ]
    }

    proptest! {
        #[test]
        fn prop_reset_is_exact(
            skip in 0usize..6,
            steps in prop::collection::vec(step(), 0..24),
        ) {
            let sql = "SELECT a, b.c FROM t WHERE (x + 1) * 2 > ? AND y IN (1, 2)";
            let mut cursor = cursor(sql);
            for _ in 0..skip {
                cursor.advance();
            }
            cursor.note_identifier();
            let before = upcoming(&mut cursor, 8);
            let window = spans(&cursor);
            let checkpoint = cursor.mark();

            for step in steps {
                match step {
                    Step::Peek(k) => {
                        cursor.peek(k);
                    }
                    Step::Advance => {
                        cursor.advance();
                    }
                    Step::Identifier => cursor.note_identifier(),
                }
            }

            cursor.reset(checkpoint);
            prop_assert_eq!(upcoming(&mut cursor, 8), before);
            prop_assert_eq!(spans(&cursor), window);
            prop_assert_eq!(cursor.mark(), checkpoint);
        }
    }
}
