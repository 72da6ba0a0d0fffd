//! SQL Parser implementation.
//!
//! The grammar is split by concern: expressions in `expr.rs`, query
//! expressions in `query.rs`, DML in `dml.rs`, DDL in `ddl.rs` and
//! transaction/session control in `control.rs`. This file holds the parser
//! state, the token helpers every rule shares and the entry points.

use tracing::debug;

use super::cursor::TokenCursor;
use super::error::{Expected, ParseError, Result};
use super::lookahead::DecisionCache;
use super::predicates::{implicit_alias_follows, is_identifier_token};
use crate::ast::{
    AstNode, DefaultFactory, Ident, NodeFactory, ObjectName, Parameter, ParameterStyle, Statement,
};
use crate::dialect::{Features, ParserOptions};
use crate::lexer::{Keyword, Lexer, Span, Token, TokenKind};

/// Keywords that can start a statement, reported when none does.
const STATEMENT_KEYWORDS: [Keyword; 14] = [
    Keyword::Select,
    Keyword::Values,
    Keyword::Insert,
    Keyword::Update,
    Keyword::Delete,
    Keyword::Create,
    Keyword::Drop,
    Keyword::Alter,
    Keyword::Commit,
    Keyword::Rollback,
    Keyword::Savepoint,
    Keyword::Release,
    Keyword::Set,
    Keyword::Lock,
];

/// A parsed statement with the parameters it declares.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStatement {
    /// The statement.
    pub statement: Statement,
    /// Every `?` / `$n` in source order, numbered from 0.
    pub parameters: Vec<Parameter>,
    /// Source span of the statement, without the trailing `;`.
    pub span: Span,
}

/// SQL Parser.
///
/// One parser owns all mutable parse state: the token cursor, the decision
/// cache, the parameter list and the node factory. Independent parses use
/// independent parsers.
pub struct Parser<'a, F: NodeFactory = DefaultFactory> {
    pub(super) cursor: TokenCursor<'a>,
    pub(super) options: ParserOptions,
    pub(super) factory: F,
    pub(super) cache: DecisionCache,
    parameters: Vec<Parameter>,
    param_style: Option<ParameterStyle>,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given input with the generic dialect.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self::with_options(input, ParserOptions::default())
    }

    /// Creates a new parser with explicit options.
    #[must_use]
    pub fn with_options(input: &'a str, options: ParserOptions) -> Self {
        Self::with_factory(input, options, DefaultFactory)
    }
}

impl<'a, F: NodeFactory> Parser<'a, F> {
    /// Creates a new parser that hands every committed node to `factory`.
    #[must_use]
    pub fn with_factory(input: &'a str, options: ParserOptions, factory: F) -> Self {
        let lexer = Lexer::new(input)
            .backtick_identifiers(options.has_feature(Features::BACKTICK_IDENTIFIERS));
        Self {
            cursor: TokenCursor::new(lexer),
            options,
            factory,
            cache: DecisionCache::default(),
            parameters: Vec::new(),
            param_style: None,
        }
    }

    /// The options this parser runs with.
    #[must_use]
    pub const fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parameters of the statement parsed last, in source order.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// The node factory.
    #[must_use]
    pub const fn factory(&self) -> &F {
        &self.factory
    }

    /// Consumes the parser and returns its node factory.
    #[must_use]
    pub fn into_factory(self) -> F {
        self.factory
    }

    /// Number of speculative decisions answered from the decision cache.
    #[must_use]
    pub const fn cache_hits(&self) -> usize {
        self.cache.hits()
    }

    /// Parses exactly one statement, optionally followed by `;`.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not a single valid statement.
    pub fn parse_statement(&mut self) -> Result<Statement> {
        self.begin_statement();
        let statement = self.parse_statement_body()?;
        self.eat(&TokenKind::Semicolon);
        self.expect_end()?;
        debug!(kind = ?statement.tag(), "parsed statement");
        Ok(statement)
    }

    /// Parses a `;` separated list of statements.
    ///
    /// Each statement gets its own parameter numbering. A statement that
    /// fails to parse yields an error and parsing resumes after the next
    /// top-level `;`.
    pub fn parse_statement_list(&mut self) -> Vec<Result<ParsedStatement>> {
        let mut results = Vec::new();
        loop {
            while self.eat(&TokenKind::Semicolon) {}
            if self.cursor.peek(1).is_eof() {
                break;
            }

            self.begin_statement();
            let start = self.cursor.mark();
            let parsed = match self.parse_statement_body() {
                Ok(statement) if self.check(&TokenKind::Semicolon) || self.at_end() => {
                    Ok(statement)
                }
                Ok(_) => Err(self.cursor.unexpected()),
                Err(error) => Err(error),
            };

            match parsed {
                Ok(statement) => {
                    debug!(kind = ?statement.tag(), "parsed statement");
                    results.push(Ok(ParsedStatement {
                        span: statement.span(),
                        parameters: core::mem::take(&mut self.parameters),
                        statement,
                    }));
                }
                Err(error) => {
                    debug!(%error, "skipping to the next statement");
                    self.cursor.reset(start);
                    self.skip_statement();
                    results.push(Err(error));
                }
            }
        }
        results
    }

    fn begin_statement(&mut self) {
        self.cursor.begin_statement();
        self.cache.clear();
        self.parameters.clear();
        self.param_style = None;
    }

    /// Skips to the next `;` outside parentheses, or to the end of input.
    fn skip_statement(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.cursor.peek_kind(1) {
                TokenKind::Eof => return,
                TokenKind::Semicolon if depth == 0 => return,
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.cursor.advance();
        }
    }

    fn parse_statement_body(&mut self) -> Result<Statement> {
        let statement = match self.cursor.peek(1).as_keyword() {
            Some(Keyword::Select | Keyword::Values) => self.parse_query_statement()?,
            Some(Keyword::Insert) => self.parse_insert()?,
            Some(Keyword::Update) => self.parse_update()?,
            Some(Keyword::Delete) => self.parse_delete()?,
            Some(Keyword::Create) => self.parse_create()?,
            Some(Keyword::Drop) => self.parse_drop()?,
            Some(Keyword::Alter) => self.parse_alter()?,
            Some(Keyword::Commit) => self.parse_commit()?,
            Some(Keyword::Rollback) => self.parse_rollback()?,
            Some(Keyword::Savepoint) => self.parse_savepoint()?,
            Some(Keyword::Release) => self.parse_release_savepoint()?,
            Some(Keyword::Set) => self.parse_set()?,
            Some(Keyword::Lock) => self.parse_lock_table()?,
            _ if self.check(&TokenKind::LeftParen) => self.parse_query_statement()?,
            _ => {
                for keyword in STATEMENT_KEYWORDS {
                    self.cursor.record(Expected::Keyword(keyword));
                }
                return Err(self.cursor.unexpected());
            }
        };
        Ok(self.build(statement))
    }

    fn parse_query_statement(&mut self) -> Result<Statement> {
        let query = self.parse_query()?;
        Ok(Statement::Query(Box::new(query)))
    }

    fn at_end(&mut self) -> bool {
        self.cursor.peek(1).is_eof()
    }

    fn expect_end(&mut self) -> Result<()> {
        if self.at_end() {
            return Ok(());
        }
        self.cursor.record(Expected::Token("end of input"));
        Err(self.cursor.unexpected())
    }

    // Node construction

    /// Hands a committed node to the factory.
    pub(super) fn build<N: AstNode>(&mut self, node: N) -> N {
        self.factory.build(node)
    }

    // Token helpers

    /// Kind of the token `k` positions ahead.
    pub(super) fn peek_kind(&mut self, k: usize) -> &TokenKind {
        self.cursor.peek_kind(k)
    }

    /// Span of the next token.
    pub(super) fn next_span(&mut self) -> Span {
        self.cursor.peek(1).span
    }

    /// Span from `start` to the end of the last consumed token.
    pub(super) fn span_from(&self, start: Span) -> Span {
        start.to(self.cursor.previous_span())
    }

    /// Checks whether the next token has the given kind. A miss is recorded
    /// as an expectation.
    pub(super) fn check(&mut self, kind: &TokenKind) -> bool {
        if self.cursor.peek(1).kind.same_variant(kind) {
            true
        } else {
            self.cursor.record(Expected::token(kind));
            false
        }
    }

    /// Checks whether the next token is the given keyword. A miss is
    /// recorded as an expectation.
    pub(super) fn check_keyword(&mut self, keyword: Keyword) -> bool {
        if self.cursor.peek(1).as_keyword() == Some(keyword) {
            true
        } else {
            self.cursor.record(Expected::Keyword(keyword));
            false
        }
    }

    /// Consumes the next token if it has the given kind.
    pub(super) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.cursor.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the next token if it is the given keyword.
    pub(super) fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.cursor.advance();
            true
        } else {
            false
        }
    }

    /// Consumes a token of the given kind or fails.
    pub(super) fn expect(&mut self, kind: &TokenKind) -> Result<Token> {
        self.cursor.consume(kind)
    }

    /// Consumes the given keyword or fails.
    pub(super) fn expect_keyword(&mut self, keyword: Keyword) -> Result<Token> {
        if self.check_keyword(keyword) {
            Ok(self.cursor.advance())
        } else {
            Err(self.cursor.unexpected())
        }
    }

    /// Fails at the next token, adding `production` to what was expected.
    pub(super) fn expected(&mut self, production: &'static str) -> ParseError {
        self.cursor.record(Expected::Production(production));
        self.cursor.unexpected()
    }

    // Names

    /// Builds an identifier from a consumed name token, applying case
    /// folding to everything but delimited identifiers.
    pub(super) fn ident_from_token(&self, token: &Token) -> Result<Ident> {
        let ident = match &token.kind {
            TokenKind::QuotedIdentifier(name) => Ident::quoted(name.clone(), token.span),
            TokenKind::Identifier(name) => {
                Ident::new(self.options.case_folding.apply(name), token.span)
            }
            _ => {
                let text = token.span.slice(self.cursor.source());
                Ident::new(self.options.case_folding.apply(text), token.span)
            }
        };
        let limit = self.options.max_identifier_length;
        if ident.value.chars().count() > limit {
            return Err(ParseError::semantic(
                format!("identifier exceeds the maximum length of {limit} characters"),
                token.span,
            ));
        }
        Ok(ident)
    }

    /// Parses an identifier: a regular or delimited identifier, or a
    /// non-reserved keyword.
    pub(super) fn parse_identifier(&mut self) -> Result<Ident> {
        if !is_identifier_token(self.peek_kind(1)) {
            self.cursor.record(Expected::Token("identifier"));
            return Err(self.cursor.unexpected());
        }
        let token = self.cursor.advance();
        self.cursor.note_identifier();
        self.ident_from_token(&token)
    }

    /// Parses a possibly qualified name: `a`, `a.b`, `a.b.c`.
    pub(super) fn parse_object_name(&mut self) -> Result<ObjectName> {
        let mut parts = vec![self.parse_identifier()?];
        while self.eat(&TokenKind::Dot) {
            parts.push(self.parse_identifier()?);
        }
        Ok(ObjectName(parts))
    }

    /// Parses `ident {, ident}`.
    pub(super) fn parse_identifier_list(&mut self) -> Result<Vec<Ident>> {
        let mut idents = vec![self.parse_identifier()?];
        while self.eat(&TokenKind::Comma) {
            idents.push(self.parse_identifier()?);
        }
        Ok(idents)
    }

    /// Parses `( ident {, ident} )`.
    pub(super) fn parse_parenthesized_identifiers(&mut self) -> Result<Vec<Ident>> {
        self.expect(&TokenKind::LeftParen)?;
        let idents = self.parse_identifier_list()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(idents)
    }

    /// Parses `[AS] alias`. Without `AS`, words that start a trailing clause
    /// of the current dialect are left alone.
    pub(super) fn parse_optional_alias(&mut self) -> Result<Option<Ident>> {
        if self.eat_keyword(Keyword::As) {
            return self.parse_identifier().map(Some);
        }
        if implicit_alias_follows(&mut self.cursor, &self.options) {
            return self.parse_identifier().map(Some);
        }
        self.cursor.record(Expected::Token("identifier"));
        Ok(None)
    }

    // Parameters

    /// Parses a `?` or `$n` placeholder and registers it with the current
    /// statement.
    pub(super) fn parse_parameter(&mut self) -> Result<Parameter> {
        let token = self.cursor.advance();
        let (style, index) = match token.kind {
            TokenKind::Question => (ParameterStyle::Anonymous, self.parameters.len()),
            TokenKind::Parameter(0) => {
                return Err(ParseError::semantic(
                    "positional parameters are numbered from $1",
                    token.span,
                ));
            }
            TokenKind::Parameter(n) => (ParameterStyle::Positional, (n - 1) as usize),
            other => {
                return Err(ParseError::unexpected(
                    vec![Expected::Production("parameter")],
                    other,
                    token.span,
                ));
            }
        };

        match self.param_style {
            Some(existing) if existing != style => {
                return Err(ParseError::semantic(
                    "cannot mix '?' and '$n' parameters in one statement",
                    token.span,
                ));
            }
            _ => self.param_style = Some(style),
        }

        if matches!(self.peek_kind(1), TokenKind::Dot) {
            let span = token.span.to(self.next_span());
            return Err(ParseError::semantic(
                "parameter not allowed as a method receiver",
                span,
            ));
        }

        let parameter = Parameter {
            index,
            style,
            span: token.span,
        };
        self.parameters.push(parameter);
        Ok(parameter)
    }
}
