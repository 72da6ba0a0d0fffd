//! Speculative lookahead.
//!
//! A decision point lists its [`Alternative`]s in priority order. Each has a
//! trial recognizer that dry-runs the production over a [`Probe`]; the first
//! alternative whose trial matches is rewound and parsed for real. A probe
//! only borrows the token cursor, so trials can never build AST nodes.

use rustc_hash::FxHashMap;
use tracing::trace;

use super::cursor::TokenCursor;
use super::error::{ParseError, Result};
use super::parser::Parser;
use super::predicates::is_identifier_token;
use crate::ast::NodeFactory;
use crate::dialect::ParserOptions;
use crate::lexer::{Keyword, TokenKind};

/// Decision id under which parenthesized-run scans are cached.
const PAREN_RUN: &str = "parenthesized run";

/// How far a trial recognizer may consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookahead {
    /// At most this many tokens.
    Bounded(usize),
    /// Scan as far as needed.
    Unbounded,
}

/// A trial recognizer rejected the input. Not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoMatch;

/// Trial recognizer signature.
pub type Trial = fn(&mut Probe<'_, '_>) -> core::result::Result<(), NoMatch>;

/// One candidate production at a decision point.
pub struct Alternative<P, T> {
    /// Name reported when every alternative fails.
    pub name: &'static str,
    /// Lookahead budget of the trial.
    pub horizon: Lookahead,
    /// Dry run; must not build nodes.
    pub trial: Trial,
    /// The real production.
    pub parse: fn(&mut P) -> Result<T>,
}

/// Read-only view of the token stream handed to trial recognizers.
pub struct Probe<'c, 'a> {
    cursor: &'c mut TokenCursor<'a>,
    options: &'c ParserOptions,
    horizon: Lookahead,
    consumed: usize,
}

impl<'c, 'a> Probe<'c, 'a> {
    /// Wraps `cursor` for one trial.
    pub fn new(
        cursor: &'c mut TokenCursor<'a>,
        options: &'c ParserOptions,
        horizon: Lookahead,
    ) -> Self {
        Self {
            cursor,
            options,
            horizon,
            consumed: 0,
        }
    }

    /// Kind of the token `k` positions ahead.
    pub fn peek(&mut self, k: usize) -> &TokenKind {
        self.cursor.peek_kind(k)
    }

    /// Returns true if the next token is `keyword`.
    pub fn at_keyword(&mut self, keyword: Keyword) -> bool {
        matches!(self.peek(1), TokenKind::Keyword(kw) if *kw == keyword)
    }

    /// Steps over one token.
    ///
    /// # Errors
    ///
    /// `NoMatch` once the horizon is used up or at end of input.
    pub fn bump(&mut self) -> core::result::Result<(), NoMatch> {
        if let Lookahead::Bounded(limit) = self.horizon {
            if self.consumed >= limit {
                return Err(NoMatch);
            }
        }
        if self.cursor.peek(1).is_eof() {
            return Err(NoMatch);
        }
        self.cursor.advance();
        self.consumed += 1;
        Ok(())
    }

    /// Steps over a token of the same kind as `kind`.
    ///
    /// # Errors
    ///
    /// `NoMatch` if the next token is something else.
    pub fn expect(&mut self, kind: &TokenKind) -> core::result::Result<(), NoMatch> {
        if self.peek(1).same_variant(kind) {
            self.bump()
        } else {
            Err(NoMatch)
        }
    }

    /// Steps over `keyword`.
    ///
    /// # Errors
    ///
    /// `NoMatch` if the next token is something else.
    pub fn expect_keyword(&mut self, keyword: Keyword) -> core::result::Result<(), NoMatch> {
        if self.at_keyword(keyword) {
            self.bump()
        } else {
            Err(NoMatch)
        }
    }

    /// Steps over anything usable as an identifier.
    ///
    /// # Errors
    ///
    /// `NoMatch` if the next token is not identifier-like.
    pub fn expect_identifier(&mut self) -> core::result::Result<(), NoMatch> {
        if is_identifier_token(self.peek(1)) {
            self.bump()
        } else {
            Err(NoMatch)
        }
    }

    /// Runs a disambiguation predicate at the probe position.
    pub fn test(&mut self, predicate: fn(&mut TokenCursor<'_>, &ParserOptions) -> bool) -> bool {
        predicate(self.cursor, self.options)
    }

    /// Classifies the parenthesized run starting at the next token.
    pub fn scan_parenthesized(&mut self) -> ParenScan {
        scan_parenthesized(self.cursor, 1)
    }
}

/// What a parenthesized run of tokens turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParenScan {
    /// A comma at nesting level one: `(a, b)`.
    RowConstructor,
    /// A query expression: `(SELECT ..)`, `((VALUES 1))`.
    Subquery,
    /// A single parenthesized value: `((1))`.
    Scalar,
    /// End of input before the matching `)`.
    Unterminated,
}

const fn continues_query(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::RightParen
            | TokenKind::Keyword(
                Keyword::Union
                    | Keyword::Except
                    | Keyword::Intersect
                    | Keyword::Order
                    | Keyword::Offset
                    | Keyword::Fetch
                    | Keyword::Limit
            )
    )
}

/// Nesting-aware forward scan of the parenthesized run whose `(` is the
/// token `at` positions ahead. Never consumes.
pub fn scan_parenthesized(cursor: &mut TokenCursor<'_>, at: usize) -> ParenScan {
    if !matches!(cursor.peek_kind(at), TokenKind::LeftParen) {
        return ParenScan::Unterminated;
    }

    let mut leading = 0;
    while matches!(cursor.peek_kind(at + leading), TokenKind::LeftParen) {
        leading += 1;
    }
    let query_start = matches!(
        cursor.peek_kind(at + leading),
        TokenKind::Keyword(Keyword::Select | Keyword::Values)
    );
    if query_start && leading == 1 {
        return ParenScan::Subquery;
    }

    // With extra parens around a query, what follows the first inner group
    // decides between a parenthesized query and an expression using one.
    let mut group_checked = !query_start;
    let mut depth = 0usize;
    let mut k = at;
    loop {
        match cursor.peek_kind(k) {
            TokenKind::LeftParen => depth += 1,
            TokenKind::RightParen => {
                depth -= 1;
                if depth == 0 {
                    return ParenScan::Scalar;
                }
                if depth == 1 && !group_checked {
                    group_checked = true;
                    let next = cursor.peek_kind(k + 1);
                    if continues_query(next) {
                        return ParenScan::Subquery;
                    }
                }
            }
            TokenKind::Comma if depth == 1 => return ParenScan::RowConstructor,
            TokenKind::Eof => return ParenScan::Unterminated,
            _ => {}
        }
        k += 1;
    }
}

/// A memoized decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Index of the alternative that matched, or `None` if none did.
    Chosen(Option<usize>),
    /// Result of a parenthesized-run scan.
    Paren(ParenScan),
}

/// Per-parser memo of decisions keyed by token position and decision name.
///
/// Positions restart with every statement, so each entry remembers the
/// cursor generation it was made in and is ignored once that has moved on.
#[derive(Debug, Default)]
pub struct DecisionCache {
    entries: FxHashMap<(usize, &'static str), (u64, Verdict)>,
    hits: usize,
}

impl DecisionCache {
    /// Looks up a decision made in `generation`.
    pub fn get(&mut self, pos: usize, decision: &'static str, generation: u64) -> Option<Verdict> {
        match self.entries.get(&(pos, decision)) {
            Some(&(made_in, verdict)) if made_in == generation => {
                self.hits += 1;
                Some(verdict)
            }
            _ => None,
        }
    }

    /// Stores a decision.
    pub fn insert(&mut self, pos: usize, decision: &'static str, generation: u64, verdict: Verdict) {
        self.entries.insert((pos, decision), (generation, verdict));
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of lookups answered from the cache.
    #[must_use]
    pub const fn hits(&self) -> usize {
        self.hits
    }
}

impl<F: NodeFactory> Parser<'_, F> {
    /// Chooses among `alternatives` by running their trial recognizers in
    /// order, then parses the first one that matched.
    ///
    /// # Errors
    ///
    /// A `NoAlternative` error naming every alternative when no trial
    /// matches, or whatever the chosen production fails with.
    pub(super) fn speculate<T>(
        &mut self,
        decision: &'static str,
        alternatives: &[Alternative<Self, T>],
    ) -> Result<T> {
        let pos = self.cursor.position();
        let generation = self.cursor.generation();
        let chosen = if let Some(Verdict::Chosen(chosen)) =
            self.cache.get(pos, decision, generation)
        {
            trace!(decision, pos, "cache hit");
            chosen
        } else {
            let chosen = self.run_trials(decision, alternatives);
            self.cache
                .insert(pos, decision, generation, Verdict::Chosen(chosen));
            chosen
        };

        match chosen.and_then(|index| alternatives.get(index)) {
            Some(alternative) => (alternative.parse)(self),
            None => {
                let token = self.cursor.peek(1).clone();
                if let TokenKind::Error(message) = token.kind {
                    return Err(ParseError::lexical(message, token.span));
                }
                let names = alternatives.iter().map(|alt| alt.name).collect();
                Err(ParseError::no_alternative(
                    decision,
                    names,
                    self.cursor.expected_here(),
                    token.kind,
                    token.span,
                ))
            }
        }
    }

    fn run_trials<T>(
        &mut self,
        decision: &'static str,
        alternatives: &[Alternative<Self, T>],
    ) -> Option<usize> {
        let checkpoint = self.cursor.mark();
        for (index, alternative) in alternatives.iter().enumerate() {
            let mut probe = Probe::new(&mut self.cursor, &self.options, alternative.horizon);
            let outcome = (alternative.trial)(&mut probe);
            self.cursor.reset(checkpoint);
            if outcome.is_ok() {
                trace!(decision, alternative = alternative.name, "matched");
                return Some(index);
            }
            trace!(decision, alternative = alternative.name, "rejected");
        }
        None
    }

    /// Classifies the parenthesized run at the next token, memoized per
    /// position.
    pub(super) fn paren_shape(&mut self) -> ParenScan {
        let pos = self.cursor.position();
        let generation = self.cursor.generation();
        if let Some(Verdict::Paren(shape)) = self.cache.get(pos, PAREN_RUN, generation) {
            return shape;
        }
        let shape = scan_parenthesized(&mut self.cursor, 1);
        trace!(pos, ?shape, "scanned parenthesized run");
        self.cache
            .insert(pos, PAREN_RUN, generation, Verdict::Paren(shape));
        shape
    }
}
