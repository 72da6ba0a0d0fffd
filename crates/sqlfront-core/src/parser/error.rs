//! Parser error types.

use core::fmt;

use thiserror::Error;

use crate::lexer::{Keyword, Span, TokenKind};

/// Something the parser would have accepted at a position.
///
/// Ordered so an expected set is deterministic and free of duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Expected {
    /// A specific keyword.
    Keyword(Keyword),
    /// A token kind, by its diagnostic description (e.g. `"("`, `identifier`).
    Token(&'static str),
    /// A whole production (e.g. `expression`, `data type`).
    Production(&'static str),
}

impl Expected {
    /// Expectation for a token kind.
    #[must_use]
    pub const fn token(kind: &TokenKind) -> Self {
        match kind {
            TokenKind::Keyword(kw) => Self::Keyword(*kw),
            other => Self::Token(other.describe()),
        }
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword(kw) => f.write_str(kw.as_str()),
            Self::Token(text) if text.len() <= 2 => write!(f, "'{text}'"),
            Self::Token(text) | Self::Production(text) => f.write_str(text),
        }
    }
}

/// Classification of a parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The lexer could not classify the input.
    Lexical,
    /// A token did not match what the grammar required.
    UnexpectedToken,
    /// Every alternative at a decision point was rejected.
    NoAlternative {
        /// Names of the alternatives that were tried, in order.
        alternatives: Vec<&'static str>,
    },
    /// A cheap check that fails during parsing rather than in a binder.
    Semantic,
}

/// A parse error.
///
/// Carries enough to build "expected one of {...}, found {...} at offset N"
/// without parsing the message.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} at position {}..{}", span.start, span.end)]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Human readable description.
    pub message: String,
    /// The location of the error.
    pub span: Span,
    /// The offending token, if the error is about one.
    pub found: Option<TokenKind>,
    /// Everything that would have been accepted at `span`.
    pub expected: Vec<Expected>,
}

impl ParseError {
    /// Creates a semantic error.
    #[must_use]
    pub fn semantic(message: impl Into<String>, span: Span) -> Self {
        Self {
            kind: ParseErrorKind::Semantic,
            message: message.into(),
            span,
            found: None,
            expected: vec![],
        }
    }

    /// Creates a lexical error from an error token.
    #[must_use]
    pub fn lexical(message: impl Into<String>, span: Span) -> Self {
        Self {
            kind: ParseErrorKind::Lexical,
            message: message.into(),
            span,
            found: None,
            expected: vec![],
        }
    }

    /// Creates an "unexpected token" error.
    #[must_use]
    pub fn unexpected(expected: Vec<Expected>, found: TokenKind, span: Span) -> Self {
        let message = if found == TokenKind::Eof {
            format!("Unexpected end of input: expected {}", one_of(&expected))
        } else {
            format!(
                "Unexpected token: expected {}, found {found}",
                one_of(&expected)
            )
        };
        Self {
            kind: ParseErrorKind::UnexpectedToken,
            message,
            span,
            found: Some(found),
            expected,
        }
    }

    /// Creates a "no alternative matched" error. `recorded` holds whatever
    /// else was tried at the same token; the expected set is the union.
    #[must_use]
    pub fn no_alternative(
        decision: &str,
        alternatives: Vec<&'static str>,
        recorded: Vec<Expected>,
        found: TokenKind,
        span: Span,
    ) -> Self {
        let mut expected = recorded;
        expected.extend(alternatives.iter().map(|name| Expected::Production(name)));
        expected.sort_unstable();
        expected.dedup();
        Self {
            kind: ParseErrorKind::NoAlternative {
                alternatives: alternatives.clone(),
            },
            message: format!(
                "No {decision} alternative matches {found}; tried {}",
                alternatives.join(", ")
            ),
            span,
            found: Some(found),
            expected,
        }
    }

    /// Returns true for [`ParseErrorKind::Semantic`].
    #[must_use]
    pub const fn is_semantic(&self) -> bool {
        matches!(self.kind, ParseErrorKind::Semantic)
    }

    /// Returns true if `item` is in the expected set.
    #[must_use]
    pub fn expects(&self, item: Expected) -> bool {
        self.expected.contains(&item)
    }
}

fn one_of(expected: &[Expected]) -> String {
    match expected {
        [] => String::from("something else"),
        [only] => only.to_string(),
        many => {
            let items: Vec<String> = many.iter().map(ToString::to_string).collect();
            format!("one of {}", items.join(", "))
        }
    }
}

/// Result type for parser operations.
pub type Result<T> = core::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_message_lists_expected_set() {
        let err = ParseError::unexpected(
            vec![Expected::Keyword(Keyword::From), Expected::Token(",")],
            TokenKind::Semicolon,
            Span::new(9, 10),
        );
        assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
        assert_eq!(
            err.to_string(),
            "Unexpected token: expected one of FROM, ',', found ';' at position 9..10"
        );
    }

    #[test]
    fn test_unexpected_eof() {
        let err = ParseError::unexpected(
            vec![Expected::Production("expression")],
            TokenKind::Eof,
            Span::empty(7),
        );
        assert!(err.message.starts_with("Unexpected end of input"));
        assert!(err.expects(Expected::Production("expression")));
    }

    #[test]
    fn test_no_alternative_names_every_alternative() {
        let err = ParseError::no_alternative(
            "table primary",
            vec!["derived table", "nested join"],
            vec![Expected::Keyword(Keyword::Join), Expected::Production("nested join")],
            TokenKind::LeftParen,
            Span::new(0, 1),
        );
        assert_eq!(
            err.kind,
            ParseErrorKind::NoAlternative {
                alternatives: vec!["derived table", "nested join"]
            }
        );
        assert!(err.expects(Expected::Production("nested join")));
        assert!(err.expects(Expected::Keyword(Keyword::Join)));
        assert_eq!(err.expected.len(), 3);
    }

    #[test]
    fn test_expected_ordering_is_stable() {
        let mut items = vec![
            Expected::Production("expression"),
            Expected::Token("("),
            Expected::Keyword(Keyword::Select),
        ];
        items.sort();
        assert_eq!(items[0], Expected::Keyword(Keyword::Select));
    }
}
