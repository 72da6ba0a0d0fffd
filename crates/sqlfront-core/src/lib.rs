//! # sqlfront-core
//!
//! A dialect-aware SQL parsing core.
//!
//! This crate provides:
//! - A pull-based lexer and a token cursor with mark/reset
//! - A recursive descent parser that settles ambiguous constructs with
//!   cached speculative trial parses
//! - Dialect extensions switched on per parse through [`Features`]
//! - A node factory hook that sees every committed AST node exactly once
//!
//! ## Parsing a statement
//!
//! ```rust
//! use sqlfront_core::{parse_statement, ParserOptions};
//!
//! let parsed = parse_statement(
//!     "SELECT id FROM users WHERE name = ?",
//!     &ParserOptions::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(parsed.parameters.len(), 1);
//! assert_eq!(
//!     parsed.statement.to_string(),
//!     "SELECT id FROM users WHERE name = ?"
//! );
//! ```
//!
//! ## Dialects
//!
//! Nonstandard productions are only accepted when their feature is on:
//!
//! ```rust
//! use sqlfront_core::{parse_statement, MySqlDialect, ParserOptions};
//!
//! let sql = "SELECT a DIV 2 FROM t LIMIT 10";
//! assert!(parse_statement(sql, &ParserOptions::default()).is_err());
//! assert!(parse_statement(sql, &ParserOptions::for_dialect(&MySqlDialect)).is_ok());
//! ```

pub mod ast;
pub mod dialect;
pub mod lexer;
pub mod parser;

pub use ast::{AstNode, DefaultFactory, Expr, NodeFactory, Query, Statement};
pub use dialect::{Db2Dialect, Dialect, Features, GenericDialect, MySqlDialect, ParserOptions};
pub use lexer::{Lexer, Span, Token, TokenKind};
pub use parser::{ParseError, ParseErrorKind, ParsedStatement, Parser};

/// Parses exactly one statement, optionally followed by `;`.
///
/// # Errors
///
/// Returns a `ParseError` if `sql` is not a single valid statement under
/// `options`.
pub fn parse_statement(sql: &str, options: &ParserOptions) -> Result<ParsedStatement, ParseError> {
    let mut parser = Parser::with_options(sql, options.clone());
    let statement = parser.parse_statement()?;
    Ok(ParsedStatement {
        span: statement.span(),
        parameters: parser.parameters().to_vec(),
        statement,
    })
}

/// Parses a `;` separated script. Every statement yields its own result,
/// and parameters are numbered per statement.
#[must_use]
pub fn parse_statement_list(
    sql: &str,
    options: &ParserOptions,
) -> Vec<Result<ParsedStatement, ParseError>> {
    Parser::with_options(sql, options.clone()).parse_statement_list()
}
