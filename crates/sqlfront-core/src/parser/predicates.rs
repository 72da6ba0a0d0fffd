//! Disambiguation predicates.
//!
//! Pure functions of the upcoming tokens and the dialect feature gate. They
//! only peek, so they are safe to call from trial recognizers and from the
//! real grammar alike.

use super::cursor::TokenCursor;
use super::lookahead::{scan_parenthesized, ParenScan};
use crate::dialect::{Features, ParserOptions};
use crate::lexer::{Keyword, TokenKind};

/// Returns true if `kind` can be used as a name: a regular or delimited
/// identifier, or a non-reserved keyword.
#[must_use]
pub const fn is_identifier_token(kind: &TokenKind) -> bool {
    match kind {
        TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_) => true,
        TokenKind::Keyword(kw) => !kw.is_reserved(),
        _ => false,
    }
}

fn is_keyword(kind: &TokenKind, keyword: Keyword) -> bool {
    matches!(kind, TokenKind::Keyword(kw) if *kw == keyword)
}

/// `(` opening a query expression.
pub fn subquery_follows(cursor: &mut TokenCursor<'_>, _options: &ParserOptions) -> bool {
    scan_parenthesized(cursor, 1) == ParenScan::Subquery
}

/// A set function call: a built-in aggregate `COUNT(`, `SUM(`, ..., or any
/// function name followed by `( DISTINCT`.
pub fn aggregate_follows(cursor: &mut TokenCursor<'_>, _options: &ParserOptions) -> bool {
    if !matches!(cursor.peek_kind(2), TokenKind::LeftParen) {
        return false;
    }
    let builtin = matches!(
        cursor.peek_kind(1),
        TokenKind::Keyword(
            Keyword::Avg | Keyword::Count | Keyword::Max | Keyword::Min | Keyword::Sum
        )
    );
    builtin
        || (is_identifier_token(cursor.peek_kind(1))
            && is_keyword(cursor.peek_kind(3), Keyword::Distinct))
}

/// The next token continues a joined table.
pub fn joined_table_follows(cursor: &mut TokenCursor<'_>, options: &ParserOptions) -> bool {
    match cursor.peek_kind(1) {
        TokenKind::Keyword(
            Keyword::Join
            | Keyword::Inner
            | Keyword::Cross
            | Keyword::Natural
            | Keyword::Left
            | Keyword::Right
            | Keyword::Full,
        ) => true,
        TokenKind::Keyword(Keyword::StraightJoin) => options.has_feature(Features::STRAIGHT_JOIN),
        _ => false,
    }
}

/// `(` opening a row value constructor: a comma at nesting level one.
pub fn row_value_constructor_list_follows(
    cursor: &mut TokenCursor<'_>,
    _options: &ParserOptions,
) -> bool {
    scan_parenthesized(cursor, 1) == ParenScan::RowConstructor
}

/// A data type name starts at the next token.
pub fn datatype_follows(cursor: &mut TokenCursor<'_>, options: &ParserOptions) -> bool {
    datatype_at(cursor, options, 1)
}

/// A data type name starts `k` tokens ahead.
pub fn datatype_at(cursor: &mut TokenCursor<'_>, options: &ParserOptions, k: usize) -> bool {
    match cursor.peek_kind(k) {
        TokenKind::Keyword(
            Keyword::Smallint
            | Keyword::Integer
            | Keyword::Int
            | Keyword::Bigint
            | Keyword::Real
            | Keyword::Double
            | Keyword::Float
            | Keyword::Decimal
            | Keyword::Dec
            | Keyword::Numeric
            | Keyword::Char
            | Keyword::Character
            | Keyword::Varchar
            | Keyword::Clob
            | Keyword::Blob
            | Keyword::Date
            | Keyword::Time
            | Keyword::Timestamp
            | Keyword::Boolean
            | Keyword::Xml,
        ) => true,
        TokenKind::Keyword(Keyword::Long) => is_keyword(cursor.peek_kind(k + 1), Keyword::Varchar),
        TokenKind::Keyword(
            Keyword::Tinyint
            | Keyword::Mediumint
            | Keyword::Text
            | Keyword::Tinytext
            | Keyword::Mediumtext
            | Keyword::Longtext
            | Keyword::Datetime,
        ) => options.has_feature(Features::MYSQL_DATATYPES),
        _ => false,
    }
}

/// `name.*` or `schema.name.*` in a select list.
pub fn select_item_is_qualified_wildcard(
    cursor: &mut TokenCursor<'_>,
    _options: &ParserOptions,
) -> bool {
    let mut k = 1;
    while is_identifier_token(cursor.peek_kind(k)) {
        if !matches!(cursor.peek_kind(k + 1), TokenKind::Dot) {
            return false;
        }
        if matches!(cursor.peek_kind(k + 2), TokenKind::Star) {
            return true;
        }
        k += 2;
    }
    false
}

/// `DATE 'x'`, `TIME 'x'` or `TIMESTAMP 'x'`.
pub fn typed_literal_follows(cursor: &mut TokenCursor<'_>, _options: &ParserOptions) -> bool {
    matches!(
        cursor.peek_kind(1),
        TokenKind::Keyword(Keyword::Date | Keyword::Time | Keyword::Timestamp)
    ) && matches!(cursor.peek_kind(2), TokenKind::String(_))
}

/// `OVER` after a function call, when window functions are enabled.
pub fn window_function_follows(cursor: &mut TokenCursor<'_>, options: &ParserOptions) -> bool {
    options.has_feature(Features::WINDOW_FUNCTIONS)
        && is_keyword(cursor.peek_kind(1), Keyword::Over)
}

/// `USE|IGNORE|FORCE {INDEX|KEY}`, when index hints are enabled.
pub fn index_hint_follows(cursor: &mut TokenCursor<'_>, options: &ParserOptions) -> bool {
    options.has_feature(Features::INDEX_HINTS)
        && matches!(
            cursor.peek_kind(1),
            TokenKind::Keyword(Keyword::Use | Keyword::Ignore | Keyword::Force)
        )
        && matches!(
            cursor.peek_kind(2),
            TokenKind::Keyword(Keyword::Index | Keyword::Key)
        )
}

/// An implicit alias (one written without `AS`) starts at the next token.
///
/// Non-reserved words that begin a trailing clause of the current dialect
/// are not taken as aliases.
pub fn implicit_alias_follows(cursor: &mut TokenCursor<'_>, options: &ParserOptions) -> bool {
    match cursor.peek_kind(1) {
        TokenKind::Keyword(Keyword::Offset) => false,
        TokenKind::Keyword(Keyword::Limit) => !options.has_feature(Features::LIMIT_CLAUSE),
        TokenKind::Keyword(Keyword::Window) => !options.has_feature(Features::WINDOW_FUNCTIONS),
        TokenKind::Keyword(Keyword::StraightJoin) => !options.has_feature(Features::STRAIGHT_JOIN),
        TokenKind::Keyword(Keyword::Use | Keyword::Ignore | Keyword::Force) => {
            !index_hint_follows(cursor, options)
        }
        kind => is_identifier_token(kind),
    }
}
