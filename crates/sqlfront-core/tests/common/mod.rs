#![allow(dead_code)]

use sqlfront_core::ast::{Query, Select, Statement};
use sqlfront_core::{ParseError, Parser, ParserOptions};

pub fn parse_with(sql: &str, options: &ParserOptions) -> Statement {
    Parser::with_options(sql, options.clone())
        .parse_statement()
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
}

pub fn parse(sql: &str) -> Statement {
    parse_with(sql, &ParserOptions::default())
}

pub fn parse_err_with(sql: &str, options: &ParserOptions) -> ParseError {
    Parser::with_options(sql, options.clone())
        .parse_statement()
        .expect_err(&format!("Expected parse error for: {sql}"))
}

pub fn parse_err(sql: &str) -> ParseError {
    parse_err_with(sql, &ParserOptions::default())
}

pub fn parse_query_with(sql: &str, options: &ParserOptions) -> Query {
    match parse_with(sql, options) {
        Statement::Query(q) => *q,
        other => panic!("Expected a query, got {other:?}"),
    }
}

pub fn parse_query(sql: &str) -> Query {
    parse_query_with(sql, &ParserOptions::default())
}

pub fn parse_select(sql: &str) -> Select {
    match parse_query(sql).body {
        sqlfront_core::ast::SetExpr::Select(s) => *s,
        other => panic!("Expected SELECT, got {other:?}"),
    }
}

/// Verifies that `to_string()` produces a fixed point:
/// parse(sql).to_string() can be re-parsed and yields the same
/// string again.
pub fn round_trip_with(sql: &str, options: &ParserOptions) {
    let ast1 = parse_with(sql, options);
    let rendered1 = ast1.to_string();
    let ast2 = parse_with(&rendered1, options);
    let rendered2 = ast2.to_string();
    assert_eq!(
        rendered1, rendered2,
        "Round-trip failed.\n  Input:    {sql}\n  First:    {rendered1}\n  Second:   {rendered2}"
    );
}

pub fn round_trip(sql: &str) {
    round_trip_with(sql, &ParserOptions::default());
}
