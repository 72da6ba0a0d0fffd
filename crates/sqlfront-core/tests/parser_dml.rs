//! Tests for INSERT, UPDATE and DELETE.

mod common;
use common::*;

use pretty_assertions::assert_eq;
use sqlfront_core::ast::{
    DeleteStatement, Expr, InsertSource, InsertStatement, SetExpr, Statement, UpdateStatement,
    WhereClause,
};
use sqlfront_core::ParseErrorKind;

// ===================================================================
// Helper functions
// ===================================================================

fn parse_insert(sql: &str) -> InsertStatement {
    match parse(sql) {
        Statement::Insert(i) => i,
        other => panic!("Expected INSERT, got {other:?}"),
    }
}

fn parse_update(sql: &str) -> UpdateStatement {
    match parse(sql) {
        Statement::Update(u) => u,
        other => panic!("Expected UPDATE, got {other:?}"),
    }
}

fn parse_delete(sql: &str) -> DeleteStatement {
    match parse(sql) {
        Statement::Delete(d) => d,
        other => panic!("Expected DELETE, got {other:?}"),
    }
}

fn insert_body(insert: &InsertStatement) -> &SetExpr {
    match &insert.source {
        InsertSource::Query(query) => &query.body,
        InsertSource::DefaultValues => panic!("Expected a query source"),
    }
}

// ===================================================================
// INSERT
// ===================================================================

#[test]
fn insert_values_with_columns() {
    let i = parse_insert("INSERT INTO users (id, name) VALUES (1, 'alice'), (2, DEFAULT)");
    assert_eq!(i.table.dotted(), "users");
    let names: Vec<&str> = i.columns.iter().map(|c| c.value.as_str()).collect();
    assert_eq!(names, vec!["id", "name"]);
    let SetExpr::Values { rows, .. } = insert_body(&i) else {
        panic!("expected VALUES");
    };
    assert_eq!(rows.len(), 2);
    assert!(matches!(rows[1][1], Expr::Default { .. }));
    round_trip("INSERT INTO users (id, name) VALUES (1, 'alice'), (2, DEFAULT)");
}

#[test]
fn insert_select() {
    let i = parse_insert("INSERT INTO archive SELECT * FROM users WHERE active = 0");
    assert!(i.columns.is_empty());
    assert!(matches!(insert_body(&i), SetExpr::Select(_)));
    round_trip("INSERT INTO archive SELECT * FROM users WHERE active = 0");
}

#[test]
fn insert_column_list_versus_parenthesized_query() {
    let with_columns = parse_insert("INSERT INTO t (a, b) (SELECT a, b FROM u)");
    assert_eq!(with_columns.columns.len(), 2);
    assert!(matches!(insert_body(&with_columns), SetExpr::Query(_)));

    let query_only = parse_insert("INSERT INTO t (SELECT a, b FROM u) UNION (SELECT c, d FROM v)");
    assert!(query_only.columns.is_empty());
    assert!(matches!(
        insert_body(&query_only),
        SetExpr::SetOperation { .. }
    ));
    round_trip("INSERT INTO t (a, b) (SELECT a, b FROM u)");
    round_trip("INSERT INTO t (SELECT a, b FROM u) UNION (SELECT c, d FROM v)");
}

#[test]
fn insert_default_values() {
    let i = parse_insert("INSERT INTO t DEFAULT VALUES");
    assert_eq!(i.source, InsertSource::DefaultValues);
    round_trip("INSERT INTO t DEFAULT VALUES");
}

#[test]
fn insert_target_without_alternative() {
    let err = parse_err("INSERT INTO t (a, b");
    assert!(matches!(err.kind, ParseErrorKind::NoAlternative { .. }));
}

#[test]
fn insert_with_parameters() {
    let mut parser = sqlfront_core::Parser::new("INSERT INTO t (a, b, c) VALUES (?, ?, ?)");
    parser.parse_statement().unwrap();
    let indexes: Vec<usize> = parser.parameters().iter().map(|p| p.index).collect();
    assert_eq!(indexes, vec![0, 1, 2]);
}

// ===================================================================
// UPDATE
// ===================================================================

#[test]
fn update_assignments() {
    let u = parse_update("UPDATE users SET name = 'bob', visits = visits + 1 WHERE id = 5");
    assert_eq!(u.assignments.len(), 2);
    assert_eq!(u.assignments[1].column, "visits");
    assert!(matches!(u.where_clause, Some(WhereClause::Expr(_))));
    round_trip("UPDATE users SET name = 'bob', visits = visits + 1 WHERE id = 5");
}

#[test]
fn update_positioned() {
    let u = parse_update("UPDATE t AS x SET a = DEFAULT WHERE CURRENT OF c1");
    assert!(matches!(
        u.where_clause,
        Some(WhereClause::CurrentOf(ref cursor)) if cursor == "c1"
    ));
    round_trip("UPDATE t AS x SET a = DEFAULT WHERE CURRENT OF c1");
}

#[test]
fn update_with_subquery_value() {
    round_trip("UPDATE t SET a = (SELECT MAX(b) FROM u WHERE u.id = t.id)");
}

// ===================================================================
// DELETE
// ===================================================================

#[test]
fn delete_forms() {
    let d = parse_delete("DELETE FROM s.t");
    assert_eq!(d.table.dotted(), "s.t");
    assert!(d.where_clause.is_none());

    let d = parse_delete("DELETE FROM t x WHERE x.a IN (1, 2)");
    assert_eq!(d.alias.as_ref().map(|a| a.value.as_str()), Some("x"));
    round_trip("DELETE FROM t x WHERE x.a IN (1, 2)");
    round_trip("DELETE FROM t WHERE CURRENT OF c");
}

#[test]
fn default_is_only_a_value() {
    let err = parse_err("DELETE FROM t WHERE a = DEFAULT");
    assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
}
