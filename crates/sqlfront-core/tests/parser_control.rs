//! Tests for transaction and session control statements.

mod common;
use common::*;

use sqlfront_core::ast::{IsolationLevel, LockMode, SchemaTarget, Statement};
use sqlfront_core::{Db2Dialect, ParserOptions};

#[test]
fn transaction_statements_round_trip() {
    for sql in [
        "COMMIT",
        "ROLLBACK",
        "ROLLBACK TO SAVEPOINT",
        "ROLLBACK TO SAVEPOINT sp1",
        "SAVEPOINT sp1",
        "RELEASE SAVEPOINT sp1",
    ] {
        round_trip(sql);
    }
}

#[test]
fn noise_words_are_dropped() {
    assert_eq!(parse("COMMIT WORK").to_string(), "COMMIT");
    assert_eq!(parse("ROLLBACK WORK").to_string(), "ROLLBACK");
    assert_eq!(
        parse("RELEASE TO SAVEPOINT sp1").to_string(),
        "RELEASE SAVEPOINT sp1"
    );
}

#[test]
fn set_isolation_levels() {
    let level = |sql: &str| match parse(sql) {
        Statement::SetIsolation { level, .. } => level,
        other => panic!("Expected SET ISOLATION, got {other:?}"),
    };
    assert_eq!(level("SET ISOLATION UR"), IsolationLevel::ReadUncommitted);
    assert_eq!(level("SET CURRENT ISOLATION = RS"), IsolationLevel::RepeatableRead);
    assert_eq!(level("SET ISOLATION READ UNCOMMITTED"), IsolationLevel::ReadUncommitted);
    assert_eq!(level("SET ISOLATION RR"), IsolationLevel::Serializable);
    round_trip("SET ISOLATION CS");
}

#[test]
fn set_schema_targets() {
    let target = |sql: &str| match parse(sql) {
        Statement::SetSchema { target, .. } => target,
        other => panic!("Expected SET SCHEMA, got {other:?}"),
    };
    assert!(matches!(target("SET SCHEMA app"), SchemaTarget::Name(ref n) if n == "app"));
    assert_eq!(target("SET SCHEMA USER"), SchemaTarget::CurrentUser);
    assert!(matches!(target("SET SCHEMA $1"), SchemaTarget::Parameter(_)));
    round_trip("SET SCHEMA 'APP'");
    round_trip("SET SCHEMA CURRENT_USER");
}

#[test]
fn set_schema_folds_under_db2() {
    let db2 = ParserOptions::for_dialect(&Db2Dialect);
    let Statement::SetSchema { target, .. } = parse_with("SET SCHEMA app", &db2) else {
        panic!("Expected SET SCHEMA");
    };
    assert!(matches!(target, SchemaTarget::Name(ref n) if n == "APP"));
}

#[test]
fn lock_table() {
    assert!(matches!(
        parse("LOCK TABLE s.t IN SHARE MODE"),
        Statement::LockTable {
            mode: LockMode::Share,
            ..
        }
    ));
    round_trip("LOCK TABLE s.t IN EXCLUSIVE MODE");
}
