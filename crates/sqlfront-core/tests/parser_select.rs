//! Tests for query expressions: SELECT clauses, set operations, VALUES,
//! trailing clauses and table references.

mod common;
use common::*;

use pretty_assertions::assert_eq;
use sqlfront_core::ast::{
    BinaryOp, Expr, GroupBy, JoinConstraint, JoinOperator, NullOrdering, OrderDirection,
    PreservedSide, RowCount, SelectItem, SetExpr, SetOperator, SetQuantifier, TableRef,
};

// ===================================================================
// Projection
// ===================================================================

#[test]
fn select_wildcards_and_aliases() {
    let s = parse_select("SELECT *, t.*, s.t.*, a AS x, b y FROM s.t");
    assert_eq!(s.projection.len(), 5);
    assert!(matches!(s.projection[0], SelectItem::Wildcard { .. }));
    assert!(matches!(
        &s.projection[1],
        SelectItem::QualifiedWildcard { qualifier, .. } if qualifier.dotted() == "t"
    ));
    assert!(matches!(
        &s.projection[2],
        SelectItem::QualifiedWildcard { qualifier, .. } if qualifier.dotted() == "s.t"
    ));
    assert!(matches!(
        &s.projection[3],
        SelectItem::Expr { alias: Some(alias), .. } if alias == "x"
    ));
    assert!(matches!(
        &s.projection[4],
        SelectItem::Expr { alias: Some(alias), .. } if alias == "y"
    ));
    round_trip("SELECT *, t.*, s.t.*, a AS x, b y FROM s.t");
}

#[test]
fn select_distinct_and_all() {
    assert!(parse_select("SELECT DISTINCT a FROM t").distinct);
    assert!(!parse_select("SELECT ALL a FROM t").distinct);
    round_trip("SELECT DISTINCT a FROM t");
}

#[test]
fn select_without_from() {
    let s = parse_select("SELECT 1 + 1");
    assert!(s.from.is_empty());
    round_trip("SELECT 1 + 1");
}

// ===================================================================
// WHERE, GROUP BY, HAVING, WINDOW
// ===================================================================

#[test]
fn where_compound_and_or() {
    let s = parse_select("SELECT * FROM users WHERE (age > 18 AND active = 1) OR admin = 1");
    assert!(matches!(
        &s.selection,
        Some(Expr::Binary {
            op: BinaryOp::Or,
            ..
        })
    ));
    round_trip("SELECT * FROM users WHERE (age > 18 AND active = 1) OR admin = 1");
}

#[test]
fn group_by_having() {
    let s = parse_select(
        "SELECT status, COUNT(*) AS cnt \
         FROM orders GROUP BY status, region HAVING COUNT(*) > 5",
    );
    assert!(matches!(&s.group_by, Some(GroupBy::Exprs(exprs)) if exprs.len() == 2));
    assert!(matches!(
        &s.having,
        Some(Expr::Binary {
            op: BinaryOp::Gt,
            ..
        })
    ));
    round_trip("SELECT status, COUNT(*) AS cnt FROM orders GROUP BY status, region HAVING COUNT(*) > 5");
}

#[test]
fn group_by_rollup() {
    let s = parse_select("SELECT a, b, SUM(c) FROM t GROUP BY ROLLUP (a, b)");
    assert!(matches!(&s.group_by, Some(GroupBy::Rollup(exprs)) if exprs.len() == 2));
    round_trip("SELECT a, b, SUM(c) FROM t GROUP BY ROLLUP (a, b)");
}

#[test]
fn named_windows() {
    let s = parse_select(
        "SELECT SUM(x) OVER w, AVG(x) OVER (w ORDER BY y) FROM t \
         WINDOW w AS (PARTITION BY z)",
    );
    assert_eq!(s.windows.len(), 1);
    assert_eq!(s.windows[0].name, "w");
    round_trip("SELECT SUM(x) OVER w, AVG(x) OVER (w ORDER BY y) FROM t WINDOW w AS (PARTITION BY z)");
}

// ===================================================================
// Set operations
// ===================================================================

#[test]
fn union_chain_is_left_deep() {
    let q = parse_query("SELECT a FROM t UNION ALL SELECT b FROM u EXCEPT SELECT c FROM v");
    let SetExpr::SetOperation {
        op, left, right, ..
    } = q.body
    else {
        panic!("expected set operation");
    };
    assert_eq!(op, SetOperator::Except);
    assert!(matches!(right.as_ref(), SetExpr::Select(_)));
    assert!(matches!(
        left.as_ref(),
        SetExpr::SetOperation {
            op: SetOperator::Union,
            quantifier: SetQuantifier::All,
            ..
        }
    ));
    round_trip("SELECT a FROM t UNION ALL SELECT b FROM u EXCEPT SELECT c FROM v");
}

#[test]
fn intersect_binds_tighter_than_union() {
    let q = parse_query("SELECT a FROM t UNION SELECT b FROM u INTERSECT SELECT c FROM v");
    let SetExpr::SetOperation { op, right, .. } = q.body else {
        panic!("expected set operation");
    };
    assert_eq!(op, SetOperator::Union);
    assert!(matches!(
        right.as_ref(),
        SetExpr::SetOperation {
            op: SetOperator::Intersect,
            ..
        }
    ));
}

#[test]
fn parenthesized_operand_keeps_grouping() {
    let q = parse_query("SELECT a FROM t UNION (SELECT b FROM u UNION SELECT c FROM v)");
    let SetExpr::SetOperation { right, .. } = q.body else {
        panic!("expected set operation");
    };
    assert!(matches!(right.as_ref(), SetExpr::Query(_)));
    round_trip("SELECT a FROM t UNION (SELECT b FROM u UNION SELECT c FROM v)");
}

#[test]
fn parenthesized_query_statement() {
    let q = parse_query("(SELECT a FROM t) ORDER BY a");
    assert!(matches!(q.body, SetExpr::Query(_)));
    assert_eq!(q.order_by.len(), 1);
    round_trip("(SELECT a FROM t) ORDER BY a");
}

// ===================================================================
// VALUES
// ===================================================================

#[test]
fn values_rows() {
    let q = parse_query("VALUES (1, 'a'), (2, 'b'), 3");
    let SetExpr::Values { rows, .. } = &q.body else {
        panic!("expected VALUES");
    };
    let widths: Vec<usize> = rows.iter().map(Vec::len).collect();
    assert_eq!(widths, vec![2, 2, 1]);
    round_trip("VALUES (1, 'a'), (2, 'b'), 3");
}

#[test]
fn values_subquery_row() {
    round_trip("VALUES (SELECT MAX(a) FROM t), ((SELECT 1) + 1)");
    let q = parse_query("VALUES ((SELECT 1) + 1)");
    let SetExpr::Values { rows, .. } = &q.body else {
        panic!("expected VALUES");
    };
    assert!(matches!(
        rows[0][0],
        Expr::Binary {
            op: BinaryOp::Add,
            ..
        }
    ));
}

// ===================================================================
// ORDER BY, OFFSET / FETCH, locking
// ===================================================================

#[test]
fn order_by_directions_and_nulls() {
    let q = parse_query("SELECT a FROM t ORDER BY a DESC NULLS LAST, b ASC, c");
    assert_eq!(q.order_by.len(), 3);
    assert_eq!(q.order_by[0].direction, Some(OrderDirection::Desc));
    assert_eq!(q.order_by[0].nulls, Some(NullOrdering::Last));
    assert_eq!(q.order_by[1].direction, Some(OrderDirection::Asc));
    assert_eq!(q.order_by[2].direction, None);
    round_trip("SELECT a FROM t ORDER BY a DESC NULLS LAST, b ASC, c");
}

#[test]
fn offset_and_fetch() {
    let q = parse_query("SELECT a FROM t ORDER BY a OFFSET 10 ROWS FETCH NEXT 5 ROWS ONLY");
    assert_eq!(q.offset, Some(RowCount::Literal(10)));
    assert_eq!(q.fetch, Some(RowCount::Literal(5)));
    round_trip("SELECT a FROM t ORDER BY a OFFSET 10 ROWS FETCH NEXT 5 ROWS ONLY");

    let q = parse_query("SELECT a FROM t FETCH FIRST ? ROWS ONLY");
    assert!(matches!(q.fetch, Some(RowCount::Parameter(_))));
}

#[test]
fn for_update_and_read_only() {
    round_trip("SELECT a FROM t FOR UPDATE OF a, b");
    round_trip("SELECT a FROM t FOR READ ONLY");
    round_trip("SELECT a FROM t FOR FETCH ONLY");
}

// ===================================================================
// FROM and joins
// ===================================================================

#[test]
fn comma_separated_tables() {
    let s = parse_select("SELECT * FROM a, b x, c AS y");
    assert_eq!(s.from.len(), 3);
    assert!(matches!(
        &s.from[2],
        TableRef::Table { alias: Some(alias), .. } if alias == "y"
    ));
}

#[test]
fn join_chain_is_left_deep() {
    let sql = "SELECT * FROM a JOIN b ON a.id = b.id LEFT JOIN c USING (id) CROSS JOIN d";
    let s = parse_select(sql);
    let TableRef::Join(outer) = &s.from[0] else {
        panic!("expected join");
    };
    assert_eq!(outer.operator, JoinOperator::Cross);
    let TableRef::Join(middle) = &outer.left else {
        panic!("expected nested join on the left");
    };
    assert!(matches!(
        &middle.operator,
        JoinOperator::Outer {
            preserved: PreservedSide::Left,
            constraint: JoinConstraint::Using(columns),
        } if columns.len() == 1
    ));
    assert!(matches!(middle.left, TableRef::Join(_)));
    round_trip(sql);
}

#[test]
fn nested_join_and_derived_tables() {
    round_trip("SELECT * FROM (a JOIN b ON a.x = b.x) JOIN c ON c.y = a.y");
    round_trip("SELECT * FROM (SELECT a FROM t) AS d (x) JOIN ((SELECT 1)) e ON d.x = e.a");
    let s = parse_select("SELECT * FROM a JOIN (b JOIN c ON b.x = c.x) ON a.x = b.x");
    let TableRef::Join(join) = &s.from[0] else {
        panic!("expected join");
    };
    assert!(matches!(join.right, TableRef::Nested { .. }));
}

#[test]
fn natural_joins() {
    round_trip("SELECT * FROM a NATURAL JOIN b");
    round_trip("SELECT * FROM a NATURAL RIGHT OUTER JOIN b");
    let s = parse_select("SELECT * FROM a NATURAL INNER JOIN b");
    assert!(matches!(
        &s.from[0],
        TableRef::Join(join) if join.operator == JoinOperator::Natural(None)
    ));
}

#[test]
fn full_outer_join() {
    let sql = "SELECT * FROM a FULL OUTER JOIN b ON a.x = b.x";
    let s = parse_select(sql);
    assert!(matches!(
        &s.from[0],
        TableRef::Join(join) if matches!(
            join.operator,
            JoinOperator::Outer { preserved: PreservedSide::Both, .. }
        )
    ));
    round_trip(sql);
}

// ===================================================================
// Subqueries in predicates
// ===================================================================

#[test]
fn correlated_subqueries() {
    round_trip(
        "SELECT a FROM t WHERE EXISTS (SELECT 1 FROM u WHERE u.a = t.a) \
         AND b IN (SELECT b FROM v) AND c > ANY (SELECT c FROM w)",
    );
}
