//! Whole-parser properties: node construction, associativity, feature
//! gating and per-statement state.

mod common;
use common::*;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sqlfront_core::ast::{
    AstNode, Expr, Literal, NodeFactory, NodeTag, SelectItem, SetExpr, SetOperator, SetQuantifier,
};
use sqlfront_core::lexer::Keyword;
use sqlfront_core::parser::Expected;
use sqlfront_core::{parse_statement_list, Features, MySqlDialect, Parser, ParserOptions, Span};

// ===================================================================
// Helper functions
// ===================================================================

#[derive(Default)]
struct Recorder(Vec<NodeTag>);

impl NodeFactory for Recorder {
    fn build<N: AstNode>(&mut self, node: N) -> N {
        self.0.push(node.tag());
        node
    }
}

fn built_nodes(sql: &str) -> Vec<NodeTag> {
    let mut parser = Parser::with_factory(sql, ParserOptions::default(), Recorder::default());
    parser
        .parse_statement()
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"));
    parser.into_factory().0
}

fn first_item(sql: &str) -> Expr {
    match parse_select(sql).projection.into_iter().next() {
        Some(SelectItem::Expr { expr, .. }) => expr,
        other => panic!("Expected expression item, got {other:?}"),
    }
}

// ===================================================================
// Node construction
// ===================================================================

#[test]
fn trial_parses_never_reach_the_factory() {
    assert_eq!(
        built_nodes("SELECT (1, 2) = (SELECT a, b FROM t)"),
        vec![
            NodeTag::Literal,
            NodeTag::Literal,
            NodeTag::RowConstructor,
            NodeTag::Column,
            NodeTag::Column,
            NodeTag::BaseTable,
            NodeTag::Select,
            NodeTag::ScalarSubquery,
            NodeTag::BinaryOp,
            NodeTag::Select,
            NodeTag::QueryStatement,
        ]
    );
    assert_eq!(
        built_nodes("INSERT INTO t (a) (SELECT 1)"),
        vec![
            NodeTag::Literal,
            NodeTag::Select,
            NodeTag::ParenthesizedQuery,
            NodeTag::Insert,
        ]
    );
}

#[test]
fn derived_table_nodes_are_built_once() {
    assert_eq!(
        built_nodes("SELECT * FROM ((SELECT 1) UNION (SELECT 2)) d"),
        vec![
            NodeTag::Literal,
            NodeTag::Select,
            NodeTag::ParenthesizedQuery,
            NodeTag::Literal,
            NodeTag::Select,
            NodeTag::ParenthesizedQuery,
            NodeTag::Union,
            NodeTag::DerivedTable,
            NodeTag::Select,
            NodeTag::QueryStatement,
        ]
    );
}

#[test]
fn custom_factory_does_not_change_the_tree() {
    let sql = "SELECT x FROM (a JOIN b ON a.k = b.k) WHERE (x, y) IN (SELECT 1, 2)";
    let mut parser = Parser::with_factory(sql, ParserOptions::default(), Recorder::default());
    let recorded = parser.parse_statement().unwrap();
    assert_eq!(recorded, parse(sql));
}

#[test]
fn failed_statement_leaves_no_partial_statement_node() {
    let mut parser = Parser::with_factory(
        "INSERT INTO t (a, b",
        ParserOptions::default(),
        Recorder::default(),
    );
    assert!(parser.parse_statement().is_err());
    assert!(parser.into_factory().0.is_empty());
}

// ===================================================================
// Set operations
// ===================================================================

fn set_chain_depth(body: &SetExpr) -> usize {
    match body {
        SetExpr::SetOperation { left, right, .. } => {
            assert!(
                matches!(right.as_ref(), SetExpr::Select(_)),
                "right operand must be a single term, got {right:?}"
            );
            1 + set_chain_depth(left)
        }
        _ => 0,
    }
}

proptest! {
    #[test]
    fn union_chains_fold_to_the_left(
        ops in prop::collection::vec(
            prop_oneof![Just("UNION"), Just("UNION ALL"), Just("EXCEPT"), Just("EXCEPT DISTINCT")],
            1..6,
        )
    ) {
        let mut sql = String::from("SELECT 0 FROM t");
        for (i, op) in ops.iter().enumerate() {
            sql.push_str(&format!(" {op} SELECT {} FROM t", i + 1));
        }
        let query = parse_query(&sql);
        prop_assert_eq!(set_chain_depth(&query.body), ops.len());
    }
}

#[test]
fn intersect_binds_tighter_than_union() {
    let query = parse_query("SELECT 1 UNION SELECT 2 INTERSECT SELECT 3");
    let SetExpr::SetOperation { op, right, .. } = &query.body else {
        panic!("expected set operation");
    };
    assert_eq!(*op, SetOperator::Union);
    assert!(matches!(
        right.as_ref(),
        SetExpr::SetOperation {
            op: SetOperator::Intersect,
            ..
        }
    ));
}

#[test]
fn mixed_quantifiers_fold_to_the_left() {
    let query = parse_query("SELECT a FROM t UNION ALL SELECT b FROM t UNION SELECT c FROM t");
    let SetExpr::SetOperation {
        op,
        quantifier,
        left,
        ..
    } = &query.body
    else {
        panic!("expected set operation");
    };
    assert_eq!((*op, *quantifier), (SetOperator::Union, SetQuantifier::None));
    assert!(matches!(
        left.as_ref(),
        SetExpr::SetOperation {
            quantifier: SetQuantifier::All,
            ..
        }
    ));

    let query = parse_query("SELECT a FROM t INTERSECT SELECT b FROM t INTERSECT ALL SELECT c FROM t");
    let SetExpr::SetOperation {
        quantifier, left, ..
    } = &query.body
    else {
        panic!("expected set operation");
    };
    assert_eq!(*quantifier, SetQuantifier::All);
    assert!(matches!(
        left.as_ref(),
        SetExpr::SetOperation {
            op: SetOperator::Intersect,
            quantifier: SetQuantifier::None,
            ..
        }
    ));
}

// ===================================================================
// Parenthesized forms
// ===================================================================

#[test]
fn parenthesized_forms_are_classified_by_shape() {
    assert!(matches!(first_item("SELECT (x)"), Expr::Nested { .. }));
    assert!(matches!(first_item("SELECT ((x))"), Expr::Nested { .. }));
    assert!(matches!(first_item("SELECT (((1)))"), Expr::Nested { .. }));
    assert!(matches!(
        first_item("SELECT (((1)), 2)"),
        Expr::Row { ref items, .. } if items.len() == 2
    ));
    assert!(matches!(first_item("SELECT (x, y)"), Expr::Row { .. }));
    assert!(matches!(first_item("SELECT ((x), y)"), Expr::Row { .. }));
    assert!(matches!(first_item("SELECT (SELECT x)"), Expr::Subquery { .. }));
    assert!(matches!(first_item("SELECT ((SELECT x))"), Expr::Subquery { .. }));
    assert!(matches!(
        first_item("SELECT ((SELECT x) UNION (SELECT y))"),
        Expr::Subquery { .. }
    ));
    assert!(matches!(first_item("SELECT ((SELECT x) + 1)"), Expr::Nested { .. }));
}

#[test]
fn smallest_int_is_one_literal() {
    let e = first_item("SELECT -2147483648");
    assert_eq!(
        e,
        Expr::Literal {
            value: Literal::Int(i32::MIN),
            span: Span::new(7, 18),
        }
    );
}

#[test]
fn exact_literals_keep_every_written_digit() {
    for text in [
        "0.00000000000000000000000000001",
        "1234567890123456789012345678901",
        "1.2345678901234567890123456789012",
        "-9999999999999999999999.999999999",
    ] {
        let Expr::Literal { value, .. } = first_item(&format!("SELECT {text}")) else {
            panic!("expected literal for {text}");
        };
        assert_eq!(value.to_string(), text);
    }
    round_trip("SELECT 0.00000000000000000000000000001 FROM t");
}

// ===================================================================
// Feature gating
// ===================================================================

#[test]
fn div_gating_is_stable_across_parses() {
    let generic = ParserOptions::default();
    let mysql = ParserOptions::for_dialect(&MySqlDialect);
    let sql = "SELECT a DIV b FROM t";

    let first = Parser::with_options(sql, generic.clone()).parse_statement();
    let second = Parser::with_options(sql, generic.clone()).parse_statement();
    assert!(first.is_err());
    assert_eq!(first, second);

    let enabled = Parser::with_options(sql, mysql.clone()).parse_statement();
    let again = Parser::with_options(sql, mysql).parse_statement();
    assert!(enabled.is_ok());
    assert_eq!(enabled, again);

    let after = Parser::with_options(sql, generic).parse_statement();
    assert_eq!(after, first);
}

#[test]
fn switched_off_extension_words_are_plain_identifiers() {
    for word in ["DIV", "MOD", "LIMIT", "STRAIGHT_JOIN", "USE"] {
        let with_word = parse(&format!("SELECT {word}, x {word} FROM t {word}")).to_string();
        let with_name = parse("SELECT name, x name FROM t name").to_string();
        assert_eq!(with_word, with_name.replace("name", word));
    }
}

#[test]
fn unrelated_features_do_not_change_a_parse() {
    let sql = "SELECT a, COUNT(*) FROM t JOIN u ON t.id = u.id WHERE a = 1 GROUP BY a";
    let all = ParserOptions::for_dialect(&MySqlDialect)
        .with_feature(Features::EMPTY_PARENS_COLUMN | Features::DB2_ISOLATION_CLAUSE);
    assert_eq!(parse_with(sql, &all), parse(sql));
}

#[test]
fn div_is_an_alias_only_without_the_feature() {
    let s = parse_select("SELECT a DIV FROM t");
    assert!(matches!(
        &s.projection[0],
        SelectItem::Expr { alias: Some(alias), .. } if alias == "DIV"
    ));
    let _ = parse_err_with(
        "SELECT a DIV FROM t",
        &ParserOptions::for_dialect(&MySqlDialect),
    );
}

#[test]
fn statement_lists_decide_every_statement_alike() {
    let results = parse_statement_list(
        "SELECT (a, b) FROM t; SELECT (a, b) FROM t",
        &ParserOptions::default(),
    );
    let first = results[0].as_ref().unwrap();
    let second = results[1].as_ref().unwrap();
    assert_eq!(first.statement.to_string(), second.statement.to_string());
}

// ===================================================================
// Parameters
// ===================================================================

#[test]
fn parameters_restart_with_each_statement() {
    let results = parse_statement_list(
        "SELECT ? FROM t; UPDATE t SET a = ?, b = ? WHERE c = ?; COMMIT",
        &ParserOptions::default(),
    );
    let indexes: Vec<Vec<usize>> = results
        .iter()
        .map(|r| {
            r.as_ref()
                .unwrap()
                .parameters
                .iter()
                .map(|p| p.index)
                .collect()
        })
        .collect();
    assert_eq!(indexes, vec![vec![0], vec![0, 1, 2], vec![]]);
}

#[test]
fn parameter_styles_may_differ_between_statements() {
    let results = parse_statement_list("SELECT ?; SELECT $1", &ParserOptions::default());
    assert!(results.iter().all(Result::is_ok));
}

// ===================================================================
// Expected sets
// ===================================================================

#[test]
fn expected_set_after_outer_side() {
    let err = parse_err("SELECT * FROM a LEFT x");
    assert!(err.expects(Expected::Keyword(Keyword::Outer)));
    assert!(err.expects(Expected::Keyword(Keyword::Join)));
}

#[test]
fn expected_set_after_is() {
    let err = parse_err("SELECT a FROM t WHERE a IS 5");
    for keyword in [Keyword::Not, Keyword::Null, Keyword::True, Keyword::False] {
        assert!(err.expects(Expected::Keyword(keyword)), "{keyword:?}");
    }
}

// ===================================================================
// Join specifications
// ===================================================================

#[test]
fn on_and_using_are_exclusive() {
    let _ = parse_err("SELECT * FROM a JOIN b ON a.x = b.x USING (x)");
    let _ = parse_err("SELECT * FROM a JOIN b USING (x) ON a.x = b.x");
    round_trip("SELECT * FROM a JOIN b USING (x)");
    round_trip("SELECT * FROM a JOIN b ON a.x = b.x");
}
