//! Query expressions: set operations, SELECT, VALUES, trailing clauses and
//! table references.

use super::error::{Expected, ParseError, Result};
use super::lookahead::{Alternative, Lookahead, NoMatch, ParenScan, Probe};
use super::parser::Parser;
use super::predicates::{
    index_hint_follows, joined_table_follows, select_item_is_qualified_wildcard,
};
use crate::ast::{
    GroupBy, IndexHint, IndexHintAction, IndexHintScope, Join, JoinConstraint, JoinKind,
    JoinOperator, Limit, Locking, NamedWindow, NodeFactory, NullOrdering, ObjectName, OrderBy,
    OrderDirection, PreservedSide, Query, RowCount, Select, SelectItem, SetExpr, SetOperator,
    SetQuantifier, TableRef,
};
use crate::dialect::Features;
use crate::lexer::{Keyword, Span, TokenKind};

/// Keywords that can start a join, besides the gated `STRAIGHT_JOIN`.
const JOIN_KEYWORDS: [Keyword; 7] = [
    Keyword::Join,
    Keyword::Inner,
    Keyword::Cross,
    Keyword::Natural,
    Keyword::Left,
    Keyword::Right,
    Keyword::Full,
];

fn derived_table_trial(probe: &mut Probe<'_, '_>) -> core::result::Result<(), NoMatch> {
    match probe.scan_parenthesized() {
        ParenScan::Subquery => Ok(()),
        _ => Err(NoMatch),
    }
}

fn nested_join_trial(probe: &mut Probe<'_, '_>) -> core::result::Result<(), NoMatch> {
    match probe.scan_parenthesized() {
        ParenScan::Scalar => Ok(()),
        _ => Err(NoMatch),
    }
}

fn table_name_trial(probe: &mut Probe<'_, '_>) -> core::result::Result<(), NoMatch> {
    probe.expect_identifier()
}

impl<F: NodeFactory> Parser<'_, F> {
    /// Parses a query expression with its trailing clauses.
    pub(super) fn parse_query(&mut self) -> Result<Query> {
        let start = self.next_span();
        let body = self.parse_set_expr()?;
        let mut query = Query::from_body(body);

        if self.eat_keyword(Keyword::Order) {
            self.expect_keyword(Keyword::By)?;
            query.order_by = self.parse_order_by_list()?;
        }
        self.parse_row_limits(&mut query)?;
        self.parse_locking_clause(&mut query)?;

        if self.options.has_feature(Features::DB2_ISOLATION_CLAUSE)
            && self.check_keyword(Keyword::With)
            && matches!(
                self.peek_kind(2),
                TokenKind::Keyword(Keyword::Rr | Keyword::Rs | Keyword::Cs | Keyword::Ur)
            )
        {
            self.cursor.advance();
            let level = self.parse_isolation_level()?;
            query.set_isolation_level(level);
        }

        query.span = self.span_from(start);
        Ok(query)
    }

    // Set operations

    fn parse_set_expr(&mut self) -> Result<SetExpr> {
        let first = self.parse_intersect_term()?;
        self.parse_union_tail(first)
    }

    /// `{UNION|EXCEPT} [ALL|DISTINCT] term ...`, folded to the left.
    fn parse_union_tail(&mut self, left: SetExpr) -> Result<SetExpr> {
        let op = if self.eat_keyword(Keyword::Union) {
            SetOperator::Union
        } else if self.eat_keyword(Keyword::Except) {
            SetOperator::Except
        } else {
            return Ok(left);
        };
        let quantifier = self.parse_set_quantifier();
        let right = self.parse_intersect_term()?;
        let combined = self.set_operation(op, quantifier, left, right);
        self.parse_union_tail(combined)
    }

    fn parse_intersect_term(&mut self) -> Result<SetExpr> {
        let first = self.parse_query_primary()?;
        self.parse_intersect_tail(first)
    }

    fn parse_intersect_tail(&mut self, left: SetExpr) -> Result<SetExpr> {
        if !self.eat_keyword(Keyword::Intersect) {
            return Ok(left);
        }
        let quantifier = self.parse_set_quantifier();
        let right = self.parse_query_primary()?;
        let combined = self.set_operation(SetOperator::Intersect, quantifier, left, right);
        self.parse_intersect_tail(combined)
    }

    fn parse_set_quantifier(&mut self) -> SetQuantifier {
        if self.eat_keyword(Keyword::All) {
            SetQuantifier::All
        } else if self.eat_keyword(Keyword::Distinct) {
            SetQuantifier::Distinct
        } else {
            SetQuantifier::None
        }
    }

    fn set_operation(
        &mut self,
        op: SetOperator,
        quantifier: SetQuantifier,
        left: SetExpr,
        right: SetExpr,
    ) -> SetExpr {
        let span = left.span().to(right.span());
        self.build(SetExpr::SetOperation {
            op,
            quantifier,
            left: Box::new(left),
            right: Box::new(right),
            span,
        })
    }

    fn parse_query_primary(&mut self) -> Result<SetExpr> {
        if self.check_keyword(Keyword::Select) {
            return self.parse_select();
        }
        if self.check_keyword(Keyword::Values) {
            return self.parse_values();
        }
        if self.check(&TokenKind::LeftParen) {
            let start = self.cursor.advance().span;
            let mut query = self.parse_query()?;
            self.expect(&TokenKind::RightParen)?;
            query.span = self.span_from(start);
            return Ok(self.build(SetExpr::Query(Box::new(query))));
        }
        Err(self.cursor.unexpected())
    }

    /// `VALUES row {, row}` where a row is `(e, ..)` or a single expression.
    fn parse_values(&mut self) -> Result<SetExpr> {
        let start = self.expect_keyword(Keyword::Values)?.span;
        let mut rows = vec![];
        loop {
            let row = if self.check(&TokenKind::LeftParen)
                && self.paren_shape() != ParenScan::Subquery
            {
                self.expect(&TokenKind::LeftParen)?;
                let mut row = vec![self.parse_expr_or_default()?];
                while self.eat(&TokenKind::Comma) {
                    row.push(self.parse_expr_or_default()?);
                }
                self.expect(&TokenKind::RightParen)?;
                row
            } else {
                vec![self.parse_expr_or_default()?]
            };
            rows.push(row);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        let span = self.span_from(start);
        Ok(self.build(SetExpr::Values { rows, span }))
    }

    // SELECT

    fn parse_select(&mut self) -> Result<SetExpr> {
        let start = self.expect_keyword(Keyword::Select)?.span;
        let distinct = self.eat_keyword(Keyword::Distinct);
        if !distinct {
            self.eat_keyword(Keyword::All);
        }

        let mut projection = vec![self.parse_select_item()?];
        while self.eat(&TokenKind::Comma) {
            projection.push(self.parse_select_item()?);
        }

        let from = if self.eat_keyword(Keyword::From) {
            let mut tables = vec![self.parse_table_ref()?];
            while self.eat(&TokenKind::Comma) {
                tables.push(self.parse_table_ref()?);
            }
            tables
        } else {
            vec![]
        };

        let selection = if self.eat_keyword(Keyword::Where) {
            Some(self.parse_expr()?)
        } else {
            None
        };

        let group_by = if self.eat_keyword(Keyword::Group) {
            self.expect_keyword(Keyword::By)?;
            if matches!(self.peek_kind(1), TokenKind::Keyword(Keyword::Rollup))
                && matches!(self.peek_kind(2), TokenKind::LeftParen)
            {
                self.cursor.advance();
                Some(GroupBy::Rollup(self.parse_parenthesized_exprs()?))
            } else {
                Some(GroupBy::Exprs(self.parse_expr_list()?))
            }
        } else {
            None
        };

        let having = if self.eat_keyword(Keyword::Having) {
            Some(self.parse_expr()?)
        } else {
            None
        };

        let windows = if self.options.has_feature(Features::WINDOW_FUNCTIONS)
            && self.eat_keyword(Keyword::Window)
        {
            self.parse_named_windows()?
        } else {
            vec![]
        };

        let mut select = Select {
            distinct: false,
            projection,
            from,
            selection,
            group_by,
            having,
            windows,
            span: self.span_from(start),
        };
        if distinct {
            select.mark_distinct();
        }
        Ok(self.build(SetExpr::Select(Box::new(select))))
    }

    fn parse_select_item(&mut self) -> Result<SelectItem> {
        if self.check(&TokenKind::Star) {
            let span = self.cursor.advance().span;
            return Ok(SelectItem::Wildcard { span });
        }

        if select_item_is_qualified_wildcard(&mut self.cursor, &self.options) {
            let start = self.next_span();
            let mut parts = vec![];
            loop {
                parts.push(self.parse_identifier()?);
                self.expect(&TokenKind::Dot)?;
                if self.eat(&TokenKind::Star) {
                    break;
                }
            }
            return Ok(SelectItem::QualifiedWildcard {
                qualifier: ObjectName(parts),
                span: self.span_from(start),
            });
        }

        let expr = self.parse_expr()?;
        let alias = self.parse_optional_alias()?;
        Ok(SelectItem::Expr { expr, alias })
    }

    fn parse_named_windows(&mut self) -> Result<Vec<NamedWindow>> {
        let mut windows = vec![];
        loop {
            let name = self.parse_identifier()?;
            self.expect_keyword(Keyword::As)?;
            let spec = self.parse_window_spec()?;
            windows.push(NamedWindow { name, spec });
            if !self.eat(&TokenKind::Comma) {
                return Ok(windows);
            }
        }
    }

    // Trailing clauses

    /// Parses `expr [ASC|DESC] [NULLS FIRST|LAST] {, ...}`.
    pub(super) fn parse_order_by_list(&mut self) -> Result<Vec<OrderBy>> {
        let mut items = vec![];
        loop {
            let expr = self.parse_expr()?;
            let direction = if self.eat_keyword(Keyword::Asc) {
                Some(OrderDirection::Asc)
            } else if self.eat_keyword(Keyword::Desc) {
                Some(OrderDirection::Desc)
            } else {
                None
            };
            let nulls = if self.eat_keyword(Keyword::Nulls) {
                if self.eat_keyword(Keyword::First) {
                    Some(NullOrdering::First)
                } else {
                    self.expect_keyword(Keyword::Last)?;
                    Some(NullOrdering::Last)
                }
            } else {
                None
            };
            items.push(OrderBy {
                expr,
                direction,
                nulls,
            });
            if !self.eat(&TokenKind::Comma) {
                return Ok(items);
            }
        }
    }

    fn parse_row_count(&mut self) -> Result<RowCount> {
        if matches!(
            self.peek_kind(1),
            TokenKind::Question | TokenKind::Parameter(_)
        ) {
            return Ok(RowCount::Parameter(self.parse_parameter()?));
        }
        let (n, _) = self.parse_unsigned_integer()?;
        Ok(RowCount::Literal(n))
    }

    fn expect_row_or_rows(&mut self) -> Result<()> {
        if !self.eat_keyword(Keyword::Row) {
            self.expect_keyword(Keyword::Rows)?;
        }
        Ok(())
    }

    /// `OFFSET n ROWS`, `FETCH FIRST [n] ROWS ONLY`, and the gated LIMIT
    /// clause, which may not be combined with either.
    fn parse_row_limits(&mut self, query: &mut Query) -> Result<()> {
        if self.eat_keyword(Keyword::Offset) {
            query.offset = Some(self.parse_row_count()?);
            self.expect_row_or_rows()?;
        }

        if self.eat_keyword(Keyword::Fetch) {
            if !self.eat_keyword(Keyword::First) {
                self.expect_keyword(Keyword::Next)?;
            }
            let count = if matches!(
                self.peek_kind(1),
                TokenKind::ExactNumber(_) | TokenKind::Question | TokenKind::Parameter(_)
            ) {
                self.parse_row_count()?
            } else {
                RowCount::Literal(1)
            };
            self.expect_row_or_rows()?;
            self.expect_keyword(Keyword::Only)?;
            query.fetch = Some(count);
        }

        if !self.options.has_feature(Features::LIMIT_CLAUSE) || !self.check_keyword(Keyword::Limit)
        {
            return Ok(());
        }
        let at = self.cursor.advance().span;
        if query.offset.is_some() || query.fetch.is_some() {
            return Err(ParseError::semantic(
                "duplicate clause: LIMIT cannot be combined with OFFSET or FETCH",
                at,
            ));
        }

        let first = self.parse_row_count()?;
        let limit = if self.eat(&TokenKind::Comma) {
            Limit {
                count: self.parse_row_count()?,
                offset: Some(first),
            }
        } else if self.eat_keyword(Keyword::Offset) {
            Limit {
                count: first,
                offset: Some(self.parse_row_count()?),
            }
        } else {
            Limit {
                count: first,
                offset: None,
            }
        };
        query.limit = Some(limit);

        if matches!(
            self.peek_kind(1),
            TokenKind::Keyword(Keyword::Offset | Keyword::Fetch)
        ) {
            return Err(ParseError::semantic(
                "duplicate clause: LIMIT cannot be combined with OFFSET or FETCH",
                self.next_span(),
            ));
        }
        Ok(())
    }

    /// `FOR UPDATE [OF c, ..]`, `FOR READ ONLY` or `FOR FETCH ONLY`.
    fn parse_locking_clause(&mut self, query: &mut Query) -> Result<()> {
        if !self.check_keyword(Keyword::For)
            || !matches!(
                self.peek_kind(2),
                TokenKind::Keyword(Keyword::Update | Keyword::Read | Keyword::Fetch)
            )
        {
            return Ok(());
        }
        self.cursor.advance();

        if self.eat_keyword(Keyword::Update) {
            let columns = if self.eat_keyword(Keyword::Of) {
                self.parse_identifier_list()?
            } else {
                vec![]
            };
            query.set_locking(Locking::Update { columns });
            return Ok(());
        }
        if !self.eat_keyword(Keyword::Read) {
            self.expect_keyword(Keyword::Fetch)?;
        }
        self.expect_keyword(Keyword::Only)?;
        query.set_locking(Locking::ReadOnly);
        Ok(())
    }

    // Table references

    /// Parses a table reference with any joins that follow it.
    pub(super) fn parse_table_ref(&mut self) -> Result<TableRef> {
        let mut left = self.parse_table_primary()?;
        while self.join_follows() {
            let kind = self.parse_join_kind()?;
            let right = self.parse_table_primary()?;
            let constraint = if kind.requires_constraint() {
                self.parse_join_constraint()?
            } else {
                None
            };
            let span = self.span_from(left.span());
            left = self.new_join_node(kind, left, right, constraint, span)?;
        }
        Ok(left)
    }

    fn join_follows(&mut self) -> bool {
        if joined_table_follows(&mut self.cursor, &self.options) {
            return true;
        }
        for keyword in JOIN_KEYWORDS {
            self.cursor.record(Expected::Keyword(keyword));
        }
        if self.options.has_feature(Features::STRAIGHT_JOIN) {
            self.cursor.record(Expected::Keyword(Keyword::StraightJoin));
        }
        false
    }

    fn parse_table_primary(&mut self) -> Result<TableRef> {
        self.speculate(
            "table primary",
            &[
                Alternative {
                    name: "derived table",
                    horizon: Lookahead::Unbounded,
                    trial: derived_table_trial,
                    parse: Self::parse_derived_table,
                },
                Alternative {
                    name: "nested join",
                    horizon: Lookahead::Unbounded,
                    trial: nested_join_trial,
                    parse: Self::parse_nested_table,
                },
                Alternative {
                    name: "table name",
                    horizon: Lookahead::Bounded(1),
                    trial: table_name_trial,
                    parse: Self::parse_named_table,
                },
            ],
        )
    }

    fn parse_derived_table(&mut self) -> Result<TableRef> {
        let start = self.next_span();
        let subquery = self.parse_parenthesized_query()?;
        let alias = self.parse_optional_alias()?;
        let columns = if alias.is_some() && self.check(&TokenKind::LeftParen) {
            self.parse_parenthesized_identifiers()?
        } else {
            vec![]
        };
        let span = self.span_from(start);
        Ok(self.build(TableRef::Derived {
            subquery: Box::new(subquery),
            alias,
            columns,
            span,
        }))
    }

    fn parse_nested_table(&mut self) -> Result<TableRef> {
        let start = self.expect(&TokenKind::LeftParen)?.span;
        let table = self.parse_table_ref()?;
        self.expect(&TokenKind::RightParen)?;
        let span = self.span_from(start);
        Ok(self.build(TableRef::Nested {
            table: Box::new(table),
            span,
        }))
    }

    fn parse_named_table(&mut self) -> Result<TableRef> {
        let start = self.next_span();
        let name = self.parse_object_name()?;
        let alias = self.parse_optional_alias()?;
        let mut hints = vec![];
        while index_hint_follows(&mut self.cursor, &self.options) {
            hints.push(self.parse_index_hint()?);
        }
        let span = self.span_from(start);
        Ok(self.build(TableRef::Table {
            name,
            alias,
            hints,
            span,
        }))
    }

    /// `USE|IGNORE|FORCE {INDEX|KEY} [FOR JOIN|ORDER BY|GROUP BY] (i, ..)`.
    fn parse_index_hint(&mut self) -> Result<IndexHint> {
        let action = match self.cursor.peek(1).as_keyword() {
            Some(Keyword::Use) => IndexHintAction::Use,
            Some(Keyword::Ignore) => IndexHintAction::Ignore,
            Some(Keyword::Force) => IndexHintAction::Force,
            _ => return Err(self.expected("index hint")),
        };
        self.cursor.advance();

        let key = if self.eat_keyword(Keyword::Key) {
            true
        } else {
            self.expect_keyword(Keyword::Index)?;
            false
        };

        let scope = if self.eat_keyword(Keyword::For) {
            if self.eat_keyword(Keyword::Join) {
                Some(IndexHintScope::Join)
            } else if self.eat_keyword(Keyword::Order) {
                self.expect_keyword(Keyword::By)?;
                Some(IndexHintScope::OrderBy)
            } else {
                self.expect_keyword(Keyword::Group)?;
                self.expect_keyword(Keyword::By)?;
                Some(IndexHintScope::GroupBy)
            }
        } else {
            None
        };

        self.expect(&TokenKind::LeftParen)?;
        // USE INDEX () means "use no index".
        let indexes = if action == IndexHintAction::Use && self.check(&TokenKind::RightParen) {
            vec![]
        } else {
            self.parse_identifier_list()?
        };
        self.expect(&TokenKind::RightParen)?;

        Ok(IndexHint {
            action,
            key,
            scope,
            indexes,
        })
    }

    fn parse_outer_side(&mut self) -> Option<PreservedSide> {
        let side = if self.eat_keyword(Keyword::Left) {
            PreservedSide::Left
        } else if self.eat_keyword(Keyword::Right) {
            PreservedSide::Right
        } else if self.eat_keyword(Keyword::Full) {
            PreservedSide::Both
        } else {
            return None;
        };
        self.eat_keyword(Keyword::Outer);
        Some(side)
    }

    fn parse_join_kind(&mut self) -> Result<JoinKind> {
        if self.eat_keyword(Keyword::StraightJoin) {
            return Ok(JoinKind::Straight);
        }
        if self.eat_keyword(Keyword::Cross) {
            self.expect_keyword(Keyword::Join)?;
            return Ok(JoinKind::Cross);
        }
        if self.eat_keyword(Keyword::Natural) {
            let side = self.parse_outer_side();
            if side.is_none() {
                self.eat_keyword(Keyword::Inner);
            }
            self.expect_keyword(Keyword::Join)?;
            return Ok(JoinKind::Natural(side));
        }
        if self.eat_keyword(Keyword::Inner) {
            self.expect_keyword(Keyword::Join)?;
            return Ok(JoinKind::Inner);
        }
        let kind = match self.parse_outer_side() {
            Some(PreservedSide::Left) => JoinKind::LeftOuter,
            Some(PreservedSide::Right) => JoinKind::RightOuter,
            Some(PreservedSide::Both) => JoinKind::FullOuter,
            None => JoinKind::Inner,
        };
        self.expect_keyword(Keyword::Join)?;
        Ok(kind)
    }

    fn parse_join_constraint(&mut self) -> Result<Option<JoinConstraint>> {
        if self.eat_keyword(Keyword::On) {
            return Ok(Some(JoinConstraint::On(self.parse_expr()?)));
        }
        if self.eat_keyword(Keyword::Using) {
            return Ok(Some(JoinConstraint::Using(
                self.parse_parenthesized_identifiers()?,
            )));
        }
        Ok(None)
    }

    /// Builds the join node for `kind`. Joins that need a constraint fail
    /// right here when neither ON nor USING was given.
    pub(super) fn new_join_node(
        &mut self,
        kind: JoinKind,
        left: TableRef,
        right: TableRef,
        constraint: Option<JoinConstraint>,
        span: Span,
    ) -> Result<TableRef> {
        let operator = match (kind, constraint) {
            (JoinKind::Inner, Some(constraint)) => JoinOperator::Inner(constraint),
            (JoinKind::LeftOuter, Some(constraint)) => JoinOperator::Outer {
                preserved: PreservedSide::Left,
                constraint,
            },
            (JoinKind::RightOuter, Some(constraint)) => JoinOperator::Outer {
                preserved: PreservedSide::Right,
                constraint,
            },
            (JoinKind::FullOuter, Some(constraint)) => JoinOperator::Outer {
                preserved: PreservedSide::Both,
                constraint,
            },
            (
                JoinKind::Inner | JoinKind::LeftOuter | JoinKind::RightOuter | JoinKind::FullOuter,
                None,
            ) => {
                return Err(ParseError::semantic(
                    "missing join specification",
                    Span::empty(span.end),
                ));
            }
            (JoinKind::Cross, None) => JoinOperator::Cross,
            (JoinKind::Straight, None) => JoinOperator::Straight,
            (JoinKind::Natural(side), None) => JoinOperator::Natural(side),
            (JoinKind::Cross | JoinKind::Straight | JoinKind::Natural(_), Some(_)) => {
                return Err(ParseError::semantic(
                    "this join does not take ON or USING",
                    span,
                ));
            }
        };
        Ok(self.build(TableRef::Join(Box::new(Join {
            left,
            right,
            operator,
            span,
        }))))
    }
}
