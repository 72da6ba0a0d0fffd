//! Query AST types: query expressions, set operations, SELECT and table
//! references.

use super::expression::{Expr, Parameter, WindowSpec};
use super::{Ident, ObjectName};
use crate::lexer::Span;

/// Order direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    /// Ascending order (default).
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl OrderDirection {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Null ordering for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullOrdering {
    /// NULLs come first.
    First,
    /// NULLs come last.
    Last,
}

impl NullOrdering {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::First => "NULLS FIRST",
            Self::Last => "NULLS LAST",
        }
    }
}

/// An ORDER BY clause entry.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    /// The expression to order by.
    pub expr: Expr,
    /// The direction, if written.
    pub direction: Option<OrderDirection>,
    /// Null ordering (optional).
    pub nulls: Option<NullOrdering>,
}

/// A row count in OFFSET, FETCH or LIMIT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowCount {
    /// An integer literal.
    Literal(u64),
    /// A placeholder supplied at execution time.
    Parameter(Parameter),
}

/// MySQL `LIMIT count [OFFSET offset]` or `LIMIT offset, count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    pub count: RowCount,
    pub offset: Option<RowCount>,
}

/// Row locking requested by the trailing FOR clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locking {
    /// `FOR UPDATE [OF col, ...]`.
    Update { columns: Vec<Ident> },
    /// `FOR READ ONLY` or `FOR FETCH ONLY`.
    ReadOnly,
}

/// Transaction isolation levels, named by their DB2 abbreviations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsolationLevel {
    /// UR: uncommitted read.
    ReadUncommitted,
    /// CS: cursor stability.
    ReadCommitted,
    /// RS: read stability.
    RepeatableRead,
    /// RR: repeatable read in DB2 terms.
    Serializable,
}

impl IsolationLevel {
    /// The two-letter DB2 abbreviation.
    #[must_use]
    pub const fn abbreviation(&self) -> &'static str {
        match self {
            Self::ReadUncommitted => "UR",
            Self::ReadCommitted => "CS",
            Self::RepeatableRead => "RS",
            Self::Serializable => "RR",
        }
    }
}

/// A complete query expression with its trailing clauses.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// SELECT, VALUES or a set operation tree.
    pub body: SetExpr,
    /// ORDER BY clause.
    pub order_by: Vec<OrderBy>,
    /// `OFFSET n ROWS`.
    pub offset: Option<RowCount>,
    /// `FETCH FIRST [n] ROWS ONLY`; the count defaults to one row.
    pub fetch: Option<RowCount>,
    /// MySQL LIMIT.
    pub limit: Option<Limit>,
    /// FOR UPDATE / FOR READ ONLY.
    pub locking: Option<Locking>,
    /// `WITH {RR|RS|CS|UR}`.
    pub isolation: Option<IsolationLevel>,
    /// Source span.
    pub span: Span,
}

impl Query {
    /// Wraps a bare query body with no trailing clauses.
    #[must_use]
    pub fn from_body(body: SetExpr) -> Self {
        let span = body.span();
        Self {
            body,
            order_by: vec![],
            offset: None,
            fetch: None,
            limit: None,
            locking: None,
            isolation: None,
            span,
        }
    }

    /// Records the isolation level of a trailing `WITH` clause.
    pub fn set_isolation_level(&mut self, level: IsolationLevel) {
        self.isolation = Some(level);
    }

    /// Records the locking mode of a trailing `FOR` clause.
    pub fn set_locking(&mut self, locking: Locking) {
        self.locking = Some(locking);
    }

    /// Returns the SELECT if the body is a plain SELECT.
    #[must_use]
    pub fn as_select(&self) -> Option<&Select> {
        match &self.body {
            SetExpr::Select(select) => Some(select),
            _ => None,
        }
    }

    /// Returns true if a parameter occurs anywhere in the query.
    #[must_use]
    pub fn contains_parameter(&self) -> bool {
        self.body.contains_parameter()
            || self.order_by.iter().any(|o| o.expr.contains_parameter())
            || [self.offset, self.fetch]
                .into_iter()
                .flatten()
                .chain(self.limit.iter().flat_map(|l| [Some(l.count), l.offset]).flatten())
                .any(|count| matches!(count, RowCount::Parameter(_)))
    }
}

/// Set operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperator {
    Union,
    Except,
    Intersect,
}

impl SetOperator {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Union => "UNION",
            Self::Except => "EXCEPT",
            Self::Intersect => "INTERSECT",
        }
    }
}

/// `ALL` / `DISTINCT` after a set operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetQuantifier {
    /// Neither keyword written (duplicates removed).
    #[default]
    None,
    All,
    Distinct,
}

/// The body of a query expression.
#[derive(Debug, Clone, PartialEq)]
pub enum SetExpr {
    /// A SELECT.
    Select(Box<Select>),
    /// A table value constructor: `VALUES (1, 2), (3, 4)`.
    Values { rows: Vec<Vec<Expr>>, span: Span },
    /// A parenthesized query expression with its own trailing clauses.
    Query(Box<Query>),
    /// `left op [ALL|DISTINCT] right`, always left associative.
    SetOperation {
        op: SetOperator,
        quantifier: SetQuantifier,
        left: Box<SetExpr>,
        right: Box<SetExpr>,
        span: Span,
    },
}

impl SetExpr {
    /// Returns the source span.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Select(select) => select.span,
            Self::Query(query) => query.span,
            Self::Values { span, .. } | Self::SetOperation { span, .. } => *span,
        }
    }

    fn contains_parameter(&self) -> bool {
        match self {
            Self::Select(select) => select.contains_parameter(),
            Self::Values { rows, .. } => rows.iter().flatten().any(Expr::contains_parameter),
            Self::Query(query) => query.contains_parameter(),
            Self::SetOperation { left, right, .. } => {
                left.contains_parameter() || right.contains_parameter()
            }
        }
    }
}

/// GROUP BY clause.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupBy {
    /// `GROUP BY a, b`.
    Exprs(Vec<Expr>),
    /// `GROUP BY ROLLUP (a, b)`.
    Rollup(Vec<Expr>),
}

impl GroupBy {
    /// The grouping expressions.
    #[must_use]
    pub fn exprs(&self) -> &[Expr] {
        match self {
            Self::Exprs(exprs) | Self::Rollup(exprs) => exprs,
        }
    }
}

/// `WINDOW name AS (spec)`.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedWindow {
    pub name: Ident,
    pub spec: WindowSpec,
}

/// A SELECT query block.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    /// Whether DISTINCT was specified.
    pub distinct: bool,
    /// The select list.
    pub projection: Vec<SelectItem>,
    /// FROM clause, comma separated table references.
    pub from: Vec<TableRef>,
    /// WHERE clause.
    pub selection: Option<Expr>,
    /// GROUP BY clause.
    pub group_by: Option<GroupBy>,
    /// HAVING clause.
    pub having: Option<Expr>,
    /// WINDOW clause.
    pub windows: Vec<NamedWindow>,
    /// Source span.
    pub span: Span,
}

impl Select {
    /// Marks the select as `SELECT DISTINCT`.
    pub fn mark_distinct(&mut self) {
        self.distinct = true;
    }

    fn contains_parameter(&self) -> bool {
        self.projection.iter().any(|item| match item {
            SelectItem::Expr { expr, .. } => expr.contains_parameter(),
            SelectItem::Wildcard { .. } | SelectItem::QualifiedWildcard { .. } => false,
        }) || self.from.iter().any(TableRef::contains_parameter)
            || self.selection.as_ref().is_some_and(Expr::contains_parameter)
            || self
                .group_by
                .as_ref()
                .is_some_and(|g| g.exprs().iter().any(Expr::contains_parameter))
            || self.having.as_ref().is_some_and(Expr::contains_parameter)
    }
}

/// An entry of the select list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    /// `*`
    Wildcard { span: Span },
    /// `t.*`
    QualifiedWildcard { qualifier: ObjectName, span: Span },
    /// `expr [[AS] alias]`
    Expr { expr: Expr, alias: Option<Ident> },
}

/// MySQL index hint verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexHintAction {
    Use,
    Ignore,
    Force,
}

/// Scope of an index hint: `FOR JOIN`, `FOR ORDER BY`, `FOR GROUP BY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexHintScope {
    Join,
    OrderBy,
    GroupBy,
}

/// `USE INDEX (a, b)` and friends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexHint {
    pub action: IndexHintAction,
    /// Written as `KEY` rather than `INDEX`.
    pub key: bool,
    pub scope: Option<IndexHintScope>,
    pub indexes: Vec<Ident>,
}

/// A table reference in FROM.
#[derive(Debug, Clone, PartialEq)]
pub enum TableRef {
    /// A simple table name.
    Table {
        /// Table name, optionally schema qualified.
        name: ObjectName,
        /// Table alias.
        alias: Option<Ident>,
        /// MySQL index hints.
        hints: Vec<IndexHint>,
        /// Source span.
        span: Span,
    },
    /// A derived table `(subquery) [AS] alias [(cols)]`.
    Derived {
        subquery: Box<Query>,
        alias: Option<Ident>,
        columns: Vec<Ident>,
        span: Span,
    },
    /// A joined table.
    Join(Box<Join>),
    /// A parenthesized joined table.
    Nested { table: Box<TableRef>, span: Span },
}

impl TableRef {
    /// Returns the source span.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Join(join) => join.span,
            Self::Table { span, .. } | Self::Derived { span, .. } | Self::Nested { span, .. } => {
                *span
            }
        }
    }

    fn contains_parameter(&self) -> bool {
        match self {
            Self::Table { .. } => false,
            Self::Derived { subquery, .. } => subquery.contains_parameter(),
            Self::Nested { table, .. } => table.contains_parameter(),
            Self::Join(join) => {
                join.left.contains_parameter()
                    || join.right.contains_parameter()
                    || matches!(
                        join.operator.constraint(),
                        Some(JoinConstraint::On(expr)) if expr.contains_parameter()
                    )
            }
        }
    }
}

/// The join kinds the grammar recognizes, before constraints are attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    LeftOuter,
    RightOuter,
    FullOuter,
    Cross,
    Straight,
    /// `NATURAL [INNER | LEFT | RIGHT | FULL] JOIN`; `None` is inner.
    Natural(Option<PreservedSide>),
}

impl JoinKind {
    /// Returns true if the join needs an ON or USING clause.
    #[must_use]
    pub const fn requires_constraint(&self) -> bool {
        matches!(
            self,
            Self::Inner | Self::LeftOuter | Self::RightOuter | Self::FullOuter
        )
    }
}

/// The side an outer join preserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreservedSide {
    Left,
    Right,
    Both,
}

impl PreservedSide {
    /// The join keyword for this side.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Both => "FULL",
        }
    }
}

/// Exactly one of `ON expr` or `USING (cols)`.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinConstraint {
    On(Expr),
    Using(Vec<Ident>),
}

/// The shape of a join.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinOperator {
    Inner(JoinConstraint),
    Outer {
        preserved: PreservedSide,
        constraint: JoinConstraint,
    },
    Cross,
    Straight,
    Natural(Option<PreservedSide>),
}

impl JoinOperator {
    /// The ON/USING constraint, if this join carries one.
    #[must_use]
    pub const fn constraint(&self) -> Option<&JoinConstraint> {
        match self {
            Self::Inner(constraint) | Self::Outer { constraint, .. } => Some(constraint),
            Self::Cross | Self::Straight | Self::Natural(_) => None,
        }
    }
}

/// A join of two table references.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub left: TableRef,
    pub right: TableRef,
    pub operator: JoinOperator,
    pub span: Span,
}
