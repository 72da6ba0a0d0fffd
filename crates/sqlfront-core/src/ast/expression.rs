//! Expression AST types.

use rust_decimal::Decimal;

use super::{DataType, Ident, ObjectName, OrderBy, Query};
use crate::lexer::Span;

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Exact integer that fits in 32 bits.
    Int(i32),
    /// Exact integer that fits in 64 bits but not 32.
    BigInt(i64),
    /// Exact decimal (fractional or wider than 64 bits).
    Decimal(Decimal),
    /// Exact decimal with more digits than [`Decimal`] holds, as written
    /// (sign, digits and point only).
    WideDecimal(String),
    /// Approximate (exponent) number.
    Double(f64),
    /// String literal.
    String(String),
    /// Hex string literal (`X'CAFE'`).
    Hex(Vec<u8>),
    /// Boolean literal.
    Boolean(bool),
    /// NULL literal.
    Null,
    /// `DATE '...'`, `TIME '...'` or `TIMESTAMP '...'`.
    Typed {
        /// Which datetime type.
        kind: TypedLiteralKind,
        /// The literal text.
        value: String,
    },
}

/// The type of a typed datetime literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypedLiteralKind {
    Date,
    Time,
    Timestamp,
}

impl TypedLiteralKind {
    /// Returns the SQL keyword for this type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Timestamp => "TIMESTAMP",
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    /// MySQL `DIV` integer division.
    IntDiv,
    Mod,

    // String
    Concat,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    LeftShift,
    RightShift,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,
}

impl BinaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::IntDiv => "DIV",
            Self::Mod => "%",
            Self::Concat => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    /// Returns the precedence of the operator (higher = binds tighter).
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Eq | Self::NotEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq => 4,
            Self::Add
            | Self::Sub
            | Self::BitAnd
            | Self::BitOr
            | Self::BitXor
            | Self::LeftShift
            | Self::RightShift => 5,
            Self::Mul | Self::Div | Self::IntDiv | Self::Mod | Self::Concat => 6,
        }
    }

    /// Returns true for the six comparison operators.
    #[must_use]
    pub const fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Eq | Self::NotEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq
        )
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Unary plus (+)
    Plus,
    /// Negation (-)
    Neg,
    /// Logical NOT
    Not,
    /// Bitwise NOT (~)
    BitNot,
}

impl UnaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Neg => "-",
            Self::Not => "NOT",
            Self::BitNot => "~",
        }
    }
}

/// Quantifier of a quantified comparison (`x > ALL (subquery)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    All,
    Any,
    Some,
}

impl Quantifier {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Any => "ANY",
            Self::Some => "SOME",
        }
    }
}

/// Which side(s) `TRIM` strips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrimSpec {
    Leading,
    Trailing,
    #[default]
    Both,
}

impl TrimSpec {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Leading => "LEADING",
            Self::Trailing => "TRAILING",
            Self::Both => "BOTH",
        }
    }
}

/// Built-in aggregate functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunc {
    Avg,
    Count,
    Max,
    Min,
    Sum,
}

impl AggregateFunc {
    /// Returns the function name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Avg => "AVG",
            Self::Count => "COUNT",
            Self::Max => "MAX",
            Self::Min => "MIN",
            Self::Sum => "SUM",
        }
    }
}

/// Niladic special registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialRegister {
    CurrentDate,
    CurrentTime,
    CurrentTimestamp,
    CurrentUser,
    CurrentSchema,
    CurrentIsolation,
}

impl SpecialRegister {
    /// Returns the canonical SQL spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CurrentDate => "CURRENT_DATE",
            Self::CurrentTime => "CURRENT_TIME",
            Self::CurrentTimestamp => "CURRENT_TIMESTAMP",
            Self::CurrentUser => "CURRENT_USER",
            Self::CurrentSchema => "CURRENT SCHEMA",
            Self::CurrentIsolation => "CURRENT ISOLATION",
        }
    }
}

/// Datetime fields for `EXTRACT` and `INTERVAL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTimeField {
    Microsecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl DateTimeField {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Microsecond => "MICROSECOND",
            Self::Second => "SECOND",
            Self::Minute => "MINUTE",
            Self::Hour => "HOUR",
            Self::Day => "DAY",
            Self::Week => "WEEK",
            Self::Month => "MONTH",
            Self::Quarter => "QUARTER",
            Self::Year => "YEAR",
        }
    }
}

/// Spelling of a placeholder parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterStyle {
    /// `?`
    Anonymous,
    /// `$n`
    Positional,
}

/// A placeholder parameter, numbered from 0 within its statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
    /// Zero-based parameter number.
    pub index: usize,
    /// How it was written.
    pub style: ParameterStyle,
    /// Source span.
    pub span: Span,
}

/// A function call expression.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    /// The function name, optionally schema qualified.
    pub name: ObjectName,
    /// The arguments.
    pub args: Vec<Expr>,
    /// Whether DISTINCT was specified.
    pub distinct: bool,
    /// Window attached with `OVER`.
    pub over: Option<WindowRef>,
    /// Source span.
    pub span: Span,
}

/// `OVER name` or `OVER (spec)`.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowRef {
    Named(Ident),
    Spec(WindowSpec),
}

/// A window specification.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WindowSpec {
    /// Window this one refines.
    pub base: Option<Ident>,
    /// PARTITION BY expressions.
    pub partition_by: Vec<Expr>,
    /// ORDER BY items.
    pub order_by: Vec<OrderBy>,
    /// Frame clause.
    pub frame: Option<WindowFrame>,
}

/// `ROWS` or `RANGE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameUnits {
    Rows,
    Range,
}

/// One end of a window frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameBound {
    UnboundedPreceding,
    Preceding(u64),
    CurrentRow,
    Following(u64),
    UnboundedFollowing,
}

/// Window frame clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowFrame {
    pub units: FrameUnits,
    pub start: FrameBound,
    /// Present for `BETWEEN start AND end`.
    pub end: Option<FrameBound>,
}

/// An SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value.
    Literal {
        /// The value.
        value: Literal,
        /// Source span.
        span: Span,
    },

    /// A column reference (optionally qualified with table name).
    Column {
        /// Table name or alias, optionally schema qualified.
        table: Option<ObjectName>,
        /// Column name.
        name: Ident,
        /// Source span.
        span: Span,
    },

    /// A `?` or `$n` placeholder.
    Parameter(Parameter),

    /// A binary expression.
    Binary {
        /// Left operand.
        left: Box<Expr>,
        /// Operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<Expr>,
        /// Source span.
        span: Span,
    },

    /// A unary expression.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
        /// Source span.
        span: Span,
    },

    /// `expr op {ALL|ANY|SOME} (subquery)`.
    Quantified {
        left: Box<Expr>,
        op: BinaryOp,
        quantifier: Quantifier,
        subquery: Box<Query>,
        span: Span,
    },

    /// IS NULL expression.
    IsNull {
        /// The expression to check.
        expr: Box<Expr>,
        /// Whether this is IS NOT NULL.
        negated: bool,
        /// Source span.
        span: Span,
    },

    /// `IS [NOT] TRUE` / `IS [NOT] FALSE`.
    IsBool {
        expr: Box<Expr>,
        value: bool,
        negated: bool,
        span: Span,
    },

    /// IN with a value list.
    InList {
        /// The expression to check.
        expr: Box<Expr>,
        /// The list of values.
        list: Vec<Expr>,
        /// Whether this is NOT IN.
        negated: bool,
        /// Source span.
        span: Span,
    },

    /// IN with a subquery.
    InSubquery {
        expr: Box<Expr>,
        subquery: Box<Query>,
        negated: bool,
        span: Span,
    },

    /// BETWEEN expression.
    Between {
        /// The expression to check.
        expr: Box<Expr>,
        /// Lower bound.
        low: Box<Expr>,
        /// Upper bound.
        high: Box<Expr>,
        /// Whether this is NOT BETWEEN.
        negated: bool,
        /// Source span.
        span: Span,
    },

    /// `expr [NOT] LIKE pattern [ESCAPE c]`.
    Like {
        expr: Box<Expr>,
        pattern: Box<Expr>,
        escape: Option<Box<Expr>>,
        negated: bool,
        span: Span,
    },

    /// A function call.
    Function(FunctionCall),

    /// A built-in aggregate, e.g. `SUM(DISTINCT x)`.
    Aggregate {
        func: AggregateFunc,
        distinct: bool,
        arg: Box<Expr>,
        over: Option<WindowRef>,
        span: Span,
    },

    /// `COUNT(*)`.
    CountStar {
        over: Option<WindowRef>,
        span: Span,
    },

    /// Every `TRIM`, `LTRIM` and `RTRIM` form.
    Trim {
        spec: TrimSpec,
        trim_char: Box<Expr>,
        source: Box<Expr>,
        span: Span,
    },

    /// CASE expression.
    Case {
        /// The operand (for simple CASE).
        operand: Option<Box<Expr>>,
        /// WHEN clauses.
        when_clauses: Vec<(Expr, Expr)>,
        /// ELSE clause.
        else_result: Option<Box<Expr>>,
        /// Source span.
        span: Span,
    },

    /// CAST expression.
    Cast {
        /// The expression to cast.
        expr: Box<Expr>,
        /// The target type.
        data_type: DataType,
        /// Source span.
        span: Span,
    },

    /// `NULLIF(a, b)`.
    NullIf {
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },

    /// `SUBSTRING(expr FROM start [FOR length])`.
    Substring {
        expr: Box<Expr>,
        start: Box<Expr>,
        length: Option<Box<Expr>>,
        span: Span,
    },

    /// `EXTRACT(field FROM expr)`.
    Extract {
        field: DateTimeField,
        expr: Box<Expr>,
        span: Span,
    },

    /// `EXISTS (subquery)`.
    Exists {
        subquery: Box<Query>,
        span: Span,
    },

    /// A scalar subquery.
    Subquery {
        query: Box<Query>,
        span: Span,
    },

    /// A row value constructor `(a, b, ...)`.
    Row {
        items: Vec<Expr>,
        span: Span,
    },

    /// A parenthesized scalar expression.
    Nested {
        expr: Box<Expr>,
        span: Span,
    },

    /// A special register such as `CURRENT_DATE`.
    SpecialRegister {
        register: SpecialRegister,
        span: Span,
    },

    /// `NEXT VALUE FOR sequence`.
    NextValueFor {
        sequence: ObjectName,
        span: Span,
    },

    /// `INTERVAL value unit`.
    Interval {
        value: Box<Expr>,
        unit: DateTimeField,
        span: Span,
    },

    /// `XMLPARSE(DOCUMENT expr PRESERVE WHITESPACE)`.
    XmlParse {
        document: Box<Expr>,
        span: Span,
    },

    /// `XMLSERIALIZE(expr AS type)`.
    XmlSerialize {
        expr: Box<Expr>,
        data_type: DataType,
        span: Span,
    },

    /// `XMLEXISTS(xquery PASSING BY REF expr)`.
    XmlExists {
        xquery: String,
        passing: Box<Expr>,
        span: Span,
    },

    /// `DEFAULT` inside a VALUES row or an UPDATE assignment.
    Default {
        span: Span,
    },
}

impl Expr {
    /// Returns the source span of the expression.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Parameter(p) => p.span,
            Self::Function(f) => f.span,
            Self::Literal { span, .. }
            | Self::Column { span, .. }
            | Self::Binary { span, .. }
            | Self::Unary { span, .. }
            | Self::Quantified { span, .. }
            | Self::IsNull { span, .. }
            | Self::IsBool { span, .. }
            | Self::InList { span, .. }
            | Self::InSubquery { span, .. }
            | Self::Between { span, .. }
            | Self::Like { span, .. }
            | Self::Aggregate { span, .. }
            | Self::CountStar { span, .. }
            | Self::Trim { span, .. }
            | Self::Case { span, .. }
            | Self::Cast { span, .. }
            | Self::NullIf { span, .. }
            | Self::Substring { span, .. }
            | Self::Extract { span, .. }
            | Self::Exists { span, .. }
            | Self::Subquery { span, .. }
            | Self::Row { span, .. }
            | Self::Nested { span, .. }
            | Self::SpecialRegister { span, .. }
            | Self::NextValueFor { span, .. }
            | Self::Interval { span, .. }
            | Self::XmlParse { span, .. }
            | Self::XmlSerialize { span, .. }
            | Self::XmlExists { span, .. }
            | Self::Default { span } => *span,
        }
    }

    /// Returns the literal value if this is a literal.
    #[must_use]
    pub const fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Returns true if a parameter occurs anywhere in this expression,
    /// including inside subqueries.
    #[must_use]
    pub fn contains_parameter(&self) -> bool {
        match self {
            Self::Parameter(_) => true,
            Self::Literal { .. }
            | Self::Column { .. }
            | Self::SpecialRegister { .. }
            | Self::NextValueFor { .. }
            | Self::Default { .. } => false,
            Self::Binary { left, right, .. } | Self::NullIf { left, right, .. } => {
                left.contains_parameter() || right.contains_parameter()
            }
            Self::Unary { operand: expr, .. }
            | Self::IsNull { expr, .. }
            | Self::IsBool { expr, .. }
            | Self::Nested { expr, .. }
            | Self::Cast { expr, .. }
            | Self::Extract { expr, .. }
            | Self::Interval { value: expr, .. }
            | Self::XmlParse { document: expr, .. }
            | Self::XmlSerialize { expr, .. }
            | Self::XmlExists { passing: expr, .. } => expr.contains_parameter(),
            Self::Quantified { left, subquery, .. } => {
                left.contains_parameter() || subquery.contains_parameter()
            }
            Self::InList { expr, list, .. } => {
                expr.contains_parameter() || list.iter().any(Self::contains_parameter)
            }
            Self::InSubquery { expr, subquery, .. } => {
                expr.contains_parameter() || subquery.contains_parameter()
            }
            Self::Between {
                expr, low, high, ..
            } => expr.contains_parameter() || low.contains_parameter() || high.contains_parameter(),
            Self::Like {
                expr,
                pattern,
                escape,
                ..
            } => {
                expr.contains_parameter()
                    || pattern.contains_parameter()
                    || escape.as_deref().is_some_and(Self::contains_parameter)
            }
            Self::Function(call) => {
                call.args.iter().any(Self::contains_parameter)
                    || call.over.as_ref().is_some_and(WindowRef::contains_parameter)
            }
            Self::Aggregate { arg, over, .. } => {
                arg.contains_parameter() || over.as_ref().is_some_and(WindowRef::contains_parameter)
            }
            Self::CountStar { over, .. } => {
                over.as_ref().is_some_and(WindowRef::contains_parameter)
            }
            Self::Trim {
                trim_char, source, ..
            } => trim_char.contains_parameter() || source.contains_parameter(),
            Self::Case {
                operand,
                when_clauses,
                else_result,
                ..
            } => {
                operand.as_deref().is_some_and(Self::contains_parameter)
                    || when_clauses
                        .iter()
                        .any(|(w, t)| w.contains_parameter() || t.contains_parameter())
                    || else_result.as_deref().is_some_and(Self::contains_parameter)
            }
            Self::Substring {
                expr,
                start,
                length,
                ..
            } => {
                expr.contains_parameter()
                    || start.contains_parameter()
                    || length.as_deref().is_some_and(Self::contains_parameter)
            }
            Self::Exists { subquery, .. } | Self::Subquery { query: subquery, .. } => {
                subquery.contains_parameter()
            }
            Self::Row { items, .. } => items.iter().any(Self::contains_parameter),
        }
    }
}

impl WindowRef {
    fn contains_parameter(&self) -> bool {
        match self {
            Self::Named(_) => false,
            Self::Spec(spec) => {
                spec.partition_by.iter().any(Expr::contains_parameter)
                    || spec.order_by.iter().any(|o| o.expr.contains_parameter())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(n: i32, start: usize) -> Expr {
        Expr::Literal {
            value: Literal::Int(n),
            span: Span::new(start, start + 1),
        }
    }

    #[test]
    fn test_binary_op_precedence() {
        assert!(BinaryOp::Mul.precedence() > BinaryOp::Add.precedence());
        assert!(BinaryOp::Concat.precedence() > BinaryOp::BitOr.precedence());
        assert!(BinaryOp::Eq.precedence() > BinaryOp::And.precedence());
        assert!(BinaryOp::And.precedence() > BinaryOp::Or.precedence());
    }

    #[test]
    fn test_expr_span() {
        let expr = Expr::Binary {
            left: Box::new(lit(1, 0)),
            op: BinaryOp::Add,
            right: Box::new(lit(2, 4)),
            span: Span::new(0, 5),
        };
        assert_eq!(expr.span(), Span::new(0, 5));
        assert_eq!(lit(7, 3).as_literal(), Some(&Literal::Int(7)));
    }

    #[test]
    fn test_contains_parameter() {
        let param = Expr::Parameter(Parameter {
            index: 0,
            style: ParameterStyle::Anonymous,
            span: Span::new(4, 5),
        });
        let expr = Expr::Between {
            expr: Box::new(lit(1, 0)),
            low: Box::new(param),
            high: Box::new(lit(3, 10)),
            negated: false,
            span: Span::new(0, 11),
        };
        assert!(expr.contains_parameter());
        assert!(!lit(1, 0).contains_parameter());
    }
}
