//! Node construction protocol.
//!
//! The parser never keeps a node it did not hand to a [`NodeFactory`]: every
//! statement, query body, expression and table reference is passed through
//! [`NodeFactory::build`] exactly once, at the moment the grammar rule that
//! produced it commits. Speculative trials cannot reach the factory at all, so
//! a rejected alternative leaves no trace in it.

use super::{Expr, JoinOperator, SetExpr, SetOperator, Statement, TableRef};

/// The four node categories that go through the factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeCategory {
    Statement,
    SetExpr,
    Expr,
    TableRef,
}

/// Closed set of node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeTag {
    // Statements
    QueryStatement,
    Insert,
    Update,
    Delete,
    CreateTable,
    CreateView,
    CreateIndex,
    CreateSchema,
    Drop,
    AlterTable,
    Commit,
    Rollback,
    Savepoint,
    ReleaseSavepoint,
    SetIsolation,
    SetSchema,
    LockTable,

    // Query bodies
    Select,
    Values,
    ParenthesizedQuery,
    Union,
    Except,
    Intersect,

    // Expressions
    Literal,
    Column,
    Parameter,
    BinaryOp,
    UnaryOp,
    QuantifiedComparison,
    IsNull,
    IsBool,
    InList,
    InSubquery,
    Between,
    Like,
    FunctionCall,
    Aggregate,
    CountStar,
    Trim,
    Case,
    Cast,
    NullIf,
    Substring,
    Extract,
    Exists,
    ScalarSubquery,
    RowConstructor,
    Nested,
    SpecialRegister,
    NextValueFor,
    Interval,
    XmlParse,
    XmlSerialize,
    XmlExists,
    Default,

    // Table references
    BaseTable,
    DerivedTable,
    InnerJoin,
    OuterJoin,
    CrossJoin,
    StraightJoin,
    NaturalJoin,
    NestedJoin,
}

impl NodeTag {
    /// The category this kind belongs to.
    #[must_use]
    pub const fn category(self) -> NodeCategory {
        match self {
            Self::QueryStatement
            | Self::Insert
            | Self::Update
            | Self::Delete
            | Self::CreateTable
            | Self::CreateView
            | Self::CreateIndex
            | Self::CreateSchema
            | Self::Drop
            | Self::AlterTable
            | Self::Commit
            | Self::Rollback
            | Self::Savepoint
            | Self::ReleaseSavepoint
            | Self::SetIsolation
            | Self::SetSchema
            | Self::LockTable => NodeCategory::Statement,
            Self::Select
            | Self::Values
            | Self::ParenthesizedQuery
            | Self::Union
            | Self::Except
            | Self::Intersect => NodeCategory::SetExpr,
            Self::BaseTable
            | Self::DerivedTable
            | Self::InnerJoin
            | Self::OuterJoin
            | Self::CrossJoin
            | Self::StraightJoin
            | Self::NaturalJoin
            | Self::NestedJoin => NodeCategory::TableRef,
            _ => NodeCategory::Expr,
        }
    }
}

/// A node that can be handed to a [`NodeFactory`].
pub trait AstNode {
    /// The node kind.
    fn tag(&self) -> NodeTag;
}

/// Receives every committed node.
///
/// A factory may record, annotate or count nodes; it returns the node the
/// parser should keep.
pub trait NodeFactory {
    /// Called once per committed node.
    fn build<N: AstNode>(&mut self, node: N) -> N;
}

/// The identity factory.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFactory;

impl NodeFactory for DefaultFactory {
    fn build<N: AstNode>(&mut self, node: N) -> N {
        node
    }
}

impl<F: NodeFactory> NodeFactory for &mut F {
    fn build<N: AstNode>(&mut self, node: N) -> N {
        (**self).build(node)
    }
}

impl AstNode for Statement {
    fn tag(&self) -> NodeTag {
        match self {
            Self::Query(_) => NodeTag::QueryStatement,
            Self::Insert(_) => NodeTag::Insert,
            Self::Update(_) => NodeTag::Update,
            Self::Delete(_) => NodeTag::Delete,
            Self::CreateTable(_) => NodeTag::CreateTable,
            Self::CreateView(_) => NodeTag::CreateView,
            Self::CreateIndex(_) => NodeTag::CreateIndex,
            Self::CreateSchema { .. } => NodeTag::CreateSchema,
            Self::Drop(_) => NodeTag::Drop,
            Self::AlterTable(_) => NodeTag::AlterTable,
            Self::Commit { .. } => NodeTag::Commit,
            Self::Rollback { .. } => NodeTag::Rollback,
            Self::Savepoint { .. } => NodeTag::Savepoint,
            Self::ReleaseSavepoint { .. } => NodeTag::ReleaseSavepoint,
            Self::SetIsolation { .. } => NodeTag::SetIsolation,
            Self::SetSchema { .. } => NodeTag::SetSchema,
            Self::LockTable { .. } => NodeTag::LockTable,
        }
    }
}

impl AstNode for SetExpr {
    fn tag(&self) -> NodeTag {
        match self {
            Self::Select(_) => NodeTag::Select,
            Self::Values { .. } => NodeTag::Values,
            Self::Query(_) => NodeTag::ParenthesizedQuery,
            Self::SetOperation { op, .. } => match op {
                SetOperator::Union => NodeTag::Union,
                SetOperator::Except => NodeTag::Except,
                SetOperator::Intersect => NodeTag::Intersect,
            },
        }
    }
}

impl AstNode for Expr {
    fn tag(&self) -> NodeTag {
        match self {
            Self::Literal { .. } => NodeTag::Literal,
            Self::Column { .. } => NodeTag::Column,
            Self::Parameter(_) => NodeTag::Parameter,
            Self::Binary { .. } => NodeTag::BinaryOp,
            Self::Unary { .. } => NodeTag::UnaryOp,
            Self::Quantified { .. } => NodeTag::QuantifiedComparison,
            Self::IsNull { .. } => NodeTag::IsNull,
            Self::IsBool { .. } => NodeTag::IsBool,
            Self::InList { .. } => NodeTag::InList,
            Self::InSubquery { .. } => NodeTag::InSubquery,
            Self::Between { .. } => NodeTag::Between,
            Self::Like { .. } => NodeTag::Like,
            Self::Function(_) => NodeTag::FunctionCall,
            Self::Aggregate { .. } => NodeTag::Aggregate,
            Self::CountStar { .. } => NodeTag::CountStar,
            Self::Trim { .. } => NodeTag::Trim,
            Self::Case { .. } => NodeTag::Case,
            Self::Cast { .. } => NodeTag::Cast,
            Self::NullIf { .. } => NodeTag::NullIf,
            Self::Substring { .. } => NodeTag::Substring,
            Self::Extract { .. } => NodeTag::Extract,
            Self::Exists { .. } => NodeTag::Exists,
            Self::Subquery { .. } => NodeTag::ScalarSubquery,
            Self::Row { .. } => NodeTag::RowConstructor,
            Self::Nested { .. } => NodeTag::Nested,
            Self::SpecialRegister { .. } => NodeTag::SpecialRegister,
            Self::NextValueFor { .. } => NodeTag::NextValueFor,
            Self::Interval { .. } => NodeTag::Interval,
            Self::XmlParse { .. } => NodeTag::XmlParse,
            Self::XmlSerialize { .. } => NodeTag::XmlSerialize,
            Self::XmlExists { .. } => NodeTag::XmlExists,
            Self::Default { .. } => NodeTag::Default,
        }
    }
}

impl AstNode for TableRef {
    fn tag(&self) -> NodeTag {
        match self {
            Self::Table { .. } => NodeTag::BaseTable,
            Self::Derived { .. } => NodeTag::DerivedTable,
            Self::Nested { .. } => NodeTag::NestedJoin,
            Self::Join(join) => match join.operator {
                JoinOperator::Inner(_) => NodeTag::InnerJoin,
                JoinOperator::Outer { .. } => NodeTag::OuterJoin,
                JoinOperator::Cross => NodeTag::CrossJoin,
                JoinOperator::Straight => NodeTag::StraightJoin,
                JoinOperator::Natural(_) => NodeTag::NaturalJoin,
            },
        }
    }
}
