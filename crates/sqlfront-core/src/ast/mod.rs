//! Abstract Syntax Tree (AST) types for SQL statements.
//!
//! One closed enum per node category ([`Statement`], [`SetExpr`], [`Expr`],
//! [`TableRef`]); names are plain values resolved later by a binder.

mod display;
mod expression;
mod name;
mod node;
mod query;
mod statement;
mod types;

pub use expression::{
    AggregateFunc, BinaryOp, DateTimeField, Expr, FrameBound, FrameUnits, FunctionCall, Literal,
    Parameter, ParameterStyle, Quantifier, SpecialRegister, TrimSpec, TypedLiteralKind, UnaryOp,
    WindowFrame, WindowRef, WindowSpec,
};
pub use name::{Ident, ObjectName};
pub use node::{AstNode, DefaultFactory, NodeCategory, NodeFactory, NodeTag};
pub use query::{
    GroupBy, IndexHint, IndexHintAction, IndexHintScope, IsolationLevel, Join, JoinConstraint,
    JoinKind, JoinOperator, Limit, Locking, NamedWindow, NullOrdering, OrderBy, OrderDirection,
    PreservedSide, Query, RowCount, Select, SelectItem, SetExpr, SetOperator, SetQuantifier,
    TableRef,
};
pub use statement::{
    AlterTableAction, AlterTableStatement, ColumnConstraint, ColumnConstraintDef, ColumnDef,
    CreateIndexStatement, CreateTableBody, CreateTableStatement, CreateViewStatement,
    DeleteStatement, DropBehavior, DropStatement, ForeignKeyRef, IdentityGeneration, IndexColumn,
    InsertSource, InsertStatement, LockMode, ObjectType, ReferentialAction, SchemaTarget,
    Statement, TableConstraint, TableConstraintDef, UpdateAssignment, UpdateStatement,
    WhereClause,
};
pub use types::{DataType, MAX_CHAR_LENGTH, MAX_DECIMAL_PRECISION, MAX_VARCHAR_LENGTH};
