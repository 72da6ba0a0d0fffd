//! SQL statement AST types.

use super::expression::{Expr, Parameter};
use super::query::{IsolationLevel, Query};
use super::types::DataType;
use super::{Ident, ObjectName};
use crate::lexer::Span;

/// Source of rows for INSERT.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    /// A query or VALUES list.
    Query(Box<Query>),
    /// `DEFAULT VALUES`.
    DefaultValues,
}

/// An INSERT statement.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    /// Target table.
    pub table: ObjectName,
    /// Column list (empty means all columns).
    pub columns: Vec<Ident>,
    /// Rows to insert.
    pub source: InsertSource,
    /// Source span.
    pub span: Span,
}

/// A `column = value` assignment in UPDATE.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateAssignment {
    /// Column name.
    pub column: Ident,
    /// New value; `Expr::Default` for `DEFAULT`.
    pub value: Expr,
}

/// Row filter of UPDATE and DELETE.
#[derive(Debug, Clone, PartialEq)]
pub enum WhereClause {
    /// `WHERE expr`.
    Expr(Expr),
    /// `WHERE CURRENT OF cursor`.
    CurrentOf(Ident),
}

/// An UPDATE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    /// Target table.
    pub table: ObjectName,
    /// Table alias.
    pub alias: Option<Ident>,
    /// SET assignments.
    pub assignments: Vec<UpdateAssignment>,
    /// WHERE clause.
    pub where_clause: Option<WhereClause>,
    /// Source span.
    pub span: Span,
}

/// A DELETE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    /// Target table.
    pub table: ObjectName,
    /// Table alias.
    pub alias: Option<Ident>,
    /// WHERE clause.
    pub where_clause: Option<WhereClause>,
    /// Source span.
    pub span: Span,
}

/// Referential action of a foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferentialAction {
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl ReferentialAction {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

/// `REFERENCES table [(cols)] [ON DELETE a] [ON UPDATE a]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyRef {
    pub table: ObjectName,
    pub columns: Vec<Ident>,
    pub on_delete: Option<ReferentialAction>,
    pub on_update: Option<ReferentialAction>,
}

/// `GENERATED ALWAYS` or `GENERATED BY DEFAULT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityGeneration {
    Always,
    ByDefault,
}

/// A constraint attached to a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnConstraint {
    NotNull,
    Default(Expr),
    PrimaryKey,
    Unique,
    References(ForeignKeyRef),
    Check(Expr),
    Identity(IdentityGeneration),
}

impl ColumnConstraint {
    /// Human readable name used in duplicate-clause diagnostics.
    #[must_use]
    pub const fn clause_name(&self) -> &'static str {
        match self {
            Self::NotNull => "NOT NULL",
            Self::Default(_) => "DEFAULT",
            Self::PrimaryKey => "PRIMARY KEY",
            Self::Unique => "UNIQUE",
            Self::References(_) => "REFERENCES",
            Self::Check(_) => "CHECK",
            Self::Identity(_) => "GENERATED AS IDENTITY",
        }
    }
}

/// A column constraint with its optional `CONSTRAINT name`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnConstraintDef {
    pub name: Option<Ident>,
    pub constraint: ColumnConstraint,
}

/// A column definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    /// Column name.
    pub name: Ident,
    /// Data type.
    pub data_type: DataType,
    /// Column constraints in source order.
    pub constraints: Vec<ColumnConstraintDef>,
}

impl ColumnDef {
    /// Returns true if the column carries `NOT NULL` or `PRIMARY KEY`.
    #[must_use]
    pub fn is_not_null(&self) -> bool {
        self.constraints.iter().any(|c| {
            matches!(
                c.constraint,
                ColumnConstraint::NotNull | ColumnConstraint::PrimaryKey
            )
        })
    }

    /// The DEFAULT expression, if any.
    #[must_use]
    pub fn default_value(&self) -> Option<&Expr> {
        self.constraints.iter().find_map(|c| match &c.constraint {
            ColumnConstraint::Default(expr) => Some(expr),
            _ => None,
        })
    }
}

/// A table-level constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum TableConstraint {
    PrimaryKey(Vec<Ident>),
    Unique(Vec<Ident>),
    ForeignKey {
        columns: Vec<Ident>,
        references: ForeignKeyRef,
    },
    Check(Expr),
}

/// A table constraint with its optional `CONSTRAINT name`.
#[derive(Debug, Clone, PartialEq)]
pub struct TableConstraintDef {
    pub name: Option<Ident>,
    pub constraint: TableConstraint,
}

/// What CREATE TABLE builds the table from.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateTableBody {
    /// Explicit column and constraint list.
    Elements {
        columns: Vec<ColumnDef>,
        constraints: Vec<TableConstraintDef>,
    },
    /// `[(cols)] AS query WITH [NO] DATA`.
    AsQuery {
        columns: Vec<Ident>,
        query: Box<Query>,
        with_data: bool,
    },
}

/// A CREATE TABLE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableStatement {
    pub name: ObjectName,
    pub body: CreateTableBody,
    pub span: Span,
}

/// A CREATE VIEW statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateViewStatement {
    pub name: ObjectName,
    pub columns: Vec<Ident>,
    pub query: Box<Query>,
    pub span: Span,
}

/// A column of CREATE INDEX.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexColumn {
    pub name: Ident,
    /// `Some(true)` for DESC, `Some(false)` for ASC.
    pub descending: Option<bool>,
}

/// A CREATE INDEX statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateIndexStatement {
    pub unique: bool,
    pub name: ObjectName,
    pub table: ObjectName,
    pub columns: Vec<IndexColumn>,
    pub span: Span,
}

/// Kinds of object DROP can remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Table,
    View,
    Index,
    Schema,
}

impl ObjectType {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "TABLE",
            Self::View => "VIEW",
            Self::Index => "INDEX",
            Self::Schema => "SCHEMA",
        }
    }
}

/// `RESTRICT` or `CASCADE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropBehavior {
    Restrict,
    Cascade,
}

impl DropBehavior {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
        }
    }
}

/// A DROP statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DropStatement {
    pub object_type: ObjectType,
    pub name: ObjectName,
    pub behavior: Option<DropBehavior>,
    pub span: Span,
}

/// The change ALTER TABLE makes.
#[derive(Debug, Clone, PartialEq)]
pub enum AlterTableAction {
    AddColumn(ColumnDef),
    AddConstraint(TableConstraintDef),
    DropColumn {
        name: Ident,
        behavior: Option<DropBehavior>,
    },
    DropConstraint(Ident),
    SetColumnDefault {
        column: Ident,
        default: Expr,
    },
}

/// An ALTER TABLE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct AlterTableStatement {
    pub name: ObjectName,
    pub action: AlterTableAction,
    pub span: Span,
}

/// Target of `SET SCHEMA`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaTarget {
    Name(Ident),
    String(String),
    Parameter(Parameter),
    CurrentUser,
}

/// `LOCK TABLE t IN {SHARE|EXCLUSIVE} MODE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    Share,
    Exclusive,
}

/// A SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A query (SELECT, VALUES or set operation).
    Query(Box<Query>),
    /// INSERT statement.
    Insert(InsertStatement),
    /// UPDATE statement.
    Update(UpdateStatement),
    /// DELETE statement.
    Delete(DeleteStatement),
    /// CREATE TABLE.
    CreateTable(CreateTableStatement),
    /// CREATE VIEW.
    CreateView(CreateViewStatement),
    /// CREATE INDEX.
    CreateIndex(CreateIndexStatement),
    /// CREATE SCHEMA.
    CreateSchema { name: Ident, span: Span },
    /// DROP TABLE / VIEW / INDEX / SCHEMA.
    Drop(DropStatement),
    /// ALTER TABLE.
    AlterTable(AlterTableStatement),
    /// `COMMIT [WORK]`.
    Commit { span: Span },
    /// `ROLLBACK [WORK] [TO SAVEPOINT [name]]`.
    Rollback {
        /// Set for `TO SAVEPOINT`; the inner name is optional.
        savepoint: Option<Option<Ident>>,
        span: Span,
    },
    /// `SAVEPOINT name`.
    Savepoint { name: Ident, span: Span },
    /// `RELEASE [TO] SAVEPOINT name`.
    ReleaseSavepoint { name: Ident, span: Span },
    /// `SET [CURRENT] ISOLATION [=] level`.
    SetIsolation { level: IsolationLevel, span: Span },
    /// `SET [CURRENT] SCHEMA [=] target`.
    SetSchema { target: SchemaTarget, span: Span },
    /// `LOCK TABLE t IN mode MODE`.
    LockTable {
        table: ObjectName,
        mode: LockMode,
        span: Span,
    },
}

impl Statement {
    /// Returns the source span.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Query(query) => query.span,
            Self::Insert(s) => s.span,
            Self::Update(s) => s.span,
            Self::Delete(s) => s.span,
            Self::CreateTable(s) => s.span,
            Self::CreateView(s) => s.span,
            Self::CreateIndex(s) => s.span,
            Self::Drop(s) => s.span,
            Self::AlterTable(s) => s.span,
            Self::CreateSchema { span, .. }
            | Self::Commit { span }
            | Self::Rollback { span, .. }
            | Self::Savepoint { span, .. }
            | Self::ReleaseSavepoint { span, .. }
            | Self::SetIsolation { span, .. }
            | Self::SetSchema { span, .. }
            | Self::LockTable { span, .. } => *span,
        }
    }

    /// Returns the query if this is a query statement.
    #[must_use]
    pub fn as_query(&self) -> Option<&Query> {
        match self {
            Self::Query(query) => Some(query),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Literal;

    #[test]
    fn test_column_def_helpers() {
        let column = ColumnDef {
            name: Ident::new("id", Span::new(0, 2)),
            data_type: DataType::Integer { unsigned: false },
            constraints: vec![
                ColumnConstraintDef {
                    name: None,
                    constraint: ColumnConstraint::PrimaryKey,
                },
                ColumnConstraintDef {
                    name: None,
                    constraint: ColumnConstraint::Default(Expr::Literal {
                        value: Literal::Int(0),
                        span: Span::new(30, 31),
                    }),
                },
            ],
        };
        assert!(column.is_not_null());
        assert!(column.default_value().is_some());
        assert_eq!(ColumnConstraint::PrimaryKey.clause_name(), "PRIMARY KEY");
    }

    #[test]
    fn test_statement_span() {
        let stmt = Statement::Commit {
            span: Span::new(0, 6),
        };
        assert_eq!(stmt.span(), Span::new(0, 6));
        assert!(stmt.as_query().is_none());
    }
}
