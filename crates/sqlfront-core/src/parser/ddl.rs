//! CREATE, DROP and ALTER, plus data types.

use core::mem::discriminant;

use super::error::{Expected, ParseError, Result};
use super::lookahead::{Alternative, Lookahead, NoMatch, Probe};
use super::parser::Parser;
use super::predicates::{datatype_at, datatype_follows, is_identifier_token};
use crate::ast::{
    AlterTableAction, AlterTableStatement, ColumnConstraint, ColumnConstraintDef, ColumnDef,
    CreateIndexStatement, CreateTableBody, CreateTableStatement, CreateViewStatement, DataType,
    DropBehavior, DropStatement, Expr, ForeignKeyRef, Ident, IdentityGeneration, IndexColumn,
    NodeFactory, ObjectType, ReferentialAction, Statement, TableConstraint, TableConstraintDef,
    MAX_CHAR_LENGTH, MAX_DECIMAL_PRECISION, MAX_VARCHAR_LENGTH,
};
use crate::dialect::Features;
use crate::lexer::{Keyword, Span, TokenKind};

/// `( ident {, ident} ) AS`: the column list of CREATE TABLE .. AS.
fn column_names_trial(probe: &mut Probe<'_, '_>) -> core::result::Result<(), NoMatch> {
    probe.expect(&TokenKind::LeftParen)?;
    probe.expect_identifier()?;
    while !matches!(probe.peek(1), TokenKind::RightParen) {
        probe.expect(&TokenKind::Comma)?;
        probe.expect_identifier()?;
    }
    probe.bump()?;
    probe.expect_keyword(Keyword::As)
}

fn table_elements_trial(probe: &mut Probe<'_, '_>) -> core::result::Result<(), NoMatch> {
    probe.expect(&TokenKind::LeftParen)
}

fn column_definition_trial(probe: &mut Probe<'_, '_>) -> core::result::Result<(), NoMatch> {
    probe.expect_identifier()?;
    if probe.test(datatype_follows) {
        Ok(())
    } else {
        Err(NoMatch)
    }
}

fn table_constraint_trial(probe: &mut Probe<'_, '_>) -> core::result::Result<(), NoMatch> {
    match probe.peek(1) {
        TokenKind::Keyword(
            Keyword::Constraint
            | Keyword::Primary
            | Keyword::Unique
            | Keyword::Foreign
            | Keyword::Check,
        ) => Ok(()),
        _ => Err(NoMatch),
    }
}

const fn starts_table_constraint(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Keyword(
            Keyword::Constraint
                | Keyword::Primary
                | Keyword::Unique
                | Keyword::Foreign
                | Keyword::Check
        )
    )
}

enum TableElement {
    Column(ColumnDef),
    Constraint(TableConstraintDef),
}

fn duplicate_clause(clause: &str, span: Span) -> ParseError {
    ParseError::semantic(format!("duplicate {clause} clause"), span)
}

impl<F: NodeFactory> Parser<'_, F> {
    pub(super) fn parse_create(&mut self) -> Result<Statement> {
        let start = self.expect_keyword(Keyword::Create)?.span;
        if self.eat_keyword(Keyword::Table) {
            return self.parse_create_table(start);
        }
        if self.eat_keyword(Keyword::View) {
            return self.parse_create_view(start);
        }
        if self.eat_keyword(Keyword::Unique) {
            self.expect_keyword(Keyword::Index)?;
            return self.parse_create_index(start, true);
        }
        if self.eat_keyword(Keyword::Index) {
            return self.parse_create_index(start, false);
        }
        if self.eat_keyword(Keyword::Schema) {
            let name = self.parse_identifier()?;
            return Ok(Statement::CreateSchema {
                name,
                span: self.span_from(start),
            });
        }
        Err(self.cursor.unexpected())
    }

    fn parse_create_table(&mut self, start: Span) -> Result<Statement> {
        let name = self.parse_object_name()?;
        let body = if self.check(&TokenKind::LeftParen) {
            self.speculate(
                "create table body",
                &[
                    Alternative {
                        name: "column name list",
                        horizon: Lookahead::Unbounded,
                        trial: column_names_trial,
                        parse: Self::parse_create_table_as_with_columns,
                    },
                    Alternative {
                        name: "table elements",
                        horizon: Lookahead::Bounded(1),
                        trial: table_elements_trial,
                        parse: Self::parse_table_elements,
                    },
                ],
            )?
        } else if self.check_keyword(Keyword::As) {
            self.parse_create_table_as(vec![])?
        } else {
            return Err(self.cursor.unexpected());
        };
        Ok(Statement::CreateTable(CreateTableStatement {
            name,
            body,
            span: self.span_from(start),
        }))
    }

    fn parse_create_table_as_with_columns(&mut self) -> Result<CreateTableBody> {
        let columns = self.parse_parenthesized_identifiers()?;
        self.parse_create_table_as(columns)
    }

    /// `AS query WITH [NO] DATA`.
    fn parse_create_table_as(&mut self, columns: Vec<Ident>) -> Result<CreateTableBody> {
        self.expect_keyword(Keyword::As)?;
        let query = self.parse_query()?;
        if query.contains_parameter() {
            return Err(ParseError::semantic(
                "parameters are not allowed in CREATE TABLE AS",
                query.span,
            ));
        }
        self.expect_keyword(Keyword::With)?;
        let with_data = !self.eat_keyword(Keyword::No);
        self.expect_keyword(Keyword::Data)?;
        Ok(CreateTableBody::AsQuery {
            columns,
            query: Box::new(query),
            with_data,
        })
    }

    fn parse_table_elements(&mut self) -> Result<CreateTableBody> {
        self.expect(&TokenKind::LeftParen)?;
        let mut columns = vec![];
        let mut constraints = vec![];
        loop {
            let element = self.speculate(
                "table element",
                &[
                    Alternative {
                        name: "column definition",
                        horizon: Lookahead::Bounded(2),
                        trial: column_definition_trial,
                        parse: Self::parse_column_element,
                    },
                    Alternative {
                        name: "table constraint",
                        horizon: Lookahead::Bounded(1),
                        trial: table_constraint_trial,
                        parse: Self::parse_constraint_element,
                    },
                ],
            )?;
            match element {
                TableElement::Column(column) => columns.push(column),
                TableElement::Constraint(constraint) => constraints.push(constraint),
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RightParen)?;
        Ok(CreateTableBody::Elements {
            columns,
            constraints,
        })
    }

    fn parse_column_element(&mut self) -> Result<TableElement> {
        self.parse_column_def().map(TableElement::Column)
    }

    fn parse_constraint_element(&mut self) -> Result<TableElement> {
        self.parse_table_constraint().map(TableElement::Constraint)
    }

    fn parse_column_def(&mut self) -> Result<ColumnDef> {
        let name = self.parse_identifier()?;
        let data_type = self.parse_data_type()?;

        let mut constraints: Vec<ColumnConstraintDef> = vec![];
        loop {
            let at = self.next_span();
            let name = if self.eat_keyword(Keyword::Constraint) {
                Some(self.parse_identifier()?)
            } else {
                None
            };
            let Some(constraint) = self.parse_column_constraint()? else {
                if name.is_some() {
                    return Err(self.expected("column constraint"));
                }
                break;
            };
            // CHECK may repeat; every other clause appears at most once.
            let repeated = !matches!(constraint, ColumnConstraint::Check(_))
                && constraints
                    .iter()
                    .any(|c| discriminant(&c.constraint) == discriminant(&constraint));
            if repeated {
                return Err(duplicate_clause(constraint.clause_name(), self.span_from(at)));
            }
            constraints.push(ColumnConstraintDef { name, constraint });
        }

        Ok(ColumnDef {
            name,
            data_type,
            constraints,
        })
    }

    fn parse_column_constraint(&mut self) -> Result<Option<ColumnConstraint>> {
        let constraint = if self.eat_keyword(Keyword::Not) {
            self.expect_keyword(Keyword::Null)?;
            ColumnConstraint::NotNull
        } else if self.eat_keyword(Keyword::Default) {
            ColumnConstraint::Default(self.parse_arithmetic(0)?)
        } else if self.eat_keyword(Keyword::Primary) {
            self.expect_keyword(Keyword::Key)?;
            ColumnConstraint::PrimaryKey
        } else if self.eat_keyword(Keyword::Unique) {
            ColumnConstraint::Unique
        } else if self.eat_keyword(Keyword::References) {
            ColumnConstraint::References(self.parse_references()?)
        } else if self.eat_keyword(Keyword::Check) {
            ColumnConstraint::Check(self.parse_check_condition()?)
        } else if self.eat_keyword(Keyword::Generated) {
            let generation = if self.eat_keyword(Keyword::Always) {
                IdentityGeneration::Always
            } else {
                self.expect_keyword(Keyword::By)?;
                self.expect_keyword(Keyword::Default)?;
                IdentityGeneration::ByDefault
            };
            self.expect_keyword(Keyword::As)?;
            self.expect_keyword(Keyword::Identity)?;
            ColumnConstraint::Identity(generation)
        } else {
            return Ok(None);
        };
        Ok(Some(constraint))
    }

    fn parse_check_condition(&mut self) -> Result<Expr> {
        self.expect(&TokenKind::LeftParen)?;
        let condition = self.parse_expr()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(condition)
    }

    /// The part of a foreign key after `REFERENCES`. ON DELETE and ON UPDATE
    /// may come in either order, once each.
    fn parse_references(&mut self) -> Result<ForeignKeyRef> {
        let table = self.parse_object_name()?;
        let columns = if self.check(&TokenKind::LeftParen) {
            self.parse_parenthesized_identifiers()?
        } else {
            vec![]
        };

        let mut on_delete = None;
        let mut on_update = None;
        while self.check_keyword(Keyword::On) {
            let at = self.cursor.advance().span;
            let (slot, clause) = if self.eat_keyword(Keyword::Delete) {
                (&mut on_delete, "ON DELETE")
            } else {
                self.expect_keyword(Keyword::Update)?;
                (&mut on_update, "ON UPDATE")
            };
            if slot.is_some() {
                return Err(duplicate_clause(clause, self.span_from(at)));
            }
            *slot = Some(self.parse_referential_action()?);
        }

        Ok(ForeignKeyRef {
            table,
            columns,
            on_delete,
            on_update,
        })
    }

    fn parse_referential_action(&mut self) -> Result<ReferentialAction> {
        if self.eat_keyword(Keyword::No) {
            self.expect_keyword(Keyword::Action)?;
            return Ok(ReferentialAction::NoAction);
        }
        if self.eat_keyword(Keyword::Restrict) {
            return Ok(ReferentialAction::Restrict);
        }
        if self.eat_keyword(Keyword::Cascade) {
            return Ok(ReferentialAction::Cascade);
        }
        self.expect_keyword(Keyword::Set)?;
        if self.eat_keyword(Keyword::Null) {
            return Ok(ReferentialAction::SetNull);
        }
        self.expect_keyword(Keyword::Default)?;
        Ok(ReferentialAction::SetDefault)
    }

    fn parse_table_constraint(&mut self) -> Result<TableConstraintDef> {
        let name = if self.eat_keyword(Keyword::Constraint) {
            Some(self.parse_identifier()?)
        } else {
            None
        };

        let constraint = if self.eat_keyword(Keyword::Primary) {
            self.expect_keyword(Keyword::Key)?;
            TableConstraint::PrimaryKey(self.parse_parenthesized_identifiers()?)
        } else if self.eat_keyword(Keyword::Unique) {
            TableConstraint::Unique(self.parse_parenthesized_identifiers()?)
        } else if self.eat_keyword(Keyword::Foreign) {
            self.expect_keyword(Keyword::Key)?;
            let columns = self.parse_parenthesized_identifiers()?;
            self.expect_keyword(Keyword::References)?;
            TableConstraint::ForeignKey {
                columns,
                references: self.parse_references()?,
            }
        } else if self.eat_keyword(Keyword::Check) {
            TableConstraint::Check(self.parse_check_condition()?)
        } else {
            return Err(self.expected("table constraint"));
        };

        Ok(TableConstraintDef { name, constraint })
    }

    fn parse_create_view(&mut self, start: Span) -> Result<Statement> {
        let name = self.parse_object_name()?;
        let columns = if self.check(&TokenKind::LeftParen) {
            self.parse_parenthesized_identifiers()?
        } else {
            vec![]
        };
        self.expect_keyword(Keyword::As)?;
        let query = self.parse_query()?;
        Ok(Statement::CreateView(CreateViewStatement {
            name,
            columns,
            query: Box::new(query),
            span: self.span_from(start),
        }))
    }

    fn parse_create_index(&mut self, start: Span, unique: bool) -> Result<Statement> {
        let name = self.parse_object_name()?;
        self.expect_keyword(Keyword::On)?;
        let table = self.parse_object_name()?;
        self.expect(&TokenKind::LeftParen)?;
        let mut columns = vec![];
        loop {
            let name = self.parse_identifier()?;
            let descending = if self.eat_keyword(Keyword::Asc) {
                Some(false)
            } else if self.eat_keyword(Keyword::Desc) {
                Some(true)
            } else {
                None
            };
            columns.push(IndexColumn { name, descending });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RightParen)?;
        Ok(Statement::CreateIndex(CreateIndexStatement {
            unique,
            name,
            table,
            columns,
            span: self.span_from(start),
        }))
    }

    fn parse_drop_behavior(&mut self) -> Option<DropBehavior> {
        if self.eat_keyword(Keyword::Restrict) {
            Some(DropBehavior::Restrict)
        } else if self.eat_keyword(Keyword::Cascade) {
            Some(DropBehavior::Cascade)
        } else {
            None
        }
    }

    /// `DROP {TABLE|VIEW|INDEX|SCHEMA} name [RESTRICT|CASCADE]`.
    pub(super) fn parse_drop(&mut self) -> Result<Statement> {
        let start = self.expect_keyword(Keyword::Drop)?.span;
        let object_type = if self.eat_keyword(Keyword::Table) {
            ObjectType::Table
        } else if self.eat_keyword(Keyword::View) {
            ObjectType::View
        } else if self.eat_keyword(Keyword::Index) {
            ObjectType::Index
        } else if self.eat_keyword(Keyword::Schema) {
            ObjectType::Schema
        } else {
            return Err(self.cursor.unexpected());
        };
        let name = self.parse_object_name()?;
        let behavior = self.parse_drop_behavior();
        Ok(Statement::Drop(DropStatement {
            object_type,
            name,
            behavior,
            span: self.span_from(start),
        }))
    }

    /// Eats an optional `COLUMN` noise word. `COLUMN` is also a valid column
    /// name, so it is only taken as the noise word when a name follows it.
    fn eat_column_keyword(&mut self, name_at: impl Fn(&mut Self) -> bool) -> bool {
        if matches!(self.peek_kind(1), TokenKind::Keyword(Keyword::Column)) && name_at(self) {
            self.cursor.advance();
            true
        } else {
            false
        }
    }

    /// `ALTER TABLE t action`.
    pub(super) fn parse_alter(&mut self) -> Result<Statement> {
        let start = self.expect_keyword(Keyword::Alter)?.span;
        self.expect_keyword(Keyword::Table)?;
        let name = self.parse_object_name()?;

        let action = if self.eat_keyword(Keyword::Add) {
            if starts_table_constraint(self.peek_kind(1)) {
                AlterTableAction::AddConstraint(self.parse_table_constraint()?)
            } else {
                self.eat_column_keyword(|p| {
                    is_identifier_token(p.cursor.peek_kind(2)) && datatype_at(&mut p.cursor, &p.options, 3)
                });
                AlterTableAction::AddColumn(self.parse_column_def()?)
            }
        } else if self.eat_keyword(Keyword::Drop) {
            if self.eat_keyword(Keyword::Constraint) {
                AlterTableAction::DropConstraint(self.parse_identifier()?)
            } else {
                self.eat_column_keyword(|p| is_identifier_token(p.cursor.peek_kind(2)));
                let column = self.parse_identifier()?;
                AlterTableAction::DropColumn {
                    name: column,
                    behavior: self.parse_drop_behavior(),
                }
            }
        } else if self.eat_keyword(Keyword::Alter) {
            self.eat_column_keyword(|p| {
                matches!(p.cursor.peek_kind(3), TokenKind::Keyword(Keyword::Set))
            });
            let column = self.parse_identifier()?;
            self.expect_keyword(Keyword::Set)?;
            self.expect_keyword(Keyword::Default)?;
            AlterTableAction::SetColumnDefault {
                column,
                default: self.parse_arithmetic(0)?,
            }
        } else {
            return Err(self.cursor.unexpected());
        };

        Ok(Statement::AlterTable(AlterTableStatement {
            name,
            action,
            span: self.span_from(start),
        }))
    }

    // Data types

    fn parse_unsigned(&mut self) -> bool {
        self.options.has_feature(Features::UNSIGNED) && self.eat_keyword(Keyword::Unsigned)
    }

    /// Parses `( n )` if present.
    fn parse_type_length(&mut self) -> Result<Option<(u64, Span)>> {
        if !self.eat(&TokenKind::LeftParen) {
            return Ok(None);
        }
        let length = self.parse_unsigned_integer()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(Some(length))
    }

    fn required_length(&mut self, what: &str, max: u32) -> Result<u32> {
        match self.parse_type_length()? {
            Some((length, span)) => check_length(what, length, span, max),
            None => {
                self.cursor.record(Expected::Token("("));
                Err(self.cursor.unexpected())
            }
        }
    }

    /// `[(p [, s])]` of DECIMAL and NUMERIC.
    fn parse_precision_scale(&mut self) -> Result<(Option<u8>, Option<u8>)> {
        if !self.eat(&TokenKind::LeftParen) {
            return Ok((None, None));
        }
        let (precision, at) = self.parse_unsigned_integer()?;
        let precision = match u8::try_from(precision) {
            Ok(p) if (1..=MAX_DECIMAL_PRECISION).contains(&p) => p,
            _ => {
                return Err(ParseError::semantic(
                    format!("DECIMAL precision must be between 1 and {MAX_DECIMAL_PRECISION}"),
                    at,
                ))
            }
        };
        let scale = if self.eat(&TokenKind::Comma) {
            let (scale, at) = self.parse_unsigned_integer()?;
            match u8::try_from(scale) {
                Ok(s) if s <= precision => Some(s),
                _ => {
                    return Err(ParseError::semantic(
                        "DECIMAL scale must be between 0 and the precision",
                        at,
                    ))
                }
            }
        } else {
            None
        };
        self.expect(&TokenKind::RightParen)?;
        Ok((Some(precision), scale))
    }

    /// Parses a data type.
    pub(super) fn parse_data_type(&mut self) -> Result<DataType> {
        let keyword = match self.cursor.peek(1).as_keyword() {
            Some(keyword) if datatype_follows(&mut self.cursor, &self.options) => keyword,
            _ => return Err(self.expected("data type")),
        };
        self.cursor.advance();

        let data_type = match keyword {
            Keyword::Smallint => DataType::Smallint {
                unsigned: self.parse_unsigned(),
            },
            Keyword::Integer | Keyword::Int => DataType::Integer {
                unsigned: self.parse_unsigned(),
            },
            Keyword::Bigint => DataType::Bigint {
                unsigned: self.parse_unsigned(),
            },
            Keyword::Tinyint => DataType::Tinyint {
                unsigned: self.parse_unsigned(),
            },
            Keyword::Mediumint => DataType::Mediumint {
                unsigned: self.parse_unsigned(),
            },
            Keyword::Real => DataType::Real,
            Keyword::Double => {
                self.eat_keyword(Keyword::Precision);
                DataType::Double
            }
            Keyword::Float => {
                let precision = match self.parse_type_length()? {
                    Some((p, span)) => Some(u32::try_from(p).map_err(|_| {
                        ParseError::semantic("FLOAT precision out of range", span)
                    })?),
                    None => None,
                };
                DataType::Float(precision)
            }
            Keyword::Decimal | Keyword::Dec => {
                let (precision, scale) = self.parse_precision_scale()?;
                DataType::Decimal { precision, scale }
            }
            Keyword::Numeric => {
                let (precision, scale) = self.parse_precision_scale()?;
                DataType::Numeric { precision, scale }
            }
            Keyword::Char | Keyword::Character => {
                if self.eat_keyword(Keyword::Varying) {
                    DataType::Varchar(self.required_length("VARCHAR", MAX_VARCHAR_LENGTH)?)
                } else {
                    match self.parse_type_length()? {
                        Some((length, span)) => {
                            DataType::Char(Some(check_length("CHAR", length, span, MAX_CHAR_LENGTH)?))
                        }
                        None => DataType::Char(None),
                    }
                }
            }
            Keyword::Varchar => {
                DataType::Varchar(self.required_length("VARCHAR", MAX_VARCHAR_LENGTH)?)
            }
            Keyword::Long => {
                self.expect_keyword(Keyword::Varchar)?;
                DataType::LongVarchar
            }
            Keyword::Clob => DataType::Clob,
            Keyword::Blob => DataType::Blob,
            Keyword::Text => DataType::Text,
            Keyword::Tinytext => DataType::Tinytext,
            Keyword::Mediumtext => DataType::Mediumtext,
            Keyword::Longtext => DataType::Longtext,
            Keyword::Date => DataType::Date,
            Keyword::Time => DataType::Time,
            Keyword::Timestamp => DataType::Timestamp,
            Keyword::Datetime => DataType::Datetime,
            Keyword::Boolean => DataType::Boolean,
            Keyword::Xml => DataType::Xml,
            _ => {
                return Err(ParseError::semantic(
                    "unsupported data type",
                    self.cursor.previous_span(),
                ))
            }
        };
        Ok(data_type)
    }
}

fn check_length(what: &str, length: u64, span: Span, max: u32) -> Result<u32> {
    match u32::try_from(length) {
        Ok(n) if (1..=max).contains(&n) => Ok(n),
        _ => Err(ParseError::semantic(
            format!("{what} length must be between 1 and {max}"),
            span,
        )),
    }
}
