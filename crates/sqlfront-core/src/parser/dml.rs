//! INSERT, UPDATE and DELETE.

use super::error::Result;
use super::lookahead::{Alternative, Lookahead, NoMatch, ParenScan, Probe};
use super::parser::Parser;
use crate::ast::{
    DeleteStatement, Ident, InsertSource, InsertStatement, NodeFactory, Statement,
    UpdateAssignment, UpdateStatement, WhereClause,
};
use crate::lexer::{Keyword, TokenKind};

/// `( ident {, ident} )` followed by the start of a query.
fn target_columns_trial(probe: &mut Probe<'_, '_>) -> core::result::Result<(), NoMatch> {
    probe.expect(&TokenKind::LeftParen)?;
    probe.expect_identifier()?;
    while !matches!(probe.peek(1), TokenKind::RightParen) {
        probe.expect(&TokenKind::Comma)?;
        probe.expect_identifier()?;
    }
    probe.bump()?;
    match probe.peek(1) {
        TokenKind::Keyword(Keyword::Select | Keyword::Values) | TokenKind::LeftParen => Ok(()),
        _ => Err(NoMatch),
    }
}

fn insert_query_trial(probe: &mut Probe<'_, '_>) -> core::result::Result<(), NoMatch> {
    match probe.scan_parenthesized() {
        ParenScan::Subquery => Ok(()),
        _ => Err(NoMatch),
    }
}

type InsertTarget = (Vec<Ident>, InsertSource);

impl<F: NodeFactory> Parser<'_, F> {
    /// `INSERT INTO t [(cols)] {query | DEFAULT VALUES}`.
    pub(super) fn parse_insert(&mut self) -> Result<Statement> {
        let start = self.expect_keyword(Keyword::Insert)?.span;
        self.expect_keyword(Keyword::Into)?;
        let table = self.parse_object_name()?;

        let (columns, source) = if self.check(&TokenKind::LeftParen) {
            self.speculate(
                "insert target",
                &[
                    Alternative {
                        name: "target column list",
                        horizon: Lookahead::Unbounded,
                        trial: target_columns_trial,
                        parse: Self::parse_insert_columns_and_query,
                    },
                    Alternative {
                        name: "query",
                        horizon: Lookahead::Unbounded,
                        trial: insert_query_trial,
                        parse: Self::parse_insert_query,
                    },
                ],
            )?
        } else if self.eat_keyword(Keyword::Default) {
            self.expect_keyword(Keyword::Values)?;
            (vec![], InsertSource::DefaultValues)
        } else {
            self.parse_insert_query()?
        };

        Ok(Statement::Insert(InsertStatement {
            table,
            columns,
            source,
            span: self.span_from(start),
        }))
    }

    fn parse_insert_columns_and_query(&mut self) -> Result<InsertTarget> {
        let columns = self.parse_parenthesized_identifiers()?;
        let query = self.parse_query()?;
        Ok((columns, InsertSource::Query(Box::new(query))))
    }

    fn parse_insert_query(&mut self) -> Result<InsertTarget> {
        let query = self.parse_query()?;
        Ok((vec![], InsertSource::Query(Box::new(query))))
    }

    /// `UPDATE t [[AS] a] SET c = {expr|DEFAULT}, .. [WHERE ..]`.
    pub(super) fn parse_update(&mut self) -> Result<Statement> {
        let start = self.expect_keyword(Keyword::Update)?.span;
        let table = self.parse_object_name()?;
        let alias = self.parse_optional_alias()?;
        self.expect_keyword(Keyword::Set)?;

        let mut assignments = vec![];
        loop {
            let column = self.parse_identifier()?;
            self.expect(&TokenKind::Eq)?;
            let value = self.parse_expr_or_default()?;
            assignments.push(UpdateAssignment { column, value });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        let where_clause = self.parse_searched_where()?;
        Ok(Statement::Update(UpdateStatement {
            table,
            alias,
            assignments,
            where_clause,
            span: self.span_from(start),
        }))
    }

    /// `DELETE FROM t [[AS] a] [WHERE ..]`.
    pub(super) fn parse_delete(&mut self) -> Result<Statement> {
        let start = self.expect_keyword(Keyword::Delete)?.span;
        self.expect_keyword(Keyword::From)?;
        let table = self.parse_object_name()?;
        let alias = self.parse_optional_alias()?;
        let where_clause = self.parse_searched_where()?;
        Ok(Statement::Delete(DeleteStatement {
            table,
            alias,
            where_clause,
            span: self.span_from(start),
        }))
    }

    /// `WHERE expr` or the positioned form `WHERE CURRENT OF cursor`.
    fn parse_searched_where(&mut self) -> Result<Option<WhereClause>> {
        if !self.eat_keyword(Keyword::Where) {
            return Ok(None);
        }
        if matches!(self.peek_kind(1), TokenKind::Keyword(Keyword::Current))
            && matches!(self.peek_kind(2), TokenKind::Keyword(Keyword::Of))
        {
            self.cursor.advance();
            self.cursor.advance();
            return Ok(Some(WhereClause::CurrentOf(self.parse_identifier()?)));
        }
        Ok(Some(WhereClause::Expr(self.parse_expr()?)))
    }
}
