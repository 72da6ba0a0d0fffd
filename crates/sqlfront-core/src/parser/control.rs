//! Transaction and session control statements.

use super::error::Result;
use super::parser::Parser;
use super::predicates::is_identifier_token;
use crate::ast::{IsolationLevel, LockMode, NodeFactory, SchemaTarget, Statement};
use crate::lexer::{Keyword, TokenKind};

impl<F: NodeFactory> Parser<'_, F> {
    /// `COMMIT [WORK]`.
    pub(super) fn parse_commit(&mut self) -> Result<Statement> {
        let start = self.expect_keyword(Keyword::Commit)?.span;
        self.eat_keyword(Keyword::Work);
        Ok(Statement::Commit {
            span: self.span_from(start),
        })
    }

    /// `ROLLBACK [WORK] [TO SAVEPOINT [name]]`.
    pub(super) fn parse_rollback(&mut self) -> Result<Statement> {
        let start = self.expect_keyword(Keyword::Rollback)?.span;
        self.eat_keyword(Keyword::Work);
        let savepoint = if self.eat_keyword(Keyword::To) {
            self.expect_keyword(Keyword::Savepoint)?;
            let name = if self.at_name() {
                Some(self.parse_identifier()?)
            } else {
                None
            };
            Some(name)
        } else {
            None
        };
        Ok(Statement::Rollback {
            savepoint,
            span: self.span_from(start),
        })
    }

    /// `SAVEPOINT name`.
    pub(super) fn parse_savepoint(&mut self) -> Result<Statement> {
        let start = self.expect_keyword(Keyword::Savepoint)?.span;
        let name = self.parse_identifier()?;
        Ok(Statement::Savepoint {
            name,
            span: self.span_from(start),
        })
    }

    /// `RELEASE [TO] SAVEPOINT name`.
    pub(super) fn parse_release_savepoint(&mut self) -> Result<Statement> {
        let start = self.expect_keyword(Keyword::Release)?.span;
        self.eat_keyword(Keyword::To);
        self.expect_keyword(Keyword::Savepoint)?;
        let name = self.parse_identifier()?;
        Ok(Statement::ReleaseSavepoint {
            name,
            span: self.span_from(start),
        })
    }

    /// `SET [CURRENT] {ISOLATION | SCHEMA} [=] ...`.
    pub(super) fn parse_set(&mut self) -> Result<Statement> {
        let start = self.expect_keyword(Keyword::Set)?.span;
        self.eat_keyword(Keyword::Current);

        if self.eat_keyword(Keyword::Isolation) {
            self.eat(&TokenKind::Eq);
            let level = self.parse_isolation_level()?;
            return Ok(Statement::SetIsolation {
                level,
                span: self.span_from(start),
            });
        }

        self.expect_keyword(Keyword::Schema)?;
        self.eat(&TokenKind::Eq);
        let target = self.parse_schema_target()?;
        Ok(Statement::SetSchema {
            target,
            span: self.span_from(start),
        })
    }

    fn parse_schema_target(&mut self) -> Result<SchemaTarget> {
        let kind = self.peek_kind(1).clone();
        match kind {
            TokenKind::Keyword(Keyword::CurrentUser) => {
                self.cursor.advance();
                Ok(SchemaTarget::CurrentUser)
            }
            TokenKind::Identifier(name) if name.eq_ignore_ascii_case("USER") => {
                self.cursor.advance();
                Ok(SchemaTarget::CurrentUser)
            }
            TokenKind::Question | TokenKind::Parameter(_) => {
                Ok(SchemaTarget::Parameter(self.parse_parameter()?))
            }
            TokenKind::String(value) => {
                self.cursor.advance();
                Ok(SchemaTarget::String(value))
            }
            _ => Ok(SchemaTarget::Name(self.parse_identifier()?)),
        }
    }

    /// An isolation level: `UR`, `CS`, `RS`, `RR` or the spelled-out ANSI
    /// names.
    pub(super) fn parse_isolation_level(&mut self) -> Result<IsolationLevel> {
        let level = match self.cursor.peek(1).as_keyword() {
            Some(Keyword::Ur) => IsolationLevel::ReadUncommitted,
            Some(Keyword::Cs) => IsolationLevel::ReadCommitted,
            Some(Keyword::Rs) => IsolationLevel::RepeatableRead,
            Some(Keyword::Rr | Keyword::Serializable) => IsolationLevel::Serializable,
            Some(Keyword::Read) => {
                self.cursor.advance();
                if self.eat_keyword(Keyword::Uncommitted) {
                    return Ok(IsolationLevel::ReadUncommitted);
                }
                self.expect_keyword(Keyword::Committed)?;
                return Ok(IsolationLevel::ReadCommitted);
            }
            Some(Keyword::Repeatable) => {
                self.cursor.advance();
                self.expect_keyword(Keyword::Read)?;
                return Ok(IsolationLevel::RepeatableRead);
            }
            _ => return Err(self.expected("isolation level")),
        };
        self.cursor.advance();
        Ok(level)
    }

    /// `LOCK TABLE t IN {SHARE|EXCLUSIVE} MODE`.
    pub(super) fn parse_lock_table(&mut self) -> Result<Statement> {
        let start = self.expect_keyword(Keyword::Lock)?.span;
        self.expect_keyword(Keyword::Table)?;
        let table = self.parse_object_name()?;
        self.expect_keyword(Keyword::In)?;
        let mode = if self.eat_keyword(Keyword::Share) {
            LockMode::Share
        } else {
            self.expect_keyword(Keyword::Exclusive)?;
            LockMode::Exclusive
        };
        self.expect_keyword(Keyword::Mode)?;
        Ok(Statement::LockTable {
            table,
            mode,
            span: self.span_from(start),
        })
    }

    fn at_name(&mut self) -> bool {
        is_identifier_token(self.peek_kind(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{Db2Dialect, ParserOptions};
    use crate::parser::Expected;

    fn parse(sql: &str) -> Statement {
        Parser::new(sql).parse_statement().unwrap()
    }

    #[test]
    fn test_transaction_statements() {
        assert!(matches!(parse("COMMIT WORK"), Statement::Commit { .. }));
        assert!(matches!(
            parse("ROLLBACK"),
            Statement::Rollback { savepoint: None, .. }
        ));
        assert!(matches!(
            parse("ROLLBACK WORK TO SAVEPOINT"),
            Statement::Rollback { savepoint: Some(None), .. }
        ));
        assert!(matches!(
            parse("ROLLBACK TO SAVEPOINT sp1"),
            Statement::Rollback { savepoint: Some(Some(_)), .. }
        ));
        assert!(matches!(parse("SAVEPOINT sp1"), Statement::Savepoint { .. }));
        assert!(matches!(
            parse("RELEASE TO SAVEPOINT sp1"),
            Statement::ReleaseSavepoint { .. }
        ));
    }

    #[test]
    fn test_set_isolation() {
        for (sql, expected) in [
            ("SET ISOLATION = UR", IsolationLevel::ReadUncommitted),
            ("SET CURRENT ISOLATION CS", IsolationLevel::ReadCommitted),
            ("SET ISOLATION REPEATABLE READ", IsolationLevel::RepeatableRead),
            ("SET ISOLATION SERIALIZABLE", IsolationLevel::Serializable),
            ("SET ISOLATION READ COMMITTED", IsolationLevel::ReadCommitted),
        ] {
            let Statement::SetIsolation { level, .. } = parse(sql) else {
                panic!("expected SET ISOLATION for {sql}");
            };
            assert_eq!(level, expected, "{sql}");
        }
        let err = Parser::new("SET ISOLATION x").parse_statement().unwrap_err();
        assert!(err.expects(Expected::Production("isolation level")));
    }

    #[test]
    fn test_set_schema_targets() {
        let target = |sql: &str| match parse(sql) {
            Statement::SetSchema { target, .. } => target,
            other => panic!("expected SET SCHEMA, got {other:?}"),
        };
        assert_eq!(target("SET SCHEMA user"), SchemaTarget::CurrentUser);
        assert_eq!(target("SET CURRENT SCHEMA = CURRENT_USER"), SchemaTarget::CurrentUser);
        assert_eq!(target("SET SCHEMA 'APP'"), SchemaTarget::String("APP".into()));
        assert!(matches!(target("SET SCHEMA ?"), SchemaTarget::Parameter(_)));
        assert!(matches!(target("SET SCHEMA \"user\""), SchemaTarget::Name(_)));

        let Statement::SetSchema { target, .. } =
            Parser::with_options("SET SCHEMA app", ParserOptions::for_dialect(&Db2Dialect))
                .parse_statement()
                .unwrap()
        else {
            panic!("expected SET SCHEMA");
        };
        assert!(matches!(target, SchemaTarget::Name(ref ident) if ident.value == "APP"));
    }

    #[test]
    fn test_lock_table() {
        assert!(matches!(
            parse("LOCK TABLE t IN EXCLUSIVE MODE"),
            Statement::LockTable { mode: LockMode::Exclusive, .. }
        ));
        assert!(Parser::new("LOCK TABLE t IN ROW MODE").parse_statement().is_err());
    }
}
