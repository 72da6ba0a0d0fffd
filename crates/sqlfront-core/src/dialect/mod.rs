//! SQL dialect support.
//!
//! Dialects differ in which nonstandard productions they accept. Every such
//! production is guarded by a named [`Features`] flag; the grammar asks
//! [`ParserOptions::has_feature`] each time it reaches one. A [`Dialect`] is a
//! named preset of flags and naming rules.

mod db2;
mod generic;
mod mysql;
mod options;

pub use db2::Db2Dialect;
pub use generic::GenericDialect;
pub use mysql::MySqlDialect;
pub use options::{CaseFolding, ConfigError, ParserOptions, DEFAULT_MAX_IDENTIFIER_LENGTH};

use bitflags::bitflags;

bitflags! {
    /// Nonstandard grammar extensions that can be switched on per parse.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Features: u32 {
        /// `a DIV b` integer division.
        const DIV_OPERATOR = 1 << 0;
        /// Infix `a MOD b` and `a % b`.
        const MOD_OPERATOR = 1 << 1;
        /// Infix `& | ^ << >>` and unary `~`.
        const BIT_OPERATORS = 1 << 2;
        /// `INT UNSIGNED` and friends.
        const UNSIGNED = 1 << 3;
        /// `USE INDEX (..)`, `IGNORE INDEX (..)`, `FORCE INDEX (..)`.
        const INDEX_HINTS = 1 << 4;
        /// `a STRAIGHT_JOIN b`.
        const STRAIGHT_JOIN = 1 << 5;
        /// `INTERVAL expr unit` with MySQL units.
        const MYSQL_INTERVAL_UNITS = 1 << 6;
        /// `OVER (...)` window functions and the `WINDOW` clause.
        const WINDOW_FUNCTIONS = 1 << 7;
        /// `name()` parses as a column reference instead of a call.
        const EMPTY_PARENS_COLUMN = 1 << 8;
        /// `LIMIT n [OFFSET m]` and `LIMIT m, n`.
        const LIMIT_CLAUSE = 1 << 9;
        /// `` `quoted` `` identifiers.
        const BACKTICK_IDENTIFIERS = 1 << 10;
        /// `TINYINT`, `MEDIUMINT`, `TINYTEXT`, `DATETIME` and other MySQL types.
        const MYSQL_DATATYPES = 1 << 11;
        /// Trailing `WITH {RR|RS|CS|UR}` isolation clause on queries.
        const DB2_ISOLATION_CLAUSE = 1 << 12;
    }
}

impl Default for Features {
    fn default() -> Self {
        Self::empty()
    }
}

impl serde::Serialize for Features {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        bitflags::serde::serialize(self, serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Features {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        bitflags::serde::deserialize(deserializer)
    }
}

/// Trait for SQL dialect-specific behavior.
pub trait Dialect {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Grammar extensions enabled by this dialect.
    fn features(&self) -> Features {
        Features::WINDOW_FUNCTIONS
    }

    /// How unquoted identifiers are normalized.
    fn case_folding(&self) -> CaseFolding {
        CaseFolding::Preserve
    }

    /// Longest identifier accepted, in characters.
    fn max_identifier_length(&self) -> usize {
        DEFAULT_MAX_IDENTIFIER_LENGTH
    }

    /// Returns the identifier quote character (e.g., `"` for standard SQL, `` ` `` for MySQL).
    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Quotes an identifier for output.
    fn quote_identifier(&self, name: &str) -> String {
        let quote = self.identifier_quote();
        let escaped = name.replace(quote, &format!("{quote}{quote}"));
        format!("{quote}{escaped}{quote}")
    }
}
