//! MySQL dialect.

use super::{Dialect, Features};

/// MySQL-style SQL with every MySQL extension switched on.
#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlDialect;

impl MySqlDialect {
    /// Creates a new MySQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn features(&self) -> Features {
        Features::DIV_OPERATOR
            | Features::MOD_OPERATOR
            | Features::BIT_OPERATORS
            | Features::UNSIGNED
            | Features::INDEX_HINTS
            | Features::STRAIGHT_JOIN
            | Features::MYSQL_INTERVAL_UNITS
            | Features::WINDOW_FUNCTIONS
            | Features::LIMIT_CLAUSE
            | Features::BACKTICK_IDENTIFIERS
            | Features::MYSQL_DATATYPES
    }

    fn identifier_quote(&self) -> char {
        '`'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mysql_dialect() {
        let dialect = MySqlDialect::new();
        assert_eq!(dialect.name(), "mysql");
        assert_eq!(dialect.identifier_quote(), '`');
        assert!(dialect.features().contains(Features::STRAIGHT_JOIN));
        assert!(!dialect.features().contains(Features::EMPTY_PARENS_COLUMN));
        assert!(!dialect.features().contains(Features::DB2_ISOLATION_CLAUSE));
    }
}
