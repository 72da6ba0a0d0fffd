//! DB2-flavoured dialect.

use super::{CaseFolding, Dialect, Features};

/// DB2-style SQL: upper-case identifier folding and the trailing isolation
/// clause (`WITH RR`, `WITH CS`, ...).
#[derive(Debug, Default, Clone, Copy)]
pub struct Db2Dialect;

impl Db2Dialect {
    /// Creates a new DB2 dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for Db2Dialect {
    fn name(&self) -> &'static str {
        "db2"
    }

    fn features(&self) -> Features {
        Features::WINDOW_FUNCTIONS | Features::DB2_ISOLATION_CLAUSE
    }

    fn case_folding(&self) -> CaseFolding {
        CaseFolding::Upper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db2_dialect() {
        let dialect = Db2Dialect::new();
        assert_eq!(dialect.name(), "db2");
        assert_eq!(dialect.case_folding(), CaseFolding::Upper);
        assert!(dialect.features().contains(Features::DB2_ISOLATION_CLAUSE));
        assert!(!dialect.features().contains(Features::DIV_OPERATOR));
    }
}
