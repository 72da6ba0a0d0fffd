//! Generic SQL dialect.

use super::{Dialect, Features};

/// Standard SQL: window functions, no vendor extensions.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericDialect;

impl GenericDialect {
    /// Creates a new generic dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for GenericDialect {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn features(&self) -> Features {
        Features::WINDOW_FUNCTIONS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::CaseFolding;

    #[test]
    fn test_generic_dialect() {
        let dialect = GenericDialect::new();
        assert_eq!(dialect.name(), "generic");
        assert_eq!(dialect.identifier_quote(), '"');
        assert_eq!(dialect.case_folding(), CaseFolding::Preserve);
        assert!(dialect.features().contains(Features::WINDOW_FUNCTIONS));
        assert!(!dialect.features().contains(Features::LIMIT_CLAUSE));
    }
}
