//! Identifiers and qualified names.
//!
//! Names refer to schema objects by text only; they are resolved by a later
//! binding phase.

use crate::lexer::Span;

/// A single identifier, already case folded unless it was delimited.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    /// The identifier text.
    pub value: String,
    /// Whether it was written as a delimited identifier.
    pub quoted: bool,
    /// Source span.
    pub span: Span,
}

impl Ident {
    /// Creates an unquoted identifier.
    #[must_use]
    pub fn new(value: impl Into<String>, span: Span) -> Self {
        Self {
            value: value.into(),
            quoted: false,
            span,
        }
    }

    /// Creates a delimited identifier.
    #[must_use]
    pub fn quoted(value: impl Into<String>, span: Span) -> Self {
        Self {
            value: value.into(),
            quoted: true,
            span,
        }
    }
}

impl PartialEq<str> for Ident {
    fn eq(&self, other: &str) -> bool {
        self.value == other
    }
}

impl PartialEq<&str> for Ident {
    fn eq(&self, other: &&str) -> bool {
        self.value == *other
    }
}

/// A possibly qualified name such as `schema.table`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectName(pub Vec<Ident>);

impl ObjectName {
    /// The unqualified last part.
    #[must_use]
    pub fn base(&self) -> Option<&Ident> {
        self.0.last()
    }

    /// The qualifier parts before the last one.
    #[must_use]
    pub fn qualifier(&self) -> &[Ident] {
        match self.0.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }

    /// Span from the first to the last part.
    #[must_use]
    pub fn span(&self) -> Span {
        match (self.0.first(), self.0.last()) {
            (Some(first), Some(last)) => first.span.to(last.span),
            _ => Span::default(),
        }
    }

    /// The parts joined with `.`, without quoting.
    #[must_use]
    pub fn dotted(&self) -> String {
        self.0
            .iter()
            .map(|part| part.value.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl From<Ident> for ObjectName {
    fn from(ident: Ident) -> Self {
        Self(vec![ident])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_name_parts() {
        let name = ObjectName(vec![
            Ident::new("app", Span::new(0, 3)),
            Ident::quoted("Users", Span::new(4, 11)),
        ]);
        assert_eq!(name.base().map(|i| i.value.as_str()), Some("Users"));
        assert_eq!(name.qualifier().len(), 1);
        assert_eq!(name.span(), Span::new(0, 11));
        assert_eq!(name.dotted(), "app.Users");
        assert!(name.0[0] == "app");
    }
}
