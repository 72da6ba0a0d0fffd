//! Per-parse configuration.

use serde::{Deserialize, Serialize};

use super::{Dialect, Features, GenericDialect};

/// Longest identifier accepted unless configured otherwise.
pub const DEFAULT_MAX_IDENTIFIER_LENGTH: usize = 128;

/// How unquoted identifiers are normalized. Delimited identifiers are never
/// folded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseFolding {
    /// Keep identifiers exactly as written.
    #[default]
    Preserve,
    /// Fold to upper case (DB2 and the SQL standard).
    Upper,
    /// Fold to lower case.
    Lower,
}

impl CaseFolding {
    /// Applies the folding rule to an unquoted identifier.
    #[must_use]
    pub fn apply(self, name: &str) -> String {
        match self {
            Self::Preserve => name.to_string(),
            Self::Upper => name.to_uppercase(),
            Self::Lower => name.to_lowercase(),
        }
    }
}

/// Errors raised while loading parser configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration document is not valid JSON for [`ParserOptions`].
    #[error("invalid parser configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// The identifier length limit must allow at least one character.
    #[error("max_identifier_length must be at least 1")]
    ZeroIdentifierLength,
}

/// Parser context: the read-only settings a parse runs with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Enabled dialect extensions.
    pub features: Features,
    /// Normalization applied to unquoted identifiers.
    pub case_folding: CaseFolding,
    /// Longest identifier accepted, in characters.
    pub max_identifier_length: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self::for_dialect(&GenericDialect)
    }
}

impl ParserOptions {
    /// Builds options from a dialect preset.
    #[must_use]
    pub fn for_dialect<D: Dialect + ?Sized>(dialect: &D) -> Self {
        Self {
            features: dialect.features(),
            case_folding: dialect.case_folding(),
            max_identifier_length: dialect.max_identifier_length(),
        }
    }

    /// Parses options from a JSON document such as
    /// `{"features": "DIV_OPERATOR | LIMIT_CLAUSE", "case_folding": "upper"}`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the document is malformed or out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(json)?;
        if options.max_identifier_length == 0 {
            return Err(ConfigError::ZeroIdentifierLength);
        }
        Ok(options)
    }

    /// Returns a copy with `feature` switched on.
    #[must_use]
    pub fn with_feature(mut self, feature: Features) -> Self {
        self.features.insert(feature);
        self
    }

    /// Returns a copy with `feature` switched off.
    #[must_use]
    pub fn without_feature(mut self, feature: Features) -> Self {
        self.features.remove(feature);
        self
    }

    /// Returns a copy with a different folding rule.
    #[must_use]
    pub const fn with_case_folding(mut self, case_folding: CaseFolding) -> Self {
        self.case_folding = case_folding;
        self
    }

    /// The feature gate: is the extension `feature` enabled for this parse?
    #[must_use]
    pub const fn has_feature(&self, feature: Features) -> bool {
        self.features.contains(feature)
    }
}
