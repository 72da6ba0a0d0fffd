//! SQL data type definitions.

use core::fmt;

/// Largest DECIMAL precision accepted.
pub const MAX_DECIMAL_PRECISION: u8 = 31;
/// Longest CHAR accepted.
pub const MAX_CHAR_LENGTH: u32 = 254;
/// Longest VARCHAR accepted.
pub const MAX_VARCHAR_LENGTH: u32 = 32_672;

/// SQL data types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    // Integer types
    /// Small integer (2 bytes).
    Smallint { unsigned: bool },
    /// Integer (4 bytes).
    Integer { unsigned: bool },
    /// Big integer (8 bytes).
    Bigint { unsigned: bool },
    /// MySQL TINYINT.
    Tinyint { unsigned: bool },
    /// MySQL MEDIUMINT.
    Mediumint { unsigned: bool },

    // Floating point
    /// Real (4-byte float).
    Real,
    /// Double precision (8-byte float).
    Double,
    /// FLOAT with optional binary precision.
    Float(Option<u32>),
    /// Decimal with precision and scale.
    Decimal {
        /// Total number of digits.
        precision: Option<u8>,
        /// Number of digits after decimal point.
        scale: Option<u8>,
    },
    /// Numeric (alias for Decimal).
    Numeric {
        /// Total number of digits.
        precision: Option<u8>,
        /// Number of digits after decimal point.
        scale: Option<u8>,
    },

    // String types
    /// Fixed-length character string.
    Char(Option<u32>),
    /// Variable-length character string.
    Varchar(u32),
    /// LONG VARCHAR.
    LongVarchar,
    /// Character large object.
    Clob,
    /// MySQL TEXT family.
    Text,
    Tinytext,
    Mediumtext,
    Longtext,

    // Binary types
    /// Binary large object.
    Blob,

    // Date/time types
    /// Date.
    Date,
    /// Time.
    Time,
    /// Timestamp.
    Timestamp,
    /// MySQL DATETIME.
    Datetime,

    // Other
    /// Boolean.
    Boolean,
    /// XML document.
    Xml,
}

impl DataType {
    /// Returns the SQL representation of the data type.
    #[must_use]
    pub fn to_sql(&self) -> String {
        let unsigned_suffix = |name: &str, unsigned: bool| {
            if unsigned {
                format!("{name} UNSIGNED")
            } else {
                name.to_string()
            }
        };
        let exact = |name: &str, precision: Option<u8>, scale: Option<u8>| match (precision, scale)
        {
            (Some(p), Some(s)) => format!("{name}({p}, {s})"),
            (Some(p), None) => format!("{name}({p})"),
            _ => name.to_string(),
        };
        match self {
            Self::Smallint { unsigned } => unsigned_suffix("SMALLINT", *unsigned),
            Self::Integer { unsigned } => unsigned_suffix("INTEGER", *unsigned),
            Self::Bigint { unsigned } => unsigned_suffix("BIGINT", *unsigned),
            Self::Tinyint { unsigned } => unsigned_suffix("TINYINT", *unsigned),
            Self::Mediumint { unsigned } => unsigned_suffix("MEDIUMINT", *unsigned),
            Self::Real => String::from("REAL"),
            Self::Double => String::from("DOUBLE"),
            Self::Float(Some(p)) => format!("FLOAT({p})"),
            Self::Float(None) => String::from("FLOAT"),
            Self::Decimal { precision, scale } => exact("DECIMAL", *precision, *scale),
            Self::Numeric { precision, scale } => exact("NUMERIC", *precision, *scale),
            Self::Char(Some(len)) => format!("CHAR({len})"),
            Self::Char(None) => String::from("CHAR"),
            Self::Varchar(len) => format!("VARCHAR({len})"),
            Self::LongVarchar => String::from("LONG VARCHAR"),
            Self::Clob => String::from("CLOB"),
            Self::Text => String::from("TEXT"),
            Self::Tinytext => String::from("TINYTEXT"),
            Self::Mediumtext => String::from("MEDIUMTEXT"),
            Self::Longtext => String::from("LONGTEXT"),
            Self::Blob => String::from("BLOB"),
            Self::Date => String::from("DATE"),
            Self::Time => String::from("TIME"),
            Self::Timestamp => String::from("TIMESTAMP"),
            Self::Datetime => String::from("DATETIME"),
            Self::Boolean => String::from("BOOLEAN"),
            Self::Xml => String::from("XML"),
        }
    }

    /// Returns true for the integer types that accept `UNSIGNED`.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::Smallint { .. }
                | Self::Integer { .. }
                | Self::Bigint { .. }
                | Self::Tinyint { .. }
                | Self::Mediumint { .. }
        )
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_to_sql() {
        assert_eq!(DataType::Integer { unsigned: false }.to_sql(), "INTEGER");
        assert_eq!(
            DataType::Bigint { unsigned: true }.to_sql(),
            "BIGINT UNSIGNED"
        );
        assert_eq!(DataType::Varchar(255).to_sql(), "VARCHAR(255)");
        assert_eq!(
            DataType::Decimal {
                precision: Some(10),
                scale: Some(2)
            }
            .to_sql(),
            "DECIMAL(10, 2)"
        );
        assert_eq!(DataType::LongVarchar.to_string(), "LONG VARCHAR");
    }

    #[test]
    fn test_is_integer() {
        assert!(DataType::Tinyint { unsigned: false }.is_integer());
        assert!(!DataType::Double.is_integer());
    }
}
