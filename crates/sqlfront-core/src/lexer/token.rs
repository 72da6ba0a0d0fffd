//! Token types for the SQL lexer.

use core::fmt;

use super::Span;

/// Declares the keyword table.
///
/// Reserved keywords can never be used as bare identifiers. Non-reserved
/// keywords only act as keywords in the positions that ask for them and are
/// ordinary identifiers everywhere else.
macro_rules! keywords {
    (
        reserved { $($r:ident => $rt:literal),* $(,)? }
        non_reserved { $($n:ident => $nt:literal),* $(,)? }
    ) => {
        /// SQL keywords.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Keyword {
            $($r,)*
            $($n,)*
        }

        impl Keyword {
            /// Attempts to parse a keyword from a string (case-insensitive).
            #[must_use]
            #[allow(clippy::should_implement_trait)]
            pub fn from_str(s: &str) -> Option<Self> {
                match s.to_ascii_uppercase().as_str() {
                    $($rt => Some(Self::$r),)*
                    $($nt => Some(Self::$n),)*
                    _ => None,
                }
            }

            /// Returns the keyword as a string.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$r => $rt,)*
                    $(Self::$n => $nt,)*
                }
            }

            /// Returns true if the keyword can never be an identifier.
            #[must_use]
            pub const fn is_reserved(&self) -> bool {
                matches!(*self, $(Self::$r)|*)
            }
        }
    };
}

keywords! {
    reserved {
        All => "ALL",
        Alter => "ALTER",
        And => "AND",
        Any => "ANY",
        As => "AS",
        Between => "BETWEEN",
        Both => "BOTH",
        By => "BY",
        Case => "CASE",
        Cast => "CAST",
        Check => "CHECK",
        Constraint => "CONSTRAINT",
        Create => "CREATE",
        Cross => "CROSS",
        Current => "CURRENT",
        CurrentDate => "CURRENT_DATE",
        CurrentTime => "CURRENT_TIME",
        CurrentTimestamp => "CURRENT_TIMESTAMP",
        CurrentUser => "CURRENT_USER",
        Default => "DEFAULT",
        Delete => "DELETE",
        Distinct => "DISTINCT",
        Drop => "DROP",
        Else => "ELSE",
        End => "END",
        Escape => "ESCAPE",
        Except => "EXCEPT",
        Exists => "EXISTS",
        False => "FALSE",
        Fetch => "FETCH",
        For => "FOR",
        Foreign => "FOREIGN",
        From => "FROM",
        Full => "FULL",
        Group => "GROUP",
        Having => "HAVING",
        In => "IN",
        Inner => "INNER",
        Insert => "INSERT",
        Intersect => "INTERSECT",
        Into => "INTO",
        Is => "IS",
        Join => "JOIN",
        Leading => "LEADING",
        Left => "LEFT",
        Like => "LIKE",
        Natural => "NATURAL",
        Not => "NOT",
        Null => "NULL",
        On => "ON",
        Or => "OR",
        Order => "ORDER",
        Outer => "OUTER",
        Primary => "PRIMARY",
        References => "REFERENCES",
        Right => "RIGHT",
        Select => "SELECT",
        Set => "SET",
        Some => "SOME",
        Table => "TABLE",
        Then => "THEN",
        Trailing => "TRAILING",
        True => "TRUE",
        Union => "UNION",
        Unique => "UNIQUE",
        Update => "UPDATE",
        Using => "USING",
        Values => "VALUES",
        When => "WHEN",
        Where => "WHERE",
        With => "WITH",
    }
    non_reserved {
        Action => "ACTION",
        Add => "ADD",
        Always => "ALWAYS",
        Asc => "ASC",
        Avg => "AVG",
        Bigint => "BIGINT",
        Blob => "BLOB",
        Boolean => "BOOLEAN",
        Cascade => "CASCADE",
        Char => "CHAR",
        Character => "CHARACTER",
        Clob => "CLOB",
        Column => "COLUMN",
        Commit => "COMMIT",
        Committed => "COMMITTED",
        Content => "CONTENT",
        Count => "COUNT",
        Cs => "CS",
        Data => "DATA",
        Date => "DATE",
        Datetime => "DATETIME",
        Day => "DAY",
        Dec => "DEC",
        Decimal => "DECIMAL",
        Desc => "DESC",
        Div => "DIV",
        Document => "DOCUMENT",
        Double => "DOUBLE",
        Exclusive => "EXCLUSIVE",
        Extract => "EXTRACT",
        First => "FIRST",
        Float => "FLOAT",
        Following => "FOLLOWING",
        Force => "FORCE",
        Generated => "GENERATED",
        Hour => "HOUR",
        Identity => "IDENTITY",
        Ignore => "IGNORE",
        Index => "INDEX",
        Int => "INT",
        Integer => "INTEGER",
        Interval => "INTERVAL",
        Isolation => "ISOLATION",
        Key => "KEY",
        Last => "LAST",
        Level => "LEVEL",
        Limit => "LIMIT",
        Lock => "LOCK",
        Long => "LONG",
        Longtext => "LONGTEXT",
        Ltrim => "LTRIM",
        Max => "MAX",
        Mediumint => "MEDIUMINT",
        Mediumtext => "MEDIUMTEXT",
        Microsecond => "MICROSECOND",
        Min => "MIN",
        Minute => "MINUTE",
        Mod => "MOD",
        Mode => "MODE",
        Month => "MONTH",
        Next => "NEXT",
        No => "NO",
        Nulls => "NULLS",
        Numeric => "NUMERIC",
        Of => "OF",
        Offset => "OFFSET",
        Only => "ONLY",
        Over => "OVER",
        Partition => "PARTITION",
        Passing => "PASSING",
        Preceding => "PRECEDING",
        Precision => "PRECISION",
        Preserve => "PRESERVE",
        Quarter => "QUARTER",
        Range => "RANGE",
        Read => "READ",
        Real => "REAL",
        Ref => "REF",
        Release => "RELEASE",
        Repeatable => "REPEATABLE",
        Restrict => "RESTRICT",
        Rollback => "ROLLBACK",
        Rollup => "ROLLUP",
        Row => "ROW",
        Rows => "ROWS",
        Rr => "RR",
        Rs => "RS",
        Rtrim => "RTRIM",
        Savepoint => "SAVEPOINT",
        Schema => "SCHEMA",
        Second => "SECOND",
        Serializable => "SERIALIZABLE",
        Share => "SHARE",
        Smallint => "SMALLINT",
        StraightJoin => "STRAIGHT_JOIN",
        Strip => "STRIP",
        Substring => "SUBSTRING",
        Sum => "SUM",
        Text => "TEXT",
        Time => "TIME",
        Timestamp => "TIMESTAMP",
        Tinyint => "TINYINT",
        Tinytext => "TINYTEXT",
        To => "TO",
        Trim => "TRIM",
        Unbounded => "UNBOUNDED",
        Uncommitted => "UNCOMMITTED",
        Unsigned => "UNSIGNED",
        Ur => "UR",
        Use => "USE",
        Value => "VALUE",
        Varchar => "VARCHAR",
        Varying => "VARYING",
        View => "VIEW",
        Week => "WEEK",
        Whitespace => "WHITESPACE",
        Window => "WINDOW",
        Work => "WORK",
        Xml => "XML",
        Xmlexists => "XMLEXISTS",
        Xmlparse => "XMLPARSE",
        Xmlserialize => "XMLSERIALIZE",
        Year => "YEAR",
    }
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    /// Exact numeric literal, raw text (e.g. `42`, `3.50`, `.5`).
    ExactNumber(String),
    /// Approximate numeric literal with an exponent, raw text (e.g. `1e10`).
    ApproxNumber(String),
    /// String literal with quotes removed and `''` unescaped.
    String(String),
    /// Hex string literal (e.g. `X'CAFE'`).
    HexString(Vec<u8>),

    // Identifiers and keywords
    /// Regular identifier, as written.
    Identifier(String),
    /// Delimited identifier (`"name"`, or `` `name` `` when enabled).
    QuotedIdentifier(String),
    /// SQL keyword
    Keyword(Keyword),

    // Operators
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// =
    Eq,
    /// != or <>
    NotEq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,
    /// ||
    Concat,
    /// &
    BitAnd,
    /// |
    BitOr,
    /// ^
    BitXor,
    /// ~
    BitNot,
    /// <<
    LeftShift,
    /// >>
    RightShift,

    // Delimiters
    /// (
    LeftParen,
    /// )
    RightParen,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// .
    Dot,
    /// :
    Colon,
    /// ?
    Question,
    /// `$n` positional parameter.
    Parameter(u32),

    // Special
    /// End of input
    Eof,
    /// Input the lexer could not classify.
    Error(String),
}

impl TokenKind {
    /// Returns true if this kind is the same variant as `other`, ignoring payloads.
    #[must_use]
    pub fn same_variant(&self, other: &Self) -> bool {
        core::mem::discriminant(self) == core::mem::discriminant(other)
    }

    /// Short description used in diagnostics, e.g. `"("` or `identifier`.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::ExactNumber(_) | Self::ApproxNumber(_) => "number",
            Self::String(_) => "string",
            Self::HexString(_) => "hex string",
            Self::Identifier(_) | Self::QuotedIdentifier(_) => "identifier",
            Self::Keyword(kw) => kw.as_str(),
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Concat => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::BitNot => "~",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Dot => ".",
            Self::Colon => ":",
            Self::Question => "?",
            Self::Parameter(_) => "parameter",
            Self::Eof => "end of input",
            Self::Error(_) => "invalid token",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExactNumber(text) | Self::ApproxNumber(text) => write!(f, "number {text}"),
            Self::String(s) => write!(f, "string '{s}'"),
            Self::Identifier(name) => write!(f, "identifier {name}"),
            Self::QuotedIdentifier(name) => write!(f, "identifier \"{name}\""),
            Self::Keyword(kw) => write!(f, "keyword {}", kw.as_str()),
            Self::Parameter(n) => write!(f, "parameter ${n}"),
            Self::Error(message) => f.write_str(message),
            Self::Eof => f.write_str("end of input"),
            other => write!(f, "'{}'", other.describe()),
        }
    }
}

/// A token with its span in the source code.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The location in the source code.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns true if this is a keyword.
    #[must_use]
    pub const fn is_keyword(&self) -> bool {
        matches!(self.kind, TokenKind::Keyword(_))
    }

    /// Returns the keyword if this is a keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }

    /// Returns true for delimited identifiers, which are never case folded.
    #[must_use]
    pub const fn is_delimited_identifier(&self) -> bool {
        matches!(self.kind, TokenKind::QuotedIdentifier(_))
    }
}
