//! SQL Parser
//!
//! A hand-written recursive descent parser over a lazily filled token
//! window. Arithmetic levels use Pratt binding powers; ambiguous points in
//! the grammar are resolved by bounded or unbounded trial parses whose
//! verdicts are cached per statement.

mod control;
mod cursor;
mod ddl;
mod dml;
mod error;
mod expr;
mod lookahead;
mod parser;
mod pratt;
mod predicates;
mod query;

pub use cursor::{Checkpoint, TokenCursor};
pub use error::{Expected, ParseError, ParseErrorKind, Result};
pub use lookahead::{Lookahead, ParenScan};
pub use parser::{ParsedStatement, Parser};
