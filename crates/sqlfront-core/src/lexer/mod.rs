//! SQL Lexer/Tokenizer
//!
//! A hand-written, pull-based lexer producing classified tokens with byte
//! spans. The parsing core only asks it for the next token.

mod span;
mod token;
mod tokenizer;

pub use span::Span;
pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::Lexer;
