//! Pratt binding powers for the arithmetic levels.
//!
//! Only the two arithmetic levels are driven by binding powers; comparison,
//! NOT, AND and OR are fixed grammar levels above them. Operators that belong
//! to a dialect extension are only returned when their feature is enabled.

use crate::ast::{BinaryOp, UnaryOp};
use crate::dialect::{Features, ParserOptions};
use crate::lexer::{Keyword, TokenKind};

/// Binding power of prefix `+`, `-` and `~`.
pub const PREFIX_BINDING_POWER: u8 = 5;

static INFIX_TOKENS: [TokenKind; 13] = [
    TokenKind::Plus,
    TokenKind::Minus,
    TokenKind::BitAnd,
    TokenKind::BitOr,
    TokenKind::BitXor,
    TokenKind::LeftShift,
    TokenKind::RightShift,
    TokenKind::Star,
    TokenKind::Slash,
    TokenKind::Concat,
    TokenKind::Keyword(Keyword::Div),
    TokenKind::Keyword(Keyword::Mod),
    TokenKind::Percent,
];

/// The infix arithmetic operators enabled under `options`.
pub fn infix_operators(options: &ParserOptions) -> impl Iterator<Item = &'static TokenKind> + '_ {
    INFIX_TOKENS
        .iter()
        .filter(move |kind| infix_binding_power(kind, options).is_some())
}

/// Returns `(left_bp, right_bp, op)` for an infix arithmetic operator.
///
/// - Higher binding power = binds tighter
/// - Left associative: left_bp < right_bp
///
/// Returns `None` if the token is not an infix arithmetic operator under
/// `options`.
#[must_use]
pub const fn infix_binding_power(
    kind: &TokenKind,
    options: &ParserOptions,
) -> Option<(u8, u8, BinaryOp)> {
    let bit_ops = options.has_feature(Features::BIT_OPERATORS);
    match kind {
        // Additive
        TokenKind::Plus => Some((1, 2, BinaryOp::Add)),
        TokenKind::Minus => Some((1, 2, BinaryOp::Sub)),
        TokenKind::BitAnd if bit_ops => Some((1, 2, BinaryOp::BitAnd)),
        TokenKind::BitOr if bit_ops => Some((1, 2, BinaryOp::BitOr)),
        TokenKind::BitXor if bit_ops => Some((1, 2, BinaryOp::BitXor)),
        TokenKind::LeftShift if bit_ops => Some((1, 2, BinaryOp::LeftShift)),
        TokenKind::RightShift if bit_ops => Some((1, 2, BinaryOp::RightShift)),

        // Multiplicative (string concat binds like multiplication)
        TokenKind::Star => Some((3, 4, BinaryOp::Mul)),
        TokenKind::Slash => Some((3, 4, BinaryOp::Div)),
        TokenKind::Concat => Some((3, 4, BinaryOp::Concat)),
        TokenKind::Keyword(Keyword::Div) if options.has_feature(Features::DIV_OPERATOR) => {
            Some((3, 4, BinaryOp::IntDiv))
        }
        TokenKind::Keyword(Keyword::Mod) | TokenKind::Percent
            if options.has_feature(Features::MOD_OPERATOR) =>
        {
            Some((3, 4, BinaryOp::Mod))
        }

        _ => None,
    }
}

/// Converts a token to a prefix arithmetic operator.
#[must_use]
pub const fn prefix_operator(kind: &TokenKind, options: &ParserOptions) -> Option<UnaryOp> {
    match kind {
        TokenKind::Plus => Some(UnaryOp::Plus),
        TokenKind::Minus => Some(UnaryOp::Neg),
        TokenKind::BitNot if options.has_feature(Features::BIT_OPERATORS) => {
            Some(UnaryOp::BitNot)
        }
        _ => None,
    }
}

/// Converts a token to a comparison operator.
#[must_use]
pub const fn comparison_operator(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Eq => Some(BinaryOp::Eq),
        TokenKind::NotEq => Some(BinaryOp::NotEq),
        TokenKind::Lt => Some(BinaryOp::Lt),
        TokenKind::LtEq => Some(BinaryOp::LtEq),
        TokenKind::Gt => Some(BinaryOp::Gt),
        TokenKind::GtEq => Some(BinaryOp::GtEq),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::MySqlDialect;

    fn bp(kind: &TokenKind) -> (u8, u8, BinaryOp) {
        infix_binding_power(kind, &ParserOptions::for_dialect(&MySqlDialect)).unwrap()
    }

    #[test]
    fn test_precedence_ordering() {
        // Multiplication should bind tighter than addition
        let add_bp = bp(&TokenKind::Plus);
        let mul_bp = bp(&TokenKind::Star);
        assert!(mul_bp.0 > add_bp.0);

        // Concat and MOD sit with multiplication, bit operators with addition
        assert_eq!(bp(&TokenKind::Concat).0, mul_bp.0);
        assert_eq!(bp(&TokenKind::Keyword(Keyword::Mod)).0, mul_bp.0);
        assert_eq!(bp(&TokenKind::BitOr).0, add_bp.0);

        // Prefix operators bind tighter than any infix operator
        assert!(PREFIX_BINDING_POWER > mul_bp.1);
    }

    #[test]
    fn test_left_associativity() {
        // Binary operators should be left-associative
        let (left, right, _) = bp(&TokenKind::Plus);
        assert!(left < right);
    }

    #[test]
    fn test_gated_operators() {
        let generic = ParserOptions::default();
        assert!(infix_binding_power(&TokenKind::Keyword(Keyword::Div), &generic).is_none());
        assert!(infix_binding_power(&TokenKind::Percent, &generic).is_none());
        assert!(infix_binding_power(&TokenKind::BitAnd, &generic).is_none());
        assert_eq!(
            bp(&TokenKind::Keyword(Keyword::Div)).2,
            BinaryOp::IntDiv
        );
        assert_eq!(prefix_operator(&TokenKind::BitNot, &generic), None);
    }

    #[test]
    fn test_enabled_infix_operators() {
        let generic: Vec<_> = infix_operators(&ParserOptions::default()).collect();
        assert!(generic.contains(&&TokenKind::Plus));
        assert!(generic.contains(&&TokenKind::Concat));
        assert!(!generic.contains(&&TokenKind::Keyword(Keyword::Div)));
        assert_eq!(
            infix_operators(&ParserOptions::for_dialect(&MySqlDialect)).count(),
            INFIX_TOKENS.len()
        );
    }

    #[test]
    fn test_token_to_operator() {
        let generic = ParserOptions::default();
        assert_eq!(prefix_operator(&TokenKind::Minus, &generic), Some(UnaryOp::Neg));
        assert_eq!(prefix_operator(&TokenKind::Plus, &generic), Some(UnaryOp::Plus));
        assert_eq!(comparison_operator(&TokenKind::GtEq), Some(BinaryOp::GtEq));
        assert_eq!(comparison_operator(&TokenKind::LeftParen), None);
    }
}
