//! Expression grammar.
//!
//! Logical levels (OR, AND, NOT) and the predicate level are plain recursive
//! descent; the two arithmetic levels are a Pratt loop over the binding
//! powers in `pratt.rs`.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::error::{Expected, ParseError, Result};
use super::lookahead::{Alternative, Lookahead, NoMatch, ParenScan, Probe};
use super::parser::Parser;
use super::pratt::{
    comparison_operator, infix_binding_power, infix_operators, prefix_operator,
    PREFIX_BINDING_POWER,
};
use super::predicates::{
    aggregate_follows, is_identifier_token, row_value_constructor_list_follows, subquery_follows,
    typed_literal_follows, window_function_follows,
};
use crate::ast::{
    AggregateFunc, BinaryOp, DateTimeField, Expr, FrameBound, FrameUnits, FunctionCall, Literal,
    NodeFactory, ObjectName, Quantifier, Query, SpecialRegister, TrimSpec, TypedLiteralKind,
    UnaryOp, WindowFrame, WindowRef, WindowSpec, MAX_DECIMAL_PRECISION,
};
use crate::dialect::Features;
use crate::lexer::{Keyword, Span, TokenKind};

fn subquery_trial(probe: &mut Probe<'_, '_>) -> core::result::Result<(), NoMatch> {
    if probe.test(subquery_follows) {
        Ok(())
    } else {
        Err(NoMatch)
    }
}

fn row_constructor_trial(probe: &mut Probe<'_, '_>) -> core::result::Result<(), NoMatch> {
    if probe.test(row_value_constructor_list_follows) {
        Ok(())
    } else {
        Err(NoMatch)
    }
}

fn nested_expression_trial(probe: &mut Probe<'_, '_>) -> core::result::Result<(), NoMatch> {
    match probe.scan_parenthesized() {
        ParenScan::Scalar => Ok(()),
        _ => Err(NoMatch),
    }
}

/// Converts the text of an exact numeric literal to the narrowest literal
/// that holds it. Values with more digits than `Decimal` keeps are carried
/// as text, up to the widest DECIMAL column.
fn exact_number(text: &str, span: Span) -> Result<Literal> {
    if !text.contains('.') {
        if let Ok(n) = text.parse::<i32>() {
            return Ok(Literal::Int(n));
        }
        if let Ok(n) = text.parse::<i64>() {
            return Ok(Literal::BigInt(n));
        }
    }
    let (sign, digits) = text
        .strip_prefix('-')
        .map_or(("", text), |rest| ("-", rest));
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    let scale = fraction.len();
    if whole.trim_start_matches('0').len() + scale > usize::from(MAX_DECIMAL_PRECISION) {
        return Err(ParseError::semantic("numeric literal out of range", span));
    }

    let mut normalized = String::with_capacity(digits.len() + 2);
    normalized.push_str(sign);
    if whole.is_empty() {
        normalized.push('0');
    }
    normalized.push_str(digits);
    if digits.ends_with('.') {
        normalized.push('0');
    }
    // Decimal rounds away digits past its scale limit instead of failing.
    let written_scale = normalized.split_once('.').map_or(0, |(_, f)| f.len());
    match Decimal::from_str(&normalized) {
        Ok(value) if usize::try_from(value.scale()).is_ok_and(|s| s == written_scale) => {
            Ok(Literal::Decimal(value))
        }
        _ => Ok(Literal::WideDecimal(normalized)),
    }
}

fn approximate_number(text: &str, span: Span) -> Result<Literal> {
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Literal::Double(value)),
        _ => Err(ParseError::semantic("numeric literal out of range", span)),
    }
}

const fn datetime_field(keyword: Keyword) -> Option<DateTimeField> {
    match keyword {
        Keyword::Microsecond => Some(DateTimeField::Microsecond),
        Keyword::Second => Some(DateTimeField::Second),
        Keyword::Minute => Some(DateTimeField::Minute),
        Keyword::Hour => Some(DateTimeField::Hour),
        Keyword::Day => Some(DateTimeField::Day),
        Keyword::Week => Some(DateTimeField::Week),
        Keyword::Month => Some(DateTimeField::Month),
        Keyword::Quarter => Some(DateTimeField::Quarter),
        Keyword::Year => Some(DateTimeField::Year),
        _ => None,
    }
}

const fn aggregate_func(keyword: Keyword) -> Option<AggregateFunc> {
    match keyword {
        Keyword::Avg => Some(AggregateFunc::Avg),
        Keyword::Count => Some(AggregateFunc::Count),
        Keyword::Max => Some(AggregateFunc::Max),
        Keyword::Min => Some(AggregateFunc::Min),
        Keyword::Sum => Some(AggregateFunc::Sum),
        _ => None,
    }
}

impl<'a, F: NodeFactory> Parser<'a, F> {
    /// Parses an expression.
    pub(super) fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_or()
    }

    /// Parses an expression, or `DEFAULT` where a column default may stand
    /// in for a value.
    pub(super) fn parse_expr_or_default(&mut self) -> Result<Expr> {
        if self.check_keyword(Keyword::Default) {
            let span = self.cursor.advance().span;
            return Ok(self.build(Expr::Default { span }));
        }
        self.parse_expr()
    }

    /// Parses `expr {, expr}`.
    pub(super) fn parse_expr_list(&mut self) -> Result<Vec<Expr>> {
        let mut exprs = vec![self.parse_expr()?];
        while self.eat(&TokenKind::Comma) {
            exprs.push(self.parse_expr()?);
        }
        Ok(exprs)
    }

    /// Parses `( expr {, expr} )`.
    pub(super) fn parse_parenthesized_exprs(&mut self) -> Result<Vec<Expr>> {
        self.expect(&TokenKind::LeftParen)?;
        let exprs = self.parse_expr_list()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(exprs)
    }

    fn binary(&mut self, left: Expr, op: BinaryOp, right: Expr) -> Expr {
        let span = left.span().to(right.span());
        self.build(Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
            span,
        })
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut left = self.parse_and()?;
        while self.eat_keyword(Keyword::Or) {
            let right = self.parse_and()?;
            left = self.binary(left, BinaryOp::Or, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut left = self.parse_not()?;
        while self.eat_keyword(Keyword::And) {
            let right = self.parse_not()?;
            left = self.binary(left, BinaryOp::And, right);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr> {
        if self.check_keyword(Keyword::Not) {
            let start = self.cursor.advance().span;
            let operand = self.parse_not()?;
            let span = start.to(operand.span());
            return Ok(self.build(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
                span,
            }));
        }
        self.parse_predicate()
    }

    /// Comparison and the remaining predicates. At most one comparison
    /// operator applies; `a = b = c` is an error.
    fn parse_predicate(&mut self) -> Result<Expr> {
        let mut expr = self.parse_arithmetic(0)?;
        let mut compared = false;
        loop {
            if !compared {
                if let Some(op) = comparison_operator(self.peek_kind(1)) {
                    self.cursor.advance();
                    expr = self.parse_comparison(expr, op)?;
                    compared = true;
                    continue;
                }
                self.cursor.record(Expected::Production("comparison operator"));
            }

            let negated = matches!(self.peek_kind(1), TokenKind::Keyword(Keyword::Not))
                && matches!(
                    self.peek_kind(2),
                    TokenKind::Keyword(Keyword::In | Keyword::Like | Keyword::Between)
                );
            if negated {
                self.cursor.advance();
            }

            if self.eat_keyword(Keyword::In) {
                expr = self.parse_in(expr, negated)?;
            } else if self.eat_keyword(Keyword::Like) {
                expr = self.parse_like(expr, negated)?;
            } else if self.eat_keyword(Keyword::Between) {
                expr = self.parse_between(expr, negated)?;
            } else if self.eat_keyword(Keyword::Is) {
                expr = self.parse_is(expr)?;
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_comparison(&mut self, left: Expr, op: BinaryOp) -> Result<Expr> {
        let quantifier = match self.cursor.peek(1).as_keyword() {
            Some(Keyword::All) => Some(Quantifier::All),
            Some(Keyword::Any) => Some(Quantifier::Any),
            Some(Keyword::Some) => Some(Quantifier::Some),
            _ => None,
        };
        if let Some(quantifier) = quantifier {
            self.cursor.advance();
            let subquery = self.parse_parenthesized_query()?;
            let span = self.span_from(left.span());
            return Ok(self.build(Expr::Quantified {
                left: Box::new(left),
                op,
                quantifier,
                subquery: Box::new(subquery),
                span,
            }));
        }
        let right = self.parse_arithmetic(0)?;
        Ok(self.binary(left, op, right))
    }

    fn parse_in(&mut self, expr: Expr, negated: bool) -> Result<Expr> {
        if !self.check(&TokenKind::LeftParen) {
            return Err(self.cursor.unexpected());
        }
        if self.paren_shape() == ParenScan::Subquery {
            let subquery = self.parse_parenthesized_query()?;
            let span = self.span_from(expr.span());
            return Ok(self.build(Expr::InSubquery {
                expr: Box::new(expr),
                subquery: Box::new(subquery),
                negated,
                span,
            }));
        }
        let list = self.parse_parenthesized_exprs()?;
        let span = self.span_from(expr.span());
        Ok(self.build(Expr::InList {
            expr: Box::new(expr),
            list,
            negated,
            span,
        }))
    }

    fn parse_like(&mut self, expr: Expr, negated: bool) -> Result<Expr> {
        let pattern = self.parse_arithmetic(0)?;
        let escape = if self.eat_keyword(Keyword::Escape) {
            Some(Box::new(self.parse_arithmetic(0)?))
        } else {
            None
        };
        let span = self.span_from(expr.span());
        Ok(self.build(Expr::Like {
            expr: Box::new(expr),
            pattern: Box::new(pattern),
            escape,
            negated,
            span,
        }))
    }

    fn parse_between(&mut self, expr: Expr, negated: bool) -> Result<Expr> {
        let low = self.parse_arithmetic(0)?;
        self.expect_keyword(Keyword::And)?;
        let high = self.parse_arithmetic(0)?;
        let span = expr.span().to(high.span());
        Ok(self.build(Expr::Between {
            expr: Box::new(expr),
            low: Box::new(low),
            high: Box::new(high),
            negated,
            span,
        }))
    }

    fn parse_is(&mut self, expr: Expr) -> Result<Expr> {
        let negated = self.eat_keyword(Keyword::Not);
        let value = if self.eat_keyword(Keyword::Null) {
            None
        } else if self.eat_keyword(Keyword::True) {
            Some(true)
        } else if self.eat_keyword(Keyword::False) {
            Some(false)
        } else {
            return Err(self.cursor.unexpected());
        };
        let span = self.span_from(expr.span());
        let expr = Box::new(expr);
        Ok(self.build(match value {
            None => Expr::IsNull {
                expr,
                negated,
                span,
            },
            Some(value) => Expr::IsBool {
                expr,
                value,
                negated,
                span,
            },
        }))
    }

    /// Pratt loop over the arithmetic operators.
    pub(super) fn parse_arithmetic(&mut self, min_bp: u8) -> Result<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let Some((l_bp, r_bp, op)) =
                infix_binding_power(self.cursor.peek_kind(1), &self.options)
            else {
                for kind in infix_operators(&self.options) {
                    self.cursor.record(Expected::token(kind));
                }
                break;
            };
            if l_bp < min_bp {
                break;
            }
            self.cursor.advance();
            let right = self.parse_arithmetic(r_bp)?;
            left = self.binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        let Some(op) = prefix_operator(self.cursor.peek_kind(1), &self.options) else {
            return self.parse_primary();
        };

        // A sign directly before a number is part of the literal, so that
        // -2147483648 is one INTEGER value.
        if matches!(op, UnaryOp::Plus | UnaryOp::Neg)
            && matches!(
                self.peek_kind(2),
                TokenKind::ExactNumber(_) | TokenKind::ApproxNumber(_)
            )
        {
            let sign = self.cursor.advance().span;
            return self.parse_number(Some((op, sign)));
        }

        let start = self.cursor.advance().span;
        let operand = self.parse_arithmetic(PREFIX_BINDING_POWER)?;
        let span = start.to(operand.span());
        Ok(self.build(Expr::Unary {
            op,
            operand: Box::new(operand),
            span,
        }))
    }

    fn parse_number(&mut self, sign: Option<(UnaryOp, Span)>) -> Result<Expr> {
        let token = self.cursor.advance();
        let span = sign.map_or(token.span, |(_, at)| at.to(token.span));
        let negative = matches!(sign, Some((UnaryOp::Neg, _)));
        let value = match &token.kind {
            TokenKind::ExactNumber(text) if negative => exact_number(&format!("-{text}"), span)?,
            TokenKind::ExactNumber(text) => exact_number(text, span)?,
            TokenKind::ApproxNumber(text) if negative => {
                approximate_number(&format!("-{text}"), span)?
            }
            TokenKind::ApproxNumber(text) => approximate_number(text, span)?,
            other => {
                return Err(ParseError::unexpected(
                    vec![Expected::Token("number")],
                    other.clone(),
                    token.span,
                ))
            }
        };
        Ok(self.build(Expr::Literal { value, span }))
    }

    /// Parses an unsigned integer where only an integer is allowed.
    pub(super) fn parse_unsigned_integer(&mut self) -> Result<(u64, Span)> {
        let token = self.expect(&TokenKind::ExactNumber(String::new()))?;
        match &token.kind {
            TokenKind::ExactNumber(text) => text
                .parse::<u64>()
                .map(|n| (n, token.span))
                .map_err(|_| ParseError::semantic("expected an integer", token.span)),
            _ => Err(ParseError::semantic("expected an integer", token.span)),
        }
    }

    fn literal(&mut self, value: Literal) -> Expr {
        let span = self.cursor.advance().span;
        self.build(Expr::Literal { value, span })
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let kind = self.peek_kind(1).clone();
        match kind {
            TokenKind::ExactNumber(_) | TokenKind::ApproxNumber(_) => self.parse_number(None),
            TokenKind::String(value) => Ok(self.literal(Literal::String(value))),
            TokenKind::HexString(bytes) => Ok(self.literal(Literal::Hex(bytes))),
            TokenKind::Question | TokenKind::Parameter(_) => {
                let parameter = self.parse_parameter()?;
                Ok(self.build(Expr::Parameter(parameter)))
            }
            TokenKind::LeftParen => self.parse_parenthesized_primary(),
            TokenKind::Keyword(keyword) => self.parse_keyword_primary(keyword),
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_) => self.parse_name_primary(),
            _ => Err(self.expected("expression")),
        }
    }

    fn parse_parenthesized_primary(&mut self) -> Result<Expr> {
        self.speculate(
            "parenthesized primary",
            &[
                Alternative {
                    name: "subquery",
                    horizon: Lookahead::Unbounded,
                    trial: subquery_trial,
                    parse: Self::parse_scalar_subquery,
                },
                Alternative {
                    name: "row constructor",
                    horizon: Lookahead::Unbounded,
                    trial: row_constructor_trial,
                    parse: Self::parse_row_constructor,
                },
                Alternative {
                    name: "parenthesized expression",
                    horizon: Lookahead::Unbounded,
                    trial: nested_expression_trial,
                    parse: Self::parse_nested_expr,
                },
            ],
        )
    }

    /// Parses `( query )`.
    pub(super) fn parse_parenthesized_query(&mut self) -> Result<Query> {
        self.expect(&TokenKind::LeftParen)?;
        let query = self.parse_query()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(query)
    }

    fn parse_scalar_subquery(&mut self) -> Result<Expr> {
        let start = self.next_span();
        let query = self.parse_parenthesized_query()?;
        let span = self.span_from(start);
        Ok(self.build(Expr::Subquery {
            query: Box::new(query),
            span,
        }))
    }

    fn parse_row_constructor(&mut self) -> Result<Expr> {
        let start = self.next_span();
        let items = self.parse_parenthesized_exprs()?;
        let span = self.span_from(start);
        Ok(self.build(Expr::Row { items, span }))
    }

    fn parse_nested_expr(&mut self) -> Result<Expr> {
        let start = self.expect(&TokenKind::LeftParen)?.span;
        let expr = self.parse_expr()?;
        self.expect(&TokenKind::RightParen)?;
        let span = self.span_from(start);
        Ok(self.build(Expr::Nested {
            expr: Box::new(expr),
            span,
        }))
    }

    fn parse_keyword_primary(&mut self, keyword: Keyword) -> Result<Expr> {
        let call = matches!(self.peek_kind(2), TokenKind::LeftParen);
        match keyword {
            Keyword::True => Ok(self.literal(Literal::Boolean(true))),
            Keyword::False => Ok(self.literal(Literal::Boolean(false))),
            Keyword::Null => Ok(self.literal(Literal::Null)),
            Keyword::Date | Keyword::Time | Keyword::Timestamp
                if typed_literal_follows(&mut self.cursor, &self.options) =>
            {
                self.parse_typed_literal(keyword)
            }
            Keyword::Case => self.parse_case(),
            Keyword::Cast => self.parse_cast(),
            Keyword::Exists => {
                let start = self.cursor.advance().span;
                let subquery = self.parse_parenthesized_query()?;
                let span = self.span_from(start);
                Ok(self.build(Expr::Exists {
                    subquery: Box::new(subquery),
                    span,
                }))
            }
            Keyword::CurrentDate => Ok(self.special_register(SpecialRegister::CurrentDate)),
            Keyword::CurrentTime => Ok(self.special_register(SpecialRegister::CurrentTime)),
            Keyword::CurrentTimestamp => {
                Ok(self.special_register(SpecialRegister::CurrentTimestamp))
            }
            Keyword::CurrentUser => Ok(self.special_register(SpecialRegister::CurrentUser)),
            Keyword::Current => self.parse_current_register(),
            Keyword::Next if matches!(self.peek_kind(2), TokenKind::Keyword(Keyword::Value)) => {
                self.parse_next_value_for()
            }
            Keyword::Interval if self.options.has_feature(Features::MYSQL_INTERVAL_UNITS) => {
                self.parse_interval()
            }
            Keyword::Trim if call => self.parse_trim(),
            Keyword::Ltrim if call => self.parse_side_trim(TrimSpec::Leading),
            Keyword::Rtrim if call => self.parse_side_trim(TrimSpec::Trailing),
            Keyword::Substring if call => self.parse_substring(),
            Keyword::Extract if call => self.parse_extract(),
            Keyword::Xmlparse if call => self.parse_xmlparse(),
            Keyword::Xmlserialize if call => self.parse_xmlserialize(),
            Keyword::Xmlexists if call => self.parse_xmlexists(),
            _ if aggregate_follows(&mut self.cursor, &self.options) => self.parse_set_function(),
            _ if !keyword.is_reserved() => self.parse_name_primary(),
            _ => Err(self.expected("expression")),
        }
    }

    fn parse_typed_literal(&mut self, keyword: Keyword) -> Result<Expr> {
        let start = self.cursor.advance().span;
        let kind = match keyword {
            Keyword::Date => TypedLiteralKind::Date,
            Keyword::Time => TypedLiteralKind::Time,
            _ => TypedLiteralKind::Timestamp,
        };
        let token = self.expect(&TokenKind::String(String::new()))?;
        let TokenKind::String(value) = token.kind else {
            return Err(ParseError::semantic("expected a string literal", token.span));
        };
        let span = start.to(token.span);
        Ok(self.build(Expr::Literal {
            value: Literal::Typed { kind, value },
            span,
        }))
    }

    fn special_register(&mut self, register: SpecialRegister) -> Expr {
        let span = self.cursor.advance().span;
        self.build(Expr::SpecialRegister { register, span })
    }

    /// `CURRENT DATE`, `CURRENT SCHEMA` and the other two-word registers.
    fn parse_current_register(&mut self) -> Result<Expr> {
        let start = self.cursor.advance().span;
        let register = if self.eat_keyword(Keyword::Date) {
            SpecialRegister::CurrentDate
        } else if self.eat_keyword(Keyword::Time) {
            SpecialRegister::CurrentTime
        } else if self.eat_keyword(Keyword::Timestamp) {
            SpecialRegister::CurrentTimestamp
        } else if self.eat_keyword(Keyword::Schema) {
            SpecialRegister::CurrentSchema
        } else if self.eat_keyword(Keyword::Isolation) {
            SpecialRegister::CurrentIsolation
        } else {
            return Err(self.cursor.unexpected());
        };
        let span = self.span_from(start);
        Ok(self.build(Expr::SpecialRegister { register, span }))
    }

    fn parse_next_value_for(&mut self) -> Result<Expr> {
        let start = self.cursor.advance().span;
        self.expect_keyword(Keyword::Value)?;
        self.expect_keyword(Keyword::For)?;
        let sequence = self.parse_object_name()?;
        let span = self.span_from(start);
        Ok(self.build(Expr::NextValueFor { sequence, span }))
    }

    fn parse_interval(&mut self) -> Result<Expr> {
        let start = self.cursor.advance().span;
        let value = self.parse_arithmetic(0)?;
        let unit = self.parse_datetime_field()?;
        let span = self.span_from(start);
        Ok(self.build(Expr::Interval {
            value: Box::new(value),
            unit,
            span,
        }))
    }

    fn parse_datetime_field(&mut self) -> Result<DateTimeField> {
        if let Some(field) = self.cursor.peek(1).as_keyword().and_then(datetime_field) {
            self.cursor.advance();
            return Ok(field);
        }
        Err(self.expected("datetime field"))
    }

    fn parse_case(&mut self) -> Result<Expr> {
        let start = self.cursor.advance().span;

        // Simple CASE has an operand before the first WHEN.
        let operand = if self.check_keyword(Keyword::When) {
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };

        let mut when_clauses = vec![];
        while self.eat_keyword(Keyword::When) {
            let condition = self.parse_expr()?;
            self.expect_keyword(Keyword::Then)?;
            let result = self.parse_expr()?;
            when_clauses.push((condition, result));
        }
        if when_clauses.is_empty() {
            return Err(self.cursor.unexpected());
        }

        let else_result = if self.eat_keyword(Keyword::Else) {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        self.expect_keyword(Keyword::End)?;

        let span = self.span_from(start);
        Ok(self.build(Expr::Case {
            operand,
            when_clauses,
            else_result,
            span,
        }))
    }

    fn parse_cast(&mut self) -> Result<Expr> {
        let start = self.cursor.advance().span;
        self.expect(&TokenKind::LeftParen)?;
        let expr = self.parse_expr()?;
        self.expect_keyword(Keyword::As)?;
        let data_type = self.parse_data_type()?;
        self.expect(&TokenKind::RightParen)?;
        let span = self.span_from(start);
        Ok(self.build(Expr::Cast {
            expr: Box::new(expr),
            data_type,
            span,
        }))
    }

    /// The `' '` a TRIM strips when no character is given.
    fn default_trim_char(&mut self, at: usize) -> Expr {
        self.build(Expr::Literal {
            value: Literal::String(String::from(" ")),
            span: Span::empty(at),
        })
    }

    fn trim_node(&mut self, start: Span, spec: TrimSpec, trim_char: Expr, source: Expr) -> Expr {
        let span = self.span_from(start);
        self.build(Expr::Trim {
            spec,
            trim_char: Box::new(trim_char),
            source: Box::new(source),
            span,
        })
    }

    /// `TRIM([LEADING|TRAILING|BOTH] [c] FROM s)` or `TRIM(s)`.
    fn parse_trim(&mut self) -> Result<Expr> {
        let start = self.cursor.advance().span;
        let open = self.expect(&TokenKind::LeftParen)?.span;

        let spec = match self.cursor.peek(1).as_keyword() {
            Some(Keyword::Leading) => Some(TrimSpec::Leading),
            Some(Keyword::Trailing) => Some(TrimSpec::Trailing),
            Some(Keyword::Both) => Some(TrimSpec::Both),
            _ => None,
        };

        let (trim_char, source) = if spec.is_some() {
            self.cursor.advance();
            let trim_char = if self.check_keyword(Keyword::From) {
                self.default_trim_char(open.end)
            } else {
                self.parse_expr()?
            };
            self.expect_keyword(Keyword::From)?;
            (trim_char, self.parse_expr()?)
        } else {
            let first = self.parse_expr()?;
            if self.eat_keyword(Keyword::From) {
                (first, self.parse_expr()?)
            } else {
                (self.default_trim_char(open.end), first)
            }
        };
        self.expect(&TokenKind::RightParen)?;
        Ok(self.trim_node(start, spec.unwrap_or_default(), trim_char, source))
    }

    /// `LTRIM(s)` / `RTRIM(s)`.
    fn parse_side_trim(&mut self, spec: TrimSpec) -> Result<Expr> {
        let start = self.cursor.advance().span;
        let open = self.expect(&TokenKind::LeftParen)?.span;
        let trim_char = self.default_trim_char(open.end);
        let source = self.parse_expr()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(self.trim_node(start, spec, trim_char, source))
    }

    /// `SUBSTRING(s FROM a [FOR b])` or `SUBSTRING(s, a [, b])`.
    fn parse_substring(&mut self) -> Result<Expr> {
        let start = self.cursor.advance().span;
        self.expect(&TokenKind::LeftParen)?;
        let expr = self.parse_expr()?;
        let (start_at, length) = if self.eat_keyword(Keyword::From) {
            let from = self.parse_expr()?;
            let length = if self.eat_keyword(Keyword::For) {
                Some(Box::new(self.parse_expr()?))
            } else {
                None
            };
            (from, length)
        } else {
            self.expect(&TokenKind::Comma)?;
            let from = self.parse_expr()?;
            let length = if self.eat(&TokenKind::Comma) {
                Some(Box::new(self.parse_expr()?))
            } else {
                None
            };
            (from, length)
        };
        self.expect(&TokenKind::RightParen)?;
        let span = self.span_from(start);
        Ok(self.build(Expr::Substring {
            expr: Box::new(expr),
            start: Box::new(start_at),
            length,
            span,
        }))
    }

    fn parse_extract(&mut self) -> Result<Expr> {
        let start = self.cursor.advance().span;
        self.expect(&TokenKind::LeftParen)?;
        let field = self.parse_datetime_field()?;
        self.expect_keyword(Keyword::From)?;
        let expr = self.parse_expr()?;
        self.expect(&TokenKind::RightParen)?;
        let span = self.span_from(start);
        Ok(self.build(Expr::Extract {
            field,
            expr: Box::new(expr),
            span,
        }))
    }

    /// `XMLPARSE(DOCUMENT e PRESERVE WHITESPACE)`; the CONTENT and STRIP
    /// WHITESPACE forms are rejected.
    fn parse_xmlparse(&mut self) -> Result<Expr> {
        let start = self.cursor.advance().span;
        self.expect(&TokenKind::LeftParen)?;
        if self.check_keyword(Keyword::Content) {
            return Err(ParseError::semantic(
                "XMLPARSE CONTENT is not supported",
                self.next_span(),
            ));
        }
        self.expect_keyword(Keyword::Document)?;
        let document = self.parse_expr()?;
        if self.check_keyword(Keyword::Strip) {
            return Err(ParseError::semantic(
                "STRIP WHITESPACE is not supported",
                self.next_span(),
            ));
        }
        self.expect_keyword(Keyword::Preserve)?;
        self.expect_keyword(Keyword::Whitespace)?;
        self.expect(&TokenKind::RightParen)?;
        let span = self.span_from(start);
        Ok(self.build(Expr::XmlParse {
            document: Box::new(document),
            span,
        }))
    }

    fn parse_xmlserialize(&mut self) -> Result<Expr> {
        let start = self.cursor.advance().span;
        self.expect(&TokenKind::LeftParen)?;
        let expr = self.parse_expr()?;
        self.expect_keyword(Keyword::As)?;
        let data_type = self.parse_data_type()?;
        self.expect(&TokenKind::RightParen)?;
        let span = self.span_from(start);
        Ok(self.build(Expr::XmlSerialize {
            expr: Box::new(expr),
            data_type,
            span,
        }))
    }

    /// `XMLEXISTS('xquery' PASSING BY REF e)`.
    fn parse_xmlexists(&mut self) -> Result<Expr> {
        let start = self.cursor.advance().span;
        self.expect(&TokenKind::LeftParen)?;
        let token = self.expect(&TokenKind::String(String::new()))?;
        let TokenKind::String(xquery) = token.kind else {
            return Err(ParseError::semantic("expected an XQuery string", token.span));
        };
        self.expect_keyword(Keyword::Passing)?;
        self.expect_keyword(Keyword::By)?;
        if self.check_keyword(Keyword::Value) {
            return Err(ParseError::semantic(
                "PASSING BY VALUE is not supported",
                self.next_span(),
            ));
        }
        self.expect_keyword(Keyword::Ref)?;
        let passing = self.parse_expr()?;
        if self.check_keyword(Keyword::As) {
            return Err(ParseError::semantic(
                "binding XQuery variables is not supported",
                self.next_span(),
            ));
        }
        self.expect(&TokenKind::RightParen)?;
        let span = self.span_from(start);
        Ok(self.build(Expr::XmlExists {
            xquery,
            passing: Box::new(passing),
            span,
        }))
    }

    /// Built-in aggregates, `COUNT(*)`, and `name(DISTINCT ..)`.
    fn parse_set_function(&mut self) -> Result<Expr> {
        let Some(func) = self.cursor.peek(1).as_keyword().and_then(aggregate_func) else {
            return self.parse_name_primary();
        };
        let start = self.cursor.advance().span;
        self.expect(&TokenKind::LeftParen)?;

        if func == AggregateFunc::Count && self.eat(&TokenKind::Star) {
            self.expect(&TokenKind::RightParen)?;
            let over = self.parse_optional_over()?;
            let span = self.span_from(start);
            return Ok(self.build(Expr::CountStar { over, span }));
        }

        let distinct = self.eat_keyword(Keyword::Distinct);
        if !distinct {
            self.eat_keyword(Keyword::All);
        }
        let arg = self.parse_expr()?;
        self.expect(&TokenKind::RightParen)?;
        let over = self.parse_optional_over()?;
        let span = self.span_from(start);
        Ok(self.build(Expr::Aggregate {
            func,
            distinct,
            arg: Box::new(arg),
            over,
            span,
        }))
    }

    /// Column references and function calls.
    fn parse_name_primary(&mut self) -> Result<Expr> {
        let start = self.next_span();
        let mut parts = vec![self.parse_identifier()?];
        while matches!(self.peek_kind(1), TokenKind::Dot) && is_identifier_token(self.peek_kind(2))
        {
            self.cursor.advance();
            parts.push(self.parse_identifier()?);
        }

        if self.check(&TokenKind::LeftParen) {
            if self.options.has_feature(Features::EMPTY_PARENS_COLUMN)
                && matches!(self.peek_kind(2), TokenKind::RightParen)
            {
                self.cursor.advance();
                self.cursor.advance();
            } else {
                let name = self.function_name(parts.len(), start)?;
                return self.parse_function_call(name, start);
            }
        }

        if parts.len() > 3 {
            return Err(ParseError::semantic(
                "column reference has too many name parts",
                self.span_from(start),
            ));
        }
        let name = parts.pop().ok_or_else(|| self.expected("column name"))?;
        let table = if parts.is_empty() {
            None
        } else {
            Some(ObjectName(parts))
        };
        let span = self.span_from(start);
        Ok(self.build(Expr::Column { table, name, span }))
    }

    /// A function name is the identifier just consumed, optionally qualified
    /// by the one before it.
    fn function_name(&self, parts: usize, start: Span) -> Result<ObjectName> {
        if parts > 2 {
            return Err(ParseError::semantic(
                "function name has too many name parts",
                self.span_from(start),
            ));
        }
        let [older, newer] = self.cursor.identifier_window();
        let tokens = if parts == 2 { [older, newer] } else { [None, newer] };
        let mut name = vec![];
        for token in tokens.into_iter().flatten() {
            name.push(self.ident_from_token(token)?);
        }
        if name.len() != parts {
            return Err(ParseError::semantic("malformed function name", start));
        }
        Ok(ObjectName(name))
    }

    fn parse_function_call(&mut self, name: ObjectName, start: Span) -> Result<Expr> {
        self.expect(&TokenKind::LeftParen)?;

        let is_nullif = name.0.len() == 1
            && name.0.first().is_some_and(|part| {
                !part.quoted && part.value.eq_ignore_ascii_case("NULLIF")
            });
        if is_nullif {
            let left = self.parse_expr()?;
            self.expect(&TokenKind::Comma)?;
            let right = self.parse_expr()?;
            self.expect(&TokenKind::RightParen)?;
            let span = self.span_from(start);
            return Ok(self.build(Expr::NullIf {
                left: Box::new(left),
                right: Box::new(right),
                span,
            }));
        }

        let distinct = self.eat_keyword(Keyword::Distinct);
        let args = if self.check(&TokenKind::RightParen) {
            vec![]
        } else {
            self.parse_expr_list()?
        };
        self.expect(&TokenKind::RightParen)?;
        let over = self.parse_optional_over()?;
        let span = self.span_from(start);
        Ok(self.build(Expr::Function(FunctionCall {
            name,
            args,
            distinct,
            over,
            span,
        })))
    }

    fn parse_optional_over(&mut self) -> Result<Option<WindowRef>> {
        if !window_function_follows(&mut self.cursor, &self.options) {
            return Ok(None);
        }
        self.cursor.advance();
        if self.check(&TokenKind::LeftParen) {
            return Ok(Some(WindowRef::Spec(self.parse_window_spec()?)));
        }
        Ok(Some(WindowRef::Named(self.parse_identifier()?)))
    }

    /// `( [base] [PARTITION BY ..] [ORDER BY ..] [frame] )`.
    pub(super) fn parse_window_spec(&mut self) -> Result<WindowSpec> {
        self.expect(&TokenKind::LeftParen)?;
        let mut spec = WindowSpec::default();

        let starts_clause = matches!(
            self.peek_kind(1),
            TokenKind::Keyword(Keyword::Partition | Keyword::Rows | Keyword::Range)
        );
        if !starts_clause && is_identifier_token(self.peek_kind(1)) {
            spec.base = Some(self.parse_identifier()?);
        }
        if self.eat_keyword(Keyword::Partition) {
            self.expect_keyword(Keyword::By)?;
            spec.partition_by = self.parse_expr_list()?;
        }
        if self.eat_keyword(Keyword::Order) {
            self.expect_keyword(Keyword::By)?;
            spec.order_by = self.parse_order_by_list()?;
        }
        spec.frame = self.parse_optional_frame()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(spec)
    }

    fn parse_optional_frame(&mut self) -> Result<Option<WindowFrame>> {
        let units = if self.eat_keyword(Keyword::Rows) {
            FrameUnits::Rows
        } else if self.eat_keyword(Keyword::Range) {
            FrameUnits::Range
        } else {
            return Ok(None);
        };
        if self.eat_keyword(Keyword::Between) {
            let start = self.parse_frame_bound()?;
            self.expect_keyword(Keyword::And)?;
            let end = self.parse_frame_bound()?;
            return Ok(Some(WindowFrame {
                units,
                start,
                end: Some(end),
            }));
        }
        let start = self.parse_frame_bound()?;
        Ok(Some(WindowFrame {
            units,
            start,
            end: None,
        }))
    }

    fn parse_frame_bound(&mut self) -> Result<FrameBound> {
        if self.eat_keyword(Keyword::Unbounded) {
            if self.eat_keyword(Keyword::Preceding) {
                return Ok(FrameBound::UnboundedPreceding);
            }
            self.expect_keyword(Keyword::Following)?;
            return Ok(FrameBound::UnboundedFollowing);
        }
        if self.eat_keyword(Keyword::Current) {
            self.expect_keyword(Keyword::Row)?;
            return Ok(FrameBound::CurrentRow);
        }
        if !matches!(self.peek_kind(1), TokenKind::ExactNumber(_)) {
            return Err(self.expected("frame bound"));
        }
        let (n, _) = self.parse_unsigned_integer()?;
        if self.eat_keyword(Keyword::Preceding) {
            return Ok(FrameBound::Preceding(n));
        }
        self.expect_keyword(Keyword::Following)?;
        Ok(FrameBound::Following(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Select, SelectItem, Statement};
    use crate::dialect::{MySqlDialect, ParserOptions};
    use crate::parser::ParseErrorKind;

    fn expr_with(sql: &str, options: ParserOptions) -> Result<Expr> {
        let text = format!("SELECT {sql}");
        let stmt = Parser::with_options(&text, options).parse_statement()?;
        let Statement::Query(query) = stmt else {
            panic!("expected a query");
        };
        let select: &Select = query.as_select().expect("select");
        match select.projection.first() {
            Some(SelectItem::Expr { expr, .. }) => Ok(expr.clone()),
            other => panic!("unexpected select item {other:?}"),
        }
    }

    fn expr(sql: &str) -> Expr {
        expr_with(sql, ParserOptions::default()).unwrap()
    }

    #[test]
    fn test_expression_precedence() {
        // 1 + 2 * 3 should parse as 1 + (2 * 3)
        let Expr::Binary { op, right, .. } = expr("1 + 2 * 3") else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::Add);
        assert!(matches!(*right, Expr::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn test_left_associative_subtraction() {
        let Expr::Binary { left, op, .. } = expr("10 - 4 - 3") else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::Sub);
        assert!(matches!(*left, Expr::Binary { op: BinaryOp::Sub, .. }));
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let Expr::Binary { op, right, .. } = expr("a = 1 OR b = 2 AND c = 3") else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::Or);
        assert!(matches!(*right, Expr::Binary { op: BinaryOp::And, .. }));
    }

    #[test]
    fn test_comparison_is_not_associative() {
        let err = expr_with("a = b = c", ParserOptions::default()).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
    }

    #[test]
    fn test_numeric_literal_widths() {
        assert!(matches!(expr("2147483647"), Expr::Literal { value: Literal::Int(_), .. }));
        assert!(matches!(expr("2147483648"), Expr::Literal { value: Literal::BigInt(_), .. }));
        assert!(matches!(
            expr("99999999999999999999"),
            Expr::Literal { value: Literal::Decimal(_), .. }
        ));
        assert!(matches!(expr("1.50"), Expr::Literal { value: Literal::Decimal(_), .. }));
        assert!(matches!(expr(".5"), Expr::Literal { value: Literal::Decimal(_), .. }));
        assert!(matches!(expr("1e3"), Expr::Literal { value: Literal::Double(_), .. }));
    }

    #[test]
    fn test_wide_exact_literals_keep_every_digit() {
        let literal = |sql: &str| match expr(sql) {
            Expr::Literal { value, .. } => value,
            other => panic!("expected literal, got {other:?}"),
        };
        assert_eq!(
            literal("0.00000000000000000000000000001"),
            Literal::WideDecimal("0.00000000000000000000000000001".into())
        );
        assert_eq!(
            literal("1234567890123456789012345678901"),
            Literal::WideDecimal("1234567890123456789012345678901".into())
        );
        assert_eq!(
            literal("1.2345678901234567890123456789012"),
            Literal::WideDecimal("1.2345678901234567890123456789012".into())
        );
        assert!(matches!(
            literal("12345678901234567890.12345678"),
            Literal::Decimal(d) if d.to_string() == "12345678901234567890.12345678"
        ));
    }

    #[test]
    fn test_exact_literal_wider_than_any_decimal_column() {
        let err = expr_with("12345678901234567890123456789012", ParserOptions::default())
            .unwrap_err();
        assert!(err.is_semantic());
        let err = expr_with("0.00000000000000000000000000000001", ParserOptions::default())
            .unwrap_err();
        assert_eq!(err.message, "numeric literal out of range");
    }

    #[test]
    fn test_numeric_literal_out_of_range() {
        let err = expr_with("1e999", ParserOptions::default()).unwrap_err();
        assert!(err.is_semantic());
    }

    #[test]
    fn test_negative_literal_folds() {
        assert_eq!(
            expr("-2147483648"),
            Expr::Literal {
                value: Literal::Int(i32::MIN),
                span: Span::new(7, 18),
            }
        );
        assert!(matches!(
            expr("- x"),
            Expr::Unary { op: UnaryOp::Neg, .. }
        ));
    }

    #[test]
    fn test_predicates() {
        assert!(matches!(expr("a NOT IN (1, 2)"), Expr::InList { negated: true, .. }));
        assert!(matches!(expr("a IN (SELECT b FROM t)"), Expr::InSubquery { .. }));
        assert!(matches!(expr("a LIKE 'x%' ESCAPE '!'"), Expr::Like { escape: Some(_), .. }));
        assert!(matches!(
            expr("a NOT BETWEEN 1 AND 2"),
            Expr::Between { negated: true, .. }
        ));
        assert!(matches!(expr("a IS NOT NULL"), Expr::IsNull { negated: true, .. }));
        assert!(matches!(
            expr("a IS FALSE"),
            Expr::IsBool { value: false, negated: false, .. }
        ));
        assert!(matches!(
            expr("a > ALL (SELECT b FROM t)"),
            Expr::Quantified { quantifier: Quantifier::All, .. }
        ));
    }

    #[test]
    fn test_not_between_and_precedence() {
        let Expr::Binary { op, left, .. } = expr("a BETWEEN 1 AND 2 AND b") else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::And);
        assert!(matches!(*left, Expr::Between { .. }));
    }

    #[test]
    fn test_is_expected_set() {
        let err = expr_with("a IS 1", ParserOptions::default()).unwrap_err();
        for keyword in [Keyword::Not, Keyword::Null, Keyword::True, Keyword::False] {
            assert!(err.expects(Expected::Keyword(keyword)), "{keyword:?}");
        }
    }

    #[test]
    fn test_parenthesized_forms() {
        assert!(matches!(expr("(1)"), Expr::Nested { .. }));
        assert!(matches!(expr("(1, 2)"), Expr::Row { .. }));
        assert!(matches!(expr("(SELECT 1)"), Expr::Subquery { .. }));
        assert!(matches!(expr("((SELECT 1) + 1)"), Expr::Nested { .. }));
    }

    #[test]
    fn test_unterminated_parenthesis() {
        let err = expr_with("(1", ParserOptions::default()).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::NoAlternative { .. }));
    }

    #[test]
    fn test_trim_forms() {
        for sql in ["TRIM(x)", "TRIM(BOTH FROM x)", "TRIM(' ' FROM x)"] {
            let Expr::Trim { spec, trim_char, .. } = expr(sql) else {
                panic!("expected trim for {sql}");
            };
            assert_eq!(spec, TrimSpec::Both);
            assert!(matches!(
                trim_char.as_literal(),
                Some(Literal::String(s)) if s == " "
            ));
        }
        assert!(matches!(expr("LTRIM(x)"), Expr::Trim { spec: TrimSpec::Leading, .. }));
        assert!(matches!(
            expr("TRIM(TRAILING 'x' FROM y)"),
            Expr::Trim { spec: TrimSpec::Trailing, .. }
        ));
    }

    #[test]
    fn test_count_star_and_aggregates() {
        assert!(matches!(expr("COUNT(*)"), Expr::CountStar { over: None, .. }));
        assert!(matches!(
            expr("SUM(DISTINCT x)"),
            Expr::Aggregate { func: AggregateFunc::Sum, distinct: true, .. }
        ));
        assert!(matches!(expr("count"), Expr::Column { .. }));
    }

    #[test]
    fn test_window_function() {
        let Expr::Function(call) =
            expr("rank() OVER (PARTITION BY a ORDER BY b ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW)")
        else {
            panic!("expected function");
        };
        let Some(WindowRef::Spec(spec)) = call.over else {
            panic!("expected window spec");
        };
        assert_eq!(spec.partition_by.len(), 1);
        assert_eq!(
            spec.frame.map(|f| f.start),
            Some(FrameBound::UnboundedPreceding)
        );
    }

    #[test]
    fn test_qualified_function_name() {
        let Expr::Function(call) = expr("app.lower(x)") else {
            panic!("expected function");
        };
        assert_eq!(call.name.dotted(), "app.lower");
    }

    #[test]
    fn test_special_registers_and_misc() {
        assert!(matches!(
            expr("CURRENT DATE"),
            Expr::SpecialRegister { register: SpecialRegister::CurrentDate, .. }
        ));
        assert!(matches!(
            expr("CURRENT SCHEMA"),
            Expr::SpecialRegister { register: SpecialRegister::CurrentSchema, .. }
        ));
        assert!(matches!(expr("NEXT VALUE FOR seq"), Expr::NextValueFor { .. }));
        assert!(matches!(expr("NULLIF(a, b)"), Expr::NullIf { .. }));
        assert!(matches!(expr("SUBSTRING(a, 1, 2)"), Expr::Substring { length: Some(_), .. }));
        assert!(matches!(expr("EXTRACT(YEAR FROM d)"), Expr::Extract { .. }));
        assert!(matches!(expr("DATE '2024-01-01'"), Expr::Literal { value: Literal::Typed { .. }, .. }));
    }

    #[test]
    fn test_xml_operators() {
        assert!(matches!(
            expr("XMLPARSE(DOCUMENT x PRESERVE WHITESPACE)"),
            Expr::XmlParse { .. }
        ));
        assert!(matches!(
            expr("XMLEXISTS('//a' PASSING BY REF doc)"),
            Expr::XmlExists { .. }
        ));
        for sql in [
            "XMLPARSE(CONTENT x PRESERVE WHITESPACE)",
            "XMLPARSE(DOCUMENT x STRIP WHITESPACE)",
            "XMLEXISTS('//a' PASSING BY VALUE doc)",
        ] {
            let err = expr_with(sql, ParserOptions::default()).unwrap_err();
            assert!(err.is_semantic(), "{sql}");
        }
    }

    #[test]
    fn test_gated_operators() {
        let mysql = ParserOptions::for_dialect(&MySqlDialect);
        assert!(matches!(
            expr_with("a DIV b", mysql.clone()).unwrap(),
            Expr::Binary { op: BinaryOp::IntDiv, .. }
        ));
        assert!(matches!(
            expr_with("INTERVAL 1 DAY", mysql).unwrap(),
            Expr::Interval { unit: DateTimeField::Day, .. }
        ));
        // Without the feature DIV is an alias.
        assert!(matches!(expr("a DIV"), Expr::Column { .. }));
    }

    #[test]
    fn test_empty_parens_column() {
        let options = ParserOptions::default().with_feature(Features::EMPTY_PARENS_COLUMN);
        assert!(matches!(
            expr_with("total()", options).unwrap(),
            Expr::Column { .. }
        ));
        assert!(matches!(expr("total()"), Expr::Function(_)));
    }
}
