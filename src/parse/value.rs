//! The expression grammar.
//!
//! Values are parsed by an explicit precedence ladder, from loosest to
//! tightest binding:
//!
//! comma list → space list → `=` → `or` → `and` → comparisons →
//! `+`/`-` → `*`/`/`/`%` → unary prefix → primary
//!
//! Every level folds left-associatively and returns its single child
//! unwrapped when no operator or separator was present at that level.

use std::sync::Arc;

use codemap::Spanned;

use crate::{
    ast::*,
    color::{Color, ColorFormat, NAMED_COLORS},
    common::{unvendor, BinaryOp, Brackets, Identifier, ListSeparator, QuoteKind, UnaryOp},
    error::ParseResult,
    lexer::Token,
    unit::Unit,
    utils::as_hex,
};

use super::{BaseParser, Parser};

/// A non-consuming test for "the expression ends here", threaded through the
/// upper levels of the ladder so callers like `@for` and media queries can
/// cut a value short at a keyword or comparison.
pub(crate) type Predicate<'c, 'a> = &'c dyn Fn(&mut Parser<'a>) -> ParseResult<bool>;

fn is_hex_color(interpolation: &Interpolation) -> bool {
    match interpolation.as_plain() {
        Some(plain) => {
            [3, 4, 6, 8].contains(&plain.len()) && plain.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

impl<'a> Parser<'a> {
    /// Whether the next token can begin an expression.
    pub(crate) fn looking_at_expression(&self) -> bool {
        let first = match self.toks().peek() {
            Some(c) => c,
            None => return false,
        };

        match first.kind {
            '.' => !matches!(self.toks().peek_n(1), Some(Token { kind: '.', .. })),
            '!' => match self.toks().peek_n(1) {
                Some(Token {
                    kind: 'i' | 'I', ..
                })
                | None => true,
                Some(Token { kind, .. }) => kind.is_ascii_whitespace(),
            },
            '(' | '/' | '[' | '\'' | '"' | '#' | '+' | '-' | '\\' | '$' | '&' => true,
            c => crate::utils::is_name_start(c) || c.is_ascii_digit(),
        }
    }

    fn predicate_hit(&mut self, predicate: Option<Predicate<'_, 'a>>) -> ParseResult<bool> {
        match predicate {
            Some(predicate) => predicate(self),
            None => Ok(false),
        }
    }

    /// The expression entry point: a comma-separated list.
    pub(crate) fn parse_expression(
        &mut self,
        predicate: Option<Predicate<'_, 'a>>,
    ) -> ParseResult<Spanned<Expr>> {
        self.enter_nesting()?;

        let start = self.toks().cursor();
        self.whitespace()?;

        if self.predicate_hit(predicate)? || !self.looking_at_expression() {
            self.exit_nesting();
            return Err(("Expected expression.", self.toks().current_span()).into());
        }

        let first = self.parse_space_list(predicate)?;

        if !self.toks().next_char_is(',') {
            self.exit_nesting();
            let span = self.toks().span_from(start);
            return Ok(Spanned {
                node: first.node,
                span,
            });
        }

        let mut elems = vec![first];

        while self.scan_char(',') {
            self.whitespace()?;

            if self.predicate_hit(predicate)? || !self.looking_at_expression() {
                break;
            }

            elems.push(self.parse_space_list(predicate)?);
        }

        self.exit_nesting();

        let span = self.toks().span_from(start);

        Ok(Expr::List(ListExpr {
            elems,
            separator: ListSeparator::Comma,
            brackets: Brackets::None,
        })
        .span(span))
    }

    /// One element of a comma list. Used anywhere a comma is a hard
    /// boundary: call arguments, map keys and values, configured defaults.
    pub(crate) fn parse_expression_until_comma(&mut self) -> ParseResult<Spanned<Expr>> {
        self.enter_nesting()?;
        self.whitespace()?;

        if !self.looking_at_expression() {
            self.exit_nesting();
            return Err(("Expected expression.", self.toks().current_span()).into());
        }

        let value = self.parse_space_list(None);
        self.exit_nesting();
        value
    }

    fn parse_space_list(
        &mut self,
        predicate: Option<Predicate<'_, 'a>>,
    ) -> ParseResult<Spanned<Expr>> {
        let start = self.toks().cursor();
        let first = self.parse_single_eq(predicate)?;
        let mut elems: Option<Vec<Spanned<Expr>>> = None;

        loop {
            self.whitespace()?;

            if self.predicate_hit(predicate)? || !self.looking_at_expression() {
                break;
            }

            let elem = self.parse_single_eq(predicate)?;
            elems.get_or_insert_with(|| vec![first.clone()]).push(elem);
        }

        Ok(match elems {
            Some(elems) => {
                let span = self.toks().span_from(start);
                Expr::List(ListExpr {
                    elems,
                    separator: ListSeparator::Space,
                    brackets: Brackets::None,
                })
                .span(span)
            }
            None => first,
        })
    }

    /// The single-`=` level for legacy IE filter arguments like
    /// `alpha(opacity=40)`. Only active inside call arguments.
    fn parse_single_eq(
        &mut self,
        predicate: Option<Predicate<'_, 'a>>,
    ) -> ParseResult<Spanned<Expr>> {
        let mut lhs = self.parse_disjunction(predicate)?;

        while self.allow_single_eq
            && self.toks().next_char_is('=')
            && !matches!(self.toks().peek_n(1), Some(Token { kind: '=', .. }))
        {
            self.toks_mut().next();
            self.whitespace()?;
            let rhs = self.parse_disjunction(predicate)?;
            lhs = self.binary_expr(BinaryOp::SingleEq, lhs, rhs);
        }

        Ok(lhs)
    }

    fn parse_disjunction(
        &mut self,
        predicate: Option<Predicate<'_, 'a>>,
    ) -> ParseResult<Spanned<Expr>> {
        let mut lhs = self.parse_conjunction(predicate)?;

        loop {
            self.whitespace()?;
            if !self.scan_identifier("or", false)? {
                break;
            }
            self.whitespace()?;
            let rhs = self.parse_conjunction(predicate)?;
            lhs = self.binary_expr(BinaryOp::Or, lhs, rhs);
        }

        Ok(lhs)
    }

    fn parse_conjunction(
        &mut self,
        predicate: Option<Predicate<'_, 'a>>,
    ) -> ParseResult<Spanned<Expr>> {
        let mut lhs = self.parse_relation(predicate)?;

        loop {
            self.whitespace()?;
            if !self.scan_identifier("and", false)? {
                break;
            }
            self.whitespace()?;
            let rhs = self.parse_relation(predicate)?;
            lhs = self.binary_expr(BinaryOp::And, lhs, rhs);
        }

        Ok(lhs)
    }

    fn parse_relation(
        &mut self,
        predicate: Option<Predicate<'_, 'a>>,
    ) -> ParseResult<Spanned<Expr>> {
        let mut lhs = self.parse_additive(predicate)?;

        loop {
            self.whitespace()?;

            if self.predicate_hit(predicate)? {
                break;
            }

            let op = match self.toks().peek() {
                Some(Token { kind: '=', .. })
                    if matches!(self.toks().peek_n(1), Some(Token { kind: '=', .. })) =>
                {
                    self.toks_mut().next();
                    self.toks_mut().next();
                    BinaryOp::Equal
                }
                Some(Token { kind: '!', .. })
                    if matches!(self.toks().peek_n(1), Some(Token { kind: '=', .. })) =>
                {
                    self.toks_mut().next();
                    self.toks_mut().next();
                    BinaryOp::NotEqual
                }
                Some(Token { kind: '>', .. }) => {
                    self.toks_mut().next();
                    if self.scan_char('=') {
                        BinaryOp::GreaterThanEqual
                    } else {
                        BinaryOp::GreaterThan
                    }
                }
                Some(Token { kind: '<', .. }) => {
                    self.toks_mut().next();
                    if self.scan_char('=') {
                        BinaryOp::LessThanEqual
                    } else {
                        BinaryOp::LessThan
                    }
                }
                _ => break,
            };

            self.whitespace()?;
            let rhs = self.parse_additive(predicate)?;
            lhs = self.binary_expr(op, lhs, rhs);
        }

        Ok(lhs)
    }

    fn parse_additive(
        &mut self,
        predicate: Option<Predicate<'_, 'a>>,
    ) -> ParseResult<Spanned<Expr>> {
        let mut lhs = self.parse_multiplicative(predicate)?;

        loop {
            self.whitespace()?;

            match self.toks().peek() {
                Some(Token { kind: '+', .. }) => {
                    self.toks_mut().next();
                    self.whitespace()?;
                    let rhs = self.parse_multiplicative(predicate)?;
                    lhs = self.binary_expr(BinaryOp::Plus, lhs, rhs);
                }
                Some(Token { kind: '-', .. }) => {
                    if !self.minus_is_binary() {
                        break;
                    }
                    self.toks_mut().next();
                    self.whitespace()?;
                    let rhs = self.parse_multiplicative(predicate)?;
                    lhs = self.binary_expr(BinaryOp::Minus, lhs, rhs);
                }
                _ => break,
            }
        }

        Ok(lhs)
    }

    /// `-` is ambiguous between a binary operator, a negative number, and an
    /// identifier. It is binary only when a space-separated operand or
    /// identifier continuation can be ruled out: `10 - 5` subtracts, while
    /// `10 -5` is a list and `10px-5px` is two dimension tokens.
    fn minus_is_binary(&self) -> bool {
        debug_assert!(self.toks().next_char_is('-'));

        let next_is_digit = matches!(
            self.toks().peek_n(1),
            Some(Token {
                kind: '0'..='9' | '.',
                ..
            })
        );
        let prev = self.toks().peek_behind(1).map(|t| t.kind);
        let prev_is_whitespace = matches!(prev, Some(' ' | '\t' | '\n'));

        if next_is_digit && prev_is_whitespace {
            return false;
        }

        if next_is_digit
            && matches!(prev, Some(c) if crate::utils::is_name(c) && !c.is_ascii_digit())
        {
            return false;
        }

        !self.looking_at_interpolated_identifier()
    }

    fn parse_multiplicative(
        &mut self,
        predicate: Option<Predicate<'_, 'a>>,
    ) -> ParseResult<Spanned<Expr>> {
        let mut lhs = self.parse_factor(predicate)?;

        loop {
            self.whitespace()?;

            let op = match self.toks().peek() {
                Some(Token { kind: '*', .. }) => BinaryOp::Mul,
                Some(Token { kind: '/', .. }) => BinaryOp::Div,
                Some(Token { kind: '%', .. }) => BinaryOp::Rem,
                _ => break,
            };

            self.toks_mut().next();
            self.whitespace()?;
            let rhs = self.parse_factor(predicate)?;
            lhs = self.binary_expr(op, lhs, rhs);
        }

        Ok(lhs)
    }

    fn parse_factor(
        &mut self,
        predicate: Option<Predicate<'_, 'a>>,
    ) -> ParseResult<Spanned<Expr>> {
        let start = self.toks().cursor();

        match self.toks().peek() {
            Some(Token { kind: '+', .. }) => {
                if matches!(
                    self.toks().peek_n(1),
                    Some(Token {
                        kind: '0'..='9' | '.',
                        ..
                    })
                ) {
                    return self.parse_number();
                }
                self.toks_mut().next();
                self.whitespace()?;
                let operand = self.parse_factor(predicate)?;
                let span = self.toks().span_from(start);
                Ok(Expr::UnaryOp(UnaryOp::Plus, Arc::new(operand.node), span).span(span))
            }
            Some(Token { kind: '-', .. }) => {
                if matches!(
                    self.toks().peek_n(1),
                    Some(Token {
                        kind: '0'..='9' | '.',
                        ..
                    })
                ) {
                    return self.parse_number();
                }
                if self.looking_at_interpolated_identifier() {
                    return self.parse_identifier_like(predicate);
                }
                self.toks_mut().next();
                self.whitespace()?;
                let operand = self.parse_factor(predicate)?;
                let span = self.toks().span_from(start);
                Ok(Expr::UnaryOp(UnaryOp::Neg, Arc::new(operand.node), span).span(span))
            }
            Some(Token { kind: '/', .. }) => {
                self.toks_mut().next();
                self.whitespace()?;
                let operand = self.parse_factor(predicate)?;
                let span = self.toks().span_from(start);
                Ok(Expr::UnaryOp(UnaryOp::Div, Arc::new(operand.node), span).span(span))
            }
            _ => self.parse_primary(predicate),
        }
    }

    fn parse_primary(
        &mut self,
        predicate: Option<Predicate<'_, 'a>>,
    ) -> ParseResult<Spanned<Expr>> {
        let start = self.toks().cursor();

        match self.toks().peek() {
            Some(Token { kind: '(', .. }) => self.parse_paren_expr(),
            Some(Token { kind: '[', .. }) => self.parse_bracketed_list(),
            Some(Token { kind: '$', .. }) => self.parse_variable(),
            Some(Token { kind: '&', .. }) => self.parse_parent_selector_expr(),
            Some(Token {
                kind: '"' | '\'', ..
            }) => {
                let string = self.parse_interpolated_string()?;
                let span = string.span;
                Ok(Expr::String(string.node, span).span(span))
            }
            Some(Token { kind: '#', .. }) => self.parse_hash(predicate),
            Some(Token { kind: '!', .. }) => self.parse_important_expr(),
            Some(Token {
                kind: '0'..='9' | '.',
                ..
            }) => self.parse_number(),
            Some(Token { kind, .. })
                if crate::utils::is_name_start(kind) || kind == '\\' || kind == '-' =>
            {
                self.parse_identifier_like(predicate)
            }
            Some(..) | None => Err((
                "Expected expression.",
                self.toks().span_from(start),
            )
                .into()),
        }
    }

    /// Fold two operands into a binary expression, applying the division
    /// delay rule: a `/` between two literal-enough operands outside
    /// parentheses keeps its source form, and nesting under any other
    /// operator strips the delay from its children.
    fn binary_expr(
        &mut self,
        op: BinaryOp,
        lhs: Spanned<Expr>,
        rhs: Spanned<Expr>,
    ) -> Spanned<Expr> {
        let span = lhs.span.merge(rhs.span);

        if op == BinaryOp::Div
            && !self.in_parens
            && lhs.node.is_slash_operand()
            && rhs.node.is_slash_operand()
        {
            return Expr::slash(lhs.node, rhs.node, span).span(span);
        }

        Expr::BinaryOp(Arc::new(BinaryExpr {
            op,
            lhs: undelay(lhs.node),
            rhs: undelay(rhs.node),
            is_delayed: false,
            span,
        }))
        .span(span)
    }

    fn parse_variable(&mut self) -> ParseResult<Spanned<Expr>> {
        let start = self.toks().cursor();
        let name = self.parse_variable_name()?;
        let span = self.toks().span_from(start);

        Ok(Expr::Variable {
            name: Spanned {
                node: Identifier::from(name),
                span,
            },
        }
        .span(span))
    }

    fn parse_parent_selector_expr(&mut self) -> ParseResult<Spanned<Expr>> {
        let start = self.toks().cursor();
        self.expect_char('&')?;

        if self.toks().next_char_is('&') {
            self.warn(
                self.toks().span_from(start),
                "\"&&\" means two copies of the parent selector. You probably want to use \"and\" instead.",
            );
        }

        Ok(Expr::ParentSelector.span(self.toks().span_from(start)))
    }

    fn parse_important_expr(&mut self) -> ParseResult<Spanned<Expr>> {
        let start = self.toks().cursor();
        self.expect_char('!')?;
        self.whitespace()?;
        self.expect_identifier("important", false)?;

        let span = self.toks().span_from(start);

        Ok(Expr::String(StringExpr::constant("!important".to_owned()), span).span(span))
    }

    fn parse_paren_expr(&mut self) -> ParseResult<Spanned<Expr>> {
        let start = self.toks().cursor();
        let was_in_parens = self.in_parens;
        self.in_parens = true;

        let result = self.parse_paren_contents(start);
        self.in_parens = was_in_parens;

        result
    }

    fn parse_paren_contents(&mut self, start: usize) -> ParseResult<Spanned<Expr>> {
        self.expect_char('(')?;
        self.whitespace()?;

        if !self.looking_at_expression() {
            self.expect_char(')')?;
            return Ok(Expr::List(ListExpr {
                elems: Vec::new(),
                separator: ListSeparator::Undecided,
                brackets: Brackets::None,
            })
            .span(self.toks().span_from(start)));
        }

        let first = self.parse_expression_until_comma()?;

        if self.scan_char(':') {
            self.whitespace()?;
            return self.parse_map(first, start);
        }

        if !self.scan_char(',') {
            self.expect_char(')')?;
            let span = self.toks().span_from(start);
            return Ok(Expr::Paren(Arc::new(first.node)).span(span));
        }

        self.whitespace()?;

        let mut elems = vec![first];

        loop {
            if !self.looking_at_expression() {
                break;
            }
            elems.push(self.parse_expression_until_comma()?);
            if !self.scan_char(',') {
                break;
            }
            self.whitespace()?;
        }

        self.expect_char(')')?;

        Ok(Expr::List(ListExpr {
            elems,
            separator: ListSeparator::Comma,
            brackets: Brackets::None,
        })
        .span(self.toks().span_from(start)))
    }

    /// Continue a parenthesized expression as a map after its first `:`.
    fn parse_map(&mut self, first_key: Spanned<Expr>, start: usize) -> ParseResult<Spanned<Expr>> {
        let mut pairs = vec![(first_key, self.parse_expression_until_comma()?)];

        while self.scan_char(',') {
            self.whitespace()?;
            if !self.looking_at_expression() {
                break;
            }

            let key = self.parse_expression_until_comma()?;
            self.expect_char(':')?;
            self.whitespace()?;
            let value = self.parse_expression_until_comma()?;
            pairs.push((key, value));
        }

        self.expect_char(')')?;

        Ok(Expr::Map(MapExpr(pairs)).span(self.toks().span_from(start)))
    }

    fn parse_bracketed_list(&mut self) -> ParseResult<Spanned<Expr>> {
        let start = self.toks().cursor();
        self.expect_char('[')?;
        self.whitespace()?;

        if self.scan_char(']') {
            return Ok(Expr::List(ListExpr {
                elems: Vec::new(),
                separator: ListSeparator::Undecided,
                brackets: Brackets::Bracketed,
            })
            .span(self.toks().span_from(start)));
        }

        let mut elems = Vec::new();
        let mut separator = ListSeparator::Undecided;

        loop {
            elems.push(self.parse_expression_until_comma()?);
            if self.scan_char(',') {
                separator = ListSeparator::Comma;
                self.whitespace()?;
                if self.toks().next_char_is(']') {
                    break;
                }
                continue;
            }
            break;
        }

        self.expect_char(']')?;

        // A single space-separated element flattens so that `[a b]` is a
        // bracketed space list rather than a list of lists.
        if separator == ListSeparator::Undecided && elems.len() == 1 {
            if let Expr::List(inner) = &elems[0].node {
                if inner.brackets == Brackets::None && inner.separator == ListSeparator::Space {
                    let inner = inner.clone();
                    return Ok(Expr::List(ListExpr {
                        elems: inner.elems,
                        separator: ListSeparator::Space,
                        brackets: Brackets::Bracketed,
                    })
                    .span(self.toks().span_from(start)));
                }
            }
        }

        Ok(Expr::List(ListExpr {
            elems,
            separator,
            brackets: Brackets::Bracketed,
        })
        .span(self.toks().span_from(start)))
    }

    pub(crate) fn parse_number(&mut self) -> ParseResult<Spanned<Expr>> {
        let start = self.toks().cursor();

        if !self.scan_char('+') {
            self.scan_char('-');
        }

        let after_sign = self.toks().cursor();

        if !self.toks().next_char_is('.') {
            self.consume_natural_number()?;
        }

        self.try_decimal(self.toks().cursor() != after_sign)?;
        self.try_exponent()?;

        let raw = self.toks().raw_text(start);
        let value: f64 = raw.parse().unwrap();
        let leading_zero = raw.trim_start_matches(&['+', '-'][..]).starts_with("0.");

        let unit = if self.scan_char('%') {
            Unit::Percent
        } else if self.looking_at_identifier()
            && (!self.toks().next_char_is('-')
                || !matches!(self.toks().peek_n(1), Some(Token { kind: '-', .. })))
        {
            Unit::from(self.parse_identifier(false, true)?)
        } else {
            Unit::None
        };

        Ok(Expr::Number {
            value,
            unit,
            leading_zero,
        }
        .span(self.toks().span_from(start)))
    }

    fn consume_natural_number(&mut self) -> ParseResult<()> {
        if !matches!(
            self.toks_mut().next(),
            Some(Token {
                kind: '0'..='9',
                ..
            })
        ) {
            return Err(("Expected digit.", self.toks().prev_span()).into());
        }

        while matches!(self.toks().peek(), Some(t) if t.kind.is_ascii_digit()) {
            self.toks_mut().next();
        }

        Ok(())
    }

    fn try_decimal(&mut self, allow_trailing_dot: bool) -> ParseResult<()> {
        if !self.toks().next_char_is('.') {
            return Ok(());
        }

        match self.toks().peek_n(1) {
            Some(Token { kind, .. }) if kind.is_ascii_digit() => {}
            _ => {
                if allow_trailing_dot {
                    return Ok(());
                }
                return Err(("Expected digit.", self.toks().current_span()).into());
            }
        }

        self.expect_char('.')?;

        while matches!(self.toks().peek(), Some(t) if t.kind.is_ascii_digit()) {
            self.toks_mut().next();
        }

        Ok(())
    }

    fn try_exponent(&mut self) -> ParseResult<()> {
        if !matches!(
            self.toks().peek(),
            Some(Token {
                kind: 'e' | 'E',
                ..
            })
        ) {
            return Ok(());
        }

        let next = match self.toks().peek_n(1) {
            Some(Token {
                kind: kind @ ('0'..='9' | '-' | '+'),
                ..
            }) => kind,
            _ => return Ok(()),
        };

        self.toks_mut().next();

        if next == '+' || next == '-' {
            self.toks_mut().next();
        }

        if !matches!(self.toks().peek(), Some(t) if t.kind.is_ascii_digit()) {
            return Err(("Expected digit.", self.toks().current_span()).into());
        }

        while matches!(self.toks().peek(), Some(t) if t.kind.is_ascii_digit()) {
            self.toks_mut().next();
        }

        Ok(())
    }

    fn parse_hash(
        &mut self,
        predicate: Option<Predicate<'_, 'a>>,
    ) -> ParseResult<Spanned<Expr>> {
        debug_assert!(self.toks().next_char_is('#'));
        let start = self.toks().cursor();

        if matches!(self.toks().peek_n(1), Some(Token { kind: '{', .. })) {
            return self.parse_identifier_like(predicate);
        }

        self.expect_char('#')?;

        if matches!(self.toks().peek(), Some(t) if t.kind.is_ascii_digit()) {
            let color = self.parse_hex_color_contents(start)?;
            return Ok(Expr::Color(Arc::new(color)).span(self.toks().span_from(start)));
        }

        let after_hash = self.toks().cursor();
        let ident = self.parse_interpolated_identifier()?;
        if is_hex_color(&ident) {
            self.toks_mut().set_cursor(after_hash);
            let color = self.parse_hex_color_contents(start)?;
            return Ok(Expr::Color(Arc::new(color)).span(self.toks().span_from(start)));
        }

        let mut buffer = Interpolation::new();
        buffer.push_char('#');
        buffer.append(ident);

        let span = self.toks().span_from(start);

        Ok(Expr::String(StringExpr(buffer, QuoteKind::None), span).span(span))
    }

    fn parse_hex_digit(&mut self) -> ParseResult<u32> {
        match self.toks().peek() {
            Some(Token { kind, .. }) if kind.is_ascii_hexdigit() => {
                self.toks_mut().next();
                Ok(as_hex(kind))
            }
            _ => Err(("Expected hex digit.", self.toks().current_span()).into()),
        }
    }

    /// Parse 3, 4, 6, or 8 hex digits after the `#`. `hash` is the cursor of
    /// the `#` itself, for the literal source text.
    fn parse_hex_color_contents(&mut self, hash: usize) -> ParseResult<Color> {
        let digit1 = self.parse_hex_digit()?;
        let digit2 = self.parse_hex_digit()?;
        let digit3 = self.parse_hex_digit()?;

        let red: u32;
        let green: u32;
        let blue: u32;
        let mut alpha: f64 = 1.0;

        if self.next_is_hex() {
            let digit4 = self.parse_hex_digit()?;

            if self.next_is_hex() {
                red = (digit1 << 4) + digit2;
                green = (digit3 << 4) + digit4;
                blue = (self.parse_hex_digit()? << 4) + self.parse_hex_digit()?;

                if self.next_is_hex() {
                    alpha = f64::from((self.parse_hex_digit()? << 4) + self.parse_hex_digit()?)
                        / 255.0;
                }
            } else {
                // #abcd
                red = (digit1 << 4) + digit1;
                green = (digit2 << 4) + digit2;
                blue = (digit3 << 4) + digit3;
                alpha = f64::from((digit4 << 4) + digit4) / 255.0;
            }
        } else {
            // #abc
            red = (digit1 << 4) + digit1;
            green = (digit2 << 4) + digit2;
            blue = (digit3 << 4) + digit3;
        }

        Ok(Color::new_rgba(
            red as u8,
            green as u8,
            blue as u8,
            alpha,
            ColorFormat::Literal(self.toks().text_between(hash, self.toks().cursor())),
        ))
    }

    fn next_is_hex(&self) -> bool {
        matches!(self.toks().peek(), Some(t) if t.kind.is_ascii_hexdigit())
    }

    fn parse_identifier_like(
        &mut self,
        predicate: Option<Predicate<'_, 'a>>,
    ) -> ParseResult<Spanned<Expr>> {
        let start = self.toks().cursor();

        let identifier = self.parse_interpolated_identifier()?;
        let plain = identifier.as_plain().map(str::to_owned);

        if let Some(plain) = &plain {
            if plain == "not" {
                self.whitespace()?;
                let operand = self.parse_factor(predicate)?;
                let span = self.toks().span_from(start);
                return Ok(Expr::UnaryOp(UnaryOp::Not, Arc::new(operand.node), span).span(span));
            }

            let lower = plain.to_ascii_lowercase();

            if !self.toks().next_char_is('(') {
                match plain.as_str() {
                    "null" => return Ok(Expr::Null.span(self.toks().span_from(start))),
                    "true" => return Ok(Expr::True.span(self.toks().span_from(start))),
                    "false" => return Ok(Expr::False.span(self.toks().span_from(start))),
                    _ => {}
                }

                if let Some(&channels) = NAMED_COLORS.get(lower.as_str()) {
                    return Ok(
                        Expr::Color(Arc::new(Color::from_name(plain, channels)))
                            .span(self.toks().span_from(start)),
                    );
                }
            }

            if let Some(special) = self.try_parse_special_function(&lower, start)? {
                return Ok(special);
            }
        }

        match self.toks().peek() {
            Some(Token { kind: '(', .. }) => {
                if let Some(plain) = plain {
                    let arguments = self.parse_call_args()?;
                    let span = self.toks().span_from(start);
                    Ok(Expr::FunctionCall(FunctionCallExpr {
                        name: Identifier::from(plain),
                        arguments: Arc::new(arguments),
                        span,
                    })
                    .span(span))
                } else {
                    let arguments = self.parse_call_args()?;
                    let span = self.toks().span_from(start);
                    Ok(Expr::InterpolatedFunction(Arc::new(InterpolatedFunctionExpr {
                        name: identifier,
                        arguments,
                        span,
                    }))
                    .span(span))
                }
            }
            _ => {
                let span = self.toks().span_from(start);
                Ok(Expr::String(StringExpr(identifier, QuoteKind::None), span).span(span))
            }
        }
    }

    /// Functions whose arguments are preserved verbatim rather than parsed:
    /// `calc`, `element`, `expression`, legacy `progid:…` filters, and raw
    /// `url(…)` tokens.
    fn try_parse_special_function(
        &mut self,
        lower: &str,
        start: usize,
    ) -> ParseResult<Option<Spanned<Expr>>> {
        let normalized = unvendor(lower);
        let mut buffer;

        match normalized {
            "calc" | "element" | "expression" => {
                if !self.scan_char('(') {
                    return Ok(None);
                }

                buffer = Interpolation::plain(lower.to_owned());
                buffer.push_char('(');
            }
            "progid" => {
                if !self.scan_char(':') {
                    return Ok(None);
                }
                buffer = Interpolation::plain(lower.to_owned());
                buffer.push_char(':');

                while let Some(Token { kind, .. }) = self.toks().peek() {
                    if !kind.is_alphabetic() && kind != '.' {
                        break;
                    }
                    buffer.push_char(kind);
                    self.toks_mut().next();
                }
                self.expect_char('(')?;
                buffer.push_char('(');
            }
            "url" => {
                return Ok(self.try_url_contents(None)?.map(|contents| {
                    let span = self.toks().span_from(start);
                    Expr::String(StringExpr(contents, QuoteKind::None), span).span(span)
                }))
            }
            _ => return Ok(None),
        }

        buffer.append(self.parse_interpolated_declaration_value(false, true, true)?);
        self.expect_char(')')?;
        buffer.push_char(')');

        let span = self.toks().span_from(start);

        Ok(Some(
            Expr::String(StringExpr(buffer, QuoteKind::None), span).span(span),
        ))
    }
}

fn undelay(expr: Expr) -> Expr {
    if let Expr::BinaryOp(inner) = &expr {
        if inner.is_delayed {
            return Expr::BinaryOp(Arc::new(BinaryExpr {
                is_delayed: false,
                ..(**inner).clone()
            }));
        }
    }
    expr
}
