use std::sync::Arc;

use codemap::{Span, Spanned};

use crate::{
    color::Color,
    common::{BinaryOp, Brackets, Identifier, ListSeparator, QuoteKind, UnaryOp},
    unit::Unit,
};

use super::{CallArgs, Interpolation};

#[derive(Debug, Clone)]
pub struct ListExpr {
    pub elems: Vec<Spanned<Expr>>,
    pub separator: ListSeparator,
    pub brackets: Brackets,
}

/// A map literal: parenthesized `key: value` pairs.
///
/// Well-formedness (alternating keys and values, i.e. an even entry count)
/// is guaranteed by construction: the parser only ever pushes complete
/// pairs. A parenthesized expression without a colon never becomes a map.
#[derive(Debug, Clone, Default)]
pub struct MapExpr(pub Vec<(Spanned<Expr>, Spanned<Expr>)>);

#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub lhs: Expr,
    pub rhs: Expr,
    /// Set on a `/` expression whose operands are both literal enough that a
    /// compressed emitter must reproduce the source form (`16px/24px`)
    /// instead of dividing. Nesting under another operator clears it.
    pub is_delayed: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FunctionCallExpr {
    pub name: Identifier,
    pub arguments: Arc<CallArgs>,
    pub span: Span,
}

/// A call whose name itself contains interpolation, e.g. `url-#{$kind}(…)`.
#[derive(Debug, Clone)]
pub struct InterpolatedFunctionExpr {
    pub name: Interpolation,
    pub arguments: CallArgs,
    pub span: Span,
}

/// A string, quoted or not, possibly containing interpolation.
#[derive(Debug, Clone)]
pub struct StringExpr(pub Interpolation, pub QuoteKind);

impl StringExpr {
    /// A constant (interpolation-free) unquoted string.
    pub fn constant(text: String) -> Self {
        StringExpr(Interpolation::plain(text), QuoteKind::None)
    }

    fn best_quote<'a>(strings: impl Iterator<Item = &'a str>) -> char {
        let mut contains_double_quote = false;
        for s in strings {
            for c in s.chars() {
                if c == '\'' {
                    return '"';
                }
                if c == '"' {
                    contains_double_quote = true;
                }
            }
        }
        if contains_double_quote {
            '\''
        } else {
            '"'
        }
    }

    /// Flatten into an interpolation, re-quoting a quoted string so the
    /// schema text round-trips.
    pub fn as_interpolation(self) -> Interpolation {
        use super::InterpolationPart;

        if self.1 == QuoteKind::None {
            return self.0;
        }

        let quote = Self::best_quote(self.0.parts.iter().filter_map(|part| match part {
            InterpolationPart::Expr(..) => None,
            InterpolationPart::Text(text) => Some(text.as_str()),
        }));

        let mut buffer = Interpolation::new();
        buffer.push_char(quote);

        for part in self.0.parts {
            match part {
                InterpolationPart::Expr(e) => buffer.push_expr(e),
                InterpolationPart::Text(text) => {
                    for c in text.chars() {
                        if c == '\n' {
                            buffer.push_str("\\a");
                        } else {
                            if c == quote || c == '\\' {
                                buffer.push_char('\\');
                            }
                            buffer.push_char(c);
                        }
                    }
                }
            }
        }

        buffer.push_char(quote);

        buffer
    }
}

#[derive(Debug, Clone)]
pub enum Expr {
    BinaryOp(Arc<BinaryExpr>),
    UnaryOp(UnaryOp, Arc<Self>, Span),
    True,
    False,
    Null,
    Color(Arc<Color>),
    Number {
        value: f64,
        unit: Unit,
        /// Whether a value below 1 was written with a leading zero
        /// (`0.5` rather than `.5`).
        leading_zero: bool,
    },
    String(StringExpr, Span),
    List(ListExpr),
    Map(MapExpr),
    Paren(Arc<Self>),
    ParentSelector,
    Variable {
        name: Spanned<Identifier>,
    },
    FunctionCall(FunctionCallExpr),
    InterpolatedFunction(Arc<InterpolatedFunctionExpr>),
}

impl Expr {
    pub const fn span(self, span: Span) -> Spanned<Self> {
        Spanned { node: self, span }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable { .. })
    }

    /// Whether this expression may appear on either side of a delayed
    /// division: number literals, and divisions that are themselves delayed.
    pub fn is_slash_operand(&self) -> bool {
        match self {
            Self::Number { .. } => true,
            Self::BinaryOp(inner) => inner.is_delayed,
            _ => false,
        }
    }

    /// Construct a delayed division, preserving `16px/24px` as written.
    pub fn slash(lhs: Self, rhs: Self, span: Span) -> Self {
        Self::BinaryOp(Arc::new(BinaryExpr {
            op: BinaryOp::Div,
            lhs,
            rhs,
            is_delayed: true,
            span,
        }))
    }
}
