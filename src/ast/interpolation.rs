use codemap::Spanned;

use super::Expr;

/// A string schema: literal text interleaved with `#{…}` expressions.
///
/// Selectors, identifiers, quoted strings, and declaration values that
/// contain interpolation all flatten into this shape. A schema with a single
/// text part is "plain" and equivalent to a constant string.
#[derive(Debug, Clone, Default)]
pub struct Interpolation {
    pub parts: Vec<InterpolationPart>,
}

#[derive(Debug, Clone)]
pub enum InterpolationPart {
    Text(String),
    Expr(Spanned<Expr>),
}

impl Interpolation {
    pub fn new() -> Self {
        Self { parts: Vec::new() }
    }

    pub fn plain(text: String) -> Self {
        Self {
            parts: vec![InterpolationPart::Text(text)],
        }
    }

    pub fn from_expr(expr: Spanned<Expr>) -> Self {
        Self {
            parts: vec![InterpolationPart::Expr(expr)],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn push_expr(&mut self, expr: Spanned<Expr>) {
        self.parts.push(InterpolationPart::Expr(expr));
    }

    pub fn push_str(&mut self, text: &str) {
        match self.parts.last_mut() {
            Some(InterpolationPart::Text(existing)) => existing.push_str(text),
            _ => self.parts.push(InterpolationPart::Text(text.to_owned())),
        }
    }

    pub fn push_char(&mut self, c: char) {
        match self.parts.last_mut() {
            Some(InterpolationPart::Text(existing)) => existing.push(c),
            _ => self.parts.push(InterpolationPart::Text(c.to_string())),
        }
    }

    /// Append all of `other`'s parts, merging adjacent text.
    pub fn append(&mut self, other: Self) {
        for part in other.parts {
            match part {
                InterpolationPart::Text(text) => self.push_str(&text),
                InterpolationPart::Expr(e) => self.push_expr(e),
            }
        }
    }

    /// The contents as a plain string, if no interpolation is present.
    pub fn as_plain(&self) -> Option<&str> {
        match self.parts.as_slice() {
            [] => Some(""),
            [InterpolationPart::Text(text)] => Some(text),
            _ => None,
        }
    }

    /// The leading literal text, which is empty if the schema begins with an
    /// interpolated expression.
    pub fn initial_plain(&self) -> &str {
        match self.parts.first() {
            Some(InterpolationPart::Text(text)) => text,
            _ => "",
        }
    }

    pub fn has_interpolants(&self) -> bool {
        self.parts
            .iter()
            .any(|p| matches!(p, InterpolationPart::Expr(..)))
    }
}
