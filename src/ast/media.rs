use std::fmt::{self, Write};

use codemap::{Span, Spanned};

use crate::{error::ParseResult, lexer::Lexer, parse::CssMediaQueryParser};

use super::{Expr, Interpolation};

/// One query of a `@media` rule's comma-separated list.
#[derive(Debug, Clone)]
pub struct MediaQuery {
    /// `not` or `only`, when present.
    pub modifier: Option<Interpolation>,
    /// The media type (`screen`, `print`, …); absent for feature-only
    /// queries like `(min-width: 600px)`.
    pub media_type: Option<Interpolation>,
    /// The `and`-joined feature expressions.
    pub features: Vec<MediaQueryExpression>,
    pub span: Span,
}

/// A feature expression within a media query.
#[derive(Debug, Clone)]
pub enum MediaQueryExpression {
    /// A parenthesized `(name)` or `(name: value)` pair.
    Feature {
        name: Spanned<Expr>,
        value: Option<Spanned<Expr>>,
        span: Span,
    },
    /// A bare `#{…}` standing in for an entire feature expression.
    Interpolation(Interpolation, Span),
}

/// The restricted, plain-CSS form of a media query.
///
/// Produced by [`CssMediaQuery::parse_list`] from already-resolved query
/// text; features are preserved as raw strings.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct CssMediaQuery {
    pub modifier: Option<String>,
    pub media_type: Option<String>,
    pub conditions: Vec<String>,
    /// False when the conditions were joined with `or` rather than `and`.
    pub conjunction: bool,
}

impl CssMediaQuery {
    pub fn condition(conditions: Vec<String>, conjunction: bool) -> Self {
        Self {
            modifier: None,
            media_type: None,
            conditions,
            conjunction,
        }
    }

    pub fn media_type(
        media_type: Option<String>,
        modifier: Option<String>,
        conditions: Option<Vec<String>>,
    ) -> Self {
        Self {
            modifier,
            conjunction: true,
            media_type,
            conditions: conditions.unwrap_or_default(),
        }
    }

    pub fn matches_all_types(&self) -> bool {
        self.media_type.is_none()
            || self
                .media_type
                .as_ref()
                .map_or(false, |v| v.eq_ignore_ascii_case("all"))
    }

    /// Parse a comma-separated query list from plain text.
    pub fn parse_list(list: &str, span: Span) -> ParseResult<Vec<Self>> {
        CssMediaQueryParser::new(Lexer::new_from_string(list, span)).parse()
    }
}

impl fmt::Display for CssMediaQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(modifier) = &self.modifier {
            f.write_str(modifier)?;
            f.write_char(' ')?;
        }

        if let Some(media_type) = &self.media_type {
            f.write_str(media_type)?;
            if !self.conditions.is_empty() {
                f.write_str(" and ")?;
            }
        }

        f.write_str(&self.conditions.join(if self.conjunction { " and " } else { " or " }))
    }
}
