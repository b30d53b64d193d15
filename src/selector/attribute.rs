use std::fmt::{self, Display, Write};

use codemap::Span;

use crate::{error::ParseResult, lexer::Token, parse::BaseParser, utils::is_ident};

use super::{Namespace, QualifiedName, SelectorParser};

/// An attribute selector, e.g. `[href^="https" i]`.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub attr: QualifiedName,
    pub value: String,
    pub op: AttributeOp,
    /// A trailing case-sensitivity modifier such as `i` or `s`.
    pub modifier: Option<char>,
    pub span: Span,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum AttributeOp {
    /// `[attr]`: any value
    Any,
    /// `[attr=value]`
    Equals,
    /// `[attr~=value]`
    Include,
    /// `[attr|=value]`
    Dash,
    /// `[attr^=value]`
    Prefix,
    /// `[attr$=value]`
    Suffix,
    /// `[attr*=value]`
    Contains,
}

impl AttributeOp {
    fn as_str(self) -> &'static str {
        match self {
            AttributeOp::Any => "",
            AttributeOp::Equals => "=",
            AttributeOp::Include => "~=",
            AttributeOp::Dash => "|=",
            AttributeOp::Prefix => "^=",
            AttributeOp::Suffix => "$=",
            AttributeOp::Contains => "*=",
        }
    }
}

fn attribute_name(parser: &mut SelectorParser<'_>) -> ParseResult<QualifiedName> {
    match parser.toks().peek() {
        Some(Token { kind: '*', .. }) => {
            parser.toks_mut().next();
            parser.expect_char('|')?;
            let ident = parser.parse_identifier(false, false)?;
            return Ok(QualifiedName {
                ident,
                namespace: Namespace::Asterisk,
            });
        }
        Some(..) => {}
        None => return Err(("Expected identifier.", parser.toks().current_span()).into()),
    }

    let name_or_namespace = parser.parse_identifier(false, false)?;

    // A `|` not followed by `=` separates a namespace from the name.
    if !parser.toks().next_char_is('|')
        || matches!(parser.toks().peek_n(1), Some(Token { kind: '=', .. }))
    {
        return Ok(QualifiedName {
            ident: name_or_namespace,
            namespace: Namespace::None,
        });
    }

    parser.toks_mut().next();
    let ident = parser.parse_identifier(false, false)?;
    Ok(QualifiedName {
        ident,
        namespace: Namespace::Other(name_or_namespace.into_boxed_str()),
    })
}

fn attribute_operator(parser: &mut SelectorParser<'_>) -> ParseResult<AttributeOp> {
    let op = match parser.toks_mut().next() {
        Some(Token { kind: '=', .. }) => return Ok(AttributeOp::Equals),
        Some(Token { kind: '~', .. }) => AttributeOp::Include,
        Some(Token { kind: '|', .. }) => AttributeOp::Dash,
        Some(Token { kind: '^', .. }) => AttributeOp::Prefix,
        Some(Token { kind: '$', .. }) => AttributeOp::Suffix,
        Some(Token { kind: '*', .. }) => AttributeOp::Contains,
        Some(..) | None => return Err(("Expected \"]\".", parser.toks().current_span()).into()),
    };

    parser.expect_char('=')?;

    Ok(op)
}

impl Attribute {
    pub fn from_tokens(parser: &mut SelectorParser<'_>) -> ParseResult<Attribute> {
        let start = parser.toks().cursor();
        parser.whitespace_without_comments();

        let attr = attribute_name(parser)?;
        parser.whitespace_without_comments();

        if parser.scan_char(']') {
            return Ok(Attribute {
                attr,
                value: String::new(),
                modifier: None,
                op: AttributeOp::Any,
                span: parser.toks().span_from(start),
            });
        }

        let op = attribute_operator(parser)?;
        parser.whitespace_without_comments();

        let value = match parser.toks().peek() {
            Some(Token {
                kind: '\'' | '"', ..
            }) => parser.parse_string()?,
            Some(..) => parser.parse_identifier(false, false)?,
            None => return Err(("expected more input.", parser.toks().current_span()).into()),
        };
        parser.whitespace_without_comments();

        let modifier = match parser.toks().peek() {
            Some(Token { kind, .. }) if kind.is_ascii_alphabetic() => {
                parser.toks_mut().next();
                parser.whitespace_without_comments();
                Some(kind)
            }
            _ => None,
        };

        parser.expect_char(']')?;

        Ok(Attribute {
            op,
            attr,
            value,
            modifier,
            span: parser.toks().span_from(start),
        })
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('[')?;
        write!(f, "{}", self.attr)?;

        if self.op != AttributeOp::Any {
            f.write_str(self.op.as_str())?;
            if is_ident(&self.value) && !self.value.starts_with("--") {
                f.write_str(&self.value)?;
            } else {
                write!(f, "\"{}\"", self.value.replace('"', "\\\""))?;
            }
            if let Some(modifier) = self.modifier {
                f.write_char(' ')?;
                f.write_char(modifier)?;
            }
        }

        f.write_char(']')
    }
}
