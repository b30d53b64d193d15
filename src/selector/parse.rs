use codemap::Span;

use crate::{
    common::unvendor,
    error::ParseResult,
    lexer::{Lexer, Token},
    parse::BaseParser,
};

use super::{
    Attribute, Combinator, ComplexSelector, ComplexSelectorComponent, CompoundSelector, Namespace,
    Pseudo, QualifiedName, SelectorList, SimpleSelector,
};

/// Pseudo-class selectors whose argument is itself a selector list.
const SELECTOR_PSEUDO_CLASSES: [&str; 9] = [
    "not",
    "matches",
    "where",
    "is",
    "current",
    "any",
    "has",
    "host",
    "host-context",
];

/// Pseudo-element selectors whose argument is itself a selector list.
const SELECTOR_PSEUDO_ELEMENTS: [&str; 1] = ["slotted"];

#[derive(PartialEq)]
enum EatenWhitespace {
    None,
    Some,
    /// At least one newline was consumed.
    Newline,
}

/// Parses a concrete (interpolation-free) selector list.
///
/// Borrows the surrounding parser's token stream, so it can run either over
/// a region of the main source or over a freshly lexed string.
pub(crate) struct SelectorParser<'a> {
    toks: &'a mut Lexer,
    /// Whether `&` is legal here.
    allows_parent: bool,
    /// Whether `%placeholder` selectors are legal here.
    allows_placeholder: bool,
    span: Span,
    nesting: usize,
    max_nesting: usize,
}

impl BaseParser for SelectorParser<'_> {
    fn toks(&self) -> &Lexer {
        self.toks
    }

    fn toks_mut(&mut self) -> &mut Lexer {
        self.toks
    }
}

impl<'a> SelectorParser<'a> {
    pub fn new(
        toks: &'a mut Lexer,
        allows_parent: bool,
        allows_placeholder: bool,
        max_nesting: usize,
        span: Span,
    ) -> Self {
        Self {
            toks,
            allows_parent,
            allows_placeholder,
            span,
            nesting: 0,
            max_nesting,
        }
    }

    pub fn parse_selector_list(&mut self) -> ParseResult<SelectorList> {
        self.nesting += 1;
        if self.nesting > self.max_nesting {
            return Err(("Selector is too deeply nested.", self.span).into());
        }

        let start = self.toks.cursor();
        let mut components = vec![self.parse_complex_selector(false)?];

        self.whitespace()?;

        let mut line_break = false;

        while self.scan_char(',') {
            line_break = self.eat_whitespace() == EatenWhitespace::Newline || line_break;
            match self.toks.peek() {
                Some(Token { kind: ',', .. }) => continue,
                Some(..) => {}
                None => break,
            }
            components.push(self.parse_complex_selector(line_break)?);

            line_break = false;
        }

        self.nesting -= 1;

        Ok(SelectorList {
            components,
            span: self.toks.span_from(start),
        })
    }

    fn eat_whitespace(&mut self) -> EatenWhitespace {
        let text = self.raw_text(Self::whitespace);

        if text.contains('\n') {
            EatenWhitespace::Newline
        } else if !text.is_empty() {
            EatenWhitespace::Some
        } else {
            EatenWhitespace::None
        }
    }

    fn parse_complex_selector(&mut self, line_break: bool) -> ParseResult<ComplexSelector> {
        let mut components = Vec::new();

        loop {
            self.whitespace()?;

            match self.toks.peek() {
                Some(Token { kind: '+', .. }) => {
                    self.toks.next();
                    components.push(ComplexSelectorComponent::Combinator(
                        Combinator::NextSibling,
                    ));
                }
                Some(Token { kind: '>', .. }) => {
                    self.toks.next();
                    components.push(ComplexSelectorComponent::Combinator(Combinator::Child));
                }
                Some(Token { kind: '~', .. }) => {
                    self.toks.next();
                    components.push(ComplexSelectorComponent::Combinator(
                        Combinator::FollowingSibling,
                    ));
                }
                Some(Token {
                    kind: '[' | '.' | '#' | '%' | ':' | '&' | '*' | '|',
                    ..
                }) => {
                    components.push(ComplexSelectorComponent::Compound(
                        self.parse_compound_selector()?,
                    ));
                    if self.toks.next_char_is('&') {
                        return Err((
                            "\"&\" may only used at the beginning of a compound selector.",
                            self.span,
                        )
                            .into());
                    }
                }
                Some(..) => {
                    if !self.looking_at_identifier() {
                        break;
                    }
                    components.push(ComplexSelectorComponent::Compound(
                        self.parse_compound_selector()?,
                    ));
                    if self.toks.next_char_is('&') {
                        return Err((
                            "\"&\" may only used at the beginning of a compound selector.",
                            self.span,
                        )
                            .into());
                    }
                }
                None => break,
            }
        }

        if components.is_empty() {
            return Err(("expected selector.", self.span).into());
        }

        Ok(ComplexSelector {
            components,
            line_break,
        })
    }

    fn parse_compound_selector(&mut self) -> ParseResult<CompoundSelector> {
        let mut components = vec![self.parse_simple_selector(true)?];

        while matches!(self.toks.peek(), Some(Token { kind, .. }) if is_simple_selector_start(kind))
        {
            components.push(self.parse_simple_selector(false)?);
        }

        Ok(CompoundSelector { components })
    }

    /// Consume one simple selector. `first_in_compound` controls whether a
    /// parent selector is even considered; `&` may only begin a compound.
    fn parse_simple_selector(&mut self, first_in_compound: bool) -> ParseResult<SimpleSelector> {
        match self.toks.peek() {
            Some(Token { kind: '[', .. }) => {
                self.toks.next();
                Ok(SimpleSelector::Attribute(Box::new(Attribute::from_tokens(
                    self,
                )?)))
            }
            Some(Token { kind: '.', .. }) => {
                self.toks.next();
                Ok(SimpleSelector::Class(self.parse_identifier(false, false)?))
            }
            Some(Token { kind: '#', .. }) => {
                self.toks.next();
                Ok(SimpleSelector::Id(self.parse_identifier(false, false)?))
            }
            Some(Token { kind: '%', .. }) => {
                if !self.allows_placeholder {
                    return Err(("Placeholder selectors aren't allowed here.", self.span).into());
                }
                self.toks.next();
                Ok(SimpleSelector::Placeholder(
                    self.parse_identifier(false, false)?,
                ))
            }
            Some(Token { kind: ':', .. }) => self.parse_pseudo_selector(),
            Some(Token { kind: '&', .. }) => {
                if !first_in_compound || !self.allows_parent {
                    return Err(("Parent selectors aren't allowed here.", self.span).into());
                }
                self.parse_parent_selector()
            }
            _ => self.parse_type_or_universal_selector(),
        }
    }

    fn parse_parent_selector(&mut self) -> ParseResult<SimpleSelector> {
        self.toks.next();
        let suffix = if self.looking_at_identifier_body() {
            let mut buffer = String::new();
            self.parse_identifier_body(&mut buffer, false, false)?;
            Some(buffer)
        } else {
            None
        };
        Ok(SimpleSelector::Parent(suffix))
    }

    fn parse_pseudo_selector(&mut self) -> ParseResult<SimpleSelector> {
        self.toks.next();
        let element = self.scan_char(':');
        let name = self.parse_identifier(false, false)?;

        if !self.scan_char('(') {
            return Ok(SimpleSelector::Pseudo(Pseudo {
                is_class: !element && !is_fake_pseudo_element(&name),
                is_syntactic_class: !element,
                name,
                selector: None,
                argument: None,
                span: self.span,
            }));
        }

        self.whitespace()?;

        let unvendored = unvendor(&name);

        let mut argument: Option<Box<str>> = None;
        let mut selector: Option<Box<SelectorList>> = None;

        if element {
            if SELECTOR_PSEUDO_ELEMENTS.contains(&unvendored) {
                selector = Some(Box::new(self.parse_selector_list()?));
                self.whitespace()?;
            } else {
                argument = Some(self.declaration_value(true)?.into_boxed_str());
            }
            self.expect_char(')')?;
        } else if SELECTOR_PSEUDO_CLASSES.contains(&unvendored) {
            selector = Some(Box::new(self.parse_selector_list()?));
            self.whitespace()?;
            self.expect_char(')')?;
        } else if unvendored == "nth-child" || unvendored == "nth-last-child" {
            let mut arg = self.parse_a_n_plus_b()?;
            self.whitespace()?;

            let had_whitespace = matches!(
                self.toks.peek_behind(1),
                Some(Token {
                    kind: ' ' | '\t' | '\n',
                    ..
                })
            );
            if had_whitespace && !self.toks.next_char_is(')') {
                self.expect_identifier("of", false)?;
                arg.push_str(" of");
                self.whitespace()?;
                selector = Some(Box::new(self.parse_selector_list()?));
            }

            self.expect_char(')')?;
            argument = Some(arg.into_boxed_str());
        } else {
            argument = Some(
                self.declaration_value(true)?
                    .trim_end()
                    .to_owned()
                    .into_boxed_str(),
            );
            self.expect_char(')')?;
        }

        Ok(SimpleSelector::Pseudo(Pseudo {
            is_class: !element && !is_fake_pseudo_element(&name),
            is_syntactic_class: !element,
            name,
            selector,
            argument,
            span: self.span,
        }))
    }

    /// Type and universal selectors are combined because both may begin
    /// with `*` or a namespace qualifier.
    fn parse_type_or_universal_selector(&mut self) -> ParseResult<SimpleSelector> {
        match self.toks.peek() {
            Some(Token { kind: '*', .. }) => {
                self.toks.next();
                if self.scan_char('|') {
                    if self.scan_char('*') {
                        return Ok(SimpleSelector::Universal(Namespace::Asterisk));
                    }
                    return Ok(SimpleSelector::Type(QualifiedName {
                        ident: self.parse_identifier(false, false)?,
                        namespace: Namespace::Asterisk,
                    }));
                }
                return Ok(SimpleSelector::Universal(Namespace::None));
            }
            Some(Token { kind: '|', .. }) => {
                self.toks.next();
                if self.scan_char('*') {
                    return Ok(SimpleSelector::Universal(Namespace::Empty));
                }
                return Ok(SimpleSelector::Type(QualifiedName {
                    ident: self.parse_identifier(false, false)?,
                    namespace: Namespace::Empty,
                }));
            }
            _ => {}
        }

        let name_or_namespace = self.parse_identifier(false, false)?;

        if !self.toks.next_char_is('|') {
            return Ok(SimpleSelector::Type(QualifiedName {
                ident: name_or_namespace,
                namespace: Namespace::None,
            }));
        }

        self.toks.next();
        if self.scan_char('*') {
            return Ok(SimpleSelector::Universal(Namespace::Other(
                name_or_namespace.into_boxed_str(),
            )));
        }

        Ok(SimpleSelector::Type(QualifiedName {
            ident: self.parse_identifier(false, false)?,
            namespace: Namespace::Other(name_or_namespace.into_boxed_str()),
        }))
    }

    /// Consume an `An+B` production and return its text.
    fn parse_a_n_plus_b(&mut self) -> ParseResult<String> {
        let mut buf = String::new();

        match self.toks.peek() {
            Some(Token {
                kind: 'e' | 'E', ..
            }) => {
                self.expect_identifier("even", false)?;
                return Ok("even".to_owned());
            }
            Some(Token {
                kind: 'o' | 'O', ..
            }) => {
                self.expect_identifier("odd", false)?;
                return Ok("odd".to_owned());
            }
            Some(t @ Token {
                kind: '+' | '-', ..
            }) => {
                buf.push(t.kind);
                self.toks.next();
            }
            _ => {}
        }

        match self.toks.peek() {
            Some(t) if t.kind.is_ascii_digit() => {
                while matches!(self.toks.peek(), Some(t) if t.kind.is_ascii_digit()) {
                    buf.push(self.toks.next().unwrap().kind);
                }
                self.whitespace()?;
                if !self.scan_ident_char('n', false)? {
                    return Ok(buf);
                }
            }
            Some(..) => self.expect_ident_char('n', false)?,
            None => return Err(("expected more input.", self.span).into()),
        }

        buf.push('n');

        self.whitespace()?;

        if matches!(
            self.toks.peek(),
            Some(Token {
                kind: '+' | '-',
                ..
            })
        ) {
            buf.push(self.toks.next().unwrap().kind);
            self.whitespace()?;
            match self.toks.peek() {
                Some(t) if t.kind.is_ascii_digit() => {}
                _ => return Err(("Expected a number.", self.span).into()),
            }
            while matches!(self.toks.peek(), Some(t) if t.kind.is_ascii_digit()) {
                buf.push(self.toks.next().unwrap().kind);
            }
        }

        Ok(buf)
    }
}

/// Whether `c` can begin a simple selector other than a type selector.
fn is_simple_selector_start(c: char) -> bool {
    matches!(c, '*' | '[' | '.' | '#' | '%' | ':')
}

/// Whether `name` is a pseudo-element that may be written with single-colon
/// pseudo-class syntax.
fn is_fake_pseudo_element(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "after" | "before" | "first-line" | "first-letter"
    )
}
