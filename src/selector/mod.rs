use std::fmt::{self, Display, Write};

use codemap::Span;

pub use attribute::{Attribute, AttributeOp};
pub(crate) use parse::SelectorParser;

mod attribute;
mod parse;

/// A comma-separated list of complex selectors.
#[derive(Debug, Clone)]
pub struct SelectorList {
    pub components: Vec<ComplexSelector>,
    pub span: Span,
}

/// A sequence of compound selectors joined by combinators.
#[derive(Debug, Clone)]
pub struct ComplexSelector {
    pub components: Vec<ComplexSelectorComponent>,
    /// Whether the selector was preceded by a newline within its list, which
    /// an emitter reproduces.
    pub line_break: bool,
}

#[derive(Debug, Clone)]
pub enum ComplexSelectorComponent {
    Combinator(Combinator),
    Compound(CompoundSelector),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `>`
    Child,
    /// `+`
    NextSibling,
    /// `~`
    FollowingSibling,
}

/// Simple selectors not separated by whitespace or combinators.
#[derive(Debug, Clone)]
pub struct CompoundSelector {
    pub components: Vec<SimpleSelector>,
}

#[derive(Debug, Clone)]
pub enum SimpleSelector {
    /// `.name`
    Class(String),
    /// `#name`
    Id(String),
    /// `name`, `ns|name`
    Type(QualifiedName),
    /// `*`, `ns|*`
    Universal(Namespace),
    /// `:name`, `::name`, `:name(…)`
    Pseudo(Pseudo),
    /// `[attr]`, `[attr=value]`, …
    Attribute(Box<Attribute>),
    /// `%name`
    Placeholder(String),
    /// `&`, optionally with a suffix as in `&-item`
    Parent(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// `|name`: the empty namespace
    Empty,
    /// `*|name`: any namespace
    Asterisk,
    Other(Box<str>),
    /// No namespace qualifier written.
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub ident: String,
    pub namespace: Namespace,
}

#[derive(Debug, Clone)]
pub struct Pseudo {
    pub name: String,
    /// False for pseudo-elements (including the legacy single-colon
    /// spellings of `before`/`after`/`first-line`/`first-letter`).
    pub is_class: bool,
    /// Whether the source used one colon, regardless of what the name
    /// turned out to be.
    pub is_syntactic_class: bool,
    /// A raw argument, for pseudos like `:nth-child(2n+1)` or `:lang(fr)`.
    pub argument: Option<Box<str>>,
    /// A nested selector list, for pseudos like `:not(a, b)`.
    pub selector: Option<Box<SelectorList>>,
    pub span: Span,
}

impl Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, complex) in self.components.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", complex)?;
        }
        Ok(())
    }
}

impl Display for ComplexSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut last_was_compound = false;
        for component in &self.components {
            match component {
                ComplexSelectorComponent::Compound(compound) => {
                    if last_was_compound {
                        f.write_char(' ')?;
                    }
                    write!(f, "{}", compound)?;
                    last_was_compound = true;
                }
                ComplexSelectorComponent::Combinator(combinator) => {
                    write!(f, " {} ", combinator)?;
                    last_was_compound = false;
                }
            }
        }
        Ok(())
    }
}

impl Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match self {
            Combinator::Child => '>',
            Combinator::NextSibling => '+',
            Combinator::FollowingSibling => '~',
        })
    }
}

impl Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for component in &self.components {
            write!(f, "{}", component)?;
        }
        Ok(())
    }
}

impl Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Empty => f.write_char('|'),
            Namespace::Asterisk => f.write_str("*|"),
            Namespace::Other(name) => write!(f, "{}|", name),
            Namespace::None => Ok(()),
        }
    }
}

impl Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.namespace, self.ident)
    }
}

impl Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimpleSelector::Class(name) => write!(f, ".{}", name),
            SimpleSelector::Id(name) => write!(f, "#{}", name),
            SimpleSelector::Type(name) => write!(f, "{}", name),
            SimpleSelector::Universal(namespace) => write!(f, "{}*", namespace),
            SimpleSelector::Pseudo(pseudo) => write!(f, "{}", pseudo),
            SimpleSelector::Attribute(attribute) => write!(f, "{}", attribute),
            SimpleSelector::Placeholder(name) => write!(f, "%{}", name),
            SimpleSelector::Parent(None) => f.write_char('&'),
            SimpleSelector::Parent(Some(suffix)) => write!(f, "&{}", suffix),
        }
    }
}

impl Display for Pseudo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(':')?;
        if !self.is_syntactic_class {
            f.write_char(':')?;
        }
        f.write_str(&self.name)?;

        if self.argument.is_none() && self.selector.is_none() {
            return Ok(());
        }

        f.write_char('(')?;
        if let Some(argument) = &self.argument {
            f.write_str(argument)?;
            if self.selector.is_some() {
                f.write_char(' ')?;
            }
        }
        if let Some(selector) = &self.selector {
            write!(f, "{}", selector)?;
        }
        f.write_char(')')
    }
}
