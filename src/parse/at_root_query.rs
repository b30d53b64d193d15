use std::collections::HashSet;

use crate::{ast::AtRootQuery, error::ParseResult, lexer::Lexer};

use super::BaseParser;

/// Parses the `(with: …)` / `(without: …)` query of an `@at-root` rule.
///
/// Names are collected verbatim; no keyword whitelist is enforced here.
pub(crate) struct AtRootQueryParser<'a> {
    toks: &'a mut Lexer,
}

impl BaseParser for AtRootQueryParser<'_> {
    fn toks(&self) -> &Lexer {
        self.toks
    }

    fn toks_mut(&mut self) -> &mut Lexer {
        self.toks
    }
}

impl<'a> AtRootQueryParser<'a> {
    pub fn new(toks: &'a mut Lexer) -> AtRootQueryParser<'a> {
        AtRootQueryParser { toks }
    }

    pub fn parse(&mut self) -> ParseResult<AtRootQuery> {
        self.expect_char('(')?;
        self.whitespace()?;
        let include = self.scan_identifier("with", false)?;

        if !include {
            self.expect_identifier("without", false)?;
        }

        self.whitespace()?;
        self.expect_char(':')?;
        self.whitespace()?;

        let mut names = HashSet::new();

        loop {
            names.insert(self.parse_identifier(false, false)?.to_ascii_lowercase());
            self.whitespace()?;

            if !self.looking_at_identifier() {
                break;
            }
        }

        self.expect_char(')')?;

        Ok(AtRootQuery::new(include, names))
    }
}
