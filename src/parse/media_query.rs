use crate::{ast::CssMediaQuery, error::ParseResult, lexer::Lexer};

use super::BaseParser;

/// Parses the restricted, plain-CSS media query grammar from resolved query
/// text. Features are kept as raw strings.
pub(crate) struct CssMediaQueryParser {
    toks: Lexer,
}

impl BaseParser for CssMediaQueryParser {
    fn toks(&self) -> &Lexer {
        &self.toks
    }

    fn toks_mut(&mut self) -> &mut Lexer {
        &mut self.toks
    }
}

impl CssMediaQueryParser {
    pub fn new(toks: Lexer) -> CssMediaQueryParser {
        CssMediaQueryParser { toks }
    }

    pub fn parse(&mut self) -> ParseResult<Vec<CssMediaQuery>> {
        let mut queries = Vec::new();
        loop {
            self.whitespace()?;
            queries.push(self.parse_media_query()?);
            self.whitespace()?;

            if !self.scan_char(',') {
                break;
            }
        }

        if self.toks.peek().is_some() {
            return Err(("expected no more input.", self.toks.current_span()).into());
        }

        Ok(queries)
    }

    fn parse_media_query(&mut self) -> ParseResult<CssMediaQuery> {
        if self.toks.next_char_is('(') {
            let mut conditions = vec![self.parse_media_in_parens()?];
            self.whitespace()?;

            let mut conjunction = true;

            if self.scan_identifier("and", false)? {
                self.expect_whitespace()?;
                conditions.append(&mut self.parse_media_logic_sequence("and")?);
            } else if self.scan_identifier("or", false)? {
                self.expect_whitespace()?;
                conjunction = false;
                conditions.append(&mut self.parse_media_logic_sequence("or")?);
            }

            return Ok(CssMediaQuery::condition(conditions, conjunction));
        }

        let mut modifier: Option<String> = None;
        let media_type: Option<String>;
        let identifier1 = self.parse_identifier(false, false)?;

        if identifier1.eq_ignore_ascii_case("not") {
            self.expect_whitespace()?;
            if !self.looking_at_identifier() {
                return Ok(CssMediaQuery::condition(
                    vec![format!("(not {})", self.parse_media_in_parens()?)],
                    true,
                ));
            }
        }

        self.whitespace()?;

        if !self.looking_at_identifier() {
            return Ok(CssMediaQuery::media_type(Some(identifier1), None, None));
        }

        let identifier2 = self.parse_identifier(false, false)?;

        if identifier2.eq_ignore_ascii_case("and") {
            self.expect_whitespace()?;
            media_type = Some(identifier1);
        } else {
            self.whitespace()?;
            modifier = Some(identifier1);
            media_type = Some(identifier2);
            if self.scan_identifier("and", false)? {
                // For example, "only screen and (color)".
                self.expect_whitespace()?;
            } else {
                // For example, "only screen".
                return Ok(CssMediaQuery::media_type(media_type, modifier, None));
            }
        }

        // Either `TYPE "and"` or `MODIFIER TYPE "and"` has been consumed.

        if self.scan_identifier("not", false)? {
            // For example, "screen and not (color)".
            self.expect_whitespace()?;
            return Ok(CssMediaQuery::media_type(
                media_type,
                modifier,
                Some(vec![format!("(not {})", self.parse_media_in_parens()?)]),
            ));
        }

        Ok(CssMediaQuery::media_type(
            media_type,
            modifier,
            Some(self.parse_media_logic_sequence("and")?),
        ))
    }

    fn parse_media_in_parens(&mut self) -> ParseResult<String> {
        self.expect_char('(')?;
        let result = format!("({})", self.declaration_value(false)?);
        self.expect_char(')')?;
        Ok(result)
    }

    fn parse_media_logic_sequence(&mut self, operator: &'static str) -> ParseResult<Vec<String>> {
        let mut result = Vec::new();
        loop {
            result.push(self.parse_media_in_parens()?);
            self.whitespace()?;
            if !self.scan_identifier(operator, false)? {
                return Ok(result);
            }
            self.expect_whitespace()?;
        }
    }
}
