use crate::{
    error::ParseResult,
    lexer::{Lexer, Token},
    utils::{as_hex, hex_char_for, is_name, is_name_start, opposite_bracket},
};

/// How many visible characters of context a framed error quotes on each
/// side of the failure position.
const ERROR_CONTEXT_WIDTH: usize = 15;

/// The matcher layer shared by every parser in the crate.
///
/// Implementors only supply access to their token stream; everything else is
/// a default method. All matchers follow the same discipline: `scan_*`
/// methods consume on success and restore the cursor on failure, `peek`-style
/// methods never consume, and `expect_*` methods fail the parse.
pub(crate) trait BaseParser {
    fn toks(&self) -> &Lexer;
    fn toks_mut(&mut self) -> &mut Lexer;

    fn whitespace_without_comments(&mut self) {
        while matches!(
            self.toks().peek(),
            Some(Token {
                kind: ' ' | '\t' | '\n',
                ..
            })
        ) {
            self.toks_mut().next();
        }
    }

    /// Skip whitespace and comments of both kinds.
    fn whitespace(&mut self) -> ParseResult<()> {
        loop {
            self.whitespace_without_comments();

            if !self.scan_comment()? {
                break;
            }
        }

        Ok(())
    }

    fn scan_comment(&mut self) -> ParseResult<bool> {
        if !self.toks().next_char_is('/') {
            return Ok(false);
        }

        Ok(match self.toks().peek_n(1) {
            Some(Token { kind: '/', .. }) => {
                self.skip_silent_comment();
                true
            }
            Some(Token { kind: '*', .. }) => {
                self.skip_loud_comment()?;
                true
            }
            _ => false,
        })
    }

    fn skip_silent_comment(&mut self) {
        debug_assert!(self.next_matches("//"));
        while let Some(tok) = self.toks_mut().next() {
            if tok.kind == '\n' {
                break;
            }
        }
    }

    fn skip_loud_comment(&mut self) -> ParseResult<()> {
        debug_assert!(self.next_matches("/*"));
        self.toks_mut().next();
        self.toks_mut().next();

        while let Some(next) = self.toks_mut().next() {
            if next.kind != '*' {
                continue;
            }

            while self.scan_char('*') {}

            if self.scan_char('/') {
                return Ok(());
            }
        }

        Err(("expected more input.", self.toks().current_span()).into())
    }

    fn next_matches(&self, s: &str) -> bool {
        for (idx, c) in s.chars().enumerate() {
            match self.toks().peek_n(idx) {
                Some(Token { kind, .. }) if kind == c => {}
                _ => return false,
            }
        }

        true
    }

    fn scan_char(&mut self, c: char) -> bool {
        if self.toks().next_char_is(c) {
            self.toks_mut().next();
            return true;
        }

        false
    }

    fn expect_char(&mut self, c: char) -> ParseResult<()> {
        if self.scan_char(c) {
            return Ok(());
        }

        Err((format!("expected \"{}\".", c), self.toks().current_span()).into())
    }

    fn expect_whitespace(&mut self) -> ParseResult<()> {
        if !matches!(
            self.toks().peek(),
            Some(Token {
                kind: ' ' | '\t' | '\n',
                ..
            })
        ) && !self.scan_comment()?
        {
            return Err(("Expected whitespace.", self.toks().current_span()).into());
        }

        self.whitespace()?;

        Ok(())
    }

    /// Whether the cursor sits immediately before a plain CSS identifier.
    fn looking_at_identifier(&self) -> bool {
        match self.toks().peek() {
            Some(Token { kind, .. }) if is_name_start(kind) || kind == '\\' => return true,
            Some(Token { kind: '-', .. }) => {}
            Some(..) | None => return false,
        }

        matches!(
            self.toks().peek_n(1),
            Some(Token { kind, .. }) if is_name_start(kind) || kind == '-' || kind == '\\'
        )
    }

    fn looking_at_identifier_body(&self) -> bool {
        matches!(self.toks().peek(), Some(t) if is_name(t.kind) || t.kind == '\\')
    }

    /// Parse an identifier. With `normalize`, underscores become hyphens;
    /// with `unit`, a hyphen followed by a digit or dot ends the identifier
    /// so that `10px-5px` splits into two dimension tokens.
    fn parse_identifier(&mut self, normalize: bool, unit: bool) -> ParseResult<String> {
        let mut text = String::new();

        if self.scan_char('-') {
            text.push('-');

            if self.scan_char('-') {
                text.push('-');
                self.parse_identifier_body(&mut text, normalize, unit)?;
                return Ok(text);
            }
        }

        match self.toks().peek() {
            Some(Token { kind: '_', .. }) if normalize => {
                self.toks_mut().next();
                text.push('-');
            }
            Some(Token { kind, .. }) if is_name_start(kind) => {
                self.toks_mut().next();
                text.push(kind);
            }
            Some(Token { kind: '\\', .. }) => {
                text.push_str(&self.parse_escape(true)?);
            }
            Some(..) | None => {
                return Err(("Expected identifier.", self.toks().current_span()).into())
            }
        }

        self.parse_identifier_body(&mut text, normalize, unit)?;

        Ok(text)
    }

    fn parse_identifier_body(
        &mut self,
        buffer: &mut String,
        normalize: bool,
        unit: bool,
    ) -> ParseResult<()> {
        while let Some(tok) = self.toks().peek() {
            if unit && tok.kind == '-' {
                let second = match self.toks().peek_n(1) {
                    Some(v) => v,
                    None => break,
                };

                if second.kind == '.' || second.kind.is_ascii_digit() {
                    break;
                }

                self.toks_mut().next();
                buffer.push('-');
            } else if normalize && tok.kind == '_' {
                self.toks_mut().next();
                buffer.push('-');
            } else if is_name(tok.kind) {
                self.toks_mut().next();
                buffer.push(tok.kind);
            } else if tok.kind == '\\' {
                buffer.push_str(&self.parse_escape(false)?);
            } else {
                break;
            }
        }

        Ok(())
    }

    /// Parse a backslash escape, returning its normalized text form.
    fn parse_escape(&mut self, identifier_start: bool) -> ParseResult<String> {
        let start = self.toks().cursor();
        self.expect_char('\\')?;

        let mut value = 0;
        let first = match self.toks().peek() {
            Some(t) => t,
            None => return Err(("Expected expression.", self.toks().current_span()).into()),
        };

        if first.kind == '\n' {
            return Err(("Expected escape sequence.", self.toks().current_span()).into());
        } else if first.kind.is_ascii_hexdigit() {
            for _ in 0..6 {
                let next = match self.toks().peek() {
                    Some(t) => t,
                    None => break,
                };
                if !next.kind.is_ascii_hexdigit() {
                    break;
                }
                value = value * 16 + as_hex(next.kind);
                self.toks_mut().next();
            }
            if matches!(
                self.toks().peek(),
                Some(Token {
                    kind: ' ' | '\t' | '\n',
                    ..
                })
            ) {
                self.toks_mut().next();
            }
        } else {
            value = first.kind as u32;
            self.toks_mut().next();
        }

        let c = std::char::from_u32(value)
            .ok_or_else(|| ("Invalid Unicode code point.", self.toks().span_from(start)))?;

        if (identifier_start && is_name_start(c) && !c.is_ascii_digit())
            || (!identifier_start && is_name(c))
        {
            Ok(c.to_string())
        } else if value <= 0x1F || value == 0x7F || (identifier_start && c.is_ascii_digit()) {
            let mut buf = String::with_capacity(4);
            buf.push('\\');
            if value > 0xF {
                buf.push(hex_char_for(value >> 4));
            }
            buf.push(hex_char_for(value & 0xF));
            buf.push(' ');
            Ok(buf)
        } else {
            Ok(format!("\\{}", c))
        }
    }

    fn consume_escaped_char(&mut self) -> ParseResult<char> {
        self.expect_char('\\')?;

        match self.toks().peek() {
            None => Ok('\u{FFFD}'),
            Some(Token { kind: '\n', .. }) => {
                Err(("Expected escape sequence.", self.toks().current_span()).into())
            }
            Some(Token { kind, .. }) if kind.is_ascii_hexdigit() => {
                let mut value = 0;
                for _ in 0..6 {
                    let next = match self.toks().peek() {
                        Some(c) => c,
                        None => break,
                    };
                    if !next.kind.is_ascii_hexdigit() {
                        break;
                    }
                    self.toks_mut().next();
                    value = (value << 4) + as_hex(next.kind);
                }

                if matches!(self.toks().peek(), Some(t) if t.kind.is_ascii_whitespace()) {
                    self.toks_mut().next();
                }

                if value == 0 || (0xD800..=0xDFFF).contains(&value) || value >= 0x0010_FFFF {
                    Ok('\u{FFFD}')
                } else {
                    Ok(char::from_u32(value).unwrap_or('\u{FFFD}'))
                }
            }
            Some(Token { kind, .. }) => {
                self.toks_mut().next();
                Ok(kind)
            }
        }
    }

    /// Parse a quoted string, resolving escapes, and return its contents.
    fn parse_string(&mut self) -> ParseResult<String> {
        let quote = match self.toks_mut().next() {
            Some(Token {
                kind: q @ ('\'' | '"'),
                ..
            }) => q,
            Some(..) | None => {
                return Err(("Expected string.", self.toks().current_span()).into())
            }
        };

        let mut buffer = String::new();
        let mut found_closing_quote = false;

        while let Some(next) = self.toks().peek() {
            if next.kind == quote {
                self.toks_mut().next();
                found_closing_quote = true;
                break;
            } else if next.kind == '\n' {
                break;
            } else if next.kind == '\\' {
                if matches!(self.toks().peek_n(1), Some(Token { kind: '\n', .. })) {
                    self.toks_mut().next();
                    self.toks_mut().next();
                } else {
                    buffer.push(self.consume_escaped_char()?);
                }
            } else {
                self.toks_mut().next();
                buffer.push(next.kind);
            }
        }

        if !found_closing_quote {
            return Err((format!("Expected {}.", quote), self.toks().current_span()).into());
        }

        Ok(buffer)
    }

    /// Scan `ident` if it is the entire next identifier. Restores the cursor
    /// when the following characters continue the identifier instead.
    fn scan_identifier(&mut self, ident: &'static str, case_sensitive: bool) -> ParseResult<bool> {
        if !self.looking_at_identifier() {
            return Ok(false);
        }

        let start = self.toks().cursor();

        if self.consume_identifier(ident, case_sensitive)? && !self.looking_at_identifier_body() {
            Ok(true)
        } else {
            self.toks_mut().set_cursor(start);
            Ok(false)
        }
    }

    /// Like [`scan_identifier`](Self::scan_identifier), but never consumes.
    fn peek_identifier(&mut self, ident: &'static str) -> ParseResult<bool> {
        let start = self.toks().cursor();
        let result = self.scan_identifier(ident, false)?;
        self.toks_mut().set_cursor(start);
        Ok(result)
    }

    fn consume_identifier(&mut self, ident: &str, case_sensitive: bool) -> ParseResult<bool> {
        for c in ident.chars() {
            if !self.scan_ident_char(c, case_sensitive)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn scan_ident_char(&mut self, c: char, case_sensitive: bool) -> ParseResult<bool> {
        let matches = |actual: char| {
            if case_sensitive {
                actual == c
            } else {
                actual.eq_ignore_ascii_case(&c)
            }
        };

        Ok(match self.toks().peek() {
            Some(Token { kind, .. }) if matches(kind) => {
                self.toks_mut().next();
                true
            }
            Some(Token { kind: '\\', .. }) => {
                let start = self.toks().cursor();
                if matches(self.consume_escaped_char()?) {
                    return Ok(true);
                }
                self.toks_mut().set_cursor(start);
                false
            }
            Some(..) | None => false,
        })
    }

    fn expect_ident_char(&mut self, c: char, case_sensitive: bool) -> ParseResult<()> {
        if self.scan_ident_char(c, case_sensitive)? {
            return Ok(());
        }

        Err((format!("Expected \"{}\".", c), self.toks().current_span()).into())
    }

    fn expect_identifier(&mut self, ident: &str, case_sensitive: bool) -> ParseResult<()> {
        let start = self.toks().cursor();

        for c in ident.chars() {
            if !self.scan_ident_char(c, case_sensitive)? {
                return Err((
                    format!("Expected \"{}\".", ident),
                    self.toks().span_from(start),
                )
                    .into());
            }
        }

        if !self.looking_at_identifier_body() {
            return Ok(());
        }

        Err((
            format!("Expected \"{}\".", ident),
            self.toks().span_from(start),
        )
            .into())
    }

    fn parse_variable_name(&mut self) -> ParseResult<String> {
        self.expect_char('$')?;
        self.parse_identifier(true, false)
    }

    /// Run `func` and return the raw text it consumed.
    fn raw_text<T>(&mut self, func: impl Fn(&mut Self) -> T) -> String {
        let start = self.toks().cursor();
        func(self);
        self.toks().raw_text(start)
    }

    fn fallible_raw_text<T>(
        &mut self,
        func: impl Fn(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<String> {
        let start = self.toks().cursor();
        func(self)?;
        Ok(self.toks().raw_text(start))
    }

    /// Consume a plain CSS declaration value: anything balanced up to a
    /// top-level `;`, `}`, or unmatched closer. Quoted strings and loud
    /// comments pass through verbatim.
    fn declaration_value(&mut self, allow_empty: bool) -> ParseResult<String> {
        let mut buffer = String::new();

        let mut brackets = Vec::new();
        let mut wrote_newline = false;

        while let Some(tok) = self.toks().peek() {
            match tok.kind {
                '\\' => {
                    buffer.push_str(&self.parse_escape(true)?);
                    wrote_newline = false;
                }
                '"' | '\'' => {
                    buffer.push_str(&self.fallible_raw_text(Self::parse_string)?);
                    wrote_newline = false;
                }
                '/' => {
                    if matches!(self.toks().peek_n(1), Some(Token { kind: '*', .. })) {
                        buffer.push_str(&self.fallible_raw_text(Self::skip_loud_comment)?);
                    } else {
                        buffer.push('/');
                        self.toks_mut().next();
                    }

                    wrote_newline = false;
                }
                '#' => {
                    if matches!(self.toks().peek_n(1), Some(Token { kind: '{', .. })) {
                        // Interpolation is allowed but kept verbatim; this
                        // value will be re-parsed after evaluation.
                        buffer.push_str(&self.parse_identifier(false, false)?);
                    } else {
                        buffer.push('#');
                        self.toks_mut().next();
                    }

                    wrote_newline = false;
                }
                c @ (' ' | '\t') => {
                    if wrote_newline
                        || !self
                            .toks()
                            .peek_n(1)
                            .map_or(false, |tok| tok.kind.is_ascii_whitespace())
                    {
                        buffer.push(c);
                    }

                    self.toks_mut().next();
                }
                '\n' => {
                    if !wrote_newline {
                        buffer.push('\n');
                    }

                    wrote_newline = true;

                    self.toks_mut().next();
                }
                '[' | '(' | '{' => {
                    buffer.push(tok.kind);
                    self.toks_mut().next();
                    brackets.push(opposite_bracket(tok.kind));
                    wrote_newline = false;
                }
                ']' | ')' | '}' => {
                    if let Some(end) = brackets.pop() {
                        buffer.push(tok.kind);
                        self.expect_char(end)?;
                    } else {
                        break;
                    }

                    wrote_newline = false;
                }
                ';' => {
                    if brackets.is_empty() {
                        break;
                    }

                    self.toks_mut().next();
                    buffer.push(';');
                    wrote_newline = false;
                }
                'u' | 'U' => {
                    if let Some(url) = self.try_parse_url()? {
                        buffer.push_str(&url);
                    } else {
                        buffer.push(tok.kind);
                        self.toks_mut().next();
                    }

                    wrote_newline = false;
                }
                c => {
                    if self.looking_at_identifier() {
                        buffer.push_str(&self.parse_identifier(false, false)?);
                    } else {
                        self.toks_mut().next();
                        buffer.push(c);
                    }

                    wrote_newline = false;
                }
            }
        }

        if let Some(last) = brackets.pop() {
            self.expect_char(last)?;
        }

        if !allow_empty && buffer.is_empty() {
            return Err(("Expected token.", self.toks().current_span()).into());
        }

        Ok(buffer)
    }

    /// Try to consume a raw `url(…)` token. Returns `None` (with the cursor
    /// restored) when the contents require a function-call parse instead.
    fn try_parse_url(&mut self) -> ParseResult<Option<String>> {
        let start = self.toks().cursor();

        if !self.scan_identifier("url", false)? {
            return Ok(None);
        }

        if !self.scan_char('(') {
            self.toks_mut().set_cursor(start);
            return Ok(None);
        }

        self.whitespace()?;

        let mut buffer = "url(".to_owned();

        while let Some(next) = self.toks().peek() {
            match next.kind {
                '\\' => {
                    buffer.push_str(&self.parse_escape(false)?);
                }
                '!' | '#' | '%' | '&' | '*'..='~' | '\u{80}'..=char::MAX => {
                    self.toks_mut().next();
                    buffer.push(next.kind);
                }
                ')' => {
                    self.toks_mut().next();
                    buffer.push(next.kind);

                    return Ok(Some(buffer));
                }
                ' ' | '\t' | '\n' => {
                    self.whitespace_without_comments();

                    if !self.toks().next_char_is(')') {
                        break;
                    }
                }
                _ => break,
            }
        }

        self.toks_mut().set_cursor(start);
        Ok(None)
    }

    /// Build the message of a context-quoting error: the source on each side
    /// of the cursor, clipped to the nearest line boundary or
    /// [`ERROR_CONTEXT_WIDTH`] visible characters, with ellipses marking
    /// truncation. The result reads
    /// `Invalid CSS after "a { color:": expected expression, was "; }"`.
    fn framed_error_text(&self, prefix: &str, middle: &str) -> String {
        let toks = self.toks();
        let pos = toks.cursor().min(toks.len());

        // Walk left past insignificant trailing whitespace.
        let mut left_end = pos;
        while left_end > 0 {
            match toks.char_at(left_end - 1) {
                Some(c) if c.is_ascii_whitespace() => left_end -= 1,
                _ => break,
            }
        }

        let mut left_start = left_end;
        let mut ellipsis_left = false;
        while left_start > 0 {
            match toks.char_at(left_start - 1) {
                Some('\n') | None => break,
                Some(..) if left_end - left_start >= ERROR_CONTEXT_WIDTH => {
                    ellipsis_left = true;
                    break;
                }
                Some(..) => left_start -= 1,
            }
        }

        let mut right_end = pos;
        let mut ellipsis_right = false;
        while right_end < toks.len() {
            match toks.char_at(right_end) {
                Some('\n') | None => break,
                Some(..) if right_end - pos >= ERROR_CONTEXT_WIDTH => {
                    ellipsis_right = true;
                    break;
                }
                Some(..) => right_end += 1,
            }
        }

        let mut left = toks.text_between(left_start, left_end);
        let mut right = toks.text_between(pos, right_end);

        if ellipsis_left {
            left = format!("...{}", left);
        }
        if ellipsis_right {
            right.push_str("...");
        }

        format!("{}\"{}\"{}\"{}\"", prefix, left, middle, right)
    }
}
