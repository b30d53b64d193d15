use std::sync::Arc;

use codemap::{File, Span};

const FORM_FEED: char = '\x0C';

/// A single source character together with its byte offset in the file.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Token {
    pub kind: char,
    pos: u32,
}

/// A cursor over the tokenized source.
///
/// Carriage returns and form feeds are normalized to `\n` during
/// tokenization, but each token keeps the byte offset of the text it came
/// from, so spans always point back into the original buffer.
#[derive(Debug, Clone)]
pub(crate) struct Lexer {
    buf: Vec<Token>,
    file_span: Span,
    cursor: usize,
    /// Set when this lexer was built over text that is longer than the span
    /// it is attributed to (re-parsed interpolation output). Offsets are
    /// meaningless in that case, so every query answers with the whole span.
    is_synthetic: bool,
}

fn tokenize(src: &str) -> Vec<Token> {
    let mut buf = Vec::with_capacity(src.len());
    let mut chars = src.chars().peekable();
    let mut pos = 0_u32;

    while let Some(c) = chars.next() {
        let mut len = c.len_utf8() as u32;
        let kind = match c {
            FORM_FEED => '\n',
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                    len += 1;
                }
                '\n'
            }
            c => c,
        };
        buf.push(Token { kind, pos });
        pos += len;
    }

    buf
}

impl Lexer {
    pub fn new_from_file(file: &Arc<File>) -> Self {
        Lexer {
            buf: tokenize(file.source()),
            file_span: file.span,
            cursor: 0,
            is_synthetic: false,
        }
    }

    pub fn new_from_string(src: &str, file_span: Span) -> Self {
        Lexer {
            is_synthetic: src.len() as u64 > file_span.len(),
            buf: tokenize(src),
            file_span,
            cursor: 0,
        }
    }

    pub fn peek(&self) -> Option<Token> {
        self.buf.get(self.cursor).copied()
    }

    /// Peek `n` tokens past the cursor without advancing.
    pub fn peek_n(&self, n: usize) -> Option<Token> {
        self.buf.get(self.cursor + n).copied()
    }

    /// Peek `n` tokens behind the cursor without moving it.
    pub fn peek_behind(&self, n: usize) -> Option<Token> {
        self.buf.get(self.cursor.checked_sub(n)?).copied()
    }

    pub fn next_char_is(&self, c: char) -> bool {
        matches!(self.peek(), Some(Token { kind, .. }) if kind == c)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
    }

    /// The text of the tokens between `start` and the cursor.
    pub fn raw_text(&self, start: usize) -> String {
        self.buf[start..self.cursor].iter().map(|t| t.kind).collect()
    }

    /// The number of tokens in the buffer.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// The character at an absolute token index.
    pub fn char_at(&self, idx: usize) -> Option<char> {
        self.buf.get(idx).map(|t| t.kind)
    }

    /// The text of the tokens in `[start, end)`, independent of the cursor.
    pub fn text_between(&self, start: usize, end: usize) -> String {
        self.buf[start.min(self.buf.len())..end.min(self.buf.len())]
            .iter()
            .map(|t| t.kind)
            .collect()
    }

    /// The span of the single token at `idx`, clamped to the final token
    /// when `idx` is out of range.
    fn span_at(&self, idx: usize) -> Span {
        if self.is_synthetic {
            return self.file_span;
        }

        let (start, len) = match self.buf.get(idx).or_else(|| self.buf.last()) {
            Some(tok) => (tok.pos, tok.kind.len_utf8()),
            None => (0, 0),
        };

        self.file_span
            .subspan(u64::from(start), u64::from(start) + len as u64)
    }

    /// The span covering everything from `start` through the most recently
    /// consumed token.
    pub fn span_from(&self, start: usize) -> Span {
        self.span_at(start).merge(self.prev_span())
    }

    /// The span of the most recently consumed token.
    pub fn prev_span(&self) -> Span {
        self.span_at(self.cursor.saturating_sub(1))
    }

    /// The span of the token at the cursor.
    pub fn current_span(&self) -> Span {
        self.span_at(self.cursor)
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let tok = self.buf.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(tok)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buf.len() - self.cursor.min(self.buf.len());
        (remaining, Some(remaining))
    }
}
