use std::{
    error::Error as StdError,
    fmt::{self, Display},
};

use codemap::{Span, SpanLoc};

pub type ParseResult<T> = Result<T, Box<Error>>;

/// A fatal parse error.
///
/// During parsing, errors are raw `(message, Span)` pairs; before they are
/// returned to the caller the span is resolved against the code map into a
/// full location, and the `Display` implementation renders a framed report
/// quoting the offending source line:
///
/// ```text
/// Error: expected "}".
///   ╷
/// 3 │ a { color: red
///   │               ^
///   ╵
/// ./input.scss:3:15
/// ```
#[derive(Debug, Clone)]
pub struct Error {
    kind: ErrorKind,
}

#[derive(Debug, Clone)]
enum ErrorKind {
    /// An error that has not yet been resolved against the code map.
    Raw(String, Span),
    Located {
        message: String,
        loc: SpanLoc,
        unicode: bool,
    },
    Utf8 {
        offset: usize,
        byte: u8,
    },
    /// An error with no source location, e.g. a rejected byte-order mark.
    Message(String),
}

impl Error {
    pub(crate) fn raw(self) -> (String, Span) {
        match self.kind {
            ErrorKind::Raw(message, span) => (message, span),
            e => unreachable!("tried to read raw parts of a located error: {:?}", e),
        }
    }

    pub(crate) fn from_loc(message: String, loc: SpanLoc, unicode: bool) -> Self {
        Error {
            kind: ErrorKind::Located {
                message,
                loc,
                unicode,
            },
        }
    }

    pub(crate) fn invalid_utf8(offset: usize, byte: u8) -> Box<Self> {
        Box::new(Error {
            kind: ErrorKind::Utf8 { offset, byte },
        })
    }

    pub(crate) fn from_message(message: String) -> Self {
        Error {
            kind: ErrorKind::Message(message),
        }
    }

    /// The bare message, without the `Error: ` prefix or source context.
    ///
    /// Messages exist to assist debugging and may change between bugfix
    /// releases; they are not a stable API.
    pub fn message(&self) -> String {
        match &self.kind {
            ErrorKind::Raw(message, ..)
            | ErrorKind::Located { message, .. }
            | ErrorKind::Message(message) => message.clone(),
            ErrorKind::Utf8 { offset, byte } => {
                format!("Invalid UTF-8 byte 0x{:02X} at offset {}.", byte, offset)
            }
        }
    }

    /// The resolved source location, when one is available.
    pub fn location(&self) -> Option<&SpanLoc> {
        match &self.kind {
            ErrorKind::Located { loc, .. } => Some(loc),
            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (message, loc, unicode) = match &self.kind {
            ErrorKind::Located {
                message,
                loc,
                unicode,
            } => (message, loc, *unicode),
            ErrorKind::Utf8 { .. } | ErrorKind::Message(..) => {
                return writeln!(f, "Error: {}", self.message())
            }
            ErrorKind::Raw(..) => unreachable!("raw errors are resolved before display"),
        };

        let (top, bar, bottom) = if unicode {
            ('╷', '│', '╵')
        } else {
            (',', '|', '\'')
        };

        let line = loc.begin.line + 1;
        let col = loc.begin.column + 1;
        let gutter = " ".repeat(line.to_string().len() + 1);

        writeln!(f, "Error: {}", message)?;
        writeln!(f, "{}{}", gutter, top)?;
        writeln!(f, "{} {} {}", line, bar, loc.file.source_line(loc.begin.line))?;
        writeln!(
            f,
            "{}{} {}{}",
            gutter,
            bar,
            " ".repeat(loc.begin.column),
            "^".repeat(
                (loc.end.column.max(loc.begin.column) - loc.begin.column.min(loc.end.column))
                    .max(1)
            ),
        )?;
        writeln!(f, "{}{}", gutter, bottom)?;
        writeln!(f, "./{}:{}:{}", loc.file.name(), line, col)?;

        Ok(())
    }
}

impl From<(&str, Span)> for Box<Error> {
    fn from(error: (&str, Span)) -> Box<Error> {
        Box::new(Error {
            kind: ErrorKind::Raw(error.0.to_owned(), error.1),
        })
    }
}

impl From<(String, Span)> for Box<Error> {
    fn from(error: (String, Span)) -> Box<Error> {
        Box::new(Error {
            kind: ErrorKind::Raw(error.0, error.1),
        })
    }
}

impl StdError for Error {
    fn description(&self) -> &'static str {
        "stylesheet parse error"
    }
}
