/*!
This crate is the parser core of a compiler for nested stylesheets, an
SCSS-style superset of CSS. It consumes a UTF-8 source buffer and produces a
spanned abstract syntax tree suitable for evaluation, selector extension,
and output generation by later phases.

Parsing is fail-fast: the first syntax error aborts with a single
diagnostic carrying the source location and a framed excerpt of the
offending line. There is no error recovery and no partial AST.

## Usage

```
fn main() -> Result<(), Box<moss::Error>> {
    let stylesheet = moss::parse_stylesheet(
        "a { color: red; }".to_owned(),
        "input.scss",
        &moss::Options::default(),
    )?;
    assert_eq!(stylesheet.body.len(), 1);
    Ok(())
}
```

Sources that may not be UTF-8 (or may begin with a byte-order mark for a
different encoding) go through [`parse_bytes`], which performs BOM
detection and UTF-8 validation first.
*/

#![warn(clippy::all, clippy::cargo, clippy::dbg_macro)]
#![deny(missing_debug_implementations)]
#![allow(
    clippy::use_self,
    clippy::missing_docs_in_private_items,
    clippy::module_name_repetitions,
    clippy::new_ret_no_self,
    clippy::single_match,
    clippy::single_match_else,
    clippy::option_if_let_else,
    clippy::derive_partial_eq_without_eq,
    clippy::too_many_lines,
    clippy::cast_possible_truncation,
    clippy::redundant_pub_crate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::wrong_self_convention,
    clippy::items_after_statements,
    clippy::float_cmp,
    clippy::wildcard_imports,
    clippy::uninlined_format_args
)]

use std::path::Path;

use codemap::CodeMap;

use crate::{bom::Bom, lexer::Lexer, parse::Parser};

pub use crate::error::{Error, ParseResult};
pub use crate::logger::{Logger, NullLogger, StdLogger};
pub use crate::options::{Importer, Options};
pub use codemap;

pub mod ast;

mod bom;
mod color;
mod common;
mod error;
mod interner;
mod lexer;
mod logger;
mod options;
mod parse;
mod scope;
pub mod selector;
mod unit;
mod utils;

pub mod value {
    pub use crate::color::{Color, ColorFormat};
    pub use crate::common::{BinaryOp, Brackets, Identifier, ListSeparator, QuoteKind, UnaryOp};
    pub use crate::interner::InternedString;
    pub use crate::unit::Unit;
}

fn raw_to_parse_error(map: &CodeMap, err: Error, unicode: bool) -> Box<Error> {
    let (message, span) = err.raw();
    Box::new(Error::from_loc(message, map.look_up_span(span), unicode))
}

/// Parse a stylesheet from an already-validated UTF-8 string.
pub fn parse_stylesheet<P: AsRef<Path>>(
    input: String,
    file_name: P,
    options: &Options,
) -> ParseResult<ast::StyleSheet> {
    let mut map = CodeMap::new();
    let path = file_name.as_ref();
    let file = map.add_file(path.to_string_lossy().into_owned(), input);
    let empty_span = file.span.subspan(0, 0);
    let lexer = Lexer::new_from_file(&file);

    let mut parser = Parser::new(lexer, &map, options, empty_span, path);

    parser
        .parse()
        .map_err(|e| raw_to_parse_error(&map, *e, options.unicode_error_messages))
}

/// Parse a stylesheet from raw bytes.
///
/// A UTF-8 byte-order mark is skipped. A BOM identifying any other encoding
/// fails with that encoding's name, and input that is not valid UTF-8 fails
/// naming the first offending byte offset.
pub fn parse_bytes<P: AsRef<Path>>(
    input: Vec<u8>,
    file_name: P,
    options: &Options,
) -> ParseResult<ast::StyleSheet> {
    let skip = match bom::sniff_bom(&input) {
        Bom::Utf8(len) => len,
        Bom::Foreign(encoding) => {
            return Err(Box::new(Error::from_message(format!(
                "only UTF-8 documents are currently supported; your document appears to be {}",
                encoding
            ))))
        }
        Bom::None => 0,
    };

    let text = match std::str::from_utf8(&input[skip..]) {
        Ok(text) => text.to_owned(),
        Err(e) => {
            let offset = skip + e.valid_up_to();
            return Err(Error::invalid_utf8(offset, input[offset]));
        }
    };

    parse_stylesheet(text, file_name, options)
}
