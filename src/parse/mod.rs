pub(crate) use at_root_query::AtRootQueryParser;
pub(crate) use base::BaseParser;
pub(crate) use lookahead::Lookahead;
pub(crate) use media_query::CssMediaQueryParser;
pub(crate) use stylesheet::Parser;

mod at_root_query;
mod base;
mod lookahead;
mod media_query;
mod stylesheet;
mod value;

/// Identifiers that may not be used as function names.
pub(crate) const RESERVED_IDENTIFIERS: [&str; 8] = [
    "and", "else", "false", "if", "not", "null", "or", "true",
];
