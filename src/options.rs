use std::{fmt::Debug, path::Path};

use codemap::Span;

use crate::{Logger, StdLogger};

/// The default limit on nested expression / selector / ruleset recursion.
pub(crate) const DEFAULT_MAX_NESTING: usize = 512;

/// A custom importer consulted for every dynamic `@import` target.
///
/// Returning `true` claims the URL: the import is recorded as handled and
/// default resolution is suppressed. Implementations typically queue the
/// file for loading in a surrounding compilation driver.
pub trait Importer: Debug {
    fn import(&self, url: &str, containing_path: &Path, span: Span) -> bool;
}

/// Configuration for a parse.
///
/// The simplest usage is `Options::default()`; a builder interface offers
/// more control:
///
/// ```
/// let options = moss::Options::default().quiet(true);
/// ```
#[derive(Debug)]
pub struct Options<'a> {
    pub(crate) logger: &'a dyn Logger,
    pub(crate) quiet: bool,
    pub(crate) unicode_error_messages: bool,
    pub(crate) allows_charset: bool,
    pub(crate) max_nesting: usize,
    pub(crate) importers: Vec<&'a dyn Importer>,
    pub(crate) custom_header: Option<&'a str>,
}

impl Default for Options<'_> {
    fn default() -> Self {
        Self {
            logger: &StdLogger,
            quiet: false,
            unicode_error_messages: true,
            allows_charset: true,
            max_nesting: DEFAULT_MAX_NESTING,
            importers: Vec::new(),
            custom_header: None,
        }
    }
}

impl<'a> Options<'a> {
    /// Replace the warning sink. [`StdLogger`](crate::StdLogger) is used by
    /// default.
    #[must_use]
    pub fn logger(mut self, logger: &'a dyn Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Silence all warnings.
    #[must_use]
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Whether error reports may use unicode box-drawing characters.
    ///
    /// Defaults to `true`; set to `false` for plain-ASCII output.
    #[must_use]
    pub const fn unicode_error_messages(mut self, unicode: bool) -> Self {
        self.unicode_error_messages = unicode;
        self
    }

    /// Whether a top-level `@charset` declaration is accepted (and
    /// discarded). Defaults to `true`.
    #[must_use]
    pub const fn allows_charset(mut self, allows_charset: bool) -> Self {
        self.allows_charset = allows_charset;
        self
    }

    /// The recursion limit for nested expressions, selector schemas, and
    /// rulesets. Sources nesting deeper than this fail rather than
    /// overflowing the stack.
    #[must_use]
    pub const fn max_nesting(mut self, max_nesting: usize) -> Self {
        self.max_nesting = max_nesting;
        self
    }

    /// Register a custom importer. Importers are consulted in registration
    /// order for every dynamic `@import` target.
    #[must_use]
    pub fn importer(mut self, importer: &'a dyn Importer) -> Self {
        self.importers.push(importer);
        self
    }

    /// Source text parsed as statements and prepended to the root
    /// stylesheet. Nested files (parsed through importers) do not receive
    /// the header.
    #[must_use]
    pub const fn custom_header(mut self, header: &'a str) -> Self {
        self.custom_header = Some(header);
        self
    }
}
