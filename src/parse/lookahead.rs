//! Cursor-preserving lookahead probes.
//!
//! Statement dispatch has to decide between a ruleset and a declaration (and
//! between a static selector and a selector schema) before committing to
//! either. These probes scan ahead over a selector- or value-shaped region
//! without consuming anything and report what they saw.

use crate::utils::is_name;

use super::{BaseParser, Parser};

/// The report of a lookahead probe.
///
/// `found` carries the cursor of the terminator that makes the region
/// usable for the probe's purpose (`{` or `(` for selectors, additionally
/// `;` and `}` for extend targets). `position` is where the scan stopped
/// regardless. `parsable` is true when the region can go straight to the
/// static selector parser, i.e. when it contains no interpolation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Lookahead {
    pub found: Option<usize>,
    pub position: usize,
    /// True when the region did not look selector-shaped at all.
    pub errored: bool,
    pub has_interpolants: bool,
    pub is_custom_property: bool,
    pub parsable: bool,
}

impl Lookahead {
    fn empty(at: usize) -> Self {
        Lookahead {
            found: None,
            position: at,
            errored: true,
            has_interpolants: false,
            is_custom_property: false,
            parsable: true,
        }
    }
}

/// Characters that may appear in a selector list outside of brackets,
/// besides name characters.
fn is_selector_char(c: char) -> bool {
    is_name(c)
        || matches!(
            c,
            ' ' | '\t'
                | '\n'
                | ','
                | '.'
                | '#'
                | ':'
                | '&'
                | '*'
                | '%'
                | '|'
                | '~'
                | '>'
                | '+'
                | '='
                | '^'
                | '$'
        )
}

impl Parser<'_> {
    /// Skip a `#{`-opened scope starting at the `{` token, honoring nested
    /// braces. Returns the index just past the matching `}`, or `None` when
    /// the scope never closes.
    fn skip_braced_scope(&self, open: usize) -> Option<usize> {
        debug_assert_eq!(self.toks().char_at(open), Some('{'));

        let mut i = open;
        let mut depth = 0_usize;

        while let Some(c) = self.toks().char_at(i) {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i + 1);
                    }
                }
                '"' | '\'' => {
                    i = self.skip_quoted(i)?;
                    continue;
                }
                _ => {}
            }
            i += 1;
        }

        None
    }

    /// Skip a quoted string starting at its opening quote. Returns the index
    /// just past the closing quote.
    fn skip_quoted(&self, open: usize) -> Option<usize> {
        let quote = self.toks().char_at(open)?;
        let mut i = open + 1;

        while let Some(c) = self.toks().char_at(i) {
            if c == quote {
                return Some(i + 1);
            }
            if c == '\\' {
                i += 1;
            }
            if c == '\n' {
                return None;
            }
            i += 1;
        }

        None
    }

    /// Find the end of the selector-shaped prefix beginning at `start`, or
    /// `None` when no progress can be made at all.
    fn scan_selector_shaped(&self, start: usize) -> Option<usize> {
        let mut i = start;
        let mut brackets: Vec<char> = Vec::new();

        while let Some(c) = self.toks().char_at(i) {
            match c {
                '{' | '}' | ';' | '!' => break,
                '#' if self.toks().char_at(i + 1) == Some('{') => {
                    match self.skip_braced_scope(i + 1) {
                        Some(end) => i = end,
                        None => break,
                    }
                }
                '"' | '\'' => match self.skip_quoted(i) {
                    Some(end) => i = end,
                    None => break,
                },
                '(' | '[' => {
                    brackets.push(crate::utils::opposite_bracket(c));
                    i += 1;
                }
                ')' | ']' => match brackets.pop() {
                    Some(expected) if expected == c => i += 1,
                    _ => break,
                },
                '\\' => i += 2,
                '/' if self.toks().char_at(i + 1) == Some('*') => {
                    let mut j = i + 2;
                    loop {
                        match (self.toks().char_at(j), self.toks().char_at(j + 1)) {
                            (Some('*'), Some('/')) => break,
                            (Some(..), _) => j += 1,
                            (None, _) => return if i == start { None } else { Some(i) },
                        }
                    }
                    i = j + 2;
                }
                c if is_selector_char(c) => i += 1,
                _ => break,
            }
        }

        if i == start {
            None
        } else {
            Some(i)
        }
    }

    /// Probe for a selector-list-shaped region. `found` is set when the
    /// region is terminated by `{` or `(`; `is_custom_property` is set when
    /// a top-level `:` makes the region an (ambiguous) declaration instead.
    pub(crate) fn lookahead_for_selector(&self, start: usize) -> Lookahead {
        let end = match self.scan_selector_shaped(start) {
            Some(end) => end,
            None => return Lookahead::empty(start),
        };

        let mut has_interpolants = false;
        let mut is_custom_property = false;

        let could_be_property = self.toks().char_at(start) == Some('-')
            && self.toks().char_at(start + 1) == Some('-');
        let mut could_be_escaped = false;

        let mut p = start;
        while p < end {
            let c = match self.toks().char_at(p) {
                Some(c) => c,
                None => break,
            };

            if c == '#' && self.toks().char_at(p + 1) == Some('{') {
                has_interpolants = true;
                break;
            }

            // A property ambiguous with a nested selector is interpreted as
            // a custom property.
            if c == ':' && !could_be_escaped {
                is_custom_property = could_be_property
                    || p + 1 == end
                    || matches!(
                        self.toks().char_at(p + 1),
                        Some(' ' | '\t' | '\n')
                    );
            }

            could_be_escaped = c == '\\';
            p += 1;
        }

        let found = match self.toks().char_at(end) {
            Some('{') | Some('(') => Some(end),
            _ => None,
        };

        let errored = found.is_none() && self.toks().char_at(end).is_some();

        Lookahead {
            found,
            position: end,
            errored,
            has_interpolants,
            is_custom_property,
            parsable: !has_interpolants,
        }
    }

    /// Like [`lookahead_for_selector`](Self::lookahead_for_selector), but
    /// also accepts `;` and `}` as terminators, along with the `!` that
    /// begins an `!optional` flag. Used for regions like `@extend` targets
    /// that end at a statement boundary.
    pub(crate) fn lookahead_for_include(&self, start: usize) -> Lookahead {
        let mut rv = self.lookahead_for_selector(start);

        if rv.found.is_none() {
            if let Some(';') | Some('}') | Some('!') = self.toks().char_at(rv.position) {
                rv.found = Some(rv.position);
                rv.errored = false;
            }
        }

        rv
    }

    /// Probe a value-shaped region consisting solely of comments,
    /// identifiers, variables, interpolants (each optionally followed by a
    /// quoted string), and parenthesized groups that feed an interpolant.
    /// Anything else fails the probe, in which case the value is parsed as
    /// an ordinary expression. On success, `has_interpolants` reports
    /// whether the region should be reassembled as one string schema.
    pub(crate) fn lookahead_for_value(&self, start: usize) -> Lookahead {
        let mut rv = Lookahead::empty(start);
        let mut i = start;

        loop {
            let c = match self.toks().char_at(i) {
                Some(c) => c,
                None => return rv,
            };

            if matches!(c, '{' | '}' | ';') {
                break;
            }

            match c {
                '/' if self.toks().char_at(i + 1) == Some('*') => {
                    let mut j = i + 2;
                    loop {
                        match (self.toks().char_at(j), self.toks().char_at(j + 1)) {
                            (Some('*'), Some('/')) => break,
                            (Some(..), _) => j += 1,
                            (None, _) => return rv,
                        }
                    }
                    i = j + 2;
                }
                '#' if self.toks().char_at(i + 1) == Some('{') => {
                    i = match self.skip_braced_scope(i + 1) {
                        Some(end) => end,
                        None => return rv,
                    };
                    if matches!(self.toks().char_at(i), Some('"' | '\'')) {
                        i = match self.skip_quoted(i) {
                            Some(end) => end,
                            None => return rv,
                        };
                    }
                }
                '$' => {
                    i += 1;
                    while matches!(self.toks().char_at(i), Some(c) if is_name(c)) {
                        i += 1;
                    }
                }
                '(' => {
                    // A parenthesized group only passes when an interpolant
                    // follows it directly.
                    let mut depth = 0_usize;
                    loop {
                        match self.toks().char_at(i) {
                            Some('(') => depth += 1,
                            Some(')') => {
                                depth -= 1;
                                if depth == 0 {
                                    i += 1;
                                    break;
                                }
                            }
                            Some(..) => {}
                            None => return rv,
                        }
                        i += 1;
                    }
                    if self.toks().char_at(i) != Some('#')
                        || self.toks().char_at(i + 1) != Some('{')
                    {
                        return rv;
                    }
                }
                '\\' => i += 2,
                c if is_name(c) && !c.is_ascii_digit() => {
                    i += 1;
                    while matches!(self.toks().char_at(i), Some(c) if is_name(c)) {
                        i += 1;
                    }
                }
                _ => return rv,
            }
        }

        if i == start {
            return rv;
        }

        rv.position = i;
        rv.found = Some(i);
        rv.errored = false;

        let mut p = start;
        while p < i {
            if self.toks().char_at(p) == Some('#') && self.toks().char_at(p + 1) == Some('{') {
                rv.has_interpolants = true;
                break;
            }
            p += 1;
        }
        rv.parsable = !rv.has_interpolants;

        rv
    }
}
