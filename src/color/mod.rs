//! Color literals.
//!
//! The parser produces colors from hex notation (`#abc`, `#abcd`, `#aabbcc`,
//! `#aabbccdd`) and from recognized color names. The original source text is
//! kept so a later emitter can round-trip the literal exactly as written.

pub(crate) use name::NAMED_COLORS;

mod name;

#[derive(Debug, Clone, PartialEq)]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
    alpha: f64,
    format: ColorFormat,
}

/// How the color was written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorFormat {
    /// The verbatim source text, either a hex literal or a color name.
    Literal(String),
    /// No source form is available; an emitter picks the shortest.
    Infer,
}

impl Color {
    pub(crate) const fn new_rgba(red: u8, green: u8, blue: u8, alpha: f64, format: ColorFormat) -> Self {
        Color {
            red,
            green,
            blue,
            alpha,
            format,
        }
    }

    pub(crate) fn from_name(name: &str, [red, green, blue, alpha]: [u8; 4]) -> Self {
        Color {
            red,
            green,
            blue,
            alpha: f64::from(alpha) / 255.0,
            format: ColorFormat::Literal(name.to_owned()),
        }
    }

    pub const fn red(&self) -> u8 {
        self.red
    }

    pub const fn green(&self) -> u8 {
        self.green
    }

    pub const fn blue(&self) -> u8 {
        self.blue
    }

    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    pub const fn format(&self) -> &ColorFormat {
        &self.format
    }

    pub const fn is_opaque(&self) -> bool {
        self.alpha >= 1.0
    }
}
