use std::fmt;

use crate::interner::InternedString;

/// A CSS unit attached to a numeric literal.
///
/// The parser records the unit exactly as written; it never converts between
/// compatible units.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Unit {
    // Absolute lengths
    Px,
    Mm,
    In,
    Cm,
    Q,
    Pt,
    Pc,

    // Font-relative lengths
    Em,
    Rem,
    Ex,
    Ch,

    // Viewport-relative lengths
    Vw,
    Vh,
    Vmin,
    Vmax,

    // Angles
    Deg,
    Grad,
    Rad,
    Turn,

    // Durations
    S,
    Ms,

    // Frequencies
    Hz,
    Khz,

    // Resolutions
    Dpi,
    Dpcm,
    Dppx,

    /// Grid fraction
    Fr,

    Percent,

    /// A unit the parser does not recognize, kept verbatim.
    Unknown(InternedString),

    /// A bare number.
    None,
}

impl From<String> for Unit {
    fn from(unit: String) -> Self {
        match unit.to_ascii_lowercase().as_str() {
            "px" => Unit::Px,
            "mm" => Unit::Mm,
            "in" => Unit::In,
            "cm" => Unit::Cm,
            "q" => Unit::Q,
            "pt" => Unit::Pt,
            "pc" => Unit::Pc,
            "em" => Unit::Em,
            "rem" => Unit::Rem,
            "ex" => Unit::Ex,
            "ch" => Unit::Ch,
            "vw" => Unit::Vw,
            "vh" => Unit::Vh,
            "vmin" => Unit::Vmin,
            "vmax" => Unit::Vmax,
            "deg" => Unit::Deg,
            "grad" => Unit::Grad,
            "rad" => Unit::Rad,
            "turn" => Unit::Turn,
            "s" => Unit::S,
            "ms" => Unit::Ms,
            "hz" => Unit::Hz,
            "khz" => Unit::Khz,
            "dpi" => Unit::Dpi,
            "dpcm" => Unit::Dpcm,
            "dppx" => Unit::Dppx,
            "fr" => Unit::Fr,
            "%" => Unit::Percent,
            _ => Unit::Unknown(InternedString::intern(unit)),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Px => f.write_str("px"),
            Unit::Mm => f.write_str("mm"),
            Unit::In => f.write_str("in"),
            Unit::Cm => f.write_str("cm"),
            Unit::Q => f.write_str("q"),
            Unit::Pt => f.write_str("pt"),
            Unit::Pc => f.write_str("pc"),
            Unit::Em => f.write_str("em"),
            Unit::Rem => f.write_str("rem"),
            Unit::Ex => f.write_str("ex"),
            Unit::Ch => f.write_str("ch"),
            Unit::Vw => f.write_str("vw"),
            Unit::Vh => f.write_str("vh"),
            Unit::Vmin => f.write_str("vmin"),
            Unit::Vmax => f.write_str("vmax"),
            Unit::Deg => f.write_str("deg"),
            Unit::Grad => f.write_str("grad"),
            Unit::Rad => f.write_str("rad"),
            Unit::Turn => f.write_str("turn"),
            Unit::S => f.write_str("s"),
            Unit::Ms => f.write_str("ms"),
            Unit::Hz => f.write_str("Hz"),
            Unit::Khz => f.write_str("kHz"),
            Unit::Dpi => f.write_str("dpi"),
            Unit::Dpcm => f.write_str("dpcm"),
            Unit::Dppx => f.write_str("dppx"),
            Unit::Fr => f.write_str("fr"),
            Unit::Percent => f.write_str("%"),
            Unit::Unknown(name) => write!(f, "{}", name),
            Unit::None => Ok(()),
        }
    }
}
