//! Byte-order-mark detection.
//!
//! Only UTF-8 input is accepted. A UTF-8 BOM is skipped; a BOM identifying
//! any other encoding fails the parse with the encoding's name. Bytes that
//! match no known BOM are left alone.

const UTF_8: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF_16_BE: &[u8] = &[0xFE, 0xFF];
const UTF_16_LE: &[u8] = &[0xFF, 0xFE];
const UTF_32_BE: &[u8] = &[0x00, 0x00, 0xFE, 0xFF];
const UTF_32_LE: &[u8] = &[0xFF, 0xFE, 0x00, 0x00];
const UTF_7_1: &[u8] = &[0x2B, 0x2F, 0x76, 0x38];
const UTF_7_2: &[u8] = &[0x2B, 0x2F, 0x76, 0x39];
const UTF_7_3: &[u8] = &[0x2B, 0x2F, 0x76, 0x2B];
const UTF_7_4: &[u8] = &[0x2B, 0x2F, 0x76, 0x2F];
const UTF_7_5: &[u8] = &[0x2B, 0x2F, 0x76, 0x38, 0x2D];
const UTF_1: &[u8] = &[0xF7, 0x64, 0x4C];
const UTF_EBCDIC: &[u8] = &[0xDD, 0x73, 0x66, 0x73];
const SCSU: &[u8] = &[0x0E, 0xFE, 0xFF];
const BOCU_1: &[u8] = &[0xFB, 0xEE, 0x28];
const GB_18030: &[u8] = &[0x84, 0x31, 0x95, 0x33];

/// The result of sniffing the first bytes of a source buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Bom {
    /// A UTF-8 BOM of the given byte length, to be skipped.
    Utf8(usize),
    /// A BOM for an unsupported encoding, named for the error message.
    Foreign(&'static str),
    /// No recognized BOM.
    None,
}

fn starts_with(src: &[u8], bom: &[u8]) -> bool {
    src.len() >= bom.len() && &src[..bom.len()] == bom
}

pub(crate) fn sniff_bom(src: &[u8]) -> Bom {
    let first = match src.first() {
        Some(b) => *b,
        None => return Bom::None,
    };

    match first {
        0xEF if starts_with(src, UTF_8) => Bom::Utf8(UTF_8.len()),
        0xFE if starts_with(src, UTF_16_BE) => Bom::Foreign("UTF-16 (big endian)"),
        0xFF if starts_with(src, UTF_32_LE) => Bom::Foreign("UTF-32 (little endian)"),
        0xFF if starts_with(src, UTF_16_LE) => Bom::Foreign("UTF-16 (little endian)"),
        0x00 if starts_with(src, UTF_32_BE) => Bom::Foreign("UTF-32 (big endian)"),
        0x2B if starts_with(src, UTF_7_5)
            || starts_with(src, UTF_7_1)
            || starts_with(src, UTF_7_2)
            || starts_with(src, UTF_7_3)
            || starts_with(src, UTF_7_4) =>
        {
            Bom::Foreign("UTF-7")
        }
        0xF7 if starts_with(src, UTF_1) => Bom::Foreign("UTF-1"),
        0xDD if starts_with(src, UTF_EBCDIC) => Bom::Foreign("UTF-EBCDIC"),
        0x0E if starts_with(src, SCSU) => Bom::Foreign("SCSU"),
        0xFB if starts_with(src, BOCU_1) => Bom::Foreign("BOCU-1"),
        0x84 if starts_with(src, GB_18030) => Bom::Foreign("GB-18030"),
        _ => Bom::None,
    }
}
