//! Input Encoding Detection and Conversion
//!
//! Handles detection of UTF-16 input based on BOM and byte patterns.
//! UTF-8 input is borrowed as-is (minus its BOM); UTF-16 input is
//! transcoded into an owned string.

use crate::error::LexError;
use std::borrow::Cow;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Detected encoding of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl XmlEncoding {
    /// Detect encoding from byte order mark or initial bytes
    pub fn detect(input: &[u8]) -> Self {
        if input.len() < 2 {
            return XmlEncoding::Utf8;
        }

        match (input[0], input[1]) {
            // UTF-16 LE BOM: 0xFF 0xFE
            (0xFF, 0xFE) => XmlEncoding::Utf16Le,
            // UTF-16 BE BOM: 0xFE 0xFF
            (0xFE, 0xFF) => XmlEncoding::Utf16Be,
            // No BOM - check for UTF-16 pattern (< followed by null or null followed by <)
            (0x00, b'<') => XmlEncoding::Utf16Be,
            (b'<', 0x00) => XmlEncoding::Utf16Le,
            _ => XmlEncoding::Utf8,
        }
    }

    /// True for a UTF-16 byte order mark (not just a sniffed pattern)
    pub(crate) fn has_utf16_bom(input: &[u8]) -> bool {
        input.starts_with(&[0xFF, 0xFE]) || input.starts_with(&[0xFE, 0xFF])
    }
}

/// Turn raw document bytes into text the lexer can borrow
///
/// UTF-8 input is validated and borrowed, with a leading BOM removed.
/// UTF-16 input is converted to an owned UTF-8 string.
pub fn decode_input(input: &[u8]) -> Result<Cow<'_, str>, LexError> {
    match XmlEncoding::detect(input) {
        XmlEncoding::Utf8 => {
            let bytes = input.strip_prefix(UTF8_BOM).unwrap_or(input);
            let bom_len = input.len() - bytes.len();
            std::str::from_utf8(bytes).map(Cow::Borrowed).map_err(|e| {
                LexError::invalid_input(bom_len + e.valid_up_to(), "input is not valid UTF-8")
            })
        }
        XmlEncoding::Utf16Le => decode_utf16(input, [0xFF, 0xFE], u16::from_le_bytes).map(Cow::Owned),
        XmlEncoding::Utf16Be => decode_utf16(input, [0xFE, 0xFF], u16::from_be_bytes).map(Cow::Owned),
    }
}

/// Convert UTF-16 bytes with the given byte order to UTF-8
fn decode_utf16(input: &[u8], bom: [u8; 2], to_unit: fn([u8; 2]) -> u16) -> Result<String, LexError> {
    // Skip BOM if present
    let start = if input.starts_with(&bom) { 2 } else { 0 };
    let bytes = &input[start..];

    // Ensure even number of bytes
    if bytes.len() % 2 != 0 {
        return Err(LexError::invalid_input(input.len() - 1, "UTF-16 input has an odd number of bytes"));
    }

    let units = bytes.chunks_exact(2).map(|chunk| to_unit([chunk[0], chunk[1]]));

    let mut out = String::with_capacity(bytes.len() / 2);
    let mut unit_index = 0;
    for decoded in char::decode_utf16(units) {
        match decoded {
            Ok(c) => {
                out.push(c);
                unit_index += c.len_utf16();
            }
            Err(_) => {
                return Err(LexError::invalid_input(start + unit_index * 2, "unpaired UTF-16 surrogate"));
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_utf8() {
        assert_eq!(XmlEncoding::detect(b"<root/>"), XmlEncoding::Utf8);
        assert_eq!(XmlEncoding::detect(b"<?xml"), XmlEncoding::Utf8);
        assert_eq!(XmlEncoding::detect(&[0xEF, 0xBB, 0xBF, b'<']), XmlEncoding::Utf8);
    }

    #[test]
    fn test_detect_utf16() {
        assert_eq!(XmlEncoding::detect(&[0xFF, 0xFE, b'<', 0x00]), XmlEncoding::Utf16Le);
        assert_eq!(XmlEncoding::detect(&[0xFE, 0xFF, 0x00, b'<']), XmlEncoding::Utf16Be);
        assert_eq!(XmlEncoding::detect(&[b'<', 0x00, b'a', 0x00]), XmlEncoding::Utf16Le);
    }

    #[test]
    fn test_utf8_passthrough_is_borrowed() {
        let result = decode_input(b"<root>hello</root>").unwrap();
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, "<root>hello</root>");
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let result = decode_input(&[0xEF, 0xBB, 0xBF, b'<', b'r', b'/', b'>']).unwrap();
        assert_eq!(result, "<r/>");
    }

    #[test]
    fn test_invalid_utf8_reports_offset() {
        let err = decode_input(&[0xEF, 0xBB, 0xBF, b'a', 0xC3]).unwrap_err();
        assert_eq!(err.offset(), 4);
    }

    #[test]
    fn test_convert_utf16_le() {
        // "<r/>" in UTF-16 LE with BOM
        let utf16_le = [0xFF, 0xFE, b'<', 0x00, b'r', 0x00, b'/', 0x00, b'>', 0x00];
        assert_eq!(decode_input(&utf16_le).unwrap(), "<r/>");
    }

    #[test]
    fn test_convert_utf16_be() {
        // "<r/>" in UTF-16 BE with BOM
        let utf16_be = [0xFE, 0xFF, 0x00, b'<', 0x00, b'r', 0x00, b'/', 0x00, b'>'];
        assert_eq!(decode_input(&utf16_be).unwrap(), "<r/>");
    }

    #[test]
    fn test_utf16_odd_length() {
        let err = decode_input(&[0xFF, 0xFE, b'<', 0x00, b'r']).unwrap_err();
        assert_eq!(err.offset(), 4);
    }

    #[test]
    fn test_utf16_unpaired_surrogate() {
        let err = decode_input(&[0xFF, 0xFE, b'a', 0x00, 0x00, 0xD8, b'b', 0x00]).unwrap_err();
        assert_eq!(err.offset(), 4);
    }
}
