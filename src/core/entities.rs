//! XML Entity Decoding
//!
//! Handles decoding of XML entities:
//! - Built-in entities: &lt; &gt; &amp; &quot; &apos;
//! - Numeric character references: &#123; &#x7B;
//!
//! Anything else that starts with '&' is kept verbatim. Uses Cow for
//! zero-copy when no entities are present.

use memchr::memchr;
use std::borrow::Cow;

/// Longest reference body we bother to look at (`#x10FFFF` is 8 bytes)
const MAX_ENTITY_LEN: usize = 32;

/// Decode text content, handling entity references
///
/// Returns Borrowed if nothing was decoded (zero-copy),
/// returns Owned if at least one reference was replaced.
#[inline]
pub fn decode_text(input: &str) -> Cow<'_, str> {
    // Fast path: check if there are any entities using SIMD
    let Some(first) = memchr(b'&', input.as_bytes()) else {
        return Cow::Borrowed(input);
    };
    // Slow path: decode entities
    match decode_entities(input, first) {
        Some(decoded) => Cow::Owned(decoded),
        None => Cow::Borrowed(input),
    }
}

/// Decode all entity references starting at the first '&'
///
/// Returns `None` when no reference could be decoded.
fn decode_entities(input: &str, first: usize) -> Option<String> {
    let bytes = input.as_bytes();
    let mut result: Option<String> = None;
    let mut copied = 0;
    let mut pos = first;

    while pos < bytes.len() {
        let Some(amp_offset) = memchr(b'&', &bytes[pos..]) else {
            break;
        };
        let amp = pos + amp_offset;

        // Find the semicolon within a bounded window
        let window_end = (amp + 1 + MAX_ENTITY_LEN).min(bytes.len());
        let decoded = memchr(b';', &bytes[amp + 1..window_end])
            .and_then(|semi| decode_entity(&input[amp + 1..amp + 1 + semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                let out = result.get_or_insert_with(|| String::with_capacity(input.len()));
                out.push_str(&input[copied..amp]);
                out.push(c);
                pos = amp + semi + 2;
                copied = pos;
            }
            // Unknown entity or no semicolon, keep the ampersand
            None => pos = amp + 1,
        }
    }

    let mut out = result?;
    out.push_str(&input[copied..]);
    Some(out)
}

/// Decode a single entity (without & and ;)
fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => decode_numeric_entity(entity.strip_prefix('#')?),
    }
}

/// Decode a numeric character reference
fn decode_numeric_entity(entity: &str) -> Option<char> {
    let codepoint = match entity.strip_prefix(|c: char| c == 'x' || c == 'X') {
        // Hexadecimal: &#xHHHH;
        Some(hex) if !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()) => {
            u32::from_str_radix(hex, 16).ok()?
        }
        Some(_) => return None,
        // Decimal: &#DDDD;
        None if !entity.is_empty() && entity.bytes().all(|b| b.is_ascii_digit()) => {
            entity.parse::<u32>().ok()?
        }
        None => return None,
    };

    if !is_valid_xml_char(codepoint) {
        return None;
    }
    char::from_u32(codepoint)
}

/// Check if a code point is a valid XML 1.0 Char
/// Char ::= #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
#[inline]
pub fn is_valid_xml_char(codepoint: u32) -> bool {
    matches!(codepoint,
        0x9 | 0xA | 0xD |
        0x20..=0xD7FF |
        0xE000..=0xFFFD |
        0x10000..=0x10FFFF
    )
}
