//! HTML element tables used when lexing in HTML mode

/// Elements that never have content or a closing tag
pub const HTML_VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link",
    "meta", "param", "source", "track", "wbr",
];

/// Elements whose content is lexed as raw text up to the closing tag
pub const HTML_RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Check if `name` is an HTML void element (case-insensitive)
#[inline]
pub fn is_void_element(name: &str) -> bool {
    HTML_VOID_ELEMENTS.iter().any(|void| void.eq_ignore_ascii_case(name))
}

/// Return the canonical raw-text element name matching `name`, if any
#[inline]
pub fn raw_text_element(name: &str) -> Option<&'static str> {
    HTML_RAW_TEXT_ELEMENTS
        .iter()
        .copied()
        .find(|raw| raw.eq_ignore_ascii_case(name))
}
