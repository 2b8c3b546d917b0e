//! SIMD-accelerated input scanning using memchr
//!
//! The scanner is a forward-only cursor over the input text. Delimiter
//! searches use memchr (SSE2/AVX2/NEON when available); every move of the
//! cursor also updates the line and column counters, so positions never
//! have to be recomputed from the start of the document.

use super::token::Location;
use memchr::memmem;
use memchr::{memchr, memchr_iter, memrchr};

/// Cursor over the lexer input
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    line: u32,
    column: u32,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner positioned at the start of `input`
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Scanner {
            input,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// The full input
    #[inline]
    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Get the current byte offset
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Line and column of the current offset
    #[inline]
    pub fn location(&self) -> Location {
        Location {
            line: self.line,
            column: self.column,
        }
    }

    /// Check if we've reached the end
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    #[inline]
    fn bytes(&self) -> &'a [u8] {
        self.input.as_bytes()
    }

    /// Get a slice of the input between two offsets
    ///
    /// Both offsets must fall on character boundaries.
    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input[start..end]
    }

    /// Peek at current byte without advancing
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.bytes().get(self.pos).copied()
    }

    /// Peek at byte at offset from current position
    #[inline]
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes().get(self.pos + offset).copied()
    }

    /// Advance by n bytes
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.seek(self.pos + n);
    }

    /// Move forward to `target`, updating line and column
    ///
    /// `target` is clamped to the end of the input and must not lie
    /// before the current offset.
    pub fn seek(&mut self, target: usize) {
        let target = target.min(self.input.len());
        debug_assert!(target >= self.pos, "scanner cannot move backwards");
        if target <= self.pos {
            return;
        }

        let skipped = &self.bytes()[self.pos..target];
        match memrchr(b'\n', skipped) {
            Some(last) => {
                self.line += memchr_iter(b'\n', skipped).count() as u32;
                self.column = 1 + char_count(&skipped[last + 1..]);
            }
            None => self.column += char_count(skipped),
        }
        self.pos = target;
    }

    /// Jump to the end of the input
    #[inline]
    pub fn seek_end(&mut self) {
        self.seek(self.input.len());
    }

    /// Skip whitespace characters (space, tab, newline, carriage return)
    #[inline]
    pub fn skip_whitespace(&mut self) {
        let bytes = self.bytes();
        let mut end = self.pos;
        while end < bytes.len() && is_whitespace(bytes[end]) {
            end += 1;
        }
        self.seek(end);
    }

    /// Find next '<' at or after the given offset
    #[inline]
    pub fn find_tag_start_from(&self, from: usize) -> Option<usize> {
        memchr(b'<', &self.bytes()[from..]).map(|i| from + i)
    }

    /// Find next occurrence of a specific byte
    #[inline]
    pub fn find_byte(&self, byte: u8) -> Option<usize> {
        memchr(byte, &self.bytes()[self.pos..]).map(|i| self.pos + i)
    }

    /// Find the next occurrence of a literal such as `-->`
    #[inline]
    pub fn find_literal(&self, needle: &[u8]) -> Option<usize> {
        self.find_literal_from(self.pos, needle)
    }

    /// Find the next occurrence of a literal at or after `from`
    #[inline]
    pub fn find_literal_from(&self, from: usize, needle: &[u8]) -> Option<usize> {
        memmem::find(&self.bytes()[from..], needle).map(|i| from + i)
    }

    /// Check if input contains `needle` at the given offset
    #[inline]
    pub fn starts_with_at(&self, at: usize, needle: &[u8]) -> bool {
        self.bytes()
            .get(at..at + needle.len())
            .is_some_and(|window| window == needle)
    }

    /// Case-insensitive (ASCII) version of `starts_with` at an arbitrary offset
    #[inline]
    pub fn starts_with_ignore_case_at(&self, at: usize, needle: &[u8]) -> bool {
        self.bytes()
            .get(at..at + needle.len())
            .is_some_and(|window| window.eq_ignore_ascii_case(needle))
    }

    /// Offset of the first byte at or after the cursor that ends a name
    pub fn name_end(&self) -> usize {
        let bytes = self.bytes();
        let mut end = self.pos;
        while end < bytes.len() && !is_name_terminator(bytes[end]) {
            end += 1;
        }
        end
    }

    /// Offset of the first whitespace or '>' at or after the cursor
    pub fn unquoted_value_end(&self) -> usize {
        let bytes = self.bytes();
        let mut end = self.pos;
        while end < bytes.len() && !is_whitespace(bytes[end]) && bytes[end] != b'>' {
            end += 1;
        }
        end
    }

    /// Find `needle` starting before `to`, searching from `from`
    #[inline]
    pub fn find_literal_before(&self, from: usize, to: usize, needle: &[u8]) -> Option<usize> {
        let limit = (to + needle.len() - 1).min(self.input.len());
        memmem::find(&self.bytes()[from..limit], needle).map(|i| from + i)
    }

    /// End of a bare word inside a doctype (name, `PUBLIC`, `SYSTEM`)
    pub fn doctype_word_end(&self) -> usize {
        let bytes = self.bytes();
        let mut end = self.pos;
        while end < bytes.len() && !is_doctype_word_terminator(bytes[end]) {
            end += 1;
        }
        end
    }

    /// Find the ']' closing an internal subset; the cursor is just past '['
    /// Skips quoted literals, comments and nested brackets
    pub fn find_subset_end(&self) -> Option<usize> {
        let bytes = self.bytes();
        let mut depth = 0usize;
        let mut i = self.pos;

        while i < bytes.len() {
            match bytes[i] {
                quote @ (b'"' | b'\'') => match memchr(quote, &bytes[i + 1..]) {
                    Some(close) => i += close + 1,
                    None => return None,
                },
                b'<' if bytes[i..].starts_with(b"<!--") => match memmem::find(&bytes[i + 4..], b"-->") {
                    Some(close) => i += close + 6,
                    None => return None,
                },
                b'[' => depth += 1,
                b']' if depth == 0 => return Some(i),
                b']' => depth -= 1,
                _ => {}
            }
            i += 1;
        }
        None
    }
}

/// Number of UTF-8 encoded characters in a byte run
#[inline]
fn char_count(bytes: &[u8]) -> u32 {
    bytes.iter().filter(|&&b| (b & 0xC0) != 0x80).count() as u32
}

/// XML whitespace: space, tab, newline, carriage return
#[inline]
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Check if byte is valid XML name start character
/// Allows ASCII letters, underscore, colon, and non-ASCII (UTF-8 Unicode)
#[inline]
pub fn is_name_start_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

#[inline]
fn is_name_terminator(b: u8) -> bool {
    is_whitespace(b) || matches!(b, b'/' | b'>' | b'=')
}

#[inline]
fn is_doctype_word_terminator(b: u8) -> bool {
    is_whitespace(b) || matches!(b, b'>' | b'[' | b'"' | b'\'')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_tag_start() {
        let scanner = Scanner::new("hello <world>");
        assert_eq!(scanner.find_tag_start_from(0), Some(6));
        assert_eq!(scanner.find_tag_start_from(7), None);
    }

    #[test]
    fn test_find_literal() {
        let mut scanner = Scanner::new("<!-- a - b -- c -->");
        scanner.advance(4);
        assert_eq!(scanner.find_literal(b"-->"), Some(16));
    }

    #[test]
    fn test_name_end() {
        let mut scanner = Scanner::new("<element-name>");
        scanner.advance(1);
        assert_eq!(scanner.name_end(), 13);

        let scanner = Scanner::new("xml:lang=\"en\"");
        assert_eq!(scanner.name_end(), 8);
    }

    #[test]
    fn test_unquoted_value_end() {
        let scanner = Scanner::new("foo/>");
        assert_eq!(scanner.unquoted_value_end(), 4);
        let scanner = Scanner::new("foo bar>");
        assert_eq!(scanner.unquoted_value_end(), 3);
    }

    #[test]
    fn test_doctype_word_end() {
        let scanner = Scanner::new("html>");
        assert_eq!(scanner.doctype_word_end(), 4);
        let scanner = Scanner::new("PUBLIC\"x\"");
        assert_eq!(scanner.doctype_word_end(), 6);
        let scanner = Scanner::new("root[]");
        assert_eq!(scanner.doctype_word_end(), 4);
    }

    #[test]
    fn test_find_subset_end() {
        let scanner = Scanner::new("<!ENTITY x \"]\"><!-- ] -->]>rest");
        assert_eq!(scanner.find_subset_end(), Some(25));
        let scanner = Scanner::new("<!ELEMENT a (b)>");
        assert_eq!(scanner.find_subset_end(), None);
    }

    #[test]
    fn test_find_literal_before() {
        let scanner = Scanner::new("standalone?> x?>");
        assert_eq!(scanner.find_literal_before(0, 11, b"?>"), Some(10));
        assert_eq!(scanner.find_literal_before(0, 10, b"?>"), None);
        assert_eq!(scanner.find_literal_before(12, 16, b"?>"), Some(14));
    }

    #[test]
    fn test_skip_whitespace() {
        let mut scanner = Scanner::new("  \t\n hello");
        scanner.skip_whitespace();
        assert_eq!(scanner.position(), 5);
        assert_eq!(scanner.location(), Location { line: 2, column: 2 });
    }

    #[test]
    fn test_location_counts_characters() {
        let mut scanner = Scanner::new("héllo\nwörld");
        scanner.seek(6);
        assert_eq!(scanner.location(), Location { line: 1, column: 6 });
        scanner.seek(7);
        assert_eq!(scanner.location(), Location { line: 2, column: 1 });
        scanner.seek_end();
        assert_eq!(scanner.location(), Location { line: 2, column: 6 });
    }

    #[test]
    fn test_starts_with_ignore_case() {
        let scanner = Scanner::new("<!doctype html>");
        assert!(scanner.starts_with_ignore_case_at(2, b"DOCTYPE"));
        assert!(!scanner.starts_with_ignore_case_at(10, b"DOCTYPE"));
    }
}
