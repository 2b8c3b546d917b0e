//! RustyLex - Streaming, tolerant XML/HTML lexer
//!
//! The lexer is pull-based: [`advance`] returns one token per call and
//! never fails. Malformed or truncated markup yields best-effort tokens and
//! then `EndOfInput`.
//!
//! ```
//! use rustylex::{lex, LexerOptions, TokenKind};
//!
//! let tokens = lex("<a href=\"x\">hi &amp; bye</a>", LexerOptions::default());
//! assert_eq!(tokens[0].kind, TokenKind::TagOpenStart);
//! assert_eq!(tokens[4].text, "hi & bye");
//! ```
//!
//! Layers:
//! - `core`: scanner, lexer state machine, tokens, entity and encoding handling
//! - `strategy`: parallel lexing of independent documents

mod core;
pub mod error;
pub mod options;
mod strategy;

pub use crate::core::encoding::{decode_input, XmlEncoding};
pub use crate::core::entities::decode_text;
pub use crate::core::lexer::{LexState, Lexer};
pub use crate::core::token::{Location, Span, Token, TokenKind};
pub use error::LexError;
pub use options::LexerOptions;
pub use strategy::lex_parallel;

/// Create an XML lexer over a UTF-8 buffer
///
/// The buffer is borrowed; no copy is made. UTF-16 documents must go
/// through [`decode_input`] first.
///
/// # Errors
///
/// Returns [`LexError::InvalidInput`] if the buffer is not valid UTF-8.
pub fn new_lexer(buffer: &[u8]) -> Result<Lexer<'_>, LexError> {
    Lexer::from_bytes(buffer, LexerOptions::default())
}

/// Scan the next token from `lexer`
#[inline]
pub fn advance<'a>(lexer: &mut Lexer<'a>) -> Token<'a> {
    lexer.advance()
}

/// Lex a whole document, excluding the final `EndOfInput`
pub fn lex(input: &str, options: LexerOptions) -> Vec<Token<'_>> {
    Lexer::with_options(input, options).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_lexer_and_advance() {
        let mut lexer = new_lexer(b"<a>hi</a>").unwrap();
        let first = advance(&mut lexer);
        assert_eq!(first.kind, TokenKind::TagOpenStart);
        assert_eq!(first.text, "a");
    }

    #[test]
    fn test_new_lexer_rejects_invalid_utf8() {
        let err = new_lexer(&[b'a', 0xC0, 0x80]).unwrap_err();
        assert_eq!(err, LexError::InvalidInput { offset: 1, reason: "input is not valid UTF-8" });
    }

    #[test]
    fn test_lex_html() {
        let kinds: Vec<_> = lex("<p>a<br>b</p>", LexerOptions::html()).iter().map(|t| t.kind).collect();
        assert!(kinds.contains(&TokenKind::TagSelfCloseEnd));
    }

    #[test]
    fn test_decode_then_lex_utf16() {
        let bytes = [0xFF, 0xFE, b'<', 0x00, b'r', 0x00, b'/', 0x00, b'>', 0x00];
        let text = decode_input(&bytes).unwrap();
        let tokens = lex(&text, LexerOptions::default());
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].kind, TokenKind::TagSelfCloseEnd);
    }
}
