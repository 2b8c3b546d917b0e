//! Property-based tests for the lexer
//!
//! Inputs mix well-formed markup fragments with arbitrary text so that
//! truncated and malformed constructs show up often.

use proptest::prelude::*;
use rustylex::{decode_text, Lexer, LexerOptions, Token, TokenKind};

/// Lex to completion, counting calls; panics if the lexer does not finish
/// within `len + 1` calls
fn lex_bounded(input: &str, options: LexerOptions) -> Vec<Token<'_>> {
    let mut lexer = Lexer::with_options(input, options);
    let mut tokens = Vec::new();
    for _ in 0..=input.len() {
        let token = lexer.advance();
        let done = token.is_end();
        tokens.push(token);
        if done {
            return tokens;
        }
    }
    panic!("lexer did not finish within {} calls", input.len() + 1);
}

/// Generate markup-heavy documents
fn markup_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "<[a-z]{1,5}",
            "</[a-z]{1,5}",
            Just(">".to_string()),
            Just("/>".to_string()),
            " [a-z]{1,4}=\"[^\"]{0,6}\"",
            " [a-z]{1,4}='[^']{0,6}'",
            " [a-z]{1,4}=[a-z/]{0,4}",
            "[a-zA-Z \n\té]{0,10}",
            prop_oneof!["&amp;", "&lt;", "&#65;", "&#x1F600;", "&bogus;", "&#0;", "&"],
            "<!--[a-z &;-]{0,8}(-->)?",
            "<!\\[CDATA\\[[a-z<>&]{0,6}(\\]\\]>)?",
            "<!DOCTYPE [a-z \\[\\]\"'>]{0,10}",
            "<\\?[a-z]{0,4}[ a-z=\"]{0,6}(\\?>)?",
            Just("<script>".to_string()),
            Just("</script>".to_string()),
            Just("<".to_string()),
            Just("<!".to_string()),
            Just("=".to_string()),
        ],
        0..24,
    )
    .prop_map(|parts| parts.concat())
}

fn options_strategy() -> impl Strategy<Value = LexerOptions> {
    (any::<bool>(), any::<bool>()).prop_map(|(html, decode)| {
        LexerOptions::xml().with_html(html).with_entity_decoding(decode)
    })
}

fn any_document() -> impl Strategy<Value = String> {
    prop_oneof![markup_strategy(), "\\PC{0,64}", any::<String>()]
}

proptest! {
    #[test]
    fn test_lexing_terminates(input in any_document(), options in options_strategy()) {
        let tokens = lex_bounded(&input, options);
        prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::EndOfInput));
    }

    #[test]
    fn test_end_of_input_is_idempotent(input in any_document(), options in options_strategy()) {
        let mut lexer = Lexer::with_options(&input, options);
        let end = loop {
            let token = lexer.advance();
            if token.is_end() {
                break token;
            }
        };
        for _ in 0..3 {
            let again = lexer.advance();
            prop_assert!(again.is_end());
            prop_assert_eq!(again.span.end, input.len());
            prop_assert_eq!(again.location(), end.location());
        }
    }

    #[test]
    fn test_spans_reproduce_input(input in any_document(), options in options_strategy()) {
        let tokens = lex_bounded(&input, options);

        let mut expected_start = 0;
        for token in &tokens {
            prop_assert_eq!(token.span.start, expected_start);
            prop_assert!(token.content.start >= token.span.start);
            prop_assert!(token.content.end <= token.span.end);
            if !token.is_end() {
                prop_assert!(!token.span.is_empty(), "empty span for {:?}", token);
            }
            expected_start = token.span.end;
        }

        let rebuilt: String = tokens.iter().map(|t| t.raw(&input)).collect();
        prop_assert_eq!(rebuilt.as_str(), input.as_str());
    }

    #[test]
    fn test_text_matches_content(input in markup_strategy()) {
        // XML mode: every Text is decoded
        for token in lex_bounded(&input, LexerOptions::xml()) {
            let raw = token.content.slice(&input);
            match token.kind {
                TokenKind::Text | TokenKind::AttributeValue | TokenKind::Comment => {
                    prop_assert_eq!(token.text.clone(), decode_text(raw));
                }
                _ => prop_assert_eq!(&*token.text, raw),
            }
        }
    }

    #[test]
    fn test_undecoded_text_is_borrowed_content(input in any_document(), html in any::<bool>()) {
        let options = LexerOptions::xml().with_html(html).with_entity_decoding(false);
        for token in lex_bounded(&input, options) {
            prop_assert_eq!(&*token.text, token.content.slice(&input));
        }
    }

    #[test]
    fn test_decoding_does_not_change_structure(input in markup_strategy(), html in any::<bool>()) {
        let base = LexerOptions::xml().with_html(html);
        let decoded = lex_bounded(&input, base);
        let raw = lex_bounded(&input, base.with_entity_decoding(false));

        let shape = |tokens: &[Token<'_>]| -> Vec<_> {
            tokens.iter().map(|t| (t.kind, t.span, t.content, t.line, t.column)).collect()
        };
        prop_assert_eq!(shape(&decoded[..]), shape(&raw[..]));
    }
}
