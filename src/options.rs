//! Lexer configuration

/// Options controlling how input is lexed
///
/// The default lexes XML with entity decoding enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerOptions {
    /// Treat the input as HTML: void elements close themselves and the
    /// content of `script`/`style` is raw text
    pub html: bool,
    /// Decode predefined entities and numeric references in text,
    /// attribute values and comments
    pub decode_entities: bool,
}

impl LexerOptions {
    /// Options for XML input
    pub const fn xml() -> Self {
        LexerOptions {
            html: false,
            decode_entities: true,
        }
    }

    /// Options for HTML input
    pub const fn html() -> Self {
        LexerOptions {
            html: true,
            decode_entities: true,
        }
    }

    pub const fn with_html(mut self, html: bool) -> Self {
        self.html = html;
        self
    }

    pub const fn with_entity_decoding(mut self, decode: bool) -> Self {
        self.decode_entities = decode;
        self
    }
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self::xml()
    }
}
