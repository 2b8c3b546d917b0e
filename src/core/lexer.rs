//! XML Lexer - State machine for token extraction
//!
//! Pull-style lexer: every call to [`Lexer::advance`] scans forward from the
//! current position and returns exactly one token. The lexer is tolerant:
//! malformed or truncated markup produces best-effort tokens followed by
//! `EndOfInput`, never an error.
//!
//! Token spans tile the input. Each token's `span` starts where the previous
//! one ended, so whitespace inside tags and delimiters such as `="` belong
//! to the token that follows them.

use super::encoding::XmlEncoding;
use super::entities::decode_text;
use super::html;
use super::scanner::{is_name_start_char, is_whitespace, Scanner};
use super::token::{Location, Span, Token, TokenKind};
use crate::error::LexError;
use crate::options::LexerOptions;
use std::borrow::Cow;
use std::iter::FusedIterator;
use tracing::{debug, trace};

/// Current lexing state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexState {
    /// Between tags
    Data,
    /// At a '<' known to start markup
    TagOpen,
    /// After `<` or `</`
    TagName { closing: bool },
    /// Inside a tag, before an attribute name or the tag end
    AttributeName,
    /// After `=`
    AttributeValue,
    /// After `<!--`
    Comment,
    /// After `<![CDATA[`
    CData,
    /// After `<!DOCTYPE`, before the root element name
    Doctype,
    /// After the doctype name, up to the closing '>'
    DoctypeBody,
    /// After `<?`
    ProcessingInstruction,
    /// Inside an HTML `script`/`style` element, up to `</end`
    RawText { end: &'static str },
    /// End of input reached
    Done,
}

/// Markup construct starting at a '<'
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Markup {
    StartTag,
    EndTag,
    Comment,
    CData,
    Doctype,
    ProcessingInstruction,
}

/// Tolerant XML/HTML lexer over a borrowed input
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    scanner: Scanner<'a>,
    state: LexState,
    options: LexerOptions,
    /// Name of the tag currently being lexed
    tag_name: &'a str,
    closing_tag: bool,
    /// An attribute name was emitted and may be followed by `=`
    expect_value: bool,
    /// Attributes belong to `<?xml ...?>` and end at `?>`
    in_declaration: bool,
    /// Offset where the token being scanned started
    token_start: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for XML input
    pub fn new(input: &'a str) -> Self {
        Self::with_options(input, LexerOptions::default())
    }

    pub fn with_options(input: &'a str, options: LexerOptions) -> Self {
        debug!(len = input.len(), html = options.html, "creating lexer");
        Lexer {
            scanner: Scanner::new(input),
            state: LexState::Data,
            options,
            tag_name: "",
            closing_tag: false,
            expect_value: false,
            in_declaration: false,
            token_start: 0,
        }
    }

    /// Create a lexer over raw bytes without copying them
    ///
    /// # Errors
    ///
    /// Returns [`LexError::InvalidInput`] if the bytes are not UTF-8. UTF-16
    /// documents must be converted with [`crate::decode_input`] first.
    pub fn from_bytes(input: &'a [u8], options: LexerOptions) -> Result<Self, LexError> {
        if XmlEncoding::has_utf16_bom(input) {
            return Err(LexError::invalid_input(0, "UTF-16 input must be converted with decode_input"));
        }
        let text = std::str::from_utf8(input)?;
        Ok(Self::with_options(text, options))
    }

    pub fn input(&self) -> &'a str {
        self.scanner.input()
    }

    pub fn options(&self) -> LexerOptions {
        self.options
    }

    /// Get the current lexing state
    pub fn state(&self) -> LexState {
        self.state
    }

    /// Get the current byte offset in the input
    pub fn position(&self) -> usize {
        self.scanner.position()
    }

    /// Line and column of the current offset
    pub fn location(&self) -> Location {
        self.scanner.location()
    }

    /// True once `EndOfInput` has been returned
    pub fn is_finished(&self) -> bool {
        self.state == LexState::Done
    }

    /// Scan the next token
    ///
    /// Always returns a token. After `EndOfInput` every further call
    /// returns `EndOfInput` again.
    pub fn advance(&mut self) -> Token<'a> {
        self.token_start = self.scanner.position();

        let token = loop {
            let step = match self.state {
                LexState::Data => self.lex_data(),
                LexState::TagOpen => self.lex_tag_open(),
                LexState::TagName { closing } => Some(self.lex_tag_name(closing)),
                LexState::AttributeName => self.lex_attribute_name(),
                LexState::AttributeValue => self.lex_attribute_value(),
                LexState::Comment => Some(self.lex_comment()),
                LexState::CData => Some(self.lex_cdata()),
                LexState::Doctype => Some(self.lex_doctype_name()),
                LexState::DoctypeBody => self.lex_doctype_body(),
                LexState::ProcessingInstruction => Some(self.lex_processing_instruction()),
                LexState::RawText { end } => self.lex_raw_text(end),
                LexState::Done => Some(self.end_of_input()),
            };
            if let Some(token) = step {
                break token;
            }
        };

        trace!(
            kind = %token.kind,
            start = token.span.start,
            end = token.span.end,
            line = token.line,
            column = token.column,
            "token"
        );
        token
    }

    // ========================================================================
    // States
    // ========================================================================

    fn lex_data(&mut self) -> Option<Token<'a>> {
        if self.scanner.is_eof() {
            self.state = LexState::Done;
            return None;
        }

        let start = self.scanner.position();
        if self.markup_at(start).is_some() {
            self.state = LexState::TagOpen;
            return None;
        }

        // Text runs up to the next '<' that opens markup
        let mut search = start;
        let end = loop {
            match self.scanner.find_tag_start_from(search) {
                Some(lt) if self.markup_at(lt).is_some() => break lt,
                Some(lt) => search = lt + 1,
                None => break self.scanner.input().len(),
            }
        };

        Some(self.emit(TokenKind::Text, Span::new(start, end), end, true))
    }

    fn lex_tag_open(&mut self) -> Option<Token<'a>> {
        let (prefix_len, next) = match self.markup_at(self.scanner.position()) {
            Some(Markup::StartTag) => (1, LexState::TagName { closing: false }),
            Some(Markup::EndTag) => (2, LexState::TagName { closing: true }),
            Some(Markup::Comment) => (4, LexState::Comment),
            Some(Markup::CData) => (9, LexState::CData),
            Some(Markup::Doctype) => (9, LexState::Doctype),
            Some(Markup::ProcessingInstruction) => (2, LexState::ProcessingInstruction),
            None => (0, LexState::Data),
        };
        self.scanner.advance(prefix_len);
        self.state = next;
        None
    }

    fn lex_tag_name(&mut self, closing: bool) -> Token<'a> {
        let start = self.scanner.position();
        let end = self.scanner.name_end();

        self.tag_name = self.scanner.slice(start, end);
        self.closing_tag = closing;
        self.expect_value = false;
        self.state = LexState::AttributeName;

        let kind = if closing {
            TokenKind::TagCloseStart
        } else {
            TokenKind::TagOpenStart
        };
        self.emit(kind, Span::new(start, end), end, false)
    }

    fn lex_attribute_name(&mut self) -> Option<Token<'a>> {
        self.scanner.skip_whitespace();
        let pos = self.scanner.position();

        match self.scanner.peek() {
            None => {
                debug!(tag = self.tag_name, "unterminated tag at end of input");
                self.state = LexState::Done;
                None
            }
            Some(b'?') if self.in_declaration && self.scanner.peek_at(1) == Some(b'>') => {
                self.state = LexState::Data;
                self.expect_value = false;
                self.in_declaration = false;
                Some(self.emit(TokenKind::TagEnd, Span::empty(pos), pos + 2, false))
            }
            Some(b'>') => Some(self.close_tag(pos)),
            Some(b'/') if self.scanner.peek_at(1) == Some(b'>') => {
                self.state = LexState::Data;
                self.expect_value = false;
                self.in_declaration = false;
                Some(self.emit(TokenKind::TagSelfCloseEnd, Span::empty(pos), pos + 2, false))
            }
            Some(b'=') if self.expect_value => {
                self.scanner.advance(1);
                self.expect_value = false;
                self.state = LexState::AttributeValue;
                None
            }
            // Stray '/' or '='
            Some(b'/') | Some(b'=') => {
                self.scanner.advance(1);
                self.expect_value = false;
                None
            }
            // Quoted run without a name, as in `<a ="v">`
            Some(quote @ (b'"' | b'\'')) => {
                self.scanner.advance(1);
                if let Some(close) = self.scanner.find_byte(quote) {
                    self.scanner.seek(close + 1);
                }
                self.expect_value = false;
                None
            }
            Some(_) => {
                let end = self.declaration_clip(pos, self.scanner.name_end());
                self.expect_value = true;
                Some(self.emit(TokenKind::AttributeName, Span::new(pos, end), end, false))
            }
        }
    }

    fn lex_attribute_value(&mut self) -> Option<Token<'a>> {
        self.scanner.skip_whitespace();
        let pos = self.scanner.position();
        self.state = LexState::AttributeName;

        match self.scanner.peek() {
            None => {
                debug!(tag = self.tag_name, "missing attribute value at end of input");
                self.state = LexState::Done;
                None
            }
            Some(quote @ (b'"' | b'\'')) => {
                self.scanner.advance(1);
                let start = pos + 1;
                let (end, consume_to) = match self.scanner.find_byte(quote) {
                    Some(close) => (close, close + 1),
                    None => {
                        debug!(tag = self.tag_name, "unterminated attribute value at end of input");
                        let len = self.scanner.input().len();
                        (len, len)
                    }
                };
                Some(self.emit(TokenKind::AttributeValue, Span::new(start, end), consume_to, true))
            }
            // `name=>` has an empty value
            Some(b'>') => Some(self.emit(TokenKind::AttributeValue, Span::empty(pos), pos, true)),
            Some(_) => {
                let end = self.declaration_clip(pos, self.scanner.unquoted_value_end());
                Some(self.emit(TokenKind::AttributeValue, Span::new(pos, end), end, true))
            }
        }
    }

    fn lex_comment(&mut self) -> Token<'a> {
        let start = self.scanner.position();
        let (end, consume_to) = self.find_terminator(b"-->", "comment");
        self.state = LexState::Data;
        let content = self.trimmed(start, end);
        self.emit(TokenKind::Comment, content, consume_to, true)
    }

    fn lex_cdata(&mut self) -> Token<'a> {
        let start = self.scanner.position();
        let (end, consume_to) = self.find_terminator(b"]]>", "CDATA section");
        self.state = LexState::Data;
        self.emit(TokenKind::CData, Span::new(start, end), consume_to, false)
    }

    fn lex_doctype_name(&mut self) -> Token<'a> {
        self.scanner.skip_whitespace();
        let start = self.scanner.position();
        let end = self.scanner.doctype_word_end();
        self.state = LexState::DoctypeBody;
        self.emit(TokenKind::Doctype, Span::new(start, end), end, false)
    }

    fn lex_doctype_body(&mut self) -> Option<Token<'a>> {
        self.scanner.skip_whitespace();
        let pos = self.scanner.position();

        match self.scanner.peek() {
            None => {
                self.log_unterminated("doctype");
                self.state = LexState::Done;
                None
            }
            Some(b'>') => {
                self.state = LexState::Data;
                Some(self.emit(TokenKind::TagEnd, Span::empty(pos), pos + 1, false))
            }
            Some(quote @ (b'"' | b'\'')) => {
                self.scanner.advance(1);
                let (end, consume_to) = match self.scanner.find_byte(quote) {
                    Some(close) => (close, close + 1),
                    None => {
                        self.log_unterminated("doctype literal");
                        let len = self.scanner.input().len();
                        (len, len)
                    }
                };
                Some(self.emit(TokenKind::DoctypeString, Span::new(pos + 1, end), consume_to, false))
            }
            Some(b'[') => {
                self.scanner.advance(1);
                let (end, consume_to) = match self.scanner.find_subset_end() {
                    Some(close) => (close, close + 1),
                    None => {
                        self.log_unterminated("internal subset");
                        let len = self.scanner.input().len();
                        (len, len)
                    }
                };
                Some(self.emit(TokenKind::DoctypeSubset, Span::new(pos + 1, end), consume_to, false))
            }
            Some(_) => {
                let end = self.scanner.doctype_word_end();
                Some(self.emit(TokenKind::DoctypeKeyword, Span::new(pos, end), end, false))
            }
        }
    }

    fn lex_processing_instruction(&mut self) -> Token<'a> {
        let start = self.scanner.position();

        // `<?xml` is lexed like a tag: pseudo-attributes follow until `?>`
        if self.declaration_at(start) {
            let end = start + 3;
            self.tag_name = self.scanner.slice(start, end);
            self.closing_tag = false;
            self.expect_value = false;
            self.in_declaration = true;
            self.state = LexState::AttributeName;
            return self.emit(TokenKind::XmlDeclaration, Span::new(start, end), end, false);
        }

        let (end, consume_to) = self.find_terminator(b"?>", "processing instruction");
        self.state = LexState::Data;
        let content = self.trimmed(start, end);
        self.emit(TokenKind::ProcessingInstruction, content, consume_to, false)
    }

    fn lex_raw_text(&mut self, element: &'static str) -> Option<Token<'a>> {
        let start = self.scanner.position();
        let len = self.scanner.input().len();

        let mut search = start;
        let end = loop {
            match self.scanner.find_literal_from(search, b"</") {
                Some(lt) if self.closes_raw_text(lt, element) => break lt,
                Some(lt) => search = lt + 2,
                None => break len,
            }
        };

        self.state = LexState::Data;
        if end == start {
            return None;
        }
        Some(self.emit(TokenKind::Text, Span::new(start, end), end, false))
    }

    fn end_of_input(&mut self) -> Token<'a> {
        self.scanner.seek_end();
        let end = self.scanner.position();
        Token::new(
            TokenKind::EndOfInput,
            Cow::Borrowed(""),
            Span::new(self.token_start, end),
            Span::empty(end),
            self.scanner.location(),
        )
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Classify the markup starting at `at`, if the byte there is a '<'
    /// that opens any
    fn markup_at(&self, at: usize) -> Option<Markup> {
        let bytes = self.scanner.input().as_bytes();
        if bytes.get(at) != Some(&b'<') {
            return None;
        }

        match bytes.get(at + 1).copied()? {
            b'/' => bytes
                .get(at + 2)
                .copied()
                .filter(|&b| is_name_start_char(b))
                .map(|_| Markup::EndTag),
            b'!' => {
                if self.scanner.starts_with_at(at, b"<!--") {
                    Some(Markup::Comment)
                } else if self.scanner.starts_with_at(at, b"<![CDATA[") {
                    Some(Markup::CData)
                } else if self.scanner.starts_with_ignore_case_at(at, b"<!DOCTYPE") {
                    Some(Markup::Doctype)
                } else {
                    None
                }
            }
            b'?' => Some(Markup::ProcessingInstruction),
            b if is_name_start_char(b) => Some(Markup::StartTag),
            _ => None,
        }
    }

    /// Emit the token for a '>' at `at` and pick the state that follows it
    fn close_tag(&mut self, at: usize) -> Token<'a> {
        let html_open = self.options.html && !self.closing_tag;
        let kind = if html_open && html::is_void_element(self.tag_name) {
            TokenKind::TagSelfCloseEnd
        } else {
            TokenKind::TagEnd
        };

        self.expect_value = false;
        self.in_declaration = false;
        self.state = match html::raw_text_element(self.tag_name) {
            Some(end) if html_open => LexState::RawText { end },
            _ => LexState::Data,
        };
        self.emit(kind, Span::empty(at), at + 1, false)
    }

    /// `xml` followed by whitespace, `?` or the end of input
    fn declaration_at(&self, at: usize) -> bool {
        self.scanner.starts_with_at(at, b"xml")
            && self
                .scanner
                .input()
                .as_bytes()
                .get(at + 3)
                .map_or(true, |&b| is_whitespace(b) || b == b'?')
    }

    /// Inside a declaration, cut a name or unquoted value short at `?>`
    fn declaration_clip(&self, start: usize, end: usize) -> usize {
        if !self.in_declaration {
            return end;
        }
        self.scanner.find_literal_before(start, end, b"?>").unwrap_or(end)
    }

    /// Check for `</element` followed by a name terminator at `at`
    fn closes_raw_text(&self, at: usize, element: &str) -> bool {
        let name_start = at + 2;
        if !self.scanner.starts_with_ignore_case_at(name_start, element.as_bytes()) {
            return false;
        }
        match self.scanner.input().as_bytes().get(name_start + element.len()) {
            None => true,
            Some(&b) => is_whitespace(b) || b == b'/' || b == b'>',
        }
    }

    /// Locate `terminator` from the cursor; returns (content end, consume to)
    fn find_terminator(&self, terminator: &[u8], construct: &'static str) -> (usize, usize) {
        match self.scanner.find_literal(terminator) {
            Some(end) => (end, end + terminator.len()),
            None => {
                self.log_unterminated(construct);
                let len = self.scanner.input().len();
                (len, len)
            }
        }
    }

    fn log_unterminated(&self, construct: &'static str) {
        let at = self.scanner.location();
        debug!(line = at.line, column = at.column, "unterminated {construct} at end of input");
    }

    /// Span of `start..end` without surrounding XML whitespace
    fn trimmed(&self, start: usize, end: usize) -> Span {
        let raw = self.scanner.slice(start, end);
        let is_ws = |c: char| c.is_ascii() && is_whitespace(c as u8);
        let body = raw.trim_start_matches(is_ws);
        if body.is_empty() {
            return Span::empty(start);
        }
        let lead = raw.len() - body.len();
        let trail = body.len() - body.trim_end_matches(is_ws).len();
        Span::new(start + lead, end - trail)
    }

    /// Build a token whose content is `content`, consuming input up to
    /// `consume_to`
    fn emit(&mut self, kind: TokenKind, content: Span, consume_to: usize, decode: bool) -> Token<'a> {
        self.scanner.seek(content.start);
        let at = self.scanner.location();
        self.scanner.seek(consume_to);

        let raw = self.scanner.slice(content.start, content.end);
        let text = if decode && self.options.decode_entities {
            decode_text(raw)
        } else {
            Cow::Borrowed(raw)
        };

        Token::new(kind, text, Span::new(self.token_start, self.scanner.position()), content, at)
    }
}

/// Iterator adapter for the lexer; stops before `EndOfInput`
impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.advance();
        if token.is_end() {
            None
        } else {
            Some(token)
        }
    }
}

impl FusedIterator for Lexer<'_> {}
