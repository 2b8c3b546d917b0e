//! Token model
//!
//! Tokens are plain values: a kind, the (possibly decoded) text, and byte
//! spans into the input. They borrow from the input unless decoding
//! produced a different string.

use std::borrow::Cow;
use std::fmt;

/// Type of lexical token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `<name` of a start tag; text is the element name
    TagOpenStart,
    /// `</name` of an end tag; text is the element name
    TagCloseStart,
    /// `>` closing a tag
    TagEnd,
    /// `/>` closing a tag (also `>` of an HTML void element)
    TagSelfCloseEnd,
    AttributeName,
    /// Attribute value without quotes, entities decoded
    AttributeValue,
    /// Character data between tags, entities decoded
    Text,
    /// Comment body, trimmed and entity decoded
    Comment,
    /// CDATA section body, verbatim
    CData,
    /// `<!DOCTYPE name`; text is the root element name (may be empty)
    Doctype,
    /// Bare word after the doctype name, usually `PUBLIC` or `SYSTEM`
    DoctypeKeyword,
    /// Quoted public or system identifier, without quotes
    DoctypeString,
    /// Internal subset between `[` and `]`, verbatim
    DoctypeSubset,
    /// `<?target data?>`; text is `target data`, trimmed
    ProcessingInstruction,
    /// `<?xml`; pseudo-attributes follow as attribute tokens, then `TagEnd`
    XmlDeclaration,
    EndOfInput,
}

impl TokenKind {
    /// Boundary tokens carry no content
    #[inline]
    pub fn is_boundary(self) -> bool {
        matches!(self, TokenKind::TagEnd | TokenKind::TagSelfCloseEnd | TokenKind::EndOfInput)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Half-open byte range into the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Zero-length span at `offset`
    #[inline]
    pub const fn empty(offset: usize) -> Self {
        Span { start: offset, end: offset }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Extract the spanned text from input
    #[inline]
    pub fn slice<'s>(&self, input: &'s str) -> &'s str {
        &input[self.start..self.end]
    }
}

/// 1-based line and column (columns count characters, not bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

/// A lexical token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Content of the token; borrowed from the input unless decoded
    pub text: Cow<'a, str>,
    /// Full raw extent, including delimiters and leading whitespace.
    /// Consecutive tokens' spans are contiguous.
    pub span: Span,
    /// Raw extent of the content `text` was taken from
    pub content: Span,
    /// Line of `content.start`
    pub line: u32,
    /// Column of `content.start`
    pub column: u32,
}

impl<'a> Token<'a> {
    pub(crate) fn new(kind: TokenKind, text: Cow<'a, str>, span: Span, content: Span, at: Location) -> Self {
        Token {
            kind,
            text,
            span,
            content,
            line: at.line,
            column: at.column,
        }
    }

    #[inline]
    pub fn location(&self) -> Location {
        Location {
            line: self.line,
            column: self.column,
        }
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.kind == TokenKind::EndOfInput
    }

    /// Raw source text of the whole token
    #[inline]
    pub fn raw<'s>(&self, input: &'s str) -> &'s str {
        self.span.slice(input)
    }

    /// Detach the token from the input buffer
    pub fn into_owned(self) -> Token<'static> {
        Token {
            kind: self.kind,
            text: Cow::Owned(self.text.into_owned()),
            span: self.span,
            content: self.content,
            line: self.line,
            column: self.column,
        }
    }
}

impl fmt::Display for Token<'_> {
    /// `Kind("text")`, or just `Kind` for boundary tokens
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.is_boundary() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}({:?})", self.kind, self.text)
        }
    }
}
