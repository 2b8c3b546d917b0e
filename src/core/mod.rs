//! Core lexing primitives
//!
//! - Scanner: SIMD-accelerated delimiter detection using memchr
//! - Lexer: State machine for token extraction
//! - Token: Token kinds, spans and locations
//! - Entities: XML entity decoding with Cow (zero-copy when possible)
//! - Encoding: UTF-16 detection and conversion to UTF-8
//! - Html: Void and raw-text element tables for HTML mode

pub mod encoding;
pub mod entities;
pub mod html;
pub mod lexer;
pub mod scanner;
pub mod token;
