//! Parallel batch lexing
//!
//! Uses Rayon to tokenize independent documents concurrently.

use crate::core::lexer::Lexer;
use crate::core::token::Token;
use crate::options::LexerOptions;
use rayon::prelude::*;

/// Lex several documents in parallel
///
/// Output order matches input order. Each inner vector holds the tokens of
/// one document, without the trailing `EndOfInput`.
pub fn lex_parallel<'a>(documents: &[&'a str], options: LexerOptions) -> Vec<Vec<Token<'a>>> {
    documents
        .par_iter()
        .map(|input| Lexer::with_options(input, options).collect())
        .collect()
}
