//! Batch lexing strategies
//!
//! A single document is always lexed sequentially; independent documents
//! can be spread over a rayon thread pool.

pub mod parallel;

pub use parallel::lex_parallel;
