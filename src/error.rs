//! Construction errors
//!
//! Scanning itself never fails; the only errors are raised when an input
//! buffer cannot be turned into text the lexer can borrow.

use thiserror::Error;

/// Error returned when a lexer cannot be constructed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// The buffer is not usable as lexer input
    #[error("invalid input at byte {offset}: {reason}")]
    InvalidInput {
        /// Byte offset of the first offending byte
        offset: usize,
        reason: &'static str,
    },
}

impl LexError {
    pub(crate) fn invalid_input(offset: usize, reason: &'static str) -> Self {
        LexError::InvalidInput { offset, reason }
    }

    /// Byte offset the error refers to
    pub fn offset(&self) -> usize {
        match self {
            LexError::InvalidInput { offset, .. } => *offset,
        }
    }
}

impl From<std::str::Utf8Error> for LexError {
    fn from(err: std::str::Utf8Error) -> Self {
        LexError::invalid_input(err.valid_up_to(), "input is not valid UTF-8")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_error_offset() {
        let bytes = [b'<', b'a', 0xFF, b'>'];
        let err: LexError = std::str::from_utf8(&bytes).unwrap_err().into();
        assert_eq!(err.offset(), 2);
        assert_eq!(err.to_string(), "invalid input at byte 2: input is not valid UTF-8");
    }
}
