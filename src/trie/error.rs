//! Error types for trie operations.

use thiserror::Error;

/// Result type alias for trie operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when building, querying, or (de)serializing a [`Trie`](super::Trie).
///
/// "No such word" is never an error: lookups report absence with `false`,
/// `None`, or an empty iterator.
#[derive(Error, Debug)]
pub enum Error {
    /// An argument was rejected before any work was done, e.g. an empty word
    /// or a fragment pattern bounded by wildcards on both ends.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A serialized trie stream was truncated or malformed.
    #[error("malformed trie stream: {0}")]
    Format(String),

    /// An internal consistency check failed. Please report if encountered.
    #[error("trie invariant violated: {0}")]
    InvariantViolation(String),

    /// The underlying reader or writer failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    pub(crate) fn format(message: impl Into<String>) -> Self {
        Error::Format(message.into())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let err = Error::invalid("cannot add an empty word");
        assert_eq!(err.to_string(), "invalid argument: cannot add an empty word");

        let err = Error::format("unexpected end of stream");
        assert_eq!(err.to_string(), "malformed trie stream: unexpected end of stream");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
