//! Error types for header decoding.

use thiserror::Error;

/// An error that occurs while decoding a serialized block header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// The input was not exactly [`crate::RAW_HEADER_LEN`] bytes long.
    #[error("Invalid header length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// The required length.
        expected: usize,
        /// The length that was supplied.
        actual: usize,
    },
    /// The `bitcoin` consensus decoder rejected the bytes.
    #[error("Header decode failed: {0}")]
    Decode(String),
}
