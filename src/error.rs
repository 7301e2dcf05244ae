//! Error types raised by the trie encodings.

use thiserror::Error;

/// Failure classes a caller may want to tell apart.
///
/// Fallible operations in this crate return [`anyhow::Result`]; these variants are raised
/// into [`anyhow::Error`] and can be recovered with `downcast_ref::<Error>()`.
///
/// # Examples
///
/// ```
/// use trie_encodings::{prelude::*, BinaryTrie, Error};
///
/// let e = BinaryTrie::from_bytes(&[1]).unwrap_err();
/// assert!(matches!(
///     e.downcast_ref::<Error>(),
///     Some(Error::MalformedEncoding(_))
/// ));
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// An input buffer is truncated or structurally invalid.
    #[error("malformed encoding: {0}")]
    MalformedEncoding(String),

    /// A character does not fit in a single-byte key.
    #[error("key {0:?} is outside the single-byte range")]
    KeyOutOfRange(char),

    /// A value does not fit in the fixed-width field of an encoding.
    #[error("capacity exceeded: {0}")]
    CapacityExceeded(String),
}

impl Error {
    pub(crate) fn malformed<S: Into<String>>(reason: S) -> Self {
        let reason = reason.into();
        tracing::debug!(%reason, "rejected encoding");
        Self::MalformedEncoding(reason)
    }
}
