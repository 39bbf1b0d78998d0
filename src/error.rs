//! Error kinds returned by the index core.

use thiserror::Error;

/// Failure modes of the similarity index.
#[derive(Debug, Error)]
pub enum Error {
    /// A hash string was not 64 lowercase-or-uppercase hex characters.
    #[error("malformed hash {hash:?}: expected 64 hex characters, got {len}")]
    MalformedHash { hash: String, len: usize },

    /// `Index::new` was called with a threshold outside `[0, 256]`.
    #[error("invalid threshold {0}: must be in 0..=256")]
    InvalidThreshold(u32),

    /// I/O failure while writing or reading a snapshot.
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A snapshot failed to decode, or decoded to a structurally invalid
    /// index (id/dedup/entries length mismatch, unknown format version,
    /// id overflow). Fatal: the caller should discard the index.
    #[error("index corrupt: {0}")]
    IndexCorrupt(String),
}

pub type Result<T> = std::result::Result<T, Error>;
