//! A content-addressable similarity index over 256-bit PDQ perceptual
//! hashes: insert hashes with arbitrary metadata, then query by hash and
//! get back every previously registered hash within a configured
//! Hamming distance, matched through any of the eight dihedral
//! re-orientations of the query.
//!
//! The core is organized as a bit-layout codec, a dihedral transform
//! table, a Hamming kernel, a pluggable range-search backend, and a
//! dedup/metadata store, composed behind one facade type.

pub mod backend;
pub mod codec;
pub mod dihedral;
pub mod entries;
pub mod error;
pub mod hamming;
pub mod index;
pub mod snapshot;

pub use backend::{BackendKind, DEFAULT_FLAT_THRESHOLD, DEFAULT_MULTI_INDEX_THRESHOLD};
pub use codec::Hash;
pub use error::{Error, Result};
pub use index::{Index, Match};
