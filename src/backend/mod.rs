//! Range search backend: the two interchangeable strategies for
//! "every stored hash within `threshold` of a query", selected once at
//! construction.

pub mod flat;
pub mod multi_index;

use crate::codec::Hash;

/// Which range-search strategy an [`crate::index::Index`] was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BackendKind {
    /// Exhaustive pairwise scan. No false negatives at any threshold;
    /// cost grows linearly with corpus size per query.
    Flat,
    /// Multi-index hashing over 16-bit chunks. Exact at any threshold —
    /// each chunk's bucket lookup expands to every value within
    /// `threshold / 16` bit flips, so a stored hash within `threshold`
    /// always lands in at least one chunk's probe set (pigeonhole). Probe
    /// cost per chunk grows combinatorially with that per-chunk
    /// tolerance, so this backend is only sub-linear for the tight
    /// thresholds it's meant for; `BackendKind::Flat` is the better choice
    /// once `threshold` climbs much past the confident-match range.
    MultiIndex,
}

/// Default distance threshold for [`BackendKind::Flat`].
pub const DEFAULT_FLAT_THRESHOLD: u32 = 52;

/// Default distance threshold for [`BackendKind::MultiIndex`] — the
/// confident-match threshold for PDQ hashes.
pub const DEFAULT_MULTI_INDEX_THRESHOLD: u32 = 31;

/// A backend holds one hash per dense id, in insertion order, and answers
/// range queries against the whole set. Ids are assigned by
/// [`crate::entries::EntryStore`]; a backend never invents or reorders
/// them, it only appends.
pub trait Backend: Send + Sync {
    /// Append `hash` as the next dense id (`len()` before the call).
    fn push(&mut self, hash: Hash);

    /// All dense ids whose stored hash is within `threshold` of `query`,
    /// paired with that Hamming distance. Order is unspecified.
    fn range_search(&self, query: &Hash, threshold: u32) -> Vec<(u32, u32)>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The concrete backend storage, picked once at construction and carried
/// through serialization. An enum rather than `Box<dyn Backend>` because
/// the snapshot format needs to serialize the concrete state, not a
/// trait object.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum AnyBackend {
    Flat(flat::FlatBackend),
    MultiIndex(multi_index::MultiIndexBackend),
}

impl AnyBackend {
    pub fn new(kind: BackendKind) -> Self {
        match kind {
            BackendKind::Flat => AnyBackend::Flat(flat::FlatBackend::new()),
            BackendKind::MultiIndex => AnyBackend::MultiIndex(multi_index::MultiIndexBackend::new()),
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            AnyBackend::Flat(_) => BackendKind::Flat,
            AnyBackend::MultiIndex(_) => BackendKind::MultiIndex,
        }
    }
}

impl Backend for AnyBackend {
    fn push(&mut self, hash: Hash) {
        match self {
            AnyBackend::Flat(b) => b.push(hash),
            AnyBackend::MultiIndex(b) => b.push(hash),
        }
    }

    fn range_search(&self, query: &Hash, threshold: u32) -> Vec<(u32, u32)> {
        match self {
            AnyBackend::Flat(b) => b.range_search(query, threshold),
            AnyBackend::MultiIndex(b) => b.range_search(query, threshold),
        }
    }

    fn len(&self) -> usize {
        match self {
            AnyBackend::Flat(b) => b.len(),
            AnyBackend::MultiIndex(b) => b.len(),
        }
    }
}
