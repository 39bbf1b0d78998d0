//! The public index facade, tying the codec, dihedral transformer,
//! entry store, and search backend together. `query` fans a hash out
//! across its 8 orientations, submits each to the backend, and keeps a
//! `seen_ids` set so a stored hash only contributes matches once, at
//! whichever orientation's distance hit it first.

use crate::backend::{AnyBackend, Backend, BackendKind};
use crate::codec::Hash;
use crate::dihedral;
use crate::entries::{EntryStore, Upsert};
use crate::error::{Error, Result};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// One hit from [`Index::query`]: the Hamming distance at which it was
/// found and the metadata it was registered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<M> {
    pub distance: u32,
    pub metadata: M,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Index<M> {
    threshold: u32,
    backend: AnyBackend,
    entries: EntryStore<M>,
}

impl<M> Index<M> {
    /// An empty index. `threshold` must be in `0..=256`.
    pub fn new(threshold: u32, backend_kind: BackendKind) -> Result<Self> {
        if threshold > 256 {
            return Err(Error::InvalidThreshold(threshold));
        }
        Ok(Self { threshold, backend: AnyBackend::new(backend_kind), entries: EntryStore::new() })
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Number of distinct hashes stored (`|entries|`, not the number of
    /// metadata entries).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register `metadata` under `hash`. Duplicate hashes never fail;
    /// they just grow that hash's metadata list.
    pub fn add(&mut self, hash: &str, metadata: M) -> Result<()> {
        let parsed = Hash::from_hex(hash)?;
        self.insert_parsed(parsed, metadata);
        Ok(())
    }

    /// Register every `(hash, metadata)` pair. Hashes are validated
    /// up front; a single malformed hash aborts the whole batch with no
    /// mutation to the index.
    pub fn add_all<I>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, M)>,
    {
        let mut parsed = Vec::new();
        for (hash, metadata) in items {
            parsed.push((Hash::from_hex(&hash)?, metadata));
        }
        for (hash, metadata) in parsed {
            self.insert_parsed(hash, metadata);
        }
        Ok(())
    }

    /// Checked after decoding a snapshot: the backend and entry store
    /// must have grown in lockstep, since every freshly assigned id is
    /// pushed into both, the dedup table must account for exactly as
    /// many hashes as there are ids, and every id's metadata list must be
    /// non-empty, since [`EntryStore::upsert`] never produces an empty
    /// one.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.entries.len() != self.backend.len() {
            return Err(Error::IndexCorrupt(format!(
                "entry store has {} ids but backend has {}",
                self.entries.len(),
                self.backend.len()
            )));
        }
        if self.entries.dedup_len() != self.entries.len() {
            return Err(Error::IndexCorrupt(format!(
                "dedup table has {} hashes but entry store has {} ids",
                self.entries.dedup_len(),
                self.entries.len()
            )));
        }
        if !self.entries.all_entries_non_empty() {
            return Err(Error::IndexCorrupt("an entry has an empty metadata list".to_string()));
        }
        if self.threshold > 256 {
            return Err(Error::IndexCorrupt(format!(
                "threshold {} out of range",
                self.threshold
            )));
        }
        Ok(())
    }

    fn insert_parsed(&mut self, hash: Hash, metadata: M) {
        if let Upsert::Inserted { .. } = self.entries.upsert(hash, metadata) {
            self.backend.push(hash);
        }
    }

    /// All matches across the 8 dihedral orientations of `hash`, each id
    /// appearing at most once (carrying the distance of whichever
    /// orientation hit it first).
    pub fn query(&self, hash: &str) -> Result<Vec<Match<M>>>
    where
        M: Clone,
    {
        let parsed = Hash::from_hex(hash)?;
        let orientations = dihedral::orientations(&parsed);

        let mut seen_ids = FxHashSet::default();
        let mut matches = Vec::new();

        for orientation in &orientations {
            for (id, distance) in self.backend.range_search(orientation, self.threshold) {
                if !seen_ids.insert(id) {
                    continue;
                }
                for metadata in self.entries.metadata(id) {
                    matches.push(Match { distance, metadata: metadata.clone() });
                }
            }
        }

        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_f_then_all_0() -> String {
        "f".repeat(32) + &"0".repeat(32)
    }

    #[test]
    fn scenario_s1_self_match_and_180_rotation_match() {
        let mut index: Index<&str> = Index::new(31, BackendKind::Flat).unwrap();
        let h = all_f_then_all_0();
        index.add(&h, "orig").unwrap();

        let self_matches = index.query(&h).unwrap();
        assert_eq!(self_matches, vec![Match { distance: 0, metadata: "orig" }]);

        let rotated_180 = "0".repeat(32) + &"f".repeat(32);
        let rotated_matches = index.query(&rotated_180).unwrap();
        assert_eq!(rotated_matches, vec![Match { distance: 0, metadata: "orig" }]);
    }

    #[test]
    fn scenario_s2_two_orientations_both_registered() {
        let mut index: Index<&str> = Index::new(31, BackendKind::Flat).unwrap();
        let h = Hash::from_hex(&all_f_then_all_0()).unwrap();
        let orientations = dihedral::orientations(&h);
        let rot90 = orientations[1];

        index.add(&h.to_hex(), "orig").unwrap();
        index.add(&rot90.to_hex(), "rot").unwrap();

        let mut matches = index.query(&h.to_hex()).unwrap();
        matches.sort_by_key(|m| m.metadata);
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.distance == 0));
        let metadatas: Vec<&str> = matches.iter().map(|m| m.metadata).collect();
        assert_eq!(metadatas, vec!["orig", "rot"]);
    }

    #[test]
    fn scenario_s3_dedup_keeps_len_one_but_both_metadata_entries() {
        let mut index: Index<&str> = Index::new(31, BackendKind::Flat).unwrap();
        let h = all_f_then_all_0();
        index.add(&h, "a").unwrap();
        index.add(&h, "b").unwrap();

        assert_eq!(index.len(), 1);
        let mut matches = index.query(&h).unwrap();
        matches.sort_by_key(|m| m.metadata);
        let metadatas: Vec<&str> = matches.iter().map(|m| m.metadata).collect();
        assert_eq!(metadatas, vec!["a", "b"]);
    }

    #[test]
    fn scenario_s6_malformed_hex_leaves_index_unchanged() {
        let mut index: Index<&str> = Index::new(31, BackendKind::Flat).unwrap();
        index.add(&all_f_then_all_0(), "orig").unwrap();

        let err = index.query("z".repeat(64).as_str());
        assert!(matches!(err, Err(Error::MalformedHash { .. })));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn add_all_aborts_entirely_on_a_malformed_hash() {
        let mut index: Index<&str> = Index::new(31, BackendKind::Flat).unwrap();
        let good = all_f_then_all_0();
        let result = index.add_all(vec![(good.clone(), "a"), ("bad".to_string(), "b")]);
        assert!(matches!(result, Err(Error::MalformedHash { .. })));
        assert_eq!(index.len(), 0, "no partial effect on a failed batch");
    }

    #[test]
    fn invalid_threshold_is_rejected() {
        let result: Result<Index<()>> = Index::new(257, BackendKind::Flat);
        assert!(matches!(result, Err(Error::InvalidThreshold(257))));
    }

    #[test]
    fn result_ids_never_duplicate_across_orientations() {
        // a hash with several of its own orientations equal (e.g. a
        // uniform hash) must still surface just one match set per id.
        let mut index: Index<&str> = Index::new(31, BackendKind::MultiIndex).unwrap();
        index.add(&Hash::ZERO.to_hex(), "uniform").unwrap();
        let matches = index.query(&Hash::ZERO.to_hex()).unwrap();
        assert_eq!(matches.len(), 1);
    }
}
