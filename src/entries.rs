//! Entry store: hash deduplication plus the per-id metadata lists. A
//! hash seen before gets its new metadata appended to the existing
//! entry; a hash seen for the first time gets a fresh dense id.
//!
//! Ids are dense (`0..dedup.len()`) and assigned in first-seen order, so
//! `entries[id]` always lines up with the dense id a [`crate::backend`]
//! hands back from a range query.

use crate::codec::Hash;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryStore<M> {
    dedup: FxHashMap<Hash, u32>,
    entries: Vec<Vec<M>>,
}

impl<M> Default for EntryStore<M> {
    fn default() -> Self {
        Self { dedup: FxHashMap::default(), entries: Vec::new() }
    }
}

/// Outcome of [`EntryStore::upsert`]: whether the hash was new (and thus
/// needs pushing into the search backend too) or already present.
pub enum Upsert {
    /// First time this hash has been seen; `id` is its freshly assigned
    /// dense id.
    Inserted { id: u32 },
    /// The hash already had an id; its metadata list just grew.
    Merged { id: u32 },
}

impl<M> EntryStore<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `metadata` under `hash`. A hash seen for the first time
    /// gets a new dense id and a fresh one-element metadata list
    /// (every id's metadata list must stay non-empty); a hash seen
    /// before gets `metadata` appended to its
    /// existing list.
    pub fn upsert(&mut self, hash: Hash, metadata: M) -> Upsert {
        match self.dedup.get(&hash) {
            Some(&id) => {
                self.entries[id as usize].push(metadata);
                Upsert::Merged { id }
            }
            None => {
                let id = self.entries.len() as u32;
                self.dedup.insert(hash, id);
                self.entries.push(vec![metadata]);
                Upsert::Inserted { id }
            }
        }
    }

    pub fn metadata(&self, id: u32) -> &[M] {
        &self.entries[id as usize]
    }

    pub fn id_of(&self, hash: &Hash) -> Option<u32> {
        self.dedup.get(hash).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct hashes recorded in the dedup table. Must always
    /// equal [`Self::len`]; exposed so a decoded snapshot can be checked
    /// for a desynced dedup table before it's trusted.
    pub fn dedup_len(&self) -> usize {
        self.dedup.len()
    }

    /// Whether every id's metadata list is non-empty, the invariant
    /// [`Self::upsert`] maintains by construction but a decoded snapshot
    /// could violate.
    pub fn all_entries_non_empty(&self) -> bool {
        self.entries.iter().all(|list| !list.is_empty())
    }
}
