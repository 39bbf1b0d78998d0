//! Multi-index hashing backend: the 256-bit hash is split into 16
//! sixteen-bit chunks, each chunk indexed in its own bucket table. A
//! range query probes, per chunk, every chunk value within
//! `threshold / NUM_CHUNKS` bit flips of the query's own chunk value —
//! pigeonhole guarantees any hash within `threshold` of the query
//! mismatches at least one chunk by no more than that many bits, since
//! 16 per-chunk distances summing to at most `threshold` can't all
//! exceed `threshold / NUM_CHUNKS`. Flipping only a single bit regardless
//! of that tolerance would silently drop matches once the tolerance
//! exceeds 1 (`threshold > 31`), so the flip radius tracks it exactly.
//!
//! Bucket tables are incremental per-chunk hash maps rather than a
//! CSR layout built once from the whole corpus, so
//! [`crate::entries::EntryStore`] can grow the backend one hash at a
//! time.

use crate::backend::Backend;
use crate::codec::Hash;
use crate::hamming::hamming;
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

const NUM_CHUNKS: usize = 16;
const BITS_PER_CHUNK: u32 = 16;

fn chunk_of(hash: &Hash, chunk_idx: usize) -> u16 {
    let bytes = hash.as_bytes();
    u16::from_be_bytes([bytes[chunk_idx * 2], bytes[chunk_idx * 2 + 1]])
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MultiIndexBackend {
    hashes: Vec<Hash>,
    // one bucket table per chunk slot; `buckets[k][v]` lists every dense
    // id whose chunk `k` equals `v`.
    buckets: Vec<FxHashMap<u16, Vec<u32>>>,
}

impl MultiIndexBackend {
    pub fn new() -> Self {
        Self { hashes: Vec::new(), buckets: vec![FxHashMap::default(); NUM_CHUNKS] }
    }

    fn candidates_for(&self, query: &Hash, threshold: u32) -> FxHashSet<u32> {
        let chunk_tolerance = (threshold / NUM_CHUNKS as u32).min(BITS_PER_CHUNK);
        let mut candidates = FxHashSet::default();

        for k in 0..NUM_CHUNKS {
            let q_chunk = chunk_of(query, k);
            let table = &self.buckets[k];

            let probe = |value: u16| {
                if let Some(ids) = table.get(&value) {
                    candidates.extend(ids.iter().copied());
                }
            };

            for_each_flip_within(q_chunk, chunk_tolerance, probe);
        }

        candidates
    }
}

/// Calls `f` once for every value reachable from `chunk` by flipping at
/// most `tolerance` of its bits, including `chunk` itself (zero flips).
/// Standard combination enumeration over bit positions, so each value is
/// visited exactly once regardless of flip order.
fn for_each_flip_within(chunk: u16, tolerance: u32, mut f: impl FnMut(u16)) {
    fn recurse(value: u16, remaining: u32, start_bit: u32, f: &mut dyn FnMut(u16)) {
        f(value);
        if remaining == 0 {
            return;
        }
        for bit in start_bit..BITS_PER_CHUNK {
            recurse(value ^ (1 << bit), remaining - 1, bit + 1, f);
        }
    }
    recurse(chunk, tolerance, 0, &mut f);
}

impl Backend for MultiIndexBackend {
    fn push(&mut self, hash: Hash) {
        let id = self.hashes.len() as u32;
        for k in 0..NUM_CHUNKS {
            self.buckets[k].entry(chunk_of(&hash, k)).or_default().push(id);
        }
        self.hashes.push(hash);
    }

    fn range_search(&self, query: &Hash, threshold: u32) -> Vec<(u32, u32)> {
        let candidates = self.candidates_for(query, threshold);

        // candidates_for only narrows by per-chunk distance, so a
        // candidate's real distance still needs the exact check before
        // it's reported.
        const PARALLEL_FLOOR: usize = 4096;
        if candidates.len() < PARALLEL_FLOOR {
            candidates
                .into_iter()
                .filter_map(|id| {
                    let dist = hamming(query, &self.hashes[id as usize]);
                    (dist <= threshold).then_some((id, dist))
                })
                .collect()
        } else {
            candidates
                .into_par_iter()
                .filter_map(|id| {
                    let dist = hamming(query, &self.hashes[id as usize]);
                    (dist <= threshold).then_some((id, dist))
                })
                .collect()
        }
    }

    fn len(&self) -> usize {
        self.hashes.len()
    }
}
