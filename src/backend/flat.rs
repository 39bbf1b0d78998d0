//! Exhaustive backend: every stored hash is compared against the query,
//! fanned out over `rayon` once the corpus is big enough to make the
//! split worthwhile.

use crate::backend::Backend;
use crate::codec::Hash;
use crate::hamming::hamming;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlatBackend {
    hashes: Vec<Hash>,
}

impl FlatBackend {
    pub fn new() -> Self {
        Self { hashes: Vec::new() }
    }
}

impl Backend for FlatBackend {
    fn push(&mut self, hash: Hash) {
        self.hashes.push(hash);
    }

    fn range_search(&self, query: &Hash, threshold: u32) -> Vec<(u32, u32)> {
        // Below this size the parallel split overhead outweighs the scan.
        const PARALLEL_FLOOR: usize = 4096;

        if self.hashes.len() < PARALLEL_FLOOR {
            self.hashes
                .iter()
                .enumerate()
                .filter_map(|(id, h)| {
                    let dist = hamming(query, h);
                    (dist <= threshold).then_some((id as u32, dist))
                })
                .collect()
        } else {
            self.hashes
                .par_iter()
                .enumerate()
                .filter_map(|(id, h)| {
                    let dist = hamming(query, h);
                    (dist <= threshold).then_some((id as u32, dist))
                })
                .collect()
        }
    }

    fn len(&self) -> usize {
        self.hashes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_exact_match() {
        let mut b = FlatBackend::new();
        let h = Hash::from_hex(&"ab".repeat(32)).unwrap();
        b.push(h);
        let hits = b.range_search(&h, 0);
        assert_eq!(hits, vec![(0, 0)]);
    }

    #[test]
    fn excludes_hashes_beyond_threshold() {
        let mut b = FlatBackend::new();
        b.push(Hash::ZERO);
        b.push(Hash([0xff; 32]));
        let hits = b.range_search(&Hash::ZERO, 10);
        assert_eq!(hits, vec![(0, 0)]);
    }

    #[test]
    fn ids_are_insertion_order() {
        let mut b = FlatBackend::new();
        let a = Hash::from_hex(&"11".repeat(32)).unwrap();
        let c = Hash::from_hex(&"22".repeat(32)).unwrap();
        b.push(a);
        b.push(c);
        assert_eq!(b.len(), 2);
        let hits = b.range_search(&c, 0);
        assert_eq!(hits, vec![(1, 0)]);
    }
}
