//! Hash codec: hex ⇄ 256-bit binary, and 16×16 bit-grid packing.
//!
//! Bit layout: bit `i` of the binary expansion sits at grid
//! cell `(i / 16, i % 16)`, row-major. The hex form is big-endian nibble
//! order — character `k` encodes bits `4k..=4k+3`, most-significant bit
//! first — which is exactly what `hex::decode`/`hex::encode` already do
//! for a byte string, so the codec is a thin, total wrapper around `hex`.

use crate::error::Error;
use serde::{Deserialize, Serialize};

pub const HASH_BYTES: usize = 32;
pub const GRID_DIM: usize = 16;

/// A 256-bit PDQ fingerprint in its canonical internal form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Hash(pub [u8; HASH_BYTES]);

impl Hash {
    pub const ZERO: Hash = Hash([0u8; HASH_BYTES]);

    /// Parse 64 hex characters (case-insensitive) into a canonical hash.
    pub fn from_hex(s: &str) -> Result<Self, Error> {
        if s.len() != HASH_BYTES * 2 {
            return Err(Error::MalformedHash { hash: s.to_string(), len: s.len() });
        }
        let mut bytes = [0u8; HASH_BYTES];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|_| Error::MalformedHash { hash: s.to_string(), len: s.len() })?;
        Ok(Hash(bytes))
    }

    /// Render as 64 lowercase hex characters. Total.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Unpack into a row-major 16×16 grid of bits.
    pub fn to_grid(&self) -> [[bool; GRID_DIM]; GRID_DIM] {
        let mut grid = [[false; GRID_DIM]; GRID_DIM];
        for i in 0..256 {
            let byte = self.0[i / 8];
            let bit = (byte >> (7 - (i % 8))) & 1;
            grid[i / GRID_DIM][i % GRID_DIM] = bit != 0;
        }
        grid
    }

    /// Pack a row-major 16×16 grid of bits back into a hash.
    pub fn from_grid(grid: &[[bool; GRID_DIM]; GRID_DIM]) -> Self {
        let mut bytes = [0u8; HASH_BYTES];
        for i in 0..256 {
            if grid[i / GRID_DIM][i % GRID_DIM] {
                bytes[i / 8] |= 1 << (7 - (i % 8));
            }
        }
        Hash(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_BYTES] {
        &self.0
    }
}

impl std::fmt::Debug for Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Hash({})", self.to_hex())
    }
}

impl std::fmt::Display for Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_hex() {
        let s = "f".repeat(32) + &"0".repeat(32);
        let h = Hash::from_hex(&s).unwrap();
        assert_eq!(h.to_hex(), s);
    }

    #[test]
    fn round_trip_hex_uppercase_normalizes() {
        let lower = "a1".repeat(32);
        let upper = lower.to_uppercase();
        let h = Hash::from_hex(&upper).unwrap();
        assert_eq!(h.to_hex(), lower);
    }

    #[test]
    fn round_trip_grid() {
        let s = "de".repeat(32);
        let h = Hash::from_hex(&s).unwrap();
        let grid = h.to_grid();
        let back = Hash::from_grid(&grid);
        assert_eq!(h, back);
    }

    #[test]
    fn wrong_length_is_malformed() {
        assert!(matches!(Hash::from_hex("ab"), Err(Error::MalformedHash { .. })));
    }

    #[test]
    fn non_hex_chars_are_malformed() {
        let s = "z".repeat(64);
        assert!(matches!(Hash::from_hex(&s), Err(Error::MalformedHash { .. })));
    }

    #[test]
    fn grid_layout_matches_bit_index() {
        // bit 0 is the MSB of the first hex char -> grid[0][0].
        // "8" = 0b1000, so the first nibble's top bit is set.
        let s = "8".to_string() + &"0".repeat(63);
        let h = Hash::from_hex(&s).unwrap();
        let grid = h.to_grid();
        assert!(grid[0][0]);
        assert!(!grid[0][1]);
    }
}
