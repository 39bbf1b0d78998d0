//! Hamming kernel: branch-free XOR-popcount over a 256-bit hash, as
//! four 64-bit words rather than 32 individual bytes (fewer, wider
//! operations; no allocation either way).

use crate::codec::Hash;

/// True Hamming distance between two 256-bit hashes, in `0..=256`.
#[inline]
pub fn hamming(a: &Hash, b: &Hash) -> u32 {
    let wa: [u64; 4] = bytemuck::cast(a.0);
    let wb: [u64; 4] = bytemuck::cast(b.0);
    (wa[0] ^ wb[0]).count_ones()
        + (wa[1] ^ wb[1]).count_ones()
        + (wa[2] ^ wb[2]).count_ones()
        + (wa[3] ^ wb[3]).count_ones()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_distance_is_zero() {
        let h = Hash::from_hex(&"ab".repeat(32)).unwrap();
        assert_eq!(hamming(&h, &h), 0);
    }

    #[test]
    fn symmetric() {
        let a = Hash::from_hex(&"ab".repeat(32)).unwrap();
        let b = Hash::from_hex(&"cd".repeat(32)).unwrap();
        assert_eq!(hamming(&a, &b), hamming(&b, &a));
    }

    #[test]
    fn all_bits_differ() {
        let a = Hash::ZERO;
        let b = Hash([0xff; 32]);
        assert_eq!(hamming(&a, &b), 256);
    }

    #[test]
    fn single_bit_difference() {
        let a = Hash::ZERO;
        let mut bytes = [0u8; 32];
        bytes[0] = 0b0000_0001;
        let b = Hash(bytes);
        assert_eq!(hamming(&a, &b), 1);
    }
}
