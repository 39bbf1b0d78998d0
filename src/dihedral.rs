//! Dihedral transformer: the 8 orientations of the D4 symmetry group
//! applied to a hash's 16×16 bit grid — the 4 rotations, the 2
//! axis-aligned flips, and the 2 diagonal reflections (transpose and
//! anti-transpose). Composing flip-then-rotate the wrong way round
//! collapses two of those eight slots onto rotations already in the
//! list instead of producing the diagonal reflections, which breaks
//! closure of the orbit for any hash without incidental symmetry; this
//! module builds the diagonal reflections directly instead.

use crate::codec::{GRID_DIM, Hash};
use std::sync::LazyLock;

const NUM_ORIENTATIONS: usize = 8;
const NUM_BITS: usize = GRID_DIM * GRID_DIM;

/// One bit-index permutation: `table[i]` is the source bit feeding output
/// bit `i`. Built once and reused for every hash passed through
/// [`orientations`].
type PermTable = [u16; NUM_BITS];

fn identity_table() -> PermTable {
    let mut t = [0u16; NUM_BITS];
    for (i, slot) in t.iter_mut().enumerate() {
        *slot = i as u16;
    }
    t
}

fn build(f: impl Fn(usize, usize) -> (usize, usize)) -> PermTable {
    let mut t = [0u16; NUM_BITS];
    for r in 0..GRID_DIM {
        for c in 0..GRID_DIM {
            let (sr, sc) = f(r, c);
            t[r * GRID_DIM + c] = (sr * GRID_DIM + sc) as u16;
        }
    }
    t
}

static TABLES: LazyLock<[PermTable; NUM_ORIENTATIONS]> = LazyLock::new(|| {
    let last = GRID_DIM - 1;
    [
        identity_table(),
        build(|r, c| (last - c, r)),               // rotate 90
        build(|r, c| (last - r, last - c)),         // rotate 180
        build(|r, c| (c, last - r)),                // rotate 270
        build(|r, c| (r, last - c)),                // flip horizontal
        build(|r, c| (last - r, c)),                // flip vertical
        build(|r, c| (last - c, last - r)),         // anti-transpose
        build(|r, c| (c, r)),                       // transpose
    ]
});

fn apply(table: &PermTable, hash: &Hash) -> Hash {
    let grid = hash.to_grid();
    let flat: [bool; NUM_BITS] = {
        let mut f = [false; NUM_BITS];
        for i in 0..NUM_BITS {
            f[i] = grid[i / GRID_DIM][i % GRID_DIM];
        }
        f
    };
    let mut out = [[false; GRID_DIM]; GRID_DIM];
    for i in 0..NUM_BITS {
        out[i / GRID_DIM][i % GRID_DIM] = flat[table[i] as usize];
    }
    Hash::from_grid(&out)
}

/// The 8 orientations of `hash` under the D4 group, identity first.
///
/// Order: identity, rotate-90, rotate-180, rotate-270, flip-horizontal,
/// flip-vertical, anti-transpose, transpose. Callers that only need
/// distinct orientations (e.g. to fan a query out across a search
/// backend) can rely on the identity always occupying index 0.
pub fn orientations(hash: &Hash) -> [Hash; NUM_ORIENTATIONS] {
    let tables = &*TABLES;
    [
        apply(&tables[0], hash),
        apply(&tables[1], hash),
        apply(&tables[2], hash),
        apply(&tables[3], hash),
        apply(&tables[4], hash),
        apply(&tables[5], hash),
        apply(&tables[6], hash),
        apply(&tables[7], hash),
    ]
}
