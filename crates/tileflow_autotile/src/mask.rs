//! Configuration code computation
//!
//! A Normal-grid configuration code packs a cell's occupancy and that of its
//! eight neighbors into nine bits; a Dual-grid code packs the four cells
//! meeting at a grid intersection into four bits.

use tileflow_core::{CellPos, CellSet};

/// Normal-grid neighbor direction bits: cardinals first, then diagonals,
/// then the center cell itself.
pub mod bits {
    pub const N: u16 = 0b0_0000_0001;
    pub const S: u16 = 0b0_0000_0010;
    pub const W: u16 = 0b0_0000_0100;
    pub const E: u16 = 0b0_0000_1000;
    pub const NW: u16 = 0b0_0001_0000;
    pub const NE: u16 = 0b0_0010_0000;
    pub const SW: u16 = 0b0_0100_0000;
    pub const SE: u16 = 0b0_1000_0000;
    pub const CENTER: u16 = 0b1_0000_0000;
}

/// Dual-grid quadrant bits: the four cells meeting at an intersection.
pub mod dual_bits {
    pub const SW: u8 = 0b0001;
    pub const SE: u8 = 0b0010;
    pub const NW: u8 = 0b0100;
    pub const NE: u8 = 0b1000;
}

/// Upper bound (exclusive) of the Normal code domain.
pub const NORMAL_CODE_COUNT: usize = 512;
/// Upper bound (exclusive) of the Dual code domain.
pub const DUAL_CODE_COUNT: usize = 16;

/// Compute the Normal-grid configuration code of `pos` against `set`.
///
/// North is `+y`. The center bit is set iff `pos` itself is occupied; every
/// reachable code during tile resolution therefore has it set.
pub fn compute_code(pos: CellPos, set: &CellSet) -> u16 {
    use bits::*;

    let mut code = 0u16;
    if set.contains(pos) {
        code |= CENTER;
    }
    if set.contains(pos.offset(0, 1)) {
        code |= N;
    }
    if set.contains(pos.offset(0, -1)) {
        code |= S;
    }
    if set.contains(pos.offset(-1, 0)) {
        code |= W;
    }
    if set.contains(pos.offset(1, 0)) {
        code |= E;
    }
    if set.contains(pos.offset(-1, 1)) {
        code |= NW;
    }
    if set.contains(pos.offset(1, 1)) {
        code |= NE;
    }
    if set.contains(pos.offset(-1, -1)) {
        code |= SW;
    }
    if set.contains(pos.offset(1, -1)) {
        code |= SE;
    }
    code
}

/// Clear every diagonal bit whose two flanking cardinals are not both set.
///
/// A diagonal neighbor only changes tile art when the edge pieces beside it
/// exist, so codes differing only in such diagonals classify identically.
pub fn normalize_code(code: u16) -> u16 {
    use bits::*;

    let mut result = code;
    if (code & (N | W)) != (N | W) {
        result &= !NW;
    }
    if (code & (N | E)) != (N | E) {
        result &= !NE;
    }
    if (code & (S | W)) != (S | W) {
        result &= !SW;
    }
    if (code & (S | E)) != (S | E) {
        result &= !SE;
    }
    result
}

/// Compute the Dual-grid configuration code of the intersection at `pos`.
///
/// Intersection `(x, y)` sits at the shared corner of cells `(x-1, y-1)`,
/// `(x, y-1)`, `(x-1, y)` and `(x, y)`; intersection space is one cell wider
/// and taller than cell space.
pub fn compute_dual_code(pos: CellPos, set: &CellSet) -> u8 {
    use dual_bits::*;

    let mut code = 0u8;
    if set.contains(pos.offset(-1, -1)) {
        code |= SW;
    }
    if set.contains(pos.offset(0, -1)) {
        code |= SE;
    }
    if set.contains(pos.offset(-1, 0)) {
        code |= NW;
    }
    if set.contains(pos) {
        code |= NE;
    }
    code
}
