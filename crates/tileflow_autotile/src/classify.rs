//! Configuration code -> tile role classification
//!
//! `classify` is a total function over every reachable code: each code maps
//! to exactly one role, one canonical rotation, and an x-mirror flag. The
//! mapping is materialized into lookup tables on first use so classification
//! is a plain array read, and the totality tests enumerate the whole domain.

use crate::mask::{bits, dual_bits, normalize_code, DUAL_CODE_COUNT, NORMAL_CODE_COUNT};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Which code space a classification uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GridKind {
    /// Tiles sit on cells; 9-bit codes (8 neighbors + center).
    #[default]
    Normal,
    /// Tiles sit on grid intersections; 4-bit codes.
    Dual,
}

/// Canonical tile rotation in 90 degree steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    pub const fn degrees(self) -> u16 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 90,
            Rotation::R180 => 180,
            Rotation::R270 => 270,
        }
    }
}

/// The visual role a classified tile plays.
///
/// The first group is the Normal-grid set; the last three complete the
/// Dual-grid set (`InteriorCorner` and `Fill` are shared between the two).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileRole {
    /// No neighbors at all.
    Single,
    /// Exactly one cardinal neighbor.
    DeadEnd,
    /// Two opposite cardinal neighbors - a straight corridor piece.
    EdgeWay,
    /// Two adjacent cardinal neighbors, diagonal between them empty.
    CornerWay,
    /// Two adjacent cardinal neighbors, diagonal between them filled.
    CornerFill,
    /// Three cardinal neighbors, both relevant diagonals empty - a thin T.
    ThreeWay,
    /// Three cardinals, exactly one relevant diagonal filled. The two
    /// chiralities are not related by rotation - `mirror_x` picks one.
    EdgeCornerFill,
    /// Three cardinals, both relevant diagonals filled - a straight border
    /// edge of a solid region.
    EdgeFill,
    /// Fully surrounded.
    Fill,
    /// All cardinals, one diagonal missing.
    InteriorCorner,
    /// All cardinals, two opposite diagonals missing.
    DoubleCorner,
    /// All cardinals, two adjacent diagonals missing - a thick T junction.
    ThreeWayFill,
    /// All cardinals, three diagonals missing.
    ThreeCorner,
    /// All cardinals, no diagonals - a thin cross junction.
    FourWay,
    /// Dual grid: one occupied quadrant.
    Corner,
    /// Dual grid: two adjacent occupied quadrants.
    Edge,
    /// Dual grid: two diagonally opposite occupied quadrants.
    DoubleInteriorCorner,
}

/// The resolved classification of one configuration code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileClass {
    pub role: TileRole,
    pub rotation: Rotation,
    pub mirror_x: bool,
}

impl TileClass {
    const fn new(role: TileRole, rotation: Rotation) -> Self {
        Self {
            role,
            rotation,
            mirror_x: false,
        }
    }

    const fn mirrored(role: TileRole, rotation: Rotation) -> Self {
        Self {
            role,
            rotation,
            mirror_x: true,
        }
    }
}

/// Classify a configuration code.
///
/// Returns `None` for unreachable codes: Normal codes without the center bit
/// (the cell is not occupied, so no tile is placed) and the Dual code 0 (an
/// intersection with no occupied quadrant is never resolved).
///
/// # Panics
///
/// Panics when `code` lies outside the numeric domain (`>= 512` for Normal,
/// `>= 16` for Dual) - that is a contract violation upstream, not input.
pub fn classify(code: u16, kind: GridKind) -> Option<TileClass> {
    match kind {
        GridKind::Normal => {
            assert!(
                (code as usize) < NORMAL_CODE_COUNT,
                "normal configuration code {code} out of domain"
            );
            normal_table()[code as usize]
        }
        GridKind::Dual => {
            assert!(
                (code as usize) < DUAL_CODE_COUNT,
                "dual configuration code {code} out of domain"
            );
            dual_table()[code as usize]
        }
    }
}

fn normal_table() -> &'static [Option<TileClass>; NORMAL_CODE_COUNT] {
    static TABLE: OnceLock<[Option<TileClass>; NORMAL_CODE_COUNT]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [None; NORMAL_CODE_COUNT];
        for (code, slot) in table.iter_mut().enumerate() {
            *slot = classify_normal(code as u16);
        }
        table
    })
}

fn dual_table() -> &'static [Option<TileClass>; DUAL_CODE_COUNT] {
    static TABLE: OnceLock<[Option<TileClass>; DUAL_CODE_COUNT]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [None; DUAL_CODE_COUNT];
        for (code, slot) in table.iter_mut().enumerate() {
            *slot = classify_dual(code as u8);
        }
        table
    })
}

/// Classify one Normal-grid code. Single source of truth for the table.
fn classify_normal(code: u16) -> Option<TileClass> {
    use bits::*;
    use Rotation::*;
    use TileRole::*;

    if code & CENTER == 0 {
        return None;
    }
    let code = normalize_code(code);

    let n = code & N != 0;
    let s = code & S != 0;
    let w = code & W != 0;
    let e = code & E != 0;
    let nw = code & NW != 0;
    let ne = code & NE != 0;
    let sw = code & SW != 0;
    let se = code & SE != 0;

    let cardinals = [n, s, w, e].iter().filter(|&&b| b).count();

    let class = match cardinals {
        0 => TileClass::new(Single, R0),

        // Rotation faces the single neighbor, clockwise from north.
        1 if n => TileClass::new(DeadEnd, R0),
        1 if e => TileClass::new(DeadEnd, R90),
        1 if s => TileClass::new(DeadEnd, R180),
        1 => TileClass::new(DeadEnd, R270),

        2 if n && s => TileClass::new(EdgeWay, R0),
        2 if w && e => TileClass::new(EdgeWay, R90),

        // Adjacent pair: the diagonal between the pair decides way vs fill.
        2 if n && e => TileClass::new(if ne { CornerFill } else { CornerWay }, R0),
        2 if e && s => TileClass::new(if se { CornerFill } else { CornerWay }, R90),
        2 if s && w => TileClass::new(if sw { CornerFill } else { CornerWay }, R180),
        2 => TileClass::new(if nw { CornerFill } else { CornerWay }, R270),

        // Three cardinals: rotation keyed on the missing one; the two
        // relevant diagonals sit between the three present cardinals.
        3 if !s => classify_three(nw, ne, R0),
        3 if !w => classify_three(ne, se, R90),
        3 if !n => classify_three(se, sw, R180),
        3 => classify_three(sw, nw, R270),

        _ => {
            let diagonals = [nw, ne, sw, se].iter().filter(|&&b| b).count();
            match diagonals {
                4 => TileClass::new(Fill, R0),
                3 if !ne => TileClass::new(InteriorCorner, R0),
                3 if !se => TileClass::new(InteriorCorner, R90),
                3 if !sw => TileClass::new(InteriorCorner, R180),
                3 => TileClass::new(InteriorCorner, R270),
                2 if !ne && !sw => TileClass::new(DoubleCorner, R0),
                2 if !nw && !se => TileClass::new(DoubleCorner, R90),
                2 if !ne && !nw => TileClass::new(ThreeWayFill, R0),
                2 if !ne && !se => TileClass::new(ThreeWayFill, R90),
                2 if !se && !sw => TileClass::new(ThreeWayFill, R180),
                2 => TileClass::new(ThreeWayFill, R270),
                1 if ne => TileClass::new(ThreeCorner, R0),
                1 if se => TileClass::new(ThreeCorner, R90),
                1 if sw => TileClass::new(ThreeCorner, R180),
                1 => TileClass::new(ThreeCorner, R270),
                _ => TileClass::new(FourWay, R0),
            }
        }
    };
    Some(class)
}

/// Classify the three-cardinal family given its two relevant diagonals in
/// clockwise order (`cw_diag` is clockwise of the missing cardinal, seen
/// from the tile; `ccw_diag` counter-clockwise).
///
/// With one diagonal present the configuration has a handedness no 90 degree
/// rotation reaches; the clockwise variant carries `mirror_x`.
fn classify_three(cw_diag: bool, ccw_diag: bool, rotation: Rotation) -> TileClass {
    use TileRole::*;
    match (cw_diag, ccw_diag) {
        (false, false) => TileClass::new(ThreeWay, rotation),
        (true, true) => TileClass::new(EdgeFill, rotation),
        (false, true) => TileClass::new(EdgeCornerFill, rotation),
        (true, false) => TileClass::mirrored(EdgeCornerFill, rotation),
    }
}

/// Classify one Dual-grid code. Single source of truth for the table.
fn classify_dual(code: u8) -> Option<TileClass> {
    use dual_bits::*;
    use Rotation::*;
    use TileRole::*;

    let ne = code & NE != 0;
    let nw = code & NW != 0;
    let se = code & SE != 0;
    let sw = code & SW != 0;
    let count = [ne, nw, se, sw].iter().filter(|&&b| b).count();

    let class = match count {
        0 => return None,
        1 if ne => TileClass::new(Corner, R0),
        1 if se => TileClass::new(Corner, R90),
        1 if sw => TileClass::new(Corner, R180),
        1 => TileClass::new(Corner, R270),
        2 if ne && nw => TileClass::new(Edge, R0),
        2 if ne && se => TileClass::new(Edge, R90),
        2 if se && sw => TileClass::new(Edge, R180),
        2 if sw && nw => TileClass::new(Edge, R270),
        2 if ne && sw => TileClass::new(DoubleInteriorCorner, R0),
        2 => TileClass::new(DoubleInteriorCorner, R90),
        3 if !ne => TileClass::new(InteriorCorner, R0),
        3 if !se => TileClass::new(InteriorCorner, R90),
        3 if !sw => TileClass::new(InteriorCorner, R180),
        3 => TileClass::new(InteriorCorner, R270),
        _ => TileClass::new(Fill, R0),
    };
    Some(class)
}
