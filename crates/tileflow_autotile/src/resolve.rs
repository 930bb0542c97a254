//! Cell-set -> placement resolution
//!
//! Converts a finalized cell set into a map of placement records: for each
//! placement position, the classified role, rotation, mirror flag, and the
//! cluster the position falls in.

use crate::classify::{classify, GridKind, Rotation, TileRole};
use crate::mask::{compute_code, compute_dual_code};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tileflow_core::{cluster_id, CellPos, CellSet, ClusterId, GridRect};

/// One resolved tile placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilePlacement {
    pub role: TileRole,
    pub rotation: Rotation,
    pub mirror_x: bool,
    pub cluster: ClusterId,
}

/// Resolve every placement position of `set`.
///
/// The set is clipped to `rect` first - out-of-bounds members may exist in
/// intermediate modifier results but must never reach tile resolution. For
/// `Normal` the placement positions are the occupied cells themselves; for
/// `Dual` they are the grid intersections touching at least one occupied
/// cell (intersection space is `(width+1) x (height+1)`).
pub fn resolve(
    set: &CellSet,
    kind: GridKind,
    cluster_size: u32,
    rect: GridRect,
) -> BTreeMap<CellPos, TilePlacement> {
    let clipped = set.clipped(rect);
    resolve_positions(&clipped, candidate_positions(&clipped, kind), kind, cluster_size)
}

/// Resolve only the given candidate positions against `set`.
///
/// `set` must already be clipped to the grid. Positions whose code is
/// unreachable (an unoccupied Normal cell, an untouched Dual intersection)
/// produce no record, so callers may pass whole cluster squares.
pub fn resolve_positions(
    set: &CellSet,
    positions: impl IntoIterator<Item = CellPos>,
    kind: GridKind,
    cluster_size: u32,
) -> BTreeMap<CellPos, TilePlacement> {
    let mut placements = BTreeMap::new();
    for pos in positions {
        let class = match kind {
            GridKind::Normal => classify(compute_code(pos, set), kind),
            GridKind::Dual => classify(compute_dual_code(pos, set) as u16, kind),
        };
        if let Some(class) = class {
            placements.insert(
                pos,
                TilePlacement {
                    role: class.role,
                    rotation: class.rotation,
                    mirror_x: class.mirror_x,
                    cluster: cluster_id(pos, cluster_size),
                },
            );
        }
    }
    placements
}

/// All placement positions a set can produce for a grid kind.
fn candidate_positions(set: &CellSet, kind: GridKind) -> Vec<CellPos> {
    match kind {
        GridKind::Normal => set.iter().collect(),
        GridKind::Dual => {
            // Each occupied cell touches its own intersection and the three
            // to its north/east side.
            let mut positions = CellSet::new();
            for cell in set {
                positions.insert(cell);
                positions.insert(cell.offset(1, 0));
                positions.insert(cell.offset(0, 1));
                positions.insert(cell.offset(1, 1));
            }
            positions.iter().collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> CellSet {
        [(2, 2), (2, 3), (3, 2), (3, 3)]
            .into_iter()
            .map(CellPos::from)
            .collect()
    }

    fn rect10() -> GridRect {
        GridRect::new(10, 10).unwrap()
    }

    #[test]
    fn square_corners_resolve_as_corner_fill() {
        let placements = resolve(&square(), GridKind::Normal, 8, rect10());
        assert_eq!(placements.len(), 4);

        let sw = placements[&CellPos::new(2, 2)];
        assert_eq!(sw.role, TileRole::CornerFill);
        assert_eq!(sw.rotation, Rotation::R0);

        let ne = placements[&CellPos::new(3, 3)];
        assert_eq!(ne.role, TileRole::CornerFill);
        assert_eq!(ne.rotation, Rotation::R180);
    }

    #[test]
    fn out_of_bounds_members_are_clipped_before_resolution() {
        let mut set = square();
        set.insert(CellPos::new(-3, 2));
        set.insert(CellPos::new(2, 40));
        let placements = resolve(&set, GridKind::Normal, 8, rect10());
        assert_eq!(placements.len(), 4, "off-grid cells must not be resolved");
    }

    #[test]
    fn placements_record_the_containing_cluster() {
        let placements = resolve(&square(), GridKind::Normal, 3, rect10());
        assert_eq!(
            placements[&CellPos::new(2, 2)].cluster,
            cluster_id(CellPos::new(2, 2), 3)
        );
        assert_ne!(
            placements[&CellPos::new(2, 2)].cluster,
            placements[&CellPos::new(3, 3)].cluster,
            "cells across the cluster boundary must record different clusters"
        );
    }

    #[test]
    fn dual_resolution_emits_a_ring_of_intersections() {
        // A single cell touches exactly four intersections.
        let set: CellSet = [CellPos::new(4, 4)].into_iter().collect();
        let placements = resolve(&set, GridKind::Dual, 8, rect10());
        assert_eq!(placements.len(), 4);
        for placement in placements.values() {
            assert_eq!(placement.role, TileRole::Corner);
        }
        // The 2x2 square yields a 3x3 grid of intersections.
        let placements = resolve(&square(), GridKind::Dual, 8, rect10());
        assert_eq!(placements.len(), 9);
        assert_eq!(placements[&CellPos::new(3, 3)].role, TileRole::Fill);
        assert_eq!(placements[&CellPos::new(3, 3)].rotation, Rotation::R0);
    }

    #[test]
    fn interior_of_a_block_resolves_as_fill() {
        let set: CellSet = (0..3)
            .flat_map(|y| (0..3).map(move |x| CellPos::new(x, y)))
            .collect();
        let placements = resolve(&set, GridKind::Normal, 8, rect10());
        assert_eq!(placements[&CellPos::new(1, 1)].role, TileRole::Fill);
    }
}
