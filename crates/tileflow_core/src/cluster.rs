//! Fixed-size spatial partitioning of the grid
//!
//! Clusters scope incremental rebuilds and radius queries: a mutation only
//! dirties the clusters it touches, and a build layer re-resolves dirty
//! clusters instead of rescanning the whole grid.

use crate::{CellPos, CellSet, GridRect};

/// Identifier of one cluster. Stable for a given cluster cell size.
pub type ClusterId = i64;

/// Row multiplier for cluster ids. Large enough that no realistic grid has
/// two clusters in different rows collide.
const CLUSTER_Y_MULTIPLIER: i64 = 1 << 20;

/// The cluster containing `pos` for a given cluster cell size.
pub fn cluster_id(pos: CellPos, cluster_size: u32) -> ClusterId {
    let size = cluster_size.max(1) as i32;
    let cx = pos.x.div_euclid(size) as i64;
    let cy = pos.y.div_euclid(size) as i64;
    cx + cy * CLUSTER_Y_MULTIPLIER
}

/// The minimum corner cell of a cluster.
pub fn cluster_origin(id: ClusterId, cluster_size: u32) -> CellPos {
    let size = cluster_size.max(1) as i64;
    let cy = id.div_euclid(CLUSTER_Y_MULTIPLIER);
    let cx = id - cy * CLUSTER_Y_MULTIPLIER;
    CellPos::new((cx * size) as i32, (cy * size) as i32)
}

/// Every in-bounds cell belonging to a cluster.
pub fn cells_of_cluster(id: ClusterId, cluster_size: u32, rect: GridRect) -> CellSet {
    let size = cluster_size.max(1) as i32;
    let origin = cluster_origin(id, cluster_size);
    let mut cells = CellSet::new();
    for dy in 0..size {
        for dx in 0..size {
            let pos = origin.offset(dx, dy);
            if rect.contains(pos) {
                cells.insert(pos);
            }
        }
    }
    cells
}

/// The ids of the up-to-eight clusters surrounding `id`, plus `id` itself.
///
/// Used by the deferred build pass: a cluster re-resolved this turn can
/// change the border classification of cells in adjacent clusters.
pub fn cluster_neighbors(id: ClusterId, cluster_size: u32) -> Vec<ClusterId> {
    let size = cluster_size.max(1) as i32;
    let origin = cluster_origin(id, cluster_size);
    let mut ids = Vec::with_capacity(9);
    for dy in -1..=1 {
        for dx in -1..=1 {
            ids.push(cluster_id(origin.offset(dx * size, dy * size), cluster_size));
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_in_same_square_share_an_id() {
        let a = cluster_id(CellPos::new(0, 0), 8);
        let b = cluster_id(CellPos::new(7, 7), 8);
        let c = cluster_id(CellPos::new(8, 0), 8);
        assert_eq!(a, b);
        assert_ne!(a, c, "cells across the cluster boundary must differ");
    }

    #[test]
    fn origin_round_trips_through_id() {
        for &(x, y) in &[(0, 0), (15, 3), (8, 24), (63, 63)] {
            let id = cluster_id(CellPos::new(x, y), 8);
            let origin = cluster_origin(id, 8);
            assert_eq!(cluster_id(origin, 8), id);
            assert_eq!(origin.x, (x / 8) * 8);
            assert_eq!(origin.y, (y / 8) * 8);
        }
    }

    #[test]
    fn cells_of_cluster_is_clipped_to_grid() {
        let rect = GridRect::new(10, 10).unwrap();
        let id = cluster_id(CellPos::new(9, 9), 8);
        let cells = cells_of_cluster(id, 8, rect);
        // Cluster square is 8x8 but only the 2x2 corner is in bounds.
        assert_eq!(cells.len(), 4);
        assert!(cells.contains(CellPos::new(8, 8)));
        assert!(cells.contains(CellPos::new(9, 9)));
    }

    #[test]
    fn neighbors_include_self_and_adjacent() {
        let id = cluster_id(CellPos::new(12, 12), 8);
        let neighbors = cluster_neighbors(id, 8);
        assert_eq!(neighbors.len(), 9);
        assert!(neighbors.contains(&id));
        assert!(neighbors.contains(&cluster_id(CellPos::new(4, 12), 8)));
    }
}
