//! Build layers: autotile resolution with cluster-scoped incremental rebuilds
//!
//! A build layer's placement records are always derivable purely from its
//! bound blueprint layer's current cell set plus the classifier - the dirty
//! cluster bookkeeping only limits how much of that derivation is redone.

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tileflow_autotile::{resolve, resolve_positions, GridKind, TilePlacement};
use tileflow_core::{cells_of_cluster, cluster_id, CellPos, CellSet, ClusterId, GridRect, GridTransform};
use uuid::Uuid;

/// Default edge length of a cluster square, in cells.
pub const DEFAULT_CLUSTER_SIZE: u32 = 8;

/// How much of a build layer an execution re-resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ExecutionMode {
    /// Only clusters dirtied since the last execution. Escalates to
    /// `FromScratch` on first run or after a pending full reset.
    #[default]
    Normal,
    /// Every cluster, unconditionally.
    FromScratch,
}

/// A layer converting a blueprint's cell set into placed tile records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildLayer {
    pub id: Uuid,
    pub name: String,
    pub enabled: bool,
    /// The blueprint layer this build layer derives from.
    pub blueprint_id: Uuid,
    pub grid_kind: GridKind,
    /// Vertical offset applied by the instantiation collaborator.
    pub vertical_offset: f32,
    /// Edge length of the square clusters used for incremental rebuilds.
    pub cluster_cell_size: u32,

    // Derived state - rebuilt from the blueprint set, never persisted.
    #[serde(skip)]
    placements: BTreeMap<CellPos, TilePlacement>,
    #[serde(skip)]
    dirty_clusters: BTreeSet<ClusterId>,
    #[serde(skip)]
    resolved_once: bool,
    #[serde(skip)]
    needs_full_reset: bool,
}

impl BuildLayer {
    pub fn new(name: impl Into<String>, blueprint_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            enabled: true,
            blueprint_id,
            grid_kind: GridKind::Normal,
            vertical_offset: 0.0,
            cluster_cell_size: DEFAULT_CLUSTER_SIZE,
            placements: BTreeMap::new(),
            dirty_clusters: BTreeSet::new(),
            resolved_once: false,
            needs_full_reset: false,
        }
    }

    /// The current placement records.
    pub fn placements(&self) -> &BTreeMap<CellPos, TilePlacement> {
        &self.placements
    }

    pub fn needs_full_reset(&self) -> bool {
        self.needs_full_reset
    }

    /// Force the next execution to resolve from scratch, whatever mode it is
    /// invoked with.
    pub fn request_full_reset(&mut self) {
        self.needs_full_reset = true;
    }

    /// Mark the clusters touched by a cell mutation dirty.
    ///
    /// The 3x3 neighborhood of each mutated cell is marked too: a mutation
    /// changes the configuration codes of its neighbors, which may live in
    /// an adjacent cluster.
    pub fn mark_cells_dirty(&mut self, cells: &CellSet) {
        for cell in cells {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    self.dirty_clusters
                        .insert(cluster_id(cell.offset(dx, dy), self.cluster_cell_size));
                }
            }
        }
    }

    /// Extend the dirty set with explicit cluster ids (deferred pass).
    pub fn mark_clusters_dirty(&mut self, clusters: impl IntoIterator<Item = ClusterId>) {
        self.dirty_clusters.extend(clusters);
    }

    /// Resolve placements against the bound blueprint's cell set.
    ///
    /// Returns the ids of the clusters that were (re-)resolved.
    pub fn resolve_layer(
        &mut self,
        blueprint_set: &CellSet,
        mode: ExecutionMode,
        rect: GridRect,
    ) -> BTreeSet<ClusterId> {
        let clipped = blueprint_set.clipped(rect);
        let full = matches!(mode, ExecutionMode::FromScratch)
            || !self.resolved_once
            || self.needs_full_reset;

        if full {
            self.placements = resolve(&clipped, self.grid_kind, self.cluster_cell_size, rect);
            self.resolved_once = true;
            self.needs_full_reset = false;
            self.dirty_clusters.clear();
            return self.placements.values().map(|p| p.cluster).collect();
        }

        let dirty = std::mem::take(&mut self.dirty_clusters);
        if dirty.is_empty() {
            return dirty;
        }

        // Drop stale records in dirty clusters, then re-derive exactly those
        // cluster squares. Dual placements live in intersection space, which
        // is one cell wider and taller.
        self.placements.retain(|_, p| !dirty.contains(&p.cluster));
        let candidate_rect = match self.grid_kind {
            GridKind::Normal => rect,
            GridKind::Dual => GridRect {
                width: rect.width + 1,
                height: rect.height + 1,
            },
        };
        let mut candidates = CellSet::new();
        for &cluster in &dirty {
            candidates = candidates.union(&cells_of_cluster(
                cluster,
                self.cluster_cell_size,
                candidate_rect,
            ));
        }
        let fresh =
            resolve_positions(&clipped, candidates.iter(), self.grid_kind, self.cluster_cell_size);
        self.placements.extend(fresh);
        dirty
    }

    /// Clear all derived state. Used when the bound blueprint is missing.
    pub fn clear_placements(&mut self) {
        if !self.placements.is_empty() {
            warn!(
                "build layer '{}': clearing {} placements",
                self.name,
                self.placements.len()
            );
        }
        self.placements.clear();
        self.dirty_clusters.clear();
        self.resolved_once = true;
    }

    /// The placement record at a cell, if any.
    pub fn tile_data_at(&self, pos: CellPos) -> Option<&TilePlacement> {
        self.placements.get(&pos)
    }

    /// Resolved cells within a world-space radius of a world position.
    ///
    /// Each resolved cell's world center is compared against the query
    /// point, so the grid's yaw and translation are honored.
    pub fn cells_in_radius(
        &self,
        world_x: f32,
        world_y: f32,
        radius: f32,
        transform: &GridTransform,
    ) -> CellSet {
        self.placements
            .keys()
            .copied()
            .filter(|&pos| {
                let (cx, cy) = transform.grid_to_world(pos);
                let dx = cx - world_x;
                let dy = cy - world_y;
                (dx * dx + dy * dy).sqrt() <= radius
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tileflow_autotile::TileRole;

    fn rect10() -> GridRect {
        GridRect::new(10, 10).unwrap()
    }

    fn block(x0: i32, y0: i32, w: i32, h: i32) -> CellSet {
        (y0..y0 + h)
            .flat_map(|y| (x0..x0 + w).map(move |x| CellPos::new(x, y)))
            .collect()
    }

    #[test]
    fn first_normal_run_escalates_to_full() {
        let mut layer = BuildLayer::new("walls", Uuid::new_v4());
        let set = block(2, 2, 2, 2);
        layer.resolve_layer(&set, ExecutionMode::Normal, rect10());
        assert_eq!(layer.placements().len(), 4);
    }

    #[test]
    fn normal_run_without_dirt_changes_nothing() {
        let mut layer = BuildLayer::new("walls", Uuid::new_v4());
        let set = block(2, 2, 2, 2);
        layer.resolve_layer(&set, ExecutionMode::FromScratch, rect10());
        let before = layer.placements().clone();

        // The blueprint set changed but no cluster was marked dirty - an
        // incremental run must not notice.
        let grown = block(2, 2, 3, 3);
        let touched = layer.resolve_layer(&grown, ExecutionMode::Normal, rect10());
        assert!(touched.is_empty());
        assert_eq!(layer.placements(), &before);
    }

    #[test]
    fn dirty_cluster_is_rederived_and_untouched_clusters_survive() {
        let mut layer = BuildLayer::new("walls", Uuid::new_v4());
        layer.cluster_cell_size = 4;
        // Two islands in different clusters: (1,1) block and (8,8) cell area.
        let mut set = block(1, 1, 2, 2);
        set.insert(CellPos::new(8, 8));
        layer.resolve_layer(&set, ExecutionMode::FromScratch, rect10());
        let far_before = *layer.tile_data_at(CellPos::new(1, 1)).unwrap();

        // Mutate near (8,8) only.
        set.insert(CellPos::new(8, 9));
        let mutation: CellSet = [CellPos::new(8, 9)].into_iter().collect();
        layer.mark_cells_dirty(&mutation);
        let touched = layer.resolve_layer(&set, ExecutionMode::Normal, rect10());

        assert!(!touched.contains(&cluster_id(CellPos::new(1, 1), 4)));
        assert_eq!(
            *layer.tile_data_at(CellPos::new(1, 1)).unwrap(),
            far_before,
            "an untouched cluster must keep its records verbatim"
        );
        assert_eq!(
            layer.tile_data_at(CellPos::new(8, 8)).unwrap().role,
            TileRole::DeadEnd,
            "the dirty cluster must re-classify against the new set"
        );
    }

    #[test]
    fn full_reset_request_escalates_normal_mode() {
        let mut layer = BuildLayer::new("walls", Uuid::new_v4());
        let set = block(2, 2, 2, 2);
        layer.resolve_layer(&set, ExecutionMode::FromScratch, rect10());

        let shrunk = block(2, 2, 1, 1);
        layer.request_full_reset();
        layer.resolve_layer(&shrunk, ExecutionMode::Normal, rect10());
        assert_eq!(layer.placements().len(), 1, "reset must re-resolve everything");
        assert!(!layer.needs_full_reset());
    }

    #[test]
    fn radius_query_uses_world_distance() {
        let mut layer = BuildLayer::new("walls", Uuid::new_v4());
        let set = block(0, 0, 10, 1);
        layer.resolve_layer(&set, ExecutionMode::FromScratch, rect10());

        let transform = GridTransform {
            cell_size: 2.0,
            ..GridTransform::default()
        };
        // Query at the center of cell (2,0) = world (5,1), radius one cell.
        let near = layer.cells_in_radius(5.0, 1.0, 2.0, &transform);
        assert!(near.contains(CellPos::new(2, 0)));
        assert!(near.contains(CellPos::new(1, 0)));
        assert!(near.contains(CellPos::new(3, 0)));
        assert!(!near.contains(CellPos::new(6, 0)));
    }
}
