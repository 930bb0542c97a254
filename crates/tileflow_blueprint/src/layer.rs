//! Blueprint layers
//!
//! A blueprint layer owns the canonical cell set for a named region. Manual
//! paint edits and the modifier stack compose: the painted set seeds the
//! stack, and execution replaces the layer's authoritative set with the
//! stack's result.

use crate::apply::apply_stack;
use crate::context::LayerContext;
use crate::modifier::Modifier;
use serde::{Deserialize, Serialize};
use tileflow_core::{CellSet, GridRect};
use uuid::Uuid;

/// Lifecycle state of a blueprint layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LayerState {
    #[default]
    Empty,
    /// Manual edits exist; any previously generated result is stale.
    Painted,
    /// The modifier stack has been executed over the painted set.
    Generated,
}

/// A named, persisted cell set plus its ordered modifier stack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlueprintLayer {
    /// Stable identifier; names may repeat across folders, ids never do.
    pub id: Uuid,
    pub name: String,
    /// Disabled layers are skipped by the orchestrator but keep their set.
    pub enabled: bool,
    /// Default elevation applied to placements derived from this layer.
    pub elevation: f32,
    /// Manually painted cells - the seed of the modifier stack.
    pub painted: CellSet,
    /// The authoritative cell set: painted cells, or the last stack result.
    pub current: CellSet,
    pub modifiers: Vec<Modifier>,
    pub state: LayerState,
}

impl BlueprintLayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            enabled: true,
            elevation: 0.0,
            painted: CellSet::new(),
            current: CellSet::new(),
            modifiers: Vec::new(),
            state: LayerState::Empty,
        }
    }

    /// Paint cells. Out-of-bounds positions are silently clipped so
    /// interactive tools stay responsive. Returns the cells actually added.
    pub fn add_cells(&mut self, cells: &CellSet, rect: GridRect) -> CellSet {
        let mut added = CellSet::new();
        for pos in cells.clipped(rect).iter() {
            if self.painted.insert(pos) {
                added.insert(pos);
            }
        }
        if !added.is_empty() {
            self.current = self.current.union(&added);
            self.state = LayerState::Painted;
        }
        added
    }

    /// Erase cells from the painted set. Returns the cells actually removed.
    pub fn remove_cells(&mut self, cells: &CellSet) -> CellSet {
        let mut removed = CellSet::new();
        for pos in cells.iter() {
            let was_painted = self.painted.remove(pos);
            let was_current = self.current.remove(pos);
            if was_painted || was_current {
                removed.insert(pos);
            }
        }
        if !removed.is_empty() {
            self.state = LayerState::Painted;
        }
        removed
    }

    /// Clear both the painted and the authoritative set.
    pub fn clear(&mut self) {
        self.painted.clear();
        self.current.clear();
        self.state = LayerState::Painted;
    }

    /// Paint the entire grid rectangle.
    pub fn fill(&mut self, rect: GridRect) {
        self.painted = rect.iter().collect();
        self.current = self.painted.clone();
        self.state = LayerState::Painted;
    }

    /// Replay the modifier stack from the painted set and replace the
    /// authoritative set with the result.
    pub fn execute(&mut self, ctx: &mut LayerContext<'_>) {
        self.current = apply_stack(self.painted.clone(), &self.modifiers, ctx);
        self.state = LayerState::Generated;
    }

    /// Drop all content but keep the modifier stack.
    pub fn reset(&mut self) {
        self.painted.clear();
        self.current.clear();
        self.state = LayerState::Empty;
    }
}
