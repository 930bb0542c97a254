//! The modifier catalog
//!
//! Modifiers are a closed tagged enum - dispatch is a `match`, construction
//! is plain data, and the whole stack serializes with the owning layer.

use serde::{Deserialize, Serialize};
use tileflow_core::{algebra::RulePattern, Neighborhood};
use uuid::Uuid;

/// Minimum cell count for a connected component to count as an island.
/// Smaller components are noise and are skipped by island sampling.
pub const MIN_ISLAND_SIZE: usize = 6;

/// One stage of a blueprint layer's modifier stack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Modifier {
    /// Stable identifier for this stage.
    pub id: Uuid,
    /// Disabled stages are skipped; the stack still runs around them.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub kind: ModifierKind,
}

fn default_enabled() -> bool {
    true
}

impl Modifier {
    pub fn new(kind: ModifierKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            enabled: true,
            kind,
        }
    }
}

/// Set-combination operator for [`ModifierKind::Boolean`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BooleanOp {
    Add,
    Subtract,
    Intersect,
    Xor,
}

/// How a [`ModifierKind::Select`] picks its sub-selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectMode {
    /// Keep each cell independently with this probability.
    Random { probability: f64 },
    /// Keep cells whose 8-neighborhood is not fully occupied.
    Border,
    /// Keep cells whose 8-neighborhood is fully occupied.
    Fill,
    /// Keep cells classified into the edge role family.
    Edges,
    /// Keep cells classified into the outer corner role family.
    Corners,
    /// Keep cells classified into the interior corner role family.
    InteriorCorners,
    /// Keep cells whose occupied (or, when `invert`, unoccupied) neighbor
    /// count within the current set lies in `min..=max`.
    NeighborCount {
        min: u32,
        max: u32,
        neighborhood: Neighborhood,
        invert: bool,
    },
}

/// The closed set of modifier kinds.
///
/// Every kind consumes the cell set produced by the previous stage and
/// returns a new one; sibling layers are referenced by stable id only and
/// are read in their finalized state, never mid-execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ModifierKind {
    /// Union one or more sibling layers into the current set.
    AddLayers { layer_ids: Vec<Uuid> },
    /// Remove one or more sibling layers from the current set.
    SubtractLayers { layer_ids: Vec<Uuid> },
    /// Combine with a single sibling layer under `op`.
    Boolean { op: BooleanOp, layer_id: Uuid },
    /// Grow outward by `iterations` rings.
    Expand {
        iterations: u32,
        neighborhood: Neighborhood,
    },
    /// Erode from the outside by `iterations` rings.
    Shrink {
        iterations: u32,
        neighborhood: Neighborhood,
    },
    /// Erode weakly connected cells toward a smoother silhouette.
    Smooth { iterations: u32 },
    /// Complement against the full grid rectangle.
    Invert,
    /// Filter the current set down to a sub-selection.
    Select { mode: SelectMode },
    /// Keep cells matching any of the 3x3 occupancy rules.
    SelectByRule { rules: Vec<RulePattern> },
    /// Keep cells by neighbor count against a *different* layer.
    SelectBasedOnNeighbour {
        layer_id: Uuid,
        neighborhood: Neighborhood,
        min_count: u32,
        max_count: u32,
        /// Count unoccupied instead of occupied neighbors.
        #[serde(default)]
        count_unoccupied: bool,
    },
    /// One seeded-random representative cell per island (connected component
    /// larger than the noise threshold).
    FindPositionOnIslands,
    /// Side channel: write the current pipeline set into another layer's
    /// painted set. Returns the input unchanged.
    PushToPaintPositions {
        layer_id: Uuid,
        #[serde(default)]
        clear_before_push: bool,
    },
    /// Stochastic fill: seed a noise field over the whole grid, smooth it
    /// with majority rounds, optionally keep only the largest component.
    CellularAutomata {
        fill_probability: f64,
        smoothing_steps: u32,
        #[serde(default)]
        ensure_connected: bool,
    },
}
