//! Execution context handed to modifiers

use rand::rngs::SmallRng;
use std::collections::HashMap;
use tileflow_core::{CellSet, GridRect};
use uuid::Uuid;

/// The finalized cell sets of sibling layers, keyed by layer id.
///
/// The orchestrator fills this with each layer's current set before a stack
/// runs, so a modifier can only ever observe completed results - never a
/// sibling mid-execution.
pub type SiblingSets = HashMap<Uuid, CellSet>;

/// A deferred write into another layer's painted set, queued by
/// `PushToPaintPositions` and applied by the orchestrator between layers.
#[derive(Debug, Clone)]
pub struct PaintWrite {
    pub layer_id: Uuid,
    pub cells: CellSet,
    pub clear_before_push: bool,
}

/// Everything a modifier may read or draw from during one stack execution.
pub struct LayerContext<'a> {
    /// Grid bounds; intermediate results may leave them, final results are
    /// clipped by the consumer.
    pub rect: GridRect,
    /// The single seeded RNG stream for this pipeline execution.
    pub rng: &'a mut SmallRng,
    /// Finalized sibling sets for cross-layer reads.
    pub siblings: &'a SiblingSets,
    /// Queue for paint side-channel writes.
    pub paint_writes: &'a mut Vec<PaintWrite>,
}

impl<'a> LayerContext<'a> {
    /// Look up a sibling layer's finalized set. `None` surfaces as a logged
    /// warning at the call site, not an error - generation continues with
    /// the input unchanged.
    pub fn sibling(&self, layer_id: Uuid) -> Option<&CellSet> {
        self.siblings.get(&layer_id)
    }
}
