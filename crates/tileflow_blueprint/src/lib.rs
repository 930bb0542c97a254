//! Blueprint layers and the composable modifier pipeline
//!
//! A blueprint layer owns the canonical cell set for a named region. Its
//! content comes from two sources that compose: manual paint edits, and an
//! ordered stack of [`Modifier`]s replayed over the painted set by
//! [`BlueprintLayer::execute`]. Modifiers are pure cell-set transformations;
//! stochastic ones draw from a single seeded RNG stream so a given seed
//! reproduces the same map.

mod apply;
mod context;
mod layer;
mod modifier;

pub use apply::{apply_modifier, apply_stack};
pub use context::{LayerContext, PaintWrite, SiblingSets};
pub use layer::{BlueprintLayer, LayerState};
pub use modifier::{BooleanOp, Modifier, ModifierKind, SelectMode, MIN_ISLAND_SIZE};
