//! Layered procedural tile map generation.
//!
//! Umbrella crate re-exporting the whole stack:
//!
//! - [`core`]: cell positions, cell sets, grids, clusters, set algebra
//! - [`autotile`]: neighbor bitmask codes and tile role classification
//! - [`blueprint`]: blueprint layers and their modifier stacks
//! - [`pipeline`]: world configuration, build layers, the orchestrator
//!
//! ```no_run
//! use tileflow::prelude::*;
//!
//! let mut config = WorldConfig::new(32, 32)?;
//! let mut ground = BlueprintLayer::new("ground");
//! ground.modifiers.push(Modifier::new(ModifierKind::CellularAutomata {
//!     fill_probability: 0.45,
//!     smoothing_steps: 4,
//!     ensure_connected: true,
//! }));
//! let ground_id = config.add_blueprint_layer(ground);
//! config.add_build_layer(BuildLayer::new("walls", ground_id));
//!
//! let mut orchestrator = Orchestrator::new(config);
//! orchestrator.generate_complete_map();
//! # Ok::<(), tileflow::pipeline::PipelineError>(())
//! ```

pub use tileflow_autotile as autotile;
pub use tileflow_blueprint as blueprint;
pub use tileflow_core as core;
pub use tileflow_pipeline as pipeline;

/// The commonly used types in one import.
pub mod prelude {
    pub use tileflow_autotile::{GridKind, Rotation, TileClass, TilePlacement, TileRole};
    pub use tileflow_blueprint::{
        BlueprintLayer, BooleanOp, LayerState, Modifier, ModifierKind, SelectMode,
    };
    pub use tileflow_core::{
        CellPos, CellSet, Direction, GridRect, GridTransform, Neighborhood,
    };
    pub use tileflow_pipeline::{
        BuildLayer, ExecutionMode, LayerFolder, Orchestrator, PipelineError, WorldConfig,
    };
}
