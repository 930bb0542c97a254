//! World configuration and execution orchestration for tileflow
//!
//! The [`WorldConfig`] is the serialized aggregate: grid dimensions, seed
//! policy, placement transform, and ordered folders of blueprint and build
//! layers. The [`Orchestrator`] owns a config and executes it: blueprint
//! layers in declaration order (one seeded RNG stream per run), then build
//! layers, with progress callbacks, incremental cluster-scoped rebuilds, and
//! a runtime mutation API for the embedding game.
//!
//! There is no global instance - embedders construct an `Orchestrator` and
//! pass it where it is needed.

mod build;
mod config;
mod error;
mod orchestrator;

pub use build::{BuildLayer, ExecutionMode};
pub use config::{LayerFolder, WorldConfig};
pub use error::PipelineError;
pub use orchestrator::Orchestrator;
