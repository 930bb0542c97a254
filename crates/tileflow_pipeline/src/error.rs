//! Fatal error taxonomy
//!
//! Only broken invariants and asset-loading failures are errors here; the
//! generation pipeline itself recovers from bad references and out-of-bounds
//! input by logging and continuing.

use thiserror::Error;
use tileflow_core::GridError;

/// Error type for configuration construction and persistence failures
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Grid(#[from] GridError),
}
