//! Bitmask autotile classification for tileflow
//!
//! This crate turns a cell's neighbor occupancy pattern into a configuration
//! code, and a configuration code into a tile classification: a role (corner,
//! edge, fill, dead-end, ...), a canonical rotation, and an optional x-axis
//! mirror for the configurations a 90 degree rotation cannot express.
//!
//! Two grid kinds are supported:
//! - `Normal` - tiles sit on cells; codes are 9-bit (8 neighbors + center).
//! - `Dual` - tiles sit on grid intersections between four cells; codes are
//!   4-bit.
//!
//! # Example
//!
//! ```rust,ignore
//! use tileflow_autotile::{classify, compute_code, GridKind};
//! use tileflow_core::{CellPos, CellSet};
//!
//! let set: CellSet = [(2, 2), (2, 3), (3, 2), (3, 3)]
//!     .into_iter()
//!     .map(CellPos::from)
//!     .collect();
//!
//! let code = compute_code(CellPos::new(2, 2), &set);
//! let class = classify(code, GridKind::Normal).unwrap();
//! ```

pub mod classify;
pub mod mask;
pub mod resolve;

pub use classify::{classify, GridKind, Rotation, TileClass, TileRole};
pub use mask::{bits, compute_code, compute_dual_code, dual_bits, normalize_code};
pub use resolve::{resolve, resolve_positions, TilePlacement};
