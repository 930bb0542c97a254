//! Core grid data structures for tileflow
//!
//! This crate provides the fundamental types for sparse grid regions:
//! - `CellPos` - A signed grid coordinate
//! - `CellSet` - An ordered set of unique cell positions
//! - `GridRect` / `GridTransform` - Grid bounds and world-space mapping
//! - Cell-set algebra - expand, shrink, smooth, flood fill, rule filtering
//! - Cluster math - fixed-size spatial partitioning for incremental rebuilds

mod cell;
mod cluster;
mod grid;

pub mod algebra;

pub use cell::{CellPos, CellSet, Direction, Neighborhood};
pub use cluster::{cells_of_cluster, cluster_id, cluster_neighbors, cluster_origin, ClusterId};
pub use grid::{GridError, GridRect, GridTransform};
