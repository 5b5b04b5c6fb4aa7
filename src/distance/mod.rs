//! Distance matrix.
//!
//! Provides the dense, immutable cost matrix shared by every solver.

mod matrix;

pub use matrix::{total_distance, DistanceMatrix};
