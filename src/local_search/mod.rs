//! Local search operators for improving tours.
//!
//! - [`two_opt`] — Exhaustive 2-opt with full distance recomputation
//! - [`windowed_two_opt`] — Bounded-window first-improvement 2-opt with incremental deltas

mod two_opt;
mod windowed;

pub use two_opt::two_opt;
pub use windowed::{reversal_delta, windowed_two_opt, WindowedTwoOpt};

/// Minimum gain for a move to count as an improvement.
pub(crate) const IMPROVEMENT_EPS: f64 = 1e-10;
