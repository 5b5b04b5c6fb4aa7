//! Constructive heuristics for building seed tours.
//!
//! - [`nearest_neighbor`] — Greedy nearest-neighbor tour, O(n²)
//! - [`knn_with_two_opt`] — Nearest neighbor from city 0 refined by exhaustive 2-opt
//! - [`multi_start_greedy`] — One nearest-neighbor tour per start city, O(k·n²)
//! - [`dsd_seed`] — Sign-pattern sort seeding for very small instances, O(n² log n)

mod dsd;
mod multi_start;
mod nearest_neighbor;

pub use dsd::dsd_seed;
pub use multi_start::{multi_start_greedy, ranked_greedy_seeds};
pub use nearest_neighbor::{knn_with_two_opt, nearest_neighbor};
