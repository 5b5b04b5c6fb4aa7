//! Exact TSP solving.
//!
//! - [`held_karp`] — Subset dynamic programming, O(n²·2ⁿ) time, O(n·2ⁿ) space

mod held_karp;

pub use held_karp::{held_karp, solve_exact};
