//! Stochastic solvers.
//!
//! - [`SimulatedAnnealing`] — Single-tour annealing with a geometric cooling schedule
//! - [`BeeColony`] — Artificial bee colony with employed, onlooker, and scout phases
//! - [`HybridSearch`] — Greedy-seeded population search with periodic 2-opt polishing
//!
//! All solvers draw from a caller-supplied [`rand::Rng`], so a seeded
//! generator makes a run reproducible.

mod annealing;
mod bee_colony;
mod config;
mod hybrid;
pub mod moves;

pub use annealing::SimulatedAnnealing;
pub use bee_colony::BeeColony;
pub use config::{
    default_colony_size, default_max_iterations, AnnealingConfig, BeeColonyConfig, HybridConfig,
};
pub use hybrid::{HybridSearch, HybridStats};
