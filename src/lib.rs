//! # u-tsp
//!
//! Traveling salesman solvers over a dense distance matrix: constructive
//! seeds, 2-opt local search, an exact Held–Karp solver for small
//! instances, and three stochastic searches.
//!
//! ## Modules
//!
//! - [`distance`] — Validated distance matrix and tour length
//! - [`models`] — Route, Trace, and SolverResult
//! - [`constructive`] — Nearest neighbor, multi-start greedy, DSD seeding
//! - [`local_search`] — Exhaustive and windowed 2-opt
//! - [`exact`] — Held–Karp subset dynamic programming
//! - [`meta`] — Simulated annealing, artificial bee colony, hybrid population search
//! - [`runner`] — Runs every solver on one instance and reports the results
//!
//! ## Example
//!
//! ```
//! use u_tsp::distance::DistanceMatrix;
//! use u_tsp::runner::{run_all, NoMemoryProbe, RunConfig};
//!
//! let dm = DistanceMatrix::from_rows(vec![
//!     vec![0.0, 10.0, 15.0, 20.0],
//!     vec![10.0, 0.0, 35.0, 25.0],
//!     vec![15.0, 35.0, 0.0, 30.0],
//!     vec![20.0, 25.0, 30.0, 0.0],
//! ])
//! .unwrap();
//!
//! let report = run_all(&dm, &RunConfig::default().with_seed(1), &NoMemoryProbe).unwrap();
//! assert_eq!(report.exact.unwrap().distance, 80.0);
//! ```

pub mod constructive;
pub mod distance;
pub mod error;
pub mod exact;
pub mod local_search;
pub mod meta;
pub mod models;
pub mod runner;

pub use error::{Error, Result};
