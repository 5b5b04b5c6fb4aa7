//! Domain model types for the TSP solvers.
//!
//! Provides closed tours, progress traces, and the result record every
//! solver returns.

mod route;
mod solution;
mod trace;

pub use route::Route;
pub use solution::{Algorithm, SolverResult};
pub use trace::{Trace, TraceSample};
