//! Solver output types.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{Route, Trace};

/// Which solver produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// Nearest neighbor from city 0, refined with exhaustive 2-opt.
    NearestNeighbor,
    /// Sign-pattern sort seeding.
    Dsd,
    /// Held–Karp subset dynamic programming.
    HeldKarp,
    /// Simulated annealing.
    SimulatedAnnealing,
    /// Artificial bee colony.
    BeeColony,
    /// Hybrid population search.
    Hybrid,
}

impl Algorithm {
    /// Short label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Algorithm::NearestNeighbor => "KNN+2-opt",
            Algorithm::Dsd => "DSD",
            Algorithm::HeldKarp => "DP",
            Algorithm::SimulatedAnnealing => "SA",
            Algorithm::BeeColony => "ABC",
            Algorithm::Hybrid => "HM",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one solver invocation.
///
/// `best_iteration` indexes into `trace`, so the time at which the best was
/// reached is `trace[best_iteration].elapsed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverResult {
    /// Solver that produced this result.
    pub algorithm: Algorithm,
    /// Best closed tour found.
    pub route: Route,
    /// Total distance of `route`.
    pub distance: f64,
    /// Progress samples recorded during the solve.
    pub trace: Trace,
    /// Step at which the best distance was last improved.
    pub best_iteration: usize,
    /// Wall time of the whole invocation.
    pub elapsed: Duration,
    /// Process memory growth across the solve, when a probe was available.
    pub memory_delta: Option<i64>,
}

impl SolverResult {
    /// Builds a result for a single-shot solver: the trace holds one sample
    /// at `elapsed`.
    pub fn single_shot(algorithm: Algorithm, route: Route, distance: f64, elapsed: Duration) -> Self {
        let mut trace = Trace::with_capacity(1);
        trace.push(elapsed, distance);
        Self {
            algorithm,
            route,
            distance,
            trace,
            best_iteration: 0,
            elapsed,
            memory_delta: None,
        }
    }

    /// Elapsed time at which the best distance was reached.
    pub fn best_time(&self) -> Option<Duration> {
        self.trace.get(self.best_iteration).map(|s| s.elapsed)
    }

    /// Attaches a memory measurement.
    pub fn with_memory_delta(mut self, delta: Option<i64>) -> Self {
        self.memory_delta = delta;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_shot() {
        let r = SolverResult::single_shot(
            Algorithm::HeldKarp,
            Route::identity(3),
            12.0,
            Duration::from_millis(4),
        );
        assert_eq!(r.trace.len(), 1);
        assert_eq!(r.best_iteration, 0);
        assert_eq!(r.best_time(), Some(Duration::from_millis(4)));
        assert!(r.memory_delta.is_none());
    }

    #[test]
    fn test_best_time_indexes_trace() {
        let mut trace = Trace::new();
        trace.push(Duration::from_millis(0), 9.0);
        trace.push(Duration::from_millis(3), 8.0);
        trace.push(Duration::from_millis(5), 8.0);
        let r = SolverResult {
            algorithm: Algorithm::BeeColony,
            route: Route::identity(3),
            distance: 8.0,
            trace,
            best_iteration: 1,
            elapsed: Duration::from_millis(6),
            memory_delta: None,
        }
        .with_memory_delta(Some(-16));
        assert_eq!(r.best_time(), Some(Duration::from_millis(3)));
        assert_eq!(r.memory_delta, Some(-16));
    }

    #[test]
    fn test_labels() {
        assert_eq!(Algorithm::Hybrid.to_string(), "HM");
        assert_eq!(Algorithm::SimulatedAnnealing.label(), "SA");
    }
}
