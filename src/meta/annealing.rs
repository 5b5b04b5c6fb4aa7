//! Simulated annealing over closed tours.
//!
//! A single tour is perturbed by swapping two random interior cities. A
//! shorter tour is always accepted; a longer one is accepted with the
//! Metropolis probability `exp(-Δ / T)`. The temperature starts at `T0` and
//! is multiplied by `α` after every `k` moves until it reaches `Tmin`.
//!
//! The current tour may wander uphill, so the best tour ever seen is kept
//! separately. The trace records the *current* distance after every move.
//!
//! # Reference
//!
//! Kirkpatrick, S., Gelatt, C.D. & Vecchi, M.P. (1983). "Optimization by
//! simulated annealing", *Science* 220(4598), 671-680.

use std::time::{Duration, Instant};

use log::{debug, info};
use rand::Rng;

use crate::distance::DistanceMatrix;
use crate::error::Result;
use crate::models::{Algorithm, Route, SolverResult, Trace};

use super::config::AnnealingConfig;
use super::moves::{improves, require_interior, swap_neighbor};

/// Simulated annealing solver.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_tsp::distance::DistanceMatrix;
/// use u_tsp::meta::{AnnealingConfig, SimulatedAnnealing};
/// use u_tsp::models::Route;
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 10.0, 15.0, 20.0],
///     vec![10.0, 0.0, 35.0, 25.0],
///     vec![15.0, 35.0, 0.0, 30.0],
///     vec![20.0, 25.0, 30.0, 0.0],
/// ])
/// .unwrap();
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let sa = SimulatedAnnealing::new(AnnealingConfig::default());
/// let result = sa.solve(&dm, &Route::identity(4), &mut rng).unwrap();
/// assert_eq!(result.distance, 80.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimulatedAnnealing {
    config: AnnealingConfig,
}

impl SimulatedAnnealing {
    /// Creates an annealer with the given parameters.
    pub fn new(config: AnnealingConfig) -> Self {
        Self { config }
    }

    /// Returns the parameters.
    pub fn config(&self) -> &AnnealingConfig {
        &self.config
    }

    /// Anneals from `initial`, which must be a closed tour over the matrix.
    ///
    /// Instances with two or fewer cities have a single tour; it is returned
    /// as is, without sampling.
    pub fn solve<R: Rng>(
        &self,
        distances: &DistanceMatrix,
        initial: &Route,
        rng: &mut R,
    ) -> Result<SolverResult> {
        self.config.validate()?;
        let n = distances.size();
        initial.validate(n)?;

        let started = Instant::now();
        let mut current = initial.clone();
        let mut current_distance = distances.path_cost(current.cities());
        let mut best = current.clone();
        let mut best_distance = current_distance;
        let mut best_iteration = 0;

        let capacity = 1 + self.config.levels() * self.config.iterations_per_temperature;
        let mut trace = Trace::with_capacity(if n <= 2 { 1 } else { capacity });
        trace.push(Duration::ZERO, current_distance);

        if n > 2 {
            require_interior("annealing swap", n, 2)?;
            info!(
                "annealing: {n} cities, T0={} Tmin={} k={} alpha={}",
                self.config.initial_temperature,
                self.config.min_temperature,
                self.config.iterations_per_temperature,
                self.config.cooling_rate
            );

            let mut temperature = self.config.initial_temperature;
            let mut iteration = 0;
            while temperature > self.config.min_temperature {
                for _ in 0..self.config.iterations_per_temperature {
                    iteration += 1;
                    let candidate = swap_neighbor(&current, rng);
                    let candidate_distance = distances.path_cost(candidate.cities());
                    let diff = candidate_distance - current_distance;

                    if diff < 0.0 || rng.random::<f64>() < (-diff / temperature).exp() {
                        current = candidate;
                        current_distance = candidate_distance;

                        if improves(current_distance, best_distance) {
                            best = current.clone();
                            best_distance = current_distance;
                            best_iteration = iteration;
                            debug!("annealing: iteration {iteration} T={temperature:.4} best={best_distance}");
                        }
                    }

                    trace.push(started.elapsed(), current_distance);
                }
                temperature *= self.config.cooling_rate;
            }
        }

        let elapsed = started.elapsed();
        info!(
            "annealing: distance={best_distance} best_iteration={best_iteration} time={:.2}ms",
            elapsed.as_secs_f64() * 1e3
        );

        Ok(SolverResult {
            algorithm: Algorithm::SimulatedAnnealing,
            route: best,
            distance: best_distance,
            trace,
            best_iteration,
            elapsed,
            memory_delta: None,
        })
    }
}
