//! Artificial bee colony over closed tours.
//!
//! Each iteration runs three phases on a population of food sources:
//!
//! 1. **Employed**: every source tries one random interior swap and keeps it
//!    if strictly shorter.
//! 2. **Onlooker**: `colony_size` sources are drawn with replacement,
//!    proportional to fitness `1 / (1 + distance)`, and each draw tries one
//!    swap the same way.
//! 3. **Scout**: each source is independently replaced by a fresh random tour
//!    with probability `scout_probability`.
//!
//! The global best only changes on strict improvement, so the trace of best
//! distances never increases.
//!
//! # Reference
//!
//! Karaboga, D. (2005). "An idea based on honey bee swarm for numerical
//! optimization", Technical Report TR06, Erciyes University.

use std::time::{Duration, Instant};

use log::{debug, info};
use rand::Rng;

use crate::distance::DistanceMatrix;
use crate::error::Result;
use crate::models::{Algorithm, Route, SolverResult, Trace};

use super::config::BeeColonyConfig;
use super::moves::{best_index, fitness, improves, require_interior, roulette, Candidate};

/// Artificial bee colony solver.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_tsp::distance::DistanceMatrix;
/// use u_tsp::meta::{BeeColony, BeeColonyConfig};
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
/// let abc = BeeColony::new(BeeColonyConfig::default().with_max_iterations(100));
/// let result = abc.solve(&dm, &mut rng).unwrap();
/// assert_eq!(result.distance, 80.0);
/// assert!(result.trace.is_non_increasing());
/// ```
#[derive(Debug, Clone, Default)]
pub struct BeeColony {
    config: BeeColonyConfig,
}

impl BeeColony {
    /// Creates a colony with the given parameters.
    pub fn new(config: BeeColonyConfig) -> Self {
        Self { config }
    }

    /// Returns the parameters.
    pub fn config(&self) -> &BeeColonyConfig {
        &self.config
    }

    /// Runs the colony for its full iteration budget.
    pub fn solve<R: Rng>(&self, distances: &DistanceMatrix, rng: &mut R) -> Result<SolverResult> {
        self.config.validate()?;
        let n = distances.size();
        let started = Instant::now();

        if n <= 2 {
            let route = Route::identity(n);
            let distance = distances.path_cost(route.cities());
            let mut trace = Trace::with_capacity(1);
            trace.push(Duration::ZERO, distance);
            return Ok(SolverResult {
                algorithm: Algorithm::BeeColony,
                route,
                distance,
                trace,
                best_iteration: 0,
                elapsed: started.elapsed(),
                memory_delta: None,
            });
        }
        require_interior("bee colony swap", n, 2)?;

        let colony = self.config.colony_size_for(n);
        let iterations = self.config.max_iterations_for(n);
        info!("bee colony: {n} cities, colony={colony} iterations={iterations}");

        let mut sources: Vec<Candidate> = (0..colony)
            .map(|_| Candidate::random(distances, rng))
            .collect();
        let mut best = best_index(&sources)
            .map(|i| sources[i].clone())
            .unwrap_or_else(|| Candidate::random(distances, rng));
        let mut best_iteration = 0;

        let mut trace = Trace::with_capacity(iterations + 1);
        trace.push(Duration::ZERO, best.distance);

        for iteration in 0..iterations {
            for source in sources.iter_mut() {
                source.try_swap_improve(distances, rng);
            }

            let weights: Vec<f64> = sources.iter().map(|s| fitness(s.distance)).collect();
            for _ in 0..colony {
                let selected = roulette(&weights, rng);
                sources[selected].try_swap_improve(distances, rng);
            }

            for source in sources.iter_mut() {
                if rng.random_bool(self.config.scout_probability) {
                    *source = Candidate::random(distances, rng);
                }
            }

            if let Some(i) = best_index(&sources) {
                if improves(sources[i].distance, best.distance) {
                    best = sources[i].clone();
                    best_iteration = iteration + 1;
                    debug!("bee colony: iteration {best_iteration} best={}", best.distance);
                }
            }

            trace.push(started.elapsed(), best.distance);
        }

        let elapsed = started.elapsed();
        info!(
            "bee colony: distance={} best_iteration={best_iteration} time={:.2}ms",
            best.distance,
            elapsed.as_secs_f64() * 1e3
        );

        Ok(SolverResult {
            algorithm: Algorithm::BeeColony,
            route: best.route,
            distance: best.distance,
            trace,
            best_iteration,
            elapsed,
            memory_delta: None,
        })
    }
}
