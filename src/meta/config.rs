//! Solver configuration.
//!
//! Every stochastic solver takes an explicit config value; there is no
//! process-wide tuning state. Population sizes left as `None` scale with the
//! instance via [`default_colony_size`] and [`default_max_iterations`].

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::local_search::WindowedTwoOpt;

/// Default population size for `n` cities: `clamp(n / 2, 20, 50)`.
pub fn default_colony_size(n: usize) -> usize {
    (n / 2).clamp(20, 50)
}

/// Default iteration budget for `n` cities: `clamp(n * 20, 1000, 5000)`.
pub fn default_max_iterations(n: usize) -> usize {
    n.saturating_mul(20).clamp(1000, 5000)
}

fn check_probability(name: &str, p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(Error::invalid_config(format!("{name} must be in [0, 1], got {p}")))
    }
}

fn check_colony(colony_size: Option<usize>) -> Result<()> {
    match colony_size {
        Some(0) => Err(Error::invalid_config("colony_size must be at least 1")),
        _ => Ok(()),
    }
}

/// Geometric cooling schedule for simulated annealing.
///
/// # Examples
///
/// ```
/// use u_tsp::meta::AnnealingConfig;
///
/// let config = AnnealingConfig::default()
///     .with_initial_temperature(50.0)
///     .with_cooling_rate(0.95);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.iterations_per_temperature, 70);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealingConfig {
    /// Starting temperature `T0`.
    pub initial_temperature: f64,
    /// The search stops once `T <= min_temperature`.
    pub min_temperature: f64,
    /// Moves tried at each temperature level.
    pub iterations_per_temperature: usize,
    /// Cooling factor `α` in `(0, 1)`; `T *= α` after each level.
    pub cooling_rate: f64,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            min_temperature: 0.1,
            iterations_per_temperature: 70,
            cooling_rate: 0.98,
        }
    }
}

impl AnnealingConfig {
    /// Sets the starting temperature.
    pub fn with_initial_temperature(mut self, t0: f64) -> Self {
        self.initial_temperature = t0;
        self
    }

    /// Sets the temperature floor that ends the search.
    pub fn with_min_temperature(mut self, tmin: f64) -> Self {
        self.min_temperature = tmin;
        self
    }

    /// Sets the number of moves per temperature level.
    pub fn with_iterations_per_temperature(mut self, k: usize) -> Self {
        self.iterations_per_temperature = k;
        self
    }

    /// Sets the cooling factor.
    pub fn with_cooling_rate(mut self, alpha: f64) -> Self {
        self.cooling_rate = alpha;
        self
    }

    /// Checks that the schedule terminates.
    pub fn validate(&self) -> Result<()> {
        if !(self.min_temperature > 0.0 && self.min_temperature.is_finite()) {
            return Err(Error::invalid_config(format!(
                "min_temperature must be positive, got {}",
                self.min_temperature
            )));
        }
        if !(self.initial_temperature.is_finite() && self.initial_temperature > self.min_temperature)
        {
            return Err(Error::invalid_config(format!(
                "initial_temperature {} must exceed min_temperature {}",
                self.initial_temperature, self.min_temperature
            )));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(Error::invalid_config(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            )));
        }
        if self.iterations_per_temperature == 0 {
            return Err(Error::invalid_config(
                "iterations_per_temperature must be at least 1",
            ));
        }
        Ok(())
    }

    /// Number of temperature levels the schedule runs through.
    pub fn levels(&self) -> usize {
        let mut t = self.initial_temperature;
        let mut levels = 0;
        while t > self.min_temperature {
            t *= self.cooling_rate;
            levels += 1;
        }
        levels
    }
}

/// Artificial bee colony parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeeColonyConfig {
    /// Number of food sources; `None` uses [`default_colony_size`].
    pub colony_size: Option<usize>,
    /// Iteration budget; `None` uses [`default_max_iterations`].
    pub max_iterations: Option<usize>,
    /// Chance that a scout abandons each source every iteration.
    pub scout_probability: f64,
}

impl Default for BeeColonyConfig {
    fn default() -> Self {
        Self {
            colony_size: None,
            max_iterations: None,
            scout_probability: 0.1,
        }
    }
}

impl BeeColonyConfig {
    /// Fixes the number of food sources.
    pub fn with_colony_size(mut self, size: usize) -> Self {
        self.colony_size = Some(size);
        self
    }

    /// Fixes the iteration budget.
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// Sets the per-source abandonment probability.
    pub fn with_scout_probability(mut self, p: f64) -> Self {
        self.scout_probability = p;
        self
    }

    /// Colony size for an instance of `n` cities.
    pub fn colony_size_for(&self, n: usize) -> usize {
        self.colony_size.unwrap_or_else(|| default_colony_size(n))
    }

    /// Iteration budget for an instance of `n` cities.
    pub fn max_iterations_for(&self, n: usize) -> usize {
        self.max_iterations.unwrap_or_else(|| default_max_iterations(n))
    }

    /// Checks that the colony is non-empty and the probability is in range.
    pub fn validate(&self) -> Result<()> {
        check_colony(self.colony_size)?;
        check_probability("scout_probability", self.scout_probability)
    }
}

/// Hybrid population search parameters.
///
/// # Examples
///
/// ```
/// use u_tsp::meta::HybridConfig;
///
/// let config = HybridConfig::default()
///     .with_colony_size(30)
///     .with_max_iterations(500);
/// assert_eq!(config.colony_size_for(200), 30);
/// assert_eq!(config.elite_size(30), 2);
/// assert_eq!(config.swap_count(100), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HybridConfig {
    /// Number of individuals; `None` uses [`default_colony_size`].
    pub colony_size: Option<usize>,
    /// Iteration budget; `None` uses [`default_max_iterations`].
    pub max_iterations: Option<usize>,
    /// Fraction of the colony seeded from greedy tours and cloned by elitism.
    pub elite_fraction: f64,
    /// Start cities tried by the multi-start greedy seeding.
    pub greedy_starts: usize,
    /// Fraction of cities in the perturbation swap set (at least 2 positions).
    pub mutation_rate: f64,
    /// Rank-weighted reference individuals drawn per perturbation.
    pub reference_count: usize,
    /// Chance that each swap-set position is swapped.
    pub swap_probability: f64,
    /// Chance that a bottom-half individual is reinitialized.
    pub cull_probability: f64,
    /// Polish the best tour every this many iterations.
    pub polish_interval: usize,
    /// Polishing interval once the late phase starts.
    pub late_polish_interval: usize,
    /// Fraction of the budget after which the late phase starts.
    pub late_phase: f64,
    /// Segment window of the polishing 2-opt.
    pub polish_window: usize,
    /// Accepted-move cap of the polishing 2-opt.
    pub polish_max_moves: usize,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            colony_size: None,
            max_iterations: None,
            elite_fraction: 0.05,
            greedy_starts: 20,
            mutation_rate: 0.1,
            reference_count: 3,
            swap_probability: 0.5,
            cull_probability: 0.2,
            polish_interval: 100,
            late_polish_interval: 10,
            late_phase: 0.8,
            polish_window: 20,
            polish_max_moves: 100,
        }
    }
}

impl HybridConfig {
    /// Fixes the population size.
    pub fn with_colony_size(mut self, size: usize) -> Self {
        self.colony_size = Some(size);
        self
    }

    /// Fixes the iteration budget.
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// Sets the fraction of greedy seeds and elite clones.
    pub fn with_elite_fraction(mut self, fraction: f64) -> Self {
        self.elite_fraction = fraction;
        self
    }

    /// Sets how many start cities the greedy seeding tries.
    pub fn with_greedy_starts(mut self, starts: usize) -> Self {
        self.greedy_starts = starts;
        self
    }

    /// Sets the swap-set size as a fraction of the city count.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets how many reference individuals each perturbation draws.
    pub fn with_reference_count(mut self, count: usize) -> Self {
        self.reference_count = count;
        self
    }

    /// Sets the chance that each swap-set position is swapped.
    pub fn with_swap_probability(mut self, p: f64) -> Self {
        self.swap_probability = p;
        self
    }

    /// Sets the chance that a bottom-half individual is reinitialized.
    pub fn with_cull_probability(mut self, p: f64) -> Self {
        self.cull_probability = p;
        self
    }

    /// Sets the regular polishing interval.
    pub fn with_polish_interval(mut self, every: usize) -> Self {
        self.polish_interval = every;
        self
    }

    /// Sets the polishing interval used in the late phase.
    pub fn with_late_polish_interval(mut self, every: usize) -> Self {
        self.late_polish_interval = every;
        self
    }

    /// Sets the budget fraction after which the late phase starts.
    pub fn with_late_phase(mut self, fraction: f64) -> Self {
        self.late_phase = fraction;
        self
    }

    /// Sets the segment window of the polishing 2-opt.
    pub fn with_polish_window(mut self, window: usize) -> Self {
        self.polish_window = window;
        self
    }

    /// Sets the accepted-move cap of the polishing 2-opt.
    pub fn with_polish_max_moves(mut self, moves: usize) -> Self {
        self.polish_max_moves = moves;
        self
    }

    /// Population size for an instance of `n` cities.
    pub fn colony_size_for(&self, n: usize) -> usize {
        self.colony_size.unwrap_or_else(|| default_colony_size(n))
    }

    /// Iteration budget for an instance of `n` cities.
    pub fn max_iterations_for(&self, n: usize) -> usize {
        self.max_iterations.unwrap_or_else(|| default_max_iterations(n))
    }

    /// `max(2, floor(elite_fraction * colony))`, before any capping.
    pub fn elite_size(&self, colony: usize) -> usize {
        ((self.elite_fraction * colony as f64) as usize).max(2)
    }

    /// Swap-set size for `n` cities: `max(2, floor(mutation_rate * n))`.
    pub fn swap_count(&self, n: usize) -> usize {
        ((self.mutation_rate * n as f64) as usize).max(2)
    }

    /// Whether the best tour is polished at `iteration` of `budget`.
    pub fn polishes_at(&self, iteration: usize, budget: usize) -> bool {
        iteration % self.polish_interval == 0
            || (iteration as f64 > budget as f64 * self.late_phase
                && iteration % self.late_polish_interval == 0)
    }

    /// Bounds for the polishing 2-opt.
    pub fn polish_options(&self) -> WindowedTwoOpt {
        WindowedTwoOpt {
            window: self.polish_window,
            max_moves: self.polish_max_moves,
        }
    }

    /// Checks probabilities, intervals and colony size.
    pub fn validate(&self) -> Result<()> {
        check_colony(self.colony_size)?;
        check_probability("elite_fraction", self.elite_fraction)?;
        check_probability("mutation_rate", self.mutation_rate)?;
        check_probability("swap_probability", self.swap_probability)?;
        check_probability("cull_probability", self.cull_probability)?;
        check_probability("late_phase", self.late_phase)?;
        if self.polish_interval == 0 || self.late_polish_interval == 0 {
            return Err(Error::invalid_config("polishing intervals must be at least 1"));
        }
        Ok(())
    }
}
