//! Hybrid population search.
//!
//! The population is seeded with the best multi-start greedy tours and
//! filled with random tours. Each iteration:
//!
//! 1. Ranks the population by distance.
//! 2. **Perturbation**: for each individual, draws rank-weighted reference
//!    individuals (weight `1 / (rank + 1)`), picks a swap set of
//!    `max(2, floor(mutation_rate * n))` interior positions, and swaps each
//!    member with a random member of the set with probability
//!    `swap_probability`. The mutant replaces the individual only if
//!    strictly shorter. The references are drawn but do not shape the
//!    mutant.
//! 3. **Neighbor**: one random interior swap per individual, kept if shorter.
//! 4. **Culling**: each bottom-half individual (by the step-1 rank) is
//!    reinitialized with probability `cull_probability`.
//! 5. **Polishing**: on schedule, the global best tour gets a windowed
//!    first-improvement 2-opt.
//! 6. **Elitism**: after sorting, the worst `elite` slots are overwritten
//!    with copies of the best `elite` individuals.
//!
//! The global best only changes on strict improvement, so the trace of best
//! distances never increases.

use std::time::{Duration, Instant};

use log::{debug, info, trace};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constructive::ranked_greedy_seeds;
use crate::distance::DistanceMatrix;
use crate::error::Result;
use crate::local_search::{windowed_two_opt, WindowedTwoOpt};
use crate::models::{Algorithm, Route, SolverResult, Trace};

use super::config::HybridConfig;
use super::moves::{
    best_index, improves, rank, require_interior, sample_interior_positions, weighted_distinct,
    Candidate,
};

/// Bookkeeping reported alongside a hybrid run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HybridStats {
    /// Iterations since the last global improvement when the run ended.
    pub stagnation: usize,
    /// Number of polishing passes applied.
    pub polishes: usize,
    /// Number of polishing passes that improved the global best.
    pub polish_improvements: usize,
}

/// Hybrid population solver.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_tsp::distance::DistanceMatrix;
/// use u_tsp::meta::{HybridConfig, HybridSearch};
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
/// let hm = HybridSearch::new(HybridConfig::default().with_max_iterations(50));
/// let result = hm.solve(&dm, &mut rng).unwrap();
/// assert_eq!(result.distance, 80.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HybridSearch {
    config: HybridConfig,
}

impl HybridSearch {
    /// Creates a hybrid search with the given parameters.
    pub fn new(config: HybridConfig) -> Self {
        Self { config }
    }

    /// Returns the parameters.
    pub fn config(&self) -> &HybridConfig {
        &self.config
    }

    /// Runs the search for its full iteration budget.
    pub fn solve<R: Rng>(&self, distances: &DistanceMatrix, rng: &mut R) -> Result<SolverResult> {
        self.solve_with_stats(distances, rng).map(|(result, _)| result)
    }

    /// Like [`solve`](Self::solve), also returning run statistics.
    pub fn solve_with_stats<R: Rng>(
        &self,
        distances: &DistanceMatrix,
        rng: &mut R,
    ) -> Result<(SolverResult, HybridStats)> {
        self.config.validate()?;
        let n = distances.size();
        let started = Instant::now();
        let mut stats = HybridStats::default();

        if n <= 2 {
            let route = Route::identity(n);
            let distance = distances.path_cost(route.cities());
            let mut trace = Trace::with_capacity(1);
            trace.push(Duration::ZERO, distance);
            let result = SolverResult {
                algorithm: Algorithm::Hybrid,
                route,
                distance,
                trace,
                best_iteration: 0,
                elapsed: started.elapsed(),
                memory_delta: None,
            };
            return Ok((result, stats));
        }

        let swap_count = self.config.swap_count(n);
        require_interior("hybrid neighbor swap", n, 2)?;
        require_interior("hybrid perturbation", n, swap_count)?;

        let colony = self.config.colony_size_for(n);
        let iterations = self.config.max_iterations_for(n);
        let polish = self.config.polish_options();
        let elite = self.config.elite_size(colony);
        info!("hybrid: {n} cities, colony={colony} iterations={iterations} swap_count={swap_count}");

        let mut population = self.seed_population(distances, colony, rng);
        let mut best = best_index(&population)
            .map(|i| population[i].clone())
            .unwrap_or_else(|| Candidate::random(distances, rng));
        let mut best_iteration = 0;

        let mut trace = Trace::with_capacity(iterations + 1);
        trace.push(Duration::ZERO, best.distance);

        for iteration in 0..iterations {
            let ranked = rank(&population);

            for i in 0..colony {
                let references = self.draw_references(&ranked, i, rng);
                trace!("hybrid: individual {i} references {references:?}");
                let mutant =
                    self.swap_set_mutation(&population[i].route, swap_count, rng);
                population[i].offer(mutant, distances);
            }

            for individual in population.iter_mut() {
                individual.try_swap_improve(distances, rng);
            }

            self.cull(&mut population, &ranked, distances, rng);

            if let Some(i) = best_index(&population) {
                if improves(population[i].distance, best.distance) {
                    best = population[i].clone();
                    best_iteration = iteration + 1;
                    stats.stagnation = 0;
                    debug!("hybrid: iteration {best_iteration} best={}", best.distance);
                } else {
                    stats.stagnation += 1;
                }
            }

            if self.config.polishes_at(iteration, iterations) {
                stats.polishes += 1;
                let before = best.distance;
                if polish_best(&mut best, distances, polish) {
                    debug!("hybrid: polish at {iteration} {before} -> {}", best.distance);
                    best_iteration = iteration + 1;
                    stats.stagnation = 0;
                    stats.polish_improvements += 1;
                }
            }

            apply_elitism(&mut population, elite);

            trace.push(started.elapsed(), best.distance);
        }

        let elapsed = started.elapsed();
        info!(
            "hybrid: distance={} best_iteration={best_iteration} stagnation={} time={:.2}ms",
            best.distance,
            stats.stagnation,
            elapsed.as_secs_f64() * 1e3
        );

        let result = SolverResult {
            algorithm: Algorithm::Hybrid,
            route: best.route,
            distance: best.distance,
            trace,
            best_iteration,
            elapsed,
            memory_delta: None,
        };
        Ok((result, stats))
    }

    /// Greedy elites first, then random tours up to `colony` individuals.
    fn seed_population<R: Rng>(
        &self,
        distances: &DistanceMatrix,
        colony: usize,
        rng: &mut R,
    ) -> Vec<Candidate> {
        let starts = self.config.greedy_starts.min(distances.size());
        let seeds = ranked_greedy_seeds(distances, starts);
        let take = self.config.elite_size(colony).min(seeds.len()).min(colony);

        let mut population: Vec<Candidate> = seeds
            .into_iter()
            .take(take)
            .map(|(route, distance)| Candidate { route, distance })
            .collect();
        while population.len() < colony {
            population.push(Candidate::random(distances, rng));
        }
        debug!("hybrid: seeded {take} greedy tours, {} random", colony - take);
        population
    }

    /// Reinitializes each bottom-half member of `ranked` with probability
    /// `cull_probability`.
    fn cull<R: Rng>(
        &self,
        population: &mut [Candidate],
        ranked: &[usize],
        distances: &DistanceMatrix,
        rng: &mut R,
    ) {
        for &idx in &ranked[ranked.len() / 2..] {
            if rng.random_bool(self.config.cull_probability) {
                population[idx] = Candidate::random(distances, rng);
            }
        }
    }

    /// Rank-weighted distinct references for individual `current`.
    fn draw_references<R: Rng>(&self, ranked: &[usize], current: usize, rng: &mut R) -> Vec<usize> {
        let candidates: Vec<usize> = ranked.iter().copied().filter(|&i| i != current).collect();
        let weights: Vec<f64> = (0..candidates.len()).map(|r| 1.0 / (r as f64 + 1.0)).collect();
        weighted_distinct(&candidates, &weights, self.config.reference_count, rng)
    }

    /// Randomized swaps within a sampled set of interior positions.
    fn swap_set_mutation<R: Rng>(&self, route: &Route, swap_count: usize, rng: &mut R) -> Route {
        let mut mutant = route.clone();
        let positions = sample_interior_positions(route.num_interior(), swap_count, rng);
        for &p in &positions {
            if rng.random_bool(self.config.swap_probability) {
                let q = positions[rng.random_range(0..positions.len())];
                mutant.swap(p, q);
            }
        }
        mutant
    }
}

/// Windowed 2-opt on a copy of `best`, kept only if it improves.
fn polish_best(best: &mut Candidate, distances: &DistanceMatrix, opts: WindowedTwoOpt) -> bool {
    let mut route = best.route.clone();
    let polished = windowed_two_opt(&mut route, distances, opts);
    if improves(polished, best.distance) {
        *best = Candidate {
            route,
            distance: polished,
        };
        true
    } else {
        false
    }
}

/// Sorts by distance and overwrites the worst `elite` slots with copies of
/// the best. `elite` is capped at half the population.
fn apply_elitism(population: &mut [Candidate], elite: usize) {
    population.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    let len = population.len();
    let elite = elite.min(len / 2);
    for k in 0..elite {
        population[len - elite + k] = population[k].clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use u_numflow::random::create_rng;

    fn ring(n: usize) -> DistanceMatrix {
        let mut data = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                let k = (i as i64 - j as i64).unsigned_abs() as usize;
                data.push(k.min(n - k) as f64);
            }
        }
        DistanceMatrix::from_data(n, data).expect("valid")
    }

    fn small() -> HybridConfig {
        HybridConfig::default()
            .with_colony_size(12)
            .with_max_iterations(150)
    }

    #[test]
    fn test_valid_route_and_monotone_trace() {
        let dm = ring(12);
        let mut rng = create_rng(17);
        let (result, stats) = HybridSearch::new(small())
            .solve_with_stats(&dm, &mut rng)
            .expect("solves");
        assert!(result.route.validate(12).is_ok());
        assert_eq!(result.trace.len(), 151);
        assert!(result.trace.is_non_increasing());
        assert!((dm.path_cost(result.route.cities()) - result.distance).abs() < 1e-10);
        // Iterations 0 and 100 are always polished; 130 and 140 fall in the late phase.
        assert_eq!(stats.polishes, 4);
        assert!(stats.stagnation <= 150);
    }

    #[test]
    fn test_greedy_seed_on_ring_is_optimal() {
        // Nearest neighbor walks the ring, so the seeded best is already optimal.
        let dm = ring(10);
        let mut rng = create_rng(5);
        let result = HybridSearch::new(small()).solve(&dm, &mut rng).expect("solves");
        assert_eq!(result.distance, 10.0);
        assert_eq!(result.trace.get(0).map(|s| s.distance), Some(10.0));
    }

    #[test]
    fn test_seed_population_layout() {
        let dm = ring(8);
        let mut rng = create_rng(1);
        let hm = HybridSearch::new(HybridConfig::default().with_colony_size(20));
        let population = hm.seed_population(&dm, 20, &mut rng);
        assert_eq!(population.len(), 20);
        // elite_size(20) = 2 greedy seeds, both optimal on the ring
        assert_eq!(population[0].distance, 8.0);
        assert_eq!(population[1].distance, 8.0);
        for c in &population[2..] {
            assert_eq!(c.route.start(), 0);
            assert!(c.route.validate(8).is_ok());
        }
    }

    #[test]
    fn test_references_exclude_self() {
        let hm = HybridSearch::default();
        let mut rng = create_rng(2);
        let ranked = vec![3, 1, 0, 2, 4];
        for current in 0..5 {
            let refs = hm.draw_references(&ranked, current, &mut rng);
            assert_eq!(refs.len(), 3);
            assert!(!refs.contains(&current));
        }
        assert!(hm.draw_references(&[0], 0, &mut rng).is_empty());
    }

    #[test]
    fn test_swap_set_mutation_is_permutation() {
        let hm = HybridSearch::default();
        let mut rng = create_rng(6);
        let route = Route::identity(30);
        for _ in 0..50 {
            let mutant = hm.swap_set_mutation(&route, 3, &mut rng);
            assert!(mutant.validate(30).is_ok());
            assert_eq!(mutant.start(), 0);
        }
    }

    #[test]
    fn test_insufficient_cities() {
        let dm = ring(5);
        let mut rng = create_rng(3);
        let hm = HybridSearch::new(small().with_mutation_rate(1.0));
        let err = hm.solve(&dm, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::InsufficientCities {
                stage: "hybrid perturbation",
                required: 5,
                available: 4
            }
        ));
    }

    fn with_distance(start: usize, distance: f64) -> Candidate {
        let mut order: Vec<usize> = (0..4).collect();
        order.rotate_left(start);
        Candidate {
            route: Route::closed(order),
            distance,
        }
    }

    #[test]
    fn test_elitism_overwrites_worst_with_best() {
        let mut population: Vec<Candidate> = [5.0, 1.0, 4.0, 2.0, 6.0, 3.0]
            .iter()
            .enumerate()
            .map(|(i, &d)| with_distance(i % 4, d))
            .collect();
        apply_elitism(&mut population, 2);
        let distances: Vec<f64> = population.iter().map(|c| c.distance).collect();
        assert_eq!(distances, vec![1.0, 2.0, 3.0, 4.0, 1.0, 2.0]);
        assert_eq!(population[4], population[0]);
        assert_eq!(population[5], population[1]);
    }

    #[test]
    fn test_elitism_capped_at_half() {
        let mut population: Vec<Candidate> = (0..6).map(|i| with_distance(0, i as f64)).collect();
        apply_elitism(&mut population, 10);
        let distances: Vec<f64> = population.iter().map(|c| c.distance).collect();
        assert_eq!(distances, vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0]);

        let mut single = vec![with_distance(1, 7.0)];
        apply_elitism(&mut single, 2);
        assert_eq!(single[0].distance, 7.0);
    }

    #[test]
    fn test_cull_touches_only_bottom_half() {
        let dm = ring(8);
        let mut rng = create_rng(31);
        // Greedy tours from cities 1..=6 never start at 0; random fills always do.
        let original: Vec<Candidate> = (1..=6)
            .map(|s| Candidate::new(crate::constructive::nearest_neighbor(&dm, s), &dm))
            .collect();
        let ranked = vec![5, 3, 1, 0, 2, 4];

        let always = HybridSearch::new(HybridConfig::default().with_cull_probability(1.0));
        let mut population = original.clone();
        always.cull(&mut population, &ranked, &dm, &mut rng);
        for &kept in &ranked[..3] {
            assert_eq!(population[kept], original[kept]);
        }
        for &culled in &ranked[3..] {
            assert_eq!(population[culled].route.start(), 0);
            assert!(population[culled].route.validate(8).is_ok());
        }

        let never = HybridSearch::new(HybridConfig::default().with_cull_probability(0.0));
        let mut population = original.clone();
        never.cull(&mut population, &ranked, &dm, &mut rng);
        assert_eq!(population, original);
    }

    #[test]
    fn test_polish_best_keeps_only_improvements() {
        let dm = ring(6);
        let opts = WindowedTwoOpt::default();
        let mut best = Candidate::new(Route::new(vec![0, 2, 1, 3, 4, 5, 0]), &dm);
        assert_eq!(best.distance, 8.0);
        assert!(polish_best(&mut best, &dm, opts));
        assert_eq!(best.distance, 6.0);
        assert_eq!(best.route.cities(), &[0, 1, 2, 3, 4, 5, 0]);

        assert!(!polish_best(&mut best, &dm, opts));
        assert_eq!(best.distance, 6.0);
    }

    #[test]
    fn test_improving_polish_counts_as_improvement() {
        // Random tours over 30 ring cities are far from 2-opt optimal, so the
        // iteration-0 polish always shortens the best.
        let dm = ring(30);
        let mut rng = create_rng(9);
        let config = HybridConfig::default()
            .with_colony_size(2)
            .with_greedy_starts(0)
            .with_max_iterations(1);
        let (result, stats) = HybridSearch::new(config)
            .solve_with_stats(&dm, &mut rng)
            .expect("solves");
        assert_eq!(stats.polishes, 1);
        assert_eq!(stats.polish_improvements, 1);
        assert_eq!(stats.stagnation, 0);
        assert_eq!(result.best_iteration, 1);
        assert_eq!(result.trace.get(1).map(|s| s.distance), Some(result.distance));
        assert!(result.distance < result.trace.get(0).map_or(f64::INFINITY, |s| s.distance));
    }

    #[test]
    fn test_trivial_instances() {
        let mut rng = create_rng(4);
        let one = DistanceMatrix::from_data(1, vec![0.0]).expect("valid");
        let result = HybridSearch::default().solve(&one, &mut rng).expect("solves");
        assert_eq!(result.route.cities(), &[0, 0]);
        assert_eq!(result.distance, 0.0);
    }

    #[test]
    fn test_single_individual_colony() {
        let dm = ring(7);
        let mut rng = create_rng(12);
        let config = HybridConfig::default()
            .with_colony_size(1)
            .with_max_iterations(30);
        let result = HybridSearch::new(config).solve(&dm, &mut rng).expect("solves");
        assert!(result.route.validate(7).is_ok());
        assert!(result.trace.is_non_increasing());
    }
}
