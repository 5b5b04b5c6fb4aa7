//! Multi-start greedy construction.
//!
//! Runs [`nearest_neighbor`] once from each of the first `num_starts` cities,
//! giving a set of independent seed tours for population-based solvers.

use crate::distance::DistanceMatrix;
use crate::models::Route;

use super::nearest_neighbor;

/// Builds one nearest-neighbor tour per start city `0..num_starts`.
///
/// `num_starts` is capped at the number of cities. Tours are returned in
/// start-city order; use [`ranked_greedy_seeds`] for elites.
pub fn multi_start_greedy(distances: &DistanceMatrix, num_starts: usize) -> Vec<Route> {
    let starts = num_starts.min(distances.size());
    (0..starts)
        .map(|start| nearest_neighbor(distances, start))
        .collect()
}

/// Multi-start greedy tours paired with their distances, sorted ascending.
///
/// The sort is stable, so equal-length tours keep start-city order.
///
/// # Examples
///
/// ```
/// use u_tsp::distance::DistanceMatrix;
/// use u_tsp::constructive::ranked_greedy_seeds;
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 10.0, 15.0, 20.0],
///     vec![10.0, 0.0, 35.0, 25.0],
///     vec![15.0, 35.0, 0.0, 30.0],
///     vec![20.0, 25.0, 30.0, 0.0],
/// ])
/// .unwrap();
///
/// let seeds = ranked_greedy_seeds(&dm, 4);
/// assert_eq!(seeds.len(), 4);
/// assert_eq!(seeds[0].1, 80.0);
/// ```
pub fn ranked_greedy_seeds(distances: &DistanceMatrix, num_starts: usize) -> Vec<(Route, f64)> {
    let mut seeds: Vec<(Route, f64)> = multi_start_greedy(distances, num_starts)
        .into_iter()
        .map(|r| {
            let d = distances.path_cost(r.cities());
            (r, d)
        })
        .collect();
    seeds.sort_by(|a, b| a.1.total_cmp(&b.1));
    seeds
}
