//! Moves and sampling shared by the population solvers.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::distance::DistanceMatrix;
use crate::error::{Error, Result};
use crate::local_search::IMPROVEMENT_EPS;
use crate::models::Route;

/// A tour paired with its cached distance.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Closed tour.
    pub route: Route,
    /// Cached length of `route`.
    pub distance: f64,
}

impl Candidate {
    /// Wraps `route`, computing its distance.
    pub fn new(route: Route, distances: &DistanceMatrix) -> Self {
        let distance = distances.path_cost(route.cities());
        Self { route, distance }
    }

    /// A uniformly random tour starting at city 0.
    pub fn random<R: Rng>(distances: &DistanceMatrix, rng: &mut R) -> Self {
        Self::new(random_tour(distances.size(), rng), distances)
    }

    /// Tries one random interior swap and keeps it only if strictly shorter.
    ///
    /// Returns `true` if the candidate changed.
    pub fn try_swap_improve<R: Rng>(&mut self, distances: &DistanceMatrix, rng: &mut R) -> bool {
        let neighbor = swap_neighbor(&self.route, rng);
        self.offer(neighbor, distances)
    }

    /// Replaces this candidate with `route` if it is strictly shorter.
    pub fn offer(&mut self, route: Route, distances: &DistanceMatrix) -> bool {
        let d = distances.path_cost(route.cities());
        if improves(d, self.distance) {
            self.route = route;
            self.distance = d;
            true
        } else {
            false
        }
    }
}

/// Whether `candidate` is shorter than `incumbent` by more than `1e-10`.
///
/// Tours equal up to rounding never count as improvements.
pub fn improves(candidate: f64, incumbent: f64) -> bool {
    candidate < incumbent - IMPROVEMENT_EPS
}

/// `1 / (1 + distance)`, used only for proportional selection.
pub fn fitness(distance: f64) -> f64 {
    1.0 / (1.0 + distance)
}

/// Index of the shortest candidate; ties go to the lowest index.
pub fn best_index(population: &[Candidate]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, c) in population.iter().enumerate() {
        match best {
            Some((_, bd)) if c.distance >= bd => {}
            _ => best = Some((i, c.distance)),
        }
    }
    best.map(|(i, _)| i)
}

/// Population indices ordered from shortest to longest tour (stable).
pub fn rank(population: &[Candidate]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..population.len()).collect();
    order.sort_by(|&a, &b| population[a].distance.total_cmp(&population[b].distance));
    order
}

/// A uniformly random closed tour over `n` cities starting at city 0.
pub fn random_tour<R: Rng>(n: usize, rng: &mut R) -> Route {
    let mut order: Vec<usize> = (0..n).collect();
    if n > 2 {
        order[1..].shuffle(rng);
    }
    Route::closed(order)
}

/// Fails unless a route over `n` cities has at least `required` interior
/// positions.
pub fn require_interior(stage: &'static str, n: usize, required: usize) -> Result<()> {
    let available = n.saturating_sub(1);
    if available < required {
        return Err(Error::InsufficientCities {
            stage,
            required,
            available,
        });
    }
    Ok(())
}

/// Two distinct positions drawn uniformly from `1..=interior`.
///
/// Requires `interior >= 2`.
pub fn two_interior_positions<R: Rng>(interior: usize, rng: &mut R) -> (usize, usize) {
    let i = rng.random_range(1..=interior);
    let mut j = rng.random_range(1..interior);
    if j >= i {
        j += 1;
    }
    (i, j)
}

/// Copy of `route` with two distinct random interior positions swapped.
pub fn swap_neighbor<R: Rng>(route: &Route, rng: &mut R) -> Route {
    let mut neighbor = route.clone();
    let (i, j) = two_interior_positions(route.num_interior(), rng);
    neighbor.swap(i, j);
    neighbor
}

/// `k` distinct interior positions of a route with `interior` of them.
///
/// Requires `k <= interior`.
pub fn sample_interior_positions<R: Rng>(interior: usize, k: usize, rng: &mut R) -> Vec<usize> {
    rand::seq::index::sample(rng, interior, k)
        .into_iter()
        .map(|p| p + 1)
        .collect()
}

/// Roulette-wheel draw proportional to `weights`.
///
/// Falls back to a uniform draw when the total weight is not finite and
/// positive. Requires a non-empty slice.
pub fn roulette<R: Rng>(weights: &[f64], rng: &mut R) -> usize {
    let total: f64 = weights.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        return rng.random_range(0..weights.len());
    }
    let target = rng.random::<f64>() * total;
    let mut acc = 0.0;
    for (i, w) in weights.iter().enumerate() {
        acc += w;
        if target < acc {
            return i;
        }
    }
    weights.len() - 1
}

/// Draws up to `k` distinct items from `items`, each draw proportional to
/// the remaining weights.
pub fn weighted_distinct<R: Rng>(items: &[usize], weights: &[f64], k: usize, rng: &mut R) -> Vec<usize> {
    let mut pool: Vec<(usize, f64)> = items.iter().copied().zip(weights.iter().copied()).collect();
    let mut picked = Vec::with_capacity(k.min(pool.len()));
    while picked.len() < k && !pool.is_empty() {
        let w: Vec<f64> = pool.iter().map(|p| p.1).collect();
        let idx = roulette(&w, rng);
        picked.push(pool.remove(idx).0);
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use u_numflow::random::create_rng;

    fn sample() -> DistanceMatrix {
        DistanceMatrix::from_rows(vec![
            vec![0.0, 10.0, 15.0, 20.0],
            vec![10.0, 0.0, 35.0, 25.0],
            vec![15.0, 35.0, 0.0, 30.0],
            vec![20.0, 25.0, 30.0, 0.0],
        ])
        .expect("valid")
    }

    #[test]
    fn test_random_tour_valid() {
        let mut rng = create_rng(42);
        for n in 1..10 {
            let tour = random_tour(n, &mut rng);
            assert!(tour.validate(n).is_ok());
            assert_eq!(tour.start(), 0);
        }
    }

    #[test]
    fn test_two_positions_distinct_and_interior() {
        let mut rng = create_rng(1);
        for _ in 0..500 {
            let (i, j) = two_interior_positions(2, &mut rng);
            assert_ne!(i, j);
            assert!((1..=2).contains(&i) && (1..=2).contains(&j));
        }
        for _ in 0..500 {
            let (i, j) = two_interior_positions(7, &mut rng);
            assert_ne!(i, j);
            assert!((1..=7).contains(&i) && (1..=7).contains(&j));
        }
    }

    #[test]
    fn test_swap_neighbor_keeps_endpoints() {
        let mut rng = create_rng(3);
        let route = Route::identity(6);
        for _ in 0..100 {
            let n = swap_neighbor(&route, &mut rng);
            assert_eq!(n.start(), 0);
            assert_eq!(n.cities()[6], 0);
            assert!(n.validate(6).is_ok());
            let moved = n.cities().iter().zip(route.cities()).filter(|(a, b)| a != b).count();
            assert_eq!(moved, 2);
        }
    }

    #[test]
    fn test_sample_interior_positions() {
        let mut rng = create_rng(5);
        let mut positions = sample_interior_positions(9, 4, &mut rng);
        assert_eq!(positions.len(), 4);
        positions.sort();
        positions.dedup();
        assert_eq!(positions.len(), 4);
        assert!(positions.iter().all(|p| (1..=9).contains(p)));
    }

    #[test]
    fn test_require_interior() {
        assert!(require_interior("test", 4, 3).is_ok());
        let err = require_interior("test", 4, 4).unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientCities {
                stage: "test",
                required: 4,
                available: 3
            }
        ));
    }

    #[test]
    fn test_roulette_uniform_fallback() {
        let mut rng = create_rng(9);
        let mut counts = [0usize; 3];
        for _ in 0..3000 {
            counts[roulette(&[0.0, 0.0, 0.0], &mut rng)] += 1;
        }
        assert!(counts.iter().all(|&c| c > 800));
    }

    #[test]
    fn test_roulette_respects_zero_weight() {
        let mut rng = create_rng(11);
        for _ in 0..1000 {
            assert_ne!(roulette(&[1.0, 0.0, 3.0], &mut rng), 1);
        }
    }

    #[test]
    fn test_weighted_distinct() {
        let mut rng = create_rng(13);
        let picked = weighted_distinct(&[4, 8, 15, 16], &[1.0, 0.5, 0.33, 0.25], 3, &mut rng);
        assert_eq!(picked.len(), 3);
        let mut sorted = picked.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 3);
        assert_eq!(weighted_distinct(&[1], &[1.0], 3, &mut rng), vec![1]);
    }

    #[test]
    fn test_candidate_offer_strict() {
        let dm = sample();
        let mut c = Candidate::new(Route::new(vec![0, 1, 3, 2, 0]), &dm);
        assert_eq!(c.distance, 80.0);
        // Reverse has the same length and is rejected.
        assert!(!c.offer(Route::new(vec![0, 2, 3, 1, 0]), &dm));
        assert!(!c.offer(Route::new(vec![0, 1, 2, 3, 0]), &dm));
        assert_eq!(c.route.cities(), &[0, 1, 3, 2, 0]);
    }

    #[test]
    fn test_rank_and_best() {
        let dm = sample();
        let pop = vec![
            Candidate::new(Route::new(vec![0, 1, 2, 3, 0]), &dm),
            Candidate::new(Route::new(vec![0, 1, 3, 2, 0]), &dm),
            Candidate::new(Route::new(vec![0, 2, 3, 1, 0]), &dm),
        ];
        assert_eq!(rank(&pop), vec![1, 2, 0]);
        assert_eq!(best_index(&pop), Some(1));
        assert_eq!(best_index(&[]), None);
    }

    #[test]
    fn test_rounding_noise_is_not_an_improvement() {
        let dm = DistanceMatrix::from_rows(vec![
            vec![0.0, 0.1, 0.3],
            vec![0.1, 0.0, 0.2],
            vec![0.3, 0.2, 0.0],
        ])
        .expect("valid");
        let mut c = Candidate::new(Route::new(vec![0, 1, 2, 0]), &dm);
        let reverse = Route::new(vec![0, 2, 1, 0]);
        let reverse_distance = dm.path_cost(reverse.cities());
        assert!(reverse_distance < c.distance);
        assert!(c.distance - reverse_distance < 1e-10);
        assert!(!c.offer(reverse, &dm));
        assert_eq!(c.route.cities(), &[0, 1, 2, 0]);

        assert!(!improves(1.0 - 1e-12, 1.0));
        assert!(improves(1.0 - 1e-9, 1.0));
    }

    #[test]
    fn test_fitness() {
        assert_eq!(fitness(0.0), 1.0);
        assert_eq!(fitness(3.0), 0.25);
    }
}
