//! Held–Karp subset dynamic programming.
//!
//! # Algorithm
//!
//! With city 0 as the fixed start, let `f(c, R)` be the cheapest way to leave
//! city `c`, visit every city in `R` exactly once, and return to the start:
//!
//! ```text
//! f(c, ∅) = d(c, start)
//! f(c, R) = min over x in R of d(c, x) + f(x, R \ {x})
//! ```
//!
//! The answer is `f(start, all \ {start})`. `R` is a bitmask over the `n - 1`
//! non-start cities, so the table holds `n · 2ⁿ⁻¹` entries. Because
//! `R \ {x} < R` numerically, filling masks in ascending order visits every
//! dependency first. No recursion is involved.
//!
//! # Complexity
//!
//! O(n²·2ⁿ) time and O(n·2ⁿ) space. Practical only up to roughly 18 cities;
//! bounding `n` is the caller's job.
//!
//! # Reference
//!
//! Held, M. & Karp, R.M. (1962). "A dynamic programming approach to
//! sequencing problems", *Journal of SIAM* 10(1), 196-210.

use std::time::Instant;

use log::{debug, info};

use crate::distance::DistanceMatrix;
use crate::error::{Error, Result};
use crate::models::{Algorithm, Route, SolverResult};

const START: usize = 0;

/// Bit for non-start city `c` (`c >= 1`).
#[inline]
fn bit(c: usize) -> usize {
    1 << (c - 1)
}

/// Solves the instance exactly, returning the optimal tour and its distance.
///
/// Ties between equally good next cities go to the lowest index, so the
/// result is deterministic.
///
/// Fails with [`Error::ResourceExhaustion`] if the state table cannot be
/// addressed or allocated. The solver never returns a truncated answer.
///
/// # Examples
///
/// ```
/// use u_tsp::distance::DistanceMatrix;
/// use u_tsp::exact::held_karp;
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 10.0, 15.0, 20.0],
///     vec![10.0, 0.0, 35.0, 25.0],
///     vec![15.0, 35.0, 0.0, 30.0],
///     vec![20.0, 25.0, 30.0, 0.0],
/// ])
/// .unwrap();
///
/// let (route, dist) = held_karp(&dm).unwrap();
/// assert_eq!(route.cities(), &[0, 1, 3, 2, 0]);
/// assert_eq!(dist, 80.0);
/// ```
pub fn held_karp(distances: &DistanceMatrix) -> Result<(Route, f64)> {
    let n = distances.size();
    let others = n - 1;

    let exhausted = |states: usize| Error::ResourceExhaustion { cities: n, states };
    let masks = u32::try_from(others)
        .ok()
        .and_then(|s| 1usize.checked_shl(s))
        .ok_or_else(|| exhausted(usize::MAX))?;
    let states = masks.checked_mul(n).ok_or_else(|| exhausted(usize::MAX))?;

    let mut cost: Vec<f64> = Vec::new();
    cost.try_reserve_exact(states).map_err(|_| exhausted(states))?;
    cost.resize(states, f64::INFINITY);
    let mut next: Vec<u32> = Vec::new();
    next.try_reserve_exact(states).map_err(|_| exhausted(states))?;
    next.resize(states, 0);

    debug!("held-karp: {n} cities, {states} states");

    for c in 0..n {
        cost[c] = distances.get(c, START);
    }

    for mask in 1..masks {
        let row = mask * n;
        for c in 0..n {
            if c != START && mask & bit(c) != 0 {
                continue;
            }
            let mut best = f64::INFINITY;
            let mut choice = 0u32;
            for x in 1..n {
                let b = bit(x);
                if mask & b == 0 {
                    continue;
                }
                let d = distances.get(c, x) + cost[(mask ^ b) * n + x];
                if d < best {
                    best = d;
                    choice = x as u32;
                }
            }
            cost[row + c] = best;
            next[row + c] = choice;
        }
    }

    let full = masks - 1;
    debug!("held-karp: table optimum {}", cost[full * n + START]);

    let mut order = Vec::with_capacity(n + 1);
    order.push(START);
    let (mut c, mut mask) = (START, full);
    while mask != 0 {
        let x = next[mask * n + c] as usize;
        order.push(x);
        mask ^= bit(x);
        c = x;
    }
    order.push(START);

    // Reported through `path_cost`, like every other solver.
    let dist = distances.path_cost(&order);
    Ok((Route::new(order), dist))
}

/// Runs [`held_karp`] and wraps the answer in a timed [`SolverResult`].
pub fn solve_exact(distances: &DistanceMatrix) -> Result<SolverResult> {
    let start = Instant::now();
    info!("held-karp: solving {} cities", distances.size());
    let (route, dist) = held_karp(distances)?;
    let elapsed = start.elapsed();
    info!("held-karp: distance={dist} time={:.2}ms", elapsed.as_secs_f64() * 1e3);
    Ok(SolverResult::single_shot(
        Algorithm::HeldKarp,
        route,
        dist,
        elapsed,
    ))
}
