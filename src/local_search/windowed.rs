//! Windowed first-improvement 2-opt.
//!
//! For each position `i`, only the next `window - 1` positions are tried as
//! the segment end `j`. The move removes edges `(a, b) = (r[i-1], r[i])` and
//! `(c, d) = (r[j], r[j+1])` and reverses `r[i..=j]`:
//!
//! ```text
//! delta = d(a, c) + d(b, d) - d(a, b) - d(c, d) + inner
//! ```
//!
//! where `inner` is the cost change from traversing the segment backwards.
//! `inner` is zero on symmetric matrices, so the delta reduces to the
//! classic four-edge formula there.
//!
//! The first improving move is applied and the scan restarts. The search
//! stops after `max_moves` accepted moves or a full scan with none.

use crate::distance::DistanceMatrix;
use crate::models::Route;

use super::IMPROVEMENT_EPS;

/// Bounds for [`windowed_two_opt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowedTwoOpt {
    /// Maximum span `j - i + 1` of a reversed segment.
    pub window: usize,
    /// Maximum number of accepted moves.
    pub max_moves: usize,
}

impl Default for WindowedTwoOpt {
    fn default() -> Self {
        Self {
            window: 20,
            max_moves: 100,
        }
    }
}

/// Change in tour length from reversing `route[i..=j]`.
///
/// Requires `1 <= i < j <= len - 2`.
pub fn reversal_delta(route: &[usize], distances: &DistanceMatrix, i: usize, j: usize) -> f64 {
    let (a, b) = (route[i - 1], route[i]);
    let (c, d) = (route[j], route[j + 1]);
    let edges = distances.get(a, c) + distances.get(b, d) - distances.get(a, b) - distances.get(c, d);
    let inner: f64 = route[i..=j]
        .windows(2)
        .map(|w| distances.get(w[1], w[0]) - distances.get(w[0], w[1]))
        .sum();
    edges + inner
}

/// Applies windowed first-improvement 2-opt in place.
///
/// Returns the new tour distance, which is never larger than the input's.
/// The result is only locally optimal with respect to the scanned window.
///
/// # Examples
///
/// ```
/// use u_tsp::distance::DistanceMatrix;
/// use u_tsp::local_search::{windowed_two_opt, WindowedTwoOpt};
/// use u_tsp::models::Route;
///
/// let mut data = Vec::new();
/// for i in 0..5 {
///     for j in 0..5 {
///         data.push((i as f64 - j as f64).abs());
///     }
/// }
/// let dm = DistanceMatrix::from_data(5, data).unwrap();
///
/// let mut route = Route::new(vec![0, 3, 2, 1, 4, 0]);
/// let dist = windowed_two_opt(&mut route, &dm, WindowedTwoOpt::default());
/// assert_eq!(route.cities(), &[0, 1, 2, 3, 4, 0]);
/// assert_eq!(dist, 8.0);
/// ```
pub fn windowed_two_opt(route: &mut Route, distances: &DistanceMatrix, opts: WindowedTwoOpt) -> f64 {
    let len = route.len();
    if len < 4 {
        return distances.path_cost(route.cities());
    }

    for _ in 0..opts.max_moves {
        let mut applied = false;
        'scan: for i in 1..len - 2 {
            let end = (i + opts.window).min(len - 1);
            for j in i + 1..end {
                let delta = reversal_delta(route.cities(), distances, i, j);
                if delta < -IMPROVEMENT_EPS {
                    route.reverse(i, j);
                    applied = true;
                    break 'scan;
                }
            }
        }
        if !applied {
            break;
        }
    }

    distances.path_cost(route.cities())
}
