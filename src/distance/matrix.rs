//! Dense distance matrix.

use rand::Rng;

use crate::error::{Error, Result};
use crate::models::Route;

/// A dense n×n distance matrix stored in row-major order.
///
/// Entries are finite and nonnegative. The diagonal is expected to be zero
/// but is not checked, and the matrix need not be symmetric.
///
/// # Examples
///
/// ```
/// use u_tsp::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 5.0, 8.0],
///     vec![5.0, 0.0, 4.0],
///     vec![8.0, 4.0, 0.0],
/// ])
/// .unwrap();
/// assert_eq!(dm.get(0, 1), 5.0);
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a distance matrix from an explicit n×n grid in row-major order.
    ///
    /// Fails with [`Error::InvalidMatrix`] if the grid is empty, if the data
    /// length doesn't match `size * size`, or if any entry is negative or
    /// not finite.
    pub fn from_data(size: usize, data: Vec<f64>) -> Result<Self> {
        if size == 0 {
            return Err(Error::invalid_matrix("matrix has no cities"));
        }
        if data.len() != size * size {
            return Err(Error::invalid_matrix(format!(
                "expected {} entries for a {size}x{size} matrix, got {}",
                size * size,
                data.len()
            )));
        }
        if let Some(pos) = data.iter().position(|d| !d.is_finite() || *d < 0.0) {
            return Err(Error::invalid_matrix(format!(
                "entry ({}, {}) = {} is negative or not finite",
                pos / size,
                pos % size,
                data[pos]
            )));
        }
        Ok(Self { data, size })
    }

    /// Creates a distance matrix from nested rows.
    ///
    /// Every row must have exactly as many entries as there are rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let size = rows.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != size) {
            return Err(Error::invalid_matrix(format!(
                "row {i} has {} entries, expected {size}",
                row.len()
            )));
        }
        Self::from_data(size, rows.into_iter().flatten().collect())
    }

    /// Generates a symmetric matrix with zero diagonal and integer-valued
    /// off-diagonal costs drawn uniformly from `low..=high`.
    pub fn random_symmetric<R: Rng>(size: usize, low: u32, high: u32, rng: &mut R) -> Result<Self> {
        if low > high {
            return Err(Error::invalid_matrix(format!(
                "empty cost range {low}..={high}"
            )));
        }
        let mut data = vec![0.0; size * size];
        for i in 0..size {
            for j in (i + 1)..size {
                let d = f64::from(rng.random_range(low..=high));
                data[i * size + j] = d;
                data[j * size + i] = d;
            }
        }
        Self::from_data(size, data)
    }

    /// Returns the distance from city `from` to city `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Number of cities in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Returns the nearest city to `from` among the given candidates.
    ///
    /// Ties go to the first minimal candidate in slice order. Returns `None`
    /// if `candidates` is empty.
    pub fn nearest_neighbor(&self, from: usize, candidates: &[usize]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for &c in candidates {
            let d = self.get(from, c);
            match best {
                Some((_, bd)) if d >= bd => {}
                _ => best = Some((c, d)),
            }
        }
        best.map(|(c, _)| c)
    }

    /// Sums consecutive lookups along a city sequence.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds. Use [`total_distance`] for
    /// untrusted input.
    pub fn path_cost(&self, cities: &[usize]) -> f64 {
        cities.windows(2).map(|w| self.get(w[0], w[1])).sum()
    }
}

/// Computes the total distance of a route: `Σ d(route[k], route[k+1])`.
///
/// Fails with [`Error::InvalidRoute`] if any city index is out of bounds.
///
/// # Examples
///
/// ```
/// use u_tsp::distance::{total_distance, DistanceMatrix};
/// use u_tsp::models::Route;
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 10.0, 15.0],
///     vec![10.0, 0.0, 35.0],
///     vec![15.0, 35.0, 0.0],
/// ])
/// .unwrap();
/// let route = Route::new(vec![0, 1, 2, 0]);
/// assert_eq!(total_distance(&route, &dm).unwrap(), 60.0);
/// ```
pub fn total_distance(route: &Route, matrix: &DistanceMatrix) -> Result<f64> {
    if let Some(&bad) = route.cities().iter().find(|&&c| c >= matrix.size()) {
        return Err(Error::invalid_route(format!(
            "city {bad} out of bounds for {} cities",
            matrix.size()
        )));
    }
    Ok(matrix.path_cost(route.cities()))
}
