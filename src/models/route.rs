//! Closed tour type.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A closed tour over `N` cities: `N + 1` entries whose first and last are the
/// start city, with every other city appearing exactly once in between.
///
/// Positions `1..=N-1` are the interior; solvers only ever rearrange those, so
/// the length and endpoints of a route never change once it is built.
///
/// # Examples
///
/// ```
/// use u_tsp::models::Route;
///
/// let route = Route::closed(vec![2, 0, 1]);
/// assert_eq!(route.cities(), &[2, 0, 1, 2]);
/// assert_eq!(route.start(), 2);
/// assert_eq!(route.num_cities(), 3);
/// assert!(route.validate(3).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route {
    cities: Vec<usize>,
}

impl Route {
    /// Wraps an already-closed city sequence without checking it.
    pub fn new(cities: Vec<usize>) -> Self {
        Self { cities }
    }

    /// Closes an open visiting order by appending its first city.
    ///
    /// An empty order yields an empty route.
    pub fn closed(mut order: Vec<usize>) -> Self {
        if let Some(&first) = order.first() {
            order.push(first);
        }
        Self { cities: order }
    }

    /// The tour `0 → 1 → … → n-1 → 0`.
    pub fn identity(n: usize) -> Self {
        Self::closed((0..n).collect())
    }

    /// Returns the full closed sequence.
    pub fn cities(&self) -> &[usize] {
        &self.cities
    }

    /// Mutable access to the sequence. The slice form keeps the length fixed.
    pub fn cities_mut(&mut self) -> &mut [usize] {
        &mut self.cities
    }

    /// Consumes the route, returning the closed sequence.
    pub fn into_cities(self) -> Vec<usize> {
        self.cities
    }

    /// Number of entries, `N + 1`.
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    /// Returns `true` if the route has no entries.
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Number of distinct cities visited, `N`.
    pub fn num_cities(&self) -> usize {
        self.cities.len().saturating_sub(1)
    }

    /// Number of interior positions, `N - 1`.
    pub fn num_interior(&self) -> usize {
        self.cities.len().saturating_sub(2)
    }

    /// The start (and end) city.
    ///
    /// # Panics
    ///
    /// Panics on an empty route.
    pub fn start(&self) -> usize {
        self.cities[0]
    }

    /// Swaps the cities at two positions.
    pub fn swap(&mut self, i: usize, j: usize) {
        self.cities.swap(i, j);
    }

    /// Reverses the segment `i..=j`.
    pub fn reverse(&mut self, i: usize, j: usize) {
        self.cities[i..=j].reverse();
    }

    /// Checks that this route is a closed tour over `n` cities.
    pub fn validate(&self, n: usize) -> Result<()> {
        if self.cities.len() != n + 1 {
            return Err(Error::invalid_route(format!(
                "expected {} entries for {n} cities, got {}",
                n + 1,
                self.cities.len()
            )));
        }
        let first = self.cities[0];
        let last = self.cities[n];
        if first != last {
            return Err(Error::invalid_route(format!(
                "tour starts at {first} but ends at {last}"
            )));
        }
        let mut seen = vec![false; n];
        for &c in &self.cities[..n] {
            if c >= n {
                return Err(Error::invalid_route(format!(
                    "city {c} out of bounds for {n} cities"
                )));
            }
            if seen[c] {
                return Err(Error::invalid_route(format!("city {c} visited twice")));
            }
            seen[c] = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed() {
        let r = Route::closed(vec![0, 2, 1]);
        assert_eq!(r.cities(), &[0, 2, 1, 0]);
        assert_eq!(r.len(), 4);
        assert_eq!(r.num_cities(), 3);
        assert_eq!(r.num_interior(), 2);
    }

    #[test]
    fn test_closed_empty() {
        let r = Route::closed(vec![]);
        assert!(r.is_empty());
        assert_eq!(r.num_cities(), 0);
    }

    #[test]
    fn test_single_city() {
        let r = Route::identity(1);
        assert_eq!(r.cities(), &[0, 0]);
        assert!(r.validate(1).is_ok());
    }

    #[test]
    fn test_validate_wrong_length() {
        let r = Route::new(vec![0, 1, 0]);
        assert!(r.validate(3).is_err());
    }

    #[test]
    fn test_validate_open() {
        let r = Route::new(vec![0, 1, 2, 1]);
        let err = r.validate(3).unwrap_err();
        assert!(err.to_string().contains("ends at 1"));
    }

    #[test]
    fn test_validate_duplicate() {
        let r = Route::new(vec![0, 1, 1, 0]);
        assert!(r.validate(3).is_err());
    }

    #[test]
    fn test_validate_out_of_bounds() {
        let r = Route::new(vec![0, 5, 1, 0]);
        assert!(r.validate(3).is_err());
    }

    #[test]
    fn test_swap_and_reverse() {
        let mut r = Route::identity(5);
        r.swap(1, 3);
        assert_eq!(r.cities(), &[0, 3, 2, 1, 4, 0]);
        r.reverse(1, 4);
        assert_eq!(r.cities(), &[0, 4, 1, 2, 3, 0]);
        assert!(r.validate(5).is_ok());
    }
}
