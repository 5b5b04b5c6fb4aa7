//! Time-indexed progress record.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One progress sample: wall time since the solve began and a distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceSample {
    /// Time elapsed since the solver started.
    pub elapsed: Duration,
    /// Best or current distance at that moment, depending on the solver.
    pub distance: f64,
}

/// Append-only sequence of [`TraceSample`]s, one per algorithmic step.
///
/// Sample 0 is the initial state; sample `t` is recorded after step `t`.
/// Solvers only write to a trace, never read it back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    samples: Vec<TraceSample>,
}

impl Trace {
    /// Creates an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty trace with room for `capacity` samples.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    /// Appends a sample.
    pub fn push(&mut self, elapsed: Duration, distance: f64) {
        self.samples.push(TraceSample { elapsed, distance });
    }

    /// All samples in recording order.
    pub fn samples(&self) -> &[TraceSample] {
        &self.samples
    }

    /// Sample at index `i`.
    pub fn get(&self, i: usize) -> Option<&TraceSample> {
        self.samples.get(i)
    }

    /// Most recent sample.
    pub fn last(&self) -> Option<&TraceSample> {
        self.samples.last()
    }

    /// Earliest sample with the lowest distance.
    ///
    /// This is the best-effort answer for a caller that stops waiting on a
    /// solve before it finishes.
    pub fn best(&self) -> Option<&TraceSample> {
        self.samples.iter().fold(None, |acc: Option<&TraceSample>, s| match acc {
            Some(b) if b.distance <= s.distance => Some(b),
            _ => Some(s),
        })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns `true` if distances never increase from one sample to the next.
    pub fn is_non_increasing(&self) -> bool {
        self.samples.windows(2).all(|w| w[1].distance <= w[0].distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_empty() {
        let t = Trace::new();
        assert!(t.is_empty());
        assert!(t.best().is_none());
        assert!(t.last().is_none());
        assert!(t.is_non_increasing());
    }

    #[test]
    fn test_best_is_earliest_minimum() {
        let mut t = Trace::new();
        t.push(ms(0), 10.0);
        t.push(ms(1), 7.0);
        t.push(ms(2), 9.0);
        t.push(ms(3), 7.0);
        let best = t.best().expect("non-empty");
        assert_eq!(best.elapsed, ms(1));
        assert_eq!(best.distance, 7.0);
        assert!(!t.is_non_increasing());
        assert_eq!(t.last().map(|s| s.distance), Some(7.0));
    }

    #[test]
    fn test_non_increasing() {
        let mut t = Trace::with_capacity(3);
        t.push(ms(0), 5.0);
        t.push(ms(1), 5.0);
        t.push(ms(2), 4.0);
        assert!(t.is_non_increasing());
        assert_eq!(t.len(), 3);
        assert_eq!(t.get(2).map(|s| s.distance), Some(4.0));
    }
}
