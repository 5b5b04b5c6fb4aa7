//! Error type shared by every solver.

use thiserror::Error as ThisError;

/// Errors raised at solver entry or while building inputs.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The distance matrix is empty, not square, or holds a negative or
    /// non-finite entry.
    #[error("invalid matrix: {0}")]
    InvalidMatrix(String),
    /// A route does not describe a closed tour over the matrix's cities.
    #[error("invalid route: {0}")]
    InvalidRoute(String),
    /// A sampling step needs more distinct interior positions than exist.
    #[error("{stage}: needs {required} distinct interior positions, route has {available}")]
    InsufficientCities {
        /// Which step failed (e.g. `"hybrid perturbation"`).
        stage: &'static str,
        /// Positions the step samples.
        required: usize,
        /// Interior positions available (`N - 1`).
        available: usize,
    },
    /// The exact solver's state table cannot be addressed or allocated.
    #[error("held-karp state table for {cities} cities ({states} states) cannot be allocated")]
    ResourceExhaustion {
        /// Number of cities in the instance.
        cities: usize,
        /// Number of table entries requested, saturated on overflow.
        states: usize,
    },
    /// A solver parameter is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// The worker pool for concurrent solves could not be built.
    #[error("worker pool: {0}")]
    WorkerPool(String),
    /// Reading an input file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// A matrix, config, or report could not be read or written as JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_matrix(message: impl Into<String>) -> Self {
        Self::InvalidMatrix(message.into())
    }

    pub fn invalid_route(message: impl Into<String>) -> Self {
        Self::InvalidRoute(message.into())
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
