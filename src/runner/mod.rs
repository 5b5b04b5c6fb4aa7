//! Run orchestration.
//!
//! [`run_all`] builds a construction seed, solves small instances exactly,
//! then runs the three stochastic solvers, concurrently on a dedicated
//! rayon pool or one after another.

use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::constructive::{dsd_seed, knn_with_two_opt};
use crate::distance::DistanceMatrix;
use crate::error::{Error, Result};
use crate::exact::solve_exact;
use crate::meta::{
    AnnealingConfig, BeeColony, BeeColonyConfig, HybridConfig, HybridSearch, HybridStats,
    SimulatedAnnealing,
};
use crate::models::{Algorithm, SolverResult};

/// Instances below this size are seeded by DSD instead of KNN + 2-opt.
pub const DSD_MAX_CITIES: usize = 10;

const TASK_SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;
const SOLVER_THREADS: usize = 3;

/// Everything [`run_all`] needs besides the matrix.
///
/// # Examples
///
/// ```
/// use u_tsp::runner::RunConfig;
///
/// let config: RunConfig = serde_json::from_str(r#"{ "seed": 7, "concurrent": false }"#).unwrap();
/// assert_eq!(config.seed, Some(7));
/// assert_eq!(config.exact_max_cities, 13);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Base seed; `None` draws every task's generator from the OS.
    pub seed: Option<u64>,
    /// The exact solver runs only for instances up to this size.
    pub exact_max_cities: usize,
    /// Run the stochastic solvers on a thread pool.
    pub concurrent: bool,
    /// Simulated annealing schedule.
    pub annealing: AnnealingConfig,
    /// Bee colony parameters.
    pub bee_colony: BeeColonyConfig,
    /// Hybrid search parameters.
    pub hybrid: HybridConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: None,
            exact_max_cities: 13,
            concurrent: true,
            annealing: AnnealingConfig::default(),
            bee_colony: BeeColonyConfig::default(),
            hybrid: HybridConfig::default(),
        }
    }
}

impl RunConfig {
    /// Makes the run reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Chooses between the thread pool and sequential solves.
    pub fn with_concurrent(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    /// Sets the largest instance handed to the exact solver.
    pub fn with_exact_max_cities(mut self, n: usize) -> Self {
        self.exact_max_cities = n;
        self
    }

    /// Validates every solver config.
    pub fn validate(&self) -> Result<()> {
        self.annealing.validate()?;
        self.bee_colony.validate()?;
        self.hybrid.validate()
    }

    /// Generator for task `k`.
    fn task_rng(&self, k: u64) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(k.wrapping_mul(TASK_SEED_STRIDE))),
            None => StdRng::from_os_rng(),
        }
    }
}

/// Process memory sampler called around each solve.
pub trait MemoryProbe: Sync {
    /// Current process memory in bytes, if it can be measured.
    fn measure_process_memory(&self) -> Option<u64>;
}

/// Probe that never measures anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMemoryProbe;

impl MemoryProbe for NoMemoryProbe {
    fn measure_process_memory(&self) -> Option<u64> {
        None
    }
}

fn measured<P, F>(probe: &P, solve: F) -> Result<SolverResult>
where
    P: MemoryProbe + ?Sized,
    F: FnOnce() -> Result<SolverResult>,
{
    let before = probe.measure_process_memory();
    let result = solve()?;
    let after = probe.measure_process_memory();
    let delta = match (before, after) {
        (Some(b), Some(a)) => Some(a as i64 - b as i64),
        _ => None,
    };
    Ok(result.with_memory_delta(delta))
}

/// Results of one [`run_all`] invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub cities: usize,
    /// DSD or KNN + 2-opt seed, also the annealing start.
    pub construction: SolverResult,
    /// Present when the instance was small enough to solve exactly.
    pub exact: Option<SolverResult>,
    pub annealing: SolverResult,
    pub bee_colony: SolverResult,
    pub hybrid: SolverResult,
    pub hybrid_stats: HybridStats,
}

impl RunReport {
    /// All results in report order.
    pub fn results(&self) -> impl Iterator<Item = &SolverResult> {
        std::iter::once(&self.construction)
            .chain(self.exact.as_ref())
            .chain([&self.annealing, &self.bee_colony, &self.hybrid])
    }

    /// Shortest result; ties go to the earliest in report order.
    pub fn best(&self) -> &SolverResult {
        let mut best = &self.construction;
        for r in self.results() {
            if r.distance < best.distance {
                best = r;
            }
        }
        best
    }
}

/// Formats a duration as `Xm Y.YYs`.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    let minutes = (secs / 60.0).floor();
    format!("{}m {:.2}s", minutes as u64, secs - minutes * 60.0)
}

fn format_route(r: &SolverResult) -> String {
    r.route
        .cities()
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} cities", self.cities)?;
        for r in self.results() {
            writeln!(f)?;
            writeln!(f, "[{}]", r.algorithm)?;
            writeln!(f, "  route:          {}", format_route(r))?;
            writeln!(f, "  distance:       {}", r.distance)?;
            writeln!(f, "  best iteration: {}", r.best_iteration)?;
            if let Some(t) = r.best_time() {
                writeln!(f, "  best time:      {}", format_duration(t))?;
            }
            writeln!(f, "  total time:     {}", format_duration(r.elapsed))?;
            match r.memory_delta {
                Some(m) => writeln!(f, "  memory delta:   {m} bytes")?,
                None => writeln!(f, "  memory delta:   n/a")?,
            }
        }
        if self.hybrid_stats.polishes > 0 {
            writeln!(
                f,
                "\n[{}] stagnation {} polishes {} ({} improved)",
                Algorithm::Hybrid,
                self.hybrid_stats.stagnation,
                self.hybrid_stats.polishes,
                self.hybrid_stats.polish_improvements
            )?;
        }
        let best = self.best();
        write!(f, "\nbest: {} at {}", best.algorithm, best.distance)
    }
}

/// Construction seed: DSD for very small instances, KNN + 2-opt otherwise.
pub fn construction_seed(matrix: &DistanceMatrix) -> SolverResult {
    let started = Instant::now();
    let (algorithm, (route, distance)) = if matrix.size() < DSD_MAX_CITIES {
        (Algorithm::Dsd, dsd_seed(matrix))
    } else {
        (Algorithm::NearestNeighbor, knn_with_two_opt(matrix))
    };
    SolverResult::single_shot(algorithm, route, distance, started.elapsed())
}

/// Runs every solver on `matrix`.
///
/// The first error from any solver is returned.
pub fn run_all<P>(matrix: &DistanceMatrix, config: &RunConfig, probe: &P) -> Result<RunReport>
where
    P: MemoryProbe + ?Sized,
{
    config.validate()?;
    let n = matrix.size();
    info!(
        "run: start n={n} seed={:?} concurrent={}",
        config.seed, config.concurrent
    );

    let construction = measured(probe, || Ok(construction_seed(matrix)))?;
    debug!(
        "run: {} seed distance={}",
        construction.algorithm, construction.distance
    );

    let exact = if n <= config.exact_max_cities {
        Some(measured(probe, || solve_exact(matrix))?)
    } else {
        info!("run: skipping exact solver, {n} > {}", config.exact_max_cities);
        None
    };

    let seed_route = &construction.route;
    let annealing = || {
        let mut rng = config.task_rng(0);
        measured(probe, || {
            SimulatedAnnealing::new(config.annealing.clone()).solve(matrix, seed_route, &mut rng)
        })
    };
    let bee_colony = || {
        let mut rng = config.task_rng(1);
        measured(probe, || {
            BeeColony::new(config.bee_colony.clone()).solve(matrix, &mut rng)
        })
    };
    let hybrid = || -> Result<(SolverResult, HybridStats)> {
        let mut rng = config.task_rng(2);
        let mut stats = HybridStats::default();
        let result = measured(probe, || {
            let (result, s) =
                HybridSearch::new(config.hybrid.clone()).solve_with_stats(matrix, &mut rng)?;
            stats = s;
            Ok(result)
        })?;
        Ok((result, stats))
    };

    let (annealing, (bee_colony, hybrid)) = if config.concurrent {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(SOLVER_THREADS)
            .build()
            .map_err(|e| Error::WorkerPool(format!("rayon pool: {e}")))?;
        pool.install(|| rayon::join(annealing, || rayon::join(bee_colony, hybrid)))
    } else {
        (annealing(), (bee_colony(), hybrid()))
    };
    let (hybrid, hybrid_stats) = hybrid?;

    let report = RunReport {
        cities: n,
        construction,
        exact,
        annealing: annealing?,
        bee_colony: bee_colony?,
        hybrid,
        hybrid_stats,
    };
    let best = report.best();
    info!("run: complete best={} distance={}", best.algorithm, best.distance);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn classic() -> DistanceMatrix {
        DistanceMatrix::from_rows(vec![
            vec![0.0, 10.0, 15.0, 20.0],
            vec![10.0, 0.0, 35.0, 25.0],
            vec![15.0, 35.0, 0.0, 30.0],
            vec![20.0, 25.0, 30.0, 0.0],
        ])
        .expect("valid")
    }

    fn quick(seed: u64) -> RunConfig {
        let mut config = RunConfig::default().with_seed(seed);
        config.bee_colony = BeeColonyConfig::default()
            .with_colony_size(10)
            .with_max_iterations(100);
        config.hybrid = HybridConfig::default()
            .with_colony_size(10)
            .with_max_iterations(100);
        config
    }

    struct CountingProbe(AtomicU64);

    impl MemoryProbe for CountingProbe {
        fn measure_process_memory(&self) -> Option<u64> {
            Some(self.0.fetch_add(8, Ordering::SeqCst))
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(1500)), "0m 1.50s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5.00s");
        assert_eq!(format_duration(Duration::ZERO), "0m 0.00s");
    }

    #[test]
    fn test_task_rng_reproducible() {
        use rand::Rng;
        let config = RunConfig::default().with_seed(99);
        let a: u64 = config.task_rng(1).random();
        let b: u64 = config.task_rng(1).random();
        let c: u64 = config.task_rng(2).random();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_run_all_classic() {
        let dm = classic();
        let report = run_all(&dm, &quick(42), &NoMemoryProbe).expect("runs");
        assert_eq!(report.cities, 4);
        assert_eq!(report.construction.algorithm, Algorithm::Dsd);
        assert_eq!(report.exact.as_ref().map(|r| r.distance), Some(80.0));
        assert_eq!(report.best().distance, 80.0);
        for r in report.results() {
            assert!(r.route.validate(4).is_ok());
            assert!(r.distance >= 80.0);
            assert!(r.memory_delta.is_none());
        }
        assert_eq!(report.results().count(), 5);
    }

    #[test]
    fn test_sequential_matches_concurrent() {
        let dm = DistanceMatrix::random_symmetric(11, 10, 50, &mut StdRng::seed_from_u64(5))
            .expect("valid");
        let concurrent = run_all(&dm, &quick(7), &NoMemoryProbe).expect("runs");
        let sequential =
            run_all(&dm, &quick(7).with_concurrent(false), &NoMemoryProbe).expect("runs");
        assert_eq!(concurrent.construction.algorithm, Algorithm::NearestNeighbor);
        assert_eq!(concurrent.annealing.route, sequential.annealing.route);
        assert_eq!(concurrent.bee_colony.route, sequential.bee_colony.route);
        assert_eq!(concurrent.hybrid.route, sequential.hybrid.route);
        assert_eq!(concurrent.hybrid_stats, sequential.hybrid_stats);
    }

    #[test]
    fn test_exact_skipped_above_limit() {
        let dm = classic();
        let config = quick(1).with_exact_max_cities(3);
        let report = run_all(&dm, &config, &NoMemoryProbe).expect("runs");
        assert!(report.exact.is_none());
        assert_eq!(report.results().count(), 4);
    }

    #[test]
    fn test_memory_probe_deltas() {
        let dm = classic();
        let probe = CountingProbe(AtomicU64::new(0));
        let report = run_all(&dm, &quick(3).with_concurrent(false), &probe).expect("runs");
        for r in report.results() {
            assert_eq!(r.memory_delta, Some(8));
        }
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let dm = classic();
        let mut config = quick(1);
        config.hybrid = config.hybrid.with_cull_probability(2.0);
        assert!(matches!(
            run_all(&dm, &config, &NoMemoryProbe),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_display_and_json() {
        let dm = classic();
        let report = run_all(&dm, &quick(11), &NoMemoryProbe).expect("runs");
        let text = report.to_string();
        for label in ["[DSD]", "[DP]", "[SA]", "[ABC]", "[HM]", "total time:     0m "] {
            assert!(text.contains(label), "missing {label} in\n{text}");
        }
        let json = serde_json::to_string(&report).expect("serializes");
        let back: RunReport = serde_json::from_str(&json).expect("parses");
        assert_eq!(back.hybrid.route, report.hybrid.route);
    }
}
