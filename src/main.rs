use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use env_logger::{Builder, Env, Target};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use u_tsp::distance::DistanceMatrix;
use u_tsp::runner::{format_duration, run_all, MemoryProbe, RunConfig};
use u_tsp::Result;

/// Solve a traveling salesman instance with every solver in the crate.
#[derive(Debug, Parser)]
#[command(name = "u-tsp", version, about)]
struct Args {
    /// Size of the random symmetric instance to generate.
    #[arg(short = 'n', long, default_value_t = 12, conflicts_with = "matrix")]
    cities: usize,

    /// JSON file holding a square matrix as an array of rows.
    #[arg(short, long)]
    matrix: Option<PathBuf>,

    /// JSON file holding a run configuration; missing fields use defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base random seed; overrides the config file.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Run the stochastic solvers one after another.
    #[arg(long)]
    sequential: bool,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    json: bool,
}

/// Reads resident set size from `/proc/self/status`.
struct ProcStatusProbe;

impl MemoryProbe for ProcStatusProbe {
    fn measure_process_memory(&self) -> Option<u64> {
        let status = fs::read_to_string("/proc/self/status").ok()?;
        let line = status.lines().find(|l| l.starts_with("VmRSS:"))?;
        let kib: u64 = line.split_whitespace().nth(1)?.parse().ok()?;
        Some(kib * 1024)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    info!("reading {}", path.display());
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn init_logger() -> io::Result<()> {
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stderr)
        .format(|buf, record| writeln!(buf, "{:<5} {}", record.level(), record.args()))
        .try_init()
        .map_err(io::Error::other)
}

fn main() -> Result<()> {
    let now = Instant::now();
    let args = Args::parse();
    init_logger()?;

    let mut config: RunConfig = match &args.config {
        Some(path) => read_json(path)?,
        None => RunConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.sequential {
        config.concurrent = false;
    }

    let matrix = match &args.matrix {
        Some(path) => DistanceMatrix::from_rows(read_json(path)?)?,
        None => {
            let mut rng = match config.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            DistanceMatrix::random_symmetric(args.cities, 10, 50, &mut rng)?
        }
    };
    info!("input: n={} symmetric={}", matrix.size(), matrix.is_symmetric(1e-9));

    let report = run_all(&matrix, &config, &ProcStatusProbe)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }

    info!("output: time={}", format_duration(now.elapsed()));
    Ok(())
}
