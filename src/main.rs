//! TSP Local Search - Command Line Interface
//!
//! Nearest neighbor and multi-start 2-opt for Euclidean TSP instances.

use clap::{Parser, Subcommand};
use tsp_localsearch::benchmark::{Benchmark, BenchmarkConfig};
use tsp_localsearch::instance::TspInstance;
use tsp_localsearch::solver::{Solver, SolverConfig, Strategy};

use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "tsp-localsearch")]
#[command(author = "M2 AI2D Student")]
#[command(version = "1.0")]
#[command(about = "Approximate TSP tours with nearest neighbor and multi-start 2-opt")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Solve {
        /// TSP-LIB (.tsp) or CSV (.csv, y,x rows) instance
        #[arg(short, long)]
        instance: PathBuf,

        /// JSON solver configuration; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,

        /// Strategy to use
        #[arg(long, value_enum)]
        strategy: Option<Strategy>,

        /// Number of random restarts for multi-start
        #[arg(short = 'k', long)]
        iterations: Option<usize>,

        /// Random seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Run multi-start trials in parallel
        #[arg(long)]
        parallel: bool,

        /// First node of the nearest neighbor tour
        #[arg(long)]
        start: Option<usize>,

        /// Output solution to file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Analyze an instance
    Analyze {
        /// Path to the instance file
        #[arg(short, long)]
        instance: PathBuf,
    },

    /// Compare algorithms on an instance
    Compare {
        /// Path to the instance file
        #[arg(short, long)]
        instance: PathBuf,

        /// Number of runs
        #[arg(short, long, default_value = "10")]
        runs: usize,

        /// Restarts per multi-start run
        #[arg(short = 'k', long, default_value = "10")]
        iterations: usize,

        /// Run multi-start trials in parallel
        #[arg(long)]
        parallel: bool,

        /// Output CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Solve { instance, config, strategy, iterations, seed, parallel, start, output, verbose } => {
            solve_instance(&instance, config, strategy, iterations, seed, parallel, start, output, verbose)
        }

        Commands::Analyze { instance } => analyze_instance(&instance),

        Commands::Compare { instance, runs, iterations, parallel, output } => {
            compare_algorithms(&instance, runs, iterations, parallel, output)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_instance(path: &Path) -> tsp_localsearch::Result<TspInstance> {
    println!("Loading instance from {:?}...", path);
    TspInstance::from_file(path)
}

#[allow(clippy::too_many_arguments)]
fn solve_instance(
    path: &Path,
    config_path: Option<PathBuf>,
    strategy: Option<Strategy>,
    iterations: Option<usize>,
    seed: Option<u64>,
    parallel: bool,
    start: Option<usize>,
    output: Option<PathBuf>,
    verbose: bool,
) -> tsp_localsearch::Result<()> {
    let instance = load_instance(path)?;

    let mut config = match config_path {
        Some(config_path) => SolverConfig::from_json_file(config_path)?,
        None => SolverConfig::default(),
    };
    if let Some(strategy) = strategy {
        config.strategy = strategy;
    }
    if let Some(iterations) = iterations {
        config.iterations = iterations;
    }
    if let Some(seed) = seed {
        config.seed = seed;
    }
    if let Some(start) = start {
        config.start = start;
    }
    config.parallel |= parallel;

    if verbose {
        println!("{}", instance.statistics());
        println!("Configuration: {:?}", config);
    }

    println!("Solving with {:?} strategy...", config.strategy);
    let started = Instant::now();

    let solver = Solver::new(config);
    let solution = solver.solve_instance_with_report(&instance, |z, _| {
        if verbose {
            println!("  improved: {:.4}", z);
        }
    })?;

    let elapsed = started.elapsed();

    println!("\n========== Results ==========");
    println!("Algorithm: {}", solution.algorithm);
    println!("Length: {:.4}", solution.cost);
    println!("Time: {:.4}s", elapsed.as_secs_f64());
    if let Some(iter) = solution.iterations {
        println!("Iterations: {}", iter);
    }

    if verbose {
        println!("\nTour: {:?}", solution.tour);
    }

    if let Some(out_path) = output {
        let json = serde_json::to_string_pretty(&solution)?;
        std::fs::write(&out_path, json)?;
        println!("\nSolution saved to {:?}", out_path);
    }

    Ok(())
}

fn analyze_instance(path: &Path) -> tsp_localsearch::Result<()> {
    let instance = load_instance(path)?;
    println!("{}", instance.statistics());
    Ok(())
}

fn compare_algorithms(
    path: &Path,
    runs: usize,
    iterations: usize,
    parallel: bool,
    output: Option<PathBuf>,
) -> tsp_localsearch::Result<()> {
    let instance = load_instance(path)?;

    let mut benchmark = Benchmark::new(BenchmarkConfig {
        num_runs: runs,
        multistart_iterations: iterations,
        parallel,
    });

    println!("Running {} runs on {} (n={})...", runs, instance.name, instance.dimension);
    benchmark.run_on_instance(&instance)?;

    println!("\n{}", benchmark.generate_report());

    if let Some(out_path) = output {
        benchmark.export_to_csv(&out_path)?;
        println!("Results exported to {:?}", out_path);
    }

    Ok(())
}
