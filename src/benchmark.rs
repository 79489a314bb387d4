//! Benchmarking module.
//!
//! Runs the constructors and local searches over several seeds, collects
//! statistics and exports them as CSV or a text report.

use crate::error::Result;
use crate::heuristics::construction::*;
use crate::heuristics::local_search::*;
use crate::heuristics::multistart::{MultiStartConfig, MultiStartLocalSearch};
use crate::instance::TspInstance;
use crate::solution::Solution;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Result of running a single algorithm on an instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmResult {
    /// Algorithm name
    pub algorithm: String,
    /// Instance name
    pub instance: String,
    /// Instance dimension
    pub dimension: usize,
    /// Seed of the run
    pub seed: u64,
    /// Tour length
    pub cost: f64,
    /// Computation time in seconds
    pub time: f64,
    /// Number of iterations (if applicable)
    pub iterations: Option<usize>,
    /// Gap to best known in percent (if available)
    pub gap_to_best: Option<f64>,
}

/// Aggregated statistics for an algorithm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmStatistics {
    pub algorithm: String,
    pub num_runs: usize,
    pub avg_cost: f64,
    pub best_cost: f64,
    pub worst_cost: f64,
    pub std_cost: f64,
    pub avg_time: f64,
    pub total_time: f64,
    pub avg_gap: Option<f64>,
}

/// Benchmark configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Number of seeds per algorithm
    pub num_runs: usize,
    /// Restarts per multi-start run
    pub multistart_iterations: usize,
    /// Run multi-start trials in parallel
    pub parallel: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            num_runs: 5,
            multistart_iterations: 10,
            parallel: false,
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<AlgorithmResult>,
    best_known: HashMap<String, f64>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
            best_known: HashMap::new(),
        }
    }

    /// Set best known tour length for an instance
    pub fn set_best_known(&mut self, instance_name: &str, cost: f64) {
        self.best_known.insert(instance_name.to_string(), cost);
    }

    /// Run every algorithm `num_runs` times on an instance
    pub fn run_on_instance(&mut self, instance: &TspInstance) -> Result<()> {
        log::info!("Running benchmark on instance: {}", instance.name);

        for run in 0..self.config.num_runs {
            let seed = run as u64;

            let nn = NearestNeighborHeuristic::from_start(run % instance.dimension);
            let constructed = nn.construct(instance);
            self.record_result(instance, seed, &constructed);

            let mut improved = constructed;
            let start = std::time::Instant::now();
            TwoOptSearch::new().improve(instance, &mut improved);
            improved.computation_time += start.elapsed().as_secs_f64();
            improved.algorithm = "NearestNeighbor+2Opt".to_string();
            self.record_result(instance, seed, &improved);

            let mut random = RandomTourHeuristic::with_seed(seed).construct(instance);
            let start = std::time::Instant::now();
            TwoOptSearch::new().improve(instance, &mut random);
            random.computation_time += start.elapsed().as_secs_f64();
            random.algorithm = "RandomTour+2Opt".to_string();
            self.record_result(instance, seed, &random);

            let driver = MultiStartLocalSearch::new(MultiStartConfig {
                iterations: self.config.multistart_iterations,
                seed,
                parallel: self.config.parallel,
            });
            let multi = driver.run(instance.distances())?;
            self.record_result(instance, seed, &multi);
        }

        Ok(())
    }

    /// Record a result
    fn record_result(&mut self, instance: &TspInstance, seed: u64, solution: &Solution) {
        let gap_to_best = self
            .best_known
            .get(&instance.name)
            .map(|&best| (solution.cost - best) / best * 100.0);

        self.results.push(AlgorithmResult {
            algorithm: solution.algorithm.clone(),
            instance: instance.name.clone(),
            dimension: instance.dimension,
            seed,
            cost: solution.cost,
            time: solution.computation_time,
            iterations: solution.iterations,
            gap_to_best,
        });
    }

    /// Compute statistics for each algorithm
    pub fn compute_statistics(&self) -> Vec<AlgorithmStatistics> {
        let mut stats_map: HashMap<&str, Vec<&AlgorithmResult>> = HashMap::new();
        for result in &self.results {
            stats_map.entry(result.algorithm.as_str()).or_default().push(result);
        }

        let mut statistics: Vec<AlgorithmStatistics> = stats_map
            .into_iter()
            .map(|(algo, results)| {
                let count = results.len() as f64;
                let costs: Vec<f64> = results.iter().map(|r| r.cost).collect();
                let gaps: Vec<f64> = results.iter().filter_map(|r| r.gap_to_best).collect();

                let avg_cost = costs.iter().sum::<f64>() / count;
                let variance = costs.iter().map(|c| (c - avg_cost).powi(2)).sum::<f64>() / count;
                let total_time: f64 = results.iter().map(|r| r.time).sum();

                AlgorithmStatistics {
                    algorithm: algo.to_string(),
                    num_runs: results.len(),
                    avg_cost,
                    best_cost: costs.iter().cloned().fold(f64::INFINITY, f64::min),
                    worst_cost: costs.iter().cloned().fold(0.0, f64::max),
                    std_cost: variance.sqrt(),
                    avg_time: total_time / count,
                    total_time,
                    avg_gap: if gaps.is_empty() {
                        None
                    } else {
                        Some(gaps.iter().sum::<f64>() / gaps.len() as f64)
                    },
                }
            })
            .collect();

        statistics.sort_by_key(|s| OrderedFloat(s.avg_cost));
        statistics
    }

    /// Export results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for result in &self.results {
            writer.serialize(result)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Export statistics to CSV
    pub fn export_statistics_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for stat in self.compute_statistics() {
            writer.serialize(stat)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("          TSP Benchmark Report\n");
        report.push_str("========================================\n\n");

        report.push_str("Algorithm Performance Summary:\n");
        report.push_str("-".repeat(80).as_str());
        report.push('\n');
        report.push_str(&format!(
            "{:<25} {:>6} {:>12} {:>12} {:>10} {:>10}\n",
            "Algorithm", "Runs", "Avg Cost", "Best Cost", "Avg Gap%", "Avg Time"
        ));
        report.push_str("-".repeat(80).as_str());
        report.push('\n');

        for stat in &self.compute_statistics() {
            let gap_str = stat
                .avg_gap
                .map(|g| format!("{:.2}%", g))
                .unwrap_or_else(|| "-".to_string());

            report.push_str(&format!(
                "{:<25} {:>6} {:>12.4} {:>12.4} {:>10} {:>10.4}\n",
                stat.algorithm, stat.num_runs, stat.avg_cost, stat.best_cost, gap_str, stat.avg_time
            ));
        }

        report.push_str("-".repeat(80).as_str());
        report.push('\n');

        report.push_str("\nBest Solutions per Instance:\n");
        let mut instance_best: HashMap<&str, &AlgorithmResult> = HashMap::new();
        for result in &self.results {
            let entry = instance_best.entry(result.instance.as_str()).or_insert(result);
            if result.cost < entry.cost {
                *entry = result;
            }
        }
        for (instance, best) in &instance_best {
            report.push_str(&format!("  {}: {:.4} ({})\n", instance, best.cost, best.algorithm));
        }

        report
    }

    /// Get all results
    pub fn results(&self) -> &[AlgorithmResult] {
        &self.results
    }
}
