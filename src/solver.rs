//! Caller-facing entry point: points in, tour and length out.

use crate::distance::Point;
use crate::error::{Error, Result};
use crate::heuristics::construction::{ConstructionHeuristic, NearestNeighborHeuristic};
use crate::heuristics::local_search::{LocalSearch, TwoOptSearch};
use crate::heuristics::multistart::{MultiStartConfig, MultiStartLocalSearch};
use crate::instance::TspInstance;
use crate::solution::Solution;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How the starting tour(s) are produced.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// One nearest neighbor tour from `start`, then 2-opt
    #[value(name = "nn", alias = "nearest-neighbor")]
    NearestNeighbor,
    /// `iterations` random tours, each followed by 2-opt
    MultiStart,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub strategy: Strategy,
    /// Number of random restarts for the multi-start strategy
    pub iterations: usize,
    /// Random seed
    pub seed: u64,
    /// Run multi-start trials in parallel
    pub parallel: bool,
    /// First node of the nearest neighbor tour
    pub start: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            strategy: Strategy::MultiStart,
            iterations: 10,
            seed: 42,
            parallel: false,
            start: 0,
        }
    }
}

impl SolverConfig {
    /// Load a configuration from a JSON file; missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

pub struct Solver {
    pub config: SolverConfig,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Solver { config }
    }

    pub fn solve(&self, points: &[Point]) -> Result<Solution> {
        self.solve_with_report(points, |_, _| {})
    }

    pub fn solve_with_report<F>(&self, points: &[Point], report: F) -> Result<Solution>
    where
        F: FnMut(f64, &[usize]),
    {
        let instance = TspInstance::from_points("points", points.to_vec())?;
        self.solve_instance_with_report(&instance, report)
    }

    pub fn solve_instance(&self, instance: &TspInstance) -> Result<Solution> {
        self.solve_instance_with_report(instance, |_, _| {})
    }

    /// Solve `instance`; `report` sees every new best of a multi-start run, or
    /// the single local optimum of the nearest neighbor strategy.
    pub fn solve_instance_with_report<F>(
        &self,
        instance: &TspInstance,
        mut report: F,
    ) -> Result<Solution>
    where
        F: FnMut(f64, &[usize]),
    {
        if instance.dimension < 2 {
            return Err(Error::InvalidInputSize(instance.dimension));
        }

        match self.config.strategy {
            Strategy::NearestNeighbor => {
                if self.config.start >= instance.dimension {
                    return Err(Error::invalid_tour(format!(
                        "start node {} out of range for {} nodes",
                        self.config.start, instance.dimension
                    )));
                }
                let start = std::time::Instant::now();
                let mut solution =
                    NearestNeighborHeuristic::from_start(self.config.start).construct(instance);
                log::info!("nearest neighbor tour: {:.6}", solution.cost);

                TwoOptSearch::new().improve(instance, &mut solution);
                report(solution.cost, &solution.tour);

                solution.algorithm = "NearestNeighbor+2Opt".to_string();
                solution.computation_time = start.elapsed().as_secs_f64();
                Ok(solution)
            }
            Strategy::MultiStart => {
                let driver = MultiStartLocalSearch::new(MultiStartConfig {
                    iterations: self.config.iterations,
                    seed: self.config.seed,
                    parallel: self.config.parallel,
                });
                driver.run_with_report(instance.distances(), report)
            }
        }
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

/// Solve with defaults: nearest neighbor + 2-opt when `iterations` is `None`,
/// otherwise a multi-start run with that many restarts.
pub fn solve(points: &[Point], iterations: Option<usize>) -> Result<Solution> {
    let config = match iterations {
        Some(iterations) => SolverConfig {
            strategy: Strategy::MultiStart,
            iterations,
            ..Default::default()
        },
        None => SolverConfig {
            strategy: Strategy::NearestNeighbor,
            ..Default::default()
        },
    };
    Solver::new(config).solve(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::ValueEnum;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
        ]
    }

    #[test]
    fn test_solve_square_both_strategies() {
        let nn = solve(&square(), None).unwrap();
        assert!((nn.cost - 4.0).abs() < 1e-9);
        assert_eq!(nn.algorithm, "NearestNeighbor+2Opt");

        let ms = solve(&square(), Some(5)).unwrap();
        assert!((ms.cost - 4.0).abs() < 1e-9);
        assert!(ms.is_complete(4));
    }

    #[test]
    fn test_rejects_degenerate_inputs() {
        assert!(matches!(solve(&[Point::new(0.0, 0.0)], None), Err(Error::InvalidInputSize(1))));
        assert!(matches!(solve(&[], Some(3)), Err(Error::InvalidInputSize(0))));
        assert!(matches!(solve(&square(), Some(0)), Err(Error::InvalidIterations(0))));

        let solver = Solver::new(SolverConfig {
            strategy: Strategy::NearestNeighbor,
            start: 9,
            ..Default::default()
        });
        assert!(matches!(solver.solve(&square()), Err(Error::InvalidTour(_))));
    }

    #[test]
    fn test_two_points() {
        let points = vec![Point::new(1.0, 1.0), Point::new(4.0, 5.0)];
        let solution = solve(&points, None).unwrap();
        assert_eq!(solution.tour, vec![0, 1]);
        assert!((solution.cost - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_report_hook_does_not_change_result() {
        let points: Vec<Point> = (0..30)
            .map(|i| {
                let t = i as f64;
                Point::new((t * 1.7).sin() * 10.0, (t * 2.3).cos() * 10.0 + t * 0.1)
            })
            .collect();
        let solver = Solver::new(SolverConfig {
            iterations: 6,
            seed: 11,
            ..Default::default()
        });

        let quiet = solver.solve(&points).unwrap();
        let mut seen = 0;
        let loud = solver.solve_with_report(&points, |_, _| seen += 1).unwrap();

        assert!(seen >= 1);
        assert_eq!(quiet.tour, loud.tour);
        assert_eq!(quiet.cost, loud.cost);
    }

    #[test]
    fn test_config_from_json() {
        let path = std::env::temp_dir().join(format!("tsp-localsearch-{}-config.json", std::process::id()));
        std::fs::write(&path, r#"{ "strategy": "nearest-neighbor", "start": 2 }"#).unwrap();
        let config = SolverConfig::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.strategy, Strategy::NearestNeighbor);
        assert_eq!(config.start, 2);
        assert_eq!(config.seed, 42);
        assert_eq!(config.iterations, 10);
    }

    #[test]
    fn test_strategy_parses_from_command_line_names() {
        assert_eq!(Strategy::from_str("nn", false), Ok(Strategy::NearestNeighbor));
        assert_eq!(
            Strategy::from_str("nearest-neighbor", false),
            Ok(Strategy::NearestNeighbor)
        );
        assert_eq!(Strategy::from_str("multi-start", false), Ok(Strategy::MultiStart));
        assert!(Strategy::from_str("greedy", false).is_err());
    }
}
