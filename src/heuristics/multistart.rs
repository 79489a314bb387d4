//! Multi-start 2-opt: independent random restarts, best result kept.
//!
//! Each trial draws its random tour from its own ChaCha stream, so a trial's
//! outcome depends only on `(seed, trial index)`. Trials can therefore run on
//! the rayon pool and still produce the same best tour, report sequence and
//! tie-breaking as a sequential run.

use crate::candidates::CandidateLists;
use crate::distance::DistanceMatrix;
use crate::error::{Error, Result};
use crate::heuristics::construction::random_tour;
use crate::heuristics::local_search::converge;
use crate::solution::{Solution, Tour};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Multi-start configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiStartConfig {
    /// Number of random restarts (k)
    pub iterations: usize,
    /// Random seed
    pub seed: u64,
    /// Run trials on the rayon thread pool
    pub parallel: bool,
}

impl Default for MultiStartConfig {
    fn default() -> Self {
        MultiStartConfig {
            iterations: 10,
            seed: 42,
            parallel: false,
        }
    }
}

/// Random number generator used by trial `trial` of a run seeded with `seed`.
pub fn trial_rng(seed: u64, trial: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(trial as u64);
    rng
}

/// A locally optimal tour produced by one restart.
#[derive(Debug, Clone)]
pub struct Trial {
    pub index: usize,
    pub tour: Tour,
    pub length: f64,
    pub sweeps: usize,
}

/// Indices of the trials that strictly beat every earlier trial.
fn improving_trials(lengths: &[f64]) -> Vec<usize> {
    let mut best: Option<f64> = None;
    let mut improving = Vec::new();
    for (i, &length) in lengths.iter().enumerate() {
        if best.map_or(true, |b| length < b) {
            best = Some(length);
            improving.push(i);
        }
    }
    improving
}

pub struct MultiStartLocalSearch {
    pub config: MultiStartConfig,
}

impl MultiStartLocalSearch {
    pub fn new(config: MultiStartConfig) -> Self {
        MultiStartLocalSearch { config }
    }

    pub fn with_iterations(iterations: usize, seed: u64) -> Self {
        MultiStartLocalSearch {
            config: MultiStartConfig {
                iterations,
                seed,
                ..Default::default()
            },
        }
    }

    /// Random tour + local search for trial `index`.
    pub fn run_trial(
        &self,
        index: usize,
        distances: &DistanceMatrix,
        candidates: &CandidateLists,
    ) -> Trial {
        let mut rng = trial_rng(self.config.seed, index);
        let mut tour = Tour::from_permutation(random_tour(distances.len(), &mut rng));
        let z = tour.length(distances);
        let result = converge(&mut tour, z, distances, candidates);

        log::debug!(
            "trial {}: {:.6} -> {:.6} in {} sweeps",
            index,
            z,
            result.length,
            result.sweeps
        );

        Trial {
            index,
            tour,
            length: result.length,
            sweeps: result.sweeps,
        }
    }

    pub fn run(&self, distances: &DistanceMatrix) -> Result<Solution> {
        self.run_with_report(distances, |_, _| {})
    }

    /// Run all trials; `report(length, tour)` is called in trial order every
    /// time a trial strictly beats the best so far.
    pub fn run_with_report<F>(&self, distances: &DistanceMatrix, mut report: F) -> Result<Solution>
    where
        F: FnMut(f64, &[usize]),
    {
        let start = std::time::Instant::now();
        let n = distances.len();
        let k = self.config.iterations;
        if n < 2 {
            return Err(Error::InvalidInputSize(n));
        }
        if k == 0 {
            return Err(Error::InvalidIterations(k));
        }

        let candidates = CandidateLists::build(distances);

        let keep_better = |best: Option<Trial>, trial: Trial| -> Option<Trial> {
            match best {
                Some(best) if best.length <= trial.length => Some(best),
                _ => {
                    log::info!("new best {:.6} at trial {}", trial.length, trial.index);
                    report(trial.length, trial.tour.order());
                    Some(trial)
                }
            }
        };

        let best = if self.config.parallel {
            // Only lengths leave the pool. Trials that improve on the best so
            // far are replayed in order, which reproduces their tours exactly.
            let lengths: Vec<f64> = (0..k)
                .into_par_iter()
                .map(|i| self.run_trial(i, distances, &candidates).length)
                .collect();
            improving_trials(&lengths)
                .into_iter()
                .map(|i| self.run_trial(i, distances, &candidates))
                .fold(None, keep_better)
        } else {
            (0..k)
                .map(|i| self.run_trial(i, distances, &candidates))
                .fold(None, keep_better)
        };

        let best = best.ok_or(Error::InvalidIterations(k))?;
        Ok(Solution {
            cost: best.length,
            tour: best.tour.into_order(),
            algorithm: self.name().to_string(),
            computation_time: start.elapsed().as_secs_f64(),
            iterations: Some(k),
        })
    }

    pub fn name(&self) -> &str {
        "MultiStart-2Opt"
    }
}

impl Default for MultiStartLocalSearch {
    fn default() -> Self {
        Self::new(MultiStartConfig::default())
    }
}
