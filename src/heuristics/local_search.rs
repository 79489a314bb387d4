//! 2-opt local search restricted by sorted candidate lists.
//!
//! For the tour edge `(a, b)` only candidates `c` with `d(a, c) < d(a, b)` can
//! start an improving exchange (and symmetrically for `b`), so each scan stops
//! at the first candidate that is not strictly closer. The search is
//! first-improvement: the first negative delta found for an edge is applied.

use crate::candidates::CandidateLists;
use crate::distance::DistanceMatrix;
use crate::instance::TspInstance;
use crate::solution::{Solution, Tour};

/// Trait for local search improvement methods
pub trait LocalSearch {
    fn improve(&self, instance: &TspInstance, solution: &mut Solution) -> bool;
    fn name(&self) -> &str;
}

/// Outcome of running [`improve`] until no sweep shortens the tour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Convergence {
    /// Final tour length
    pub length: f64,
    /// Number of sweeps, including the last non-improving one
    pub sweeps: usize,
    /// Number of exchanges applied
    pub exchanges: usize,
}

/// One sweep over every tour position. Returns the new length and the number
/// of exchanges applied.
fn sweep(
    tour: &mut Tour,
    z: f64,
    distances: &DistanceMatrix,
    candidates: &CandidateLists,
) -> (f64, usize) {
    let n = tour.len();
    if n < 4 {
        return (z, 0);
    }

    let mut z = z;
    let mut exchanges = 0;

    for i in 0..n {
        let a = tour.node_at(i);
        let b = tour.node_at(i + 1);
        let dist_ab = distances.get(a, b);
        let mut improved = false;

        for &(dist_ac, c) in candidates.neighbors(a) {
            if dist_ac >= dist_ab {
                break;
            }
            let j = tour.position(c);
            let d = tour.node_at(j + 1);
            let delta = (dist_ac + distances.get(b, d)) - (dist_ab + distances.get(c, d));
            if delta < 0.0 {
                log::trace!("2-opt on ({}, {}) x ({}, {}): {:.6}", a, b, c, d, delta);
                tour.exchange(i, j);
                z += delta;
                exchanges += 1;
                improved = true;
                break;
            }
        }

        if improved {
            continue;
        }

        for &(dist_bd, d) in candidates.neighbors(b) {
            if dist_bd >= dist_ab {
                break;
            }
            let j = tour.prev_position(tour.position(d));
            let c = tour.node_at(j);
            let delta = (distances.get(a, c) + dist_bd) - (dist_ab + distances.get(c, d));
            if delta < 0.0 {
                log::trace!("2-opt on ({}, {}) x ({}, {}): {:.6}", a, b, c, d, delta);
                tour.exchange(i, j);
                z += delta;
                exchanges += 1;
                break;
            }
        }
    }

    (z, exchanges)
}

/// One improvement sweep over `tour` of length `z`; returns the updated length.
pub fn improve(
    tour: &mut Tour,
    z: f64,
    distances: &DistanceMatrix,
    candidates: &CandidateLists,
) -> f64 {
    sweep(tour, z, distances, candidates).0
}

/// Sweep until the length stops strictly decreasing.
pub fn converge(
    tour: &mut Tour,
    z: f64,
    distances: &DistanceMatrix,
    candidates: &CandidateLists,
) -> Convergence {
    let mut z = z;
    let mut sweeps = 0;
    let mut exchanges = 0;

    loop {
        let (new_z, applied) = sweep(tour, z, distances, candidates);
        sweeps += 1;
        exchanges += applied;
        if new_z < z {
            log::debug!("sweep {}: {:.6} -> {:.6} ({} exchanges)", sweeps, z, new_z, applied);
            z = new_z;
        } else {
            break;
        }
    }

    Convergence {
        length: z,
        sweeps,
        exchanges,
    }
}

/// Bring `tour` to a 2-opt local optimum and return its length. Candidate
/// lists are built from `distances` when not supplied.
pub fn localsearch(
    tour: &mut Tour,
    z: f64,
    distances: &DistanceMatrix,
    candidates: Option<&CandidateLists>,
) -> f64 {
    let built;
    let candidates = match candidates {
        Some(candidates) => candidates,
        None => {
            built = CandidateLists::build(distances);
            &built
        }
    };

    converge(tour, z, distances, candidates).length
}

/// 2-Opt Local Search
///
/// Candidate-list 2-opt with first improvement, run to convergence.
pub struct TwoOptSearch;

impl TwoOptSearch {
    pub fn new() -> Self {
        TwoOptSearch
    }
}

impl Default for TwoOptSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalSearch for TwoOptSearch {
    fn improve(&self, instance: &TspInstance, solution: &mut Solution) -> bool {
        if solution.tour.len() != instance.dimension {
            log::warn!(
                "2-opt skipped: tour has {} nodes, instance has {}",
                solution.tour.len(),
                instance.dimension
            );
            return false;
        }

        let mut tour = match Tour::from_order(solution.tour.clone()) {
            Ok(tour) => tour,
            Err(e) => {
                log::warn!("2-opt skipped: {}", e);
                return false;
            }
        };

        let distances = instance.distances();
        let candidates = CandidateLists::build(distances);
        let before = tour.length(distances);
        let result = converge(&mut tour, before, distances, &candidates);

        solution.tour = tour.into_order();
        solution.cost = result.length;
        solution.iterations = Some(result.sweeps);

        result.length < before
    }

    fn name(&self) -> &str {
        "2-Opt"
    }
}
