use crate::distance::DistanceMatrix;
use crate::instance::TspInstance;
use crate::solution::Solution;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

pub trait ConstructionHeuristic {
    fn construct(&self, instance: &TspInstance) -> Solution;
    fn name(&self) -> &str;
}

/// Greedy nearest neighbor tour starting at `start`.
///
/// Unvisited nodes are scanned in ascending index order and only a strictly
/// closer node replaces the current pick, so exact ties go to the lowest index.
///
/// # Panics
///
/// If `start` is not a node of `distances` (`start >= n`).
pub fn nearest_neighbor(start: usize, distances: &DistanceMatrix) -> Vec<usize> {
    let n = distances.len();
    assert!(start < n, "start node {} out of range for {} nodes", start, n);
    let mut unvisited: Vec<usize> = (0..n).filter(|&i| i != start).collect();
    let mut tour = Vec::with_capacity(n);
    tour.push(start);

    let mut last = start;
    while !unvisited.is_empty() {
        let mut best = 0;
        let mut min_dist = distances.get(last, unvisited[0]);
        for (k, &node) in unvisited.iter().enumerate().skip(1) {
            let d = distances.get(last, node);
            if d < min_dist {
                best = k;
                min_dist = d;
            }
        }
        // `remove` keeps the remaining nodes in index order
        last = unvisited.remove(best);
        tour.push(last);
    }

    tour
}

/// Uniformly random permutation of `0..n`.
pub fn random_tour<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut tour: Vec<usize> = (0..n).collect();
    tour.shuffle(rng);
    tour
}

/// Nearest Neighbor Heuristic
///
/// Builds a tour by repeatedly visiting the nearest unvisited node.
pub struct NearestNeighborHeuristic {
    pub start: usize,
}

impl NearestNeighborHeuristic {
    pub fn new() -> Self {
        NearestNeighborHeuristic { start: 0 }
    }

    pub fn from_start(start: usize) -> Self {
        NearestNeighborHeuristic { start }
    }
}

impl Default for NearestNeighborHeuristic {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstructionHeuristic for NearestNeighborHeuristic {
    fn construct(&self, instance: &TspInstance) -> Solution {
        let start = std::time::Instant::now();
        if self.start >= instance.dimension {
            log::warn!(
                "nearest neighbor skipped: start node {} out of range for {} nodes",
                self.start,
                instance.dimension
            );
            return Solution::new();
        }
        let tour = nearest_neighbor(self.start, instance.distances());

        let mut solution = Solution::from_tour(instance.distances(), tour, self.name());
        solution.computation_time = start.elapsed().as_secs_f64();
        solution
    }

    fn name(&self) -> &str {
        "NearestNeighbor"
    }
}

/// Random permutation, reproducible through its seed.
pub struct RandomTourHeuristic {
    pub seed: u64,
}

impl RandomTourHeuristic {
    pub fn new() -> Self {
        RandomTourHeuristic { seed: 42 }
    }

    pub fn with_seed(seed: u64) -> Self {
        RandomTourHeuristic { seed }
    }
}

impl Default for RandomTourHeuristic {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstructionHeuristic for RandomTourHeuristic {
    fn construct(&self, instance: &TspInstance) -> Solution {
        let start = std::time::Instant::now();
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let tour = random_tour(instance.dimension, &mut rng);

        let mut solution = Solution::from_tour(instance.distances(), tour, self.name());
        solution.computation_time = start.elapsed().as_secs_f64();
        solution
    }

    fn name(&self) -> &str {
        "RandomTour"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::Point;

    fn scattered_instance(n: usize, seed: u64) -> TspInstance {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let points = (0..n)
            .map(|_| Point::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0)))
            .collect();
        TspInstance::from_points("scattered", points).unwrap()
    }

    #[test]
    fn test_nearest_neighbor_is_permutation() {
        let instance = scattered_instance(40, 7);
        for start in [0, 13, 39] {
            let solution = NearestNeighborHeuristic::from_start(start).construct(&instance);
            assert!(solution.is_complete(40));
            assert_eq!(solution.tour[0], start);
            assert!((solution.cost - instance.tour_length(&solution.tour)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_nearest_neighbor_on_a_line() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 5.0),
            Point::new(0.0, 1.0),
            Point::new(0.0, 3.0),
        ];
        let instance = TspInstance::from_points("line", points).unwrap();
        assert_eq!(nearest_neighbor(0, instance.distances()), vec![0, 2, 3, 1]);
    }

    #[test]
    fn test_nearest_neighbor_tie_goes_to_lowest_index() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, -1.0),
            Point::new(0.0, 1.0),
        ];
        let instance = TspInstance::from_points("tie", points).unwrap();
        assert_eq!(nearest_neighbor(0, instance.distances()), vec![0, 1, 2]);
    }

    #[test]
    fn test_out_of_range_start_builds_nothing() {
        let instance = scattered_instance(6, 2);
        let solution = NearestNeighborHeuristic::from_start(6).construct(&instance);
        assert!(solution.tour.is_empty());
        assert!(!solution.is_complete(6));
        assert_eq!(solution.cost, f64::INFINITY);
    }

    #[test]
    #[should_panic]
    fn test_nearest_neighbor_rejects_start_out_of_range() {
        let instance = scattered_instance(4, 2);
        nearest_neighbor(4, instance.distances());
    }

    #[test]
    fn test_random_tour_is_permutation() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for n in [2, 5, 64] {
            let mut tour = random_tour(n, &mut rng);
            tour.sort_unstable();
            assert_eq!(tour, (0..n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_random_tour_heuristic_is_reproducible() {
        let instance = scattered_instance(25, 11);
        let a = RandomTourHeuristic::with_seed(5).construct(&instance);
        let b = RandomTourHeuristic::with_seed(5).construct(&instance);
        assert_eq!(a.tour, b.tour);
        assert!(a.is_complete(25));
    }
}
