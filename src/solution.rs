//! Tour and solution representation.
//!
//! [`Tour`] is the mutable working state of the local search: the visiting
//! order together with the position of every node in it. [`Solution`] is the
//! serializable record handed back to callers.

use crate::distance::DistanceMatrix;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A closed tour with its position index.
///
/// Invariant: `order[positions[v]] == v` for every node `v`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tour {
    order: Vec<usize>,
    positions: Vec<usize>,
}

impl Tour {
    /// Build a tour from a visiting order, checking it is a permutation of `0..n`.
    pub fn from_order(order: Vec<usize>) -> Result<Self> {
        let n = order.len();
        let mut seen = vec![false; n];
        for &node in &order {
            if node >= n {
                return Err(Error::invalid_tour(format!(
                    "node {} out of range for {} nodes",
                    node, n
                )));
            }
            if seen[node] {
                return Err(Error::invalid_tour(format!("node {} visited twice", node)));
            }
            seen[node] = true;
        }

        Ok(Self::from_permutation(order))
    }

    /// Build a tour from an order already known to be a permutation.
    pub(crate) fn from_permutation(order: Vec<usize>) -> Self {
        let mut positions = vec![0; order.len()];
        for (k, &node) in order.iter().enumerate() {
            positions[node] = k;
        }
        Tour { order, positions }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[inline]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn into_order(self) -> Vec<usize> {
        self.order
    }

    /// Node at position `pos` (circular).
    #[inline]
    pub fn node_at(&self, pos: usize) -> usize {
        self.order[pos % self.order.len()]
    }

    /// Current position of `node`.
    #[inline]
    pub fn position(&self, node: usize) -> usize {
        self.positions[node]
    }

    /// Position preceding `pos` on the cycle.
    #[inline]
    pub fn prev_position(&self, pos: usize) -> usize {
        if pos == 0 {
            self.order.len() - 1
        } else {
            pos - 1
        }
    }

    pub fn length(&self, distances: &DistanceMatrix) -> f64 {
        distances.tour_length(&self.order)
    }

    /// Length change of replacing arcs `(i, i+1)` and `(j, j+1)` with
    /// `(i, j)` and `(i+1, j+1)`. Negative means shorter.
    pub fn exchange_cost(&self, i: usize, j: usize, distances: &DistanceMatrix) -> f64 {
        let a = self.node_at(i);
        let b = self.node_at(i + 1);
        let c = self.node_at(j);
        let d = self.node_at(j + 1);
        (distances.get(a, c) + distances.get(b, d)) - (distances.get(a, b) + distances.get(c, d))
    }

    /// Apply the 2-opt move on arcs `(i, i+1)` and `(j, j+1)` by reversing
    /// `order[i+1..=j]`. Arguments may come in either order.
    ///
    /// # Panics
    ///
    /// If the two arcs are identical or adjacent, or `j` is out of range.
    pub fn exchange(&mut self, i: usize, j: usize) {
        let (i, j) = if i > j { (j, i) } else { (i, j) };
        let n = self.order.len();
        assert!(
            i + 1 < j && j < n,
            "2-opt exchange needs non-adjacent arcs: i={} j={} n={}",
            i,
            j,
            n
        );

        self.order[i + 1..=j].reverse();
        for k in i + 1..=j {
            self.positions[self.order[k]] = k;
        }
    }

    /// Check the position index against the order.
    pub fn is_consistent(&self) -> bool {
        self.order.len() == self.positions.len()
            && self
                .order
                .iter()
                .enumerate()
                .all(|(k, &node)| self.positions.get(node) == Some(&k))
    }
}

/// Result of a solver run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// Visiting order; the tour closes back on its first node
    pub tour: Vec<usize>,
    /// Total closed tour length
    pub cost: f64,
    /// Algorithm that generated this solution
    pub algorithm: String,
    /// Computation time in seconds
    pub computation_time: f64,
    /// Number of iterations (if applicable)
    pub iterations: Option<usize>,
}

impl Solution {
    /// Create a new empty solution
    pub fn new() -> Self {
        Solution {
            tour: Vec::new(),
            cost: f64::INFINITY,
            algorithm: String::new(),
            computation_time: 0.0,
            iterations: None,
        }
    }

    /// Create a solution from a tour, computing its length
    pub fn from_tour(distances: &DistanceMatrix, tour: Vec<usize>, algorithm: &str) -> Self {
        let cost = distances.tour_length(&tour);
        Solution {
            tour,
            cost,
            algorithm: algorithm.to_string(),
            computation_time: 0.0,
            iterations: None,
        }
    }

    /// Recompute the cost from scratch
    pub fn validate(&mut self, distances: &DistanceMatrix) {
        self.cost = distances.tour_length(&self.tour);
    }

    /// Check if all `n` nodes are visited exactly once
    pub fn is_complete(&self, n: usize) -> bool {
        if self.tour.len() != n {
            return false;
        }
        let mut seen = vec![false; n];
        self.tour.iter().all(|&node| node < n && !std::mem::replace(&mut seen[node], true))
    }
}

impl Default for Solution {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution ({})", self.algorithm)?;
        writeln!(f, "  Cost: {:.4}", self.cost)?;
        writeln!(f, "  Time: {:.4}s", self.computation_time)?;
        if let Some(iter) = self.iterations {
            writeln!(f, "  Iterations: {}", iter)?;
        }
        writeln!(f, "  Tour: {:?}", self.tour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::Point;

    fn ring(n: usize) -> DistanceMatrix {
        let points: Vec<Point> = (0..n)
            .map(|k| {
                let angle = k as f64 * std::f64::consts::TAU / n as f64;
                Point::new(angle.sin(), angle.cos())
            })
            .collect();
        DistanceMatrix::euclidean(&points)
    }

    #[test]
    fn test_solution_creation() {
        let sol = Solution::new();
        assert!(sol.tour.is_empty());
        assert_eq!(sol.cost, f64::INFINITY);
    }

    #[test]
    fn test_from_order_rejects_non_permutations() {
        assert!(Tour::from_order(vec![0, 1, 1]).is_err());
        assert!(Tour::from_order(vec![0, 3, 1]).is_err());
        let tour = Tour::from_order(vec![2, 0, 1]).unwrap();
        assert_eq!(tour.position(2), 0);
        assert_eq!(tour.position(1), 2);
        assert!(tour.is_consistent());
    }

    #[test]
    fn test_exchange_matches_exchange_cost() {
        let distances = ring(9);
        let start = vec![0, 4, 8, 3, 7, 2, 6, 1, 5];

        for i in 0..9 {
            for j in i + 2..9 {
                if i == 0 && j == 8 {
                    continue;
                }
                let mut tour = Tour::from_order(start.clone()).unwrap();
                let before = tour.length(&distances);
                let delta = tour.exchange_cost(i, j, &distances);
                tour.exchange(i, j);

                assert!(tour.is_consistent());
                assert!((tour.length(&distances) - (before + delta)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_exchange_accepts_swapped_arguments() {
        let mut forward = Tour::from_order(vec![0, 1, 2, 3, 4, 5]).unwrap();
        let mut backward = forward.clone();
        forward.exchange(1, 4);
        backward.exchange(4, 1);
        assert_eq!(forward, backward);
        assert_eq!(forward.order(), &[0, 1, 4, 3, 2, 5]);
    }

    #[test]
    #[should_panic]
    fn test_exchange_rejects_adjacent_arcs() {
        let mut tour = Tour::from_order(vec![0, 1, 2, 3, 4]).unwrap();
        tour.exchange(1, 2);
    }

    #[test]
    #[should_panic]
    fn test_exchange_rejects_out_of_range() {
        let mut tour = Tour::from_order(vec![0, 1, 2, 3, 4]).unwrap();
        tour.exchange(1, 5);
    }

    #[test]
    fn test_is_complete() {
        let distances = ring(4);
        let sol = Solution::from_tour(&distances, vec![0, 2, 1, 3], "test");
        assert!(sol.is_complete(4));
        assert!(!sol.is_complete(5));
        let dup = Solution::from_tour(&distances, vec![0, 2, 2, 3], "test");
        assert!(!dup.is_complete(4));
    }
}
