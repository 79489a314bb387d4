//! Per-node neighbor lists sorted by ascending distance.
//!
//! Lists are complete (every other node appears), so the 2-opt scan can stop
//! on distance alone instead of a fixed neighborhood size.

use crate::distance::DistanceMatrix;
use ordered_float::OrderedFloat;

/// Sorted `(distance, neighbor)` pairs for every node.
#[derive(Debug, Clone)]
pub struct CandidateLists {
    lists: Vec<Vec<(f64, usize)>>,
}

impl CandidateLists {
    /// Sort all other nodes of each row; ties are ordered by neighbor index.
    pub fn build(distances: &DistanceMatrix) -> Self {
        let n = distances.len();
        let lists = (0..n)
            .map(|i| {
                let mut list: Vec<(f64, usize)> = distances
                    .row(i)
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(j, &d)| (d, j))
                    .collect();
                list.sort_by_key(|&(d, j)| (OrderedFloat(d), j));
                list
            })
            .collect();

        CandidateLists { lists }
    }

    #[inline]
    pub fn neighbors(&self, node: usize) -> &[(f64, usize)] {
        &self.lists[node]
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}
