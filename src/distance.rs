//! Points and the dense symmetric distance matrix.
//!
//! The matrix is stored as a flat row-major `Vec<f64>`; every unordered pair
//! `{i, j}` is evaluated once and mirrored.

use serde::{Deserialize, Serialize};

/// A 2-D coordinate stored as `(y, x)`, e.g. latitude then longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub y: f64,
    pub x: f64,
}

impl Point {
    pub fn new(y: f64, x: f64) -> Self {
        Point { y, x }
    }

    pub fn is_finite(&self) -> bool {
        self.y.is_finite() && self.x.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((y, x): (f64, f64)) -> Self {
        Point { y, x }
    }
}

/// Euclidean distance between two points.
#[inline]
pub fn dist_l2(p1: &Point, p2: &Point) -> f64 {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    (dx * dx + dy * dy).sqrt()
}

/// Symmetric `n x n` distance matrix with a zero diagonal.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Build the matrix with `dist`, calling it once per unordered pair.
    pub fn from_points<F>(points: &[Point], dist: F) -> Self
    where
        F: Fn(&Point, &Point) -> f64,
    {
        let n = points.len();
        let mut data = vec![0.0; n * n];

        for i in 0..n.saturating_sub(1) {
            for j in i + 1..n {
                let d = dist(&points[i], &points[j]);
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }

        DistanceMatrix { n, data }
    }

    /// Euclidean matrix, see [`dist_l2`].
    pub fn euclidean(points: &[Point]) -> Self {
        Self::from_points(points, dist_l2)
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        debug_assert!(
            i < self.n && j < self.n,
            "node ({}, {}) out of range for {} nodes",
            i,
            j,
            self.n
        );
        self.data[i * self.n + j]
    }

    /// Row `i` of the matrix.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// Length of the closed tour, including the edge from the last node back
    /// to the first.
    pub fn tour_length(&self, tour: &[usize]) -> f64 {
        if tour.len() < 2 {
            return 0.0;
        }

        let mut length = self.get(tour[tour.len() - 1], tour[0]);
        for pair in tour.windows(2) {
            length += self.get(pair[0], pair[1]);
        }

        length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_distance_calculation() {
        let points = vec![Point::new(0.0, 0.0), Point::new(4.0, 3.0)];
        let matrix = DistanceMatrix::euclidean(&points);

        assert!((matrix.get(0, 1) - 5.0).abs() < 1e-10);
        assert!((matrix.get(1, 0) - 5.0).abs() < 1e-10);
        assert_eq!(matrix.get(0, 0), 0.0);
    }

    #[test]
    fn test_each_pair_evaluated_once() {
        let points: Vec<Point> = (0..6).map(|i| Point::new(i as f64, (i * i) as f64)).collect();
        let calls = Cell::new(0usize);
        let matrix = DistanceMatrix::from_points(&points, |a, b| {
            calls.set(calls.get() + 1);
            dist_l2(a, b)
        });

        assert_eq!(calls.get(), 6 * 5 / 2);
        for i in 0..6 {
            for j in 0..6 {
                assert_eq!(matrix.get(i, j), matrix.get(j, i));
            }
        }
    }

    #[test]
    fn test_tour_length_matches_brute_force() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
        ];
        let matrix = DistanceMatrix::euclidean(&points);

        assert!((matrix.tour_length(&[0, 1, 2, 3]) - 4.0).abs() < 1e-12);
        assert!((matrix.tour_length(&[0, 2, 1, 3]) - (2.0 + 2.0 * 2f64.sqrt())).abs() < 1e-12);

        let tour = [3, 0, 2, 1];
        let mut expected = 0.0;
        for k in 0..tour.len() {
            expected += dist_l2(&points[tour[k]], &points[tour[(k + 1) % tour.len()]]);
        }
        assert!((matrix.tour_length(&tour) - expected).abs() < 1e-12);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn test_get_rejects_column_out_of_range() {
        let matrix = DistanceMatrix::euclidean(&[
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
        ]);
        // Row 0, column 3 would otherwise read row 1, column 0.
        let _ = matrix.get(0, 3);
    }

    #[test]
    fn test_two_point_tour_is_out_and_back() {
        let matrix = DistanceMatrix::euclidean(&[Point::new(0.0, 0.0), Point::new(0.0, 2.5)]);
        assert!((matrix.tour_length(&[0, 1]) - 5.0).abs() < 1e-12);
    }
}
