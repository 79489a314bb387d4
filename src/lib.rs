//! TSP Local Search Library
//!
//! An approximate solver for the Euclidean Travelling Salesman Problem.
//!
//! # Features
//!
//! - Dense symmetric distance matrix and per-node sorted candidate lists
//! - Nearest neighbor and random tour construction
//! - Candidate-list 2-opt with first improvement, run to a local optimum
//! - Multi-start driver over independent random restarts (optionally parallel)
//! - TSP-LIB and CSV loaders, benchmarking tools
//!
//! # Example
//!
//! ```
//! use tsp_localsearch::distance::Point;
//! use tsp_localsearch::solver::solve;
//!
//! let points = vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(0.0, 1.0),
//!     Point::new(1.0, 1.0),
//!     Point::new(1.0, 0.0),
//! ];
//!
//! let solution = solve(&points, Some(5)).unwrap();
//! assert!((solution.cost - 4.0).abs() < 1e-9);
//! println!("Tour: {:?} ({:.2})", solution.tour, solution.cost);
//! ```

pub mod benchmark;
pub mod candidates;
pub mod distance;
pub mod error;
pub mod heuristics;
pub mod instance;
pub mod solution;
pub mod solver;

pub use distance::{DistanceMatrix, Point};
pub use error::{Error, Result};
pub use instance::TspInstance;
pub use solution::{Solution, Tour};
pub use solver::{solve, Solver, SolverConfig, Strategy};
