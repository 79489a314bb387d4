//! Heuristics module for the TSP.
//!
//! This module exports the tour constructors, the 2-opt engine and the
//! multi-start driver.

pub mod construction;
pub mod local_search;
pub mod multistart;

pub use construction::*;
pub use local_search::*;
pub use multistart::*;
