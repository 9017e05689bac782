//! # u-tours
//!
//! Array-backed tour engine for capacitated vehicle routing and TSP local
//! search: successor-map tours, capacity bookkeeping, incremental cost
//! evaluation and inter-tour move operators.
//!
//! ## Modules
//!
//! - [`tour`] — Successor-map tours with Pair/Triple/Shift views
//! - [`capacity`] — Weight ceiling, named constraints and per-tour content caches
//! - [`distance`] — Dense travel-cost matrix
//! - [`models`] — The `Problem` trait and multi-tour `Solution`
//! - [`evaluation`] — Tour costs, cheapest insertion and sequence windows
//! - [`local_search`] — Relocate and exchange operators, multi-tour sweeps and descent
//! - [`constructive`] — Cheapest-insertion construction
//! - [`config`] — Local-search settings, loadable from JSON
//! - [`error`] — Error types
//!
//! ## Example
//!
//! ```
//! use u_tours::capacity::Capacity;
//! use u_tours::config::LocalSearchConfig;
//! use u_tours::constructive::cheapest_insertion_build;
//! use u_tours::distance::DistanceMatrix;
//! use u_tours::local_search::LocalSearch;
//! use u_tours::models::MatrixProblem;
//!
//! let points = [(0.0, 0.0), (4.0, 0.0), (1.0, 1.0), (3.0, 1.0), (1.0, -1.0), (3.0, -1.0)];
//! let problem = MatrixProblem::new(DistanceMatrix::from_points(&points), Capacity::new(20.0));
//!
//! let starts = [(0, Some(0)), (1, Some(1))];
//! let mut solution = cheapest_insertion_build(&problem, &starts, &[2, 3, 4, 5]).unwrap();
//! let report = LocalSearch::new(LocalSearchConfig::default()).run(&problem, &mut solution);
//! assert!(report.final_cost <= report.initial_cost);
//! assert!(solution.verify().is_ok());
//! ```

pub mod capacity;
pub mod config;
pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod local_search;
pub mod models;
pub mod tour;

pub use error::{ConstraintViolation, Result, TourError};
