//! Problem data and solutions.
//!
//! A [`Problem`] supplies travel costs, visit costs and the capacity; a
//! [`Solution`] owns the tours built against it.

mod problem;
mod solution;

pub use problem::{MatrixProblem, Problem};
pub use solution::Solution;
