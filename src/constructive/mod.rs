//! Constructive heuristics for building initial tour sets.
//!
//! - [`cheapest_insertion_build`] — Global cheapest insertion under capacity, O(n² × T × m)

mod cheapest_insertion;

pub use cheapest_insertion::cheapest_insertion_build;
