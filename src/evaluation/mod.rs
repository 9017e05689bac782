//! Cost evaluation for tours.
//!
//! - [`tour_cost`] / [`cumulative_cost`] — whole-tour and prefix costs
//! - [`cheapest_insertion`] and friends — where a visit or [`Seq`] fits best
//! - [`sequences_of_size`] — candidate windows for sequence moves

mod cost;
mod insertion;
mod sequence;

pub use cost::{cumulative_cost, edge_cost, tour_cost, window_cost};
pub use insertion::{
    cheapest_insertion, cheapest_insertion_any, cheapest_insertion_any_by,
    cheapest_sequence_insertion, insertion_cost, insertion_edges, sequence_insertion_cost,
    Insertion, SequenceInsertion,
};
pub use sequence::{sequences_of_size, Seq, Sequences};
