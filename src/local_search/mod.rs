//! Local search operators for improving tour sets.
//!
//! Every move implements [`Operator`]: given a candidate it either applies
//! the move and reports the cost decrease, or rejects it without touching
//! anything.
//!
//! - [`Relocate`] / [`Exchange`] — single visits between two tours
//! - [`SeqRelocate`] / [`SeqExchange`] — sequence windows between two tours
//! - [`IntraRelocate`] — a visit to a better place in its own tour
//! - [`multi_relocate`] / [`multi_exchange`] — sweeps over many tour pairs
//! - [`LocalSearch`] — descent until no operator improves

mod descent;
mod exchange;
#[cfg(test)]
mod fixtures;
mod intra_relocate;
mod multi;
mod operator;
mod relocate;
mod seq_exchange;
mod seq_relocate;

pub use descent::{LocalSearch, SearchReport};
pub use exchange::{Exchange, Swap};
pub use intra_relocate::{IntraRelocate, IntraRelocation};
pub use multi::{
    multi_exchange, multi_relocate, ordered_pairs, unordered_pairs, AlwaysTry, InterTourFilter,
    Sweep,
};
pub use operator::{first_improvement, movable_triples, Operator, DEFAULT_EPSILON};
pub use relocate::{Relocate, Relocation};
pub use seq_exchange::{SeqExchange, SeqSwap};
pub use seq_relocate::{SeqRelocate, SeqRelocation};
