//! Array-backed tours.
//!
//! A [`Tour`] stores one vehicle's visit order as a successor map indexed by
//! visit id, giving O(1) successor queries and edge rewiring. [`Pair`],
//! [`Triple`] and [`Shift`] are transient views handed out while walking or
//! mutating a tour.

mod iter;
#[allow(clippy::module_inception)]
mod tour;
mod view;

pub use iter::{Between, Pairs, Triples, Visits};
pub use tour::{Tour, TourShape};
pub use view::{Pair, Shift, Triple};

/// Dense visit identifier in `0..N`. Doubles as an array index.
pub type Visit = usize;

/// Sentinel successor of the tail of an open or fixed tour.
pub const NOT_SET: Visit = usize::MAX;
