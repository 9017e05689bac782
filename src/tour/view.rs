//! Transient edge views produced while walking a tour.

use super::Visit;

/// A directed edge `from → to` currently present in a tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pair {
    /// Tail of the edge.
    pub from: Visit,
    /// Head of the edge.
    pub to: Visit,
}

impl Pair {
    /// Creates a pair.
    pub fn new(from: Visit, to: Visit) -> Self {
        Self { from, to }
    }
}

/// A visit together with its current predecessor and successor.
///
/// `to` is [`NOT_SET`](super::NOT_SET) when `along` is the tail of an open
/// tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Triple {
    /// Predecessor of `along`.
    pub from: Visit,
    /// The visit itself.
    pub along: Visit,
    /// Successor of `along`.
    pub to: Visit,
}

impl Triple {
    /// Creates a triple.
    pub fn new(from: Visit, along: Visit, to: Visit) -> Self {
        Self { from, along, to }
    }
}

/// Neighbourhood of a visit before and after [`Tour::shift_after`](super::Tour::shift_after).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    /// Predecessor and successor before the move.
    pub old: Triple,
    /// Predecessor and successor after the move.
    pub new: Triple,
}
