//! Lazy walks over a tour's successor map.
//!
//! Every walker is bounded by the tour's visit count, so a corrupted map can
//! never make them loop forever.

use super::{Pair, Triple, Visit, NOT_SET};

/// Visits of a tour in order, starting at `first`.
#[derive(Debug, Clone)]
pub struct Visits<'a> {
    successors: &'a [Visit],
    current: Visit,
    remaining: usize,
}

impl<'a> Visits<'a> {
    pub(crate) fn new(successors: &'a [Visit], first: Visit, count: usize) -> Self {
        Self {
            successors,
            current: first,
            remaining: count,
        }
    }
}

impl Iterator for Visits<'_> {
    type Item = Visit;

    fn next(&mut self) -> Option<Visit> {
        if self.remaining == 0 || self.current == NOT_SET {
            return None;
        }
        let visit = self.current;
        self.current = self.successors[visit];
        self.remaining -= 1;
        Some(visit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

/// Visits walked forward from one visit through another, inclusive.
///
/// Wraps through the seam of a closed tour. Not restartable.
#[derive(Debug, Clone)]
pub struct Between<'a> {
    successors: &'a [Visit],
    current: Visit,
    target: Visit,
    remaining: usize,
}

impl<'a> Between<'a> {
    pub(crate) fn new(successors: &'a [Visit], from: Visit, to: Visit, count: usize) -> Self {
        Self {
            successors,
            current: from,
            target: to,
            remaining: count,
        }
    }

    pub(crate) fn empty(successors: &'a [Visit]) -> Self {
        Self {
            successors,
            current: NOT_SET,
            target: NOT_SET,
            remaining: 0,
        }
    }
}

impl Iterator for Between<'_> {
    type Item = Visit;

    fn next(&mut self) -> Option<Visit> {
        if self.remaining == 0 || self.current == NOT_SET {
            return None;
        }
        let visit = self.current;
        self.remaining -= 1;
        if visit == self.target {
            self.remaining = 0;
        } else {
            self.current = self.successors[visit];
        }
        Some(visit)
    }
}

/// Consecutive edges of a tour, including the closing edge of a closed tour.
#[derive(Debug, Clone)]
pub struct Pairs<'a> {
    visits: Visits<'a>,
}

impl<'a> Pairs<'a> {
    pub(crate) fn new(visits: Visits<'a>) -> Self {
        Self { visits }
    }
}

impl Iterator for Pairs<'_> {
    type Item = Pair;

    fn next(&mut self) -> Option<Pair> {
        let from = self.visits.next()?;
        let to = self.visits.successors[from];
        if to == NOT_SET {
            return None;
        }
        Some(Pair::new(from, to))
    }
}

/// Every interior visit with its two neighbours.
///
/// Closed tours also yield the triples centred on their last and first
/// visits.
#[derive(Debug, Clone)]
pub struct Triples<'a> {
    successors: &'a [Visit],
    previous: Visit,
    current: Visit,
    remaining: usize,
}

impl<'a> Triples<'a> {
    pub(crate) fn new(successors: &'a [Visit], first: Visit, remaining: usize) -> Self {
        let current = if remaining == 0 {
            NOT_SET
        } else {
            successors[first]
        };
        Self {
            successors,
            previous: first,
            current,
            remaining,
        }
    }
}

impl Iterator for Triples<'_> {
    type Item = Triple;

    fn next(&mut self) -> Option<Triple> {
        if self.remaining == 0 || self.current == NOT_SET {
            return None;
        }
        let next = self.successors[self.current];
        let triple = Triple::new(self.previous, self.current, next);
        self.previous = self.current;
        self.current = next;
        self.remaining -= 1;
        Some(triple)
    }
}
