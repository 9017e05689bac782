//! The operator contract and helpers shared by the move implementations.

use crate::evaluation::Seq;
use crate::models::{Problem, Solution};
use crate::tour::{Tour, Triple, Visit};

/// Default improvement threshold.
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// A move that can be applied to a [`Solution`] for a given candidate.
///
/// `apply` returns `Some(delta)` when it changed the solution, with `delta`
/// the drop in total tour cost (positive is better). `None` means the move
/// was rejected and nothing was touched: not the tours, not the contents.
pub trait Operator {
    /// Describes one concrete move.
    type Candidate;

    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Tries the move.
    fn apply(
        &self,
        problem: &dyn Problem,
        solution: &mut Solution,
        candidate: &Self::Candidate,
    ) -> Option<f64>;
}

/// Applies the first candidate `operator` accepts. Returns its delta.
pub fn first_improvement<O: Operator + ?Sized>(
    operator: &O,
    problem: &dyn Problem,
    solution: &mut Solution,
    candidates: &[O::Candidate],
) -> Option<f64> {
    candidates
        .iter()
        .find_map(|candidate| operator.apply(problem, solution, candidate))
}

/// Triples centred on every visit that may leave its tour.
///
/// `first` and a fixed `last` stay put; the tail of an open tour is included
/// with `to` set to [`NOT_SET`](crate::tour::NOT_SET).
pub fn movable_triples(tour: &Tour) -> Vec<Triple> {
    let visits = tour.visits();
    visits
        .iter()
        .enumerate()
        .skip(1)
        .filter(|&(_, &v)| !tour.is_protected(v))
        .map(|(i, &v)| Triple::new(visits[i - 1], v, tour.neighbour(v)))
        .collect()
}

/// Returns `true` if `triple` still describes `tour` and its centre may move.
pub(crate) fn triple_is_current(tour: &Tour, triple: &Triple) -> bool {
    tour.contains(triple.along)
        && !tour.is_protected(triple.along)
        && tour.contains_edge(triple.from, triple.along)
        && tour.neighbour(triple.along) == triple.to
}

/// Returns `true` if `seq` still describes `tour` and may be cut out of it.
///
/// A sequence holding `first` is only movable when it wraps a closed tour,
/// and never when it would take the whole tour with it.
pub(crate) fn seq_is_movable(tour: &Tour, seq: &Seq) -> bool {
    if !seq.is_current(tour) || seq.len() >= tour.count() {
        return false;
    }
    let protected = seq.visits().iter().any(|&v| tour.is_protected(v));
    !protected || (seq.wraps() && tour.is_closed())
}

/// Moves the seam of a closed tour out of a wrapping sequence.
pub(crate) fn normalize_for(tour: &mut Tour, seq: &Seq) -> Option<()> {
    if seq.wraps() {
        tour.set_first(seq.to()).ok()?;
    }
    Some(())
}

/// Cuts `visits` (contiguous, between `from` and `to`) out of `tour`.
pub(crate) fn cut(tour: &mut Tour, from: Visit, visits: &[Visit], to: Visit) {
    tour.replace_edge_from(from, to);
    for &v in visits {
        tour.detach(v);
    }
}

/// Splices `visits` between `from` and `to`, back to front when `reversed`.
pub(crate) fn splice(tour: &mut Tour, from: Visit, visits: &[Visit], reversed: bool, to: Visit) {
    let ordered: Vec<Visit> = if reversed {
        visits.iter().rev().copied().collect()
    } else {
        visits.to_vec()
    };
    let Some((&last, _)) = ordered.split_last() else {
        return;
    };
    tour.replace_edge_from(last, to);
    for pair in ordered.windows(2).rev() {
        tour.replace_edge_from(pair[0], pair[1]);
    }
    tour.replace_edge_from(from, ordered[0]);
}
