//! Cheapest-insertion scans.

use super::cost::edge_cost;
use super::Seq;
use crate::models::Problem;
use crate::tour::{Pair, Tour, TourShape, Visit, NOT_SET};

/// Where a visit would be spliced in and what it would add to the tour cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Insertion {
    /// Visit that would precede the inserted one.
    pub from: Visit,
    /// Visit that would follow it ([`NOT_SET`] when appending to an open tail).
    pub to: Visit,
    /// Extra tour cost, visit cost included.
    pub cost: f64,
}

/// Where a [`Seq`] would be spliced in, in which orientation, and at what cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequenceInsertion {
    /// Visit that would precede the sequence.
    pub from: Visit,
    /// Visit that would follow it.
    pub to: Visit,
    /// Extra tour cost, visit costs included.
    pub cost: f64,
    /// Whether the sequence goes in back to front.
    pub reversed: bool,
}

/// Edges a visit may be inserted into.
///
/// All pairs, plus the open tail (`tail → NOT_SET`) and the self-edge of a
/// closed single-visit tour. Nothing may follow a fixed last visit.
pub fn insertion_edges(tour: &Tour) -> impl Iterator<Item = Pair> + '_ {
    let extra = match tour.shape() {
        TourShape::Open => Some(Pair::new(tour.tail(), NOT_SET)),
        TourShape::Closed if tour.count() == 1 => Some(Pair::new(tour.first(), tour.first())),
        _ => None,
    };
    tour.pairs().chain(extra)
}

/// Extra cost of splicing `visit` between `from` and `to`.
pub fn insertion_cost<P: Problem + ?Sized>(
    problem: &P,
    from: Visit,
    to: Visit,
    visit: Visit,
) -> f64 {
    edge_cost(problem, from, visit) + edge_cost(problem, visit, to) - edge_cost(problem, from, to)
        + problem.visit_cost(visit)
}

/// Finds the cheapest edge of `tour` to splice `visit` into. O(tour size).
///
/// Returns `None` if `visit` is already in the tour or the tour offers no
/// edge.
///
/// # Examples
///
/// ```
/// use u_tours::capacity::Capacity;
/// use u_tours::distance::DistanceMatrix;
/// use u_tours::evaluation::cheapest_insertion;
/// use u_tours::models::MatrixProblem;
/// use u_tours::tour::Tour;
///
/// let points = [(0.0, 0.0), (2.0, 0.0), (4.0, 0.0), (1.0, 1.0)];
/// let problem = MatrixProblem::new(DistanceMatrix::from_points(&points), Capacity::unlimited());
/// let tour = Tour::open(4, &[0, 1, 2]).unwrap();
///
/// let best = cheapest_insertion(&problem, &tour, 3).unwrap();
/// assert_eq!((best.from, best.to), (0, 1));
/// ```
pub fn cheapest_insertion<P: Problem + ?Sized>(
    problem: &P,
    tour: &Tour,
    visit: Visit,
) -> Option<Insertion> {
    if tour.contains(visit) {
        return None;
    }
    insertion_edges(tour)
        .map(|edge| Insertion {
            from: edge.from,
            to: edge.to,
            cost: insertion_cost(problem, edge.from, edge.to, visit),
        })
        .min_by(|a, b| a.cost.total_cmp(&b.cost))
}

/// Picks the visit from `pool` with the cheapest insertion into `tour`.
pub fn cheapest_insertion_any<P: Problem + ?Sized>(
    problem: &P,
    tour: &Tour,
    pool: &[Visit],
) -> Option<(Visit, Insertion)> {
    cheapest_insertion_any_by(problem, tour, pool, |_, _| true)
}

/// Like [`cheapest_insertion_any`], skipping candidates `accept` rejects.
///
/// `accept` sees each visit with its cheapest insertion; construction
/// heuristics use it for capacity checks.
pub fn cheapest_insertion_any_by<P, F>(
    problem: &P,
    tour: &Tour,
    pool: &[Visit],
    mut accept: F,
) -> Option<(Visit, Insertion)>
where
    P: Problem + ?Sized,
    F: FnMut(Visit, &Insertion) -> bool,
{
    pool.iter()
        .filter_map(|&visit| {
            cheapest_insertion(problem, tour, visit).map(|insertion| (visit, insertion))
        })
        .filter(|(visit, insertion)| accept(*visit, insertion))
        .min_by(|a, b| a.1.cost.total_cmp(&b.1.cost))
}

/// Extra cost of splicing `seq` between `from` and `to`, in its cheaper
/// orientation. Returns `(cost, reversed)`.
pub fn sequence_insertion_cost<P: Problem + ?Sized>(
    problem: &P,
    from: Visit,
    to: Visit,
    seq: &Seq,
) -> (f64, bool) {
    let removed = edge_cost(problem, from, to);
    let forward = edge_cost(problem, from, seq.head())
        + seq.between()
        + edge_cost(problem, seq.tail(), to)
        - removed
        + seq.between_visit_cost();
    let backward = edge_cost(problem, from, seq.tail())
        + seq.between_reversed()
        + edge_cost(problem, seq.head(), to)
        - removed
        + seq.between_visit_cost();
    if backward < forward {
        (backward, true)
    } else {
        (forward, false)
    }
}

/// Finds the cheapest edge and orientation of `tour` to splice `seq` into.
///
/// Returns `None` if the tour already holds the sequence's head or offers no
/// edge.
pub fn cheapest_sequence_insertion<P: Problem + ?Sized>(
    problem: &P,
    tour: &Tour,
    seq: &Seq,
) -> Option<SequenceInsertion> {
    if tour.contains(seq.head()) {
        return None;
    }
    insertion_edges(tour)
        .map(|edge| {
            let (cost, reversed) = sequence_insertion_cost(problem, edge.from, edge.to, seq);
            SequenceInsertion {
                from: edge.from,
                to: edge.to,
                cost,
                reversed,
            }
        })
        .min_by(|a, b| a.cost.total_cmp(&b.cost))
}
