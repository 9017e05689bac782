//! Whole-tour cost computation.

use crate::models::Problem;
use crate::tour::{Tour, Visit, NOT_SET};

/// Travel cost of an edge as it counts inside a tour.
///
/// Edges into or out of [`NOT_SET`] and the self-edge of a closed
/// single-visit tour cost nothing.
pub fn edge_cost<P: Problem + ?Sized>(problem: &P, from: Visit, to: Visit) -> f64 {
    if from == NOT_SET || to == NOT_SET || from == to {
        0.0
    } else {
        problem.travel_cost(from, to)
    }
}

/// Total cost of a tour.
///
/// Sums `visit_cost(from) + travel_cost(from, to)` over every pair, plus the
/// visit cost of the tail of an open or fixed tour. A closed single-visit
/// tour costs its visit cost.
///
/// # Examples
///
/// ```
/// use u_tours::capacity::Capacity;
/// use u_tours::distance::DistanceMatrix;
/// use u_tours::evaluation::tour_cost;
/// use u_tours::models::MatrixProblem;
/// use u_tours::tour::Tour;
///
/// let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)]);
/// let problem = MatrixProblem::new(dm, Capacity::unlimited());
///
/// let closed = Tour::closed(3, &[0, 1, 2]).unwrap();
/// assert!((tour_cost(&problem, &closed) - 20.0).abs() < 1e-10);
///
/// let open = Tour::open(3, &[0, 1, 2]).unwrap();
/// assert!((tour_cost(&problem, &open) - 10.0).abs() < 1e-10);
/// ```
pub fn tour_cost<P: Problem + ?Sized>(problem: &P, tour: &Tour) -> f64 {
    let mut cost = 0.0;
    let mut tail = tour.first();
    for pair in tour.pairs() {
        cost += problem.visit_cost(pair.from) + problem.travel_cost(pair.from, pair.to);
        tail = pair.to;
    }
    if !tour.is_closed() || tour.count() == 1 {
        cost += problem.visit_cost(tail);
    }
    cost
}

/// Running cost totals indexed by tour position.
///
/// `cum[0] = 0` and `cum[i + 1] = cum[i] + visit_cost(v_i) + travel(v_i, v_{i+1})`,
/// so the cost of walking from position `a` to position `b` is
/// `cum[b] - cum[a]`. A closed tour gets one extra entry for the edge back
/// to `first`; an open tour's total is `cum[n - 1]` plus its tail's visit
/// cost.
///
/// A caller-facing utility for repeated range queries on one tour. The move
/// operators do not use it: [`sequences_of_size`](super::sequences_of_size)
/// slides its own aggregates, which also cover the reversed direction.
pub fn cumulative_cost<P: Problem + ?Sized>(problem: &P, tour: &Tour) -> Vec<f64> {
    let mut cum = Vec::with_capacity(tour.count() + 1);
    let mut running = 0.0;
    cum.push(running);
    for pair in tour.pairs() {
        running += problem.visit_cost(pair.from) + problem.travel_cost(pair.from, pair.to);
        cum.push(running);
    }
    cum
}

/// Cost of walking from position `from` to position `to` given the output of
/// [`cumulative_cost`].
///
/// # Panics
///
/// Panics if either position is past the end of `cum`.
pub fn window_cost(cum: &[f64], from: usize, to: usize) -> f64 {
    cum[to] - cum[from]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capacity::Capacity;
    use crate::distance::DistanceMatrix;
    use crate::models::MatrixProblem;

    fn line_problem() -> MatrixProblem {
        // Visits on a line at x = 0, 1, 2, 3, 4 with visit cost 0.5 each.
        let points: Vec<(f64, f64)> = (0..5).map(|i| (i as f64, 0.0)).collect();
        MatrixProblem::new(DistanceMatrix::from_points(&points), Capacity::unlimited())
            .with_visit_costs(vec![0.5; 5])
    }

    #[test]
    fn test_tour_cost_shapes() {
        let problem = line_problem();
        let closed = Tour::closed(5, &[0, 1, 2, 3]).expect("valid");
        // 1 + 1 + 1 + 3 travel, 4 visits
        assert!((tour_cost(&problem, &closed) - 8.0).abs() < 1e-10);

        let open = Tour::open(5, &[0, 1, 2, 3]).expect("valid");
        assert!((tour_cost(&problem, &open) - 5.0).abs() < 1e-10);

        let fixed = Tour::new(5, &[0, 2], Some(4)).expect("valid");
        assert!((tour_cost(&problem, &fixed) - 5.5).abs() < 1e-10);
    }

    #[test]
    fn test_tour_cost_single_visit() {
        let problem = line_problem();
        let closed = Tour::closed(5, &[3]).expect("valid");
        assert!((tour_cost(&problem, &closed) - 0.5).abs() < 1e-10);
        let open = Tour::open(5, &[3]).expect("valid");
        assert!((tour_cost(&problem, &open) - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_cumulative_cost() {
        let problem = line_problem();
        let closed = Tour::closed(5, &[0, 2, 4]).expect("valid");
        let cum = cumulative_cost(&problem, &closed);
        assert_eq!(cum.len(), 4);
        assert!((cum[1] - 2.5).abs() < 1e-10);
        assert!((cum[3] - tour_cost(&problem, &closed)).abs() < 1e-10);
        assert!((window_cost(&cum, 1, 2) - 2.5).abs() < 1e-10);

        let open = Tour::open(5, &[0, 2, 4]).expect("valid");
        let cum = cumulative_cost(&problem, &open);
        assert_eq!(cum.len(), 3);
        assert!((cum[2] + 0.5 - tour_cost(&problem, &open)).abs() < 1e-10);
    }

    #[test]
    fn test_edge_cost_sentinels() {
        let problem = line_problem();
        assert_eq!(edge_cost(&problem, 2, NOT_SET), 0.0);
        assert_eq!(edge_cost(&problem, NOT_SET, 2), 0.0);
        assert_eq!(edge_cost(&problem, 2, 2), 0.0);
        assert!((edge_cost(&problem, 1, 4) - 3.0).abs() < 1e-10);
    }
}
