//! Inter-tour single-visit exchange.
//!
//! # Algorithm
//!
//! Swaps the centres of two fixed triples, one per tour. Nothing is searched:
//! both positions are given, so the delta comes straight from the four edges
//! around the two visits.
//!
//! # Complexity
//!
//! O(1) per candidate plus the constraint checks.

use tracing::trace;

use super::operator::{triple_is_current, Operator, DEFAULT_EPSILON};
use crate::evaluation::edge_cost;
use crate::models::{Problem, Solution};
use crate::tour::{Tour, Triple, Visit};

/// Swaps `first.along` (in tour `tours.0`) with `second.along` (in `tours.1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swap {
    /// The two tours.
    pub tours: (usize, usize),
    /// A visit of the first tour with its neighbours.
    pub first: Triple,
    /// A visit of the second tour with its neighbours.
    pub second: Triple,
}

/// Single-visit exchange between two tours.
///
/// # Examples
///
/// ```
/// use u_tours::capacity::Capacity;
/// use u_tours::distance::DistanceMatrix;
/// use u_tours::local_search::{Exchange, Operator, Swap};
/// use u_tours::models::{MatrixProblem, Solution};
/// use u_tours::tour::{Tour, Triple, NOT_SET};
///
/// let points = [(0.0, 0.0), (1.0, 0.0), (10.0, 0.0), (11.0, 0.0), (2.0, 0.0), (12.0, 0.0)];
/// let problem = MatrixProblem::new(DistanceMatrix::from_points(&points), Capacity::unlimited());
/// let mut sol = Solution::from_tours(&problem, vec![
///     Tour::open(6, &[0, 1, 5]).unwrap(),
///     Tour::open(6, &[2, 3, 4]).unwrap(),
/// ]);
///
/// let swap = Swap {
///     tours: (0, 1),
///     first: Triple::new(1, 5, NOT_SET),
///     second: Triple::new(3, 4, NOT_SET),
/// };
/// let delta = Exchange::default().apply(&problem, &mut sol, &swap).unwrap();
/// assert!((delta - 18.0).abs() < 1e-10);
/// assert_eq!(sol.tour(0).visits(), vec![0, 1, 4]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Exchange {
    epsilon: f64,
}

impl Exchange {
    /// Creates the operator with an improvement threshold.
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }
}

impl Default for Exchange {
    fn default() -> Self {
        Self::new(DEFAULT_EPSILON)
    }
}

/// Cost saved in a tour when `old.along` is replaced by `incoming` in place.
fn replacement_gain(problem: &dyn Problem, old: &Triple, incoming: Visit) -> f64 {
    edge_cost(problem, old.from, old.along) + edge_cost(problem, old.along, old.to)
        + problem.visit_cost(old.along)
        - edge_cost(problem, old.from, incoming)
        - edge_cost(problem, incoming, old.to)
        - problem.visit_cost(incoming)
}

fn replace(tour: &mut Tour, old: &Triple, incoming: Visit) {
    tour.detach(old.along);
    tour.replace_edge_from(incoming, old.to);
    tour.replace_edge_from(old.from, incoming);
}

impl Operator for Exchange {
    type Candidate = Swap;

    fn name(&self) -> &'static str {
        "exchange"
    }

    fn apply(
        &self,
        problem: &dyn Problem,
        solution: &mut Solution,
        candidate: &Swap,
    ) -> Option<f64> {
        let Swap {
            tours: (i, j),
            first,
            second,
        } = *candidate;
        if i == j
            || !triple_is_current(solution.tour(i), &first)
            || !triple_is_current(solution.tour(j), &second)
        {
            return None;
        }

        let gain_1 = replacement_gain(problem, &first, second.along);
        let gain_2 = replacement_gain(problem, &second, first.along);
        let difference = gain_1 + gain_2;
        if difference <= self.epsilon {
            return None;
        }

        let capacity = problem.capacity();
        let weight_1 = solution.content(i).weight() - gain_1;
        let weight_2 = solution.content(j).weight() - gain_2;
        if !capacity.admits_weight(weight_1) || !capacity.admits_weight(weight_2) {
            return None;
        }
        if !capacity.exchange_is_possible(solution.content(i), &[first.along], &[second.along])
            || !capacity.exchange_is_possible(solution.content(j), &[second.along], &[first.along])
        {
            return None;
        }

        let ((t1, c1), (t2, c2)) = solution.pair_mut(i, j);
        replace(t1, &first, second.along);
        replace(t2, &second, first.along);
        capacity.update_exchange(c1, &[first.along], &[second.along]);
        capacity.update_exchange(c2, &[second.along], &[first.along]);
        c1.set_weight(weight_1);
        c2.set_weight(weight_2);
        debug_assert!(t1.verify().is_ok() && t2.verify().is_ok());

        trace!(
            operator = self.name(),
            tour_1 = i,
            tour_2 = j,
            visit_1 = first.along,
            visit_2 = second.along,
            delta = difference,
            "applied move"
        );
        Some(difference)
    }
}
