//! Intra-tour single-visit relocation (Or-opt with segment length 1).
//!
//! # Algorithm
//!
//! Takes `along` out of its place and tries every other edge of the same
//! tour, keeping the cheapest. The winning position is applied with a single
//! [`Tour::shift_after`] call.
//!
//! # Complexity
//!
//! O(n) per candidate.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use tracing::trace;

use super::operator::{triple_is_current, Operator, DEFAULT_EPSILON};
use crate::evaluation::{edge_cost, insertion_edges, tour_cost};
use crate::models::{Problem, Solution};
use crate::tour::{Pair, Tour, Triple};

/// Moves `visit.along` elsewhere inside tour `tour`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntraRelocation {
    /// The tour.
    pub tour: usize,
    /// The visit with its current neighbours.
    pub visit: Triple,
}

/// Single-visit relocate within one tour.
///
/// # Examples
///
/// ```
/// use u_tours::capacity::Capacity;
/// use u_tours::distance::DistanceMatrix;
/// use u_tours::local_search::{IntraRelocate, IntraRelocation, Operator};
/// use u_tours::models::{MatrixProblem, Solution};
/// use u_tours::tour::{Tour, Triple};
///
/// let points = [(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)];
/// let problem = MatrixProblem::new(DistanceMatrix::from_points(&points), Capacity::unlimited());
/// let mut sol = Solution::from_tours(&problem, vec![Tour::open(4, &[0, 2, 1, 3]).unwrap()]);
///
/// let candidate = IntraRelocation { tour: 0, visit: Triple::new(0, 2, 1) };
/// let delta = IntraRelocate::default().apply(&problem, &mut sol, &candidate).unwrap();
/// assert!((delta - 2.0).abs() < 1e-10);
/// assert_eq!(sol.tour(0).visits(), vec![0, 1, 2, 3]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct IntraRelocate {
    epsilon: f64,
}

impl IntraRelocate {
    /// Creates the operator with an improvement threshold.
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }
}

impl Default for IntraRelocate {
    fn default() -> Self {
        Self::new(DEFAULT_EPSILON)
    }
}

/// Cheapest edge of `tour` to move `along` into, excluding its own edges.
fn best_target(problem: &dyn Problem, tour: &Tour, along: usize) -> Option<(Pair, f64)> {
    insertion_edges(tour)
        .filter(|edge| edge.from != along && edge.to != along)
        .map(|edge| {
            let cost = edge_cost(problem, edge.from, along) + edge_cost(problem, along, edge.to)
                - edge_cost(problem, edge.from, edge.to);
            (edge, cost)
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

impl Operator for IntraRelocate {
    type Candidate = IntraRelocation;

    fn name(&self) -> &'static str {
        "intra-relocate"
    }

    fn apply(
        &self,
        problem: &dyn Problem,
        solution: &mut Solution,
        candidate: &IntraRelocation,
    ) -> Option<f64> {
        let IntraRelocation { tour: index, visit } = *candidate;
        let tour = solution.tour(index);
        if !triple_is_current(tour, &visit) {
            return None;
        }
        let Triple { from, along, to } = visit;

        let gain = edge_cost(problem, from, along) + edge_cost(problem, along, to)
            - edge_cost(problem, from, to);
        if gain <= self.epsilon {
            return None;
        }
        let (edge, cost) = best_target(problem, tour, along)?;
        let delta = gain - cost;
        if delta <= self.epsilon {
            return None;
        }

        let (tour, content) = solution.parts_mut(index);
        tour.shift_after(along, edge.from).ok()?;
        content.set_weight(tour_cost(problem, tour));
        debug_assert!(tour.verify().is_ok());

        trace!(
            operator = self.name(),
            tour = index,
            along,
            delta,
            "applied move"
        );
        Some(delta)
    }
}
