//! Inter-tour single-visit relocation.
//!
//! # Algorithm
//!
//! Cuts `along` out of its tour and splices it into the cheapest edge of
//! another tour. The removal gain is checked first, so most hopeless
//! candidates are rejected before the O(n) insertion scan.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use tracing::trace;

use super::operator::{triple_is_current, Operator, DEFAULT_EPSILON};
use crate::evaluation::{cheapest_insertion, edge_cost, tour_cost};
use crate::models::{Problem, Solution};
use crate::tour::Triple;

/// Moves `visit.along` from tour `source` to tour `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relocation {
    /// Tour currently holding the visit.
    pub source: usize,
    /// Tour receiving it.
    pub target: usize,
    /// The visit with its current neighbours in `source`.
    pub visit: Triple,
}

/// Single-visit relocate between two tours.
///
/// # Examples
///
/// ```
/// use u_tours::capacity::Capacity;
/// use u_tours::distance::DistanceMatrix;
/// use u_tours::local_search::{Operator, Relocate, Relocation};
/// use u_tours::models::{MatrixProblem, Solution};
/// use u_tours::tour::{Tour, Triple, NOT_SET};
///
/// let points = [(0.0, 0.0), (1.0, 0.0), (9.0, 0.0), (10.0, 0.0), (11.0, 0.0)];
/// let problem = MatrixProblem::new(DistanceMatrix::from_points(&points), Capacity::unlimited());
/// let mut sol = Solution::from_tours(&problem, vec![
///     Tour::open(5, &[0, 1, 4]).unwrap(),
///     Tour::open(5, &[2, 3]).unwrap(),
/// ]);
///
/// // Visit 4 hangs off the far end of tour 0 but sits right next to tour 1.
/// let candidate = Relocation { source: 0, target: 1, visit: Triple::new(1, 4, NOT_SET) };
/// let delta = Relocate::default().apply(&problem, &mut sol, &candidate).unwrap();
/// assert!((delta - 9.0).abs() < 1e-10);
/// assert_eq!(sol.tour(1).visits(), vec![2, 3, 4]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Relocate {
    epsilon: f64,
}

impl Relocate {
    /// Creates the operator with an improvement threshold.
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }
}

impl Default for Relocate {
    fn default() -> Self {
        Self::new(DEFAULT_EPSILON)
    }
}

impl Operator for Relocate {
    type Candidate = Relocation;

    fn name(&self) -> &'static str {
        "relocate"
    }

    fn apply(
        &self,
        problem: &dyn Problem,
        solution: &mut Solution,
        candidate: &Relocation,
    ) -> Option<f64> {
        let Relocation {
            source,
            target,
            visit,
        } = *candidate;
        if source == target || !triple_is_current(solution.tour(source), &visit) {
            return None;
        }
        let Triple { from, along, to } = visit;

        let gain = edge_cost(problem, from, along) + edge_cost(problem, along, to)
            - edge_cost(problem, from, to)
            + problem.visit_cost(along);
        if gain <= self.epsilon {
            return None;
        }

        let insertion = cheapest_insertion(problem, solution.tour(target), along)?;
        if insertion.cost >= gain - self.epsilon {
            return None;
        }
        let capacity = problem.capacity();
        let content = solution.content(target);
        if !capacity.can_add_with_weight(content, content.weight() + insertion.cost, &[along]) {
            return None;
        }

        let ((t1, c1), (t2, c2)) = solution.pair_mut(source, target);
        t1.replace_edge_from(from, to);
        t1.detach(along);
        t2.replace_edge_from(along, insertion.to);
        t2.replace_edge_from(insertion.from, along);

        capacity.remove(c1, along);
        capacity.add(c2, along);
        c1.set_weight(tour_cost(problem, t1));
        c2.set_weight(tour_cost(problem, t2));
        debug_assert!(t1.verify().is_ok() && t2.verify().is_ok());

        let delta = gain - insertion.cost;
        trace!(
            operator = self.name(),
            source,
            target,
            along,
            delta,
            "applied move"
        );
        Some(delta)
    }
}
