//! Problem data consumed by the tour engine.

use crate::capacity::Capacity;
use crate::distance::DistanceMatrix;
use crate::tour::Visit;

/// Cost and capacity data the engine reads.
///
/// Implementations supply travel costs between visits, per-visit costs and
/// the capacity every tour must respect. Travel costs may be asymmetric.
///
/// # Examples
///
/// ```
/// use u_tours::capacity::Capacity;
/// use u_tours::models::Problem;
/// use u_tours::tour::Visit;
///
/// struct Line {
///     capacity: Capacity,
/// }
///
/// impl Problem for Line {
///     fn num_visits(&self) -> usize { 5 }
///     fn travel_cost(&self, from: Visit, to: Visit) -> f64 {
///         (from as f64 - to as f64).abs()
///     }
///     fn capacity(&self) -> &Capacity { &self.capacity }
/// }
///
/// let line = Line { capacity: Capacity::unlimited() };
/// assert_eq!(line.travel_cost(1, 4), 3.0);
/// assert_eq!(line.visit_cost(2), 0.0);
/// ```
pub trait Problem: Send + Sync {
    /// Size of the visit universe; valid ids are `0..num_visits()`.
    fn num_visits(&self) -> usize;

    /// Cost of travelling from `from` to `to`.
    fn travel_cost(&self, from: Visit, to: Visit) -> f64;

    /// Cost of serving `visit`. Defaults to zero.
    fn visit_cost(&self, _visit: Visit) -> f64 {
        0.0
    }

    /// Ceilings every tour must respect.
    fn capacity(&self) -> &Capacity;
}

/// A [`Problem`] backed by a dense matrix and a per-visit cost vector.
///
/// # Examples
///
/// ```
/// use u_tours::capacity::Capacity;
/// use u_tours::distance::DistanceMatrix;
/// use u_tours::models::{MatrixProblem, Problem};
///
/// let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (3.0, 4.0)]);
/// let problem = MatrixProblem::new(dm, Capacity::new(100.0))
///     .with_visit_costs(vec![0.0, 2.0]);
/// assert_eq!(problem.num_visits(), 2);
/// assert!((problem.travel_cost(0, 1) - 5.0).abs() < 1e-10);
/// assert_eq!(problem.visit_cost(1), 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct MatrixProblem {
    distances: DistanceMatrix,
    visit_costs: Vec<f64>,
    capacity: Capacity,
}

impl MatrixProblem {
    /// Creates a problem with zero visit costs.
    pub fn new(distances: DistanceMatrix, capacity: Capacity) -> Self {
        let visit_costs = vec![0.0; distances.size()];
        Self {
            distances,
            visit_costs,
            capacity,
        }
    }

    /// Sets per-visit costs. Missing entries count as zero.
    pub fn with_visit_costs(mut self, visit_costs: Vec<f64>) -> Self {
        self.visit_costs = visit_costs;
        self
    }

    /// The underlying travel-cost matrix.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }
}

impl Problem for MatrixProblem {
    fn num_visits(&self) -> usize {
        self.distances.size()
    }

    fn travel_cost(&self, from: Visit, to: Visit) -> f64 {
        self.distances.get(from, to)
    }

    fn visit_cost(&self, visit: Visit) -> f64 {
        self.visit_costs.get(visit).copied().unwrap_or(0.0)
    }

    fn capacity(&self) -> &Capacity {
        &self.capacity
    }
}
