//! Cheapest-insertion construction.
//!
//! Opens one tour per start, then repeatedly performs the cheapest feasible
//! insertion of any pool visit into any tour. Visits that fit nowhere end up
//! unassigned.
//!
//! # Complexity
//!
//! O(n² × T × m) for n pool visits, T tours of up to m visits.
//!
//! # Reference
//!
//! Rosenkrantz, D. J., Stearns, R. E., & Lewis, P. M. (1977). "An Analysis
//! of Several Heuristics for the Traveling Salesman Problem". SIAM Journal
//! on Computing, 6(3), 563-581.

use tracing::{debug, trace};

use crate::error::{Result, TourError};
use crate::evaluation::{cheapest_insertion_any_by, Insertion};
use crate::models::{Problem, Solution};
use crate::tour::Visit;

/// Builds a solution by cheapest insertion.
///
/// `starts` lists one `(first, last)` per tour, with `last` read as in
/// [`Tour::new`](crate::tour::Tour::new): `None` for an open tour,
/// `Some(first)` for a closed one, any other visit for a fixed end. Pool
/// visits already used as a start or end are skipped.
///
/// # Errors
///
/// The errors of [`Solution::add_new`] for invalid or repeated starts.
///
/// # Examples
///
/// ```
/// use u_tours::capacity::{Capacity, Constraint};
/// use u_tours::constructive::cheapest_insertion_build;
/// use u_tours::distance::DistanceMatrix;
/// use u_tours::models::MatrixProblem;
///
/// let points = [(0.0, 0.0), (10.0, 0.0), (1.0, 0.0), (2.0, 0.0), (11.0, 0.0), (12.0, 0.0)];
/// let capacity = Capacity::unlimited()
///     .with_constraint(Constraint::new("load", vec![0.0, 0.0, 1.0, 1.0, 1.0, 1.0], 2.0));
/// let problem = MatrixProblem::new(DistanceMatrix::from_points(&points), capacity);
///
/// let starts = [(0, Some(0)), (1, Some(1))];
/// let sol = cheapest_insertion_build(&problem, &starts, &[2, 3, 4, 5]).unwrap();
/// assert_eq!(sol.num_served(), 6);
/// assert!(sol.tour(0).contains(2) && sol.tour(1).contains(5));
/// ```
#[tracing::instrument(level = "debug", name = "Cheapest Insertion", skip_all)]
pub fn cheapest_insertion_build(
    problem: &dyn Problem,
    starts: &[(Visit, Option<Visit>)],
    pool: &[Visit],
) -> Result<Solution> {
    let mut solution = Solution::new();
    for &(first, last) in starts {
        solution.add_new(problem, first, last)?;
    }

    let mut remaining: Vec<Visit> = Vec::with_capacity(pool.len());
    for &visit in pool {
        if visit >= problem.num_visits() {
            return Err(TourError::InvalidArgument {
                visit,
                reason: "outside the visit range",
            });
        }
        if solution.tour_of(visit).is_none() && !remaining.contains(&visit) {
            remaining.push(visit);
        }
    }

    let capacity = problem.capacity();
    while !remaining.is_empty() {
        let best = (0..solution.num_tours())
            .filter_map(|index| {
                let content = solution.content(index);
                cheapest_insertion_any_by(problem, solution.tour(index), &remaining, |visit, ins| {
                    capacity.can_add_with_weight(content, content.weight() + ins.cost, &[visit])
                })
                .map(|(visit, insertion)| (index, visit, insertion))
            })
            .min_by(|a, b| a.2.cost.total_cmp(&b.2.cost));

        let Some((index, visit, Insertion { from, cost, .. })) = best else {
            break;
        };
        let (tour, content) = solution.parts_mut(index);
        let weight = content.weight() + cost;
        if !capacity.update_and_check_costs(content, weight, visit) {
            break;
        }
        tour.insert_after(from, visit)?;
        trace!(tour = index, visit, cost, "inserted");

        if let Some(pos) = remaining.iter().position(|&v| v == visit) {
            remaining.remove(pos);
        }
    }

    for &visit in &remaining {
        solution.add_unassigned(visit);
    }
    debug!(
        tours = solution.num_tours(),
        served = solution.num_served(),
        unassigned = solution.num_unassigned(),
        weight = solution.total_weight(),
        "construction finished"
    );
    Ok(solution)
}
