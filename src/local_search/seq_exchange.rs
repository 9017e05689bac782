//! Inter-tour sequence exchange.
//!
//! # Algorithm
//!
//! Swaps two [`Seq`] windows between tours, each landing in the other's slot
//! in whichever orientation is cheaper there. Window lengths may differ.
//! Weights are updated incrementally from the two local deltas.

use tracing::trace;

use super::operator::{cut, normalize_for, seq_is_movable, splice, Operator, DEFAULT_EPSILON};
use crate::evaluation::{sequence_insertion_cost, Seq};
use crate::models::{Problem, Solution};
use crate::tour::Tour;

/// Swaps window `first` (in tour `tours.0`) with window `second` (in `tours.1`).
#[derive(Debug, Clone, PartialEq)]
pub struct SeqSwap {
    /// The two tours.
    pub tours: (usize, usize),
    /// A window of the first tour.
    pub first: Seq,
    /// A window of the second tour.
    pub second: Seq,
}

/// Sequence exchange between two tours.
#[derive(Debug, Clone, Copy)]
pub struct SeqExchange {
    epsilon: f64,
}

impl SeqExchange {
    /// Creates the operator with an improvement threshold.
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }
}

impl Default for SeqExchange {
    fn default() -> Self {
        Self::new(DEFAULT_EPSILON)
    }
}

/// Cost saved when `old` is replaced by `incoming`; also returns whether
/// `incoming` goes in reversed.
fn replacement_gain(problem: &dyn Problem, old: &Seq, incoming: &Seq) -> (f64, bool) {
    let (cost, reversed) = sequence_insertion_cost(problem, old.from(), old.to(), incoming);
    (old.removal_gain(problem) - cost, reversed)
}

fn replace(tour: &mut Tour, old: &Seq, incoming: &Seq, reversed: bool) -> Option<()> {
    normalize_for(tour, old)?;
    cut(tour, old.from(), old.visits(), old.to());
    splice(tour, old.from(), incoming.visits(), reversed, old.to());
    Some(())
}

impl Operator for SeqExchange {
    type Candidate = SeqSwap;

    fn name(&self) -> &'static str {
        "seq-exchange"
    }

    fn apply(
        &self,
        problem: &dyn Problem,
        solution: &mut Solution,
        candidate: &SeqSwap,
    ) -> Option<f64> {
        let (i, j) = candidate.tours;
        let (first, second) = (&candidate.first, &candidate.second);
        if i == j
            || !seq_is_movable(solution.tour(i), first)
            || !seq_is_movable(solution.tour(j), second)
        {
            return None;
        }

        let (gain_1, reversed_1) = replacement_gain(problem, first, second);
        let (gain_2, reversed_2) = replacement_gain(problem, second, first);
        let difference = gain_1 + gain_2;
        if difference <= self.epsilon {
            return None;
        }

        let capacity = problem.capacity();
        let weight_1 = solution.content(i).weight() - gain_1;
        let weight_2 = solution.content(j).weight() - gain_2;
        if !capacity.admits_weight(weight_1)
            || !capacity.admits_weight(weight_2)
            || !capacity.exchange_is_possible(solution.content(i), first.visits(), second.visits())
            || !capacity.exchange_is_possible(solution.content(j), second.visits(), first.visits())
        {
            return None;
        }

        let ((t1, c1), (t2, c2)) = solution.pair_mut(i, j);
        replace(t1, first, second, reversed_1)?;
        replace(t2, second, first, reversed_2)?;
        capacity.update_exchange(c1, first.visits(), second.visits());
        capacity.update_exchange(c2, second.visits(), first.visits());
        c1.set_weight(weight_1);
        c2.set_weight(weight_2);
        debug_assert!(t1.verify().is_ok() && t2.verify().is_ok());

        trace!(
            operator = self.name(),
            tour_1 = i,
            tour_2 = j,
            len_1 = first.len(),
            len_2 = second.len(),
            delta = difference,
            "applied move"
        );
        Some(difference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capacity::{Capacity, Constraint};
    use crate::distance::DistanceMatrix;
    use crate::evaluation::{sequences_of_size, tour_cost};
    use crate::local_search::fixtures::{any_shape, asymmetric_costs, shaped_tour};
    use crate::models::MatrixProblem;
    use proptest::prelude::*;

    fn two_lines(capacity: Capacity) -> MatrixProblem {
        let points = [
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (3.0, 0.0),
            (0.0, 10.0),
            (1.0, 10.0),
            (2.0, 10.0),
            (3.0, 10.0),
        ];
        MatrixProblem::new(DistanceMatrix::from_points(&points), capacity)
            .with_visit_costs(vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8])
    }

    fn crossed(problem: &MatrixProblem) -> Solution {
        // Visits 1, 2 belong on the lower line and 5, 6 on the upper one.
        Solution::from_tours(
            problem,
            vec![
                Tour::closed(8, &[0, 5, 6, 3]).expect("valid"),
                Tour::closed(8, &[4, 1, 2, 7]).expect("valid"),
            ],
        )
    }

    fn total_cost(problem: &MatrixProblem, sol: &Solution) -> f64 {
        sol.tours().iter().map(|t| tour_cost(problem, t)).sum()
    }

    fn crossed_swap(problem: &MatrixProblem, sol: &Solution) -> SeqSwap {
        SeqSwap {
            tours: (0, 1),
            first: Seq::new(problem, sol.tour(0), 5, 2).expect("seq"),
            second: Seq::new(problem, sol.tour(1), 1, 2).expect("seq"),
        }
    }

    #[test]
    fn test_seq_exchange_uncrosses() {
        let problem = two_lines(Capacity::unlimited());
        let mut sol = crossed(&problem);
        let before = total_cost(&problem, &sol);
        let swap = crossed_swap(&problem, &sol);
        let delta = SeqExchange::default()
            .apply(&problem, &mut sol, &swap)
            .expect("improving");
        assert!((before - total_cost(&problem, &sol) - delta).abs() < 1e-9);
        assert_eq!(sol.tour(0).visits(), vec![0, 1, 2, 3]);
        assert_eq!(sol.tour(1).visits(), vec![4, 5, 6, 7]);
        for (tour, content) in sol.tours().iter().zip(sol.contents()) {
            assert!((tour_cost(&problem, tour) - content.weight()).abs() < 1e-9);
        }
        assert!(sol.verify().is_ok());
    }

    #[test]
    fn test_seq_exchange_rejects_constraint() {
        let capacity = Capacity::unlimited().with_constraint(Constraint::new(
            "volume",
            vec![1.0, 5.0, 5.0, 1.0, 1.0, 1.0, 1.0, 1.0],
            8.0,
        ));
        let problem = two_lines(capacity);
        let mut sol = crossed(&problem);
        let snapshot = sol.clone();
        let swap = crossed_swap(&problem, &sol);
        assert!(SeqExchange::default()
            .apply(&problem, &mut sol, &swap)
            .is_none());
        assert_eq!(sol.tours(), snapshot.tours());
        assert_eq!(sol.contents(), snapshot.contents());
    }

    #[test]
    fn test_seq_exchange_rejects_worsening() {
        let problem = two_lines(Capacity::unlimited());
        let mut sol = Solution::from_tours(
            &problem,
            vec![
                Tour::closed(8, &[0, 1, 2, 3]).expect("valid"),
                Tour::closed(8, &[4, 5, 6, 7]).expect("valid"),
            ],
        );
        let swap = SeqSwap {
            tours: (0, 1),
            first: Seq::new(&problem, sol.tour(0), 1, 2).expect("seq"),
            second: Seq::new(&problem, sol.tour(1), 5, 2).expect("seq"),
        };
        assert!(SeqExchange::default()
            .apply(&problem, &mut sol, &swap)
            .is_none());
    }

    #[test]
    fn test_seq_exchange_wrapping_window() {
        let problem = two_lines(Capacity::unlimited());
        let mut sol = Solution::from_tours(
            &problem,
            vec![
                Tour::closed(8, &[5, 1, 2, 4]).expect("valid"),
                Tour::closed(8, &[0, 6, 7, 3]).expect("valid"),
            ],
        );
        // [4, 5] straddles the seam of tour 0.
        let swap = SeqSwap {
            tours: (0, 1),
            first: Seq::new(&problem, sol.tour(0), 4, 2).expect("seq"),
            second: Seq::new(&problem, sol.tour(1), 3, 2).expect("seq"),
        };
        assert!(swap.first.wraps() && swap.second.wraps());
        let before = total_cost(&problem, &sol);
        let delta = SeqExchange::default()
            .apply(&problem, &mut sol, &swap)
            .expect("improving");
        assert!((before - total_cost(&problem, &sol) - delta).abs() < 1e-9);
        let mut lower = sol.tour(0).visits();
        lower.sort_unstable();
        assert_eq!(lower, vec![0, 1, 2, 3]);
        assert!(sol.verify().is_ok());
    }

    proptest! {
        #[test]
        fn prop_seq_exchange_delta_matches_recomputation(
            dm in asymmetric_costs(12),
            split in 4usize..8,
            shape in any_shape(),
            wrap in any::<bool>(),
        ) {
            let problem = MatrixProblem::new(dm, Capacity::unlimited());
            let order: Vec<usize> = (0..12).collect();
            let mut sol = Solution::from_tours(&problem, vec![
                shaped_tour(12, &order[..split], shape),
                shaped_tour(12, &order[split..], shape),
            ]);
            let op = SeqExchange::default();
            let left: Vec<Seq> =
                sequences_of_size(&problem, sol.tour(0), 2, 3, wrap, false).collect();
            let right: Vec<Seq> =
                sequences_of_size(&problem, sol.tour(1), 2, 3, wrap, false).collect();
            for first in &left {
                for second in &right {
                    let before = total_cost(&problem, &sol);
                    let swap = SeqSwap {
                        tours: (0, 1),
                        first: first.clone(),
                        second: second.clone(),
                    };
                    if let Some(delta) = op.apply(&problem, &mut sol, &swap) {
                        prop_assert!(delta > 0.0);
                        prop_assert!((before - total_cost(&problem, &sol) - delta).abs() < 1e-6);
                        for (tour, content) in sol.tours().iter().zip(sol.contents()) {
                            let fresh = tour_cost(&problem, tour);
                            prop_assert!((fresh - content.weight()).abs() < 1e-6);
                            prop_assert_eq!(tour.shape(), shape);
                        }
                        prop_assert!(sol.verify().is_ok());
                    }
                }
            }
        }
    }
}
