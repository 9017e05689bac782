//! Inter-tour sequence relocation.
//!
//! # Algorithm
//!
//! Generalizes [`Relocate`](super::Relocate) to a [`Seq`] window: cut the
//! window out, splice it into the cheapest edge of another tour in its
//! cheaper orientation. A wrapping window first moves the seam of its closed
//! tour to the visit right after the window.

use tracing::trace;

use super::operator::{cut, normalize_for, seq_is_movable, splice, Operator, DEFAULT_EPSILON};
use crate::evaluation::{cheapest_sequence_insertion, tour_cost, Seq};
use crate::models::{Problem, Solution};

/// Moves the window `seq` from tour `source` to tour `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct SeqRelocation {
    /// Tour currently holding the window.
    pub source: usize,
    /// Tour receiving it.
    pub target: usize,
    /// The window, as enumerated from `source`.
    pub seq: Seq,
}

/// Sequence relocate between two tours.
#[derive(Debug, Clone, Copy)]
pub struct SeqRelocate {
    epsilon: f64,
}

impl SeqRelocate {
    /// Creates the operator with an improvement threshold.
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }
}

impl Default for SeqRelocate {
    fn default() -> Self {
        Self::new(DEFAULT_EPSILON)
    }
}

impl Operator for SeqRelocate {
    type Candidate = SeqRelocation;

    fn name(&self) -> &'static str {
        "seq-relocate"
    }

    fn apply(
        &self,
        problem: &dyn Problem,
        solution: &mut Solution,
        candidate: &SeqRelocation,
    ) -> Option<f64> {
        let (source, target, seq) = (candidate.source, candidate.target, &candidate.seq);
        if source == target || !seq_is_movable(solution.tour(source), seq) {
            return None;
        }

        let gain = seq.removal_gain(problem);
        if gain <= self.epsilon {
            return None;
        }
        let insertion = cheapest_sequence_insertion(problem, solution.tour(target), seq)?;
        if insertion.cost >= gain - self.epsilon {
            return None;
        }
        let capacity = problem.capacity();
        let content = solution.content(target);
        if !capacity.can_add_with_weight(content, content.weight() + insertion.cost, seq.visits()) {
            return None;
        }

        let ((t1, c1), (t2, c2)) = solution.pair_mut(source, target);
        normalize_for(t1, seq)?;
        cut(t1, seq.from(), seq.visits(), seq.to());
        splice(
            t2,
            insertion.from,
            seq.visits(),
            insertion.reversed,
            insertion.to,
        );

        capacity.remove_all(c1, seq.visits());
        capacity.add_all(c2, seq.visits());
        c1.set_weight(tour_cost(problem, t1));
        c2.set_weight(tour_cost(problem, t2));
        debug_assert!(t1.verify().is_ok() && t2.verify().is_ok());

        let delta = gain - insertion.cost;
        trace!(
            operator = self.name(),
            source,
            target,
            len = seq.len(),
            reversed = insertion.reversed,
            delta,
            "applied move"
        );
        Some(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capacity::{Capacity, Constraint};
    use crate::distance::DistanceMatrix;
    use crate::evaluation::sequences_of_size;
    use crate::local_search::fixtures::{any_shape, asymmetric_costs, shaped_tour};
    use crate::models::MatrixProblem;
    use crate::tour::Tour;
    use proptest::prelude::*;

    fn line_problem(capacity: Capacity) -> MatrixProblem {
        // Left cluster 0..=3 near x = 0, right cluster 4..=7 near x = 20.
        let points = [
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (3.0, 0.0),
            (20.0, 0.0),
            (21.0, 0.0),
            (22.0, 0.0),
            (23.0, 0.0),
        ];
        MatrixProblem::new(DistanceMatrix::from_points(&points), capacity)
            .with_visit_costs(vec![0.25; 8])
    }

    fn total_cost(problem: &MatrixProblem, sol: &Solution) -> f64 {
        sol.tours().iter().map(|t| tour_cost(problem, t)).sum()
    }

    fn check_caches(problem: &MatrixProblem, sol: &Solution) {
        for (tour, content) in sol.tours().iter().zip(sol.contents()) {
            assert!((tour_cost(problem, tour) - content.weight()).abs() < 1e-9);
        }
        assert!(sol.verify().is_ok());
    }

    #[test]
    fn test_seq_relocate_moves_window_home() {
        let problem = line_problem(Capacity::unlimited());
        let mut sol = Solution::from_tours(
            &problem,
            vec![
                Tour::closed(8, &[0, 5, 6, 1, 2, 3]).expect("valid"),
                Tour::closed(8, &[4, 7]).expect("valid"),
            ],
        );
        let before = total_cost(&problem, &sol);
        let seq = Seq::new(&problem, sol.tour(0), 5, 2).expect("seq");
        let candidate = SeqRelocation {
            source: 0,
            target: 1,
            seq,
        };
        let delta = SeqRelocate::default()
            .apply(&problem, &mut sol, &candidate)
            .expect("improving");
        assert!((before - total_cost(&problem, &sol) - delta).abs() < 1e-9);
        assert_eq!(sol.tour(0).visits(), vec![0, 1, 2, 3]);
        assert_eq!(sol.tour(1).count(), 4);
        check_caches(&problem, &sol);
    }

    #[test]
    fn test_seq_relocate_reverses_when_cheaper() {
        let problem = line_problem(Capacity::unlimited());
        let mut sol = Solution::from_tours(
            &problem,
            vec![
                Tour::open(8, &[0, 1, 6, 5]).expect("valid"),
                Tour::open(8, &[3, 4]).expect("valid"),
            ],
        );
        let seq = Seq::new(&problem, sol.tour(0), 6, 2).expect("seq");
        let candidate = SeqRelocation {
            source: 0,
            target: 1,
            seq,
        };
        SeqRelocate::default()
            .apply(&problem, &mut sol, &candidate)
            .expect("improving");
        assert_eq!(sol.tour(1).visits(), vec![3, 4, 5, 6]);
        check_caches(&problem, &sol);
    }

    #[test]
    fn test_seq_relocate_wrapping_window() {
        let problem = line_problem(Capacity::unlimited());
        let mut sol = Solution::from_tours(
            &problem,
            vec![
                Tour::closed(8, &[5, 1, 2, 6]).expect("valid"),
                Tour::closed(8, &[4, 7]).expect("valid"),
            ],
        );
        // [6, 5] holds the seam; moving it out rotates tour 0 to start at 1.
        let seq = Seq::new(&problem, sol.tour(0), 6, 2).expect("seq");
        assert!(seq.wraps());
        let before = total_cost(&problem, &sol);
        let candidate = SeqRelocation {
            source: 0,
            target: 1,
            seq,
        };
        let delta = SeqRelocate::default()
            .apply(&problem, &mut sol, &candidate)
            .expect("improving");
        assert!((before - total_cost(&problem, &sol) - delta).abs() < 1e-9);
        assert_eq!(sol.tour(0).first(), 1);
        assert_eq!(sol.tour(0).visits(), vec![1, 2]);
        assert!(sol.tour(1).contains(5) && sol.tour(1).contains(6));
        check_caches(&problem, &sol);
    }

    #[test]
    fn test_seq_relocate_rejects_capacity() {
        let capacity =
            Capacity::unlimited().with_constraint(Constraint::new("load", vec![1.0; 8], 3.0));
        let problem = line_problem(capacity);
        let mut sol = Solution::from_tours(
            &problem,
            vec![
                Tour::closed(8, &[0, 5, 6, 1]).expect("valid"),
                Tour::closed(8, &[4, 7]).expect("valid"),
            ],
        );
        let snapshot = sol.clone();
        let seq = Seq::new(&problem, sol.tour(0), 5, 2).expect("seq");
        let candidate = SeqRelocation {
            source: 0,
            target: 1,
            seq,
        };
        assert!(SeqRelocate::default()
            .apply(&problem, &mut sol, &candidate)
            .is_none());
        assert_eq!(sol.tours(), snapshot.tours());
        assert_eq!(sol.contents(), snapshot.contents());
    }

    #[test]
    fn test_seq_relocate_rejects_stale() {
        let problem = line_problem(Capacity::unlimited());
        let mut sol = Solution::from_tours(
            &problem,
            vec![
                Tour::closed(8, &[0, 5, 6, 1]).expect("valid"),
                Tour::closed(8, &[4, 7]).expect("valid"),
            ],
        );
        let seq = Seq::new(&problem, sol.tour(0), 5, 2).expect("seq");
        sol.parts_mut(0).0.insert_after(5, 2).expect("insert");
        let candidate = SeqRelocation {
            source: 0,
            target: 1,
            seq,
        };
        assert!(SeqRelocate::default()
            .apply(&problem, &mut sol, &candidate)
            .is_none());
    }

    proptest! {
        #[test]
        fn prop_seq_relocate_delta_matches_recomputation(
            dm in asymmetric_costs(12),
            split in 3usize..9,
            shape in any_shape(),
            wrap in any::<bool>(),
        ) {
            let problem = MatrixProblem::new(dm, Capacity::unlimited());
            let order: Vec<usize> = (0..12).collect();
            let mut sol = Solution::from_tours(&problem, vec![
                shaped_tour(12, &order[..split], shape),
                shaped_tour(12, &order[split..], shape),
            ]);
            let op = SeqRelocate::default();
            for (source, target) in [(0, 1), (1, 0)] {
                let seqs: Vec<Seq> =
                    sequences_of_size(&problem, sol.tour(source), 2, 3, wrap, false).collect();
                for seq in seqs {
                    let before = total_cost(&problem, &sol);
                    let candidate = SeqRelocation { source, target, seq };
                    if let Some(delta) = op.apply(&problem, &mut sol, &candidate) {
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
