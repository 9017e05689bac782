//! Multi-tour sweeps of the relocate and exchange primitives.
//!
//! # Algorithm
//!
//! For every tour pair the [`InterTourFilter`] lets through, candidates are
//! enumerated from the current tours and applied first-improvement. After a
//! success the pair's candidates are enumerated again, since the old ones
//! are stale; the pair is done once a full scan finds nothing.
//!
//! # Complexity
//!
//! O(T² × n²) candidate checks per sweep in the worst case (T tours of n
//! visits). A selective filter is what keeps this practical.

use tracing::debug;

use super::operator::{first_improvement, movable_triples};
use super::{
    Exchange, Relocate, Relocation, SeqExchange, SeqRelocate, SeqRelocation, SeqSwap, Swap,
};
use crate::config::LocalSearchConfig;
use crate::evaluation::{sequences_of_size, Seq};
use crate::models::{Problem, Solution};

/// Decides whether a pair of tours is worth trying inter-tour moves on.
///
/// Implementations are usually geometric, such as a bounding-box overlap
/// test. Any `Fn(&Solution, usize, usize) -> bool` closure qualifies.
pub trait InterTourFilter {
    /// Returns `false` to skip the pair `(t1, t2)`.
    fn have_to_try_inter(&self, solution: &Solution, t1: usize, t2: usize) -> bool;
}

/// Tries every pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysTry;

impl InterTourFilter for AlwaysTry {
    fn have_to_try_inter(&self, _solution: &Solution, _t1: usize, _t2: usize) -> bool {
        true
    }
}

impl<F> InterTourFilter for F
where
    F: Fn(&Solution, usize, usize) -> bool,
{
    fn have_to_try_inter(&self, solution: &Solution, t1: usize, t2: usize) -> bool {
        self(solution, t1, t2)
    }
}

/// Outcome of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sweep {
    /// Moves applied.
    pub moves: usize,
    /// Summed cost decrease.
    pub gain: f64,
    /// Tour pairs the filter skipped.
    pub skipped: usize,
}

impl Sweep {
    fn record(&mut self, delta: f64) {
        self.moves += 1;
        self.gain += delta;
    }

    /// Adds another sweep's counts to this one.
    pub fn absorb(&mut self, other: Sweep) {
        self.moves += other.moves;
        self.gain += other.gain;
        self.skipped += other.skipped;
    }
}

/// Every ordered pair of distinct tour indices.
pub fn ordered_pairs(num_tours: usize) -> Vec<(usize, usize)> {
    (0..num_tours)
        .flat_map(|i| (0..num_tours).filter(move |&j| j != i).map(move |j| (i, j)))
        .collect()
}

/// Every unordered pair of distinct tour indices, smaller index first.
pub fn unordered_pairs(num_tours: usize) -> Vec<(usize, usize)> {
    (0..num_tours)
        .flat_map(|i| (i + 1..num_tours).map(move |j| (i, j)))
        .collect()
}

fn windows(
    problem: &dyn Problem,
    solution: &Solution,
    tour: usize,
    config: &LocalSearchConfig,
) -> Vec<Seq> {
    sequences_of_size(
        problem,
        solution.tour(tour),
        config.min_seq_len,
        config.max_seq_len,
        config.wrap_sequences,
        config.prune_sequences,
    )
    .collect()
}

/// Moves visits and windows out of `source` into `target` until nothing
/// improves.
fn relocate_pair(
    problem: &dyn Problem,
    solution: &mut Solution,
    config: &LocalSearchConfig,
    source: usize,
    target: usize,
) -> Sweep {
    let single = Relocate::new(config.epsilon);
    let sequence = SeqRelocate::new(config.epsilon);
    let mut sweep = Sweep::default();
    loop {
        let candidates: Vec<Relocation> = movable_triples(solution.tour(source))
            .into_iter()
            .map(|visit| Relocation {
                source,
                target,
                visit,
            })
            .collect();
        if let Some(delta) = first_improvement(&single, problem, solution, &candidates) {
            sweep.record(delta);
            continue;
        }
        let candidates: Vec<SeqRelocation> = windows(problem, solution, source, config)
            .into_iter()
            .map(|seq| SeqRelocation {
                source,
                target,
                seq,
            })
            .collect();
        match first_improvement(&sequence, problem, solution, &candidates) {
            Some(delta) => sweep.record(delta),
            None => return sweep,
        }
    }
}

/// Swaps visits and windows between `i` and `j` until nothing improves.
fn exchange_pair(
    problem: &dyn Problem,
    solution: &mut Solution,
    config: &LocalSearchConfig,
    i: usize,
    j: usize,
) -> Sweep {
    let single = Exchange::new(config.epsilon);
    let sequence = SeqExchange::new(config.epsilon);
    let mut sweep = Sweep::default();
    loop {
        let right = movable_triples(solution.tour(j));
        let candidates: Vec<Swap> = movable_triples(solution.tour(i))
            .into_iter()
            .flat_map(|first| {
                right.iter().map(move |&second| Swap {
                    tours: (i, j),
                    first,
                    second,
                })
            })
            .collect();
        if let Some(delta) = first_improvement(&single, problem, solution, &candidates) {
            sweep.record(delta);
            continue;
        }
        let right = windows(problem, solution, j, config);
        let candidates: Vec<SeqSwap> = windows(problem, solution, i, config)
            .into_iter()
            .flat_map(|first| {
                right.iter().map(move |second| SeqSwap {
                    tours: (i, j),
                    first: first.clone(),
                    second: second.clone(),
                })
            })
            .collect();
        match first_improvement(&sequence, problem, solution, &candidates) {
            Some(delta) => sweep.record(delta),
            None => return sweep,
        }
    }
}

/// Runs relocate and sequence relocate over the ordered tour `pairs`.
///
/// # Examples
///
/// ```
/// use u_tours::capacity::Capacity;
/// use u_tours::config::LocalSearchConfig;
/// use u_tours::distance::DistanceMatrix;
/// use u_tours::local_search::{multi_relocate, ordered_pairs, AlwaysTry};
/// use u_tours::models::{MatrixProblem, Solution};
/// use u_tours::tour::Tour;
///
/// let points = [(0.0, 0.0), (1.0, 0.0), (20.0, 0.0), (21.0, 0.0), (2.0, 0.0)];
/// let problem = MatrixProblem::new(DistanceMatrix::from_points(&points), Capacity::unlimited());
/// let mut sol = Solution::from_tours(&problem, vec![
///     Tour::closed(5, &[0, 1]).unwrap(),
///     Tour::closed(5, &[2, 4, 3]).unwrap(),
/// ]);
///
/// let config = LocalSearchConfig::default();
/// let sweep = multi_relocate(&problem, &mut sol, &config, &AlwaysTry, &ordered_pairs(2));
/// assert_eq!(sweep.moves, 1);
/// assert!(sol.tour(0).contains(4));
/// ```
pub fn multi_relocate<F: InterTourFilter + ?Sized>(
    problem: &dyn Problem,
    solution: &mut Solution,
    config: &LocalSearchConfig,
    filter: &F,
    pairs: &[(usize, usize)],
) -> Sweep {
    let mut sweep = Sweep::default();
    for &(source, target) in pairs {
        if !filter.have_to_try_inter(solution, source, target) {
            sweep.skipped += 1;
            continue;
        }
        sweep.absorb(relocate_pair(problem, solution, config, source, target));
    }
    debug!(
        moves = sweep.moves,
        gain = sweep.gain,
        skipped = sweep.skipped,
        "multi-relocate sweep"
    );
    sweep
}

/// Runs exchange and sequence exchange over the tour `pairs`.
pub fn multi_exchange<F: InterTourFilter + ?Sized>(
    problem: &dyn Problem,
    solution: &mut Solution,
    config: &LocalSearchConfig,
    filter: &F,
    pairs: &[(usize, usize)],
) -> Sweep {
    let mut sweep = Sweep::default();
    for &(i, j) in pairs {
        if !filter.have_to_try_inter(solution, i, j) {
            sweep.skipped += 1;
            continue;
        }
        sweep.absorb(exchange_pair(problem, solution, config, i, j));
    }
    debug!(
        moves = sweep.moves,
        gain = sweep.gain,
        skipped = sweep.skipped,
        "multi-exchange sweep"
    );
    sweep
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capacity::Capacity;
    use crate::distance::DistanceMatrix;
    use crate::evaluation::tour_cost;
    use crate::models::MatrixProblem;
    use crate::tour::Tour;

    fn three_clusters() -> MatrixProblem {
        let points = [
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (50.0, 0.0),
            (51.0, 0.0),
            (52.0, 0.0),
            (0.0, 50.0),
            (1.0, 50.0),
            (2.0, 50.0),
        ];
        MatrixProblem::new(DistanceMatrix::from_points(&points), Capacity::unlimited())
    }

    fn scrambled(problem: &MatrixProblem) -> Solution {
        Solution::from_tours(
            problem,
            vec![
                Tour::closed(9, &[0, 4, 7]).expect("valid"),
                Tour::closed(9, &[3, 1, 8]).expect("valid"),
                Tour::closed(9, &[6, 2, 5]).expect("valid"),
            ],
        )
    }

    fn total_cost(problem: &MatrixProblem, sol: &Solution) -> f64 {
        sol.tours().iter().map(|t| tour_cost(problem, t)).sum()
    }

    #[test]
    fn test_pairs() {
        assert_eq!(ordered_pairs(3).len(), 6);
        assert_eq!(unordered_pairs(3), vec![(0, 1), (0, 2), (1, 2)]);
        assert!(ordered_pairs(1).is_empty());
    }

    #[test]
    fn test_multi_relocate_sorts_clusters() {
        let problem = three_clusters();
        let mut sol = scrambled(&problem);
        let before = total_cost(&problem, &sol);
        let sweep = multi_relocate(
            &problem,
            &mut sol,
            &LocalSearchConfig::default(),
            &AlwaysTry,
            &ordered_pairs(3),
        );
        assert!(sweep.moves > 0);
        assert!((before - total_cost(&problem, &sol) - sweep.gain).abs() < 1e-6);
        assert_eq!(sol.num_served(), 9);
        assert!(sol.verify().is_ok());
    }

    #[test]
    fn test_multi_exchange_sorts_clusters() {
        let problem = three_clusters();
        let mut sol = scrambled(&problem);
        let before = total_cost(&problem, &sol);
        let sweep = multi_exchange(
            &problem,
            &mut sol,
            &LocalSearchConfig::default(),
            &AlwaysTry,
            &unordered_pairs(3),
        );
        assert!(sweep.moves > 0);
        assert!((before - total_cost(&problem, &sol) - sweep.gain).abs() < 1e-6);
        // Exchanges never change tour sizes.
        assert!(sol.tours().iter().all(|t| t.count() == 3));
        assert!(sol.verify().is_ok());
    }

    #[test]
    fn test_filter_skips_pairs() {
        let problem = three_clusters();
        let mut sol = scrambled(&problem);
        let snapshot = sol.clone();
        let never = |_: &Solution, _: usize, _: usize| false;
        let sweep = multi_relocate(
            &problem,
            &mut sol,
            &LocalSearchConfig::default(),
            &never,
            &ordered_pairs(3),
        );
        assert_eq!(sweep.moves, 0);
        assert_eq!(sweep.skipped, 6);
        assert_eq!(sol.tours(), snapshot.tours());

        let only_first_two = |_: &Solution, a: usize, b: usize| a < 2 && b < 2;
        let sweep = multi_exchange(
            &problem,
            &mut sol,
            &LocalSearchConfig::default(),
            &only_first_two,
            &unordered_pairs(3),
        );
        assert_eq!(sweep.skipped, 2);
        assert_eq!(sol.tour(2).visits(), snapshot.tour(2).visits());
    }
}
