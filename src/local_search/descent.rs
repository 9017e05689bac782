//! Descent driver combining the operators.
//!
//! # Algorithm
//!
//! Each pass runs intra-tour relocation on every tour, then
//! [`multi_relocate`] and [`multi_exchange`] over all tour pairs. Passes
//! repeat until one applies no move or `max_passes` is reached. With a seed,
//! the tour-pair order is reshuffled every pass.
//!
//! Content caches are reconciled before the first pass and after the last.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};

use super::multi::{multi_exchange, multi_relocate, ordered_pairs, unordered_pairs, Sweep};
use super::operator::{first_improvement, movable_triples};
use super::{AlwaysTry, InterTourFilter, IntraRelocate, IntraRelocation};
use crate::config::LocalSearchConfig;
use crate::models::{Problem, Solution};

/// What a [`LocalSearch::run`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchReport {
    /// Passes run.
    pub passes: usize,
    /// Moves applied.
    pub moves: usize,
    /// Total tour cost after the initial reconciliation.
    pub initial_cost: f64,
    /// Total tour cost after the final reconciliation.
    pub final_cost: f64,
    /// Caches found drifted beyond tolerance at the final reconciliation.
    pub drifted: usize,
}

impl SearchReport {
    /// Cost decrease over the run.
    pub fn improvement(&self) -> f64 {
        self.initial_cost - self.final_cost
    }
}

/// First-improvement descent over all operators.
///
/// # Examples
///
/// ```
/// use u_tours::capacity::Capacity;
/// use u_tours::config::LocalSearchConfig;
/// use u_tours::distance::DistanceMatrix;
/// use u_tours::local_search::LocalSearch;
/// use u_tours::models::{MatrixProblem, Solution};
/// use u_tours::tour::Tour;
///
/// let points = [(0.0, 0.0), (5.0, 0.0), (1.0, 0.0), (6.0, 0.0), (2.0, 0.0), (7.0, 0.0)];
/// let problem = MatrixProblem::new(DistanceMatrix::from_points(&points), Capacity::unlimited());
/// let mut sol = Solution::from_tours(&problem, vec![
///     Tour::closed(6, &[0, 3, 4]).unwrap(),
///     Tour::closed(6, &[1, 2, 5]).unwrap(),
/// ]);
///
/// let report = LocalSearch::new(LocalSearchConfig::default()).run(&problem, &mut sol);
/// assert!(report.improvement() > 0.0);
/// assert!(sol.verify().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct LocalSearch<F = AlwaysTry> {
    config: LocalSearchConfig,
    filter: F,
}

impl LocalSearch<AlwaysTry> {
    /// Creates a driver that tries every tour pair.
    pub fn new(config: LocalSearchConfig) -> Self {
        Self {
            config,
            filter: AlwaysTry,
        }
    }
}

impl<F: InterTourFilter> LocalSearch<F> {
    /// Replaces the tour-pair filter.
    pub fn with_filter<G: InterTourFilter>(self, filter: G) -> LocalSearch<G> {
        LocalSearch {
            config: self.config,
            filter,
        }
    }

    /// The configuration.
    pub fn config(&self) -> &LocalSearchConfig {
        &self.config
    }

    /// Improves `solution` in place until no operator finds a move.
    #[tracing::instrument(level = "debug", name = "Local Search", skip(self, problem, solution))]
    pub fn run(&self, problem: &dyn Problem, solution: &mut Solution) -> SearchReport {
        let config = &self.config;
        solution.reconcile(problem, config.drift_tolerance);
        let initial_cost = solution.total_weight();

        let mut rng = config.seed.map(StdRng::seed_from_u64);
        let mut passes = 0;
        let mut moves = 0;
        while passes < config.max_passes {
            passes += 1;
            let mut pass = Sweep::default();
            pass.absorb(self.intra_pass(problem, solution));

            let mut ordered = ordered_pairs(solution.num_tours());
            let mut unordered = unordered_pairs(solution.num_tours());
            if let Some(rng) = rng.as_mut() {
                ordered.shuffle(rng);
                unordered.shuffle(rng);
            }
            pass.absorb(multi_relocate(
                problem,
                solution,
                config,
                &self.filter,
                &ordered,
            ));
            pass.absorb(multi_exchange(
                problem,
                solution,
                config,
                &self.filter,
                &unordered,
            ));

            debug!(
                pass = passes,
                moves = pass.moves,
                gain = pass.gain,
                skipped = pass.skipped,
                "descent pass"
            );
            moves += pass.moves;
            if pass.moves == 0 {
                break;
            }
        }

        let drifted = solution.reconcile(problem, config.drift_tolerance);
        let report = SearchReport {
            passes,
            moves,
            initial_cost,
            final_cost: solution.total_weight(),
            drifted,
        };
        info!(
            passes,
            moves,
            initial_cost,
            final_cost = report.final_cost,
            "local search finished"
        );
        report
    }

    fn intra_pass(&self, problem: &dyn Problem, solution: &mut Solution) -> Sweep {
        let operator = IntraRelocate::new(self.config.epsilon);
        let mut sweep = Sweep::default();
        for tour in 0..solution.num_tours() {
            loop {
                let candidates: Vec<IntraRelocation> = movable_triples(solution.tour(tour))
                    .into_iter()
                    .map(|visit| IntraRelocation { tour, visit })
                    .collect();
                match first_improvement(&operator, problem, solution, &candidates) {
                    Some(delta) => {
                        sweep.moves += 1;
                        sweep.gain += delta;
                    }
                    None => break,
                }
            }
        }
        sweep
    }
}
