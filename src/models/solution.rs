//! A set of tours with their cached contents.

use tracing::warn;

use super::Problem;
use crate::capacity::Content;
use crate::error::{Result, TourError};
use crate::tour::{Tour, Visit};

/// A complete solution: tours, their parallel [`Content`] caches, and the
/// visits no tour could take.
///
/// `contents[i]` always belongs to `tours[i]`. Operators keep the caches in
/// step incrementally; [`reconcile`](Solution::reconcile) repairs any drift.
///
/// # Examples
///
/// ```
/// use u_tours::capacity::Capacity;
/// use u_tours::distance::DistanceMatrix;
/// use u_tours::models::{MatrixProblem, Solution};
///
/// let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)]);
/// let problem = MatrixProblem::new(dm, Capacity::new(100.0));
///
/// let mut sol = Solution::new();
/// let i = sol.add_new(&problem, 0, Some(0)).unwrap();
/// assert_eq!(sol.num_tours(), 1);
/// assert_eq!(sol.tour(i).count(), 1);
/// assert_eq!(sol.num_unassigned(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Solution {
    tours: Vec<Tour>,
    contents: Vec<Content>,
    unassigned: Vec<Visit>,
}

impl Solution {
    /// Creates an empty solution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps existing tours, computing each content from scratch.
    pub fn from_tours<P: Problem + ?Sized>(problem: &P, tours: Vec<Tour>) -> Self {
        let contents = tours
            .iter()
            .map(|tour| problem.capacity().content_of(problem, tour))
            .collect();
        Self {
            tours,
            contents,
            unassigned: Vec::new(),
        }
    }

    /// Opens a new tour starting at `first`, with the shape given by `last`
    /// (see [`Tour::new`]). Returns its index.
    ///
    /// # Errors
    ///
    /// The errors of [`Tour::new`], or [`TourError::AlreadyPresent`] if
    /// another tour already serves `first` or the fixed `last`.
    pub fn add_new<P: Problem + ?Sized>(
        &mut self,
        problem: &P,
        first: Visit,
        last: Option<Visit>,
    ) -> Result<usize> {
        let tour = Tour::new(problem.num_visits(), &[first], last)?;
        if let Some(taken) = tour.iter().find(|&v| self.is_served(v)) {
            return Err(TourError::AlreadyPresent(taken));
        }
        self.contents
            .push(problem.capacity().content_of(problem, &tour));
        self.tours.push(tour);
        Ok(self.tours.len() - 1)
    }

    /// Takes tour `index` and its content out of the solution.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn remove(&mut self, index: usize) -> (Tour, Content) {
        (self.tours.remove(index), self.contents.remove(index))
    }

    /// Tour `index`.
    pub fn tour(&self, index: usize) -> &Tour {
        &self.tours[index]
    }

    /// Cached content of tour `index`.
    pub fn content(&self, index: usize) -> &Content {
        &self.contents[index]
    }

    /// All tours.
    pub fn tours(&self) -> &[Tour] {
        &self.tours
    }

    /// All contents, parallel to [`tours`](Solution::tours).
    pub fn contents(&self) -> &[Content] {
        &self.contents
    }

    /// Mutable access to tour `index` and its content together.
    pub fn parts_mut(&mut self, index: usize) -> (&mut Tour, &mut Content) {
        (&mut self.tours[index], &mut self.contents[index])
    }

    /// Mutable access to two distinct tours and their contents.
    ///
    /// # Panics
    ///
    /// Panics if `a == b` or either index is out of range.
    pub fn pair_mut(
        &mut self,
        a: usize,
        b: usize,
    ) -> ((&mut Tour, &mut Content), (&mut Tour, &mut Content)) {
        assert_ne!(a, b, "pair_mut needs two distinct tours");
        let (tour_a, tour_b) = split_two(&mut self.tours, a, b);
        let (content_a, content_b) = split_two(&mut self.contents, a, b);
        ((tour_a, content_a), (tour_b, content_b))
    }

    /// Number of tours.
    pub fn num_tours(&self) -> usize {
        self.tours.len()
    }

    /// Total number of visits served across all tours.
    pub fn num_served(&self) -> usize {
        self.tours.iter().map(Tour::count).sum()
    }

    /// Index of the tour serving `visit`, if any.
    pub fn tour_of(&self, visit: Visit) -> Option<usize> {
        self.tours.iter().position(|t| t.contains(visit))
    }

    fn is_served(&self, visit: Visit) -> bool {
        self.tour_of(visit).is_some()
    }

    /// Sum of the cached tour weights.
    pub fn total_weight(&self) -> f64 {
        self.contents.iter().map(Content::weight).sum()
    }

    /// Rotates closed tour `index` so that `visit` becomes its first visit.
    ///
    /// # Errors
    ///
    /// The errors of [`Tour::set_first`].
    pub fn set_first(&mut self, index: usize, visit: Visit) -> Result<()> {
        self.tours[index].set_first(visit)
    }

    /// Recomputes every content and replaces caches that drifted.
    ///
    /// A cache off by more than `tolerance` (weight or any quantity) is
    /// logged as a warning. Every cache is overwritten with the fresh value
    /// regardless. Returns how many caches exceeded the tolerance.
    pub fn reconcile<P: Problem + ?Sized>(&mut self, problem: &P, tolerance: f64) -> usize {
        let mut drifted = 0;
        for (index, (tour, cached)) in self.tours.iter().zip(self.contents.iter_mut()).enumerate() {
            let fresh = problem.capacity().content_of(problem, tour);
            let drift = cached.drift(&fresh);
            if drift > tolerance {
                warn!(
                    tour = index,
                    drift,
                    cached_weight = cached.weight(),
                    fresh_weight = fresh.weight(),
                    "content cache drifted"
                );
                drifted += 1;
            }
            *cached = fresh;
        }
        drifted
    }

    /// Reconciles the caches, then checks every tour against the capacity.
    pub fn is_feasible<P: Problem + ?Sized>(&mut self, problem: &P, tolerance: f64) -> bool {
        self.reconcile(problem, tolerance);
        self.contents
            .iter()
            .all(|content| problem.capacity().is_within(content))
    }

    /// Checks every tour's structure and that no visit is served twice.
    ///
    /// # Errors
    ///
    /// [`TourError::Inconsistent`] describing the first problem found.
    pub fn verify(&self) -> Result<()> {
        if self.tours.len() != self.contents.len() {
            return Err(TourError::Inconsistent(format!(
                "{} tours but {} contents",
                self.tours.len(),
                self.contents.len()
            )));
        }
        let universe = self.tours.iter().map(Tour::universe).max().unwrap_or(0);
        let mut owner = vec![None; universe];
        for (index, tour) in self.tours.iter().enumerate() {
            tour.verify()?;
            for visit in tour.iter() {
                if let Some(other) = owner[visit].replace(index) {
                    return Err(TourError::Inconsistent(format!(
                        "visit {visit} is served by tours {other} and {index}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Marks a visit as unassigned.
    pub fn add_unassigned(&mut self, visit: Visit) {
        self.unassigned.push(visit);
    }

    /// Visits no tour serves.
    pub fn unassigned(&self) -> &[Visit] {
        &self.unassigned
    }

    /// Number of unassigned visits.
    pub fn num_unassigned(&self) -> usize {
        self.unassigned.len()
    }
}

fn split_two<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    if a < b {
        let (left, right) = items.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = items.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}
