//! Contiguous visit windows with precomputed aggregate costs.
//!
//! # Algorithm
//!
//! [`sequences_of_size`] snapshots the tour order once, then for each window
//! length (longest first) slides a window one position at a time. Each slide
//! drops the front visit and edge and adds the next back visit and edge, so
//! the `between` aggregates cost O(1) per window instead of O(k).

use super::cost::edge_cost;
use crate::models::Problem;
use crate::tour::{Tour, TourShape, Visit, NOT_SET};

/// A snapshot of `k` contiguous tour visits `[v0 .. v(k-1)]` with aggregates.
///
/// Stale as soon as its tour changes; check [`is_current`](Seq::is_current)
/// before relying on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Seq {
    visits: Vec<Visit>,
    from: Visit,
    to: Visit,
    between: f64,
    between_reversed: f64,
    between_visit_cost: f64,
    total_original: f64,
    wraps: bool,
}

impl Seq {
    /// Copies `len` visits of `tour` starting at `head`.
    ///
    /// Returns `None` if `head` is not in the tour, the tour runs out of
    /// visits, or (closed tours) the window would cover the whole tour.
    pub fn new<P: Problem + ?Sized>(
        problem: &P,
        tour: &Tour,
        head: Visit,
        len: usize,
    ) -> Option<Self> {
        let limit = tour.count() + usize::from(!tour.is_closed());
        if len == 0 || !tour.contains(head) || len >= limit {
            return None;
        }
        let visits: Vec<Visit> = tour.between(head, NOT_SET).take(len).collect();
        if visits.len() != len {
            return None;
        }
        let from = if head == tour.first() && !tour.is_closed() {
            NOT_SET
        } else {
            tour.predecessor(head)?
        };
        let to = tour.neighbour(visits[len - 1]);
        let wraps = tour.is_closed() && visits.contains(&tour.first());
        Some(Self::from_parts(problem, visits, from, to, wraps))
    }

    fn from_parts<P: Problem + ?Sized>(
        problem: &P,
        visits: Vec<Visit>,
        from: Visit,
        to: Visit,
        wraps: bool,
    ) -> Self {
        let mut between = 0.0;
        let mut between_reversed = 0.0;
        for w in visits.windows(2) {
            between += problem.travel_cost(w[0], w[1]);
            between_reversed += problem.travel_cost(w[1], w[0]);
        }
        let between_visit_cost = visits.iter().map(|&v| problem.visit_cost(v)).sum();
        Self::with_aggregates(
            problem,
            visits,
            from,
            to,
            [between, between_reversed, between_visit_cost],
            wraps,
        )
    }

    fn with_aggregates<P: Problem + ?Sized>(
        problem: &P,
        visits: Vec<Visit>,
        from: Visit,
        to: Visit,
        [between, between_reversed, between_visit_cost]: [f64; 3],
        wraps: bool,
    ) -> Self {
        let head = visits[0];
        let tail = visits[visits.len() - 1];
        let total_original = edge_cost(problem, from, head)
            + between
            + edge_cost(problem, tail, to)
            + between_visit_cost;
        Self {
            visits,
            from,
            to,
            between,
            between_reversed,
            between_visit_cost,
            total_original,
            wraps,
        }
    }

    /// The visits, in tour order.
    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    /// Number of visits.
    pub fn len(&self) -> usize {
        self.visits.len()
    }

    /// Always `false`; a sequence holds at least one visit.
    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    /// First visit `v0`.
    pub fn head(&self) -> Visit {
        self.visits[0]
    }

    /// Last visit `v(k-1)`.
    pub fn tail(&self) -> Visit {
        self.visits[self.visits.len() - 1]
    }

    /// Predecessor of the head ([`NOT_SET`] at the start of an open tour).
    pub fn from(&self) -> Visit {
        self.from
    }

    /// Successor of the tail ([`NOT_SET`] at the end of an open tour).
    pub fn to(&self) -> Visit {
        self.to
    }

    /// Travel cost strictly between head and tail, left to right.
    pub fn between(&self) -> f64 {
        self.between
    }

    /// Travel cost strictly between head and tail, right to left.
    pub fn between_reversed(&self) -> f64 {
        self.between_reversed
    }

    /// Summed visit cost of the sequence.
    pub fn between_visit_cost(&self) -> f64 {
        self.between_visit_cost
    }

    /// Cost of the sequence including both boundary edges.
    pub fn total_original(&self) -> f64 {
        self.total_original
    }

    /// Whether the sequence straddles the seam (holds `first`) of a closed tour.
    pub fn wraps(&self) -> bool {
        self.wraps
    }

    /// Cost saved by cutting the sequence out and joining `from → to`.
    pub fn removal_gain<P: Problem + ?Sized>(&self, problem: &P) -> f64 {
        self.total_original - edge_cost(problem, self.from, self.to)
    }

    /// Returns `true` if `tour` still holds this sequence between the same
    /// boundary visits.
    pub fn is_current(&self, tour: &Tour) -> bool {
        let head = self.head();
        if !tour.contains(head) {
            return false;
        }
        let entry = if self.from == NOT_SET {
            head == tour.first() && !tour.is_closed()
        } else {
            tour.contains_edge(self.from, head)
        };
        let visits = &self.visits;
        entry
            && visits.windows(2).all(|w| tour.contains_edge(w[0], w[1]))
            && tour.neighbour(self.tail()) == self.to
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    start: usize,
    last_start: usize,
    between: f64,
    between_reversed: f64,
    between_visit_cost: f64,
}

/// Lazy enumeration of [`Seq`] windows; see [`sequences_of_size`].
#[derive(Debug)]
pub struct Sequences<'a, P: ?Sized> {
    problem: &'a P,
    positions: Vec<Visit>,
    shape: TourShape,
    wrap: bool,
    prune: bool,
    min_len: usize,
    len: usize,
    window: Option<Window>,
}

impl<'a, P: Problem + ?Sized> Sequences<'a, P> {
    fn at(&self, index: usize) -> Visit {
        self.positions[index % self.positions.len()]
    }

    fn wrapping(&self) -> bool {
        self.wrap && self.shape == TourShape::Closed
    }

    /// Inclusive range of start positions for windows of length `len`.
    ///
    /// Position 0 (`first`) and a fixed last position are never covered,
    /// except by wrapping windows of a closed tour, which slide past the seam
    /// up to start position `n` (= position 0).
    fn start_range(&self, len: usize) -> Option<(usize, usize)> {
        let n = self.positions.len();
        if len == 0 || len >= n {
            return None;
        }
        if self.wrapping() {
            return Some((1, n));
        }
        let limit = match self.shape {
            TourShape::Fixed => n - 1,
            _ => n,
        };
        if limit < len + 1 {
            return None;
        }
        Some((1, limit - len))
    }

    fn open_window(&self, start: usize, last_start: usize) -> Window {
        let mut window = Window {
            start,
            last_start,
            between: 0.0,
            between_reversed: 0.0,
            between_visit_cost: 0.0,
        };
        for j in 0..self.len {
            let v = self.at(start + j);
            window.between_visit_cost += self.problem.visit_cost(v);
            if j + 1 < self.len {
                let next = self.at(start + j + 1);
                window.between += self.problem.travel_cost(v, next);
                window.between_reversed += self.problem.travel_cost(next, v);
            }
        }
        window
    }

    fn slide(&self, window: &mut Window) {
        let s = window.start;
        let k = self.len;
        let dropped = self.at(s);
        let added = self.at(s + k);
        if k >= 2 {
            let second = self.at(s + 1);
            let old_tail = self.at(s + k - 1);
            window.between += self.problem.travel_cost(old_tail, added)
                - self.problem.travel_cost(dropped, second);
            window.between_reversed += self.problem.travel_cost(added, old_tail)
                - self.problem.travel_cost(second, dropped);
        }
        window.between_visit_cost +=
            self.problem.visit_cost(added) - self.problem.visit_cost(dropped);
        window.start += 1;
    }

    fn emit(&self, window: &Window) -> Seq {
        let n = self.positions.len();
        let s = window.start;
        let k = self.len;
        let visits: Vec<Visit> = (0..k).map(|j| self.at(s + j)).collect();
        let from = self.at(s - 1);
        let to = if s + k < n || self.shape == TourShape::Closed {
            self.at(s + k)
        } else {
            NOT_SET
        };
        let wraps = self.shape == TourShape::Closed && s + k > n;
        Seq::with_aggregates(
            self.problem,
            visits,
            from,
            to,
            [
                window.between,
                window.between_reversed,
                window.between_visit_cost,
            ],
            wraps,
        )
    }

    fn is_pruned(&self, seq: &Seq) -> bool {
        self.prune
            && seq.to() != NOT_SET
            && seq.total_original() < 2.0 * edge_cost(self.problem, seq.from(), seq.to())
    }
}

impl<P: Problem + ?Sized> Iterator for Sequences<'_, P> {
    type Item = Seq;

    fn next(&mut self) -> Option<Seq> {
        loop {
            if self.len == 0 || self.len < self.min_len {
                return None;
            }
            match self.window {
                None => match self.start_range(self.len) {
                    Some((start, last_start)) => {
                        self.window = Some(self.open_window(start, last_start));
                    }
                    None => {
                        self.len -= 1;
                        continue;
                    }
                },
                Some(mut window) if window.start < window.last_start => {
                    self.slide(&mut window);
                    self.window = Some(window);
                }
                Some(_) => {
                    self.window = None;
                    self.len -= 1;
                    continue;
                }
            }
            let Some(window) = self.window else {
                continue;
            };
            let seq = self.emit(&window);
            if self.is_pruned(&seq) {
                continue;
            }
            return Some(seq);
        }
    }
}

/// Enumerates windows of `max_len` visits down to `min_len` visits.
///
/// Windows never cover `first` or a fixed last visit. With `wrap` on a
/// closed tour, windows sliding across the seam are emitted too and carry
/// [`Seq::wraps`]. With `prune`, windows whose cost is below twice the direct
/// edge between their boundaries are skipped. Pruning is a heuristic filter:
/// it can hide improving moves, but every window it emits is valid.
///
/// # Examples
///
/// ```
/// use u_tours::capacity::Capacity;
/// use u_tours::distance::DistanceMatrix;
/// use u_tours::evaluation::sequences_of_size;
/// use u_tours::models::MatrixProblem;
/// use u_tours::tour::Tour;
///
/// let points: Vec<(f64, f64)> = (0..5).map(|i| (i as f64, 0.0)).collect();
/// let problem = MatrixProblem::new(DistanceMatrix::from_points(&points), Capacity::unlimited());
/// let tour = Tour::open(5, &[0, 1, 2, 3, 4]).unwrap();
///
/// let windows: Vec<Vec<usize>> = sequences_of_size(&problem, &tour, 2, 3, false, false)
///     .map(|seq| seq.visits().to_vec())
///     .collect();
/// assert_eq!(windows[0], vec![1, 2, 3]);
/// assert_eq!(windows.len(), 5);
/// ```
pub fn sequences_of_size<'a, P: Problem + ?Sized>(
    problem: &'a P,
    tour: &Tour,
    min_len: usize,
    max_len: usize,
    wrap: bool,
    prune: bool,
) -> Sequences<'a, P> {
    Sequences {
        problem,
        positions: tour.visits(),
        shape: tour.shape(),
        wrap,
        prune,
        min_len: min_len.max(1),
        len: max_len,
        window: None,
    }
}
