//! Successor-map tour.

use super::iter::{Between, Pairs, Triples, Visits};
use super::{Shift, Triple, Visit, NOT_SET};
use crate::error::{Result, TourError};

/// Marks a visit that is not part of the tour.
const ABSENT: Visit = usize::MAX - 1;

/// The three shapes a tour can have. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TourShape {
    /// No fixed end; the tail has no successor.
    Open,
    /// Cyclic; the last visit links back to `first`.
    Closed,
    /// Ends at a fixed visit distinct from `first`.
    Fixed,
}

/// One vehicle's ordered sequence of visits, stored as a successor map.
///
/// Index = visit id, value = next visit id. The map is sized to the visit
/// universe `0..universe` and owned by the tour. There are no back-pointers:
/// successor queries and edge rewiring are O(1), while [`remove`](Tour::remove)
/// and [`shift_after`](Tour::shift_after) pay an O(n) predecessor scan.
///
/// # Examples
///
/// ```
/// use u_tours::tour::Tour;
///
/// let mut tour = Tour::open(10, &[0, 1, 2, 3]).unwrap();
/// tour.insert_after(1, 9).unwrap();
/// assert_eq!(tour.visits(), vec![0, 1, 9, 2, 3]);
/// assert_eq!(tour.count(), 5);
/// assert!(tour.contains_edge(1, 9));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tour {
    first: Visit,
    last: Option<Visit>,
    count: usize,
    successors: Vec<Visit>,
}

impl Tour {
    /// Builds a tour from an initial visit order.
    ///
    /// `last` selects the shape: `None` for an open tour, `Some(visits[0])`
    /// for a closed tour, any other visit for a fixed end. A fixed end that is
    /// not listed in `visits` is appended; if listed, it must come last. A
    /// closed tour may repeat its first visit at the end of `visits`.
    ///
    /// # Errors
    ///
    /// [`TourError::InvalidArgument`] for an empty list, ids outside
    /// `0..universe` or a misplaced fixed end; [`TourError::AlreadyPresent`]
    /// for duplicates.
    pub fn new(universe: usize, visits: &[Visit], last: Option<Visit>) -> Result<Self> {
        let Some(&first) = visits.first() else {
            return Err(TourError::InvalidArgument {
                visit: NOT_SET,
                reason: "a tour needs a first visit",
            });
        };

        let mut order: Vec<Visit> = visits.to_vec();
        match last {
            Some(end) if end == first => {
                if order.len() > 1 && order.last() == Some(&first) {
                    order.pop();
                }
            }
            Some(end) => match order.iter().position(|&v| v == end) {
                None => order.push(end),
                Some(pos) if pos + 1 == order.len() => {}
                Some(_) => {
                    return Err(TourError::InvalidArgument {
                        visit: end,
                        reason: "a fixed last visit must end the tour",
                    })
                }
            },
            None => {}
        }

        let mut successors = vec![ABSENT; universe];
        for &v in &order {
            if v >= universe {
                return Err(TourError::InvalidArgument {
                    visit: v,
                    reason: "outside the visit range",
                });
            }
            if successors[v] != ABSENT {
                return Err(TourError::AlreadyPresent(v));
            }
            successors[v] = NOT_SET;
        }
        for window in order.windows(2) {
            successors[window[0]] = window[1];
        }
        if last == Some(first) {
            let tail = order[order.len() - 1];
            successors[tail] = first;
        }

        Ok(Self {
            first,
            last,
            count: order.len(),
            successors,
        })
    }

    /// Builds an open tour (no fixed end).
    pub fn open(universe: usize, visits: &[Visit]) -> Result<Self> {
        Self::new(universe, visits, None)
    }

    /// Builds a closed tour that returns to its first visit.
    pub fn closed(universe: usize, visits: &[Visit]) -> Result<Self> {
        let first = visits.first().copied().unwrap_or(NOT_SET);
        Self::new(universe, visits, Some(first))
    }

    /// The fixed start visit.
    pub fn first(&self) -> Visit {
        self.first
    }

    /// The end visit: `None` when open, `first` when closed.
    pub fn last(&self) -> Option<Visit> {
        self.last
    }

    /// Number of visits in the tour.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Size of the visit universe the successor map covers.
    pub fn universe(&self) -> usize {
        self.successors.len()
    }

    /// Shape of the tour.
    pub fn shape(&self) -> TourShape {
        match self.last {
            None => TourShape::Open,
            Some(end) if end == self.first => TourShape::Closed,
            Some(_) => TourShape::Fixed,
        }
    }

    /// Returns `true` for a closed (cyclic) tour.
    pub fn is_closed(&self) -> bool {
        self.shape() == TourShape::Closed
    }

    /// Returns `true` if `visit` is `first` or a fixed `last`.
    pub fn is_protected(&self, visit: Visit) -> bool {
        visit == self.first || self.fixed_last() == Some(visit)
    }

    fn fixed_last(&self) -> Option<Visit> {
        match self.shape() {
            TourShape::Fixed => self.last,
            _ => None,
        }
    }

    /// Returns `true` if `visit` is part of the tour.
    pub fn contains(&self, visit: Visit) -> bool {
        self.successors
            .get(visit)
            .is_some_and(|&next| next != ABSENT)
    }

    /// Returns `true` if the edge `from → to` is present.
    ///
    /// Includes the closing edge of a closed tour.
    pub fn contains_edge(&self, from: Visit, to: Visit) -> bool {
        self.contains(from) && self.successors[from] == to
    }

    /// Successor of `visit`, or [`NOT_SET`] for the tail of an open tour or a
    /// visit outside the tour.
    pub fn neighbour(&self, visit: Visit) -> Visit {
        match self.successors.get(visit) {
            Some(&next) if next != ABSENT => next,
            _ => NOT_SET,
        }
    }

    /// Predecessor of `visit`. O(n): scans the successor map.
    pub fn predecessor(&self, visit: Visit) -> Option<Visit> {
        if !self.contains(visit) {
            return None;
        }
        self.successors.iter().position(|&next| next == visit)
    }

    fn check_range(&self, visit: Visit) -> Result<()> {
        if visit >= self.successors.len() {
            return Err(TourError::InvalidArgument {
                visit,
                reason: "outside the visit range",
            });
        }
        Ok(())
    }

    fn check_member(&self, visit: Visit) -> Result<()> {
        self.check_range(visit)?;
        if !self.contains(visit) {
            return Err(TourError::InvalidArgument {
                visit,
                reason: "not part of the tour",
            });
        }
        Ok(())
    }

    fn check_removable(&self, visit: Visit) -> Result<()> {
        self.check_member(visit)?;
        if visit == self.first {
            return Err(TourError::InvalidOperation {
                visit,
                reason: "the first visit is protected",
            });
        }
        if self.fixed_last() == Some(visit) {
            return Err(TourError::InvalidOperation {
                visit,
                reason: "a fixed last visit is protected",
            });
        }
        Ok(())
    }

    fn check_anchor(&self, anchor: Visit) -> Result<()> {
        self.check_member(anchor)?;
        if self.fixed_last() == Some(anchor) {
            return Err(TourError::InvalidOperation {
                visit: anchor,
                reason: "nothing may follow a fixed last visit",
            });
        }
        Ok(())
    }

    /// Inserts `to` directly after `from`. O(1).
    ///
    /// # Errors
    ///
    /// [`TourError::InvalidArgument`] if either id is out of range or `from`
    /// is not in the tour, [`TourError::AlreadyPresent`] if `to` is,
    /// [`TourError::InvalidOperation`] if `from` is a fixed last visit.
    pub fn insert_after(&mut self, from: Visit, to: Visit) -> Result<()> {
        self.check_range(from)?;
        self.check_range(to)?;
        if self.contains(to) {
            return Err(TourError::AlreadyPresent(to));
        }
        self.check_anchor(from)?;

        self.successors[to] = self.successors[from];
        self.successors[from] = to;
        self.count += 1;
        Ok(())
    }

    /// Sets the successor of `from` to `to` without any checks. O(1).
    ///
    /// This is the rewiring primitive move operators combine to change several
    /// edges at once. A visit that was not part of the tour becomes a member
    /// and the count grows; `to` may be [`NOT_SET`] to make `from` the tail of
    /// an open tour. Keeping the map consistent is the caller's job.
    pub fn replace_edge_from(&mut self, from: Visit, to: Visit) {
        debug_assert!(from < self.successors.len());
        debug_assert!(to < self.successors.len() || to == NOT_SET);
        if self.successors[from] == ABSENT {
            self.count += 1;
        }
        self.successors[from] = to;
    }

    /// Drops `visit` from the membership without touching its neighbours. O(1).
    ///
    /// The caller must already have rewired the predecessor past `visit`.
    pub fn detach(&mut self, visit: Visit) {
        if self.contains(visit) {
            self.successors[visit] = ABSENT;
            self.count -= 1;
        }
    }

    /// Removes `visit` and splices its neighbours together. O(n).
    ///
    /// Returns the removed visit with its old neighbours.
    ///
    /// # Errors
    ///
    /// [`TourError::InvalidOperation`] for `first` or a fixed `last`,
    /// [`TourError::InvalidArgument`] for ids out of range or not in the tour.
    pub fn remove(&mut self, visit: Visit) -> Result<Triple> {
        self.check_removable(visit)?;
        let from = self.predecessor(visit).ok_or_else(|| {
            TourError::Inconsistent(format!("visit {visit} has no predecessor"))
        })?;
        let to = self.successors[visit];

        self.successors[from] = to;
        self.successors[visit] = ABSENT;
        self.count -= 1;
        Ok(Triple::new(from, visit, to))
    }

    /// Moves `visit` to directly follow `before`. O(n).
    ///
    /// Same end state as [`remove`](Tour::remove) followed by
    /// [`insert_after`](Tour::insert_after), with a single scan.
    ///
    /// # Errors
    ///
    /// The union of the errors of `remove(visit)` and `insert_after(before, _)`;
    /// `before == visit` is an [`TourError::InvalidArgument`].
    pub fn shift_after(&mut self, visit: Visit, before: Visit) -> Result<Shift> {
        self.check_removable(visit)?;
        self.check_anchor(before)?;
        if before == visit {
            return Err(TourError::InvalidArgument {
                visit,
                reason: "a visit cannot follow itself",
            });
        }

        let from = self.predecessor(visit).ok_or_else(|| {
            TourError::Inconsistent(format!("visit {visit} has no predecessor"))
        })?;
        let to = self.successors[visit];
        let old = Triple::new(from, visit, to);
        if before == from {
            return Ok(Shift { old, new: old });
        }

        self.successors[from] = to;
        let after = self.successors[before];
        self.successors[visit] = after;
        self.successors[before] = visit;
        Ok(Shift {
            old,
            new: Triple::new(before, visit, after),
        })
    }

    /// Moves the seam of a closed tour so that `visit` becomes `first`. O(1).
    ///
    /// # Errors
    ///
    /// [`TourError::InvalidOperation`] unless the tour is closed,
    /// [`TourError::InvalidArgument`] if `visit` is not in the tour.
    pub fn set_first(&mut self, visit: Visit) -> Result<()> {
        if !self.is_closed() {
            return Err(TourError::InvalidOperation {
                visit,
                reason: "only closed tours can move their first visit",
            });
        }
        self.check_member(visit)?;
        self.first = visit;
        self.last = Some(visit);
        Ok(())
    }

    /// Visits in tour order, starting at `first`.
    pub fn iter(&self) -> Visits<'_> {
        Visits::new(&self.successors, self.first, self.count)
    }

    /// Visits in tour order, collected.
    pub fn visits(&self) -> Vec<Visit> {
        self.iter().collect()
    }

    /// The final visit in array order: the tail of an open or fixed tour, the
    /// visit before the seam of a closed one. O(n).
    pub fn tail(&self) -> Visit {
        self.iter().last().unwrap_or(self.first)
    }

    /// Walks forward from `from` through `to` inclusive, wrapping through the
    /// seam of a closed tour. Empty if `from` is not in the tour.
    pub fn between(&self, from: Visit, to: Visit) -> Between<'_> {
        if !self.contains(from) {
            return Between::empty(&self.successors);
        }
        Between::new(&self.successors, from, to, self.count)
    }

    /// All consecutive edges. None for tours with fewer than two visits.
    pub fn pairs(&self) -> Pairs<'_> {
        let count = if self.count < 2 { 0 } else { self.count };
        Pairs::new(Visits::new(&self.successors, self.first, count))
    }

    /// All consecutive triples. None for tours with fewer than three visits.
    pub fn triples(&self) -> Triples<'_> {
        let remaining = match (self.count, self.shape()) {
            (n, _) if n < 3 => 0,
            (n, TourShape::Closed) => n,
            (n, _) => n - 2,
        };
        Triples::new(&self.successors, self.first, remaining)
    }

    /// Full structural check of the successor map. O(universe).
    ///
    /// Every member is reachable from `first` exactly once, `count` matches,
    /// and the tail agrees with the shape. Meant for debug assertions.
    pub fn verify(&self) -> Result<()> {
        let universe = self.successors.len();
        if !self.contains(self.first) {
            return Err(TourError::Inconsistent(format!(
                "first visit {} is not a member",
                self.first
            )));
        }

        let mut seen = vec![false; universe];
        let mut walked = 0;
        let mut current = self.first;
        let mut tail = self.first;
        loop {
            if seen[current] {
                if self.is_closed() && current == self.first {
                    break;
                }
                return Err(TourError::Inconsistent(format!(
                    "visit {current} is reached twice"
                )));
            }
            seen[current] = true;
            walked += 1;
            tail = current;

            let next = self.successors[current];
            if next == NOT_SET {
                break;
            }
            if next == ABSENT || next >= universe || !self.contains(next) {
                return Err(TourError::Inconsistent(format!(
                    "visit {current} points at non-member {next}"
                )));
            }
            current = next;
        }

        let members = self.successors.iter().filter(|&&s| s != ABSENT).count();
        if walked != self.count || members != self.count {
            return Err(TourError::Inconsistent(format!(
                "count is {} but {walked} visits are reachable and {members} are members",
                self.count
            )));
        }

        match self.shape() {
            TourShape::Closed => {
                if self.successors[tail] != self.first {
                    return Err(TourError::Inconsistent(
                        "closed tour does not return to its first visit".to_string(),
                    ));
                }
            }
            TourShape::Fixed => {
                if Some(tail) != self.last {
                    return Err(TourError::Inconsistent(format!(
                        "fixed tour ends at {tail} instead of {:?}",
                        self.last
                    )));
                }
            }
            TourShape::Open => {}
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Tour {
    type Item = Visit;
    type IntoIter = Visits<'a>;

    fn into_iter(self) -> Visits<'a> {
        self.iter()
    }
}
