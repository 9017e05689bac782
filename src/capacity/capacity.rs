//! Resource ceilings and the checks that guard them.

use serde::{Deserialize, Serialize};

use super::Content;
use crate::error::ConstraintViolation;
use crate::evaluation::tour_cost;
use crate::models::Problem;
use crate::tour::{Tour, Visit};

/// Absorbs rounding when a quantity lands exactly on its ceiling.
const SLACK: f64 = 1e-9;

/// A named per-visit resource with a ceiling (payload, volume, ...).
///
/// # Examples
///
/// ```
/// use u_tours::capacity::Constraint;
///
/// let payload = Constraint::new("payload", vec![3.0, 3.0, 3.0, 3.0], 9.0);
/// assert_eq!(payload.cost(2), 3.0);
/// assert_eq!(payload.quantity_of(&[0, 1, 2]), 9.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    name: String,
    cost_per_visit: Vec<f64>,
    max: f64,
}

impl Constraint {
    /// Creates a constraint from per-visit costs and a ceiling.
    pub fn new(name: impl Into<String>, cost_per_visit: Vec<f64>, max: f64) -> Self {
        Self {
            name: name.into(),
            cost_per_visit,
            max,
        }
    }

    /// Constraint name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cost of `visit`; zero for ids without an entry.
    pub fn cost(&self, visit: Visit) -> f64 {
        self.cost_per_visit.get(visit).copied().unwrap_or(0.0)
    }

    /// Ceiling.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Summed cost of `visits`.
    pub fn quantity_of(&self, visits: &[Visit]) -> f64 {
        visits.iter().map(|&v| self.cost(v)).sum()
    }

    fn admits(&self, quantity: f64) -> bool {
        quantity <= self.max + SLACK
    }

    fn violation(&self, quantity: f64) -> ConstraintViolation {
        ConstraintViolation {
            constraint: self.name.clone(),
            quantity,
            max: self.max,
        }
    }
}

/// Ceilings a tour's [`Content`] must respect: a travel-weight maximum plus
/// zero or more [`Constraint`]s.
///
/// Mutating methods (`add`, `update_exchange`) assume the matching check
/// (`can_add`, `exchange_is_possible`) already passed; violating that is a
/// programming error and panics, since the cache could no longer be trusted.
///
/// # Examples
///
/// ```
/// use u_tours::capacity::{Capacity, Constraint};
///
/// let capacity = Capacity::new(10.0)
///     .with_constraint(Constraint::new("payload", vec![3.0; 4], 9.0));
/// let mut content = capacity.empty();
/// capacity.add_all(&mut content, &[0, 1, 2]);
/// assert_eq!(content.quantity(0), 9.0);
/// assert!(!capacity.can_add(&content, 3));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capacity {
    max: f64,
    #[serde(default)]
    constraints: Vec<Constraint>,
}

impl Capacity {
    /// Creates a capacity with a travel-weight ceiling and no constraints.
    pub fn new(max: f64) -> Self {
        Self {
            max,
            constraints: Vec::new(),
        }
    }

    /// A capacity that never rejects anything.
    pub fn unlimited() -> Self {
        Self::new(f64::INFINITY)
    }

    /// Adds a constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Travel-weight ceiling.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// The constraints, in content order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// A zeroed content record matching this capacity.
    pub fn empty(&self) -> Content {
        Content::new(0.0, vec![0.0; self.constraints.len()])
    }

    /// Recomputes a tour's content from scratch.
    pub fn content_of<P: Problem + ?Sized>(&self, problem: &P, tour: &Tour) -> Content {
        let visits = tour.visits();
        let quantities = self
            .constraints
            .iter()
            .map(|c| c.quantity_of(&visits))
            .collect();
        Content::new(tour_cost(problem, tour), quantities)
    }

    /// Returns `true` if a tour of this weight stays under the ceiling.
    pub fn admits_weight(&self, weight: f64) -> bool {
        weight <= self.max + SLACK
    }

    /// Returns `true` if the weight and every quantity are within their ceilings.
    pub fn is_within(&self, content: &Content) -> bool {
        self.admits_weight(content.weight())
            && self
                .constraints
                .iter()
                .enumerate()
                .all(|(i, c)| c.admits(content.quantity(i)))
    }

    /// Returns `true` if `visit` fits every constraint. Ignores the weight.
    pub fn can_add(&self, content: &Content, visit: Visit) -> bool {
        self.can_add_all(content, std::slice::from_ref(&visit))
    }

    /// Returns `true` if all of `visits` fit every constraint together.
    pub fn can_add_all(&self, content: &Content, visits: &[Visit]) -> bool {
        self.check_level(content, visits).is_ok()
    }

    /// Like [`can_add_all`](Capacity::can_add_all), also checking a prospective weight.
    pub fn can_add_with_weight(&self, content: &Content, weight: f64, visits: &[Visit]) -> bool {
        self.admits_weight(weight) && self.can_add_all(content, visits)
    }

    /// Adds the quantities of `visits`, or reports the first violated constraint.
    pub fn try_add_all(
        &self,
        content: &mut Content,
        visits: &[Visit],
    ) -> Result<(), ConstraintViolation> {
        self.check_level(content, visits)?;
        self.shift_quantities(content, visits, 1.0);
        Ok(())
    }

    /// Adds the quantities of one visit, or reports the first violated constraint.
    pub fn try_add(&self, content: &mut Content, visit: Visit) -> Result<(), ConstraintViolation> {
        self.try_add_all(content, std::slice::from_ref(&visit))
    }

    /// Adds the quantities of `visit`.
    ///
    /// # Panics
    ///
    /// Panics if [`can_add`](Capacity::can_add) would have returned `false`.
    pub fn add(&self, content: &mut Content, visit: Visit) {
        self.add_all(content, std::slice::from_ref(&visit));
    }

    /// Adds the quantities of `visits`.
    ///
    /// # Panics
    ///
    /// Panics if [`can_add_all`](Capacity::can_add_all) would have returned `false`.
    pub fn add_all(&self, content: &mut Content, visits: &[Visit]) {
        if let Err(violation) = self.try_add_all(content, visits) {
            panic!("{violation}");
        }
    }

    /// Subtracts the quantities of `visit`.
    pub fn remove(&self, content: &mut Content, visit: Visit) {
        self.remove_all(content, std::slice::from_ref(&visit));
    }

    /// Subtracts the quantities of `visits`.
    pub fn remove_all(&self, content: &mut Content, visits: &[Visit]) {
        self.shift_quantities(content, visits, -1.0);
    }

    /// Checks a prospective weight and the constraints for `visit`, and
    /// commits both when they fit. Returns whether it committed.
    pub fn update_and_check_costs(&self, content: &mut Content, weight: f64, visit: Visit) -> bool {
        if !self.can_add_with_weight(content, weight, std::slice::from_ref(&visit)) {
            return false;
        }
        content.set_weight(weight);
        self.shift_quantities(content, std::slice::from_ref(&visit), 1.0);
        true
    }

    /// Returns `true` if swapping `removed` for `added` keeps every constraint
    /// within its ceiling.
    ///
    /// Only a positive net delta is checked; a decrease is accepted as is.
    /// This assumes constraint costs are non-negative.
    pub fn exchange_is_possible(
        &self,
        content: &Content,
        removed: &[Visit],
        added: &[Visit],
    ) -> bool {
        self.check_delta(content, added, removed).is_ok()
    }

    /// Applies the swap of `removed` for `added`, or reports the first
    /// violated constraint without changing anything.
    pub fn try_update_exchange(
        &self,
        content: &mut Content,
        removed: &[Visit],
        added: &[Visit],
    ) -> Result<(), ConstraintViolation> {
        self.check_delta(content, added, removed)?;
        self.shift_quantities(content, removed, -1.0);
        self.shift_quantities(content, added, 1.0);
        Ok(())
    }

    /// Applies the swap of `removed` for `added`.
    ///
    /// # Panics
    ///
    /// Panics if [`exchange_is_possible`](Capacity::exchange_is_possible)
    /// would have returned `false`.
    pub fn update_exchange(&self, content: &mut Content, removed: &[Visit], added: &[Visit]) {
        if let Err(violation) = self.try_update_exchange(content, removed, added) {
            panic!("{violation}");
        }
    }

    /// Every constraint must hold at its resulting level, whatever the sign of
    /// the added quantity.
    fn check_level(
        &self,
        content: &Content,
        visits: &[Visit],
    ) -> Result<(), ConstraintViolation> {
        for (i, c) in self.constraints.iter().enumerate() {
            let quantity = content.quantity(i) + c.quantity_of(visits);
            if !c.admits(quantity) {
                return Err(c.violation(quantity));
            }
        }
        Ok(())
    }

    fn check_delta(
        &self,
        content: &Content,
        added: &[Visit],
        removed: &[Visit],
    ) -> Result<(), ConstraintViolation> {
        for (i, c) in self.constraints.iter().enumerate() {
            let delta = c.quantity_of(added) - c.quantity_of(removed);
            if delta <= 0.0 {
                continue;
            }
            let quantity = content.quantity(i) + delta;
            if !c.admits(quantity) {
                return Err(c.violation(quantity));
            }
        }
        Ok(())
    }

    fn shift_quantities(&self, content: &mut Content, visits: &[Visit], sign: f64) {
        for (quantity, c) in content
            .quantities_mut()
            .iter_mut()
            .zip(self.constraints.iter())
        {
            *quantity += sign * c.quantity_of(visits);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;
    use crate::models::MatrixProblem;

    fn payload_capacity() -> Capacity {
        Capacity::new(10.0).with_constraint(Constraint::new("payload", vec![3.0; 4], 9.0))
    }

    #[test]
    fn test_empty_matches_constraints() {
        let capacity = payload_capacity();
        let content = capacity.empty();
        assert_eq!(content.weight(), 0.0);
        assert_eq!(content.quantities(), &[0.0]);
    }

    #[test]
    fn test_content_of_tour() {
        let dm = DistanceMatrix::from_data(
            4,
            vec![
                0.0, 1.0, 2.0, 3.0, //
                1.0, 0.0, 1.0, 2.0, //
                2.0, 1.0, 0.0, 1.0, //
                3.0, 2.0, 1.0, 0.0,
            ],
        )
        .expect("valid");
        let problem =
            MatrixProblem::new(dm, payload_capacity()).with_visit_costs(vec![0.5, 0.5, 0.5, 0.5]);
        let tour = Tour::closed(4, &[0, 1, 2]).expect("valid");

        let content = problem.capacity().content_of(&problem, &tour);
        // 0→1→2→0 travels 1 + 1 + 2, plus three visit costs.
        assert!((content.weight() - 5.5).abs() < 1e-10);
        assert_eq!(content.quantity(0), 9.0);
        assert!(!problem.capacity().can_add(&content, 3));
        assert!(problem.capacity().is_within(&content));
    }

    #[test]
    #[should_panic(expected = "payload")]
    fn test_add_without_check_panics() {
        let capacity = payload_capacity();
        let mut content = capacity.empty();
        capacity.add_all(&mut content, &[0, 1, 2, 3]);
    }

    #[test]
    fn test_add_rejects_free_visit_over_ceiling() {
        let capacity =
            Capacity::new(10.0).with_constraint(Constraint::new("payload", vec![3.0, 0.0], 9.0));
        let mut content = Content::new(0.0, vec![10.0]);
        assert!(!capacity.can_add(&content, 1));
        let err = capacity.try_add(&mut content, 1).expect_err("already over");
        assert_eq!(err.quantity, 10.0);
        assert_eq!(content.quantity(0), 10.0);

        let result = std::panic::catch_unwind(move || {
            let mut content = Content::new(0.0, vec![10.0]);
            capacity.add(&mut content, 1);
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_try_add_reports_violation() {
        let capacity = payload_capacity();
        let mut content = capacity.empty();
        capacity.add_all(&mut content, &[0, 1, 2]);
        let err = capacity.try_add(&mut content, 3).unwrap_err();
        assert_eq!(err.constraint, "payload");
        assert_eq!(err.quantity, 12.0);
        assert_eq!(content.quantity(0), 9.0);
    }

    #[test]
    fn test_remove_restores_quantity() {
        let capacity = payload_capacity();
        let mut content = capacity.empty();
        capacity.add_all(&mut content, &[0, 1, 2]);
        capacity.remove(&mut content, 1);
        assert_eq!(content.quantity(0), 6.0);
        assert!(capacity.can_add(&content, 3));
    }

    #[test]
    fn test_update_and_check_costs() {
        let capacity = payload_capacity();
        let mut content = capacity.empty();
        assert!(!capacity.update_and_check_costs(&mut content, 11.0, 0));
        assert_eq!(content, capacity.empty());
        assert!(capacity.update_and_check_costs(&mut content, 4.0, 0));
        assert_eq!(content.weight(), 4.0);
        assert_eq!(content.quantity(0), 3.0);
    }

    #[test]
    fn test_exchange_is_optimistic_on_decrease() {
        let capacity = Capacity::new(100.0)
            .with_constraint(Constraint::new("volume", vec![1.0, 4.0, 6.0], 5.0));
        // The cache is already over the ceiling; a decrease still passes.
        let mut content = Content::new(0.0, vec![7.0]);
        assert!(capacity.exchange_is_possible(&content, &[2], &[1]));
        assert!(!capacity.exchange_is_possible(&content, &[1], &[2]));
        capacity.update_exchange(&mut content, &[2], &[1]);
        assert!((content.quantity(0) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_exchange_sequences() {
        let capacity = Capacity::new(100.0)
            .with_constraint(Constraint::new("volume", vec![1.0, 2.0, 3.0, 4.0], 8.0));
        let mut content = capacity.empty();
        capacity.add_all(&mut content, &[0, 1, 2]);
        assert!(capacity.exchange_is_possible(&content, &[0, 1], &[3]));
        assert!(!capacity.exchange_is_possible(&content, &[0], &[3]));
        let swapped = capacity.try_update_exchange(&mut content, &[0], &[3]);
        assert!(swapped.is_err());
        assert_eq!(content.quantity(0), 6.0);
    }

    #[test]
    fn test_can_add_with_weight() {
        let capacity = payload_capacity();
        let content = capacity.empty();
        assert!(capacity.can_add_with_weight(&content, 10.0, &[0]));
        assert!(!capacity.can_add_with_weight(&content, 10.5, &[0]));
        assert!(!capacity.can_add_with_weight(&content, 1.0, &[0, 1, 2, 3]));
    }

    #[test]
    fn test_unlimited() {
        let capacity = Capacity::unlimited();
        let content = Content::new(1e12, vec![]);
        assert!(capacity.is_within(&content));
        assert!(capacity.can_add(&content, 42));
    }

    #[test]
    fn test_capacity_deserializes_without_constraints() {
        let capacity: Capacity = serde_json::from_str(r#"{ "max": 25.0 }"#).expect("valid json");
        assert_eq!(capacity.max(), 25.0);
        assert!(capacity.constraints().is_empty());
    }
}
