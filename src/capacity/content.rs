//! Per-tour running totals.

use serde::{Deserialize, Serialize};

/// Cached travel weight and constraint quantities of one tour.
///
/// Mirrors a [`Capacity`](super::Capacity): `quantities[i]` belongs to the
/// capacity's `i`-th constraint. Operators keep it in sync incrementally;
/// [`Solution::reconcile`](crate::models::Solution::reconcile) compares it
/// with a fresh recomputation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Content {
    weight: f64,
    quantities: Vec<f64>,
}

impl Content {
    /// Creates a content record.
    pub fn new(weight: f64, quantities: Vec<f64>) -> Self {
        Self { weight, quantities }
    }

    /// Cached travel weight (tour cost).
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Overwrites the cached travel weight.
    pub fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }

    /// Cached quantity per constraint.
    pub fn quantities(&self) -> &[f64] {
        &self.quantities
    }

    /// Cached quantity of constraint `index`, zero if there is none.
    pub fn quantity(&self, index: usize) -> f64 {
        self.quantities.get(index).copied().unwrap_or(0.0)
    }

    pub(crate) fn quantities_mut(&mut self) -> &mut [f64] {
        &mut self.quantities
    }

    /// Largest absolute difference to `other` over weight and quantities.
    pub fn drift(&self, other: &Content) -> f64 {
        let weight = (self.weight - other.weight).abs();
        self.quantities
            .iter()
            .zip(other.quantities.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(weight, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_accessors() {
        let mut c = Content::new(12.5, vec![3.0, 1.0]);
        assert_eq!(c.weight(), 12.5);
        assert_eq!(c.quantity(1), 1.0);
        assert_eq!(c.quantity(7), 0.0);
        c.set_weight(4.0);
        assert_eq!(c.weight(), 4.0);
    }

    #[test]
    fn test_drift() {
        let a = Content::new(10.0, vec![3.0, 5.0]);
        let b = Content::new(11.0, vec![3.0, 8.5]);
        assert!((a.drift(&b) - 3.5).abs() < 1e-10);
        assert!(a.drift(&a).abs() < 1e-10);
    }
}
