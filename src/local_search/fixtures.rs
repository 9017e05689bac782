//! Shared generators for the operator property tests.

use proptest::prelude::*;

use crate::distance::DistanceMatrix;
use crate::tour::{Tour, TourShape, Visit};

/// Any of the three tour shapes.
pub(crate) fn any_shape() -> impl Strategy<Value = TourShape> {
    prop_oneof![
        Just(TourShape::Open),
        Just(TourShape::Closed),
        Just(TourShape::Fixed),
    ]
}

/// An n×n matrix with independent costs in each direction.
pub(crate) fn asymmetric_costs(n: usize) -> impl Strategy<Value = DistanceMatrix> {
    proptest::collection::vec(1.0f64..50.0, n * n)
        .prop_map(move |cells| DistanceMatrix::from_fn(n, |a, b| cells[a * n + b]))
}

/// A tour over `visits` in order; a fixed tour ends at the last one.
pub(crate) fn shaped_tour(universe: usize, visits: &[Visit], shape: TourShape) -> Tour {
    let last = match shape {
        TourShape::Open => None,
        TourShape::Closed => Some(visits[0]),
        TourShape::Fixed => Some(visits[visits.len() - 1]),
    };
    Tour::new(universe, visits, last).expect("valid fixture")
}
