//! Travel-cost matrices.
//!
//! Provides a dense cost matrix for routing problems. Road-network
//! computation happens elsewhere; this only stores the result.

mod matrix;

pub use matrix::DistanceMatrix;
