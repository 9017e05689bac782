//! Error types for tour mutation and capacity bookkeeping.

use thiserror::Error;

use crate::tour::Visit;

/// Errors reported by [`Tour`](crate::tour::Tour) construction and mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TourError {
    /// A visit id is out of range or does not satisfy the operation's preconditions.
    #[error("invalid visit {visit}: {reason}")]
    InvalidArgument {
        /// Offending visit id.
        visit: Visit,
        /// Why the visit was rejected.
        reason: &'static str,
    },

    /// The visit is already part of the tour.
    #[error("visit {0} is already present in the tour")]
    AlreadyPresent(Visit),

    /// The operation is not allowed for this visit or tour shape.
    #[error("invalid operation on visit {visit}: {reason}")]
    InvalidOperation {
        /// Visit the operation targeted.
        visit: Visit,
        /// Why the operation is not allowed.
        reason: &'static str,
    },

    /// A structural check found the successor map inconsistent.
    #[error("tour is inconsistent: {0}")]
    Inconsistent(String),
}

/// A capacity constraint would be exceeded by a commit.
///
/// Callers must check feasibility before adding; this is a programming error
/// on their side, reported as a value by the `try_*` methods of
/// [`Capacity`](crate::capacity::Capacity) and as a panic by the others.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("constraint `{constraint}` violated: {quantity} exceeds maximum {max}")]
pub struct ConstraintViolation {
    /// Name of the violated constraint.
    pub constraint: String,
    /// Quantity the commit would have produced.
    pub quantity: f64,
    /// Ceiling of the constraint.
    pub max: f64,
}

/// Result alias for tour operations.
pub type Result<T> = std::result::Result<T, TourError>;
