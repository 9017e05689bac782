//! Capacity ceilings and per-tour content caches.
//!
//! - [`Capacity`] — travel-weight ceiling plus named [`Constraint`]s
//! - [`Content`] — a tour's cached weight and constraint quantities

#[allow(clippy::module_inception)]
mod capacity;
mod content;

pub use capacity::{Capacity, Constraint};
pub use content::Content;
