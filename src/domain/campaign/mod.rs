//! Campaign domain.

mod aggregate;

pub use aggregate::Campaign;
