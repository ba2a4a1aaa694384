//! Order domain.

mod aggregate;

pub use aggregate::{Order, OrderStatus};
