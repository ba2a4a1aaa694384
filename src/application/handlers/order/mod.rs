//! Order handlers.

mod manage_orders;

pub use manage_orders::{CreateOrderCommand, OrderHandler};
