//! OrderRepository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OrderId, UserId};
use crate::domain::order::Order;

use super::Page;

/// Repository port for order persistence.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert a new order.
    async fn insert(&self, order: &Order) -> Result<(), DomainError>;

    /// Update an existing order.
    ///
    /// # Errors
    ///
    /// - `OrderNotFound` if the order doesn't exist
    async fn update(&self, order: &Order) -> Result<(), DomainError>;

    /// Find an order by its ID. Returns `None` if not found.
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, DomainError>;

    /// List a user's orders, newest first, with the total count.
    async fn list_for_user(
        &self,
        user_id: &UserId,
        page: Page,
    ) -> Result<(Vec<Order>, u64), DomainError>;

    /// List all orders, newest first, with the total count (admin view).
    async fn list_all(&self, page: Page) -> Result<(Vec<Order>, u64), DomainError>;
}
