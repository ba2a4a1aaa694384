//! In-memory OrderRepository for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::domain::foundation::{DomainError, ErrorCode, OrderId, UserId};
use crate::domain::order::Order;
use crate::ports::{OrderRepository, Page};

/// HashMap-backed order repository.
///
/// Writes can be made to fail on demand, which is how the redemption
/// compensation path gets exercised without a real database outage.
pub struct InMemoryOrderRepository {
    orders: Mutex<HashMap<OrderId, Order>>,
    fail_writes: AtomicBool,
}

impl InMemoryOrderRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            orders: Mutex::new(HashMap::new()),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Creates a repository seeded with orders.
    pub fn with_orders(orders: impl IntoIterator<Item = Order>) -> Self {
        Self {
            orders: Mutex::new(orders.into_iter().map(|o| (o.id, o)).collect()),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent insert and update fail with a database error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of stored orders, for test assertions.
    pub fn order_count(&self) -> usize {
        self.orders
            .lock()
            .expect("InMemoryOrderRepository: lock poisoned")
            .len()
    }

    fn check_writable(&self) -> Result<(), DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::database("simulated write failure"));
        }
        Ok(())
    }
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn insert(&self, order: &Order) -> Result<(), DomainError> {
        self.check_writable()?;
        self.orders
            .lock()
            .expect("InMemoryOrderRepository: lock poisoned")
            .insert(order.id, order.clone());
        Ok(())
    }

    async fn update(&self, order: &Order) -> Result<(), DomainError> {
        self.check_writable()?;
        let mut orders = self
            .orders
            .lock()
            .expect("InMemoryOrderRepository: lock poisoned");
        match orders.get_mut(&order.id) {
            Some(existing) => {
                *existing = order.clone();
                Ok(())
            }
            None => Err(DomainError::new(ErrorCode::OrderNotFound, "Order not found")),
        }
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, DomainError> {
        Ok(self
            .orders
            .lock()
            .expect("InMemoryOrderRepository: lock poisoned")
            .get(id)
            .cloned())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        page: Page,
    ) -> Result<(Vec<Order>, u64), DomainError> {
        let orders = self
            .orders
            .lock()
            .expect("InMemoryOrderRepository: lock poisoned");
        let mut matching: Vec<Order> = orders
            .values()
            .filter(|o| &o.user_id == user_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.size as usize)
            .collect();
        Ok((items, total))
    }

    async fn list_all(&self, page: Page) -> Result<(Vec<Order>, u64), DomainError> {
        let orders = self
            .orders
            .lock()
            .expect("InMemoryOrderRepository: lock poisoned");
        let mut all: Vec<Order> = orders.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.size as usize)
            .collect();
        Ok((items, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Money;

    fn sample_order(user_id: UserId) -> Order {
        Order::create(
            OrderId::new(),
            user_id,
            Money::from_cents(5_000).unwrap(),
            crate::domain::foundation::Timestamp::now(),
        )
    }

    #[tokio::test]
    async fn fail_writes_blocks_insert_and_update() {
        let repo = InMemoryOrderRepository::new();
        let order = sample_order(UserId::new());
        repo.insert(&order).await.unwrap();

        repo.fail_writes(true);
        assert!(repo.insert(&sample_order(UserId::new())).await.is_err());
        assert!(repo.update(&order).await.is_err());

        repo.fail_writes(false);
        repo.update(&order).await.unwrap();
    }

    #[tokio::test]
    async fn list_for_user_filters_by_owner() {
        let alice = UserId::new();
        let bob = UserId::new();
        let repo = InMemoryOrderRepository::with_orders([
            sample_order(alice),
            sample_order(alice),
            sample_order(bob),
        ]);

        let (orders, total) = repo.list_for_user(&alice, Page::default()).await.unwrap();
        assert_eq!(total, 2);
        assert!(orders.iter().all(|o| o.user_id == alice));
    }
}
