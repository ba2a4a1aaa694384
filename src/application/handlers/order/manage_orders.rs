//! OrderHandler - order creation, retrieval and status transitions.
//!
//! Orders mostly exist as the thing a redemption materializes into, but the
//! API also exposes them directly so clients can create a pending order
//! first and attach a coupon later.

use std::sync::Arc;

use crate::domain::coupon::CouponError;
use crate::domain::foundation::{AuthenticatedUser, Money, OrderId, Timestamp};
use crate::domain::order::{Order, OrderStatus};
use crate::ports::{OrderRepository, Page};

/// Command to create a pending order.
#[derive(Debug, Clone)]
pub struct CreateOrderCommand {
    pub total: Money,
}

/// Handler for order operations.
pub struct OrderHandler {
    orders: Arc<dyn OrderRepository>,
}

impl OrderHandler {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }

    pub async fn create(
        &self,
        caller: &AuthenticatedUser,
        cmd: CreateOrderCommand,
    ) -> Result<Order, CouponError> {
        let order = Order::create(OrderId::new(), caller.user_id, cmd.total, Timestamp::now());
        self.orders.insert(&order).await?;
        Ok(order)
    }

    /// Fetches one order. Non-admin callers only see their own.
    pub async fn get(
        &self,
        caller: &AuthenticatedUser,
        id: &OrderId,
    ) -> Result<Order, CouponError> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or(CouponError::OrderNotFound)?;
        if order.user_id != caller.user_id && !caller.role.is_admin() {
            return Err(CouponError::OrderNotOwned);
        }
        Ok(order)
    }

    /// Lists the caller's own orders.
    pub async fn list_own(
        &self,
        caller: &AuthenticatedUser,
        page: Page,
    ) -> Result<(Vec<Order>, u64), CouponError> {
        Ok(self.orders.list_for_user(&caller.user_id, page).await?)
    }

    /// Lists every order. Admin only; the route guard enforces the role,
    /// this is a second line of defense.
    pub async fn list_all(
        &self,
        caller: &AuthenticatedUser,
        page: Page,
    ) -> Result<(Vec<Order>, u64), CouponError> {
        if !caller.role.is_admin() {
            return Err(CouponError::OrderNotOwned);
        }
        Ok(self.orders.list_all(page).await?)
    }

    /// Moves an order through its status machine.
    ///
    /// Owners may cancel their own pending order; every other transition is
    /// admin only.
    pub async fn update_status(
        &self,
        caller: &AuthenticatedUser,
        id: &OrderId,
        next: OrderStatus,
    ) -> Result<Order, CouponError> {
        let mut order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or(CouponError::OrderNotFound)?;

        let is_owner_cancel =
            order.user_id == caller.user_id && next == OrderStatus::Cancelled;
        if !caller.role.is_admin() && !is_owner_cancel {
            return Err(CouponError::OrderNotOwned);
        }

        order.transition_to(next, Timestamp::now())?;
        self.orders.update(&order).await?;
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryOrderRepository;
    use crate::domain::foundation::{Role, UserId};

    fn money(cents: i64) -> Money {
        Money::from_cents(cents).unwrap()
    }

    fn user() -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: UserId::new(),
            role: Role::User,
        }
    }

    fn admin() -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: UserId::new(),
            role: Role::Admin,
        }
    }

    fn handler() -> (OrderHandler, Arc<InMemoryOrderRepository>) {
        let orders = Arc::new(InMemoryOrderRepository::new());
        (OrderHandler::new(orders.clone()), orders)
    }

    #[tokio::test]
    async fn create_produces_pending_order() {
        let (handler, _) = handler();
        let caller = user();
        let order = handler
            .create(&caller, CreateOrderCommand { total: money(5_000) })
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.user_id, caller.user_id);
        assert_eq!(order.final_amount, money(5_000));
    }

    #[tokio::test]
    async fn owner_and_admin_can_read_but_strangers_cannot() {
        let (handler, _) = handler();
        let owner = user();
        let order = handler
            .create(&owner, CreateOrderCommand { total: money(5_000) })
            .await
            .unwrap();

        assert!(handler.get(&owner, &order.id).await.is_ok());
        assert!(handler.get(&admin(), &order.id).await.is_ok());

        let stranger = user();
        let result = handler.get(&stranger, &order.id).await;
        assert!(matches!(result, Err(CouponError::OrderNotOwned)));
    }

    #[tokio::test]
    async fn owner_can_cancel_pending_order() {
        let (handler, _) = handler();
        let owner = user();
        let order = handler
            .create(&owner, CreateOrderCommand { total: money(5_000) })
            .await
            .unwrap();

        let cancelled = handler
            .update_status(&owner, &order.id, OrderStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn owner_cannot_accept_their_own_order() {
        let (handler, _) = handler();
        let owner = user();
        let order = handler
            .create(&owner, CreateOrderCommand { total: money(5_000) })
            .await
            .unwrap();

        let result = handler
            .update_status(&owner, &order.id, OrderStatus::Accepted)
            .await;
        assert!(matches!(result, Err(CouponError::OrderNotOwned)));
    }

    #[tokio::test]
    async fn admin_walks_the_status_machine() {
        let (handler, _) = handler();
        let owner = user();
        let boss = admin();
        let order = handler
            .create(&owner, CreateOrderCommand { total: money(5_000) })
            .await
            .unwrap();

        let accepted = handler
            .update_status(&boss, &order.id, OrderStatus::Accepted)
            .await
            .unwrap();
        assert_eq!(accepted.status, OrderStatus::Accepted);

        let completed = handler
            .update_status(&boss, &order.id, OrderStatus::Completed)
            .await
            .unwrap();
        assert_eq!(completed.status, OrderStatus::Completed);
    }

    #[tokio::test]
    async fn invalid_transition_is_rejected() {
        let (handler, _) = handler();
        let owner = user();
        let order = handler
            .create(&owner, CreateOrderCommand { total: money(5_000) })
            .await
            .unwrap();

        let result = handler
            .update_status(&admin(), &order.id, OrderStatus::Completed)
            .await;
        assert!(matches!(result, Err(CouponError::ValidationFailed(_))));
    }

    #[tokio::test]
    async fn list_own_only_shows_callers_orders() {
        let (handler, _) = handler();
        let alice = user();
        let bob = user();
        handler
            .create(&alice, CreateOrderCommand { total: money(1_000) })
            .await
            .unwrap();
        handler
            .create(&bob, CreateOrderCommand { total: money(2_000) })
            .await
            .unwrap();

        let (orders, total) = handler.list_own(&alice, Page::default()).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(orders[0].user_id, alice.user_id);
    }

    #[tokio::test]
    async fn list_all_requires_admin() {
        let (handler, _) = handler();
        let result = handler.list_all(&user(), Page::default()).await;
        assert!(matches!(result, Err(CouponError::OrderNotOwned)));

        let (_, total) = handler.list_all(&admin(), Page::default()).await.unwrap();
        assert_eq!(total, 0);
    }
}
