//! RedeemCouponHandler - the redemption coordinator.
//!
//! Orchestrates one coupon redemption end to end: lookup, advisory
//! eligibility checks, the atomic usage reservation, order materialization
//! with a compensating release on failure, the audit record, and the
//! fire-and-forget notification.

use std::sync::Arc;

use crate::domain::coupon::{
    Coupon, CouponCode, CouponError, CouponUsed, RejectionReason,
};
use crate::domain::foundation::{
    EventId, Money, OrderId, SerializableDomainEvent, Timestamp, UserId,
};
use crate::domain::order::Order;
use crate::domain::usage::UsageRecord;
use crate::ports::{CouponStore, EventPublisher, OrderRepository, UsageLog};

/// Command to redeem a coupon against a purchase.
#[derive(Debug, Clone)]
pub struct RedeemCouponCommand {
    pub user_id: UserId,
    /// Raw code as typed by the user; normalized during lookup.
    pub code: String,
    pub purchase_amount: Money,
    /// Existing pending order to attach to, or `None` to create one.
    pub order_id: Option<OrderId>,
}

/// Result of a successful redemption.
#[derive(Debug, Clone)]
pub struct RedemptionReceipt {
    pub coupon_code: CouponCode,
    pub original_amount: Money,
    pub discount_amount: Money,
    pub final_amount: Money,
    /// Usage counter after this redemption's reservation.
    pub usage_count: u32,
    pub max_usage: Option<u32>,
    pub order_id: OrderId,
}

/// Handler for the redemption flow.
///
/// # Concurrency
///
/// Steps 2 and 3 read possibly stale state and exist only to reject
/// clearly-ineligible requests with a precise reason. The store's
/// `reserve_usage` in step 4 is the single arbiter of the global cap: under
/// concurrent redemptions of the same coupon, exactly as many requests pass
/// it as the cap allows, regardless of what the pre-checks saw.
pub struct RedeemCouponHandler {
    coupons: Arc<dyn CouponStore>,
    orders: Arc<dyn OrderRepository>,
    usage: Arc<dyn UsageLog>,
    events: Arc<dyn EventPublisher>,
}

impl RedeemCouponHandler {
    pub fn new(
        coupons: Arc<dyn CouponStore>,
        orders: Arc<dyn OrderRepository>,
        usage: Arc<dyn UsageLog>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            coupons,
            orders,
            usage,
            events,
        }
    }

    pub async fn handle(
        &self,
        cmd: RedeemCouponCommand,
    ) -> Result<RedemptionReceipt, CouponError> {
        let now = Timestamp::now();

        // 1. Normalize the code and look the coupon up. A code that fails
        //    normalization can't match any stored coupon.
        let code = CouponCode::try_new(&cmd.code).map_err(|_| CouponError::NotFound)?;
        let coupon = self
            .coupons
            .find_by_code(&code)
            .await?
            .ok_or(CouponError::NotFound)?;

        // 2. Advisory eligibility pre-check (active, window, cap, minimum)
        coupon.evaluate_eligibility(cmd.purchase_amount, now)?;

        // 3. Per-user cap, counted from the audit log
        let prior_uses = self
            .usage
            .count_for_user(&coupon.id, &cmd.user_id)
            .await?;
        if prior_uses >= coupon.user_max_usage {
            return Err(CouponError::UserLimitReached);
        }

        // 4. Atomic reservation: the only step that coordinates across
        //    concurrent requests. `None` means a concurrent redeemer took
        //    the last slot since step 2.
        let reserved = self
            .coupons
            .reserve_usage(&coupon.id)
            .await?
            .ok_or(CouponError::Rejected(RejectionReason::UsageLimitReached))?;

        // 5. Compute the discount from the post-increment snapshot
        let discount = reserved.compute_discount(cmd.purchase_amount);

        // 6. Materialize the order. Any failure here releases the
        //    reservation so the slot returns to the pool.
        let order = match self.materialize_order(&cmd, &reserved, discount, now).await {
            Ok(order) => order,
            Err(err) => {
                if let Err(release_err) = self.coupons.release_usage(&reserved.id).await {
                    tracing::error!(
                        coupon_id = %reserved.id,
                        error = %release_err,
                        "failed to release usage reservation; counter now overstates usage by one"
                    );
                }
                return Err(err);
            }
        };

        // 7. Append the audit record. The order already carries the coupon,
        //    so a failure here surfaces without unwinding the redemption.
        let record = UsageRecord::new(
            reserved.id,
            reserved.code.clone(),
            cmd.user_id,
            order.id,
            order.total,
            order.discount,
            order.final_amount,
            now,
        );
        if let Err(err) = self.usage.append(&record).await {
            tracing::warn!(
                coupon_id = %reserved.id,
                order_id = %order.id,
                error = %err,
                "redemption succeeded but audit record was not written"
            );
            return Err(err.into());
        }

        // 8. Notify. Fire-and-forget: a pub/sub outage never fails a
        //    redemption that already committed.
        let event = CouponUsed {
            event_id: EventId::new(),
            coupon_id: reserved.id,
            coupon_code: reserved.code.clone(),
            user_id: cmd.user_id,
            order_id: order.id,
            discount_amount: order.discount,
            occurred_at: now,
        };
        if let Err(err) = self.events.publish(event.to_envelope()).await {
            tracing::warn!(
                coupon_id = %reserved.id,
                error = %err,
                "failed to publish coupon.used event"
            );
        }

        // 9. Receipt from the order's final amounts
        Ok(RedemptionReceipt {
            coupon_code: reserved.code,
            original_amount: order.total,
            discount_amount: order.discount,
            final_amount: order.final_amount,
            usage_count: reserved.current_usage,
            max_usage: reserved.max_usage,
            order_id: order.id,
        })
    }

    /// Attaches the discount to an existing pending order, or creates a
    /// fresh one for the purchase amount.
    async fn materialize_order(
        &self,
        cmd: &RedeemCouponCommand,
        coupon: &Coupon,
        discount: Money,
        now: Timestamp,
    ) -> Result<Order, CouponError> {
        match cmd.order_id {
            Some(order_id) => {
                let mut order = self
                    .orders
                    .find_by_id(&order_id)
                    .await?
                    .ok_or(CouponError::OrderNotFound)?;
                if order.user_id != cmd.user_id {
                    return Err(CouponError::OrderNotOwned);
                }
                order.apply_coupon(coupon.id, coupon.code.clone(), discount, now)?;
                self.orders.update(&order).await?;
                Ok(order)
            }
            None => {
                let mut order =
                    Order::create(OrderId::new(), cmd.user_id, cmd.purchase_amount, now);
                order.apply_coupon(coupon.id, coupon.code.clone(), discount, now)?;
                self.orders.insert(&order).await?;
                Ok(order)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::memory::{
        InMemoryCouponStore, InMemoryOrderRepository, InMemoryUsageLog,
    };
    use crate::domain::coupon::Discount;
    use crate::domain::foundation::{CampaignId, CouponId, DomainError, EventEnvelope};
    use crate::domain::order::OrderStatus;
    use crate::ports::EventPublisher;
    use async_trait::async_trait;

    // ════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════

    fn money(cents: i64) -> Money {
        Money::from_cents(cents).unwrap()
    }

    /// SAVE10: 10.00 off, minimum purchase 20.00, one global use, one per user.
    fn save10() -> Coupon {
        let now = Timestamp::now();
        Coupon::new(
            CouponId::new(),
            CouponCode::try_new("SAVE10").unwrap(),
            None,
            Discount::fixed(money(1_000)),
            money(2_000),
            now.minus_days(1),
            now.add_days(30),
            Some(1),
            1,
            CampaignId::new(),
            UserId::new(),
            now,
        )
        .unwrap()
    }

    struct Fixture {
        coupons: Arc<InMemoryCouponStore>,
        orders: Arc<InMemoryOrderRepository>,
        usage: Arc<InMemoryUsageLog>,
        events: Arc<InMemoryEventBus>,
        handler: RedeemCouponHandler,
    }

    fn fixture_with(coupon: Coupon) -> Fixture {
        let coupons = Arc::new(InMemoryCouponStore::with_coupons([coupon]));
        let orders = Arc::new(InMemoryOrderRepository::new());
        let usage = Arc::new(InMemoryUsageLog::new());
        let events = Arc::new(InMemoryEventBus::new());
        let handler = RedeemCouponHandler::new(
            coupons.clone(),
            orders.clone(),
            usage.clone(),
            events.clone(),
        );
        Fixture {
            coupons,
            orders,
            usage,
            events,
            handler,
        }
    }

    fn redeem(user_id: UserId, code: &str, cents: i64) -> RedeemCouponCommand {
        RedeemCouponCommand {
            user_id,
            code: code.to_string(),
            purchase_amount: money(cents),
            order_id: None,
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Success Path
    // ════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn redeems_fixed_discount_and_creates_order() {
        let coupon = save10();
        let fx = fixture_with(coupon.clone());

        let receipt = fx
            .handler
            .handle(redeem(UserId::new(), "SAVE10", 5_000))
            .await
            .unwrap();

        assert_eq!(receipt.original_amount, money(5_000));
        assert_eq!(receipt.discount_amount, money(1_000));
        assert_eq!(receipt.final_amount, money(4_000));
        assert_eq!(receipt.usage_count, 1);
        assert_eq!(receipt.max_usage, Some(1));

        assert_eq!(fx.orders.order_count(), 1);
        assert_eq!(fx.usage.record_count(), 1);
        assert_eq!(fx.coupons.current_usage(&coupon.id), Some(1));
    }

    #[tokio::test]
    async fn lowercase_code_is_normalized_before_lookup() {
        let fx = fixture_with(save10());
        let receipt = fx
            .handler
            .handle(redeem(UserId::new(), "  save10  ", 5_000))
            .await
            .unwrap();
        assert_eq!(receipt.coupon_code.as_str(), "SAVE10");
    }

    #[tokio::test]
    async fn publishes_coupon_used_event() {
        let fx = fixture_with(save10());
        fx.handler
            .handle(redeem(UserId::new(), "SAVE10", 5_000))
            .await
            .unwrap();

        let events = fx.events.events_of_type("coupon.used.v1");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].payload["coupon_code"], "SAVE10");
        assert_eq!(events[0].payload["discount_amount"], 1_000);
    }

    #[tokio::test]
    async fn attaches_to_existing_pending_order() {
        let user_id = UserId::new();
        let coupon = save10();
        let order = Order::create(OrderId::new(), user_id, money(5_000), Timestamp::now());
        let order_id = order.id;

        let coupons = Arc::new(InMemoryCouponStore::with_coupons([coupon]));
        let orders = Arc::new(InMemoryOrderRepository::with_orders([order]));
        let usage = Arc::new(InMemoryUsageLog::new());
        let events = Arc::new(InMemoryEventBus::new());
        let handler =
            RedeemCouponHandler::new(coupons, orders.clone(), usage, events);

        let receipt = handler
            .handle(RedeemCouponCommand {
                user_id,
                code: "SAVE10".to_string(),
                purchase_amount: money(5_000),
                order_id: Some(order_id),
            })
            .await
            .unwrap();

        assert_eq!(receipt.order_id, order_id);
        let stored = orders.find_by_id(&order_id).await.unwrap().unwrap();
        assert_eq!(stored.discount, money(1_000));
        assert_eq!(stored.final_amount, money(4_000));
    }

    #[tokio::test]
    async fn percentage_discount_respects_cap() {
        let now = Timestamp::now();
        let coupon = Coupon::new(
            CouponId::new(),
            CouponCode::try_new("HALF").unwrap(),
            None,
            // 50% up to 15.00
            Discount::percentage(5_000, Some(money(1_500))).unwrap(),
            Money::ZERO,
            now.minus_days(1),
            now.add_days(30),
            None,
            1,
            CampaignId::new(),
            UserId::new(),
            now,
        )
        .unwrap();
        let fx = fixture_with(coupon);

        let receipt = fx
            .handler
            .handle(redeem(UserId::new(), "HALF", 10_000))
            .await
            .unwrap();
        assert_eq!(receipt.discount_amount, money(1_500));
        assert_eq!(receipt.final_amount, money(8_500));
    }

    // ════════════════════════════════════════════════════════════════════════
    // Rejections (no side effects)
    // ════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let fx = fixture_with(save10());
        let result = fx.handler.handle(redeem(UserId::new(), "NOPE99", 5_000)).await;
        assert!(matches!(result, Err(CouponError::NotFound)));
        assert_eq!(fx.orders.order_count(), 0);
    }

    #[tokio::test]
    async fn malformed_code_is_not_found() {
        let fx = fixture_with(save10());
        let result = fx.handler.handle(redeem(UserId::new(), "!!", 5_000)).await;
        assert!(matches!(result, Err(CouponError::NotFound)));
    }

    #[tokio::test]
    async fn below_minimum_purchase_is_rejected_without_side_effects() {
        let coupon = save10();
        let fx = fixture_with(coupon.clone());

        let result = fx.handler.handle(redeem(UserId::new(), "SAVE10", 1_000)).await;
        assert!(matches!(
            result,
            Err(CouponError::Rejected(RejectionReason::BelowMinimum { .. }))
        ));
        assert_eq!(fx.coupons.current_usage(&coupon.id), Some(0));
        assert_eq!(fx.orders.order_count(), 0);
        assert_eq!(fx.usage.record_count(), 0);
        assert_eq!(fx.events.event_count(), 0);
    }

    #[tokio::test]
    async fn expired_coupon_is_rejected() {
        let mut coupon = save10();
        let now = Timestamp::now();
        coupon.start_at = now.minus_days(10);
        coupon.expires_at = now.minus_days(1);
        let fx = fixture_with(coupon);

        let result = fx.handler.handle(redeem(UserId::new(), "SAVE10", 5_000)).await;
        assert!(matches!(
            result,
            Err(CouponError::Rejected(RejectionReason::Expired))
        ));
    }

    #[tokio::test]
    async fn second_redemption_hits_the_global_cap() {
        let coupon = save10();
        let fx = fixture_with(coupon.clone());

        fx.handler
            .handle(redeem(UserId::new(), "SAVE10", 5_000))
            .await
            .unwrap();
        let result = fx.handler.handle(redeem(UserId::new(), "SAVE10", 5_000)).await;

        assert!(matches!(
            result,
            Err(CouponError::Rejected(RejectionReason::UsageLimitReached))
        ));
        assert_eq!(fx.coupons.current_usage(&coupon.id), Some(1));
        assert_eq!(fx.orders.order_count(), 1);
        assert_eq!(fx.usage.record_count(), 1);
    }

    #[tokio::test]
    async fn per_user_cap_blocks_repeat_redemption() {
        let mut coupon = save10();
        coupon.max_usage = None; // only the per-user cap applies
        let fx = fixture_with(coupon);
        let user_id = UserId::new();

        fx.handler
            .handle(redeem(user_id, "SAVE10", 5_000))
            .await
            .unwrap();
        let result = fx.handler.handle(redeem(user_id, "SAVE10", 5_000)).await;
        assert!(matches!(result, Err(CouponError::UserLimitReached)));

        // A different user is unaffected
        fx.handler
            .handle(redeem(UserId::new(), "SAVE10", 5_000))
            .await
            .unwrap();
    }

    // ════════════════════════════════════════════════════════════════════════
    // Compensation
    // ════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn missing_order_releases_the_reservation() {
        let coupon = save10();
        let fx = fixture_with(coupon.clone());

        let result = fx
            .handler
            .handle(RedeemCouponCommand {
                user_id: UserId::new(),
                code: "SAVE10".to_string(),
                purchase_amount: money(5_000),
                order_id: Some(OrderId::new()),
            })
            .await;

        assert!(matches!(result, Err(CouponError::OrderNotFound)));
        assert_eq!(fx.coupons.current_usage(&coupon.id), Some(0));
        assert_eq!(fx.usage.record_count(), 0);
        assert_eq!(fx.events.event_count(), 0);
    }

    #[tokio::test]
    async fn foreign_order_releases_the_reservation() {
        let coupon = save10();
        let other_users_order =
            Order::create(OrderId::new(), UserId::new(), money(5_000), Timestamp::now());
        let order_id = other_users_order.id;

        let coupons = Arc::new(InMemoryCouponStore::with_coupons([coupon.clone()]));
        let orders = Arc::new(InMemoryOrderRepository::with_orders([other_users_order]));
        let usage = Arc::new(InMemoryUsageLog::new());
        let events = Arc::new(InMemoryEventBus::new());
        let handler = RedeemCouponHandler::new(
            coupons.clone(),
            orders,
            usage,
            events,
        );

        let result = handler
            .handle(RedeemCouponCommand {
                user_id: UserId::new(),
                code: "SAVE10".to_string(),
                purchase_amount: money(5_000),
                order_id: Some(order_id),
            })
            .await;

        assert!(matches!(result, Err(CouponError::OrderNotOwned)));
        assert_eq!(coupons.current_usage(&coupon.id), Some(0));
    }

    #[tokio::test]
    async fn non_pending_order_releases_the_reservation() {
        let user_id = UserId::new();
        let coupon = save10();
        let mut order = Order::create(OrderId::new(), user_id, money(5_000), Timestamp::now());
        order
            .transition_to(OrderStatus::Cancelled, Timestamp::now())
            .unwrap();
        let order_id = order.id;

        let coupons = Arc::new(InMemoryCouponStore::with_coupons([coupon.clone()]));
        let orders = Arc::new(InMemoryOrderRepository::with_orders([order]));
        let usage = Arc::new(InMemoryUsageLog::new());
        let events = Arc::new(InMemoryEventBus::new());
        let handler = RedeemCouponHandler::new(coupons.clone(), orders, usage, events);

        let result = handler
            .handle(RedeemCouponCommand {
                user_id,
                code: "SAVE10".to_string(),
                purchase_amount: money(5_000),
                order_id: Some(order_id),
            })
            .await;

        assert!(matches!(result, Err(CouponError::OrderNotPending)));
        assert_eq!(coupons.current_usage(&coupon.id), Some(0));
    }

    #[tokio::test]
    async fn failed_order_write_releases_the_reservation() {
        let coupon = save10();
        let fx = fixture_with(coupon.clone());
        fx.orders.fail_writes(true);

        let result = fx.handler.handle(redeem(UserId::new(), "SAVE10", 5_000)).await;

        assert!(matches!(result, Err(CouponError::Store(_))));
        assert_eq!(fx.coupons.current_usage(&coupon.id), Some(0));
        assert_eq!(fx.usage.record_count(), 0);

        // Slot is redeemable again once writes recover
        fx.orders.fail_writes(false);
        fx.handler
            .handle(redeem(UserId::new(), "SAVE10", 5_000))
            .await
            .unwrap();
        assert_eq!(fx.coupons.current_usage(&coupon.id), Some(1));
    }

    // ════════════════════════════════════════════════════════════════════════
    // Notification
    // ════════════════════════════════════════════════════════════════════════

    struct FailingEventPublisher;

    #[async_trait]
    impl EventPublisher for FailingEventPublisher {
        async fn publish(&self, _event: EventEnvelope) -> Result<(), DomainError> {
            Err(DomainError::database("broker unreachable"))
        }
    }

    #[tokio::test]
    async fn publish_failure_does_not_fail_the_redemption() {
        let coupon = save10();
        let coupons = Arc::new(InMemoryCouponStore::with_coupons([coupon.clone()]));
        let orders = Arc::new(InMemoryOrderRepository::new());
        let usage = Arc::new(InMemoryUsageLog::new());
        let handler = RedeemCouponHandler::new(
            coupons.clone(),
            orders.clone(),
            usage.clone(),
            Arc::new(FailingEventPublisher),
        );

        let receipt = handler
            .handle(RedeemCouponCommand {
                user_id: UserId::new(),
                code: "SAVE10".to_string(),
                purchase_amount: money(5_000),
                order_id: None,
            })
            .await
            .unwrap();

        assert_eq!(receipt.final_amount, money(4_000));
        assert_eq!(orders.order_count(), 1);
        assert_eq!(usage.record_count(), 1);
        assert_eq!(coupons.current_usage(&coupon.id), Some(1));
    }
}
