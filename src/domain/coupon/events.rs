//! Coupon domain events.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    CouponId, DomainEvent, EventId, Money, OrderId, Timestamp, UserId,
};

use super::CouponCode;

/// Emitted after a successful redemption, consumed by dashboards and other
/// clients through the pub/sub relay. Delivery is fire-and-forget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponUsed {
    pub event_id: EventId,
    pub coupon_id: CouponId,
    pub coupon_code: CouponCode,
    pub user_id: UserId,
    pub order_id: OrderId,
    pub discount_amount: Money,
    pub occurred_at: Timestamp,
}

impl DomainEvent for CouponUsed {
    fn event_type(&self) -> &'static str {
        "coupon.used.v1"
    }

    fn aggregate_id(&self) -> String {
        self.coupon_id.to_string()
    }

    fn aggregate_type(&self) -> &'static str {
        "Coupon"
    }

    fn occurred_at(&self) -> Timestamp {
        self.occurred_at
    }

    fn event_id(&self) -> EventId {
        self.event_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SerializableDomainEvent;

    #[test]
    fn envelope_routes_by_coupon() {
        let event = CouponUsed {
            event_id: EventId::new(),
            coupon_id: CouponId::new(),
            coupon_code: CouponCode::try_new("SAVE10").unwrap(),
            user_id: UserId::new(),
            order_id: OrderId::new(),
            discount_amount: Money::from_cents(1_000).unwrap(),
            occurred_at: Timestamp::now(),
        };

        let envelope = event.to_envelope();
        assert_eq!(envelope.event_type, "coupon.used.v1");
        assert_eq!(envelope.aggregate_type, "Coupon");
        assert_eq!(envelope.aggregate_id, event.coupon_id.to_string());
        assert_eq!(envelope.payload["coupon_code"], "SAVE10");
        assert_eq!(envelope.payload["discount_amount"], 1_000);
    }
}
