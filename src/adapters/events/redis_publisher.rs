//! Redis pub/sub event publisher for production deployments.
//!
//! Serializes envelopes to JSON and PUBLISHes them on a single channel.
//! Subscribers (dashboards, notification workers) filter by `event_type`.
//! Pub/sub delivery is best-effort: a message published while no subscriber
//! is connected is dropped, which matches the fire-and-forget contract of
//! the notification path.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::EventPublisher;

/// Default channel all coupon-service events are published on.
pub const DEFAULT_CHANNEL: &str = "coupon-events";

/// Redis-backed event publisher.
#[derive(Clone)]
pub struct RedisEventPublisher {
    conn: MultiplexedConnection,
    channel: String,
}

impl RedisEventPublisher {
    /// Creates a publisher on the default channel.
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self {
            conn,
            channel: DEFAULT_CHANNEL.to_string(),
        }
    }

    /// Overrides the pub/sub channel.
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }
}

#[async_trait]
impl EventPublisher for RedisEventPublisher {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let payload = serde_json::to_string(&event).map_err(|e| {
            DomainError::new(
                ErrorCode::EventBusError,
                format!("event serialization failed: {}", e),
            )
        })?;

        let mut conn = self.conn.clone();
        conn.publish::<_, _, ()>(&self.channel, payload)
            .await
            .map_err(|e: redis::RedisError| {
                DomainError::new(
                    ErrorCode::EventBusError,
                    format!("redis publish failed: {}", e),
                )
            })?;

        tracing::debug!(
            event_type = %event.event_type,
            aggregate_id = %event.aggregate_id,
            channel = %self.channel,
            "event published"
        );
        Ok(())
    }
}
