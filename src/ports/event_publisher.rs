//! EventPublisher port - interface for publishing domain events.
//!
//! The domain publishes through this port without knowing the transport
//! (Redis pub/sub in production, in-memory for tests). The publisher handle
//! is injected at construction; there is no global emitter.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing domain events.
///
/// Delivery is at-least-once; consumers deduplicate by `event_id`.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event envelope.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_publisher_is_object_safe() {
        fn _accepts_dyn(_publisher: &dyn EventPublisher) {}
    }
}
