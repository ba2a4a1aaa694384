//! Event infrastructure for domain event publishing.
//!
//! Provides the transport-agnostic pieces of the notification path:
//! `EventId` for deduplication, `EventEnvelope` as the wire wrapper, and the
//! `DomainEvent` trait events implement to get `to_envelope()` for free.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use uuid::Uuid;

use super::Timestamp;

/// Unique identifier for an event instance, used for deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random EventId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trait that all domain events must implement.
///
/// The event type string should carry a version suffix (e.g.
/// "coupon.used.v1") so consumers can route and upgrade payloads.
pub trait DomainEvent: Send + Sync {
    /// Returns the event type string used for routing and filtering.
    fn event_type(&self) -> &'static str;

    /// Returns the ID of the aggregate that emitted this event.
    fn aggregate_id(&self) -> String;

    /// Returns the type of aggregate (e.g. "Coupon").
    fn aggregate_type(&self) -> &'static str;

    /// Returns when the event occurred.
    fn occurred_at(&self) -> Timestamp;

    /// Returns the unique ID for this event instance.
    fn event_id(&self) -> EventId;
}

/// Transport wrapper carrying a serialized domain event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event_id: EventId,
    pub event_type: String,
    pub aggregate_id: String,
    pub aggregate_type: String,
    pub occurred_at: Timestamp,
    pub payload: JsonValue,
}

/// Extension trait providing `to_envelope()` for serializable domain events.
///
/// Blanket-implemented for any `DomainEvent + Serialize`, so event authors
/// never write envelope plumbing by hand.
pub trait SerializableDomainEvent: DomainEvent + Serialize {
    /// Converts this domain event into an `EventEnvelope` for transport.
    fn to_envelope(&self) -> EventEnvelope {
        EventEnvelope {
            event_id: self.event_id(),
            event_type: self.event_type().to_string(),
            aggregate_id: self.aggregate_id(),
            aggregate_type: self.aggregate_type().to_string(),
            occurred_at: self.occurred_at(),
            payload: serde_json::to_value(self)
                .expect("Event serialization should never fail for well-formed events"),
        }
    }
}

impl<T: DomainEvent + Serialize> SerializableDomainEvent for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Serialize)]
    struct TestEvent {
        event_id: EventId,
        subject: String,
        occurred_at: Timestamp,
    }

    impl DomainEvent for TestEvent {
        fn event_type(&self) -> &'static str {
            "test.happened.v1"
        }

        fn aggregate_id(&self) -> String {
            self.subject.clone()
        }

        fn aggregate_type(&self) -> &'static str {
            "Test"
        }

        fn occurred_at(&self) -> Timestamp {
            self.occurred_at
        }

        fn event_id(&self) -> EventId {
            self.event_id
        }
    }

    #[test]
    fn to_envelope_carries_all_fields() {
        let event = TestEvent {
            event_id: EventId::new(),
            subject: "subject-1".to_string(),
            occurred_at: Timestamp::now(),
        };

        let envelope = event.to_envelope();
        assert_eq!(envelope.event_type, "test.happened.v1");
        assert_eq!(envelope.aggregate_id, "subject-1");
        assert_eq!(envelope.aggregate_type, "Test");
        assert_eq!(envelope.event_id, event.event_id);
        assert_eq!(envelope.payload["subject"], "subject-1");
    }

    #[test]
    fn envelope_roundtrips_through_json() {
        let event = TestEvent {
            event_id: EventId::new(),
            subject: "subject-2".to_string(),
            occurred_at: Timestamp::now(),
        };

        let envelope = event.to_envelope();
        let json = serde_json::to_string(&envelope).unwrap();
        let back: EventEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(back.event_id, envelope.event_id);
        assert_eq!(back.event_type, envelope.event_type);
    }
}
