//! Event publishing adapters.
//!
//! Production publishes `EventEnvelope`s as JSON over Redis pub/sub; tests
//! use the in-memory bus, which records everything for assertions.

mod in_memory;
mod redis_publisher;

pub use in_memory::InMemoryEventBus;
pub use redis_publisher::RedisEventPublisher;
