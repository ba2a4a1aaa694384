//! Adapters - concrete implementations of the ports.

pub mod auth;
pub mod events;
pub mod http;
pub mod memory;
pub mod postgres;
