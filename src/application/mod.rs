//! Application layer - command and query handlers coordinating domain
//! objects through the ports.

pub mod handlers;
