//! Coupon Service - Campaign and Coupon Management API
//!
//! This crate implements coupon lifecycle management and race-safe
//! redemption: the usage counter moves only through an atomic
//! reserve/release pair, so a capped coupon is never oversold under
//! concurrent redemptions.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
