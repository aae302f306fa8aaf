//! Economy adapter
//!
//! HTTP client for the invoicing service used by the credit check.

pub mod client;

pub use client::EconomyClientImpl;
