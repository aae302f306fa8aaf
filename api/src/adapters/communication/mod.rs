//! Communication adapter
//!
//! HTTP client for the email and role notification service.

pub mod client;

pub use client::CommunicationClientImpl;
