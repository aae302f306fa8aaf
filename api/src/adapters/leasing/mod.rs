//! Leasing adapter
//!
//! HTTP client for the leasing service, which owns listings, applicants,
//! offers, leases and waiting lists and fronts the contact directory.

pub mod client;

pub use client::LeasingClientImpl;
