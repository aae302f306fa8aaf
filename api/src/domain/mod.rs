//! Domain layer
//!
//! Listings, applicants and offers of the parking-space allocation workflow.
//! - `entities`: Domain models owned by the external leasing, contact and economy services
//! - `ports`: Trait definitions for those external services

pub mod entities;
pub mod ports;
