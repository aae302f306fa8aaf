//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod communication;
pub mod economy;
pub mod leasing;

pub use communication::CommunicationClientImpl;
pub use economy::EconomyClientImpl;
pub use leasing::LeasingClientImpl;
