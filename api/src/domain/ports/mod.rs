//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod communication;
pub mod economy;
pub mod leasing;

pub use communication::{
    CommunicationClient, ParkingSpaceAcceptOfferEmail, ParkingSpaceOfferEmail,
};
pub use economy::EconomyClient;
pub use leasing::LeasingClient;
