//! Application layer
//!
//! Contains the allocation workflow services and the helpers they share.
//! Services coordinate between domain entities, ports, and external systems.

pub mod allocation_config;
pub mod application_service;
pub mod calendar;
pub mod credit_check;
pub mod offer_response_service;
pub mod offer_service;
pub mod outcome;
pub mod rental_rules;
pub mod trace;

pub use allocation_config::{AllocationSettings, ROLE_DEV};
pub use application_service::{ApplicationService, WithdrawnBy};
pub use offer_response_service::{AcceptedOffer, DeniedOffer, ExpiredOffer, OfferResponseService};
pub use offer_service::OfferService;
pub use outcome::{Advisory, ProcessOutcome};
pub use trace::{RoleNotificationSubscriber, TraceSubscriber};
