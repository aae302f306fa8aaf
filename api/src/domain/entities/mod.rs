//! Domain entities
//!
//! Pure domain models for the parking-space allocation workflow.
//! Listings, applicants, offers and leases are owned by the leasing store;
//! contacts by the contact directory; invoices by the economy service.

pub mod applicant;
pub mod contact;
pub mod invoice;
pub mod lease;
pub mod listing;
pub mod offer;

pub use applicant::{
    Applicant, ApplicantId, ApplicantStatus, ApplicationType, DetailedApplicant, NewApplicant,
};
pub use contact::{Contact, WaitingListType};
pub use invoice::Invoice;
pub use lease::{tenancy_leases, Lease, NewLease};
pub use listing::{Listing, ListingId, ListingStatus, RentalObject};
pub use offer::{NewOffer, Offer, OfferApplicant, OfferId, OfferStatus};
