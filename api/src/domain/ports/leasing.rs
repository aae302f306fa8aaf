//! Leasing store port trait
//!
//! Defines the interface for the remote leasing store (listings, applicants,
//! offers, leases, waiting lists, rental rules) and the contact directory.
//! Every call returns a tagged result; lookups return `Ok(None)` when the
//! record does not exist.

use async_trait::async_trait;

use crate::domain::entities::{
    Applicant, ApplicantId, ApplicantStatus, ApplicationType, Contact, DetailedApplicant, Lease,
    Listing, ListingId, ListingStatus, NewApplicant, NewLease, NewOffer, Offer, OfferId,
    RentalObject, WaitingListType,
};
use crate::error::LeasingError;

#[async_trait]
pub trait LeasingClient: Send + Sync {
    // Listings

    /// Find the listing currently open for a rental object
    async fn get_active_listing_by_rental_object_code(
        &self,
        rental_object_code: &str,
    ) -> Result<Option<Listing>, LeasingError>;

    /// Find a listing by ID
    async fn get_listing_by_listing_id(
        &self,
        listing_id: ListingId,
    ) -> Result<Option<Listing>, LeasingError>;

    /// Find the rental object record behind a parking space
    async fn get_parking_space_by_code(
        &self,
        rental_object_code: &str,
    ) -> Result<Option<RentalObject>, LeasingError>;

    /// Move a listing to a new status
    async fn update_listing_status(
        &self,
        listing_id: ListingId,
        status: ListingStatus,
    ) -> Result<(), LeasingError>;

    // Applicants

    /// All applicants for a listing, ordered by queue priority
    async fn get_detailed_applicants_by_listing_id(
        &self,
        listing_id: ListingId,
    ) -> Result<Vec<DetailedApplicant>, LeasingError>;

    async fn get_applicant_by_contact_code_and_listing_id(
        &self,
        contact_code: &str,
        listing_id: ListingId,
    ) -> Result<Option<Applicant>, LeasingError>;

    async fn get_applicant_by_id(
        &self,
        applicant_id: ApplicantId,
    ) -> Result<Option<Applicant>, LeasingError>;

    /// Register a new applicant. Fails with `LeasingError::Conflict` when the
    /// contact already has an applicant row for the listing.
    async fn apply_for_listing(&self, applicant: &NewApplicant) -> Result<Applicant, LeasingError>;

    /// Reactivate a withdrawn applicant with a (possibly new) application type
    async fn set_applicant_status_active(
        &self,
        applicant_id: ApplicantId,
        contact_code: &str,
        application_type: ApplicationType,
    ) -> Result<(), LeasingError>;

    async fn update_applicant_status(
        &self,
        applicant_id: ApplicantId,
        contact_code: &str,
        status: ApplicantStatus,
    ) -> Result<(), LeasingError>;

    // Offers

    /// Create an offer. Fails with `LeasingError::Conflict` when the listing
    /// already has an Active offer.
    async fn create_offer(&self, offer: &NewOffer) -> Result<Offer, LeasingError>;

    async fn get_offer_by_offer_id(&self, offer_id: OfferId)
        -> Result<Option<Offer>, LeasingError>;

    async fn close_offer_by_accept(&self, offer_id: OfferId) -> Result<(), LeasingError>;

    async fn close_offer_by_deny(&self, offer_id: OfferId) -> Result<(), LeasingError>;

    /// All offers (any status) made to a contact
    async fn get_offers_for_contact(&self, contact_code: &str) -> Result<Vec<Offer>, LeasingError>;

    // Leases and waiting lists

    async fn create_lease(&self, lease: &NewLease) -> Result<Lease, LeasingError>;

    /// Zero the queue points and refresh the queue time
    async fn reset_waiting_list(
        &self,
        contact_code: &str,
        list: WaitingListType,
    ) -> Result<(), LeasingError>;

    async fn add_applicant_to_waiting_list(
        &self,
        contact_code: &str,
        list: WaitingListType,
    ) -> Result<(), LeasingError>;

    // Rental rules

    /// Fails with `LeasingError::RentalRule` when the contact may not rent in
    /// the residential area
    async fn validate_residential_area_rental_rules(
        &self,
        contact_code: &str,
        district_code: &str,
        application_type: ApplicationType,
    ) -> Result<(), LeasingError>;

    /// Fails with `LeasingError::RentalRule` when the contact may not rent in
    /// the property the rental object belongs to
    async fn validate_property_rental_rules(
        &self,
        contact_code: &str,
        rental_object_code: &str,
        application_type: ApplicationType,
    ) -> Result<(), LeasingError>;

    // Contact directory

    async fn get_contact_by_contact_code(
        &self,
        contact_code: &str,
    ) -> Result<Option<Contact>, LeasingError>;

    /// All leases held by a contact, upcoming ones included
    async fn get_leases_by_contact_code(&self, contact_code: &str)
        -> Result<Vec<Lease>, LeasingError>;
}
