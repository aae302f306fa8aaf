//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::domain::entities::{
    Applicant, ApplicantId, ApplicantStatus, ApplicationType, Contact, DetailedApplicant,
    Invoice, Lease, Listing, ListingId, ListingStatus, NewApplicant, NewLease, NewOffer, Offer,
    OfferId, OfferStatus, RentalObject, WaitingListType,
};
use crate::domain::entities::lease::{LeaseKind, LeaseStatus};
use crate::domain::ports::{
    CommunicationClient, EconomyClient, LeasingClient, ParkingSpaceAcceptOfferEmail,
    ParkingSpaceOfferEmail,
};
use crate::error::{CommunicationError, EconomyError, LeasingError, RentalRuleViolation};

fn unavailable(what: &str) -> LeasingError {
    LeasingError::Api {
        status: 503,
        message: format!("{} unavailable", what),
    }
}

// ============================================================================
// In-Memory Leasing Client
// ============================================================================

#[derive(Default)]
struct LeasingStore {
    listings: HashMap<ListingId, Listing>,
    /// Rental objects whose record is gone although a listing still points at them
    missing_parking_spaces: HashSet<String>,
    /// Insertion order is the store's priority order
    applicants: Vec<DetailedApplicant>,
    contacts: HashMap<String, Contact>,
    leases: Vec<Lease>,
    offers: Vec<Offer>,
    area_violations: HashMap<String, RentalRuleViolation>,
    property_violations: HashMap<String, RentalRuleViolation>,
    created_leases: Vec<NewLease>,
    waiting_list_resets: Vec<String>,
    waiting_list_additions: Vec<String>,
    next_id: i64,
}

impl LeasingStore {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        1000 + self.next_id
    }

    fn applicant_mut(&mut self, id: ApplicantId) -> Option<&mut DetailedApplicant> {
        self.applicants.iter_mut().find(|a| a.applicant.id == id)
    }

    fn offer_mut(&mut self, id: OfferId) -> Option<&mut Offer> {
        self.offers.iter_mut().find(|o| o.id == id)
    }
}

#[derive(Default, Clone)]
struct LeasingFailures {
    deny_offers: HashSet<OfferId>,
    rule_checks: bool,
    create_lease: bool,
    waiting_list_reset: bool,
    add_to_waiting_list: bool,
    conflict_on_apply: bool,
}

/// Stateful in-memory leasing store and contact directory.
///
/// Enforces one active offer per listing and applies the same status
/// transitions as the real store when offers are closed.
#[derive(Default)]
pub struct InMemoryLeasingClient {
    store: Arc<RwLock<LeasingStore>>,
    failures: LeasingFailures,
}

impl InMemoryLeasingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a listing
    pub fn with_listing(self, listing: Listing) -> Self {
        self.store
            .write()
            .unwrap()
            .listings
            .insert(listing.id, listing);
        self
    }

    /// The rental object record is missing while listings still reference it
    pub fn without_parking_space(self, rental_object_code: &str) -> Self {
        self.store
            .write()
            .unwrap()
            .missing_parking_spaces
            .insert(rental_object_code.to_string());
        self
    }

    /// Add or replace an applicant
    pub fn with_applicant(self, applicant: DetailedApplicant) -> Self {
        {
            let mut store = self.store.write().unwrap();
            let id = applicant.id();
            match store.applicants.iter().position(|a| a.applicant.id == id) {
                Some(index) => store.applicants[index] = applicant,
                None => store.applicants.push(applicant),
            }
        }
        self
    }

    pub fn with_contact(self, contact: Contact) -> Self {
        self.store
            .write()
            .unwrap()
            .contacts
            .insert(contact.contact_code.clone(), contact);
        self
    }

    pub fn with_lease(self, lease: Lease) -> Self {
        self.store.write().unwrap().leases.push(lease);
        self
    }

    pub fn with_offer(self, offer: Offer) -> Self {
        self.store.write().unwrap().offers.push(offer);
        self
    }

    pub fn with_area_violation(self, contact_code: &str, violation: RentalRuleViolation) -> Self {
        self.store
            .write()
            .unwrap()
            .area_violations
            .insert(contact_code.to_string(), violation);
        self
    }

    pub fn with_property_violation(
        self,
        contact_code: &str,
        violation: RentalRuleViolation,
    ) -> Self {
        self.store
            .write()
            .unwrap()
            .property_violations
            .insert(contact_code.to_string(), violation);
        self
    }

    /// Rental rule endpoints answer with a server error
    pub fn failing_rule_checks(mut self) -> Self {
        self.failures.rule_checks = true;
        self
    }

    /// Closing this offer as denied answers with a server error
    pub fn failing_deny_for(mut self, offer_id: OfferId) -> Self {
        self.failures.deny_offers.insert(offer_id);
        self
    }

    pub fn failing_create_lease(mut self) -> Self {
        self.failures.create_lease = true;
        self
    }

    pub fn failing_waiting_list_reset(mut self) -> Self {
        self.failures.waiting_list_reset = true;
        self
    }

    pub fn failing_add_to_waiting_list(mut self) -> Self {
        self.failures.add_to_waiting_list = true;
        self
    }

    /// New applications are rejected as concurrent duplicates
    pub fn conflict_on_apply(mut self) -> Self {
        self.failures.conflict_on_apply = true;
        self
    }

    /// Rank an applicant the way the store does once the publication ends
    pub fn assign_priority(&self, applicant_id: ApplicantId, priority: i32) {
        if let Some(applicant) = self.store.write().unwrap().applicant_mut(applicant_id) {
            applicant.priority = Some(priority);
        }
    }

    // Assertions

    pub fn listing_status(&self, id: ListingId) -> Option<ListingStatus> {
        self.store.read().unwrap().listings.get(&id).map(|l| l.status)
    }

    pub fn applicant_status(&self, id: ApplicantId) -> Option<ApplicantStatus> {
        self.store
            .read()
            .unwrap()
            .applicants
            .iter()
            .find(|a| a.applicant.id == id)
            .map(|a| a.applicant.status)
    }

    pub fn applicants_for_listing(&self, listing_id: ListingId) -> Vec<Applicant> {
        self.store
            .read()
            .unwrap()
            .applicants
            .iter()
            .filter(|a| a.applicant.listing_id == listing_id)
            .map(|a| a.applicant.clone())
            .collect()
    }

    pub fn offer_status(&self, id: OfferId) -> Option<OfferStatus> {
        self.store
            .read()
            .unwrap()
            .offers
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.status)
    }

    pub fn active_offers_for_listing(&self, listing_id: ListingId) -> Vec<Offer> {
        self.store
            .read()
            .unwrap()
            .offers
            .iter()
            .filter(|o| o.listing_id == listing_id && o.is_active())
            .cloned()
            .collect()
    }

    pub fn created_leases(&self) -> Vec<NewLease> {
        self.store.read().unwrap().created_leases.clone()
    }

    pub fn waiting_list_resets(&self) -> Vec<String> {
        self.store.read().unwrap().waiting_list_resets.clone()
    }

    pub fn waiting_list_additions(&self) -> Vec<String> {
        self.store.read().unwrap().waiting_list_additions.clone()
    }
}

#[async_trait]
impl LeasingClient for InMemoryLeasingClient {
    async fn get_active_listing_by_rental_object_code(
        &self,
        rental_object_code: &str,
    ) -> Result<Option<Listing>, LeasingError> {
        let store = self.store.read().unwrap();
        Ok(store
            .listings
            .values()
            .find(|l| l.rental_object_code == rental_object_code && l.status == ListingStatus::Active)
            .cloned())
    }

    async fn get_listing_by_listing_id(
        &self,
        listing_id: ListingId,
    ) -> Result<Option<Listing>, LeasingError> {
        Ok(self.store.read().unwrap().listings.get(&listing_id).cloned())
    }

    async fn get_parking_space_by_code(
        &self,
        rental_object_code: &str,
    ) -> Result<Option<RentalObject>, LeasingError> {
        let store = self.store.read().unwrap();
        if store.missing_parking_spaces.contains(rental_object_code) {
            return Ok(None);
        }
        Ok(store
            .listings
            .values()
            .find(|l| l.rental_object_code == rental_object_code)
            .map(|l| l.rental_object.clone()))
    }

    async fn update_listing_status(
        &self,
        listing_id: ListingId,
        status: ListingStatus,
    ) -> Result<(), LeasingError> {
        let mut store = self.store.write().unwrap();
        let listing = store
            .listings
            .get_mut(&listing_id)
            .ok_or_else(|| LeasingError::NotFound(format!("listing {}", listing_id)))?;
        listing.status = status;
        Ok(())
    }

    async fn get_detailed_applicants_by_listing_id(
        &self,
        listing_id: ListingId,
    ) -> Result<Vec<DetailedApplicant>, LeasingError> {
        let store = self.store.read().unwrap();
        Ok(store
            .applicants
            .iter()
            .filter(|a| a.applicant.listing_id == listing_id)
            .cloned()
            .collect())
    }

    async fn get_applicant_by_contact_code_and_listing_id(
        &self,
        contact_code: &str,
        listing_id: ListingId,
    ) -> Result<Option<Applicant>, LeasingError> {
        let store = self.store.read().unwrap();
        Ok(store
            .applicants
            .iter()
            .find(|a| a.contact_code() == contact_code && a.applicant.listing_id == listing_id)
            .map(|a| a.applicant.clone()))
    }

    async fn get_applicant_by_id(
        &self,
        applicant_id: ApplicantId,
    ) -> Result<Option<Applicant>, LeasingError> {
        let store = self.store.read().unwrap();
        Ok(store
            .applicants
            .iter()
            .find(|a| a.applicant.id == applicant_id)
            .map(|a| a.applicant.clone()))
    }

    async fn apply_for_listing(&self, applicant: &NewApplicant) -> Result<Applicant, LeasingError> {
        if self.failures.conflict_on_apply {
            return Err(LeasingError::Conflict(format!(
                "{} already applied",
                applicant.contact_code
            )));
        }

        let mut store = self.store.write().unwrap();
        let duplicate = store.applicants.iter().any(|a| {
            a.contact_code() == applicant.contact_code
                && a.applicant.listing_id == applicant.listing_id
        });
        if duplicate {
            return Err(LeasingError::Conflict(format!(
                "{} already applied for listing {}",
                applicant.contact_code, applicant.listing_id
            )));
        }

        let created = Applicant {
            id: ApplicantId(store.next_id()),
            listing_id: applicant.listing_id,
            contact_code: applicant.contact_code.clone(),
            name: applicant.name.clone(),
            application_date: applicant.application_date,
            application_type: applicant.application_type,
            status: applicant.status,
        };
        store.applicants.push(DetailedApplicant {
            applicant: created.clone(),
            priority: None,
            queue_points: 0,
            address: None,
            current_housing_contract: None,
            upcoming_housing_contract: None,
            parking_space_contracts: Vec::new(),
        });
        Ok(created)
    }

    async fn set_applicant_status_active(
        &self,
        applicant_id: ApplicantId,
        _contact_code: &str,
        application_type: ApplicationType,
    ) -> Result<(), LeasingError> {
        let mut store = self.store.write().unwrap();
        let applicant = store
            .applicant_mut(applicant_id)
            .ok_or_else(|| LeasingError::NotFound(format!("applicant {}", applicant_id)))?;
        applicant.applicant.status = ApplicantStatus::Active;
        applicant.applicant.application_type = application_type;
        Ok(())
    }

    async fn update_applicant_status(
        &self,
        applicant_id: ApplicantId,
        _contact_code: &str,
        status: ApplicantStatus,
    ) -> Result<(), LeasingError> {
        let mut store = self.store.write().unwrap();
        let applicant = store
            .applicant_mut(applicant_id)
            .ok_or_else(|| LeasingError::NotFound(format!("applicant {}", applicant_id)))?;
        applicant.applicant.status = status;
        Ok(())
    }

    async fn create_offer(&self, offer: &NewOffer) -> Result<Offer, LeasingError> {
        let mut store = self.store.write().unwrap();

        if store
            .offers
            .iter()
            .any(|o| o.listing_id == offer.listing_id && o.is_active())
        {
            return Err(LeasingError::Conflict(format!(
                "listing {} already has an active offer",
                offer.listing_id
            )));
        }

        let offered_applicant = store
            .applicants
            .iter()
            .find(|a| a.applicant.id == offer.applicant_id)
            .map(|a| a.applicant.clone())
            .ok_or_else(|| LeasingError::NotFound(format!("applicant {}", offer.applicant_id)))?;

        let created = Offer {
            id: OfferId(store.next_id()),
            listing_id: offer.listing_id,
            offered_applicant,
            selected_applicants: offer.selected_applicants.clone(),
            status: offer.status,
            sent_at: offer.sent_at,
            expires_at: offer.expires_at,
            answered_at: None,
        };
        store.offers.push(created.clone());
        Ok(created)
    }

    async fn get_offer_by_offer_id(&self, offer_id: OfferId) -> Result<Option<Offer>, LeasingError> {
        let store = self.store.read().unwrap();
        Ok(store.offers.iter().find(|o| o.id == offer_id).cloned())
    }

    async fn close_offer_by_accept(&self, offer_id: OfferId) -> Result<(), LeasingError> {
        let mut store = self.store.write().unwrap();
        let offer = store
            .offer_mut(offer_id)
            .ok_or_else(|| LeasingError::NotFound(format!("offer {}", offer_id)))?;
        offer.status = OfferStatus::Accepted;
        offer.answered_at = Some(Utc::now());
        let (applicant_id, listing_id) = (offer.offered_applicant.id, offer.listing_id);

        if let Some(applicant) = store.applicant_mut(applicant_id) {
            applicant.applicant.status = ApplicantStatus::OfferAccepted;
        }
        if let Some(listing) = store.listings.get_mut(&listing_id) {
            listing.status = ListingStatus::Assigned;
        }
        Ok(())
    }

    async fn close_offer_by_deny(&self, offer_id: OfferId) -> Result<(), LeasingError> {
        if self.failures.deny_offers.contains(&offer_id) {
            return Err(unavailable("offer close"));
        }
        let mut store = self.store.write().unwrap();
        let offer = store
            .offer_mut(offer_id)
            .ok_or_else(|| LeasingError::NotFound(format!("offer {}", offer_id)))?;
        offer.status = OfferStatus::Denied;
        offer.answered_at = Some(Utc::now());
        let applicant_id = offer.offered_applicant.id;

        if let Some(applicant) = store.applicant_mut(applicant_id) {
            applicant.applicant.status = ApplicantStatus::OfferDeclined;
        }
        Ok(())
    }

    async fn get_offers_for_contact(&self, contact_code: &str) -> Result<Vec<Offer>, LeasingError> {
        let store = self.store.read().unwrap();
        Ok(store
            .offers
            .iter()
            .filter(|o| o.contact_code() == contact_code)
            .cloned()
            .collect())
    }

    async fn create_lease(&self, lease: &NewLease) -> Result<Lease, LeasingError> {
        if self.failures.create_lease {
            return Err(unavailable("lease creation"));
        }

        let mut store = self.store.write().unwrap();
        let id = store.next_id();
        store.created_leases.push(lease.clone());
        Ok(Lease {
            lease_id: format!("{}/{:02}", lease.rental_object_code, id % 100),
            rental_object_code: lease.rental_object_code.clone(),
            contact_code: lease.contact_code.clone(),
            kind: LeaseKind::ParkingSpace,
            status: LeaseStatus::Upcoming,
            lease_start_date: lease.from_date,
            lease_end_date: None,
        })
    }

    async fn reset_waiting_list(
        &self,
        contact_code: &str,
        _waiting_list: WaitingListType,
    ) -> Result<(), LeasingError> {
        if self.failures.waiting_list_reset {
            return Err(unavailable("waiting list reset"));
        }
        self.store
            .write()
            .unwrap()
            .waiting_list_resets
            .push(contact_code.to_string());
        Ok(())
    }

    async fn add_applicant_to_waiting_list(
        &self,
        contact_code: &str,
        _waiting_list: WaitingListType,
    ) -> Result<(), LeasingError> {
        if self.failures.add_to_waiting_list {
            return Err(unavailable("waiting list"));
        }
        self.store
            .write()
            .unwrap()
            .waiting_list_additions
            .push(contact_code.to_string());
        Ok(())
    }

    async fn validate_residential_area_rental_rules(
        &self,
        contact_code: &str,
        _district_code: &str,
        _application_type: ApplicationType,
    ) -> Result<(), LeasingError> {
        if self.failures.rule_checks {
            return Err(unavailable("rental rules"));
        }
        match self.store.read().unwrap().area_violations.get(contact_code) {
            Some(violation) => Err(LeasingError::RentalRule(*violation)),
            None => Ok(()),
        }
    }

    async fn validate_property_rental_rules(
        &self,
        contact_code: &str,
        _rental_object_code: &str,
        _application_type: ApplicationType,
    ) -> Result<(), LeasingError> {
        if self.failures.rule_checks {
            return Err(unavailable("rental rules"));
        }
        match self.store.read().unwrap().property_violations.get(contact_code) {
            Some(violation) => Err(LeasingError::RentalRule(*violation)),
            None => Ok(()),
        }
    }

    async fn get_contact_by_contact_code(
        &self,
        contact_code: &str,
    ) -> Result<Option<Contact>, LeasingError> {
        Ok(self.store.read().unwrap().contacts.get(contact_code).cloned())
    }

    async fn get_leases_by_contact_code(
        &self,
        contact_code: &str,
    ) -> Result<Vec<Lease>, LeasingError> {
        let store = self.store.read().unwrap();
        Ok(store
            .leases
            .iter()
            .filter(|l| l.contact_code == contact_code)
            .cloned()
            .collect())
    }
}

// ============================================================================
// In-Memory Economy Client
// ============================================================================

#[derive(Default)]
pub struct InMemoryEconomyClient {
    invoices: Arc<RwLock<HashMap<String, Vec<Invoice>>>>,
    failing: bool,
}

impl InMemoryEconomyClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an invoice sent to debt collection for a contact
    pub fn with_invoice(self, contact_code: &str, invoice: Invoice) -> Self {
        self.invoices
            .write()
            .unwrap()
            .entry(contact_code.to_string())
            .or_default()
            .push(invoice);
        self
    }

    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }
}

#[async_trait]
impl EconomyClient for InMemoryEconomyClient {
    async fn get_invoices_sent_to_debt_collection(
        &self,
        contact_code: &str,
        since: NaiveDate,
    ) -> Result<Vec<Invoice>, EconomyError> {
        if self.failing {
            return Err(EconomyError::Api {
                status: 503,
                message: "economy service unavailable".to_string(),
            });
        }
        let invoices = self.invoices.read().unwrap();
        Ok(invoices
            .get(contact_code)
            .map(|list| {
                list.iter()
                    .filter(|i| i.invoice_date >= since)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

// ============================================================================
// Recording Communication Client
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct RoleNotification {
    pub role: String,
    pub subject: String,
    pub message: String,
}

/// Records every message instead of sending it
#[derive(Default)]
pub struct RecordingCommunicationClient {
    offer_emails: Arc<RwLock<Vec<ParkingSpaceOfferEmail>>>,
    accept_emails: Arc<RwLock<Vec<ParkingSpaceAcceptOfferEmail>>>,
    role_notifications: Arc<RwLock<Vec<RoleNotification>>>,
    failing: bool,
}

impl RecordingCommunicationClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send fails and nothing is recorded
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn offer_emails(&self) -> Vec<ParkingSpaceOfferEmail> {
        self.offer_emails.read().unwrap().clone()
    }

    pub fn accept_emails(&self) -> Vec<ParkingSpaceAcceptOfferEmail> {
        self.accept_emails.read().unwrap().clone()
    }

    pub fn role_notifications(&self) -> Vec<RoleNotification> {
        self.role_notifications.read().unwrap().clone()
    }

    fn check(&self) -> Result<(), CommunicationError> {
        if self.failing {
            return Err(CommunicationError::Api {
                status: 502,
                message: "mail gateway unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CommunicationClient for RecordingCommunicationClient {
    async fn send_parking_space_offer_email(
        &self,
        email: &ParkingSpaceOfferEmail,
    ) -> Result<(), CommunicationError> {
        self.check()?;
        self.offer_emails.write().unwrap().push(email.clone());
        Ok(())
    }

    async fn send_parking_space_accept_offer_email(
        &self,
        email: &ParkingSpaceAcceptOfferEmail,
    ) -> Result<(), CommunicationError> {
        self.check()?;
        self.accept_emails.write().unwrap().push(email.clone());
        Ok(())
    }

    async fn send_notification_to_role(
        &self,
        role: &str,
        subject: &str,
        message: &str,
    ) -> Result<(), CommunicationError> {
        self.check()?;
        self.role_notifications.write().unwrap().push(RoleNotification {
            role: role.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }
}
