//! Offer generator
//!
//! Picks the next eligible applicant for an expired scored listing and makes
//! them a time-boxed offer:
//! - Applicants are considered in queue-priority order
//! - Rental rules are re-checked for each candidate; failures disqualify the
//!   candidate and selection moves on
//! - When no one is eligible the listing is closed
//!
//! The offer email is a detached side effect; the offer stands without it.

use std::sync::Arc;

use chrono::Utc;

use super::allocation_config::AllocationSettings;
use super::calendar::offer_expires_at;
use super::outcome::{DetachedEffects, ProcessOutcome, SideEffect};
use super::rental_rules::{validate_rental_rules, RuleCheck, RuleCheckFailure};
use super::trace::{report_failure, TraceSubscriber, WorkflowTrace};
use crate::domain::entities::{
    ApplicantStatus, Contact, DetailedApplicant, Listing, ListingId, ListingStatus, NewOffer,
    Offer, OfferApplicant, OfferStatus,
};
use crate::domain::ports::{CommunicationClient, LeasingClient, ParkingSpaceOfferEmail};
use crate::error::{CommunicationError, CreateOfferError, LeasingError, ProcessError};

/// Service generating offers for listings whose publication has ended
pub struct OfferService<LC, CC>
where
    LC: LeasingClient,
    CC: CommunicationClient,
{
    leasing: Arc<LC>,
    communication: Arc<CC>,
    reporter: Arc<dyn TraceSubscriber>,
    settings: AllocationSettings,
}

fn unknown(e: LeasingError) -> CreateOfferError {
    CreateOfferError::Unknown(e.to_string())
}

impl<LC, CC> OfferService<LC, CC>
where
    LC: LeasingClient,
    CC: CommunicationClient,
{
    pub fn new(
        leasing: Arc<LC>,
        communication: Arc<CC>,
        reporter: Arc<dyn TraceSubscriber>,
        settings: AllocationSettings,
    ) -> Self {
        Self {
            leasing,
            communication,
            reporter,
            settings,
        }
    }

    /// Create an offer for the highest-ranked eligible applicant of a listing
    pub async fn create_offer(
        &self,
        listing_id: ListingId,
    ) -> Result<ProcessOutcome<Offer>, CreateOfferError> {
        let mut trace = WorkflowTrace::new("create-offer");
        trace.info(format!("Creating offer for listing {}", listing_id));

        let result = self.run_create_offer(&mut trace, listing_id).await;

        if let Err(e) = &result {
            trace.error(format!("Offer creation failed: {} ({})", e, e.code()));
            if e.is_internal() {
                report_failure(self.reporter.as_ref(), &trace, &e.to_string()).await;
            }
        }

        result
    }

    async fn run_create_offer(
        &self,
        trace: &mut WorkflowTrace,
        listing_id: ListingId,
    ) -> Result<ProcessOutcome<Offer>, CreateOfferError> {
        let listing = self
            .leasing
            .get_listing_by_listing_id(listing_id)
            .await
            .map_err(unknown)?
            .ok_or_else(|| CreateOfferError::NoListing(listing_id.to_string()))?;

        if !listing.is_ready_for_offer() {
            return Err(CreateOfferError::ListingNotExpired(listing_id.to_string()));
        }
        if listing.vacant_from().is_none() {
            return Err(CreateOfferError::RentalObjectNotVacant(
                listing_id.to_string(),
            ));
        }
        let district_code = listing
            .residential_area_code()
            .ok_or_else(|| CreateOfferError::NoListing(listing_id.to_string()))?
            .to_string();
        trace.info(format!(
            "Listing {} for {} is expired and vacant from {:?}",
            listing.id,
            listing.rental_object_code,
            listing.vacant_from()
        ));

        let applicants = self
            .leasing
            .get_detailed_applicants_by_listing_id(listing_id)
            .await
            .map_err(unknown)?;
        let candidates = offer_candidates(applicants);
        trace.info(format!("{} active applicants with priority", candidates.len()));

        let mut eligible_index = None;
        for (index, candidate) in candidates.iter().enumerate() {
            let check = RuleCheck {
                contact_code: candidate.contact_code(),
                district_code: &district_code,
                rental_object_code: &listing.rental_object_code,
                application_type: candidate.applicant.application_type,
            };

            match validate_rental_rules(self.leasing.as_ref(), check).await {
                Ok(()) => {
                    eligible_index = Some(index);
                    break;
                }
                Err(RuleCheckFailure::Violation(violation)) => {
                    trace.info(format!(
                        "Applicant {} ({}) disqualified: {}",
                        candidate.id(),
                        candidate.contact_code(),
                        violation
                    ));
                    self.leasing
                        .update_applicant_status(
                            candidate.id(),
                            candidate.contact_code(),
                            ApplicantStatus::Disqualified,
                        )
                        .await
                        .map_err(unknown)?;
                }
                Err(RuleCheckFailure::Unavailable(e)) => return Err(unknown(e)),
            }
        }

        let Some(eligible_index) = eligible_index else {
            trace.info(format!("No eligible applicants, closing listing {}", listing_id));
            self.leasing
                .update_listing_status(listing_id, ListingStatus::Closed)
                .await
                .map_err(unknown)?;
            return Err(CreateOfferError::NoApplicants(listing_id.to_string()));
        };

        let eligible = &candidates[eligible_index];
        let selected_applicants: Vec<OfferApplicant> = candidates[eligible_index + 1..]
            .iter()
            .enumerate()
            .map(|(order, applicant)| OfferApplicant::snapshot(applicant, order + 1))
            .collect();
        trace.info(format!(
            "Applicant {} ({}) is eligible, {} applicants follow",
            eligible.id(),
            eligible.contact_code(),
            selected_applicants.len()
        ));

        let contact = self
            .leasing
            .get_contact_by_contact_code(eligible.contact_code())
            .await
            .map_err(unknown)?
            .ok_or_else(|| CreateOfferError::NoContact(eligible.contact_code().to_string()))?;

        let now = Utc::now();
        let expires_at = offer_expires_at(
            now,
            self.settings.timezone,
            self.settings.offer_business_days,
        );
        let new_offer = NewOffer {
            listing_id,
            applicant_id: eligible.id(),
            status: OfferStatus::Active,
            sent_at: Some(now),
            expires_at,
            selected_applicants,
        };

        let offer = match self.leasing.create_offer(&new_offer).await {
            Ok(offer) => offer,
            Err(LeasingError::Conflict(_)) => {
                return Err(CreateOfferError::ActiveOfferExists(listing_id.to_string()))
            }
            Err(e) => return Err(unknown(e)),
        };
        trace.info(format!("Offer {} created, expires {}", offer.id, expires_at));

        self.leasing
            .update_applicant_status(eligible.id(), eligible.contact_code(), ApplicantStatus::Offered)
            .await
            .map_err(unknown)?;
        trace.info(format!("Applicant {} marked as offered", eligible.id()));

        let mut effects = DetachedEffects::new();
        let email_result = self.send_offer_email(&contact, &listing, &offer).await;
        effects.settle(trace, SideEffect::OfferEmail, email_result);

        Ok(effects.finish(offer))
    }

    async fn send_offer_email(
        &self,
        contact: &Contact,
        listing: &Listing,
        offer: &Offer,
    ) -> Result<(), CommunicationError> {
        let to = contact.email().ok_or_else(|| {
            CommunicationError::MissingRecipient(format!(
                "contact {} has no email address",
                contact.contact_code
            ))
        })?;

        let email = ParkingSpaceOfferEmail {
            to: to.to_string(),
            first_name: contact.first_name.clone(),
            address: listing.rental_object.formatted_address(),
            rent: listing.rental_object.monthly_rent,
            object_type: listing.rental_object.object_type_caption.clone(),
            rental_object_code: listing.rental_object_code.clone(),
            available_from: listing.vacant_from(),
            deadline: offer.expires_at,
            offer_id: offer.id.0,
        };

        self.communication
            .send_parking_space_offer_email(&email)
            .await
    }
}

/// Active applicants with a priority, best priority first.
///
/// The sort is stable, so the store's order breaks ties.
fn offer_candidates(applicants: Vec<DetailedApplicant>) -> Vec<DetailedApplicant> {
    let mut candidates: Vec<DetailedApplicant> = applicants
        .into_iter()
        .filter(DetailedApplicant::is_offer_candidate)
        .collect();
    candidates.sort_by_key(|applicant| applicant.priority);
    candidates
}
