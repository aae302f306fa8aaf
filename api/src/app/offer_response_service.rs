//! Offer response handler
//!
//! Accept, deny and expire all start by resolving the offer and its listing.
//! From there:
//! - Accept re-validates the tenant, creates the lease, closes the offer and
//!   denies every other active offer the tenant holds
//! - Deny closes the offer and hands the listing back to the offer generator
//! - Expire confirms the offer; if the scheduler has already expired it, the
//!   listing is handed back to the generator once
//!
//! Everything after the durable state change is a detached side effect.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use futures::future::join_all;
use serde::Serialize;

use super::allocation_config::AllocationSettings;
use super::calendar::lease_start_date;
use super::offer_service::OfferService;
use super::outcome::{DetachedEffects, ProcessOutcome, SideEffect};
use super::rental_rules::{validate_rental_rules, RuleCheck, RuleCheckFailure};
use super::trace::{report_failure, TraceSubscriber, WorkflowTrace};
use crate::domain::entities::{
    tenancy_leases, Lease, Listing, ListingId, NewLease, Offer, OfferId, OfferStatus,
    WaitingListType,
};
use crate::domain::ports::{CommunicationClient, LeasingClient, ParkingSpaceAcceptOfferEmail};
use crate::error::{
    AcceptOfferError, DenyOfferError, ExpireOfferError, LeasingError, ProcessError,
};

/// Result of a completed accept
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedOffer {
    pub offer_id: OfferId,
    pub listing_id: ListingId,
    pub lease: Lease,
    /// Sibling offers closed by the cascade
    pub denied_offers: Vec<OfferId>,
}

/// Result of a completed deny
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeniedOffer {
    pub offer_id: OfferId,
    pub listing_id: ListingId,
    /// Offer made to the next applicant, if regeneration succeeded
    pub next_offer: Option<OfferId>,
}

/// Result of an expire confirmation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiredOffer {
    pub offer_id: OfferId,
    pub listing_id: ListingId,
    pub status: OfferStatus,
    pub next_offer: Option<OfferId>,
}

/// Why the shared offer/listing preconditions failed
#[derive(Debug)]
enum ResolveFailure {
    NoOffer(OfferId),
    NoListing(ListingId),
    Store(LeasingError),
}

impl From<LeasingError> for ResolveFailure {
    fn from(e: LeasingError) -> Self {
        ResolveFailure::Store(e)
    }
}

impl From<ResolveFailure> for AcceptOfferError {
    fn from(f: ResolveFailure) -> Self {
        match f {
            ResolveFailure::NoOffer(id) => AcceptOfferError::NoOffer(id.to_string()),
            ResolveFailure::NoListing(id) => AcceptOfferError::NoListing(id.to_string()),
            ResolveFailure::Store(e) => AcceptOfferError::Unknown(e.to_string()),
        }
    }
}

impl From<ResolveFailure> for DenyOfferError {
    fn from(f: ResolveFailure) -> Self {
        match f {
            ResolveFailure::NoOffer(id) => DenyOfferError::NoOffer(id.to_string()),
            ResolveFailure::NoListing(id) => DenyOfferError::NoListing(id.to_string()),
            ResolveFailure::Store(e) => DenyOfferError::Unknown(e.to_string()),
        }
    }
}

impl From<ResolveFailure> for ExpireOfferError {
    fn from(f: ResolveFailure) -> Self {
        match f {
            ResolveFailure::NoOffer(id) => ExpireOfferError::NoOffer(id.to_string()),
            ResolveFailure::NoListing(id) => ExpireOfferError::NoListing(id.to_string()),
            ResolveFailure::Store(e) => ExpireOfferError::Unknown(e.to_string()),
        }
    }
}

/// An offer together with its listing and the listing's residential area
struct ResolvedOffer {
    offer: Offer,
    listing: Listing,
    district_code: String,
}

pub struct OfferResponseService<LC, CC>
where
    LC: LeasingClient,
    CC: CommunicationClient,
{
    leasing: Arc<LC>,
    communication: Arc<CC>,
    offers: Arc<OfferService<LC, CC>>,
    reporter: Arc<dyn TraceSubscriber>,
    settings: AllocationSettings,
}

impl<LC, CC> OfferResponseService<LC, CC>
where
    LC: LeasingClient,
    CC: CommunicationClient,
{
    pub fn new(
        leasing: Arc<LC>,
        communication: Arc<CC>,
        offers: Arc<OfferService<LC, CC>>,
        reporter: Arc<dyn TraceSubscriber>,
        settings: AllocationSettings,
    ) -> Self {
        Self {
            leasing,
            communication,
            offers,
            reporter,
            settings,
        }
    }

    async fn resolve(
        &self,
        trace: &mut WorkflowTrace,
        offer_id: OfferId,
    ) -> Result<ResolvedOffer, ResolveFailure> {
        let offer = self
            .leasing
            .get_offer_by_offer_id(offer_id)
            .await?
            .ok_or(ResolveFailure::NoOffer(offer_id))?;

        let listing = self
            .leasing
            .get_listing_by_listing_id(offer.listing_id)
            .await?
            .ok_or(ResolveFailure::NoListing(offer.listing_id))?;

        let district_code = listing
            .residential_area_code()
            .ok_or(ResolveFailure::NoListing(offer.listing_id))?
            .to_string();

        trace.info(format!(
            "Offer {} ({}) for listing {} held by {}",
            offer.id,
            offer.status,
            listing.id,
            offer.contact_code()
        ));

        Ok(ResolvedOffer {
            offer,
            listing,
            district_code,
        })
    }

    /// Hand the listing back to the offer generator, recording its advisories
    async fn regenerate(
        &self,
        trace: &mut WorkflowTrace,
        effects: &mut DetachedEffects,
        listing_id: ListingId,
    ) -> Option<OfferId> {
        let result = self.offers.create_offer(listing_id).await;
        let outcome = effects.settle(
            trace,
            SideEffect::OfferRegeneration { listing_id },
            result,
        )?;
        effects.absorb(outcome.advisories);
        Some(outcome.value.id)
    }

    // =========================================================================
    // Accept
    // =========================================================================

    pub async fn accept(
        &self,
        offer_id: OfferId,
    ) -> Result<ProcessOutcome<AcceptedOffer>, AcceptOfferError> {
        let mut trace = WorkflowTrace::new("accept-offer");
        trace.info(format!("Accepting offer {}", offer_id));

        let result = self.run_accept(&mut trace, offer_id).await;

        if let Err(e) = &result {
            trace.error(format!("Accept failed: {} ({})", e, e.code()));
            if e.is_internal() {
                report_failure(self.reporter.as_ref(), &trace, &e.to_string()).await;
            }
        }

        result
    }

    async fn run_accept(
        &self,
        trace: &mut WorkflowTrace,
        offer_id: OfferId,
    ) -> Result<ProcessOutcome<AcceptedOffer>, AcceptOfferError> {
        let ResolvedOffer {
            offer,
            listing,
            district_code,
        } = self.resolve(trace, offer_id).await?;

        if !offer.is_active() {
            return Err(AcceptOfferError::NoActiveOffer(format!(
                "offer {} is {}",
                offer.id, offer.status
            )));
        }

        let contact_code = offer.contact_code().to_string();
        let leases = self
            .leasing
            .get_leases_by_contact_code(&contact_code)
            .await
            .map_err(|e| AcceptOfferError::Unknown(e.to_string()))?;
        if tenancy_leases(leases).is_empty() {
            return Err(AcceptOfferError::NoContractInTheArea(format!(
                "{} holds no current or upcoming lease",
                contact_code
            )));
        }

        let check = RuleCheck {
            contact_code: &contact_code,
            district_code: &district_code,
            rental_object_code: &listing.rental_object_code,
            application_type: offer.offered_applicant.application_type,
        };
        match validate_rental_rules(self.leasing.as_ref(), check).await {
            Ok(()) => trace.info(format!("{} still passes the rental rules", contact_code)),
            Err(RuleCheckFailure::Violation(violation)) => {
                return Err(AcceptOfferError::NoContractInTheArea(format!(
                    "{}: {}",
                    contact_code, violation
                )))
            }
            Err(RuleCheckFailure::Unavailable(e)) => {
                return Err(AcceptOfferError::Unknown(e.to_string()))
            }
        }

        let from_date = lease_start_date(Utc::now(), self.settings.timezone, listing.vacant_from());
        let new_lease = NewLease {
            rental_object_code: listing.rental_object_code.clone(),
            contact_code: contact_code.clone(),
            from_date,
            company_code: self.settings.lease_company_code.clone(),
        };
        let lease = self
            .leasing
            .create_lease(&new_lease)
            .await
            .map_err(|e| AcceptOfferError::CreateLeaseFailure(e.to_string()))?;
        trace.info(format!("Lease {} starts {}", lease.lease_id, from_date));

        self.leasing
            .close_offer_by_accept(offer.id)
            .await
            .map_err(|e| AcceptOfferError::Unknown(e.to_string()))?;
        trace.info(format!("Offer {} closed as accepted", offer.id));

        let mut effects = DetachedEffects::new();

        let reset = self
            .leasing
            .reset_waiting_list(&contact_code, WaitingListType::ParkingSpace)
            .await;
        effects.settle(trace, SideEffect::WaitingListReset, reset);

        let denied_offers = self
            .deny_sibling_offers(trace, &mut effects, &contact_code, offer.id)
            .await;

        let email = self.send_accept_email(&listing, &contact_code, from_date).await;
        effects.settle(trace, SideEffect::AcceptOfferEmail, email);

        let subject = format!(
            "Offer {} for {} accepted by {}",
            offer.id, listing.rental_object_code, contact_code
        );
        let summary = self.reporter.on_summary(trace, &subject).await;
        effects.settle(trace, SideEffect::RoleNotification, summary);

        Ok(effects.finish(AcceptedOffer {
            offer_id: offer.id,
            listing_id: listing.id,
            lease,
            denied_offers,
        }))
    }

    /// Deny every other active offer the contact holds, concurrently
    async fn deny_sibling_offers(
        &self,
        trace: &mut WorkflowTrace,
        effects: &mut DetachedEffects,
        contact_code: &str,
        accepted: OfferId,
    ) -> Vec<OfferId> {
        let lookup = self.leasing.get_offers_for_contact(contact_code).await;
        let Some(offers) = effects.settle(trace, SideEffect::CascadeLookup, lookup) else {
            return Vec::new();
        };

        let siblings: Vec<OfferId> = offers
            .iter()
            .filter(|o| o.is_active() && o.id != accepted)
            .map(|o| o.id)
            .collect();
        trace.info(format!("Denying {} sibling offers", siblings.len()));

        let results = join_all(siblings.iter().map(|id| self.deny(*id))).await;

        let mut denied = Vec::new();
        for (offer_id, result) in siblings.into_iter().zip(results) {
            if let Some(outcome) =
                effects.settle(trace, SideEffect::CascadeDeny { offer_id }, result)
            {
                effects.absorb(outcome.advisories);
                denied.push(offer_id);
            }
        }
        denied
    }

    async fn send_accept_email(
        &self,
        listing: &Listing,
        contact_code: &str,
        lease_start_date: NaiveDate,
    ) -> anyhow::Result<()> {
        let contact = self
            .leasing
            .get_contact_by_contact_code(contact_code)
            .await?
            .ok_or_else(|| anyhow::anyhow!("contact {} not found", contact_code))?;
        let to = contact
            .email()
            .ok_or_else(|| anyhow::anyhow!("contact {} has no email address", contact_code))?;

        let email = ParkingSpaceAcceptOfferEmail {
            to: to.to_string(),
            first_name: contact.first_name.clone(),
            address: listing.rental_object.formatted_address(),
            rent: listing.rental_object.monthly_rent,
            rental_object_code: listing.rental_object_code.clone(),
            lease_start_date,
        };
        self.communication
            .send_parking_space_accept_offer_email(&email)
            .await?;
        Ok(())
    }

    // =========================================================================
    // Deny
    // =========================================================================

    pub async fn deny(
        &self,
        offer_id: OfferId,
    ) -> Result<ProcessOutcome<DeniedOffer>, DenyOfferError> {
        let mut trace = WorkflowTrace::new("deny-offer");
        trace.info(format!("Denying offer {}", offer_id));

        let result = self.run_deny(&mut trace, offer_id).await;

        if let Err(e) = &result {
            trace.error(format!("Deny failed: {} ({})", e, e.code()));
            if e.is_internal() {
                report_failure(self.reporter.as_ref(), &trace, &e.to_string()).await;
            }
        }

        result
    }

    async fn run_deny(
        &self,
        trace: &mut WorkflowTrace,
        offer_id: OfferId,
    ) -> Result<ProcessOutcome<DeniedOffer>, DenyOfferError> {
        let ResolvedOffer { offer, listing, .. } = self.resolve(trace, offer_id).await?;

        if !offer.is_active() {
            return Err(DenyOfferError::NoActiveOffer(format!(
                "offer {} is {}",
                offer.id, offer.status
            )));
        }

        self.leasing
            .close_offer_by_deny(offer.id)
            .await
            .map_err(|e| DenyOfferError::Unknown(e.to_string()))?;
        trace.info(format!("Offer {} closed as denied", offer.id));

        let mut effects = DetachedEffects::new();
        let next_offer = self.regenerate(trace, &mut effects, listing.id).await;

        Ok(effects.finish(DeniedOffer {
            offer_id: offer.id,
            listing_id: listing.id,
            next_offer,
        }))
    }

    // =========================================================================
    // Expire
    // =========================================================================

    pub async fn expire(
        &self,
        offer_id: OfferId,
    ) -> Result<ProcessOutcome<ExpiredOffer>, ExpireOfferError> {
        let mut trace = WorkflowTrace::new("expire-offer");
        trace.info(format!("Expiring offer {}", offer_id));

        let result = self.run_expire(&mut trace, offer_id).await;

        if let Err(e) = &result {
            trace.error(format!("Expire failed: {} ({})", e, e.code()));
            if e.is_internal() {
                report_failure(self.reporter.as_ref(), &trace, &e.to_string()).await;
            }
        }

        result
    }

    async fn run_expire(
        &self,
        trace: &mut WorkflowTrace,
        offer_id: OfferId,
    ) -> Result<ProcessOutcome<ExpiredOffer>, ExpireOfferError> {
        let ResolvedOffer { offer, listing, .. } = self.resolve(trace, offer_id).await?;

        let mut effects = DetachedEffects::new();
        let next_offer = if offer.status == OfferStatus::Expired {
            trace.info(format!(
                "Offer {} already expired, regenerating for listing {}",
                offer.id, listing.id
            ));
            self.regenerate(trace, &mut effects, listing.id).await
        } else {
            None
        };

        Ok(effects.finish(ExpiredOffer {
            offer_id: offer.id,
            listing_id: listing.id,
            status: offer.status,
            next_offer,
        }))
    }
}
