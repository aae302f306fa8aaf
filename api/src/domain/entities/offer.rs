//! Offer domain entity
//!
//! An offer proposes one listing to one selected applicant for a limited
//! time. The leasing store allows at most one Active offer per listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::applicant::{Applicant, ApplicantId, ApplicantStatus, ApplicationType, DetailedApplicant};
use super::lease::LeaseStatus;
use super::listing::ListingId;

/// Unique identifier for an offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OfferId(pub i64);

impl From<i64> for OfferId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for OfferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Offer status. Everything except `Active` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferStatus {
    Active,
    Accepted,
    Denied,
    Expired,
}

impl OfferStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OfferStatus::Active)
    }
}

impl std::fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OfferStatus::Active => write!(f, "active"),
            OfferStatus::Accepted => write!(f, "accepted"),
            OfferStatus::Denied => write!(f, "denied"),
            OfferStatus::Expired => write!(f, "expired"),
        }
    }
}

/// Snapshot of one applicant taken when an offer is created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferApplicant {
    pub listing_id: ListingId,
    pub applicant_id: ApplicantId,
    pub status: ApplicantStatus,
    pub application_type: ApplicationType,
    pub queue_points: i32,
    pub address: String,
    pub has_parking_space: bool,
    pub housing_lease_status: Option<LeaseStatus>,
    pub priority: Option<i32>,
    pub sort_order: usize,
}

impl OfferApplicant {
    pub fn snapshot(applicant: &DetailedApplicant, sort_order: usize) -> Self {
        Self {
            listing_id: applicant.applicant.listing_id,
            applicant_id: applicant.id(),
            status: applicant.applicant.status,
            application_type: applicant.applicant.application_type,
            queue_points: applicant.queue_points,
            address: applicant.formatted_address(),
            has_parking_space: applicant.has_parking_space(),
            housing_lease_status: applicant.housing_lease_status(),
            priority: applicant.priority,
            sort_order,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: OfferId,
    pub listing_id: ListingId,
    pub offered_applicant: Applicant,
    #[serde(default)]
    pub selected_applicants: Vec<OfferApplicant>,
    pub status: OfferStatus,
    pub sent_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub answered_at: Option<DateTime<Utc>>,
}

impl Offer {
    pub fn is_active(&self) -> bool {
        self.status == OfferStatus::Active
    }

    pub fn contact_code(&self) -> &str {
        &self.offered_applicant.contact_code
    }
}

/// Data needed to create a new offer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOffer {
    pub listing_id: ListingId,
    pub applicant_id: ApplicantId,
    pub status: OfferStatus,
    pub sent_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    pub selected_applicants: Vec<OfferApplicant>,
}
