//! Lease domain entity
//!
//! Leases are read from the contact directory to decide whether a contact is
//! a tenant, and created by the leasing store when an offer is accepted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lease status as reported by the leasing store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaseStatus {
    Current,
    Upcoming,
    AboutToEnd,
    Ended,
}

impl LeaseStatus {
    /// Current and upcoming leases make a contact a tenant
    pub fn counts_as_tenancy(&self) -> bool {
        matches!(self, LeaseStatus::Current | LeaseStatus::Upcoming)
    }
}

impl std::fmt::Display for LeaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaseStatus::Current => write!(f, "current"),
            LeaseStatus::Upcoming => write!(f, "upcoming"),
            LeaseStatus::AboutToEnd => write!(f, "about_to_end"),
            LeaseStatus::Ended => write!(f, "ended"),
        }
    }
}

/// What kind of rental object a lease covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaseKind {
    Housing,
    ParkingSpace,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lease {
    pub lease_id: String,
    pub rental_object_code: String,
    pub contact_code: String,
    pub kind: LeaseKind,
    pub status: LeaseStatus,
    pub lease_start_date: NaiveDate,
    #[serde(default)]
    pub lease_end_date: Option<NaiveDate>,
}

/// Data needed to create a lease for an accepted offer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLease {
    pub rental_object_code: String,
    pub contact_code: String,
    pub from_date: NaiveDate,
    pub company_code: String,
}

/// Keep only the leases that make the holder a tenant
pub fn tenancy_leases(leases: Vec<Lease>) -> Vec<Lease> {
    leases
        .into_iter()
        .filter(|lease| lease.status.counts_as_tenancy())
        .collect()
}
