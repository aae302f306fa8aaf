//! Listing domain entity
//!
//! A listing advertises one vacant rental object. The leasing store owns it;
//! the allocation workflow only reads it and moves it between statuses.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingId(pub i64);

impl From<i64> for ListingId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ListingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Listing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingStatus {
    Active,
    Expired,
    Closed,
    Assigned,
    NoApplicants,
}

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingStatus::Active => write!(f, "active"),
            ListingStatus::Expired => write!(f, "expired"),
            ListingStatus::Closed => write!(f, "closed"),
            ListingStatus::Assigned => write!(f, "assigned"),
            ListingStatus::NoApplicants => write!(f, "no_applicants"),
        }
    }
}

impl std::str::FromStr for ListingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(ListingStatus::Active),
            "expired" => Ok(ListingStatus::Expired),
            "closed" => Ok(ListingStatus::Closed),
            "assigned" => Ok(ListingStatus::Assigned),
            "no_applicants" | "noapplicants" => Ok(ListingStatus::NoApplicants),
            _ => Err(format!("Unknown listing status: {}", s)),
        }
    }
}

/// How applicants for a listing are ranked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RentalRule {
    /// Internal allocation ranked by queue points
    Scored,
    /// First come, first served
    NonScored,
}

/// Snapshot of the rental object attached to a listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalObject {
    pub rental_object_code: String,
    pub address: String,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    pub monthly_rent: f64,
    #[serde(default)]
    pub object_type_caption: Option<String>,
    #[serde(default)]
    pub vacant_from: Option<NaiveDate>,
    #[serde(default)]
    pub residential_area_code: Option<String>,
    #[serde(default)]
    pub residential_area_caption: Option<String>,
}

impl RentalObject {
    /// Address line used in offer snapshots and emails
    pub fn formatted_address(&self) -> String {
        match (&self.postal_code, &self.city) {
            (Some(postal_code), Some(city)) => {
                format!("{}, {} {}", self.address, postal_code, city)
            }
            _ => self.address.clone(),
        }
    }
}

/// An advertised vacant rental object accepting applications
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    pub rental_object_code: String,
    pub status: ListingStatus,
    pub rental_rule: RentalRule,
    pub publish_from: DateTime<Utc>,
    pub publish_to: DateTime<Utc>,
    pub rental_object: RentalObject,
}

impl Listing {
    /// Internal (scored) listings are the only ones this workflow allocates
    pub fn is_scored(&self) -> bool {
        self.rental_rule == RentalRule::Scored
    }

    /// Offers can only be generated once the publication window has closed
    pub fn is_ready_for_offer(&self) -> bool {
        self.status == ListingStatus::Expired
    }

    pub fn vacant_from(&self) -> Option<NaiveDate> {
        self.rental_object.vacant_from
    }

    pub fn residential_area_code(&self) -> Option<&str> {
        self.rental_object.residential_area_code.as_deref()
    }
}
