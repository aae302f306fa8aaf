//! Applicant domain entity
//!
//! An applicant is a tenant's interest record for one listing. Rows are
//! created at intake and moved through their statuses by the offer workflow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lease::{Lease, LeaseStatus};
use super::listing::ListingId;

/// Unique identifier for an applicant row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicantId(pub i64);

impl From<i64> for ApplicantId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ApplicantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Applicant status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicantStatus {
    Active,
    Offered,
    Disqualified,
    WithdrawnByUser,
    WithdrawnByManager,
    OfferAccepted,
    OfferDeclined,
    OfferExpired,
}

impl ApplicantStatus {
    pub fn is_withdrawn(&self) -> bool {
        matches!(
            self,
            ApplicantStatus::WithdrawnByUser | ApplicantStatus::WithdrawnByManager
        )
    }

    /// Statuses under which a repeated application is a no-op
    pub fn is_pending(&self) -> bool {
        matches!(self, ApplicantStatus::Active | ApplicantStatus::Offered)
    }
}

impl std::fmt::Display for ApplicantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplicantStatus::Active => write!(f, "active"),
            ApplicantStatus::Offered => write!(f, "offered"),
            ApplicantStatus::Disqualified => write!(f, "disqualified"),
            ApplicantStatus::WithdrawnByUser => write!(f, "withdrawn_by_user"),
            ApplicantStatus::WithdrawnByManager => write!(f, "withdrawn_by_manager"),
            ApplicantStatus::OfferAccepted => write!(f, "offer_accepted"),
            ApplicantStatus::OfferDeclined => write!(f, "offer_declined"),
            ApplicantStatus::OfferExpired => write!(f, "offer_expired"),
        }
    }
}

/// Whether the applicant wants to swap an existing parking space or add one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationType {
    Replace,
    Additional,
}

impl std::fmt::Display for ApplicationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplicationType::Replace => write!(f, "Replace"),
            ApplicationType::Additional => write!(f, "Additional"),
        }
    }
}

impl std::str::FromStr for ApplicationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "replace" => Ok(ApplicationType::Replace),
            "additional" => Ok(ApplicationType::Additional),
            _ => Err(format!("Unknown application type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    pub id: ApplicantId,
    pub listing_id: ListingId,
    pub contact_code: String,
    pub name: String,
    pub application_date: DateTime<Utc>,
    pub application_type: ApplicationType,
    pub status: ApplicantStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantAddress {
    pub street: String,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

/// Applicant enriched with queue rank and lease situation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedApplicant {
    #[serde(flatten)]
    pub applicant: Applicant,
    /// Queue rank for the listing; `None` means not selectable for an offer
    #[serde(default)]
    pub priority: Option<i32>,
    #[serde(default)]
    pub queue_points: i32,
    #[serde(default)]
    pub address: Option<ApplicantAddress>,
    #[serde(default)]
    pub current_housing_contract: Option<Lease>,
    #[serde(default)]
    pub upcoming_housing_contract: Option<Lease>,
    #[serde(default)]
    pub parking_space_contracts: Vec<Lease>,
}

impl DetailedApplicant {
    pub fn id(&self) -> ApplicantId {
        self.applicant.id
    }

    pub fn contact_code(&self) -> &str {
        &self.applicant.contact_code
    }

    /// Active applicants with a queue rank are considered for offers
    pub fn is_offer_candidate(&self) -> bool {
        self.applicant.status == ApplicantStatus::Active && self.priority.is_some()
    }

    pub fn has_parking_space(&self) -> bool {
        !self.parking_space_contracts.is_empty()
    }

    /// The most relevant housing lease: current wins over upcoming
    pub fn housing_lease_status(&self) -> Option<LeaseStatus> {
        self.current_housing_contract
            .as_ref()
            .or(self.upcoming_housing_contract.as_ref())
            .map(|lease| lease.status)
    }

    pub fn formatted_address(&self) -> String {
        match &self.address {
            Some(ApplicantAddress {
                street,
                postal_code: Some(postal_code),
                city: Some(city),
            }) => format!("{}, {} {}", street, postal_code, city),
            Some(address) => address.street.clone(),
            None => String::new(),
        }
    }
}

/// Data needed to register a new applicant
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplicant {
    pub listing_id: ListingId,
    pub contact_code: String,
    pub name: String,
    pub application_date: DateTime<Utc>,
    pub application_type: ApplicationType,
    pub status: ApplicantStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::lease::LeaseKind;
    use chrono::NaiveDate;

    fn make_applicant(status: ApplicantStatus, priority: Option<i32>) -> DetailedApplicant {
        DetailedApplicant {
            applicant: Applicant {
                id: ApplicantId(7),
                listing_id: ListingId(3),
                contact_code: "P123456".to_string(),
                name: "Anna Andersson".to_string(),
                application_date: Utc::now(),
                application_type: ApplicationType::Additional,
                status,
            },
            priority,
            queue_points: 30,
            address: None,
            current_housing_contract: None,
            upcoming_housing_contract: None,
            parking_space_contracts: vec![],
        }
    }

    fn housing_lease(status: LeaseStatus) -> Lease {
        Lease {
            lease_id: "lease".to_string(),
            rental_object_code: "306-001-01-0101".to_string(),
            contact_code: "P123456".to_string(),
            kind: LeaseKind::Housing,
            status,
            lease_start_date: NaiveDate::from_ymd_opt(2021, 5, 1).unwrap(),
            lease_end_date: None,
        }
    }

    #[test]
    fn candidate_requires_active_status_and_priority() {
        assert!(make_applicant(ApplicantStatus::Active, Some(1)).is_offer_candidate());
        assert!(!make_applicant(ApplicantStatus::Active, None).is_offer_candidate());
        assert!(!make_applicant(ApplicantStatus::Offered, Some(1)).is_offer_candidate());
        assert!(!make_applicant(ApplicantStatus::Disqualified, Some(1)).is_offer_candidate());
    }

    #[test]
    fn current_housing_lease_wins_over_upcoming() {
        let mut applicant = make_applicant(ApplicantStatus::Active, Some(1));
        assert_eq!(applicant.housing_lease_status(), None);

        applicant.upcoming_housing_contract = Some(housing_lease(LeaseStatus::Upcoming));
        assert_eq!(
            applicant.housing_lease_status(),
            Some(LeaseStatus::Upcoming)
        );

        applicant.current_housing_contract = Some(housing_lease(LeaseStatus::Current));
        assert_eq!(applicant.housing_lease_status(), Some(LeaseStatus::Current));
    }

    #[test]
    fn withdrawn_statuses() {
        assert!(ApplicantStatus::WithdrawnByUser.is_withdrawn());
        assert!(ApplicantStatus::WithdrawnByManager.is_withdrawn());
        assert!(!ApplicantStatus::Active.is_withdrawn());
    }

    #[test]
    fn application_type_from_str() {
        assert_eq!(
            "replace".parse::<ApplicationType>().unwrap(),
            ApplicationType::Replace
        );
        assert_eq!(
            "Additional".parse::<ApplicationType>().unwrap(),
            ApplicationType::Additional
        );
        assert!("swap".parse::<ApplicationType>().is_err());
    }

    #[test]
    fn detailed_applicant_deserializes_flattened_fields() {
        let json = r#"{
            "id": 11,
            "listingId": 4,
            "contactCode": "P654321",
            "name": "Bo Berg",
            "applicationDate": "2025-08-01T10:00:00Z",
            "applicationType": "Replace",
            "status": "Active",
            "priority": 2,
            "queuePoints": 415
        }"#;
        let applicant: DetailedApplicant = serde_json::from_str(json).unwrap();
        assert_eq!(applicant.id(), ApplicantId(11));
        assert_eq!(applicant.priority, Some(2));
        assert!(applicant.parking_space_contracts.is_empty());
    }
}
