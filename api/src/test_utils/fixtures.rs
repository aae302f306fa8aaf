//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use chrono::{Duration, NaiveDate, Utc};

use crate::domain::entities::applicant::ApplicantAddress;
use crate::domain::entities::lease::{LeaseKind, LeaseStatus};
use crate::domain::entities::listing::RentalRule;
use crate::domain::entities::{
    Applicant, ApplicantId, ApplicantStatus, ApplicationType, Contact, DetailedApplicant, Invoice,
    Lease, Listing, ListingId, ListingStatus, Offer, OfferId, OfferStatus, RentalObject,
};

/// Rental object code of the parking space behind listing `id`
pub fn test_rental_object_code(listing_id: i64) -> String {
    format!("705-808-00-{:04}", listing_id)
}

/// Create a scored parking space listing in district CEN, vacant from 2025-09-01
pub fn test_listing(id: i64, status: ListingStatus) -> Listing {
    let rental_object_code = test_rental_object_code(id);
    Listing {
        id: ListingId(id),
        rental_object_code: rental_object_code.clone(),
        status,
        rental_rule: RentalRule::Scored,
        publish_from: Utc::now() - Duration::days(14),
        publish_to: Utc::now() - Duration::days(1),
        rental_object: RentalObject {
            rental_object_code,
            address: format!("Testgatan {}", id),
            postal_code: Some("722 11".to_string()),
            city: Some("Västerås".to_string()),
            monthly_rent: 450.0,
            object_type_caption: Some("Carport".to_string()),
            vacant_from: NaiveDate::from_ymd_opt(2025, 9, 1),
            residential_area_code: Some("CEN".to_string()),
            residential_area_caption: Some("Centrum".to_string()),
        },
    }
}

/// Create a contact named "Test <code>" with an email address
pub fn test_contact(contact_code: &str) -> Contact {
    Contact {
        contact_code: contact_code.to_string(),
        first_name: "Test".to_string(),
        last_name: contact_code.to_string(),
        email_address: Some(format!("{}@example.com", contact_code.to_lowercase())),
        phone_number: None,
        waiting_lists: vec![],
    }
}

/// Create a housing lease for a contact
pub fn test_lease(contact_code: &str, status: LeaseStatus) -> Lease {
    Lease {
        lease_id: format!("306-001-01-0101/{}", contact_code),
        rental_object_code: "306-001-01-0101".to_string(),
        contact_code: contact_code.to_string(),
        kind: LeaseKind::Housing,
        status,
        lease_start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        lease_end_date: None,
    }
}

/// Create an active applicant for a listing
pub fn test_applicant(
    id: i64,
    listing_id: i64,
    contact_code: &str,
    priority: Option<i32>,
) -> DetailedApplicant {
    DetailedApplicant {
        applicant: Applicant {
            id: ApplicantId(id),
            listing_id: ListingId(listing_id),
            contact_code: contact_code.to_string(),
            name: format!("Test {}", contact_code),
            application_date: Utc::now() - Duration::days(7),
            application_type: ApplicationType::Additional,
            status: ApplicantStatus::Active,
        },
        priority,
        queue_points: 100 - priority.unwrap_or(0),
        address: Some(ApplicantAddress {
            street: "Testgatan 1".to_string(),
            postal_code: Some("722 11".to_string()),
            city: Some("Västerås".to_string()),
        }),
        current_housing_contract: Some(test_lease(contact_code, LeaseStatus::Current)),
        upcoming_housing_contract: None,
        parking_space_contracts: vec![],
    }
}

/// Create an offer of a listing to an applicant, expiring in three days
pub fn test_offer(
    id: i64,
    listing_id: i64,
    applicant_id: i64,
    contact_code: &str,
    status: OfferStatus,
) -> Offer {
    let offered = test_applicant(applicant_id, listing_id, contact_code, Some(1));
    Offer {
        id: OfferId(id),
        listing_id: ListingId(listing_id),
        offered_applicant: Applicant {
            status: ApplicantStatus::Offered,
            ..offered.applicant
        },
        selected_applicants: vec![],
        status,
        sent_at: Some(Utc::now()),
        expires_at: Utc::now() + Duration::days(3),
        answered_at: None,
    }
}

/// Create a debt collection invoice dated a month ago
pub fn test_invoice(remaining_amount: f64) -> Invoice {
    Invoice {
        invoice_id: format!("INV-{}", remaining_amount),
        amount: 500.0,
        remaining_amount,
        invoice_date: (Utc::now() - Duration::days(30)).date_naive(),
        paid_amount: Some(500.0 - remaining_amount),
    }
}
