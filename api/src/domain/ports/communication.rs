//! Communication port trait
//!
//! Email and role notifications. All calls are best-effort from the
//! workflow's point of view.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::error::CommunicationError;

/// Offer email sent to the selected applicant
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSpaceOfferEmail {
    pub to: String,
    pub first_name: String,
    pub address: String,
    pub rent: f64,
    pub object_type: Option<String>,
    pub rental_object_code: String,
    pub available_from: Option<NaiveDate>,
    pub deadline: DateTime<Utc>,
    pub offer_id: i64,
}

/// Confirmation email sent after an offer is accepted
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSpaceAcceptOfferEmail {
    pub to: String,
    pub first_name: String,
    pub address: String,
    pub rent: f64,
    pub rental_object_code: String,
    pub lease_start_date: NaiveDate,
}

#[async_trait]
pub trait CommunicationClient: Send + Sync {
    async fn send_parking_space_offer_email(
        &self,
        email: &ParkingSpaceOfferEmail,
    ) -> Result<(), CommunicationError>;

    async fn send_parking_space_accept_offer_email(
        &self,
        email: &ParkingSpaceAcceptOfferEmail,
    ) -> Result<(), CommunicationError>;

    /// Notify everyone holding a role (e.g. `dev`, `leasing`)
    async fn send_notification_to_role(
        &self,
        role: &str,
        subject: &str,
        message: &str,
    ) -> Result<(), CommunicationError>;
}
