//! Leasing service HTTP client implementation

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use urlencoding::encode;

use crate::domain::entities::{
    Applicant, ApplicantId, ApplicantStatus, ApplicationType, Contact, DetailedApplicant, Lease,
    Listing, ListingId, ListingStatus, NewApplicant, NewLease, NewOffer, Offer, OfferId,
    RentalObject, WaitingListType,
};
use crate::domain::ports::LeasingClient;
use crate::error::{LeasingError, RentalRuleViolation};

/// Implementation of the leasing service client
pub struct LeasingClientImpl {
    http: Client,
    base_url: String,
}

impl LeasingClientImpl {
    pub fn new(base_url: String) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, LeasingError> {
        if response.status().is_success() {
            let envelope: Envelope<T> = response
                .json()
                .await
                .map_err(|e| LeasingError::Deserialization(e.to_string()))?;
            Ok(envelope.content)
        } else {
            Err(error_from_response(response).await)
        }
    }

    /// Like `handle_response`, but a 404 means the record does not exist
    async fn handle_optional_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<Option<T>, LeasingError> {
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        self.handle_response(response).await.map(Some)
    }

    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<(), LeasingError> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }
}

/// Every leasing service payload is wrapped in `{ "content": ... }`
#[derive(Deserialize)]
struct Envelope<T> {
    content: T,
}

/// Body of a 403 from the rental rule endpoints
#[derive(Deserialize)]
struct RentalRuleRejection {
    reason: String,
}

fn rental_rule_reason(body: &str) -> Option<RentalRuleViolation> {
    serde_json::from_str::<RentalRuleRejection>(body)
        .ok()?
        .reason
        .parse()
        .ok()
}

async fn error_from_response(response: reqwest::Response) -> LeasingError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();

    match status {
        404 => LeasingError::NotFound(message),
        409 => LeasingError::Conflict(message),
        403 => match rental_rule_reason(&message) {
            Some(violation) => LeasingError::RentalRule(violation),
            None => LeasingError::Api { status, message },
        },
        _ => LeasingError::Api { status, message },
    }
}

/// Request types for the leasing service
#[derive(Serialize)]
struct ListingStatusRequest {
    status: ListingStatus,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApplicantStatusRequest<'a> {
    status: ApplicantStatus,
    contact_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    application_type: Option<ApplicationType>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WaitingListRequest {
    waiting_list_type: WaitingListType,
}

#[async_trait]
impl LeasingClient for LeasingClientImpl {
    async fn get_active_listing_by_rental_object_code(
        &self,
        rental_object_code: &str,
    ) -> Result<Option<Listing>, LeasingError> {
        let resp = self
            .http
            .get(self.url(&format!(
                "/listings/by-code/{}",
                encode(rental_object_code)
            )))
            .query(&[("status", "Active")])
            .send()
            .await?;

        self.handle_optional_response(resp).await
    }

    async fn get_listing_by_listing_id(
        &self,
        listing_id: ListingId,
    ) -> Result<Option<Listing>, LeasingError> {
        let resp = self
            .http
            .get(self.url(&format!("/listings/{}", listing_id)))
            .send()
            .await?;

        self.handle_optional_response(resp).await
    }

    async fn get_parking_space_by_code(
        &self,
        rental_object_code: &str,
    ) -> Result<Option<RentalObject>, LeasingError> {
        let resp = self
            .http
            .get(self.url(&format!(
                "/parking-spaces/{}",
                encode(rental_object_code)
            )))
            .send()
            .await?;

        self.handle_optional_response(resp).await
    }

    async fn update_listing_status(
        &self,
        listing_id: ListingId,
        status: ListingStatus,
    ) -> Result<(), LeasingError> {
        let resp = self
            .http
            .put(self.url(&format!("/listings/{}/status", listing_id)))
            .json(&ListingStatusRequest { status })
            .send()
            .await?;

        self.handle_empty_response(resp).await
    }

    async fn get_detailed_applicants_by_listing_id(
        &self,
        listing_id: ListingId,
    ) -> Result<Vec<DetailedApplicant>, LeasingError> {
        let resp = self
            .http
            .get(self.url(&format!("/listings/{}/applicants/details", listing_id)))
            .send()
            .await?;

        self.handle_response(resp).await
    }

    async fn get_applicant_by_contact_code_and_listing_id(
        &self,
        contact_code: &str,
        listing_id: ListingId,
    ) -> Result<Option<Applicant>, LeasingError> {
        let resp = self
            .http
            .get(self.url(&format!(
                "/applicants/{}/{}",
                encode(contact_code),
                listing_id
            )))
            .send()
            .await?;

        self.handle_optional_response(resp).await
    }

    async fn get_applicant_by_id(
        &self,
        applicant_id: ApplicantId,
    ) -> Result<Option<Applicant>, LeasingError> {
        let resp = self
            .http
            .get(self.url(&format!("/applicants/by-id/{}", applicant_id)))
            .send()
            .await?;

        self.handle_optional_response(resp).await
    }

    async fn apply_for_listing(&self, applicant: &NewApplicant) -> Result<Applicant, LeasingError> {
        let resp = self
            .http
            .post(self.url("/listings/apply"))
            .json(applicant)
            .send()
            .await?;

        self.handle_response(resp).await
    }

    async fn set_applicant_status_active(
        &self,
        applicant_id: ApplicantId,
        contact_code: &str,
        application_type: ApplicationType,
    ) -> Result<(), LeasingError> {
        let resp = self
            .http
            .put(self.url(&format!("/applicants/{}/status", applicant_id)))
            .json(&ApplicantStatusRequest {
                status: ApplicantStatus::Active,
                contact_code,
                application_type: Some(application_type),
            })
            .send()
            .await?;

        self.handle_empty_response(resp).await
    }

    async fn update_applicant_status(
        &self,
        applicant_id: ApplicantId,
        contact_code: &str,
        status: ApplicantStatus,
    ) -> Result<(), LeasingError> {
        let resp = self
            .http
            .put(self.url(&format!("/applicants/{}/status", applicant_id)))
            .json(&ApplicantStatusRequest {
                status,
                contact_code,
                application_type: None,
            })
            .send()
            .await?;

        self.handle_empty_response(resp).await
    }

    async fn create_offer(&self, offer: &NewOffer) -> Result<Offer, LeasingError> {
        let resp = self
            .http
            .post(self.url("/offers"))
            .json(offer)
            .send()
            .await?;

        self.handle_response(resp).await
    }

    async fn get_offer_by_offer_id(&self, offer_id: OfferId) -> Result<Option<Offer>, LeasingError> {
        let resp = self
            .http
            .get(self.url(&format!("/offers/{}", offer_id)))
            .send()
            .await?;

        self.handle_optional_response(resp).await
    }

    async fn close_offer_by_accept(&self, offer_id: OfferId) -> Result<(), LeasingError> {
        let resp = self
            .http
            .put(self.url(&format!("/offers/{}/close-by-accept", offer_id)))
            .send()
            .await?;

        self.handle_empty_response(resp).await
    }

    async fn close_offer_by_deny(&self, offer_id: OfferId) -> Result<(), LeasingError> {
        let resp = self
            .http
            .put(self.url(&format!("/offers/{}/close-by-deny", offer_id)))
            .send()
            .await?;

        self.handle_empty_response(resp).await
    }

    async fn get_offers_for_contact(&self, contact_code: &str) -> Result<Vec<Offer>, LeasingError> {
        let resp = self
            .http
            .get(self.url(&format!("/contacts/{}/offers", encode(contact_code))))
            .send()
            .await?;

        // A contact without offers is reported as 404
        Ok(self.handle_optional_response(resp).await?.unwrap_or_default())
    }

    async fn create_lease(&self, lease: &NewLease) -> Result<Lease, LeasingError> {
        let resp = self
            .http
            .post(self.url("/leases"))
            .json(lease)
            .send()
            .await?;

        self.handle_response(resp).await
    }

    async fn reset_waiting_list(
        &self,
        contact_code: &str,
        waiting_list: WaitingListType,
    ) -> Result<(), LeasingError> {
        let resp = self
            .http
            .post(self.url(&format!(
                "/contacts/{}/waiting-lists/reset",
                encode(contact_code)
            )))
            .json(&WaitingListRequest {
                waiting_list_type: waiting_list,
            })
            .send()
            .await?;

        self.handle_empty_response(resp).await
    }

    async fn add_applicant_to_waiting_list(
        &self,
        contact_code: &str,
        waiting_list: WaitingListType,
    ) -> Result<(), LeasingError> {
        let resp = self
            .http
            .post(self.url(&format!(
                "/contacts/{}/waiting-lists",
                encode(contact_code)
            )))
            .json(&WaitingListRequest {
                waiting_list_type: waiting_list,
            })
            .send()
            .await?;

        self.handle_empty_response(resp).await
    }

    async fn validate_residential_area_rental_rules(
        &self,
        contact_code: &str,
        district_code: &str,
        application_type: ApplicationType,
    ) -> Result<(), LeasingError> {
        let resp = self
            .http
            .get(self.url(&format!(
                "/applicants/validate-rental-rules/residential-area/{}/{}",
                encode(district_code),
                encode(contact_code)
            )))
            .query(&[("applicationType", application_type.to_string())])
            .send()
            .await?;

        self.handle_empty_response(resp).await
    }

    async fn validate_property_rental_rules(
        &self,
        contact_code: &str,
        rental_object_code: &str,
        application_type: ApplicationType,
    ) -> Result<(), LeasingError> {
        let resp = self
            .http
            .get(self.url(&format!(
                "/applicants/validate-rental-rules/property/{}/{}",
                encode(contact_code),
                encode(rental_object_code)
            )))
            .query(&[("applicationType", application_type.to_string())])
            .send()
            .await?;

        self.handle_empty_response(resp).await
    }

    async fn get_contact_by_contact_code(
        &self,
        contact_code: &str,
    ) -> Result<Option<Contact>, LeasingError> {
        let resp = self
            .http
            .get(self.url(&format!("/contacts/{}", encode(contact_code))))
            .send()
            .await?;

        self.handle_optional_response(resp).await
    }

    async fn get_leases_by_contact_code(
        &self,
        contact_code: &str,
    ) -> Result<Vec<Lease>, LeasingError> {
        let resp = self
            .http
            .get(self.url(&format!("/contacts/{}/leases", encode(contact_code))))
            .send()
            .await?;

        Ok(self.handle_optional_response(resp).await?.unwrap_or_default())
    }
}
