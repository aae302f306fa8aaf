//! Communication service HTTP client implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use urlencoding::encode;

use crate::domain::ports::{
    CommunicationClient, ParkingSpaceAcceptOfferEmail, ParkingSpaceOfferEmail,
};
use crate::error::CommunicationError;

/// Implementation of the communication service client
pub struct CommunicationClientImpl {
    http: Client,
    base_url: String,
}

impl CommunicationClientImpl {
    pub fn new(base_url: String) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), CommunicationError> {
        let resp = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            let message = resp.text().await.unwrap_or_default();
            Err(CommunicationError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[derive(Serialize)]
struct RoleNotificationRequest<'a> {
    subject: &'a str,
    message: &'a str,
}

#[async_trait]
impl CommunicationClient for CommunicationClientImpl {
    async fn send_parking_space_offer_email(
        &self,
        email: &ParkingSpaceOfferEmail,
    ) -> Result<(), CommunicationError> {
        tracing::debug!(offer_id = email.offer_id, "Sending parking space offer email");
        self.post("/emails/parking-space-offer", email).await
    }

    async fn send_parking_space_accept_offer_email(
        &self,
        email: &ParkingSpaceAcceptOfferEmail,
    ) -> Result<(), CommunicationError> {
        tracing::debug!(
            rental_object_code = %email.rental_object_code,
            "Sending parking space accept offer email"
        );
        self.post("/emails/parking-space-accept-offer", email).await
    }

    async fn send_notification_to_role(
        &self,
        role: &str,
        subject: &str,
        message: &str,
    ) -> Result<(), CommunicationError> {
        self.post(
            &format!("/roles/{}/notifications", encode(role)),
            &RoleNotificationRequest { subject, message },
        )
        .await
    }
}
