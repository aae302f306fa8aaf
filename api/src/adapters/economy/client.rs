//! Economy service HTTP client implementation

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use urlencoding::encode;

use crate::domain::entities::Invoice;
use crate::domain::ports::EconomyClient;
use crate::error::EconomyError;

/// Implementation of the economy service client
pub struct EconomyClientImpl {
    http: Client,
    base_url: String,
}

impl EconomyClientImpl {
    pub fn new(base_url: String) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Deserialize)]
struct InvoicesResponse {
    content: Vec<Invoice>,
}

#[async_trait]
impl EconomyClient for EconomyClientImpl {
    async fn get_invoices_sent_to_debt_collection(
        &self,
        contact_code: &str,
        since: NaiveDate,
    ) -> Result<Vec<Invoice>, EconomyError> {
        let resp = self
            .http
            .get(format!(
                "{}/contacts/{}/invoices/debt-collection",
                self.base_url,
                encode(contact_code)
            ))
            .query(&[("from", since.format("%Y-%m-%d").to_string())])
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            let body: InvoicesResponse = resp
                .json()
                .await
                .map_err(|e| EconomyError::Deserialization(e.to_string()))?;
            Ok(body.content)
        } else if status.as_u16() == 404 {
            // No invoice history for the contact
            Ok(Vec::new())
        } else {
            let message = resp.text().await.unwrap_or_default();
            Err(EconomyError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}
