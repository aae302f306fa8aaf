//! Economy service port trait
//!
//! Source of the debt-collection invoice history used by the credit check.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::entities::Invoice;
use crate::error::EconomyError;

#[async_trait]
pub trait EconomyClient: Send + Sync {
    /// Invoices for a contact that were sent to debt collection on or after `since`
    async fn get_invoices_sent_to_debt_collection(
        &self,
        contact_code: &str,
        since: NaiveDate,
    ) -> Result<Vec<Invoice>, EconomyError>;
}
