//! Invoice domain entity
//!
//! Invoices sent to debt collection, as reported by the economy service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub invoice_id: String,
    pub amount: f64,
    pub remaining_amount: f64,
    pub invoice_date: NaiveDate,
    #[serde(default)]
    pub paid_amount: Option<f64>,
}

impl Invoice {
    /// An invoice with any remaining amount counts as unpaid debt
    pub fn is_unpaid(&self) -> bool {
        self.remaining_amount > 0.0
    }
}
