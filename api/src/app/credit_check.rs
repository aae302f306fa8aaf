//! Internal credit check
//!
//! A contact passes when none of the invoices sent to debt collection during
//! the trailing window still has an amount left to pay.

use chrono::NaiveDate;

use crate::domain::entities::Invoice;
use crate::domain::ports::EconomyClient;
use crate::error::EconomyError;

#[derive(Debug, Clone)]
pub enum CreditCheckOutcome {
    Passed,
    Failed { unpaid: Vec<Invoice> },
}

impl CreditCheckOutcome {
    fn from_invoices(invoices: Vec<Invoice>) -> Self {
        let unpaid: Vec<Invoice> = invoices.into_iter().filter(Invoice::is_unpaid).collect();
        if unpaid.is_empty() {
            CreditCheckOutcome::Passed
        } else {
            CreditCheckOutcome::Failed { unpaid }
        }
    }
}

pub async fn check_credit<EC>(
    economy: &EC,
    contact_code: &str,
    since: NaiveDate,
) -> Result<CreditCheckOutcome, EconomyError>
where
    EC: EconomyClient + ?Sized,
{
    let invoices = economy
        .get_invoices_sent_to_debt_collection(contact_code, since)
        .await?;
    Ok(CreditCheckOutcome::from_invoices(invoices))
}
