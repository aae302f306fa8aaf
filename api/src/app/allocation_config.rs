//! Allocation configuration
//!
//! Defaults and runtime settings for the parking-space allocation workflow.

use chrono_tz::Tz;

/// Business days an applicant has to answer an offer
pub const DEFAULT_OFFER_BUSINESS_DAYS: u32 = 3;

/// Months of debt-collection history inspected by the credit check
pub const DEFAULT_CREDIT_CHECK_MONTHS: u32 = 6;

/// Company code new leases are created under
pub const DEFAULT_LEASE_COMPANY_CODE: &str = "001";

/// Local civil calendar offers expire in
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Stockholm;

/// Role receiving failure traces and process summaries
pub const ROLE_DEV: &str = "dev";

/// Role receiving credit-check rejections for manual review
pub const ROLE_LEASING: &str = "leasing";

/// Settings shared by the allocation services
#[derive(Debug, Clone)]
pub struct AllocationSettings {
    pub timezone: Tz,
    pub offer_business_days: u32,
    pub credit_check_months: u32,
    pub lease_company_code: String,
}

impl Default for AllocationSettings {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE,
            offer_business_days: DEFAULT_OFFER_BUSINESS_DAYS,
            credit_check_months: DEFAULT_CREDIT_CHECK_MONTHS,
            lease_company_code: DEFAULT_LEASE_COMPANY_CODE.to_string(),
        }
    }
}
