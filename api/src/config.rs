use std::env;
use std::fmt::Display;
use std::str::FromStr;

use anyhow::{anyhow, Result};

use crate::app::allocation_config::{
    AllocationSettings, DEFAULT_CREDIT_CHECK_MONTHS, DEFAULT_LEASE_COMPANY_CODE,
    DEFAULT_OFFER_BUSINESS_DAYS, DEFAULT_TIMEZONE,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub leasing_service_url: String,
    pub economy_service_url: String,
    pub communication_service_url: String,
    pub port: u16,
    pub allocation: AllocationSettings,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let allocation = AllocationSettings {
            timezone: parse_setting("LOCAL_TIMEZONE", env::var("LOCAL_TIMEZONE").ok(), DEFAULT_TIMEZONE)?,
            offer_business_days: parse_setting(
                "OFFER_BUSINESS_DAYS",
                env::var("OFFER_BUSINESS_DAYS").ok(),
                DEFAULT_OFFER_BUSINESS_DAYS,
            )?,
            credit_check_months: parse_setting(
                "CREDIT_CHECK_MONTHS",
                env::var("CREDIT_CHECK_MONTHS").ok(),
                DEFAULT_CREDIT_CHECK_MONTHS,
            )?,
            lease_company_code: parse_setting(
                "LEASE_COMPANY_CODE",
                env::var("LEASE_COMPANY_CODE").ok(),
                DEFAULT_LEASE_COMPANY_CODE.to_string(),
            )?,
        };

        Ok(Self {
            leasing_service_url: env::var("LEASING_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:5020".to_string()),
            economy_service_url: env::var("ECONOMY_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:5080".to_string()),
            communication_service_url: env::var("COMMUNICATION_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:5040".to_string()),
            port: parse_setting("PORT", env::var("PORT").ok(), 8080)?,
            allocation,
        })
    }
}

/// Parse an optional raw value, falling back to `default` when unset or blank
fn parse_setting<T>(name: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|e| anyhow!("Invalid {} {:?}: {}", name, value, e)),
    }
}
