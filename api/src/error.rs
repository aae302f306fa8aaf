//! Unified error types for the parking allocation API
//!
//! This module defines error types for each layer:
//! - `LeasingError`, `EconomyError`, `CommunicationError`: failures reported by
//!   the external services behind the domain ports
//! - one closed error enum per workflow stage (`ApplyError`, `CreateOfferError`,
//!   `AcceptOfferError`, `DenyOfferError`, `ExpireOfferError`,
//!   `WithdrawApplicationError`), each variant carrying a stable error code and
//!   the HTTP status to surface
//! - `AppError`: wraps the stage errors for HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reason a rental-rule validation rejected a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RentalRuleViolation {
    NotEligible,
    NoContractInTheArea,
    NotTenantInTheProperty,
    ApplicationTypeNotAllowed,
}

impl RentalRuleViolation {
    pub fn code(&self) -> &'static str {
        match self {
            RentalRuleViolation::NotEligible => "not-eligible",
            RentalRuleViolation::NoContractInTheArea => "no-contract-in-the-area",
            RentalRuleViolation::NotTenantInTheProperty => "not-tenant-in-the-property",
            RentalRuleViolation::ApplicationTypeNotAllowed => "application-type-not-allowed",
        }
    }
}

impl std::fmt::Display for RentalRuleViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for RentalRuleViolation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not-eligible" => Ok(RentalRuleViolation::NotEligible),
            "no-contract-in-the-area" => Ok(RentalRuleViolation::NoContractInTheArea),
            "not-tenant-in-the-property" => Ok(RentalRuleViolation::NotTenantInTheProperty),
            "application-type-not-allowed" => Ok(RentalRuleViolation::ApplicationTypeNotAllowed),
            _ => Err(format!("Unknown rental rule violation: {}", s)),
        }
    }
}

/// Leasing store and contact directory errors
#[derive(Debug, Error)]
pub enum LeasingError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Rental rule violation: {0}")]
    RentalRule(RentalRuleViolation),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

/// Economy service errors
#[derive(Debug, Error)]
pub enum EconomyError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

/// Communication (email/SMS/role notification) errors
#[derive(Debug, Error)]
pub enum CommunicationError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Missing recipient: {0}")]
    MissingRecipient(String),
}

/// Shared shape of every workflow stage error
pub trait ProcessError: std::error::Error {
    /// Stable error code echoed in response bodies
    fn code(&self) -> &'static str;

    /// HTTP status surfaced for this failure
    fn status(&self) -> StatusCode;

    /// Internal failures are reported to the dev role with the full trace
    fn is_internal(&self) -> bool {
        self.status() == StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Application intake errors
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("No active parking space listing found for {0}")]
    ParkingspaceNotFound(String),

    #[error("Parking space {0} is not allocated internally")]
    ParkingspaceNotInternal(String),

    #[error("Applicant {0} not found")]
    ApplicantNotFound(String),

    #[error("Applicant {0} has no current or upcoming lease")]
    ApplicantNotTenant(String),

    #[error("Rental rules reject the application: {0}")]
    RentalRule(RentalRuleViolation),

    #[error("Applicant {0} has unpaid invoices at debt collection")]
    InternalCreditCheckFailed(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ProcessError for ApplyError {
    fn code(&self) -> &'static str {
        match self {
            ApplyError::ParkingspaceNotFound(_) => "ParkingspaceNotFound",
            ApplyError::ParkingspaceNotInternal(_) => "ParkingspaceNotInternal",
            ApplyError::ApplicantNotFound(_) => "ApplicantNotFound",
            ApplyError::ApplicantNotTenant(_) => "ApplicantNotTenant",
            ApplyError::RentalRule(violation) => violation.code(),
            ApplyError::InternalCreditCheckFailed(_) => "InternalCreditCheckFailed",
            ApplyError::InternalError(_) => "InternalError",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApplyError::ParkingspaceNotFound(_) | ApplyError::ApplicantNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ApplyError::ApplicantNotTenant(_) => StatusCode::FORBIDDEN,
            ApplyError::ParkingspaceNotInternal(_)
            | ApplyError::RentalRule(_)
            | ApplyError::InternalCreditCheckFailed(_) => StatusCode::BAD_REQUEST,
            ApplyError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Offer generation errors
#[derive(Debug, Error)]
pub enum CreateOfferError {
    #[error("Listing {0} not found")]
    NoListing(String),

    #[error("Listing {0} is still published")]
    ListingNotExpired(String),

    #[error("Rental object for listing {0} has no vacancy date")]
    RentalObjectNotVacant(String),

    #[error("No eligible applicants for listing {0}")]
    NoApplicants(String),

    #[error("Contact {0} not found")]
    NoContact(String),

    #[error("Listing {0} already has an active offer")]
    ActiveOfferExists(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ProcessError for CreateOfferError {
    fn code(&self) -> &'static str {
        match self {
            CreateOfferError::NoListing(_) => "NoListing",
            CreateOfferError::ListingNotExpired(_) => "ListingNotExpired",
            CreateOfferError::RentalObjectNotVacant(_) => "RentalObjectNotVacant",
            CreateOfferError::NoApplicants(_) => "NoApplicants",
            CreateOfferError::NoContact(_) => "NoContact",
            CreateOfferError::ActiveOfferExists(_) => "ActiveOfferExists",
            CreateOfferError::Unknown(_) => "Unknown",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            CreateOfferError::ListingNotExpired(_) | CreateOfferError::RentalObjectNotVacant(_) => {
                StatusCode::BAD_REQUEST
            }
            CreateOfferError::NoApplicants(_) => StatusCode::NOT_FOUND,
            CreateOfferError::ActiveOfferExists(_) => StatusCode::CONFLICT,
            CreateOfferError::NoListing(_)
            | CreateOfferError::NoContact(_)
            | CreateOfferError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Offer acceptance errors
#[derive(Debug, Error)]
pub enum AcceptOfferError {
    #[error("Offer {0} not found")]
    NoOffer(String),

    #[error("Listing for offer {0} not found")]
    NoListing(String),

    #[error("Offer {0} is not active")]
    NoActiveOffer(String),

    #[error("Offer {0} cannot be accepted: no contract in the area")]
    NoContractInTheArea(String),

    #[error("Lease could not be created: {0}")]
    CreateLeaseFailure(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ProcessError for AcceptOfferError {
    fn code(&self) -> &'static str {
        match self {
            AcceptOfferError::NoOffer(_) => "NoOffer",
            AcceptOfferError::NoListing(_) => "NoListing",
            AcceptOfferError::NoActiveOffer(_) => "NoActiveOffer",
            AcceptOfferError::NoContractInTheArea(_) => "no-contract-in-the-area",
            AcceptOfferError::CreateLeaseFailure(_) => "CreateLeaseFailure",
            AcceptOfferError::Unknown(_) => "Unknown",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AcceptOfferError::NoOffer(_) | AcceptOfferError::NoListing(_) => {
                StatusCode::NOT_FOUND
            }
            AcceptOfferError::NoActiveOffer(_) => StatusCode::BAD_REQUEST,
            AcceptOfferError::NoContractInTheArea(_) => StatusCode::FORBIDDEN,
            AcceptOfferError::CreateLeaseFailure(_) | AcceptOfferError::Unknown(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Offer denial errors
#[derive(Debug, Error)]
pub enum DenyOfferError {
    #[error("Offer {0} not found")]
    NoOffer(String),

    #[error("Listing for offer {0} not found")]
    NoListing(String),

    #[error("Offer {0} is not active")]
    NoActiveOffer(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ProcessError for DenyOfferError {
    fn code(&self) -> &'static str {
        match self {
            DenyOfferError::NoOffer(_) => "NoOffer",
            DenyOfferError::NoListing(_) => "NoListing",
            DenyOfferError::NoActiveOffer(_) => "NoActiveOffer",
            DenyOfferError::Unknown(_) => "Unknown",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            DenyOfferError::NoOffer(_) | DenyOfferError::NoListing(_) => StatusCode::NOT_FOUND,
            DenyOfferError::NoActiveOffer(_) => StatusCode::BAD_REQUEST,
            DenyOfferError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Offer expiry confirmation errors
#[derive(Debug, Error)]
pub enum ExpireOfferError {
    #[error("Offer {0} not found")]
    NoOffer(String),

    #[error("Listing for offer {0} not found")]
    NoListing(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ProcessError for ExpireOfferError {
    fn code(&self) -> &'static str {
        match self {
            ExpireOfferError::NoOffer(_) => "NoOffer",
            ExpireOfferError::NoListing(_) => "NoListing",
            ExpireOfferError::Unknown(_) => "Unknown",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ExpireOfferError::NoOffer(_) | ExpireOfferError::NoListing(_) => {
                StatusCode::NOT_FOUND
            }
            ExpireOfferError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Application withdrawal errors
#[derive(Debug, Error)]
pub enum WithdrawApplicationError {
    #[error("Applicant {0} not found")]
    ApplicantNotFound(String),

    #[error("Applicant {0} cannot be withdrawn in status {1}")]
    NotWithdrawable(String, String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ProcessError for WithdrawApplicationError {
    fn code(&self) -> &'static str {
        match self {
            WithdrawApplicationError::ApplicantNotFound(_) => "ApplicantNotFound",
            WithdrawApplicationError::NotWithdrawable(_, _) => "NotWithdrawable",
            WithdrawApplicationError::Unknown(_) => "Unknown",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            WithdrawApplicationError::ApplicantNotFound(_) => StatusCode::NOT_FOUND,
            WithdrawApplicationError::NotWithdrawable(_, _) => StatusCode::BAD_REQUEST,
            WithdrawApplicationError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Apply(#[from] ApplyError),

    #[error(transparent)]
    CreateOffer(#[from] CreateOfferError),

    #[error(transparent)]
    AcceptOffer(#[from] AcceptOfferError),

    #[error(transparent)]
    DenyOffer(#[from] DenyOfferError),

    #[error(transparent)]
    ExpireOffer(#[from] ExpireOfferError),

    #[error(transparent)]
    WithdrawApplication(#[from] WithdrawApplicationError),

    #[error("Invalid request: {0}")]
    BadRequest(String),
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Apply(e) => (e.status(), e.code()),
            AppError::CreateOffer(e) => (e.status(), e.code()),
            AppError::AcceptOffer(e) => (e.status(), e.code()),
            AppError::DenyOffer(e) => (e.status(), e.code()),
            AppError::ExpireOffer(e) => (e.status(), e.code()),
            AppError::WithdrawApplication(e) => (e.status(), e.code()),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BadRequest"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();

        if status.is_server_error() {
            tracing::error!(code, "{}", self);
        }

        let body = Json(ErrorResponse {
            error: code.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}
