//! Application handlers
//!
//! Endpoints for applying for a parking space and withdrawing an application.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::ProcessResponse;
use crate::app::WithdrawnBy;
use crate::domain::entities::{Applicant, ApplicantId, ApplicationType};
use crate::domain::ports::{CommunicationClient, EconomyClient, LeasingClient};
use crate::error::AppError;
use crate::AppState;

/// Request to apply for a parking space
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub contact_code: String,
    /// `Replace` or `Additional`, case-insensitive
    pub application_type: String,
}

/// Request to withdraw an application
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawRequest {
    pub withdrawn_by: WithdrawnBy,
}

/// POST /parking-spaces/:rental_object_code/applications
///
/// Apply for the active listing of a parking space. Returns 201 when a new
/// application was recorded and 200 when an existing one was reused.
pub async fn apply_for_parking_space<LC, EC, CC>(
    State(state): State<AppState<LC, EC, CC>>,
    Path(rental_object_code): Path<String>,
    Json(request): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<ProcessResponse<Option<Applicant>>>), AppError>
where
    LC: LeasingClient + 'static,
    EC: EconomyClient + 'static,
    CC: CommunicationClient + 'static,
{
    if request.contact_code.trim().is_empty() {
        return Err(AppError::BadRequest("contactCode is required".to_string()));
    }
    let application_type: ApplicationType = request
        .application_type
        .parse()
        .map_err(AppError::BadRequest)?;

    let outcome = state
        .applications
        .apply(&rental_object_code, &request.contact_code, application_type)
        .await?;

    let status = if outcome.value.is_new() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    let message = outcome.value.message();
    let applicant = outcome.value.applicant().cloned();

    Ok((
        status,
        Json(ProcessResponse {
            content: applicant,
            message: message.to_string(),
            advisories: outcome.advisories,
        }),
    ))
}

/// POST /applicants/:id/withdraw
pub async fn withdraw_application<LC, EC, CC>(
    State(state): State<AppState<LC, EC, CC>>,
    Path(applicant_id): Path<i64>,
    Json(request): Json<WithdrawRequest>,
) -> Result<Json<ProcessResponse<Applicant>>, AppError>
where
    LC: LeasingClient + 'static,
    EC: EconomyClient + 'static,
    CC: CommunicationClient + 'static,
{
    let outcome = state
        .applications
        .withdraw(ApplicantId(applicant_id), request.withdrawn_by)
        .await?;

    Ok(Json(ProcessResponse::new(outcome, "Application withdrawn")))
}
