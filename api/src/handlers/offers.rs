//! Offer handlers
//!
//! Endpoints for generating offers and responding to them.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::ProcessResponse;
use crate::app::{AcceptedOffer, DeniedOffer, ExpiredOffer};
use crate::domain::entities::{ListingId, Offer, OfferId};
use crate::domain::ports::{CommunicationClient, EconomyClient, LeasingClient};
use crate::error::AppError;
use crate::AppState;

/// POST /listings/:id/offers
///
/// Offer the listing to the next eligible applicant.
pub async fn create_offer<LC, EC, CC>(
    State(state): State<AppState<LC, EC, CC>>,
    Path(listing_id): Path<i64>,
) -> Result<(StatusCode, Json<ProcessResponse<Offer>>), AppError>
where
    LC: LeasingClient + 'static,
    EC: EconomyClient + 'static,
    CC: CommunicationClient + 'static,
{
    let outcome = state.offers.create_offer(ListingId(listing_id)).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProcessResponse::new(outcome, "Offer created")),
    ))
}

/// POST /offers/:id/accept
pub async fn accept_offer<LC, EC, CC>(
    State(state): State<AppState<LC, EC, CC>>,
    Path(offer_id): Path<i64>,
) -> Result<(StatusCode, Json<ProcessResponse<AcceptedOffer>>), AppError>
where
    LC: LeasingClient + 'static,
    EC: EconomyClient + 'static,
    CC: CommunicationClient + 'static,
{
    let outcome = state.responses.accept(OfferId(offer_id)).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(ProcessResponse::new(outcome, "Offer accepted")),
    ))
}

/// POST /offers/:id/deny
pub async fn deny_offer<LC, EC, CC>(
    State(state): State<AppState<LC, EC, CC>>,
    Path(offer_id): Path<i64>,
) -> Result<(StatusCode, Json<ProcessResponse<DeniedOffer>>), AppError>
where
    LC: LeasingClient + 'static,
    EC: EconomyClient + 'static,
    CC: CommunicationClient + 'static,
{
    let outcome = state.responses.deny(OfferId(offer_id)).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(ProcessResponse::new(outcome, "Offer denied")),
    ))
}

/// GET /offers/:id/expire
pub async fn expire_offer<LC, EC, CC>(
    State(state): State<AppState<LC, EC, CC>>,
    Path(offer_id): Path<i64>,
) -> Result<(StatusCode, Json<ProcessResponse<ExpiredOffer>>), AppError>
where
    LC: LeasingClient + 'static,
    EC: EconomyClient + 'static,
    CC: CommunicationClient + 'static,
{
    let outcome = state.responses.expire(OfferId(offer_id)).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(ProcessResponse::new(outcome, "Offer expired")),
    ))
}
