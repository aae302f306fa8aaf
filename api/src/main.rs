//! Parking Allocation API Server
//!
//! Runs the internal parking-space allocation workflow: application intake,
//! offer generation and offer responses. Persistence, email and invoicing live
//! in remote services reached through port traits (hexagonal architecture).

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{CommunicationClientImpl, EconomyClientImpl, LeasingClientImpl};
use app::{
    AllocationSettings, ApplicationService, OfferResponseService, OfferService,
    RoleNotificationSubscriber, TraceSubscriber, ROLE_DEV,
};
use config::Config;
use domain::ports::{CommunicationClient, EconomyClient, LeasingClient};

/// Application state shared across all handlers
pub struct AppState<LC, EC, CC>
where
    LC: LeasingClient,
    EC: EconomyClient,
    CC: CommunicationClient,
{
    pub applications: Arc<ApplicationService<LC, EC, CC>>,
    pub offers: Arc<OfferService<LC, CC>>,
    pub responses: Arc<OfferResponseService<LC, CC>>,
}

// Derive would require the clients themselves to be Clone
impl<LC, EC, CC> Clone for AppState<LC, EC, CC>
where
    LC: LeasingClient,
    EC: EconomyClient,
    CC: CommunicationClient,
{
    fn clone(&self) -> Self {
        Self {
            applications: self.applications.clone(),
            offers: self.offers.clone(),
            responses: self.responses.clone(),
        }
    }
}

impl<LC, EC, CC> AppState<LC, EC, CC>
where
    LC: LeasingClient + 'static,
    EC: EconomyClient + 'static,
    CC: CommunicationClient + 'static,
{
    /// Wire the services. Internal failures are reported to the dev role.
    pub fn new(
        leasing: Arc<LC>,
        economy: Arc<EC>,
        communication: Arc<CC>,
        settings: AllocationSettings,
    ) -> Self {
        let reporter: Arc<dyn TraceSubscriber> = Arc::new(RoleNotificationSubscriber::new(
            communication.clone(),
            ROLE_DEV,
        ));

        let offers = Arc::new(OfferService::new(
            leasing.clone(),
            communication.clone(),
            reporter.clone(),
            settings.clone(),
        ));

        let responses = Arc::new(OfferResponseService::new(
            leasing.clone(),
            communication.clone(),
            offers.clone(),
            reporter.clone(),
            settings.clone(),
        ));

        let applications = Arc::new(ApplicationService::new(
            leasing,
            economy,
            communication,
            responses.clone(),
            reporter,
            settings,
        ));

        Self {
            applications,
            offers,
            responses,
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn build_router<LC, EC, CC>(state: AppState<LC, EC, CC>) -> Router
where
    LC: LeasingClient + 'static,
    EC: EconomyClient + 'static,
    CC: CommunicationClient + 'static,
{
    Router::new()
        // Health check
        .route("/health", get(health))
        // Application intake
        .route(
            "/parking-spaces/:rental_object_code/applications",
            post(handlers::apply_for_parking_space::<LC, EC, CC>),
        )
        .route(
            "/applicants/:id/withdraw",
            post(handlers::withdraw_application::<LC, EC, CC>),
        )
        // Offer generation
        .route(
            "/listings/:id/offers",
            post(handlers::create_offer::<LC, EC, CC>),
        )
        // Offer responses
        .route(
            "/offers/:id/accept",
            post(handlers::accept_offer::<LC, EC, CC>),
        )
        .route("/offers/:id/deny", post(handlers::deny_offer::<LC, EC, CC>))
        .route(
            "/offers/:id/expire",
            get(handlers::expire_offer::<LC, EC, CC>),
        )
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,parking_allocation_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting parking allocation API...");

    let config = Config::from_env()?;

    // Create adapters
    let leasing = Arc::new(LeasingClientImpl::new(config.leasing_service_url.clone()));
    let economy = Arc::new(EconomyClientImpl::new(config.economy_service_url.clone()));
    let communication = Arc::new(CommunicationClientImpl::new(
        config.communication_service_url.clone(),
    ));
    tracing::info!(
        leasing = %config.leasing_service_url,
        economy = %config.economy_service_url,
        communication = %config.communication_service_url,
        timezone = %config.allocation.timezone,
        "Adapters configured"
    );

    let state = AppState::new(leasing, economy, communication, config.allocation.clone());
    let app = build_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
