//! HTTP handlers
//!
//! Axum request handlers for the allocation workflow endpoints.

pub mod applications;
pub mod offers;

use serde::Serialize;

use crate::app::{Advisory, ProcessOutcome};

pub use applications::{apply_for_parking_space, withdraw_application};
pub use offers::{accept_offer, create_offer, deny_offer, expire_offer};

/// Success body shared by every workflow endpoint
#[derive(Debug, Serialize)]
pub struct ProcessResponse<T> {
    pub content: T,
    pub message: String,
    /// Side effects that failed without failing the process
    pub advisories: Vec<Advisory>,
}

impl<T> ProcessResponse<T> {
    pub fn new(outcome: ProcessOutcome<T>, message: impl Into<String>) -> Self {
        Self {
            content: outcome.value,
            message: message.into(),
            advisories: outcome.advisories,
        }
    }
}
