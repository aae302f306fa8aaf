//! Process outcomes
//!
//! A workflow either fails with its stage error (the primary failure) or
//! returns a `ProcessOutcome`: the primary value plus the advisory failures of
//! detached side effects (notifications, waiting-list resets, cascade
//! denials, offer regeneration). Advisory failures never turn a completed
//! process into a failed one.

use serde::Serialize;

use super::trace::WorkflowTrace;
use crate::domain::entities::{ListingId, OfferId};

/// Side effects that run detached from the primary operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "camelCase")]
pub enum SideEffect {
    OfferEmail,
    AcceptOfferEmail,
    RoleNotification,
    WaitingListReset,
    CascadeLookup,
    #[serde(rename_all = "camelCase")]
    CascadeDeny {
        offer_id: OfferId,
    },
    #[serde(rename_all = "camelCase")]
    OfferRegeneration {
        listing_id: ListingId,
    },
}

impl std::fmt::Display for SideEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SideEffect::OfferEmail => write!(f, "offer email"),
            SideEffect::AcceptOfferEmail => write!(f, "accept offer email"),
            SideEffect::RoleNotification => write!(f, "role notification"),
            SideEffect::WaitingListReset => write!(f, "waiting list reset"),
            SideEffect::CascadeLookup => write!(f, "sibling offer lookup"),
            SideEffect::CascadeDeny { offer_id } => write!(f, "cascade deny of offer {}", offer_id),
            SideEffect::OfferRegeneration { listing_id } => {
                write!(f, "offer regeneration for listing {}", listing_id)
            }
        }
    }
}

/// A secondary failure that was recorded but not propagated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Advisory {
    #[serde(flatten)]
    pub effect: SideEffect,
    pub reason: String,
}

/// Primary result of a process plus its advisory failures
#[derive(Debug, Clone)]
pub struct ProcessOutcome<T> {
    pub value: T,
    pub advisories: Vec<Advisory>,
}

impl<T> ProcessOutcome<T> {
    pub fn new(value: T, advisories: Vec<Advisory>) -> Self {
        Self { value, advisories }
    }

    pub fn is_clean(&self) -> bool {
        self.advisories.is_empty()
    }
}

/// Collects the outcomes of detached side effects for one process
#[derive(Debug, Default)]
pub struct DetachedEffects {
    advisories: Vec<Advisory>,
}

impl DetachedEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a side effect's result. Failures become advisories and a
    /// warning on the trace; the value is returned on success.
    pub fn settle<T, E>(
        &mut self,
        trace: &mut WorkflowTrace,
        effect: SideEffect,
        result: Result<T, E>,
    ) -> Option<T>
    where
        E: std::fmt::Display,
    {
        match result {
            Ok(value) => {
                trace.info(format!("{} completed", effect));
                Some(value)
            }
            Err(e) => {
                trace.warn(format!("{} failed: {}", effect, e));
                self.advisories.push(Advisory {
                    effect,
                    reason: e.to_string(),
                });
                None
            }
        }
    }

    /// Fold in advisories produced by a nested process
    pub fn absorb(&mut self, advisories: Vec<Advisory>) {
        self.advisories.extend(advisories);
    }

    pub fn finish<T>(self, value: T) -> ProcessOutcome<T> {
        ProcessOutcome::new(value, self.advisories)
    }
}
