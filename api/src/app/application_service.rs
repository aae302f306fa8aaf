//! Application intake
//!
//! Records a tenant's interest in a scored parking space after checking that
//! the listing is internal, the contact is a tenant, the rental rules allow
//! the application and the contact passes the internal credit check.
//! Repeated applications are idempotent and withdrawn applications are
//! reactivated rather than duplicated.
//!
//! Also handles withdrawal of an application by the tenant or a manager.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;

use super::allocation_config::{AllocationSettings, ROLE_LEASING};
use super::calendar::credit_check_since;
use super::credit_check::{check_credit, CreditCheckOutcome};
use super::offer_response_service::OfferResponseService;
use super::outcome::{DetachedEffects, ProcessOutcome, SideEffect};
use super::rental_rules::{validate_rental_rules, RuleCheck, RuleCheckFailure};
use super::trace::{report_failure, TraceSubscriber, WorkflowTrace};
use crate::domain::entities::{
    tenancy_leases, Applicant, ApplicantId, ApplicantStatus, ApplicationType, NewApplicant,
    WaitingListType,
};
use crate::domain::ports::{CommunicationClient, EconomyClient, LeasingClient};
use crate::error::{ApplyError, LeasingError, ProcessError, WithdrawApplicationError};

/// How an application request was recorded
#[derive(Debug, Clone)]
pub enum ApplicationOutcome {
    /// A new applicant row was created
    Created(Applicant),
    /// The contact already has a pending application. `None` when the store
    /// reported a concurrent duplicate.
    AlreadyApplied(Option<Applicant>),
    /// A withdrawn application was made active again
    Reactivated(Applicant),
}

impl ApplicationOutcome {
    pub fn applicant(&self) -> Option<&Applicant> {
        match self {
            ApplicationOutcome::Created(a) | ApplicationOutcome::Reactivated(a) => Some(a),
            ApplicationOutcome::AlreadyApplied(a) => a.as_ref(),
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, ApplicationOutcome::Created(_))
    }

    pub fn message(&self) -> &'static str {
        match self {
            ApplicationOutcome::Created(_) => "Application created",
            ApplicationOutcome::AlreadyApplied(_) => {
                "Applicant already has an application for this listing"
            }
            ApplicationOutcome::Reactivated(_) => "Application reactivated",
        }
    }
}

/// Who withdrew an application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawnBy {
    User,
    Manager,
}

impl WithdrawnBy {
    pub fn status(&self) -> ApplicantStatus {
        match self {
            WithdrawnBy::User => ApplicantStatus::WithdrawnByUser,
            WithdrawnBy::Manager => ApplicantStatus::WithdrawnByManager,
        }
    }
}

pub struct ApplicationService<LC, EC, CC>
where
    LC: LeasingClient,
    EC: EconomyClient,
    CC: CommunicationClient,
{
    leasing: Arc<LC>,
    economy: Arc<EC>,
    communication: Arc<CC>,
    responses: Arc<OfferResponseService<LC, CC>>,
    reporter: Arc<dyn TraceSubscriber>,
    settings: AllocationSettings,
}

fn internal(e: impl std::fmt::Display) -> ApplyError {
    ApplyError::InternalError(e.to_string())
}

impl<LC, EC, CC> ApplicationService<LC, EC, CC>
where
    LC: LeasingClient,
    EC: EconomyClient,
    CC: CommunicationClient,
{
    pub fn new(
        leasing: Arc<LC>,
        economy: Arc<EC>,
        communication: Arc<CC>,
        responses: Arc<OfferResponseService<LC, CC>>,
        reporter: Arc<dyn TraceSubscriber>,
        settings: AllocationSettings,
    ) -> Self {
        Self {
            leasing,
            economy,
            communication,
            responses,
            reporter,
            settings,
        }
    }

    /// Apply for the active listing of a parking space
    pub async fn apply(
        &self,
        rental_object_code: &str,
        contact_code: &str,
        application_type: ApplicationType,
    ) -> Result<ProcessOutcome<ApplicationOutcome>, ApplyError> {
        let mut trace = WorkflowTrace::new("apply-for-listing");
        trace.info(format!(
            "{} applies for {} ({})",
            contact_code, rental_object_code, application_type
        ));

        let result = self
            .run_apply(&mut trace, rental_object_code, contact_code, application_type)
            .await;

        if let Err(e) = &result {
            trace.error(format!("Application failed: {} ({})", e, e.code()));
            if e.is_internal() {
                report_failure(self.reporter.as_ref(), &trace, &e.to_string()).await;
            }
        }

        result
    }

    async fn run_apply(
        &self,
        trace: &mut WorkflowTrace,
        rental_object_code: &str,
        contact_code: &str,
        application_type: ApplicationType,
    ) -> Result<ProcessOutcome<ApplicationOutcome>, ApplyError> {
        let not_found = || ApplyError::ParkingspaceNotFound(rental_object_code.to_string());

        let listing = self
            .leasing
            .get_active_listing_by_rental_object_code(rental_object_code)
            .await
            .map_err(internal)?
            .ok_or_else(not_found)?;
        let parking_space = self
            .leasing
            .get_parking_space_by_code(rental_object_code)
            .await
            .map_err(internal)?
            .ok_or_else(not_found)?;
        let district_code = parking_space
            .residential_area_code
            .clone()
            .ok_or_else(not_found)?;
        trace.info(format!(
            "Listing {} in {} ({:?})",
            listing.id, district_code, listing.rental_rule
        ));

        if !listing.is_scored() {
            return Err(ApplyError::ParkingspaceNotInternal(
                rental_object_code.to_string(),
            ));
        }

        let contact = self
            .leasing
            .get_contact_by_contact_code(contact_code)
            .await
            .map_err(internal)?
            .ok_or_else(|| ApplyError::ApplicantNotFound(contact_code.to_string()))?;

        let leases = self
            .leasing
            .get_leases_by_contact_code(contact_code)
            .await
            .map_err(internal)?;
        let tenancies = tenancy_leases(leases);
        if tenancies.is_empty() {
            return Err(ApplyError::ApplicantNotTenant(contact_code.to_string()));
        }
        trace.info(format!("{} holds {} tenancy leases", contact_code, tenancies.len()));

        let check = RuleCheck {
            contact_code,
            district_code: &district_code,
            rental_object_code,
            application_type,
        };
        match validate_rental_rules(self.leasing.as_ref(), check).await {
            Ok(()) => trace.info("Rental rules passed"),
            Err(RuleCheckFailure::Violation(violation)) => {
                return Err(ApplyError::RentalRule(violation))
            }
            Err(RuleCheckFailure::Unavailable(e)) => return Err(internal(e)),
        }

        let since = credit_check_since(
            Utc::now(),
            self.settings.timezone,
            self.settings.credit_check_months,
        );
        match check_credit(self.economy.as_ref(), contact_code, since)
            .await
            .map_err(internal)?
        {
            CreditCheckOutcome::Passed => trace.info(format!("Credit check passed since {}", since)),
            CreditCheckOutcome::Failed { unpaid } => {
                trace.warn(format!(
                    "{} has {} unpaid invoices at debt collection since {}",
                    contact_code,
                    unpaid.len(),
                    since
                ));
                self.notify_credit_check_failure(trace, contact_code, rental_object_code)
                    .await;
                return Err(ApplyError::InternalCreditCheckFailed(
                    contact_code.to_string(),
                ));
            }
        }

        if !contact.is_in_waiting_list(WaitingListType::ParkingSpace) {
            self.leasing
                .add_applicant_to_waiting_list(contact_code, WaitingListType::ParkingSpace)
                .await
                .map_err(internal)?;
            trace.info(format!("{} added to the parking space waiting list", contact_code));
        }

        let existing = self
            .leasing
            .get_applicant_by_contact_code_and_listing_id(contact_code, listing.id)
            .await
            .map_err(internal)?;

        let outcome = match existing {
            None => {
                let new_applicant = NewApplicant {
                    listing_id: listing.id,
                    contact_code: contact_code.to_string(),
                    name: contact.full_name(),
                    application_date: Utc::now(),
                    application_type,
                    status: ApplicantStatus::Active,
                };
                match self.leasing.apply_for_listing(&new_applicant).await {
                    Ok(applicant) => ApplicationOutcome::Created(applicant),
                    Err(LeasingError::Conflict(reason)) => {
                        trace.info(format!("Concurrent application detected: {}", reason));
                        ApplicationOutcome::AlreadyApplied(None)
                    }
                    Err(e) => return Err(internal(e)),
                }
            }
            Some(mut applicant) if applicant.status.is_withdrawn() => {
                self.leasing
                    .set_applicant_status_active(applicant.id, contact_code, application_type)
                    .await
                    .map_err(internal)?;
                applicant.status = ApplicantStatus::Active;
                applicant.application_type = application_type;
                ApplicationOutcome::Reactivated(applicant)
            }
            Some(applicant) => ApplicationOutcome::AlreadyApplied(Some(applicant)),
        };
        trace.info(outcome.message());

        Ok(ProcessOutcome::new(outcome, Vec::new()))
    }

    /// Ask the leasing role to review a failed credit check. Delivery is
    /// best-effort; the application fails either way.
    async fn notify_credit_check_failure(
        &self,
        trace: &mut WorkflowTrace,
        contact_code: &str,
        rental_object_code: &str,
    ) {
        let subject = "Internal credit check failed";
        let message = format!(
            "{} applied for parking space {} but has unpaid invoices at debt collection. \
             Manual review needed.",
            contact_code, rental_object_code
        );
        let result = self
            .communication
            .send_notification_to_role(ROLE_LEASING, subject, &message)
            .await;
        DetachedEffects::new().settle(trace, SideEffect::RoleNotification, result);
    }

    // =========================================================================
    // Withdraw
    // =========================================================================

    pub async fn withdraw(
        &self,
        applicant_id: ApplicantId,
        withdrawn_by: WithdrawnBy,
    ) -> Result<ProcessOutcome<Applicant>, WithdrawApplicationError> {
        let mut trace = WorkflowTrace::new("withdraw-application");
        trace.info(format!("Withdrawing applicant {}", applicant_id));

        let result = self.run_withdraw(&mut trace, applicant_id, withdrawn_by).await;

        if let Err(e) = &result {
            trace.error(format!("Withdrawal failed: {} ({})", e, e.code()));
            if e.is_internal() {
                report_failure(self.reporter.as_ref(), &trace, &e.to_string()).await;
            }
        }

        result
    }

    async fn run_withdraw(
        &self,
        trace: &mut WorkflowTrace,
        applicant_id: ApplicantId,
        withdrawn_by: WithdrawnBy,
    ) -> Result<ProcessOutcome<Applicant>, WithdrawApplicationError> {
        let unknown = |e: LeasingError| WithdrawApplicationError::Unknown(e.to_string());

        let mut applicant = self
            .leasing
            .get_applicant_by_id(applicant_id)
            .await
            .map_err(unknown)?
            .ok_or_else(|| WithdrawApplicationError::ApplicantNotFound(applicant_id.to_string()))?;

        if !applicant.status.is_pending() {
            return Err(WithdrawApplicationError::NotWithdrawable(
                applicant_id.to_string(),
                applicant.status.to_string(),
            ));
        }

        let mut effects = DetachedEffects::new();
        if applicant.status == ApplicantStatus::Offered {
            let lookup = self
                .leasing
                .get_offers_for_contact(&applicant.contact_code)
                .await;
            let active = effects
                .settle(trace, SideEffect::CascadeLookup, lookup)
                .and_then(|offers| {
                    offers
                        .into_iter()
                        .find(|o| o.is_active() && o.listing_id == applicant.listing_id)
                });

            if let Some(offer) = active {
                trace.info(format!("Denying offer {} held by the applicant", offer.id));
                let denied = self.responses.deny(offer.id).await;
                if let Some(outcome) = effects.settle(
                    trace,
                    SideEffect::CascadeDeny { offer_id: offer.id },
                    denied,
                ) {
                    effects.absorb(outcome.advisories);
                }
            }
        }

        let status = withdrawn_by.status();
        self.leasing
            .update_applicant_status(applicant.id, &applicant.contact_code, status)
            .await
            .map_err(unknown)?;
        applicant.status = status;
        trace.info(format!("Applicant {} is now {}", applicant.id, status));

        Ok(effects.finish(applicant))
    }
}
