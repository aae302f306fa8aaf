//! Rental-rule validator
//!
//! A contact may only rent a parking space if both the residential-area rules
//! and the property rules allow it. The two checks are independent reads, so
//! they are issued concurrently and joined before deciding.

use thiserror::Error;

use crate::domain::entities::ApplicationType;
use crate::domain::ports::LeasingClient;
use crate::error::{LeasingError, RentalRuleViolation};

#[derive(Debug, Error)]
pub enum RuleCheckFailure {
    #[error("rental rules rejected the contact: {0}")]
    Violation(RentalRuleViolation),

    #[error("rental rules could not be checked: {0}")]
    Unavailable(LeasingError),
}

impl From<LeasingError> for RuleCheckFailure {
    fn from(e: LeasingError) -> Self {
        match e {
            LeasingError::RentalRule(violation) => RuleCheckFailure::Violation(violation),
            other => RuleCheckFailure::Unavailable(other),
        }
    }
}

/// Where and what the contact wants to rent
#[derive(Debug, Clone, Copy)]
pub struct RuleCheck<'a> {
    pub contact_code: &'a str,
    pub district_code: &'a str,
    pub rental_object_code: &'a str,
    pub application_type: ApplicationType,
}

/// Run the residential-area and property validations concurrently.
///
/// When both fail, the residential-area result wins.
pub async fn validate_rental_rules<LC>(
    leasing: &LC,
    check: RuleCheck<'_>,
) -> Result<(), RuleCheckFailure>
where
    LC: LeasingClient + ?Sized,
{
    let (area, property) = tokio::join!(
        leasing.validate_residential_area_rental_rules(
            check.contact_code,
            check.district_code,
            check.application_type,
        ),
        leasing.validate_property_rental_rules(
            check.contact_code,
            check.rental_object_code,
            check.application_type,
        ),
    );

    area?;
    property?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::InMemoryLeasingClient;

    fn check<'a>(contact_code: &'a str) -> RuleCheck<'a> {
        RuleCheck {
            contact_code,
            district_code: "CEN",
            rental_object_code: "705-808-00-0006",
            application_type: ApplicationType::Additional,
        }
    }

    #[tokio::test]
    async fn passes_when_both_rules_allow() {
        let leasing = InMemoryLeasingClient::new();
        assert!(validate_rental_rules(&leasing, check("P1")).await.is_ok());
    }

    #[tokio::test]
    async fn property_violation_is_reported() {
        let leasing = InMemoryLeasingClient::new()
            .with_property_violation("P1", RentalRuleViolation::NotTenantInTheProperty);

        let result = validate_rental_rules(&leasing, check("P1")).await;
        assert!(matches!(
            result,
            Err(RuleCheckFailure::Violation(
                RentalRuleViolation::NotTenantInTheProperty
            ))
        ));
    }

    #[tokio::test]
    async fn area_violation_wins_over_property_violation() {
        let leasing = InMemoryLeasingClient::new()
            .with_area_violation("P1", RentalRuleViolation::NoContractInTheArea)
            .with_property_violation("P1", RentalRuleViolation::NotTenantInTheProperty);

        let result = validate_rental_rules(&leasing, check("P1")).await;
        assert!(matches!(
            result,
            Err(RuleCheckFailure::Violation(
                RentalRuleViolation::NoContractInTheArea
            ))
        ));
    }

    #[tokio::test]
    async fn violations_are_per_contact() {
        let leasing = InMemoryLeasingClient::new()
            .with_area_violation("P1", RentalRuleViolation::NotEligible);

        assert!(validate_rental_rules(&leasing, check("P2")).await.is_ok());
    }

    #[tokio::test]
    async fn store_failure_is_unavailable() {
        let leasing = InMemoryLeasingClient::new().failing_rule_checks();

        let result = validate_rental_rules(&leasing, check("P1")).await;
        assert!(matches!(result, Err(RuleCheckFailure::Unavailable(_))));
    }
}
