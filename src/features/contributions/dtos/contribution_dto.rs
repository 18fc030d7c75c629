use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::contributions::models::{
    Contribution, ContributionSummary, CreateContribution,
};

/// Largest accepted single contribution
const MAX_AMOUNT: i64 = 1_000_000_000_000;

fn validate_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount <= Decimal::ZERO {
        return Err(ValidationError::new("amount_not_positive")
            .with_message("Amount must be greater than zero".into()));
    }
    if amount.normalize().scale() > 2 {
        return Err(ValidationError::new("amount_precision")
            .with_message("Amount must have at most two decimal places".into()));
    }
    if *amount >= Decimal::from(MAX_AMOUNT) {
        return Err(ValidationError::new("amount_too_large")
            .with_message("Amount is too large".into()));
    }
    Ok(())
}

/// Request DTO for recording a contribution
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateContributionDto {
    #[validate(custom(function = "validate_amount"))]
    #[schema(value_type = String, example = "150000.00")]
    pub amount: Decimal,

    /// Contributor name or account label
    #[validate(
        length(min = 1, max = 100, message = "Contributor name must be 1-100 characters"),
        regex(
            path = "*crate::shared::validation::CONTRIBUTOR_LABEL_REGEX",
            message = "Contributor name contains unsupported characters"
        )
    )]
    #[schema(example = "Warung Bu Tini")]
    pub contributor_name: String,

    /// Defaults to the time of recording
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transacted_at: Option<DateTime<Utc>>,
}

impl CreateContributionDto {
    pub fn into_create(self, report_id: Uuid) -> CreateContribution {
        CreateContribution {
            report_id,
            amount: self.amount,
            contributor_name: self.contributor_name.trim().to_string(),
            transacted_at: self.transacted_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContributionResponseDto {
    pub id: Uuid,
    pub report_id: Uuid,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub contributor_name: String,
    pub verified: bool,
    pub transacted_at: DateTime<Utc>,
}

impl From<Contribution> for ContributionResponseDto {
    fn from(c: Contribution) -> Self {
        Self {
            id: c.id,
            report_id: c.report_id,
            amount: c.amount,
            contributor_name: c.contributor_name,
            verified: c.verified,
            transacted_at: c.transacted_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContributionSummaryDto {
    pub count: i64,
    #[schema(value_type = String)]
    pub total_amount: Decimal,
    #[schema(value_type = String)]
    pub verified_amount: Decimal,
}

impl From<ContributionSummary> for ContributionSummaryDto {
    fn from(s: ContributionSummary) -> Self {
        Self {
            count: s.count,
            total_amount: s.total_amount,
            verified_amount: s.verified_amount,
        }
    }
}

/// Contributions for one report with their totals
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportContributionsDto {
    pub report_id: Uuid,
    pub summary: ContributionSummaryDto,
    pub contributions: Vec<ContributionResponseDto>,
}

impl ReportContributionsDto {
    pub fn new(report_id: Uuid, contributions: Vec<Contribution>) -> Self {
        Self {
            report_id,
            summary: ContributionSummary::of(&contributions).into(),
            contributions: contributions.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dto(amount: &str, name: &str) -> CreateContributionDto {
        CreateContributionDto {
            amount: Decimal::from_str(amount).unwrap(),
            contributor_name: name.to_string(),
            transacted_at: None,
        }
    }

    #[test]
    fn test_valid_contribution() {
        assert!(dto("150000.00", "Warung Bu Tini").validate().is_ok());
        assert!(dto("0.01", "acct#1042").validate().is_ok());
        assert!(dto("12.500", "ops@rt05").validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_and_fractional_cents() {
        for amount in ["0", "-5", "1.005"] {
            let errors = dto(amount, "Budi").validate().unwrap_err();
            assert!(errors.field_errors().contains_key("amount"), "{}", amount);
        }
    }

    #[test]
    fn test_rejects_markup_names() {
        let errors = dto("10", "<b>").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("contributor_name"));
    }

    #[test]
    fn test_amount_accepts_json_string_and_number() {
        let from_string: CreateContributionDto = serde_json::from_value(serde_json::json!({
            "amount": "25000.50",
            "contributor_name": "Budi"
        }))
        .unwrap();
        let from_number: CreateContributionDto = serde_json::from_value(serde_json::json!({
            "amount": 25000.5,
            "contributor_name": "Budi"
        }))
        .unwrap();

        assert_eq!(from_string.amount, from_number.amount);
    }
}
