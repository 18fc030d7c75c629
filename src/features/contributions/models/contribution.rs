use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a contribution toward a report
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Contribution {
    pub id: Uuid,
    pub report_id: Uuid,
    pub amount: Decimal,
    pub contributor_name: String,
    pub verified: bool,
    pub transacted_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateContribution {
    pub report_id: Uuid,
    pub amount: Decimal,
    pub contributor_name: String,
    pub transacted_at: DateTime<Utc>,
}

/// Totals over a report's contributions
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContributionSummary {
    pub count: i64,
    pub total_amount: Decimal,
    pub verified_amount: Decimal,
}

impl ContributionSummary {
    pub fn of(contributions: &[Contribution]) -> Self {
        contributions
            .iter()
            .fold(Self::default(), |mut summary, c| {
                summary.count += 1;
                summary.total_amount += c.amount;
                if c.verified {
                    summary.verified_amount += c.amount;
                }
                summary
            })
    }
}
