use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::contributions::models::{Contribution, CreateContribution};

/// Service for contributions toward reports
pub struct ContributionService {
    pool: PgPool,
}

impl ContributionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record an unverified contribution; the report must exist
    pub async fn record(&self, data: &CreateContribution) -> Result<Contribution> {
        let contribution = sqlx::query_as::<_, Contribution>(
            r#"
            INSERT INTO contributions (id, report_id, amount, contributor_name, verified, transacted_at)
            SELECT $1, $2, $3, $4, FALSE, $5
            WHERE EXISTS (SELECT 1 FROM reports WHERE id = $2)
            RETURNING id, report_id, amount, contributor_name, verified, transacted_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(data.report_id)
        .bind(data.amount)
        .bind(&data.contributor_name)
        .bind(data.transacted_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to record contribution: {:?}", e);
            AppError::FetchFailed(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Report {} not found", data.report_id)))?;

        tracing::info!(
            "Recorded contribution {} of {} for report {}",
            contribution.id,
            contribution.amount,
            contribution.report_id
        );

        Ok(contribution)
    }

    /// Contributions for a report, most recent first
    pub async fn list_for_report(&self, report_id: Uuid) -> Result<Vec<Contribution>> {
        let report_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM reports WHERE id = $1)")
                .bind(report_id)
                .fetch_one(&self.pool)
                .await?;

        if !report_exists {
            return Err(AppError::NotFound(format!("Report {} not found", report_id)));
        }

        let contributions = sqlx::query_as::<_, Contribution>(
            r#"
            SELECT id, report_id, amount, contributor_name, verified, transacted_at
            FROM contributions
            WHERE report_id = $1
            ORDER BY transacted_at DESC, id DESC
            "#,
        )
        .bind(report_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(contributions)
    }
}
