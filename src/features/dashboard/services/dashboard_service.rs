use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use crate::core::error::{AppError, Result};
use crate::features::dashboard::dtos::*;

#[derive(FromRow)]
struct ReportCounts {
    total_reports: i64,
    pending_count: i64,
    in_progress_count: i64,
    resolved_count: i64,
    closed_count: i64,
    geolocated_count: i64,
    reports_this_week: i64,
}

#[derive(FromRow)]
struct ContributionTotals {
    contribution_count: i64,
    contribution_total: Decimal,
    verified_contribution_total: Decimal,
}

/// Service for contractor dashboard queries
pub struct DashboardService {
    pool: PgPool,
}

impl DashboardService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ========================================================================
    // Summary
    // ========================================================================

    /// Status counts and contribution totals
    pub async fn get_summary(&self) -> Result<DashboardSummaryDto> {
        let counts = sqlx::query_as::<_, ReportCounts>(
            r#"
            SELECT
                COUNT(*) AS total_reports,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending_count,
                COUNT(*) FILTER (WHERE status = 'in_progress') AS in_progress_count,
                COUNT(*) FILTER (WHERE status = 'resolved') AS resolved_count,
                COUNT(*) FILTER (WHERE status = 'closed') AS closed_count,
                COUNT(*) FILTER (WHERE latitude IS NOT NULL) AS geolocated_count,
                COUNT(*) FILTER (WHERE created_at >= date_trunc('week', CURRENT_DATE)) AS reports_this_week
            FROM reports
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get summary counts: {:?}", e);
            AppError::FetchFailed(e)
        })?;

        let totals = sqlx::query_as::<_, ContributionTotals>(
            r#"
            SELECT
                COUNT(*) AS contribution_count,
                COALESCE(SUM(amount), 0) AS contribution_total,
                COALESCE(SUM(amount) FILTER (WHERE verified), 0) AS verified_contribution_total
            FROM contributions
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get contribution totals: {:?}", e);
            AppError::FetchFailed(e)
        })?;

        Ok(DashboardSummaryDto {
            total_reports: counts.total_reports,
            pending_count: counts.pending_count,
            in_progress_count: counts.in_progress_count,
            resolved_count: counts.resolved_count,
            closed_count: counts.closed_count,
            geolocated_count: counts.geolocated_count,
            reports_this_week: counts.reports_this_week,
            contribution_count: totals.contribution_count,
            contribution_total: totals.contribution_total,
            verified_contribution_total: totals.verified_contribution_total,
        })
    }

    // ========================================================================
    // List Reports (paginated)
    // ========================================================================

    /// Reports with contribution totals, newest first.
    /// Returns (reports, total_count)
    pub async fn list_reports(
        &self,
        query: &DashboardReportsQuery,
    ) -> Result<(Vec<DashboardReportDto>, i64)> {
        let pagination = query.pagination();

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reports WHERE ($1::report_status IS NULL OR status = $1)",
        )
        .bind(query.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count reports: {:?}", e);
            AppError::FetchFailed(e)
        })?;

        let reports = sqlx::query_as::<_, DashboardReportDto>(
            r#"
            SELECT
                r.id, r.profile_id, r.location, r.address, r.latitude, r.longitude, r.status,
                COALESCE(cardinality(r.photo_urls), 0) AS photo_count,
                COUNT(c.id) AS contribution_count,
                COALESCE(SUM(c.amount), 0) AS contribution_total,
                r.created_at
            FROM reports r
            LEFT JOIN contributions c ON c.report_id = r.id
            WHERE ($1::report_status IS NULL OR r.status = $1)
            GROUP BY r.id
            ORDER BY r.created_at DESC, r.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(query.status)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list dashboard reports: {:?}", e);
            AppError::FetchFailed(e)
        })?;

        Ok((reports, total))
    }
}
