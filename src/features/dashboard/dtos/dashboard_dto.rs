use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::reports::models::ReportStatus;
use crate::shared::constants::DEFAULT_PAGE_SIZE;
use crate::shared::types::PaginationQuery;

// ============================================================================
// Summary
// ============================================================================

/// Report and contribution totals for the contractor dashboard
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummaryDto {
    pub total_reports: i64,
    pub pending_count: i64,
    pub in_progress_count: i64,
    pub resolved_count: i64,
    pub closed_count: i64,
    /// Reports carrying coordinates
    pub geolocated_count: i64,
    pub reports_this_week: i64,
    pub contribution_count: i64,
    #[schema(value_type = String)]
    pub contribution_total: Decimal,
    #[schema(value_type = String)]
    pub verified_contribution_total: Decimal,
}

// ============================================================================
// Reports List
// ============================================================================

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// Query parameters for the dashboard report list
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct DashboardReportsQuery {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Items per page (max 100)
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,

    /// Only reports in this status
    pub status: Option<ReportStatus>,
}

impl DashboardReportsQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// Report row with its contribution totals
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DashboardReportDto {
    pub id: Uuid,
    pub profile_id: String,
    pub location: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: ReportStatus,
    pub photo_count: i32,
    pub contribution_count: i64,
    #[schema(value_type = String)]
    pub contribution_total: Decimal,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults_and_clamping() {
        let query: DashboardReportsQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.pagination().limit(), DEFAULT_PAGE_SIZE);

        let query: DashboardReportsQuery =
            serde_json::from_value(serde_json::json!({ "page": 3, "page_size": 500 })).unwrap();
        assert_eq!(query.pagination().limit(), 100);
        assert_eq!(query.pagination().offset(), 200);
    }
}
