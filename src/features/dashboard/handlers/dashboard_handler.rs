use axum::{extract::State, Json};
use std::sync::Arc;

use crate::core::error::Result;
use crate::core::extractor::AppQuery;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::dashboard::dtos::*;
use crate::features::dashboard::services::DashboardService;
use crate::features::profiles::models::ProfileRole;
use crate::features::profiles::ProfileService;
use crate::shared::types::{ApiResponse, Meta};

#[derive(Clone)]
pub struct DashboardState {
    pub dashboard_service: Arc<DashboardService>,
    pub profile_service: Arc<ProfileService>,
}

// ============================================================================
// Summary
// ============================================================================

/// Get dashboard summary (contractors only)
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "dashboard",
    responses(
        (status = 200, description = "Dashboard summary", body = ApiResponse<DashboardSummaryDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Contractor profile required"),
        (status = 404, description = "Profile missing")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_summary(
    user: AuthenticatedUser,
    State(state): State<DashboardState>,
) -> Result<Json<ApiResponse<DashboardSummaryDto>>> {
    state
        .profile_service
        .require_role(&user, ProfileRole::Contractor)
        .await?;

    let summary = state.dashboard_service.get_summary().await?;
    Ok(Json(ApiResponse::success(Some(summary), None, None)))
}

// ============================================================================
// Reports List
// ============================================================================

/// List reports with contribution totals (contractors only)
#[utoipa::path(
    get,
    path = "/api/dashboard/reports",
    tag = "dashboard",
    params(DashboardReportsQuery),
    responses(
        (status = 200, description = "Paginated reports list", body = ApiResponse<Vec<DashboardReportDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Contractor profile required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_reports(
    user: AuthenticatedUser,
    State(state): State<DashboardState>,
    AppQuery(query): AppQuery<DashboardReportsQuery>,
) -> Result<Json<ApiResponse<Vec<DashboardReportDto>>>> {
    state
        .profile_service
        .require_role(&user, ProfileRole::Contractor)
        .await?;

    let (reports, total) = state.dashboard_service.list_reports(&query).await?;
    Ok(Json(ApiResponse::success(
        Some(reports),
        None,
        Some(Meta { total }),
    )))
}
