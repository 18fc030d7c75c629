use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::contributions::dtos::{
    ContributionResponseDto, CreateContributionDto, ReportContributionsDto,
};
use crate::features::contributions::services::ContributionService;
use crate::features::profiles::ProfileService;
use crate::shared::types::{ApiResponse, Meta};

#[derive(Clone)]
pub struct ContributionState {
    pub contribution_service: Arc<ContributionService>,
    pub profile_service: Arc<ProfileService>,
}

/// Record a contribution toward a report
///
/// New contributions start unverified.
#[utoipa::path(
    post,
    path = "/api/reports/{id}/contributions",
    params(("id" = Uuid, Path, description = "Report ID")),
    request_body = CreateContributionDto,
    responses(
        (status = 201, description = "Contribution recorded", body = ApiResponse<ContributionResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Report or profile not found")
    ),
    security(("bearer_auth" = [])),
    tag = "contributions"
)]
pub async fn create_contribution(
    user: AuthenticatedUser,
    State(state): State<ContributionState>,
    Path(report_id): Path<Uuid>,
    AppJson(dto): AppJson<CreateContributionDto>,
) -> Result<(StatusCode, Json<ApiResponse<ContributionResponseDto>>)> {
    dto.validate()?;
    state.profile_service.resolve(&user).await?;

    let contribution = state
        .contribution_service
        .record(&dto.into_create(report_id))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(contribution.into()),
            Some("Contribution recorded".to_string()),
            None,
        )),
    ))
}

/// List contributions for a report with totals
#[utoipa::path(
    get,
    path = "/api/reports/{id}/contributions",
    params(("id" = Uuid, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Contributions, most recent first", body = ApiResponse<ReportContributionsDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "contributions"
)]
pub async fn list_contributions(
    _user: AuthenticatedUser,
    State(state): State<ContributionState>,
    Path(report_id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReportContributionsDto>>> {
    let contributions = state
        .contribution_service
        .list_for_report(report_id)
        .await?;
    let total = contributions.len() as i64;

    Ok(Json(ApiResponse::success(
        Some(ReportContributionsDto::new(report_id, contributions)),
        None,
        Some(Meta { total }),
    )))
}
