use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use tracing::debug;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppQuery;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::dtos::{
    ListReportsQuery, ReportResponseDto, ReportSubmissionForm, SearchReportsQuery,
    SubmitReportDto,
};
use crate::features::reports::services::{PhotoUpload, ReportService, ReportSubmissionService};
use crate::shared::types::{ApiResponse, Meta};

/// State for report handlers
#[derive(Clone)]
pub struct ReportState {
    pub report_service: Arc<ReportService>,
    pub submission_service: Arc<ReportSubmissionService>,
}

/// Submit a new report
///
/// Accepts multipart/form-data with:
/// - `location`, `description`: required text
/// - `latitude`, `longitude`: optional, both or neither
/// - `address`: optional
/// - `photos`: zero or more image files
#[utoipa::path(
    post,
    path = "/api/reports",
    tag = "reports",
    request_body(
        content = SubmitReportDto,
        content_type = "multipart/form-data",
        description = "Report fields and photo files",
    ),
    responses(
        (status = 201, description = "Report submitted", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Missing field, malformed coordinate or invalid photo"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Only citizens submit reports"),
        (status = 404, description = "Profile missing"),
        (status = 502, description = "Photo upload failed, nothing was saved")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_report(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    let mut form = ReportSubmissionForm::default();
    let mut photos = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "photos" | "photos[]" | "photo" => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let file_name = field.file_name().map(|s| s.to_string());
                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read photo bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read photo data: {}", e))
                })?;

                photos.push(PhotoUpload {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                });
            }
            "location" | "description" | "latitude" | "longitude" | "address" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read {} field: {}", field_name, e))
                })?;
                let slot = match field_name.as_str() {
                    "location" => &mut form.location,
                    "description" => &mut form.description,
                    "latitude" => &mut form.latitude,
                    "longitude" => &mut form.longitude,
                    _ => &mut form.address,
                };
                *slot = Some(text);
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let draft = form.into_draft()?;
    let report = state.submission_service.submit(&user, draft, photos).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(report.into()),
            Some("Report submitted successfully".to_string()),
            None,
        )),
    ))
}

/// List reports, newest first
#[utoipa::path(
    get,
    path = "/api/reports",
    params(ListReportsQuery),
    responses(
        (status = 200, description = "Reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 400, description = "Invalid filter"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_reports(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    AppQuery(query): AppQuery<ListReportsQuery>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let filter = query.into_filter(user.profile_id())?;
    let reports = state.report_service.list(&filter).await?;
    let total = reports.len() as i64;
    let dtos: Vec<ReportResponseDto> = reports.into_iter().map(|r| r.into()).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Search reports by location label or address
#[utoipa::path(
    get,
    path = "/api/reports/search",
    params(SearchReportsQuery),
    responses(
        (status = 200, description = "Matching reports, newest first", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 400, description = "Missing search text"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn search_reports(
    _user: AuthenticatedUser,
    State(state): State<ReportState>,
    AppQuery(query): AppQuery<SearchReportsQuery>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let (text, filter) = query.into_parts()?;
    let reports = state.report_service.search(&text, &filter).await?;
    let total = reports.len() as i64;
    let dtos: Vec<ReportResponseDto> = reports.into_iter().map(|r| r.into()).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Get report by ID
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(("id" = Uuid, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn get_report(
    _user: AuthenticatedUser,
    State(state): State<ReportState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = state.report_service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}
