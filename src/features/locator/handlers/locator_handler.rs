use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::core::extractor::{AppQuery, ClientIp};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::locator::dtos::{
    LocationQuery, NearbyQuery, NearbyReportDto, NearbyResponseDto, UserLocationDto,
};
use crate::features::locator::services::ProximityService;
use crate::shared::types::{ApiResponse, Meta};

/// Resolve the caller's position
///
/// Uses the device reading sent by the client, falling back to an estimate
/// from the caller's network address.
#[utoipa::path(
    get,
    path = "/api/locations/me",
    params(LocationQuery),
    responses(
        (status = 200, description = "Caller position", body = ApiResponse<UserLocationDto>),
        (status = 400, description = "Invalid coordinates"),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "No position could be obtained; `errors` carries the cause")
    ),
    security(("bearer_auth" = [])),
    tag = "locations"
)]
pub async fn get_my_location(
    _user: AuthenticatedUser,
    State(service): State<Arc<ProximityService>>,
    ClientIp(client_ip): ClientIp,
    AppQuery(query): AppQuery<LocationQuery>,
) -> Result<Json<ApiResponse<UserLocationDto>>> {
    let device = query.reported_position()?;
    let location = service
        .locate(&device, client_ip, query.resolve_address)
        .await?;
    Ok(Json(ApiResponse::success(Some(location.into()), None, None)))
}

/// Reports near the caller, nearest first
#[utoipa::path(
    get,
    path = "/api/reports/nearby",
    params(NearbyQuery),
    responses(
        (status = 200, description = "Reports within the radius with distances", body = ApiResponse<NearbyResponseDto>),
        (status = 400, description = "Invalid radius, limit or coordinates"),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "No position could be obtained; `errors` carries the cause"),
        (status = 500, description = "Report fetch failed")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_nearby_reports(
    _user: AuthenticatedUser,
    State(service): State<Arc<ProximityService>>,
    ClientIp(client_ip): ClientIp,
    AppQuery(query): AppQuery<NearbyQuery>,
) -> Result<Json<ApiResponse<NearbyResponseDto>>> {
    let device = query.reported_position()?;
    let filter = query.filter()?;

    let (location, ranked) = service
        .nearby(
            &device,
            client_ip,
            query.radius_km,
            &filter,
            query.resolve_address,
        )
        .await?;

    let total = ranked.len() as i64;
    let dto = NearbyResponseDto {
        location: location.into(),
        radius_km: query.radius_km,
        reports: ranked.into_iter().map(NearbyReportDto::from).collect(),
    };

    Ok(Json(ApiResponse::success(
        Some(dto),
        None,
        Some(Meta { total }),
    )))
}
