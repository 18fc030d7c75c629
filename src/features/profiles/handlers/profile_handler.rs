use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::profiles::dtos::{
    CreateProfileDto, ProfileResponseDto, ResolvedProfileDto, UpdateProfileDto,
};
use crate::features::profiles::services::ProfileService;
use crate::shared::types::ApiResponse;

/// Complete onboarding by creating the caller's profile
#[utoipa::path(
    post,
    path = "/api/profiles",
    request_body = CreateProfileDto,
    responses(
        (status = 201, description = "Profile created", body = ApiResponse<ProfileResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Profile already exists")
    ),
    tag = "profiles",
    security(("bearer_auth" = []))
)]
pub async fn create_profile(
    user: AuthenticatedUser,
    State(service): State<Arc<ProfileService>>,
    AppJson(dto): AppJson<CreateProfileDto>,
) -> Result<(StatusCode, Json<ApiResponse<ProfileResponseDto>>)> {
    dto.validate()?;

    let profile = service.create(&dto.into_create(user.profile_id())).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(profile.into()),
            Some("Profile created successfully".to_string()),
            None,
        )),
    ))
}

/// Resolve the caller's own profile
#[utoipa::path(
    get,
    path = "/api/profiles/me",
    responses(
        (status = 200, description = "Profile with the source that supplied it", body = ApiResponse<ResolvedProfileDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Profile missing, onboarding required")
    ),
    tag = "profiles",
    security(("bearer_auth" = []))
)]
pub async fn get_my_profile(
    user: AuthenticatedUser,
    State(service): State<Arc<ProfileService>>,
) -> Result<Json<ApiResponse<ResolvedProfileDto>>> {
    let resolved = service.resolve(&user).await?;
    Ok(Json(ApiResponse::success(Some(resolved.into()), None, None)))
}

/// Get a profile by id; only the caller's own profile is visible
#[utoipa::path(
    get,
    path = "/api/profiles/{id}",
    params(("id" = String, Path, description = "Profile ID (principal subject)")),
    responses(
        (status = 200, description = "Profile found", body = ApiResponse<ResolvedProfileDto>),
        (status = 401, description = "Unauthorized or session does not match profile"),
        (status = 404, description = "Profile missing")
    ),
    tag = "profiles",
    security(("bearer_auth" = []))
)]
pub async fn get_profile(
    user: AuthenticatedUser,
    State(service): State<Arc<ProfileService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ResolvedProfileDto>>> {
    let resolved = service.get_owned(&user, &id).await?;
    Ok(Json(ApiResponse::success(Some(resolved.into()), None, None)))
}

/// Update the caller's profile
#[utoipa::path(
    put,
    path = "/api/profiles/{id}",
    params(("id" = String, Path, description = "Profile ID (principal subject)")),
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<ProfileResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized or session does not match profile"),
        (status = 404, description = "Profile missing")
    ),
    tag = "profiles",
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    user: AuthenticatedUser,
    State(service): State<Arc<ProfileService>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<UpdateProfileDto>,
) -> Result<Json<ApiResponse<ProfileResponseDto>>> {
    dto.validate()?;

    let profile = service.update(&user, &id, &dto.into()).await?;
    Ok(Json(ApiResponse::success(
        Some(profile.into()),
        Some("Profile updated successfully".to_string()),
        None,
    )))
}
