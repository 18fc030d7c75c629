use crate::core::error::Result;
use crate::features::auth::dto::{MeResponseDto, SignOutResponseDto};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::profiles::ProfileService;
use crate::shared::types::ApiResponse;
use axum::{extract::State, Json};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current principal", body = ApiResponse<MeResponseDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(user: AuthenticatedUser) -> Result<Json<ApiResponse<MeResponseDto>>> {
    Ok(Json(ApiResponse::success(Some(user.into()), None, None)))
}

/// Clear server-side session state for the caller.
/// The token itself is revoked by the identity provider.
#[utoipa::path(
    post,
    path = "/api/auth/sign-out",
    responses(
        (status = 200, description = "Signed out", body = ApiResponse<SignOutResponseDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn sign_out(
    user: AuthenticatedUser,
    State(service): State<Arc<ProfileService>>,
) -> Result<Json<ApiResponse<SignOutResponseDto>>> {
    let cache_cleared = service.sign_out(&user).await;
    Ok(Json(ApiResponse::success(
        Some(SignOutResponseDto { cache_cleared }),
        Some("Signed out".to_string()),
        None,
    )))
}
