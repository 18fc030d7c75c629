use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::model::AuthenticatedUser;

/// DTO for /api/auth/me response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponseDto {
    pub sub: String,
    pub session_id: Option<String>,
    pub email: Option<String>,
}

impl From<AuthenticatedUser> for MeResponseDto {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            sub: user.sub,
            session_id: user.session_id,
            email: user.email,
        }
    }
}

/// DTO for /api/auth/sign-out response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SignOutResponseDto {
    /// Whether a cached profile was cleared
    pub cache_cleared: bool,
}
