use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Principal extracted from a validated access token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Subject claim; doubles as the profile id
    pub sub: String,
    /// Session identifier, when the identity provider issues one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl AuthenticatedUser {
    /// Profile ids are the principal's subject
    pub fn profile_id(&self) -> &str {
        &self.sub
    }

    /// Fails with `ProfileMismatch` when `profile_id` belongs to someone else
    pub fn ensure_owns(&self, profile_id: &str) -> crate::core::error::Result<()> {
        if self.sub == profile_id {
            Ok(())
        } else {
            tracing::warn!(
                "Principal {} attempted to operate on profile {}",
                self.sub,
                profile_id
            );
            Err(crate::core::error::AppError::ProfileMismatch(
                "Session does not match the requested profile".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;

    #[test]
    fn test_ensure_owns() {
        let user = AuthenticatedUser {
            sub: "user-1".to_string(),
            session_id: None,
            email: None,
        };

        assert!(user.ensure_owns("user-1").is_ok());
        assert!(matches!(
            user.ensure_owns("user-2"),
            Err(AppError::ProfileMismatch(_))
        ));
    }
}
