use super::model::AuthenticatedUser;
use crate::core::error::AppError;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use super::jwks::JwksClient;

pub struct JwtValidator {
    jwks_client: Arc<JwksClient>,
    issuer: String,
    audience: String,
    leeway: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    sub: String,
    // Issuer, audience and expiry are checked by `Validation`
    #[serde(rename = "exp")]
    _exp: u64,
    #[serde(default, alias = "session_id")]
    sid: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            sub: claims.sub,
            session_id: claims.sid,
            email: claims.email,
        }
    }
}

impl JwtValidator {
    pub fn new(
        jwks_client: Arc<JwksClient>,
        issuer: String,
        audience: String,
        leeway: Duration,
    ) -> Self {
        Self {
            jwks_client,
            issuer,
            audience,
            leeway: leeway.as_secs(),
        }
    }

    pub async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let header = decode_header(token).map_err(|e| AppError::AuthRequired(e.to_string()))?;

        if header.alg != Algorithm::RS256 {
            return Err(AppError::AuthRequired(format!(
                "Unsupported algorithm: {:?}. Only RS256 is allowed",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| AppError::AuthRequired("Missing kid in token header".to_string()))?;

        let decoding_key = self
            .jwks_client
            .get_key(&kid)
            .await
            .map_err(|e| AppError::AuthRequired(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.leeway = self.leeway;
        validation.validate_nbf = true;

        // Expired sessions surface here and require signing in again
        let token_data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| AppError::AuthRequired(e.to_string()))?;

        if token_data.claims.sub.is_empty() {
            return Err(AppError::AuthRequired("Token has an empty subject".to_string()));
        }

        Ok(token_data.claims.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_into_user() {
        let claims: Claims = serde_json::from_value(serde_json::json!({
            "sub": "abc",
            "exp": 1_900_000_000u64,
            "session_id": "s-1",
            "email": "warga@example.com"
        }))
        .unwrap();

        let user: AuthenticatedUser = claims.into();
        assert_eq!(user.sub, "abc");
        assert_eq!(user.session_id.as_deref(), Some("s-1"));
        assert_eq!(user.email.as_deref(), Some("warga@example.com"));
    }

    #[tokio::test]
    async fn test_garbage_token_requires_auth() {
        let validator = JwtValidator::new(
            Arc::new(JwksClient::new("http://127.0.0.1:9", Duration::from_secs(60))),
            "issuer".to_string(),
            "audience".to_string(),
            Duration::from_secs(0),
        );

        let result = validator.validate_token("not-a-jwt").await;
        assert!(matches!(result, Err(AppError::AuthRequired(_))));
    }
}
