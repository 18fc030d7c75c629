use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::profiles::handlers;
use crate::features::profiles::services::ProfileService;

/// Profile routes (require auth middleware to be applied by caller)
pub fn routes(service: Arc<ProfileService>) -> Router {
    Router::new()
        .route("/api/profiles", post(handlers::create_profile))
        .route("/api/profiles/me", get(handlers::get_my_profile))
        .route(
            "/api/profiles/{id}",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::profiles::models::{fixtures::profile, ProfileRole};
    use crate::features::profiles::services::ProfileCache;
    use crate::shared::test_helpers::{lazy_pool, test_user, with_user};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::time::Duration;

    async fn server(principal: &str, cached: Option<ProfileRole>) -> TestServer {
        let cache = Arc::new(ProfileCache::new(Duration::from_secs(60)));
        if let Some(role) = cached {
            cache.put(profile(principal, role)).await;
        }
        let service = Arc::new(ProfileService::new(lazy_pool(), cache));
        TestServer::new(with_user(routes(service), test_user(principal))).unwrap()
    }

    #[tokio::test]
    async fn test_me_served_from_session() {
        let server = server("citizen-1", Some(ProfileRole::Citizen)).await;

        let response = server.get("/api/profiles/me").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["source"], "session");
        assert_eq!(body["data"]["profile"]["role"], "citizen");
    }

    #[tokio::test]
    async fn test_foreign_profile_is_mismatch() {
        let server = server("citizen-1", Some(ProfileRole::Citizen)).await;

        let response = server.get("/api/profiles/someone-else").await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_create_validates_before_store() {
        let server = server("citizen-1", None).await;

        let response = server
            .post("/api/profiles")
            .json(&json!({ "display_name": "<b>", "role": "citizen", "age": 5 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["errors"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_update_foreign_profile_is_mismatch() {
        let server = server("citizen-1", None).await;

        let response = server
            .put("/api/profiles/citizen-2")
            .json(&json!({ "profession": "Driver" }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}
