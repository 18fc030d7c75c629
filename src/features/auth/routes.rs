use crate::features::auth::handler;
use crate::features::profiles::ProfileService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Protected auth routes (require JWT authentication)
pub fn protected_routes(service: Arc<ProfileService>) -> Router {
    Router::new()
        .route("/api/auth/me", get(handler::get_me))
        .route("/api/auth/sign-out", post(handler::sign_out))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::profiles::models::{fixtures::profile, ProfileRole};
    use crate::features::profiles::ProfileCache;
    use crate::shared::test_helpers::{lazy_pool, test_user, with_user};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;
    use std::time::Duration;

    async fn service() -> (Arc<ProfileService>, Arc<ProfileCache>) {
        let cache = Arc::new(ProfileCache::new(Duration::from_secs(60)));
        cache.put(profile("citizen-1", ProfileRole::Citizen)).await;
        (
            Arc::new(ProfileService::new(lazy_pool(), cache.clone())),
            cache,
        )
    }

    #[tokio::test]
    async fn test_me_returns_principal() {
        let (service, _) = service().await;
        let server =
            TestServer::new(with_user(protected_routes(service), test_user("citizen-1"))).unwrap();

        let response = server.get("/api/auth/me").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["sub"], "citizen-1");
        assert_eq!(body["data"]["session_id"], "session-citizen-1");
    }

    #[tokio::test]
    async fn test_sign_out_clears_cache() {
        let (service, cache) = service().await;
        let server =
            TestServer::new(with_user(protected_routes(service), test_user("citizen-1"))).unwrap();

        let response = server.post("/api/auth/sign-out").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["cache_cleared"], true);
        assert!(cache.get("citizen-1").await.is_none());
    }

    #[tokio::test]
    async fn test_missing_principal_is_unauthorized() {
        let (service, _) = service().await;
        let server = TestServer::new(protected_routes(service)).unwrap();

        server
            .get("/api/auth/me")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
