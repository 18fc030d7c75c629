use axum::{routing::get, Router};

use crate::features::contributions::handlers::{self, ContributionState};

/// Contribution routes (require auth middleware to be applied by caller)
pub fn routes(state: ContributionState) -> Router {
    Router::new()
        .route(
            "/api/reports/{id}/contributions",
            get(handlers::list_contributions).post(handlers::create_contribution),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::contributions::services::ContributionService;
    use crate::features::profiles::{ProfileCache, ProfileService};
    use crate::shared::test_helpers::{lazy_pool, test_user, with_user};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;

    fn server() -> TestServer {
        let pool = lazy_pool();
        let state = ContributionState {
            contribution_service: Arc::new(ContributionService::new(pool.clone())),
            profile_service: Arc::new(ProfileService::new(
                pool,
                Arc::new(ProfileCache::new(Duration::from_secs(60))),
            )),
        };
        TestServer::new(with_user(routes(state), test_user("citizen-1"))).unwrap()
    }

    #[tokio::test]
    async fn test_rejects_invalid_amount() {
        let response = server()
            .post("/api/reports/0190f1c2-3d4e-7a8b-9c0d-1e2f3a4b5c6d/contributions")
            .json(&json!({ "amount": "-10", "contributor_name": "Budi" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "Amount must be greater than zero");
    }

    #[tokio::test]
    async fn test_rejects_malformed_body() {
        let response = server()
            .post("/api/reports/0190f1c2-3d4e-7a8b-9c0d-1e2f3a4b5c6d/contributions")
            .json(&json!({ "amount": "ten" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
