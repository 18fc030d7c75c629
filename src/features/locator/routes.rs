use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::locator::handlers;
use crate::features::locator::services::ProximityService;

/// Location and proximity routes (require auth middleware to be applied by caller)
pub fn routes(service: Arc<ProximityService>) -> Router {
    Router::new()
        .route("/api/locations/me", get(handlers::get_my_location))
        .route("/api/reports/nearby", get(handlers::list_nearby_reports))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::locator::services::LocationAcquirer;
    use crate::features::reports::models::fixtures::report_at;
    use crate::features::reports::services::memory::InMemoryReportStore;
    use crate::shared::test_helpers::{test_user, with_user};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;
    use std::time::Duration;

    fn server() -> TestServer {
        let store = InMemoryReportStore {
            reports: vec![
                report_at(Some((37.7760, -122.4194)), 0),
                report_at(Some((37.7750, -122.4195)), 1),
                report_at(Some((0.0, 0.0)), 2),
                report_at(None, 3),
            ],
        };
        let acquirer = LocationAcquirer::new(Duration::from_millis(50), None, None);
        let service = Arc::new(ProximityService::new(Arc::new(store), Arc::new(acquirer)));
        TestServer::new(with_user(routes(service), test_user("citizen-1"))).unwrap()
    }

    #[tokio::test]
    async fn test_nearby_ranks_by_distance() {
        let response = server()
            .get("/api/reports/nearby")
            .add_query_param("lat", 37.7749)
            .add_query_param("lon", -122.4194)
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["meta"]["total"], 2);
        assert_eq!(body["data"]["location"]["source"], "device");
        assert_eq!(body["data"]["reports"][0]["distance_label"], "14m");
        assert_eq!(body["data"]["reports"][1]["distance_label"], "122m");
    }

    #[tokio::test]
    async fn test_nearby_without_position_is_unprocessable() {
        let response = server()
            .get("/api/reports/nearby")
            .add_query_param("device_error", "permission_denied")
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        assert_eq!(body["errors"][0], "permission_denied");
    }

    #[tokio::test]
    async fn test_nearby_rejects_bad_radius() {
        let response = server()
            .get("/api/reports/nearby")
            .add_query_param("lat", 37.7749)
            .add_query_param("lon", -122.4194)
            .add_query_param("radius_km", 0)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_nearby_rejects_half_coordinate_pair() {
        let response = server()
            .get("/api/reports/nearby")
            .add_query_param("lat", 37.7749)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["errors"][0], "lat and lon must be provided together");
    }

    #[tokio::test]
    async fn test_location_me_echoes_device_fix() {
        let response = server()
            .get("/api/locations/me")
            .add_query_param("lat", -6.2)
            .add_query_param("lon", 106.8)
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["latitude"], -6.2);
        assert_eq!(body["data"]["address"], Value::Null);
    }
}
