use axum::{extract::DefaultBodyLimit, routing::get, Router};

use crate::features::reports::handlers::{self, ReportState};

/// Create routes for the reports feature
///
/// All routes require authentication; `body_limit` caps multipart submissions
pub fn routes(state: ReportState, body_limit: usize) -> Router {
    Router::new()
        .route(
            "/api/reports",
            get(handlers::list_reports).post(handlers::create_report),
        )
        .route("/api/reports/search", get(handlers::search_reports))
        .route("/api/reports/{id}", get(handlers::get_report))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
