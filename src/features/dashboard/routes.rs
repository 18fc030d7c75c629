use axum::{routing::get, Router};

use crate::features::dashboard::handlers::{self, DashboardState};

/// Contractor dashboard routes (require auth middleware to be applied by caller)
pub fn routes(state: DashboardState) -> Router {
    Router::new()
        .route("/api/dashboard/summary", get(handlers::get_summary))
        .route("/api/dashboard/reports", get(handlers::list_reports))
        .with_state(state)
}
