//! Contractor dashboard: report status counts, contribution totals and a
//! paginated report list with per-report contribution sums.

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::DashboardService;
