//! Financial contributions toward reports.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/reports/{id}/contributions` | Record a contribution |
//! | GET | `/api/reports/{id}/contributions` | Contributions with totals |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ContributionService;
