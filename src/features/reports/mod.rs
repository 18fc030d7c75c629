//! Incident reports: multipart submission with photos, listing and text search.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/reports` | Submit a report (citizens only) |
//! | GET | `/api/reports` | List reports, newest first |
//! | GET | `/api/reports/search` | Search by location label or address |
//! | GET | `/api/reports/{id}` | Get a report |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{PhotoService, ReportService, ReportSubmissionService};
