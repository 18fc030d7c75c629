//! Proximity report locator.
//!
//! Location acquirer (device reading, then IP estimate, optional reverse
//! geocode) feeds a bounding-box candidate fetch, which feeds the Haversine
//! filter and ranker.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/locations/me` | Caller position and optional address |
//! | GET | `/api/reports/nearby` | Reports within a radius, nearest first |

pub mod clients;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{LocationAcquirer, ProximityService};
