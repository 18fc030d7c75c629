//! Onboarding and profile management.
//!
//! A profile's id is the authenticated principal. Lookups go through a
//! per-principal cache before the store; responses say which one answered.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/profiles` | Onboarding questionnaire |
//! | GET | `/api/profiles/me` | Caller's profile, tagged with its source |
//! | GET | `/api/profiles/{id}` | Caller's profile by id |
//! | PUT | `/api/profiles/{id}` | Update caller's profile |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{ProfileCache, ProfileService};
