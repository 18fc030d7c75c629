use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::geo::Coordinates;

/// Report lifecycle status matching the database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    InProgress,
    Resolved,
    Closed,
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Pending => write!(f, "pending"),
            ReportStatus::InProgress => write!(f, "in_progress"),
            ReportStatus::Resolved => write!(f, "resolved"),
            ReportStatus::Closed => write!(f, "closed"),
        }
    }
}

/// Database model for report
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Report {
    pub id: Uuid,
    pub profile_id: String,
    pub location: String,
    pub description: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub photo_urls: Vec<String>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    /// Position of a geolocatable report
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_pair(self.latitude, self.longitude)
    }
}

/// Validated data for a new report row
#[derive(Debug, Clone)]
pub struct CreateReport {
    pub profile_id: String,
    pub location: String,
    pub description: String,
    pub coordinates: Option<Coordinates>,
    pub address: Option<String>,
    pub photo_urls: Vec<String>,
}

/// Optional predicates shared by report queries
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub status: Option<ReportStatus>,
    pub profile_id: Option<String>,
    pub limit: Option<i64>,
}
