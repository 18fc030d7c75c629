use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{CreateReport, Report, ReportFilter, ReportStatus};
use crate::shared::constants::MAX_REPORT_LIMIT;
use crate::shared::geo::Coordinates;
use crate::shared::validation::non_blank;

/// Maximum length of the free-text location label
pub const MAX_LOCATION_LENGTH: usize = 255;

/// Maximum length of a report description
pub const MAX_DESCRIPTION_LENGTH: usize = 5000;

/// Report submission form for OpenAPI documentation.
/// The handler reads the multipart body field by field.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct SubmitReportDto {
    /// Free-text location label
    #[schema(example = "Corner of Oak Avenue and 5th")]
    pub location: String,
    pub description: String,
    /// Decimal degrees; must be sent together with longitude
    pub latitude: Option<f64>,
    /// Decimal degrees; must be sent together with latitude
    pub longitude: Option<f64>,
    #[schema(example = "123 Oak Avenue")]
    pub address: Option<String>,
    /// Zero or more image files, stored in the order sent
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub photos: Vec<String>,
}

/// Raw text fields collected from the multipart submission
#[derive(Debug, Default, Clone)]
pub struct ReportSubmissionForm {
    pub location: Option<String>,
    pub description: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub address: Option<String>,
}

/// Submission that passed validation, waiting for its owner and photos
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDraft {
    pub location: String,
    pub description: String,
    pub coordinates: Option<Coordinates>,
    pub address: Option<String>,
}

impl ReportDraft {
    pub fn into_create(self, profile_id: String, photo_urls: Vec<String>) -> CreateReport {
        CreateReport {
            profile_id,
            location: self.location,
            description: self.description,
            coordinates: self.coordinates,
            address: self.address,
            photo_urls,
        }
    }
}

impl ReportSubmissionForm {
    /// Validate every field, reporting all problems at once
    pub fn into_draft(self) -> Result<ReportDraft> {
        let mut errors = Vec::new();

        let location = non_blank(self.location);
        match &location {
            None => errors.push("location is required".to_string()),
            Some(l) if l.chars().count() > MAX_LOCATION_LENGTH => errors.push(format!(
                "location must not exceed {} characters",
                MAX_LOCATION_LENGTH
            )),
            _ => {}
        }

        let description = non_blank(self.description);
        match &description {
            None => errors.push("description is required".to_string()),
            Some(d) if d.chars().count() > MAX_DESCRIPTION_LENGTH => errors.push(format!(
                "description must not exceed {} characters",
                MAX_DESCRIPTION_LENGTH
            )),
            _ => {}
        }

        let latitude = parse_degrees("latitude", non_blank(self.latitude), &mut errors);
        let longitude = parse_degrees("longitude", non_blank(self.longitude), &mut errors);

        let coordinates = match (latitude, longitude) {
            (Some(lat), Some(lon)) if lat.is_nan() || lon.is_nan() => None,
            (Some(lat), Some(lon)) => match Coordinates::new(lat, lon) {
                Ok(c) => Some(c),
                Err(msg) => {
                    errors.push(msg);
                    None
                }
            },
            (None, None) => None,
            _ => {
                errors.push("latitude and longitude must be provided together".to_string());
                None
            }
        };

        match (location, description) {
            (Some(location), Some(description)) if errors.is_empty() => Ok(ReportDraft {
                location,
                description,
                coordinates,
                address: non_blank(self.address),
            }),
            _ => Err(AppError::ValidationFailed(errors)),
        }
    }
}

fn parse_degrees(field: &str, raw: Option<String>, errors: &mut Vec<String>) -> Option<f64> {
    let raw = raw?;
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            errors.push(format!("{} must be a number", field));
            // Suppresses the "provided together" message for a malformed half
            Some(f64::NAN)
        }
    }
}

/// Report as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
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

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            profile_id: r.profile_id,
            location: r.location,
            description: r.description,
            latitude: r.latitude,
            longitude: r.longitude,
            address: r.address,
            photo_urls: r.photo_urls,
            status: r.status,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Query parameters for listing reports
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListReportsQuery {
    /// Only reports in this status
    pub status: Option<ReportStatus>,
    /// Only the caller's own reports
    #[serde(default)]
    pub mine: bool,
    /// Maximum number of reports (newest first)
    #[param(minimum = 1, maximum = 500)]
    pub limit: Option<i64>,
}

/// Query parameters for text search
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchReportsQuery {
    /// Case-insensitive substring of the location label or address
    pub q: String,
    pub status: Option<ReportStatus>,
    #[param(minimum = 1, maximum = 500)]
    pub limit: Option<i64>,
}

/// Clamp a requested limit into the supported range
pub fn clamp_limit(limit: Option<i64>) -> Result<Option<i64>> {
    match limit {
        Some(l) if l < 1 => Err(AppError::validation("limit must be at least 1")),
        Some(l) => Ok(Some(l.min(MAX_REPORT_LIMIT))),
        None => Ok(None),
    }
}

impl ListReportsQuery {
    pub fn into_filter(self, caller: &str) -> Result<ReportFilter> {
        Ok(ReportFilter {
            status: self.status,
            profile_id: self.mine.then(|| caller.to_string()),
            limit: clamp_limit(self.limit)?,
        })
    }
}

impl SearchReportsQuery {
    /// Trimmed search text and the accompanying filter
    pub fn into_parts(self) -> Result<(String, ReportFilter)> {
        let text = self.q.trim().to_string();
        if text.is_empty() {
            return Err(AppError::validation("search text is required"));
        }
        let filter = ReportFilter {
            status: self.status,
            profile_id: None,
            limit: clamp_limit(self.limit)?,
        };
        Ok((text, filter))
    }
}
