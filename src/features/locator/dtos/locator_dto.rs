use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::core::error::Result;
use crate::features::locator::models::{DeviceError, PositionSource, UserLocation};
use crate::features::locator::services::{RankedReport, ReportedPosition};
use crate::features::reports::dtos::{clamp_limit, ReportResponseDto};
use crate::features::reports::models::{ReportFilter, ReportStatus};
use crate::shared::constants::DEFAULT_SEARCH_RADIUS_KM;
use crate::shared::geo::format_distance;

fn default_radius() -> f64 {
    DEFAULT_SEARCH_RADIUS_KM
}

fn default_true() -> bool {
    true
}

/// Device reading sent by the client, used for `/api/locations/me`
#[derive(Debug, Deserialize, IntoParams)]
pub struct LocationQuery {
    /// Device latitude, sent with `lon`
    pub lat: Option<f64>,
    /// Device longitude, sent with `lat`
    pub lon: Option<f64>,
    /// Why the device gave no position
    pub device_error: Option<DeviceError>,
    /// Reverse-geocode the position (default true)
    #[serde(default = "default_true")]
    pub resolve_address: bool,
}

impl LocationQuery {
    pub fn reported_position(&self) -> Result<ReportedPosition> {
        ReportedPosition::from_query(self.lat, self.lon, self.device_error)
    }
}

/// Nearby search parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct NearbyQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub device_error: Option<DeviceError>,
    /// Search radius in kilometres (default 5)
    #[serde(default = "default_radius")]
    #[param(minimum = 0, maximum = 2000)]
    pub radius_km: f64,
    pub status: Option<ReportStatus>,
    /// Maximum number of reports, nearest first
    #[param(minimum = 1, maximum = 500)]
    pub limit: Option<i64>,
    /// Reverse-geocode the caller's position (default false)
    #[serde(default)]
    pub resolve_address: bool,
}

impl NearbyQuery {
    pub fn reported_position(&self) -> Result<ReportedPosition> {
        ReportedPosition::from_query(self.lat, self.lon, self.device_error)
    }

    pub fn filter(&self) -> Result<ReportFilter> {
        Ok(ReportFilter {
            status: self.status,
            profile_id: None,
            limit: clamp_limit(self.limit)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserLocationDto {
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub source: PositionSource,
}

impl From<UserLocation> for UserLocationDto {
    fn from(location: UserLocation) -> Self {
        Self {
            latitude: location.coordinates.latitude,
            longitude: location.coordinates.longitude,
            address: location.address,
            source: location.source,
        }
    }
}

/// Report with its distance from the caller
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NearbyReportDto {
    #[serde(flatten)]
    pub report: ReportResponseDto,
    pub distance_km: f64,
    /// "14m" under a kilometre, "2.5km" above
    #[schema(example = "2.5km")]
    pub distance_label: String,
}

impl From<RankedReport> for NearbyReportDto {
    fn from(ranked: RankedReport) -> Self {
        Self {
            distance_label: format_distance(ranked.distance_km),
            distance_km: ranked.distance_km,
            report: ranked.report.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NearbyResponseDto {
    pub location: UserLocationDto,
    pub radius_km: f64,
    pub reports: Vec<NearbyReportDto>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::fixtures::report_at;

    #[test]
    fn test_nearby_dto_flattens_report() {
        let dto = NearbyReportDto::from(RankedReport {
            report: report_at(Some((37.7750, -122.4195)), 0),
            distance_km: 2.54,
        });

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["distance_label"], "2.5km");
        assert_eq!(json["location"], "Near the market");
        assert_eq!(json["status"], "pending");
    }

    #[test]
    fn test_nearby_query_defaults() {
        let query: NearbyQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(query.radius_km, DEFAULT_SEARCH_RADIUS_KM);
        assert!(!query.resolve_address);
        assert_eq!(query.reported_position().unwrap(), ReportedPosition::Missing);

        let query: LocationQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(query.resolve_address);
    }
}
