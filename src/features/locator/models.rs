use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::geo::Coordinates;

/// Why a position could not be obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationFailure {
    PermissionDenied,
    Unavailable,
    Timeout,
    Network(String),
}

impl LocationFailure {
    /// Stable machine-readable code, returned in the error payload
    pub fn code(&self) -> &'static str {
        match self {
            LocationFailure::PermissionDenied => "permission_denied",
            LocationFailure::Unavailable => "unavailable",
            LocationFailure::Timeout => "timeout",
            LocationFailure::Network(_) => "network",
        }
    }
}

impl fmt::Display for LocationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationFailure::PermissionDenied => write!(f, "location permission denied"),
            LocationFailure::Unavailable => write!(f, "position unavailable"),
            LocationFailure::Timeout => write!(f, "timed out waiting for a position"),
            LocationFailure::Network(msg) => write!(f, "network geolocation failed: {}", msg),
        }
    }
}

/// Failure the client observed while asking its device for a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeviceError {
    PermissionDenied,
    Unavailable,
    Timeout,
}

impl From<DeviceError> for LocationFailure {
    fn from(error: DeviceError) -> Self {
        match error {
            DeviceError::PermissionDenied => LocationFailure::PermissionDenied,
            DeviceError::Unavailable => LocationFailure::Unavailable,
            DeviceError::Timeout => LocationFailure::Timeout,
        }
    }
}

/// Which tier produced the coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PositionSource {
    Device,
    Network,
}

/// Caller position for one search; never persisted
#[derive(Debug, Clone, PartialEq)]
pub struct UserLocation {
    pub coordinates: Coordinates,
    pub address: Option<String>,
    pub source: PositionSource,
}

impl UserLocation {
    pub fn new(coordinates: Coordinates, source: PositionSource) -> Self {
        Self {
            coordinates,
            address: None,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_error_deserializes_snake_case() {
        let parsed: DeviceError = serde_json::from_str("\"permission_denied\"").unwrap();
        assert_eq!(parsed, DeviceError::PermissionDenied);
        assert_eq!(
            LocationFailure::from(parsed).code(),
            "permission_denied"
        );
    }

    #[test]
    fn test_failure_display_carries_cause() {
        let failure = LocationFailure::Network("connection refused".to_string());
        assert_eq!(failure.code(), "network");
        assert!(failure.to_string().contains("connection refused"));
    }
}
