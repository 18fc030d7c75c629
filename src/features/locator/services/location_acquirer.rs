use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::error::{AppError, Result};
use crate::features::locator::models::{DeviceError, LocationFailure, PositionSource, UserLocation};
use crate::features::locator::services::{NetworkLocator, PositionProvider, ReverseGeocoder};
use crate::shared::geo::Coordinates;

/// Position the client read from its device and sent with the request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReportedPosition {
    Fix(Coordinates),
    Failed(DeviceError),
    Missing,
}

impl ReportedPosition {
    /// Build from query parameters; `lat` and `lon` must come together
    pub fn from_query(
        latitude: Option<f64>,
        longitude: Option<f64>,
        device_error: Option<DeviceError>,
    ) -> Result<Self> {
        match (latitude, longitude, device_error) {
            (Some(lat), Some(lon), _) => Coordinates::new(lat, lon)
                .map(ReportedPosition::Fix)
                .map_err(AppError::validation),
            (Some(_), None, _) | (None, Some(_), _) => Err(AppError::validation(
                "lat and lon must be provided together",
            )),
            (None, None, Some(error)) => Ok(ReportedPosition::Failed(error)),
            (None, None, None) => Ok(ReportedPosition::Missing),
        }
    }
}

#[async_trait]
impl PositionProvider for ReportedPosition {
    async fn locate(&self) -> std::result::Result<Coordinates, LocationFailure> {
        match self {
            ReportedPosition::Fix(c) => Ok(*c),
            ReportedPosition::Failed(error) => Err((*error).into()),
            ReportedPosition::Missing => Err(LocationFailure::Unavailable),
        }
    }
}

/// Obtains the caller's coordinates: device first, network estimate second,
/// optionally enriched with a reverse-geocoded address
pub struct LocationAcquirer {
    device_timeout: Duration,
    network: Option<Arc<dyn NetworkLocator>>,
    geocoder: Option<Arc<dyn ReverseGeocoder>>,
}

impl LocationAcquirer {
    pub fn new(
        device_timeout: Duration,
        network: Option<Arc<dyn NetworkLocator>>,
        geocoder: Option<Arc<dyn ReverseGeocoder>>,
    ) -> Self {
        Self {
            device_timeout,
            network,
            geocoder,
        }
    }

    /// One acquisition attempt. Fails with `LocationUnavailable` carrying the
    /// cause of the last tier tried. Geocoding failures are not fatal.
    pub async fn acquire(
        &self,
        device: &dyn PositionProvider,
        client_ip: Option<IpAddr>,
        resolve_address: bool,
    ) -> Result<UserLocation> {
        let mut location = self.position(device, client_ip).await?;

        if resolve_address {
            location.address = self.address_for(location.coordinates).await;
        }

        Ok(location)
    }

    async fn position(
        &self,
        device: &dyn PositionProvider,
        client_ip: Option<IpAddr>,
    ) -> Result<UserLocation> {
        let device_failure = match tokio::time::timeout(self.device_timeout, device.locate()).await
        {
            Ok(Ok(coordinates)) => {
                return Ok(UserLocation::new(coordinates, PositionSource::Device));
            }
            Ok(Err(failure)) => failure,
            Err(_) => LocationFailure::Timeout,
        };

        let Some(network) = &self.network else {
            tracing::debug!("Device position failed ({}); no network fallback", device_failure);
            return Err(AppError::LocationUnavailable(device_failure));
        };

        tracing::debug!("Device position failed ({}); trying network", device_failure);

        match network.locate(client_ip).await {
            Ok(coordinates) => Ok(UserLocation::new(coordinates, PositionSource::Network)),
            Err(failure) => {
                tracing::warn!(
                    "Location unavailable: device {}, network {}",
                    device_failure,
                    failure
                );
                Err(AppError::LocationUnavailable(failure))
            }
        }
    }

    async fn address_for(&self, point: Coordinates) -> Option<String> {
        let geocoder = self.geocoder.as_ref()?;
        match geocoder.reverse(point).await {
            Ok(address) => address,
            Err(e) => {
                tracing::warn!("Reverse geocoding failed, continuing without address: {}", e);
                None
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fakes::{FixedGeocoder, FixedNetwork};
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    const SF: Coordinates = Coordinates {
        latitude: 37.7749,
        longitude: -122.4194,
    };
    const JAKARTA: Coordinates = Coordinates {
        latitude: -6.2,
        longitude: 106.8,
    };

    struct SlowDevice;

    #[async_trait]
    impl PositionProvider for SlowDevice {
        async fn locate(&self) -> std::result::Result<Coordinates, LocationFailure> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(SF)
        }
    }

    fn acquirer(network: Option<FixedNetwork>, geocoder: Option<FixedGeocoder>) -> LocationAcquirer {
        LocationAcquirer::new(
            Duration::from_millis(50),
            network.map(|n| Arc::new(n) as Arc<dyn NetworkLocator>),
            geocoder.map(|g| Arc::new(g) as Arc<dyn ReverseGeocoder>),
        )
    }

    #[tokio::test]
    async fn test_device_fix_wins() {
        let acquirer = acquirer(Some(FixedNetwork(Ok(JAKARTA))), None);

        let location = assert_ok!(acquirer.acquire(&ReportedPosition::Fix(SF), None, false).await);

        assert_eq!(location.coordinates, SF);
        assert_eq!(location.source, PositionSource::Device);
        assert_eq!(location.address, None);
    }

    #[tokio::test]
    async fn test_falls_back_to_network() {
        let acquirer = acquirer(Some(FixedNetwork(Ok(JAKARTA))), None);

        let location = acquirer
            .acquire(&ReportedPosition::Failed(DeviceError::PermissionDenied), None, false)
            .await
            .unwrap();

        assert_eq!(location.coordinates, JAKARTA);
        assert_eq!(location.source, PositionSource::Network);
    }

    #[tokio::test]
    async fn test_slow_device_times_out_into_fallback() {
        let acquirer = acquirer(Some(FixedNetwork(Ok(JAKARTA))), None);

        let location = acquirer.acquire(&SlowDevice, None, false).await.unwrap();

        assert_eq!(location.source, PositionSource::Network);
    }

    #[tokio::test]
    async fn test_timeout_without_fallback() {
        let acquirer = acquirer(None, None);

        let error = assert_err!(acquirer.acquire(&SlowDevice, None, false).await);

        assert!(matches!(
            error,
            AppError::LocationUnavailable(LocationFailure::Timeout)
        ));
    }

    #[tokio::test]
    async fn test_device_cause_kept_without_fallback() {
        let acquirer = acquirer(None, None);

        let result = acquirer
            .acquire(&ReportedPosition::Failed(DeviceError::PermissionDenied), None, false)
            .await;

        assert!(matches!(
            result,
            Err(AppError::LocationUnavailable(LocationFailure::PermissionDenied))
        ));
    }

    #[tokio::test]
    async fn test_both_tiers_fail_with_network_cause() {
        let acquirer = acquirer(
            Some(FixedNetwork(Err(LocationFailure::Network("refused".to_string())))),
            None,
        );

        let result = acquirer.acquire(&ReportedPosition::Missing, None, false).await;

        match result {
            Err(AppError::LocationUnavailable(failure)) => assert_eq!(failure.code(), "network"),
            other => panic!("expected location failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_address_resolved_on_request() {
        let acquirer = acquirer(None, Some(FixedGeocoder(Some("123 Oak Avenue, Springfield"))));

        let location = acquirer
            .acquire(&ReportedPosition::Fix(SF), None, true)
            .await
            .unwrap();

        assert_eq!(location.address.as_deref(), Some("123 Oak Avenue, Springfield"));
    }

    #[tokio::test]
    async fn test_geocoder_failure_is_not_fatal() {
        let acquirer = acquirer(None, Some(FixedGeocoder(None)));

        let location = acquirer
            .acquire(&ReportedPosition::Fix(SF), None, true)
            .await
            .unwrap();

        assert_eq!(location.coordinates, SF);
        assert_eq!(location.address, None);
    }

    #[test]
    fn test_reported_position_from_query() {
        assert_eq!(
            ReportedPosition::from_query(Some(SF.latitude), Some(SF.longitude), None).unwrap(),
            ReportedPosition::Fix(SF)
        );
        assert_eq!(
            ReportedPosition::from_query(None, None, Some(DeviceError::Timeout)).unwrap(),
            ReportedPosition::Failed(DeviceError::Timeout)
        );
        assert_eq!(
            ReportedPosition::from_query(None, None, None).unwrap(),
            ReportedPosition::Missing
        );
        assert!(ReportedPosition::from_query(Some(95.0), Some(0.0), None).is_err());
    }

    #[test]
    fn test_half_pair_is_rejected() {
        for (lat, lon) in [(Some(1.0), None), (None, Some(2.0))] {
            match ReportedPosition::from_query(lat, lon, Some(DeviceError::Timeout)) {
                Err(AppError::ValidationFailed(msgs)) => {
                    assert_eq!(msgs, vec!["lat and lon must be provided together"]);
                }
                other => panic!("expected validation failure, got {:?}", other),
            }
        }
    }
}
