use async_trait::async_trait;
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;

use crate::core::error::{AppError, Result};
use crate::features::locator::models::LocationFailure;
use crate::features::locator::services::NetworkLocator;
use crate::shared::geo::Coordinates;

/// ip-api.com style response
#[derive(Debug, Deserialize)]
pub struct IpApiResponse {
    pub status: String,
    pub message: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl IpApiResponse {
    pub fn into_coordinates(self) -> std::result::Result<Coordinates, LocationFailure> {
        if self.status != "success" {
            let reason = self.message.unwrap_or_else(|| self.status.clone());
            tracing::warn!("IP geolocation lookup failed: {}", reason);
            return Err(LocationFailure::Unavailable);
        }

        let (Some(lat), Some(lon)) = (self.lat, self.lon) else {
            return Err(LocationFailure::Unavailable);
        };

        Coordinates::new(lat, lon).map_err(|_| LocationFailure::Unavailable)
    }
}

/// Approximate caller position from its public IP address
pub struct IpGeolocationClient {
    client: reqwest::Client,
    base_url: String,
}

impl IpGeolocationClient {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Lookup URL; private and loopback callers are located by the
    /// provider's view of the request instead
    fn lookup_url(&self, ip: Option<IpAddr>) -> String {
        match ip.filter(is_public) {
            Some(ip) => format!("{}/{}?fields=status,message,lat,lon", self.base_url, ip),
            None => format!("{}?fields=status,message,lat,lon", self.base_url),
        }
    }
}

fn is_public(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            !(v4.is_private()
                || v4.is_loopback()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast())
        }
        IpAddr::V6(v6) => !(v6.is_loopback() || v6.is_unspecified()),
    }
}

#[async_trait]
impl NetworkLocator for IpGeolocationClient {
    async fn locate(&self, ip: Option<IpAddr>) -> std::result::Result<Coordinates, LocationFailure> {
        let url = self.lookup_url(ip);
        tracing::debug!("IP geolocation lookup -> {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                LocationFailure::Timeout
            } else {
                LocationFailure::Network(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(LocationFailure::Network(format!(
                "provider returned {}",
                response.status()
            )));
        }

        let body: IpApiResponse = response
            .json()
            .await
            .map_err(|e| LocationFailure::Network(format!("invalid response: {}", e)))?;

        body.into_coordinates()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> IpGeolocationClient {
        IpGeolocationClient::new("http://ip-api.example/json/", "test", Duration::from_secs(1))
            .unwrap()
    }

    #[test]
    fn test_lookup_url_uses_public_ip_only() {
        let client = client();
        assert_eq!(
            client.lookup_url(Some("203.0.113.9".parse().unwrap())),
            "http://ip-api.example/json/203.0.113.9?fields=status,message,lat,lon"
        );
        assert_eq!(
            client.lookup_url(Some("192.168.1.20".parse().unwrap())),
            "http://ip-api.example/json?fields=status,message,lat,lon"
        );
        assert_eq!(
            client.lookup_url(None),
            "http://ip-api.example/json?fields=status,message,lat,lon"
        );
    }

    #[test]
    fn test_response_into_coordinates() {
        let ok: IpApiResponse = serde_json::from_value(serde_json::json!({
            "status": "success", "lat": -6.2, "lon": 106.8
        }))
        .unwrap();
        assert_eq!(
            ok.into_coordinates(),
            Ok(Coordinates {
                latitude: -6.2,
                longitude: 106.8
            })
        );

        let failed: IpApiResponse = serde_json::from_value(serde_json::json!({
            "status": "fail", "message": "reserved range"
        }))
        .unwrap();
        assert_eq!(failed.into_coordinates(), Err(LocationFailure::Unavailable));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_network_failure() {
        let client =
            IpGeolocationClient::new("http://127.0.0.1:9", "test", Duration::from_secs(2)).unwrap();
        let result = client.locate(None).await;
        assert!(matches!(
            result,
            Err(LocationFailure::Network(_)) | Err(LocationFailure::Timeout)
        ));
    }
}
