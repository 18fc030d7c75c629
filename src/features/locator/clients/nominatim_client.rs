use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::core::error::{AppError, Result};
use crate::features::locator::services::ReverseGeocoder;
use crate::shared::geo::Coordinates;

/// Nominatim `/reverse` response (only the fields we read)
#[derive(Debug, Deserialize)]
pub struct NominatimReverseResponse {
    pub display_name: Option<String>,
    pub error: Option<String>,
    pub address: Option<NominatimAddress>,
}

/// Nominatim address components
#[derive(Debug, Deserialize)]
pub struct NominatimAddress {
    pub house_number: Option<String>,
    pub road: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
}

impl NominatimAddress {
    /// Get city, falling back to town or village
    pub fn get_city(&self) -> Option<&str> {
        self.city
            .as_deref()
            .or(self.town.as_deref())
            .or(self.village.as_deref())
    }

    /// Short "123 Oak Avenue, Springfield" form, when a road is known
    pub fn short_label(&self) -> Option<String> {
        let road = self.road.as_deref()?;
        let street = match self.house_number.as_deref() {
            Some(number) => format!("{} {}", number, road),
            None => road.to_string(),
        };
        Some(match self.get_city() {
            Some(city) => format!("{}, {}", street, city),
            None => street,
        })
    }
}

impl NominatimReverseResponse {
    /// Preferred human-readable address for a point
    pub fn formatted_address(self) -> Option<String> {
        if let Some(err) = self.error {
            tracing::debug!("Nominatim reverse returned error: {}", err);
            return None;
        }
        self.address
            .as_ref()
            .and_then(NominatimAddress::short_label)
            .or(self.display_name)
    }
}

/// Reverse geocoding against a Nominatim-compatible server
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimClient {
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

    fn reverse_url(&self, point: Coordinates) -> String {
        format!(
            "{}/reverse?lat={}&lon={}&format=json&addressdetails=1&zoom=18",
            self.base_url, point.latitude, point.longitude
        )
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimClient {
    async fn reverse(&self, point: Coordinates) -> Result<Option<String>> {
        let url = self.reverse_url(point);
        tracing::debug!("Reverse geocoding ({}, {}) -> {}", point.latitude, point.longitude, url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::error!("Nominatim request failed: {:?}", e);
            AppError::ExternalServiceError(format!("Nominatim request failed: {}", e))
        })?;

        if !response.status().is_success() {
            tracing::warn!("Nominatim returned status: {}", response.status());
            return Ok(None);
        }

        let body: NominatimReverseResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Nominatim response: {:?}", e);
            AppError::ExternalServiceError(format!("Failed to parse Nominatim response: {}", e))
        })?;

        Ok(body.formatted_address())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(road: Option<&str>, number: Option<&str>, town: Option<&str>) -> NominatimAddress {
        NominatimAddress {
            house_number: number.map(String::from),
            road: road.map(String::from),
            city: None,
            town: town.map(String::from),
            village: None,
        }
    }

    #[test]
    fn test_short_label() {
        assert_eq!(
            address(Some("Oak Avenue"), Some("123"), Some("Springfield")).short_label(),
            Some("123 Oak Avenue, Springfield".to_string())
        );
        assert_eq!(
            address(Some("Jalan Merdeka"), None, None).short_label(),
            Some("Jalan Merdeka".to_string())
        );
        assert_eq!(address(None, Some("1"), Some("Bandung")).short_label(), None);
    }

    #[test]
    fn test_formatted_address_falls_back_to_display_name() {
        let body: NominatimReverseResponse = serde_json::from_value(serde_json::json!({
            "display_name": "Monas, Gambir, Jakarta Pusat, Indonesia",
            "address": { "city": "Jakarta" }
        }))
        .unwrap();
        assert_eq!(
            body.formatted_address(),
            Some("Monas, Gambir, Jakarta Pusat, Indonesia".to_string())
        );

        let error: NominatimReverseResponse =
            serde_json::from_value(serde_json::json!({ "error": "Unable to geocode" })).unwrap();
        assert_eq!(error.formatted_address(), None);
    }

    #[test]
    fn test_reverse_url() {
        let client =
            NominatimClient::new("https://nominatim.example/", "test-agent", Duration::from_secs(1))
                .unwrap();
        let url = client.reverse_url(Coordinates {
            latitude: -6.2,
            longitude: 106.8,
        });
        assert_eq!(
            url,
            "https://nominatim.example/reverse?lat=-6.2&lon=106.8&format=json&addressdetails=1&zoom=18"
        );
    }
}
