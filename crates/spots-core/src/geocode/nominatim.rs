//! Nominatim (OpenStreetMap) reverse geocoder.

use std::time::Duration;

use serde::Deserialize;

use super::{AddressParts, Geocoder};
use crate::util::{compact_text, is_http_url, normalize_text_option};
use crate::{Error, Result};

/// Public OpenStreetMap Nominatim instance
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

const USER_AGENT: &str = concat!("spots/", env!("CARGO_PKG_VERSION"));

/// Reverse geocoder backed by a Nominatim HTTP endpoint
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    /// Create a geocoder for the given base URL (without `/reverse`)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = normalize_text_option(Some(base_url.to_string()))
            .filter(|url| is_http_url(url))
            .ok_or_else(|| {
                Error::Config(format!(
                    "geocoder URL must include http:// or https://, got '{base_url}'"
                ))
            })?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|error| Error::Geocoding(format!("failed to build HTTP client: {error}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Endpoint queried for reverse lookups
    pub fn reverse_url(&self) -> String {
        format!("{}/reverse", self.base_url)
    }
}

impl Geocoder for NominatimGeocoder {
    async fn reverse_geocode(&self, lat: f64, lng: f64) -> Result<Option<String>> {
        let response = self
            .client
            .get(self.reverse_url())
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", lat.to_string()),
                ("lon", lng.to_string()),
                ("addressdetails", "1".to_string()),
            ])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|error| Error::Geocoding(format!("reverse geocode request failed: {error}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| Error::Geocoding(format!("failed to read geocoder response: {error}")))?;

        if !status.is_success() {
            return Err(Error::Geocoding(format!(
                "geocoder returned HTTP {}: {}",
                status.as_u16(),
                compact_text(&body)
            )));
        }

        parse_nominatim_response(&body)
    }
}

/// Parse a Nominatim `jsonv2` reverse response into an address label.
///
/// Public for testability; callers can exercise parsing without network access.
pub fn parse_nominatim_response(payload: &str) -> Result<Option<String>> {
    let response: NominatimResponse = serde_json::from_str(payload)
        .map_err(|error| Error::Geocoding(format!("invalid geocoder JSON: {error}")))?;

    if let Some(error) = response.error {
        tracing::debug!("Geocoder found no address: {error}");
        return Ok(None);
    }

    let address = response.address.unwrap_or_default();
    let parts = AddressParts {
        street: address.road,
        street_number: address.house_number,
        postal_code: address.postcode,
        city: address
            .city
            .or(address.town)
            .or(address.village)
            .or(address.hamlet),
        region: address.state,
        country: address.country,
        formatted: response.display_name,
    };
    Ok(parts.format_address())
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    address: Option<NominatimAddress>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    #[serde(default)]
    road: Option<String>,
    #[serde(default)]
    house_number: Option<String>,
    #[serde(default)]
    postcode: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    town: Option<String>,
    #[serde(default)]
    village: Option<String>,
    #[serde(default)]
    hamlet: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_response_builds_label_from_address() {
        let payload = r#"
        {
          "place_id": 1,
          "display_name": "1, Via Roma, Milano, Lombardia, 20121, Italia",
          "address": {
            "house_number": "1",
            "road": "Via Roma",
            "city": "Milano",
            "state": "Lombardia",
            "postcode": "20121",
            "country": "Italia",
            "country_code": "it"
          }
        }
        "#;

        assert_eq!(
            parse_nominatim_response(payload).unwrap().as_deref(),
            Some("Via Roma 1, 20121 Milano, Lombardia, Italia")
        );
    }

    #[test]
    fn parse_response_uses_town_when_city_missing() {
        let payload = r#"{"address": {"town": "Bellagio", "country": "Italia"}}"#;
        assert_eq!(
            parse_nominatim_response(payload).unwrap().as_deref(),
            Some("Bellagio, Italia")
        );
    }

    #[test]
    fn parse_response_falls_back_to_display_name() {
        let payload = r#"{"display_name": "Middle of the lake", "address": {}}"#;
        assert_eq!(
            parse_nominatim_response(payload).unwrap().as_deref(),
            Some("Middle of the lake")
        );
    }

    #[test]
    fn parse_response_treats_error_as_no_address() {
        let payload = r#"{"error": "Unable to geocode"}"#;
        assert_eq!(parse_nominatim_response(payload).unwrap(), None);
    }

    #[test]
    fn parse_response_rejects_invalid_json() {
        assert!(matches!(
            parse_nominatim_response("<html>"),
            Err(Error::Geocoding(_))
        ));
    }

    #[test]
    fn new_rejects_non_http_url() {
        let error = NominatimGeocoder::new("nominatim.local", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(error, Error::Config(_)));
    }

    #[test]
    fn reverse_url_strips_trailing_slash() {
        let geocoder =
            NominatimGeocoder::new("https://geo.example.com/", Duration::from_secs(1)).unwrap();
        assert_eq!(geocoder.reverse_url(), "https://geo.example.com/reverse");
    }
}
