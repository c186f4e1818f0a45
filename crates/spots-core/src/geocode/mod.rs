//! Reverse geocoding port and address formatting.

mod nominatim;

use std::future::Future;

use crate::util::normalize_text_option;
use crate::Result;

pub use nominatim::{parse_nominatim_response, NominatimGeocoder, DEFAULT_NOMINATIM_URL};

/// Resolves coordinates into a human-readable address, best-effort.
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` when nothing is known about the location
    fn reverse_geocode(
        &self,
        lat: f64,
        lng: f64,
    ) -> impl Future<Output = Result<Option<String>>> + Send;
}

/// Geocoder that never resolves anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopGeocoder;

impl Geocoder for NoopGeocoder {
    async fn reverse_geocode(&self, _lat: f64, _lng: f64) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Structured address as returned by a geocoding backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressParts {
    pub street: Option<String>,
    pub street_number: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    /// Backend-formatted address, used when the parts are all empty
    pub formatted: Option<String>,
}

impl AddressParts {
    /// Compose `street number, postal city, region, country`.
    ///
    /// Empty parts are skipped; falls back to `formatted`.
    pub fn format_address(&self) -> Option<String> {
        let line1 = join_parts(&[&self.street, &self.street_number], " ");
        let line2 = join_parts(&[&self.postal_code, &self.city], " ");
        let line3 = join_parts(&[&self.region, &self.country], ", ");

        let full = [line1, line2, line3]
            .into_iter()
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        normalize_text_option(Some(full)).or_else(|| normalize_text_option(self.formatted.clone()))
    }
}

fn join_parts(parts: &[&Option<String>], separator: &str) -> String {
    parts
        .iter()
        .filter_map(|part| part.as_deref().map(str::trim))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}
