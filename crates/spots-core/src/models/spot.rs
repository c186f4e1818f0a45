//! Spot model

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::Position;
use crate::error::{Error, Result};
use crate::util::{is_valid_coordinate, normalize_text_option};

/// Title shown for spots that have no usable title.
pub const UNTITLED_SPOT_LABEL: &str = "Saved spot";

/// Opaque identifier of a spot.
///
/// New ids are UUID v7 strings, but any non-empty string read back from
/// storage is accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpotId(String);

impl SpotId {
    /// Create a new unique spot ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is empty or whitespace-only
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Default for SpotId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SpotId {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<&str> for SpotId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SpotId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A saved location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spot {
    /// Unique identifier
    pub id: SpotId,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
    /// Creation timestamp (ISO-8601), kept verbatim
    pub created_at: String,
    /// Radius estimate of the originating fix, in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    /// User-editable display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Free-text annotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Reverse-geocoded address, filled in after creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_label: Option<String>,
    /// Reserved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl Spot {
    /// Create a new spot at the given coordinates, stamped with the current time
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            id: SpotId::new(),
            lat,
            lng,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            accuracy: None,
            title: None,
            note: None,
            address_label: None,
            photo_url: None,
        }
    }

    /// Create a new spot from a position fix
    #[must_use]
    pub fn from_position(position: &Position) -> Self {
        Self {
            accuracy: position.accuracy,
            ..Self::new(position.lat, position.lng)
        }
    }

    /// Set the title, treating blank input as unset
    #[must_use]
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = normalize_text_option(title);
        self
    }

    /// Set the note, treating blank input as unset
    #[must_use]
    pub fn with_note(mut self, note: Option<String>) -> Self {
        self.note = normalize_text_option(note);
        self
    }

    /// Title for display; blank titles fall back to a generic label
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .unwrap_or(UNTITLED_SPOT_LABEL)
    }

    /// Coordinates rendered with six decimals, e.g. `45.000000, 9.000000`
    #[must_use]
    pub fn coordinates_label(&self) -> String {
        format!("{:.6}, {:.6}", self.lat, self.lng)
    }

    /// Parsed creation time, if the stored timestamp is valid RFC 3339
    #[must_use]
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|time| time.with_timezone(&Utc))
    }

    /// Check the record is fit to be persisted
    pub fn validate(&self) -> Result<()> {
        if self.id.is_blank() {
            return Err(Error::InvalidInput("spot id must not be empty".into()));
        }
        if !is_valid_coordinate(self.lat, self.lng) {
            return Err(Error::InvalidInput(format!(
                "coordinates out of range: {}, {}",
                self.lat, self.lng
            )));
        }
        if let Some(accuracy) = self.accuracy {
            if !accuracy.is_finite() || accuracy < 0.0 {
                return Err(Error::InvalidInput(format!(
                    "accuracy must be a non-negative number, got {accuracy}"
                )));
            }
        }
        Ok(())
    }
}

/// Field-wise change to an existing spot.
///
/// Each field is `None` to leave it alone, `Some(None)` to clear it, or
/// `Some(Some(value))` to set it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpotPatch {
    pub title: Option<Option<String>>,
    pub note: Option<Option<String>>,
    pub address_label: Option<Option<String>>,
}

impl SpotPatch {
    /// Rename; blank titles clear the title
    #[must_use]
    pub fn title(title: Option<String>) -> Self {
        Self {
            title: Some(normalize_text_option(title)),
            ..Self::default()
        }
    }

    /// Replace the note; blank notes clear it
    #[must_use]
    pub fn note(note: Option<String>) -> Self {
        Self {
            note: Some(normalize_text_option(note)),
            ..Self::default()
        }
    }

    /// Attach a resolved address
    #[must_use]
    pub fn address_label(label: impl Into<String>) -> Self {
        Self {
            address_label: Some(normalize_text_option(Some(label.into()))),
            ..Self::default()
        }
    }

    /// Apply the patch onto a spot in place
    pub fn apply(&self, spot: &mut Spot) {
        if let Some(title) = &self.title {
            spot.title.clone_from(title);
        }
        if let Some(note) = &self.note {
            spot.note.clone_from(note);
        }
        if let Some(address_label) = &self.address_label {
            spot.address_label.clone_from(address_label);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Spot {
        Spot {
            id: "1".into(),
            lat: 45.0,
            lng: 9.0,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            accuracy: None,
            title: None,
            note: None,
            address_label: None,
            photo_url: None,
        }
    }

    #[test]
    fn test_spot_id_unique() {
        let id1 = SpotId::new();
        let id2 = SpotId::new();
        assert_ne!(id1, id2);
        assert!(!id1.is_blank());
    }

    #[test]
    fn test_spot_new_stamps_creation_time() {
        let spot = Spot::new(45.0, 9.0);
        assert!(spot.created_at.ends_with('Z'));
        assert!(spot.created_at_utc().is_some());
        assert!(spot.title.is_none());
    }

    #[test]
    fn test_absent_fields_are_omitted_from_json() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            r#"{"id":"1","lat":45.0,"lng":9.0,"createdAt":"2024-01-01T00:00:00Z"}"#
        );
    }

    #[test]
    fn test_camel_case_fields_round_trip() {
        let raw = r#"{"id":"abc","lat":-33.5,"lng":151.25,"createdAt":"2024-01-01T00:00:00.000Z","accuracy":12.5,"title":"Beach","note":"Low tide","addressLabel":"Bondi, NSW","photoUrl":"file:///p.jpg"}"#;
        let spot: Spot = serde_json::from_str(raw).unwrap();
        assert_eq!(spot.address_label.as_deref(), Some("Bondi, NSW"));
        assert_eq!(spot.photo_url.as_deref(), Some("file:///p.jpg"));
        assert_eq!(spot.accuracy, Some(12.5));

        let again: Spot = serde_json::from_str(&serde_json::to_string(&spot).unwrap()).unwrap();
        assert_eq!(again, spot);
    }

    #[test]
    fn test_null_optional_fields_read_as_absent() {
        let raw = r#"{"id":"1","lat":45,"lng":9,"createdAt":"2024-01-01T00:00:00Z","title":null}"#;
        let spot: Spot = serde_json::from_str(raw).unwrap();
        assert_eq!(spot, sample());
    }

    #[test]
    fn test_display_title_falls_back_when_blank() {
        let mut spot = sample();
        assert_eq!(spot.display_title(), UNTITLED_SPOT_LABEL);
        spot.title = Some("   ".to_string());
        assert_eq!(spot.display_title(), UNTITLED_SPOT_LABEL);
        spot.title = Some(" Bar Centrale ".to_string());
        assert_eq!(spot.display_title(), "Bar Centrale");
    }

    #[test]
    fn test_coordinates_label_uses_six_decimals() {
        assert_eq!(sample().coordinates_label(), "45.000000, 9.000000");
    }

    #[test]
    fn test_validate_rejects_bad_records() {
        let mut spot = sample();
        assert!(spot.validate().is_ok());

        spot.id = " ".into();
        assert!(matches!(spot.validate(), Err(Error::InvalidInput(_))));

        let mut spot = sample();
        spot.lat = 91.0;
        assert!(matches!(spot.validate(), Err(Error::InvalidInput(_))));

        let mut spot = sample();
        spot.accuracy = Some(-1.0);
        assert!(matches!(spot.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_patch_sets_and_clears_fields() {
        let mut spot = sample().with_note(Some("old".to_string()));

        SpotPatch::title(Some("  Home ".to_string())).apply(&mut spot);
        assert_eq!(spot.title.as_deref(), Some("Home"));
        assert_eq!(spot.note.as_deref(), Some("old"));

        SpotPatch::note(Some(String::new())).apply(&mut spot);
        assert_eq!(spot.note, None);

        SpotPatch::address_label("Via Roma 1, Milano").apply(&mut spot);
        assert_eq!(spot.address_label.as_deref(), Some("Via Roma 1, Milano"));
        assert_eq!(spot.title.as_deref(), Some("Home"));
    }

    #[test]
    fn test_empty_patch_changes_nothing() {
        let patch = SpotPatch::default();
        let mut spot = sample();
        patch.apply(&mut spot);
        assert_eq!(spot, sample());
    }
}
