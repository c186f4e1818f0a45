//! Spot export helpers shared by clients.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::maps::MapLinks;
use crate::Spot;

/// Export output format shared by all clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Markdown,
    GeoJson,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
            Self::GeoJson => "geojson",
        }
    }
}

/// Flat spot representation used in JSON and Markdown exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSpot {
    pub id: String,
    pub title: String,
    pub lat: f64,
    pub lng: f64,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub map_url: String,
}

#[must_use]
pub fn spot_to_export_item(spot: &Spot) -> ExportSpot {
    ExportSpot {
        id: spot.id.to_string(),
        title: spot.display_title().to_string(),
        lat: spot.lat,
        lng: spot.lng,
        created_at: spot.created_at.clone(),
        accuracy: spot.accuracy,
        note: spot.note.clone(),
        address: spot.address_label.clone(),
        map_url: MapLinks::for_spot(spot).web,
    }
}

/// Render spots as pretty-printed JSON.
pub fn render_json_export(spots: &[Spot]) -> serde_json::Result<String> {
    let items = spots
        .iter()
        .map(spot_to_export_item)
        .collect::<Vec<ExportSpot>>();
    serde_json::to_string_pretty(&items)
}

/// Render spots in Markdown with frontmatter blocks.
///
/// Free-text frontmatter values are written as double-quoted scalars.
pub fn render_markdown_export(spots: &[Spot]) -> serde_json::Result<String> {
    let mut output = String::new();

    for (index, spot) in spots.iter().enumerate() {
        if index > 0 {
            output.push('\n');
        }

        let item = spot_to_export_item(spot);
        let _ = writeln!(output, "---");
        let _ = writeln!(output, "id: {}", quoted(&item.id)?);
        let _ = writeln!(output, "lat: {}", item.lat);
        let _ = writeln!(output, "lng: {}", item.lng);
        let _ = writeln!(output, "created_at: {}", quoted(&item.created_at)?);
        if let Some(accuracy) = item.accuracy {
            let _ = writeln!(output, "accuracy: {accuracy}");
        }
        if let Some(address) = &item.address {
            let _ = writeln!(output, "address: {}", quoted(address)?);
        }
        let _ = writeln!(output, "---");
        let _ = writeln!(output);
        let _ = writeln!(output, "# {}", single_line(&item.title));
        let _ = writeln!(output);
        if let Some(note) = &item.note {
            let _ = writeln!(output, "{note}");
            let _ = writeln!(output);
        }
        let _ = writeln!(output, "[Open in maps]({})", item.map_url);
    }

    Ok(output)
}

// JSON strings are valid YAML double-quoted scalars
fn quoted(value: &str) -> serde_json::Result<String> {
    serde_json::to_string(value)
}

fn single_line(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Render spots as a GeoJSON `FeatureCollection` of points.
pub fn render_geojson_export(spots: &[Spot]) -> serde_json::Result<String> {
    let features = spots
        .iter()
        .map(|spot| {
            let item = spot_to_export_item(spot);
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [item.lng, item.lat],
                },
                "properties": {
                    "id": item.id,
                    "title": item.title,
                    "createdAt": item.created_at,
                    "accuracy": item.accuracy,
                    "note": item.note,
                    "address": item.address,
                },
            })
        })
        .collect::<Vec<_>>();

    serde_json::to_string_pretty(&json!({
        "type": "FeatureCollection",
        "features": features,
    }))
}

/// Render spots based on selected export format.
pub fn render_spots_export(spots: &[Spot], format: ExportFormat) -> serde_json::Result<String> {
    match format {
        ExportFormat::Json => render_json_export(spots),
        ExportFormat::Markdown => render_markdown_export(spots),
        ExportFormat::GeoJson => render_geojson_export(spots),
    }
}

/// Default file name used when exporting into a directory.
#[must_use]
pub fn suggested_export_file_name(format: ExportFormat, timestamp_ms: i64) -> String {
    format!("spots-export-{timestamp_ms}.{}", format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn spot() -> Spot {
        let mut spot = Spot::new(45.5, 9.25);
        spot.id = "cccccccc-cccc-7ccc-8ccc-111111111111".into();
        spot.created_at = "2024-05-01T10:00:00.000Z".to_string();
        spot.title = Some("Car".to_string());
        spot.note = Some("Level -2, pillar B4".to_string());
        spot.address_label = Some("Via Roma 1, Milano".to_string());
        spot
    }

    #[test]
    fn export_item_uses_display_title_fallback() {
        let mut spot = spot();
        spot.title = None;
        assert_eq!(spot_to_export_item(&spot).title, "Saved spot");
    }

    #[test]
    fn render_markdown_export_includes_frontmatter_and_content() {
        let rendered = render_markdown_export(&[spot()]).unwrap();
        assert!(rendered.contains("id: \"cccccccc-cccc-7ccc-8ccc-111111111111\""));
        assert!(rendered.contains("lat: 45.5\nlng: 9.25"));
        assert!(rendered.contains("created_at: \"2024-05-01T10:00:00.000Z\""));
        assert!(rendered.contains("address: \"Via Roma 1, Milano\""));
        assert!(rendered.contains("# Car\n\nLevel -2, pillar B4\n"));
        assert!(rendered.contains(
            "[Open in maps](https://www.google.com/maps/search/?api=1&query=45.5%2C9.25)"
        ));
    }

    #[test]
    fn render_markdown_export_quotes_free_text() {
        let mut spot = spot();
        spot.title = Some("Car\n# not a heading".to_string());
        spot.address_label = Some("Via Roma: 1 \"B\"".to_string());
        let rendered = render_markdown_export(&[spot]).unwrap();

        assert!(rendered.contains("address: \"Via Roma: 1 \\\"B\\\"\"\n"));
        assert!(rendered.contains("\n# Car # not a heading\n"));
        assert!(!rendered.contains("\n# not a heading"));
    }

    #[test]
    fn render_json_export_skips_missing_fields() {
        let mut spot = spot();
        spot.note = None;
        let rendered = render_json_export(&[spot]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value[0]["title"], "Car");
        assert_eq!(value[0]["lat"], 45.5);
        assert!(value[0].get("note").is_none());
        assert!(value[0].get("accuracy").is_none());
    }

    #[test]
    fn render_geojson_export_orders_coordinates_lng_lat() {
        let rendered = render_geojson_export(&[spot()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value["type"], "FeatureCollection");
        let feature = &value["features"][0];
        assert_eq!(feature["geometry"]["coordinates"], json!([9.25, 45.5]));
        assert_eq!(feature["properties"]["title"], "Car");
        assert_eq!(feature["properties"]["createdAt"], "2024-05-01T10:00:00.000Z");
    }

    #[test]
    fn render_empty_exports() {
        assert_eq!(render_json_export(&[]).unwrap(), "[]");
        assert_eq!(render_markdown_export(&[]).unwrap(), "");
        let geojson: serde_json::Value =
            serde_json::from_str(&render_geojson_export(&[]).unwrap()).unwrap();
        assert_eq!(geojson["features"], json!([]));
    }

    #[test]
    fn suggested_export_file_name_uses_format_extension() {
        assert_eq!(
            suggested_export_file_name(ExportFormat::Json, 123),
            "spots-export-123.json"
        );
        assert_eq!(
            suggested_export_file_name(ExportFormat::Markdown, 456),
            "spots-export-456.md"
        );
        assert_eq!(
            suggested_export_file_name(ExportFormat::GeoJson, 789),
            "spots-export-789.geojson"
        );
    }
}
