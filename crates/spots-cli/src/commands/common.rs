use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use spots_core::config::{SpotsConfig, CONFIG_FILE_NAME};
use spots_core::db::LibSqlKeyValueStore;
use spots_core::geocode::{Geocoder, NominatimGeocoder, NoopGeocoder};
use spots_core::location::FixedLocationProvider;
use spots_core::maps::MapLinks;
use spots_core::services::SpotService;
use spots_core::Spot;

use crate::error::CliError;

const SHORT_ID_LEN: usize = 13;

/// Spot service as wired by the CLI
pub type CliSpotService = SpotService<LibSqlKeyValueStore, FixedLocationProvider, CliGeocoder>;

/// Settings resolved from flags, environment, and the config file
#[derive(Debug, Clone)]
pub struct CliContext {
    pub db_path: PathBuf,
    pub config: SpotsConfig,
    pub geocoding: bool,
}

impl CliContext {
    pub fn load(
        cli_db_path: Option<PathBuf>,
        cli_config_path: Option<PathBuf>,
        no_geocode: bool,
    ) -> Result<Self, CliError> {
        let config_path = match cli_config_path {
            Some(path) => path,
            None => default_config_path()?,
        };
        let config = SpotsConfig::load_from_path(&config_path)?.with_env_overrides()?;
        let db_path = resolve_db_path(cli_db_path, &config)?;
        let geocoding = config.geocoder_enabled() && !no_geocode;

        Ok(Self {
            db_path,
            config,
            geocoding,
        })
    }
}

/// Geocoder selected from configuration
#[derive(Debug, Clone)]
pub enum CliGeocoder {
    Nominatim(NominatimGeocoder),
    Disabled(NoopGeocoder),
}

impl CliGeocoder {
    pub fn from_context(context: &CliContext) -> Result<Self, CliError> {
        if !context.geocoding {
            return Ok(Self::Disabled(NoopGeocoder));
        }

        let geocoder = NominatimGeocoder::new(
            &context.config.geocoder_url(),
            context.config.geocoder_timeout(),
        )?;
        Ok(Self::Nominatim(geocoder))
    }
}

impl Geocoder for CliGeocoder {
    async fn reverse_geocode(&self, lat: f64, lng: f64) -> spots_core::Result<Option<String>> {
        match self {
            Self::Nominatim(geocoder) => geocoder.reverse_geocode(lat, lng).await,
            Self::Disabled(geocoder) => geocoder.reverse_geocode(lat, lng).await,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SpotListItem {
    pub id: String,
    pub title: String,
    pub lat: f64,
    pub lng: f64,
    pub created_at: String,
    pub relative_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub map_url: String,
}

pub async fn open_service(
    context: &CliContext,
    location: FixedLocationProvider,
) -> Result<CliSpotService, CliError> {
    let geocoder = CliGeocoder::from_context(context)?;
    let service = SpotService::open_path(context.db_path.clone(), location, geocoder)
        .await?
        .with_enrichment(context.geocoding);
    Ok(service)
}

/// Service for commands that never request a position fix
pub async fn open_spot_service(context: &CliContext) -> Result<CliSpotService, CliError> {
    open_service(context, FixedLocationProvider::unavailable()).await
}

/// Find a spot by exact id or unique id prefix.
pub fn resolve_spot<'a>(query: &str, spots: &'a [Spot]) -> Result<&'a Spot, CliError> {
    if let Some(spot) = spots.iter().find(|spot| spot.id.as_str() == query) {
        return Ok(spot);
    }

    let matches = spots
        .iter()
        .filter(|spot| spot.id.as_str().starts_with(query))
        .collect::<Vec<_>>();

    match matches.as_slice() {
        [] => Err(CliError::SpotNotFound(query.to_string())),
        [spot] => Ok(*spot),
        _ => {
            let options = matches
                .iter()
                .take(3)
                .map(|spot| short_id(spot))
                .collect::<Vec<_>>()
                .join(", ");

            Err(CliError::AmbiguousSpotId(format!(
                "ID prefix '{query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

pub async fn resolve_spot_in_store(
    query: &str,
    service: &CliSpotService,
) -> Result<Spot, CliError> {
    let normalized = normalize_spot_identifier(query)?;
    let spots = service.list_spots().await?;
    resolve_spot(&normalized, &spots).cloned()
}

/// Resolve an optional id, falling back to the last saved spot.
pub async fn resolve_spot_or_last(
    query: Option<&str>,
    service: &CliSpotService,
) -> Result<Spot, CliError> {
    match query {
        Some(query) => resolve_spot_in_store(query, service).await,
        None => service.last_spot().await?.ok_or(CliError::NoSpots),
    }
}

pub fn short_id(spot: &Spot) -> String {
    spot.id.as_str().chars().take(SHORT_ID_LEN).collect()
}

pub fn format_spot_lines(spots: &[Spot]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    spots
        .iter()
        .map(|spot| {
            let short_id = short_id(spot);
            let title = truncate(spot.display_title(), 30);
            let coordinates = spot.coordinates_label();
            let when = spot_relative_time(spot, now_ms);

            match spot.address_label.as_deref() {
                Some(address) => format!(
                    "{short_id:<13}  {title:<30}  {coordinates:<23}  {when:<10}  {}",
                    truncate(address, 40)
                ),
                None => format!("{short_id:<13}  {title:<30}  {coordinates:<23}  {when}"),
            }
        })
        .collect()
}

pub fn format_spot_details(spot: &Spot) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    let mut lines = vec![
        format!("id:       {}", spot.id),
        format!("title:    {}", spot.display_title()),
        format!("coords:   {}", spot.coordinates_label()),
    ];
    if let Some(accuracy) = spot.accuracy {
        lines.push(format!("accuracy: ±{accuracy:.0} m"));
    }
    if let Some(address) = &spot.address_label {
        lines.push(format!("address:  {address}"));
    }
    if let Some(note) = &spot.note {
        lines.push(format!("note:     {note}"));
    }
    let created = spot.created_at_utc().map_or_else(
        || spot.created_at.clone(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    );
    lines.push(format!(
        "created:  {created} ({})",
        spot_relative_time(spot, now_ms)
    ));
    lines.push(format!("map:      {}", MapLinks::for_spot(spot).web));
    lines
}

pub fn spot_to_list_item(spot: &Spot) -> SpotListItem {
    let now_ms = Utc::now().timestamp_millis();
    SpotListItem {
        id: spot.id.to_string(),
        title: spot.display_title().to_string(),
        lat: spot.lat,
        lng: spot.lng,
        created_at: spot.created_at.clone(),
        relative_time: spot_relative_time(spot, now_ms),
        accuracy: spot.accuracy,
        note: spot.note.clone(),
        address: spot.address_label.clone(),
        map_url: MapLinks::for_spot(spot).web,
    }
}

fn spot_relative_time(spot: &Spot, now_ms: i64) -> String {
    spot.created_at_utc().map_or_else(
        || "unknown".to_string(),
        |date_time| format_relative_time(date_time.timestamp_millis(), now_ms),
    )
}

pub fn truncate(value: &str, max_chars: usize) -> String {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

/// Join free-form words; blank input means "clear the field".
pub fn normalize_text(parts: &[String]) -> Option<String> {
    let joined = parts.join(" ");
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn normalize_spot_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptySpotId)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn write_output(rendered: &str, output_path: Option<&Path>) -> Result<(), CliError> {
    if let Some(path) = output_path {
        std::fs::write(path, rendered)?;
        println!("{}", path.display());
    } else {
        println!("{rendered}");
    }
    Ok(())
}

fn resolve_db_path(cli_db_path: Option<PathBuf>, config: &SpotsConfig) -> Result<PathBuf, CliError> {
    match cli_db_path.or_else(|| config.db_path.clone()) {
        Some(path) => Ok(path),
        None => default_db_path(),
    }
}

pub fn default_db_path() -> Result<PathBuf, CliError> {
    dirs::data_dir()
        .map(|dir| dir.join("spots").join("spots.db"))
        .ok_or_else(|| CliError::Config("failed to resolve data directory".to_string()))
}

pub fn default_config_path() -> Result<PathBuf, CliError> {
    dirs::config_dir()
        .map(|dir| dir.join("spots").join(CONFIG_FILE_NAME))
        .ok_or_else(|| CliError::Config("failed to resolve config directory".to_string()))
}
