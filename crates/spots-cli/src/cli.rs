use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use spots_core::export;
use spots_core::maps::MapApp;

#[derive(Parser)]
#[command(name = "spots")]
#[command(about = "Mark where you are and find your way back")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Optional path to the config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Skip address lookups for newly marked spots
    #[arg(long, global = true)]
    pub no_geocode: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Mark a position as a new spot
    #[command(alias = "add")]
    Mark(MarkArgs),
    /// Show the most recently saved spot
    Last {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List saved spots, most recent first
    List {
        /// Number of spots to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a single spot
    Show {
        /// Spot ID or unique ID prefix
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the title of a spot (clears it when no title is given)
    Rename {
        /// Spot ID or unique ID prefix
        id: String,
        /// New title
        title: Vec<String>,
    },
    /// Set the note of a spot (clears it when no text is given)
    Note {
        /// Spot ID or unique ID prefix
        id: String,
        /// Note text
        text: Vec<String>,
    },
    /// Delete a spot
    Delete {
        /// Spot ID or unique ID prefix
        id: String,
    },
    /// Delete every saved spot
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
    /// Open a spot in a map app (defaults to the last spot)
    Open {
        /// Spot ID or unique ID prefix
        id: Option<String>,
        /// Map app to use instead of the configured one
        #[arg(long, value_enum)]
        app: Option<MapAppArg>,
    },
    /// Print a shareable message for a spot (defaults to the last spot)
    Share {
        /// Spot ID or unique ID prefix
        id: Option<String>,
    },
    /// Export spots
    Export {
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Output file or directory (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct MarkArgs {
    /// Latitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,
    /// Longitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lng: f64,
    /// Accuracy radius in meters
    #[arg(long)]
    pub accuracy: Option<f64>,
    /// Optional title
    #[arg(short, long)]
    pub title: Option<String>,
    /// Optional note
    #[arg(short, long)]
    pub note: Option<String>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Markdown,
    Geojson,
}

impl From<ExportFormat> for export::ExportFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Json => Self::Json,
            ExportFormat::Markdown => Self::Markdown,
            ExportFormat::Geojson => Self::GeoJson,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum MapAppArg {
    Google,
    Apple,
    Geo,
    Browser,
}

impl From<MapAppArg> for MapApp {
    fn from(app: MapAppArg) -> Self {
        match app {
            MapAppArg::Google => Self::GoogleMaps,
            MapAppArg::Apple => Self::AppleMaps,
            MapAppArg::Geo => Self::Geo,
            MapAppArg::Browser => Self::Browser,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
