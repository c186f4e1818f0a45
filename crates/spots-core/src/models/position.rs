//! Position fixes handed over by a location provider

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Accuracy requested from the location provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccuracyTier {
    /// Best available fix, slower and more power hungry
    High,
    /// Good enough for marking a place
    #[default]
    Balanced,
}

/// A single coordinate fix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
    /// Radius estimate in meters, when the provider reports one
    pub accuracy: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl Position {
    /// A fix taken now
    #[must_use]
    pub fn now(lat: f64, lng: f64, accuracy: Option<f64>) -> Self {
        Self {
            lat,
            lng,
            accuracy,
            timestamp: Utc::now(),
        }
    }
}
