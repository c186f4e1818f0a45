use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] spots_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Spot ID cannot be empty")]
    EmptySpotId,
    #[error("Spot not found for id/prefix: {0}")]
    SpotNotFound(String),
    #[error("{0}")]
    AmbiguousSpotId(String),
    #[error("No spots saved yet")]
    NoSpots,
    #[error("Refusing to {0} without --yes")]
    ConfirmationRequired(&'static str),
    #[error("Configuration error: {0}")]
    Config(String),
}
