//! Data models for Spots

mod position;
mod spot;

pub use position::{AccuracyTier, Position};
pub use spot::{Spot, SpotId, SpotPatch, UNTITLED_SPOT_LABEL};
