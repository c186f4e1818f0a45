//! Services layer for client front-ends.

mod enrichment;
mod spots;

pub use enrichment::enrich_spot;
pub use spots::{MarkedSpot, SpotDraft, SpotService};
