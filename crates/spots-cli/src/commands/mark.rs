use std::time::Duration;

use spots_core::location::FixedLocationProvider;
use spots_core::services::{MarkedSpot, SpotDraft};
use spots_core::Spot;

use crate::cli::MarkArgs;
use crate::commands::common::{format_spot_details, open_service, CliContext};
use crate::error::CliError;

pub async fn run_mark(args: MarkArgs, context: &CliContext) -> Result<(), CliError> {
    let location = FixedLocationProvider::new(args.lat, args.lng, args.accuracy);
    let service = open_service(context, location).await?;

    let marked = service
        .mark_spot(SpotDraft {
            title: args.title,
            note: args.note,
        })
        .await?;
    let spot = wait_for_enrichment(marked, context.config.enrichment_wait()).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&spot)?);
    } else {
        for line in format_spot_details(&spot) {
            println!("{line}");
        }
    }

    Ok(())
}

/// Give the address lookup a bounded amount of time before printing.
///
/// The spot is already saved; a slow or failed lookup only means the
/// address is missing from the output.
pub async fn wait_for_enrichment(marked: MarkedSpot, wait: Duration) -> Spot {
    let MarkedSpot { spot, enrichment } = marked;
    let Some(handle) = enrichment else {
        return spot;
    };
    if wait.is_zero() {
        return spot;
    }

    match tokio::time::timeout(wait, handle).await {
        Ok(Ok(Some(enriched))) => enriched,
        Ok(Ok(None)) => spot,
        Ok(Err(error)) => {
            tracing::warn!("Address lookup task failed: {error}");
            spot
        }
        Err(_) => {
            tracing::debug!("Address lookup still running after {wait:?}");
            spot
        }
    }
}
