use spots_core::maps::{open_in_maps, share_message, MapApp, SystemMapLauncher};

use crate::commands::common::{open_spot_service, resolve_spot_or_last, CliContext};
use crate::error::CliError;

pub async fn run_open(
    id: Option<&str>,
    app: Option<MapApp>,
    context: &CliContext,
) -> Result<(), CliError> {
    let service = open_spot_service(context).await?;
    let spot = resolve_spot_or_last(id, &service).await?;
    let app = app.unwrap_or_else(|| context.config.map_app());

    let opened = open_in_maps(&SystemMapLauncher, &spot, app).await?;
    println!("{opened}");
    Ok(())
}

pub async fn run_share(id: Option<&str>, context: &CliContext) -> Result<(), CliError> {
    let service = open_spot_service(context).await?;
    let spot = resolve_spot_or_last(id, &service).await?;

    println!("{}", share_message(&spot));
    Ok(())
}
