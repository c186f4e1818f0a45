use crate::commands::common::{
    format_spot_details, format_spot_lines, open_spot_service, resolve_spot_in_store,
    spot_to_list_item, CliContext, SpotListItem,
};
use crate::error::CliError;

pub async fn run_list(limit: usize, as_json: bool, context: &CliContext) -> Result<(), CliError> {
    let service = open_spot_service(context).await?;
    let mut spots = service.list_spots().await?;
    spots.truncate(limit);

    if as_json {
        let json_items = spots
            .iter()
            .map(spot_to_list_item)
            .collect::<Vec<SpotListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if spots.is_empty() {
        println!("No spots saved yet");
    } else {
        for line in format_spot_lines(&spots) {
            println!("{line}");
        }
    }

    Ok(())
}

pub async fn run_last(as_json: bool, context: &CliContext) -> Result<(), CliError> {
    let service = open_spot_service(context).await?;
    let spot = service.last_spot().await?.ok_or(CliError::NoSpots)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&spot)?);
    } else {
        for line in format_spot_details(&spot) {
            println!("{line}");
        }
    }

    Ok(())
}

pub async fn run_show(id: &str, as_json: bool, context: &CliContext) -> Result<(), CliError> {
    let service = open_spot_service(context).await?;
    let spot = resolve_spot_in_store(id, &service).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&spot)?);
    } else {
        for line in format_spot_details(&spot) {
            println!("{line}");
        }
    }

    Ok(())
}
