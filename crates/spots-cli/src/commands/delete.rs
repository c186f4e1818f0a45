use crate::commands::common::{open_spot_service, resolve_spot_in_store, CliContext};
use crate::error::CliError;

pub async fn run_delete(id: &str, context: &CliContext) -> Result<(), CliError> {
    let service = open_spot_service(context).await?;
    let spot = resolve_spot_in_store(id, &service).await?;

    service.delete_spot(&spot.id).await?;
    println!("{}", spot.id);
    Ok(())
}

pub async fn run_clear(confirmed: bool, context: &CliContext) -> Result<(), CliError> {
    if !confirmed {
        return Err(CliError::ConfirmationRequired("delete every spot"));
    }

    let service = open_spot_service(context).await?;
    let count = service.list_spots().await?.len();
    service.clear_spots().await?;
    println!("Deleted {count} spot(s)");
    Ok(())
}
