use crate::commands::common::{
    normalize_text, open_spot_service, resolve_spot_in_store, CliContext,
};
use crate::error::CliError;

pub async fn run_rename(id: &str, title: &[String], context: &CliContext) -> Result<(), CliError> {
    let service = open_spot_service(context).await?;
    let spot = resolve_spot_in_store(id, &service).await?;

    let updated = service
        .rename_spot(&spot.id, normalize_text(title))
        .await?
        .ok_or_else(|| CliError::SpotNotFound(id.to_string()))?;
    println!("{}", updated.id);
    Ok(())
}

pub async fn run_note(id: &str, text: &[String], context: &CliContext) -> Result<(), CliError> {
    let service = open_spot_service(context).await?;
    let spot = resolve_spot_in_store(id, &service).await?;

    let updated = service
        .annotate_spot(&spot.id, normalize_text(text))
        .await?
        .ok_or_else(|| CliError::SpotNotFound(id.to_string()))?;
    println!("{}", updated.id);
    Ok(())
}
