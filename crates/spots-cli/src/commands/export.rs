use std::path::{Path, PathBuf};

use chrono::Utc;
use spots_core::export::{render_spots_export, suggested_export_file_name};

use crate::cli::ExportFormat;
use crate::commands::common::{open_spot_service, write_output, CliContext};
use crate::error::CliError;

pub async fn run_export(
    format: ExportFormat,
    output_path: Option<&Path>,
    context: &CliContext,
) -> Result<(), CliError> {
    let service = open_spot_service(context).await?;
    let spots = service.list_spots().await?;
    let rendered = render_spots_export(&spots, format.into())?;

    let now_ms = Utc::now().timestamp_millis();
    let output_path = output_path.map(|path| resolve_export_path(path, format, now_ms));
    write_output(&rendered, output_path.as_deref())
}

/// Exporting into a directory picks a timestamped file name inside it.
pub fn resolve_export_path(path: &Path, format: ExportFormat, timestamp_ms: i64) -> PathBuf {
    if path.is_dir() {
        path.join(suggested_export_file_name(format.into(), timestamp_ms))
    } else {
        path.to_path_buf()
    }
}
