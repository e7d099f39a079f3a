use std::path::{Path, PathBuf};

use engine_logging::engine_info;
use gif_core::{AggregatedEntry, ExportFormat};

use crate::persist::{AtomicFileWriter, PersistError};

const EXPORT_FILE_PREFIX: &str = "gif-urls-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub entry_count: usize,
    pub format: ExportFormat,
    pub path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("nothing to export")]
    Empty,
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Serialize entries in their current order.
///
/// Text is one URL per line with no trailing newline; JSON is an array of
/// `{url, sources}` records with two-space indentation.
pub fn render_export(entries: &[AggregatedEntry], format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Text => Ok(entries
            .iter()
            .map(|entry| entry.url.as_str())
            .collect::<Vec<_>>()
            .join("\n")),
        ExportFormat::Json => Ok(serde_json::to_string_pretty(entries)?),
    }
}

/// Read a JSON export back into entries.
pub fn parse_json_export(text: &str) -> Result<Vec<AggregatedEntry>, ExportError> {
    Ok(serde_json::from_str(text)?)
}

/// `gif-urls-<unix-millis>.<ext>`
pub fn export_filename(format: ExportFormat, unix_millis: i64) -> String {
    format!("{EXPORT_FILE_PREFIX}{unix_millis}.{}", format.extension())
}

pub fn write_export(
    dir: &Path,
    entries: &[AggregatedEntry],
    format: ExportFormat,
    unix_millis: i64,
) -> Result<ExportSummary, ExportError> {
    if entries.is_empty() {
        return Err(ExportError::Empty);
    }

    let content = render_export(entries, format)?;
    let filename = export_filename(format, unix_millis);
    let writer = AtomicFileWriter::new(dir.to_path_buf());
    let path = writer.write(&filename, &content)?;
    engine_info!(
        "exported {} urls as {} to {:?}",
        entries.len(),
        format.mime_type(),
        path
    );

    Ok(ExportSummary {
        entry_count: entries.len(),
        format,
        path,
    })
}
