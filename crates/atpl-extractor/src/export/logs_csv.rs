//! CSV export of a job's log.

use csv::{QuoteStyle, WriterBuilder};

use crate::db::format_timestamp;
use crate::error::ExportError;
use crate::model::ExtractionLog;

/// Renders logs as CSV with every field quoted.
pub fn logs_csv(logs: &[ExtractionLog]) -> Result<Vec<u8>, ExportError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    writer.write_record(["Timestamp", "Level", "Message", "Details"])?;
    for entry in logs {
        writer.write_record([
            format_timestamp(entry.timestamp).as_str(),
            entry.level.as_str(),
            entry.message.as_str(),
            entry.details.as_deref().unwrap_or(""),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}

/// Download name for a job's log export.
pub fn logs_file_name(job_id: &str) -> String {
    format!("extraction-logs-{}.csv", job_id)
}
