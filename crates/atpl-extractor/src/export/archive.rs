//! Zip archive of several result documents.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use super::documents::ResultDocument;
use crate::error::ExportError;
use crate::model::ExtractionResult;

/// File name offered for bulk downloads.
pub const BULK_ARCHIVE_NAME: &str = "extraction_results.zip";

/// Builds a zip holding one JSON document per result.
///
/// Results sharing a file name are stored as `<job_id>_<file_name>`.
pub fn bulk_archive(results: &[ExtractionResult]) -> Result<Vec<u8>, ExportError> {
    if results.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .compression_level(Some(6));

    let mut used: HashSet<String> = HashSet::with_capacity(results.len());
    for result in results {
        let mut name = result.file_name.clone();
        if used.contains(&name) {
            name = format!("{}_{}", result.job_id, result.file_name);
        }
        if !used.insert(name.clone()) {
            name = format!("{}_{}", result.id, result.file_name);
            used.insert(name.clone());
        }

        writer.start_file(name.as_str(), options)?;
        writer.write_all(&ResultDocument::for_result(result).to_json()?)?;
    }

    let cursor = writer.finish()?;
    log::debug!("Built bulk archive with {} entries", results.len());
    Ok(cursor.into_inner())
}
