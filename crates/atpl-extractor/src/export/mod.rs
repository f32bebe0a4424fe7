//! Downloadable artifacts: result documents, bulk archives and log exports.

pub mod archive;
pub mod documents;
pub mod logs_csv;

pub use archive::{bulk_archive, BULK_ARCHIVE_NAME};
pub use documents::{attachment_header, ResultDocument, ResultPreview};
pub use logs_csv::{logs_csv, logs_file_name};
