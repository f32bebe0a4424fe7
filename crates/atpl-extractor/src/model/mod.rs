//! Domain records shared by the store, the simulation and the HTTP layer.

pub mod failed;
pub mod job;
pub mod log;
pub mod result;
pub mod settings;

pub use failed::FailedQuestion;
pub use job::{CreateJobRequest, Credentials, ExtractionJob, JobAction, JobStatus};
pub use log::{ExtractionLog, LogFilter, LogLevel};
pub use result::ExtractionResult;
pub use settings::{MediaDownloadFormat, OutputFormat, SpreadsheetLayout, UserSettings};
