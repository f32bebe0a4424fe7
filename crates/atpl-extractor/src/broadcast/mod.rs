//! Broadcasting modules for real-time event streaming.
//!
//! Job state changes and job log entries are fanned out to any number of
//! subscribers, such as the HTTP event stream.

pub mod job_progress;
pub mod log_broadcaster;

pub use job_progress::{JobEventKind, JobProgressBroadcaster, JobProgressEvent};
pub use log_broadcaster::LogBroadcaster;
