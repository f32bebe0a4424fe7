//! Job lifecycle: creation, status changes, progress and live stats.

pub mod stats;
pub mod store;

pub use stats::JobStats;
pub use store::{JobStore, NewFailure, ProgressOutcome, JOB_LIST_LIMIT};
