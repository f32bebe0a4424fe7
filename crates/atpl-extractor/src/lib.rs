pub mod broadcast;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod jobs;
pub mod model;
pub mod retry;
pub mod service;
pub mod simulation;

pub use broadcast::{JobEventKind, JobProgressBroadcaster, JobProgressEvent, LogBroadcaster};
pub use config::{load_config, resolve_config, Config};
pub use db::Database;
pub use error::{ConfigError, ExportError, ExtractorError, JobError, Result};
pub use jobs::{JobStats, JobStore};
pub use service::{Download, ExtractionService};
pub use simulation::SimulationConfig;
