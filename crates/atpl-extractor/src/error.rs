use std::path::PathBuf;
use thiserror::Error;

use crate::model::{JobAction, JobStatus};

#[derive(Error, Debug)]
pub enum ExtractorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Job error: {0}")]
    Job(#[from] JobError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Database error: {0}")]
    Database(#[from] crate::db::DatabaseError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },
}

#[derive(Error, Debug)]
pub enum JobError {
    #[error("Job not found: {0}")]
    NotFound(String),

    #[error("Result not found: {0}")]
    ResultNotFound(String),

    #[error("Question {question_id} not found for job {job_id}")]
    QuestionNotFound { job_id: String, question_id: String },

    #[error("Cannot {action} job {job_id} while it is {from}")]
    InvalidTransition {
        job_id: String,
        from: JobStatus,
        action: JobAction,
    },

    #[error("Job {0} was modified concurrently, try again")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Nothing to export")]
    Empty,

    #[error("Failed to build archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to serialize document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error while exporting: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExtractorError>;
