use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The parent directory of the database file could not be created.
    #[error("Cannot create database directory '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Schema migration v{version} failed: {reason}")]
    Migration { version: u32, reason: String },

    /// A stored enum column holds a value this build does not know, e.g. a
    /// job status written by a newer release.
    #[error("Unrecognised {column} value '{value}'")]
    InvalidValue { column: &'static str, value: String },

    #[error("Database connection lock poisoned by a panicking thread")]
    LockPoisoned,
}
