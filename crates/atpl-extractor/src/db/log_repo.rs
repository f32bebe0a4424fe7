//! Log repository for `extraction_logs`.

use rusqlite::{params, Connection, Row};

use super::{format_timestamp, parse_timestamp, Database, DatabaseError};
use crate::model::{ExtractionLog, LogFilter, LogLevel};

/// A raw log row from the database.
struct LogRow {
    id: String,
    job_id: String,
    level: String,
    message: String,
    details: Option<String>,
    timestamp: String,
}

impl LogRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            job_id: row.get("job_id")?,
            level: row.get("level")?,
            message: row.get("message")?,
            details: row.get("details")?,
            timestamp: row.get("timestamp")?,
        })
    }

    fn into_log(self) -> Result<ExtractionLog, DatabaseError> {
        let level = LogLevel::parse(&self.level).ok_or_else(|| DatabaseError::InvalidValue {
            column: "level",
            value: self.level.clone(),
        })?;
        Ok(ExtractionLog {
            id: self.id,
            job_id: self.job_id,
            level,
            message: self.message,
            details: self.details,
            timestamp: parse_timestamp(&self.timestamp),
        })
    }
}

/// Inserts a log entry.
pub fn insert(db: &Database, log: &ExtractionLog) -> Result<(), DatabaseError> {
    db.with_conn(|conn| insert_in(conn, log))
}

pub fn insert_in(conn: &Connection, log: &ExtractionLog) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO extraction_logs (id, job_id, level, message, details, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            log.id,
            log.job_id,
            log.level.as_str(),
            log.message,
            log.details,
            format_timestamp(log.timestamp),
        ],
    )?;
    Ok(())
}

/// Lists a job's logs oldest first, narrowed by `filter`.
pub fn list(
    db: &Database,
    job_id: &str,
    filter: &LogFilter,
) -> Result<Vec<ExtractionLog>, DatabaseError> {
    db.with_conn(|conn| {
        let mut conditions = vec!["job_id = ?1".to_string()];
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> =
            vec![Box::new(job_id.to_string())];

        if let Some(level) = filter.level {
            conditions.push(format!("level = ?{}", param_values.len() + 1));
            param_values.push(Box::new(level.as_str()));
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let idx = param_values.len() + 1;
            conditions.push(format!(
                "(message LIKE ?{idx} ESCAPE '\\' OR COALESCE(details, '') LIKE ?{idx} ESCAPE '\\')"
            ));
            param_values.push(Box::new(like_pattern(search.trim())));
        }

        let sql = format!(
            "SELECT * FROM extraction_logs WHERE {} ORDER BY timestamp ASC, rowid ASC",
            conditions.join(" AND ")
        );
        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_ref.as_slice(), LogRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(LogRow::into_log).collect()
    })
}

/// Deletes every log of a job. Returns the number of deleted rows.
pub fn clear(db: &Database, job_id: &str) -> Result<usize, DatabaseError> {
    db.with_conn(|conn| {
        let deleted = conn.execute(
            "DELETE FROM extraction_logs WHERE job_id = ?1",
            params![job_id],
        )?;
        Ok(deleted)
    })
}

/// Builds a `LIKE` pattern matching `needle` anywhere, with wildcards escaped.
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
