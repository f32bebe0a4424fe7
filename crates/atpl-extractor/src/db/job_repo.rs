//! Job repository: CRUD and status/counter updates for `extraction_jobs`.
//!
//! Status changes and counter updates are single conditional statements so
//! that HTTP handlers and simulation tasks never overwrite each other.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{format_timestamp, parse_timestamp, Database, DatabaseError};
use crate::catalog::QuestionDatabase;
use crate::model::{ExtractionJob, JobStatus};

/// A raw job row from the database.
#[derive(Debug, Clone)]
pub struct JobRow {
    pub id: String,
    pub name: String,
    pub status: String,
    pub database: String,
    pub subjects: String,
    pub username: String,
    pub total_questions: u32,
    pub extracted_questions: u32,
    pub failed_questions: u32,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl JobRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            status: row.get("status")?,
            database: row.get("database")?,
            subjects: row.get("subjects")?,
            username: row.get("username")?,
            total_questions: row.get("total_questions")?,
            extracted_questions: row.get("extracted_questions")?,
            failed_questions: row.get("failed_questions")?,
            start_time: row.get("start_time")?,
            end_time: row.get("end_time")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn from_job(job: &ExtractionJob) -> Self {
        Self {
            id: job.id.clone(),
            name: job.name.clone(),
            status: job.status.as_str().to_string(),
            database: job.database.as_str().to_string(),
            subjects: job.subjects.clone(),
            username: job.username.clone(),
            total_questions: job.total_questions,
            extracted_questions: job.extracted_questions,
            failed_questions: job.failed_questions,
            start_time: job.start_time.map(format_timestamp),
            end_time: job.end_time.map(format_timestamp),
            created_at: format_timestamp(job.created_at),
            updated_at: format_timestamp(job.updated_at),
        }
    }

    pub fn into_job(self) -> Result<ExtractionJob, DatabaseError> {
        let status = JobStatus::parse(&self.status).ok_or_else(|| DatabaseError::InvalidValue {
            column: "status",
            value: self.status.clone(),
        })?;
        let database =
            QuestionDatabase::parse(&self.database).ok_or_else(|| DatabaseError::InvalidValue {
                column: "database",
                value: self.database.clone(),
            })?;

        Ok(ExtractionJob {
            id: self.id,
            name: self.name,
            status,
            database,
            subjects: self.subjects,
            username: self.username,
            total_questions: self.total_questions,
            extracted_questions: self.extracted_questions,
            failed_questions: self.failed_questions,
            start_time: self.start_time.as_deref().map(parse_timestamp),
            end_time: self.end_time.as_deref().map(parse_timestamp),
            created_at: parse_timestamp(&self.created_at),
            updated_at: parse_timestamp(&self.updated_at),
        })
    }
}

/// A guarded status change: applied only while the row still has `from`.
#[derive(Debug, Clone)]
pub struct StatusChange<'a> {
    pub from: JobStatus,
    pub to: JobStatus,
    pub now: &'a str,
    /// Written only when the row has no start time yet.
    pub start_time: Option<&'a str>,
    pub end_time: Option<&'a str>,
}

/// Counters returned by [`apply_progress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressCounters {
    pub extracted: u32,
    pub failed: u32,
    pub total: u32,
}

/// Inserts a new job row.
pub fn insert(db: &Database, job: &JobRow) -> Result<(), DatabaseError> {
    db.with_conn(|conn| insert_in(conn, job))
}

pub fn insert_in(conn: &Connection, job: &JobRow) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO extraction_jobs (id, name, status, database, subjects, username,
         total_questions, extracted_questions, failed_questions, start_time, end_time,
         created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            job.id,
            job.name,
            job.status,
            job.database,
            job.subjects,
            job.username,
            job.total_questions,
            job.extracted_questions,
            job.failed_questions,
            job.start_time,
            job.end_time,
            job.created_at,
            job.updated_at,
        ],
    )?;
    Ok(())
}

/// Finds a job by its ID.
pub fn find_by_id(db: &Database, id: &str) -> Result<Option<JobRow>, DatabaseError> {
    db.with_conn(|conn| find_by_id_in(conn, id))
}

pub fn find_by_id_in(conn: &Connection, id: &str) -> Result<Option<JobRow>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT * FROM extraction_jobs WHERE id = ?1",
            params![id],
            JobRow::from_row,
        )
        .optional()?;
    Ok(row)
}

/// Lists jobs newest first.
pub fn list(db: &Database, limit: u32) -> Result<Vec<JobRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT * FROM extraction_jobs ORDER BY created_at DESC, rowid DESC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![limit], JobRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Lists every job currently in `status`.
pub fn list_by_status(db: &Database, status: JobStatus) -> Result<Vec<JobRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt =
            conn.prepare("SELECT * FROM extraction_jobs WHERE status = ?1 ORDER BY created_at")?;
        let rows = stmt
            .query_map(params![status.as_str()], JobRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Applies `change` if the stored status still equals `change.from`.
/// Returns false when another writer got there first.
pub fn compare_and_set_status(
    conn: &Connection,
    id: &str,
    change: &StatusChange<'_>,
) -> Result<bool, DatabaseError> {
    let updated = conn.execute(
        "UPDATE extraction_jobs
         SET status = ?3,
             updated_at = ?4,
             start_time = COALESCE(start_time, ?5),
             end_time = COALESCE(?6, end_time)
         WHERE id = ?1 AND status = ?2",
        params![
            id,
            change.from.as_str(),
            change.to.as_str(),
            change.now,
            change.start_time,
            change.end_time,
        ],
    )?;
    Ok(updated == 1)
}

/// Adds `extracted` (capped at the total) and `failed` to a running job's
/// counters in one statement. Returns `None` if the job is not running.
pub fn apply_progress(
    conn: &Connection,
    id: &str,
    extracted: u32,
    failed: u32,
    now: &str,
) -> Result<Option<ProgressCounters>, DatabaseError> {
    let counters = conn
        .query_row(
            "UPDATE extraction_jobs
             SET extracted_questions = MIN(extracted_questions + ?2, total_questions),
                 failed_questions = failed_questions + ?3,
                 updated_at = ?4
             WHERE id = ?1 AND status = 'running'
             RETURNING extracted_questions, failed_questions, total_questions",
            params![id, extracted, failed, now],
            |r| {
                Ok(ProgressCounters {
                    extracted: r.get(0)?,
                    failed: r.get(1)?,
                    total: r.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(counters)
}

/// Moves `count` questions from failed to extracted after successful retries.
pub fn credit_retries(
    conn: &Connection,
    id: &str,
    count: u32,
    now: &str,
) -> Result<bool, DatabaseError> {
    if count == 0 {
        return Ok(true);
    }
    let updated = conn.execute(
        "UPDATE extraction_jobs
         SET extracted_questions = MIN(extracted_questions + ?2, total_questions),
             failed_questions = MAX(failed_questions - ?2, 0),
             updated_at = ?3
         WHERE id = ?1",
        params![id, count, now],
    )?;
    Ok(updated == 1)
}
