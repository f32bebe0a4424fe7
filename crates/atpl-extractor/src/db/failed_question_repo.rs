//! Failed question repository for `failed_questions`.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{format_timestamp, parse_timestamp, Database, DatabaseError};
use crate::model::FailedQuestion;

fn from_row(row: &Row<'_>) -> Result<FailedQuestion, rusqlite::Error> {
    let timestamp: String = row.get("timestamp")?;
    Ok(FailedQuestion {
        id: row.get("id")?,
        job_id: row.get("job_id")?,
        question_id: row.get("question_id")?,
        subject: row.get("subject")?,
        url: row.get("url")?,
        error: row.get("error")?,
        retry_count: row.get("retry_count")?,
        timestamp: parse_timestamp(&timestamp),
    })
}

pub fn insert_in(conn: &Connection, question: &FailedQuestion) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO failed_questions (id, job_id, question_id, subject, url, error,
         retry_count, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            question.id,
            question.job_id,
            question.question_id,
            question.subject,
            question.url,
            question.error,
            question.retry_count,
            format_timestamp(question.timestamp),
        ],
    )?;
    Ok(())
}

/// Inserts a failed question.
pub fn insert(db: &Database, question: &FailedQuestion) -> Result<(), DatabaseError> {
    db.with_conn(|conn| insert_in(conn, question))
}

/// Lists a job's failed questions, most recent first.
pub fn list_by_job(db: &Database, job_id: &str) -> Result<Vec<FailedQuestion>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT * FROM failed_questions WHERE job_id = ?1
             ORDER BY timestamp DESC, rowid DESC",
        )?;
        let rows = stmt
            .query_map(params![job_id], from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Finds the failed record for `question_id` within a job.
pub fn find_by_question(
    conn: &Connection,
    job_id: &str,
    question_id: &str,
) -> Result<Option<FailedQuestion>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT * FROM failed_questions WHERE job_id = ?1 AND question_id = ?2
             ORDER BY rowid LIMIT 1",
            params![job_id, question_id],
            from_row,
        )
        .optional()?;
    Ok(row)
}

/// Bumps the retry counter and returns its new value.
pub fn increment_retry(conn: &Connection, id: &str) -> Result<u32, DatabaseError> {
    let count = conn.query_row(
        "UPDATE failed_questions SET retry_count = retry_count + 1 WHERE id = ?1
         RETURNING retry_count",
        params![id],
        |r| r.get(0),
    )?;
    Ok(count)
}

pub fn delete(conn: &Connection, id: &str) -> Result<bool, DatabaseError> {
    let deleted = conn.execute("DELETE FROM failed_questions WHERE id = ?1", params![id])?;
    Ok(deleted == 1)
}
