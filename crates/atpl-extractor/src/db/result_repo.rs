//! Result repository for `extraction_results`.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{format_timestamp, parse_timestamp, Database, DatabaseError};
use crate::model::ExtractionResult;

fn from_row(row: &Row<'_>) -> Result<ExtractionResult, rusqlite::Error> {
    let created_at: String = row.get("created_at")?;
    Ok(ExtractionResult {
        id: row.get("id")?,
        job_id: row.get("job_id")?,
        subject: row.get("subject")?,
        file_name: row.get("file_name")?,
        file_path: row.get("file_path")?,
        file_size: row.get("file_size")?,
        question_count: row.get("question_count")?,
        created_at: parse_timestamp(&created_at),
    })
}

pub fn insert_in(conn: &Connection, result: &ExtractionResult) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO extraction_results (id, job_id, subject, file_name, file_path,
         file_size, question_count, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            result.id,
            result.job_id,
            result.subject,
            result.file_name,
            result.file_path,
            result.file_size,
            result.question_count,
            format_timestamp(result.created_at),
        ],
    )?;
    Ok(())
}

/// Lists results newest first, optionally for one job.
pub fn list(
    db: &Database,
    job_id: Option<&str>,
    limit: u32,
) -> Result<Vec<ExtractionResult>, DatabaseError> {
    db.with_conn(|conn| {
        let rows = match job_id {
            Some(job_id) => {
                let mut stmt = conn.prepare(
                    "SELECT * FROM extraction_results WHERE job_id = ?1
                     ORDER BY created_at DESC, rowid DESC LIMIT ?2",
                )?;
                let rows = stmt
                    .query_map(params![job_id, limit], from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT * FROM extraction_results ORDER BY created_at DESC, rowid DESC LIMIT ?1",
                )?;
                let rows = stmt
                    .query_map(params![limit], from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };
        Ok(rows)
    })
}

pub fn find_by_id(db: &Database, id: &str) -> Result<Option<ExtractionResult>, DatabaseError> {
    db.with_conn(|conn| {
        let row = conn
            .query_row(
                "SELECT * FROM extraction_results WHERE id = ?1",
                params![id],
                from_row,
            )
            .optional()?;
        Ok(row)
    })
}

/// Loads the results whose ids appear in `ids`, keeping the order of `ids`.
/// Unknown ids are skipped.
pub fn find_many(db: &Database, ids: &[String]) -> Result<Vec<ExtractionResult>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM extraction_results WHERE id = ?1")?;
        let mut found = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(result) = stmt.query_row(params![id], from_row).optional()? {
                found.push(result);
            }
        }
        Ok(found)
    })
}

pub fn delete(db: &Database, id: &str) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let deleted = conn.execute("DELETE FROM extraction_results WHERE id = ?1", params![id])?;
        Ok(deleted == 1)
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::db::job_repo;
    use crate::model::{ExtractionJob, JobStatus};

    fn insert_job(db: &Database, id: &str) {
        let now = Utc::now();
        let job = ExtractionJob {
            id: id.to_string(),
            name: "Run".to_string(),
            status: JobStatus::Completed,
            database: Default::default(),
            subjects: "010,021".to_string(),
            username: "pilot".to_string(),
            total_questions: 2400,
            extracted_questions: 2400,
            failed_questions: 0,
            start_time: Some(now),
            end_time: Some(now),
            created_at: now,
            updated_at: now,
        };
        job_repo::insert(db, &job_repo::JobRow::from_job(&job)).unwrap();
    }

    fn insert_result(db: &Database, job_id: &str, subject: &str, offset_secs: i64) -> String {
        let mut result = ExtractionResult::for_subject(job_id, subject, 1200, "/results");
        result.created_at = Utc::now() + Duration::seconds(offset_secs);
        db.with_conn(|conn| insert_in(conn, &result)).unwrap();
        result.id
    }

    #[test]
    fn test_list_with_job_filter_and_limit() {
        let db = Database::open_in_memory().unwrap();
        insert_job(&db, "j1");
        insert_job(&db, "j2");
        insert_result(&db, "j1", "010", 0);
        insert_result(&db, "j1", "021", 1);
        insert_result(&db, "j2", "050", 2);

        let all = list(&db, None, 100).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].subject, "050");

        let j1 = list(&db, Some("j1"), 100).unwrap();
        assert_eq!(j1.len(), 2);
        assert_eq!(j1[0].subject, "021");

        assert_eq!(list(&db, None, 1).unwrap().len(), 1);
    }

    #[test]
    fn test_find_many_keeps_order_and_skips_unknown() {
        let db = Database::open_in_memory().unwrap();
        insert_job(&db, "j1");
        let a = insert_result(&db, "j1", "010", 0);
        let b = insert_result(&db, "j1", "021", 1);

        let found = find_many(&db, &[b.clone(), "nope".to_string(), a.clone()]).unwrap();
        let ids: Vec<String> = found.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![b, a]);
    }

    #[test]
    fn test_delete() {
        let db = Database::open_in_memory().unwrap();
        insert_job(&db, "j1");
        let id = insert_result(&db, "j1", "010", 0);

        assert!(find_by_id(&db, &id).unwrap().is_some());
        assert!(delete(&db, &id).unwrap());
        assert!(!delete(&db, &id).unwrap());
        assert!(find_by_id(&db, &id).unwrap().is_none());
    }
}
