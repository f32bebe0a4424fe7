//! Retrying failed questions.
//!
//! A retry is a coin flip. On success the failed record is removed and the
//! job's counters move one question from failed to extracted.

use chrono::Utc;
use serde::Serialize;

use crate::broadcast::{JobEventKind, JobProgressEvent};
use crate::db::{failed_question_repo, format_timestamp, job_repo, log_repo, DatabaseError};
use crate::error::{JobError, Result};
use crate::jobs::JobStore;
use crate::model::{ExtractionLog, LogLevel};
use crate::simulation::OutcomeSource;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct RetryOutcome {
    pub success: bool,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct BatchRetryOutcome {
    pub success_count: u32,
    pub failure_count: u32,
}

/// Result of one attempt inside a transaction.
enum Attempt {
    Missing,
    Done { success: bool },
}

/// Retries one failed question of a job.
pub fn retry_question(
    store: &JobStore,
    job_id: &str,
    question_id: &str,
    source: &mut dyn OutcomeSource,
    success_probability: f64,
) -> Result<RetryOutcome> {
    store.get_job(job_id)?;
    let success = source.chance(success_probability);
    let now = format_timestamp(Utc::now());

    let (attempt, entries) = store.database().with_transaction(|conn| {
        let mut entries = Vec::new();
        let Some(question) = failed_question_repo::find_by_question(conn, job_id, question_id)?
        else {
            return Ok((Attempt::Missing, entries));
        };

        let attempt_no = failed_question_repo::increment_retry(conn, &question.id)?;
        entries.push(
            ExtractionLog::new(
                job_id,
                LogLevel::Info,
                format!("Retrying failed question: {}", question_id),
            )
            .with_details(format!("Attempt #{}", attempt_no)),
        );

        if success {
            failed_question_repo::delete(conn, &question.id)?;
            job_repo::credit_retries(conn, job_id, 1, &now)?;
            entries.push(ExtractionLog::new(
                job_id,
                LogLevel::Info,
                format!("Question {} extracted successfully on retry", question_id),
            ));
        } else {
            entries.push(
                ExtractionLog::new(
                    job_id,
                    LogLevel::Warning,
                    format!("Retry failed for question {}", question_id),
                )
                .with_details("Question still failing after retry attempt"),
            );
        }

        for entry in &entries {
            log_repo::insert_in(conn, entry)?;
        }
        Ok((Attempt::Done { success }, entries))
    })?;

    let Attempt::Done { success } = attempt else {
        return Err(JobError::QuestionNotFound {
            job_id: job_id.to_string(),
            question_id: question_id.to_string(),
        }
        .into());
    };

    log::info!(
        "Retry of question {} in job {}: {}",
        question_id,
        job_id,
        if success { "succeeded" } else { "failed" }
    );
    for entry in entries {
        store.logs().send(entry);
    }
    if success {
        announce_counters(store, job_id);
    }
    Ok(RetryOutcome { success })
}

/// Retries a batch of failed questions. Ids with no failed record are
/// skipped and counted in neither total.
pub fn retry_all(
    store: &JobStore,
    job_id: &str,
    question_ids: &[String],
    source: &mut dyn OutcomeSource,
    success_probability: f64,
) -> Result<BatchRetryOutcome> {
    store.get_job(job_id)?;
    store.log(ExtractionLog::new(
        job_id,
        LogLevel::Info,
        format!("Starting batch retry of {} questions", question_ids.len()),
    ))?;

    let mut outcome = BatchRetryOutcome::default();
    for question_id in question_ids {
        let success = source.chance(success_probability);
        let attempt = store.database().with_transaction(|conn| {
            let Some(question) =
                failed_question_repo::find_by_question(conn, job_id, question_id)?
            else {
                return Ok(Attempt::Missing);
            };
            failed_question_repo::increment_retry(conn, &question.id)?;
            if success {
                failed_question_repo::delete(conn, &question.id)?;
            }
            Ok::<_, DatabaseError>(Attempt::Done { success })
        });

        match attempt {
            Ok(Attempt::Missing) => {}
            Ok(Attempt::Done { success: true }) => outcome.success_count += 1,
            Ok(Attempt::Done { success: false }) => outcome.failure_count += 1,
            Err(e) => {
                log::error!("Error retrying question {} in job {}: {}", question_id, job_id, e);
                outcome.failure_count += 1;
            }
        }
    }

    if outcome.success_count > 0 {
        let now = format_timestamp(Utc::now());
        store
            .database()
            .with_conn(|conn| job_repo::credit_retries(conn, job_id, outcome.success_count, &now))?;
        announce_counters(store, job_id);
    }

    store.log(ExtractionLog::new(
        job_id,
        LogLevel::Info,
        format!(
            "Batch retry completed: {} success, {} failures",
            outcome.success_count, outcome.failure_count
        ),
    ))?;
    log::info!(
        "Batch retry for job {}: {} success, {} failures",
        job_id,
        outcome.success_count,
        outcome.failure_count
    );
    Ok(outcome)
}

fn announce_counters(store: &JobStore, job_id: &str) {
    match store.get_job(job_id) {
        Ok(job) => store.progress().send(JobProgressEvent::from_job(
            JobEventKind::Progress,
            &job,
            "Counters updated after retry",
        )),
        Err(e) => log::warn!("Could not reload job {} after retry: {}", job_id, e),
    }
}
