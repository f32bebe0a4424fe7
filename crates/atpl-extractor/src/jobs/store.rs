//! Job store: every job mutation goes through here.
//!
//! Each mutation runs in one transaction that also writes the matching
//! log row. Events and log entries are broadcast only after commit.

use chrono::Utc;
use rusqlite::Connection;

use crate::broadcast::{JobEventKind, JobProgressBroadcaster, JobProgressEvent, LogBroadcaster};
use crate::catalog::find_subject;
use crate::db::job_repo::{self, JobRow, ProgressCounters, StatusChange};
use crate::db::{
    failed_question_repo, format_timestamp, log_repo, result_repo, settings_repo, Database,
    DatabaseError,
};
use crate::error::{JobError, Result};
use crate::model::settings::DEFAULT_USER_ID;
use crate::model::{
    job::percent, CreateJobRequest, ExtractionJob, ExtractionLog, ExtractionResult,
    FailedQuestion, JobAction, JobStatus, LogFilter, LogLevel, UserSettings,
};

/// Default page size for job listings.
pub const JOB_LIST_LIMIT: u32 = 50;

/// A failure to record alongside a progress update.
#[derive(Debug, Clone, Copy)]
pub struct NewFailure<'a> {
    pub subject: &'a str,
    pub error: &'a str,
    /// Question URLs are `<url_base>/<n>`.
    pub url_base: &'a str,
}

/// Result of a progress update that was applied.
#[derive(Debug, Clone)]
pub struct ProgressOutcome {
    pub counters: ProgressCounters,
    pub failed_question: Option<FailedQuestion>,
}

/// Persistent job store with change broadcasting.
#[derive(Clone)]
pub struct JobStore {
    db: Database,
    progress: JobProgressBroadcaster,
    logs: LogBroadcaster,
    questions_per_subject: u32,
}

impl JobStore {
    pub fn new(db: Database, questions_per_subject: u32) -> Self {
        Self {
            db,
            progress: JobProgressBroadcaster::default(),
            logs: LogBroadcaster::default(),
            questions_per_subject,
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn progress(&self) -> &JobProgressBroadcaster {
        &self.progress
    }

    pub fn logs(&self) -> &LogBroadcaster {
        &self.logs
    }

    /// Validates the request and inserts a new `pending` job.
    pub fn create_job(&self, request: CreateJobRequest) -> Result<ExtractionJob> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(JobError::Validation("Job name is required".to_string()).into());
        }

        let mut subjects: Vec<String> = Vec::with_capacity(request.subjects.len());
        for subject in &request.subjects {
            let subject = subject.trim();
            if find_subject(subject).is_none() {
                return Err(JobError::Validation(format!("Unknown subject: {}", subject)).into());
            }
            if !subjects.iter().any(|s| s == subject) {
                subjects.push(subject.to_string());
            }
        }
        if subjects.is_empty() {
            return Err(
                JobError::Validation("At least one subject must be selected".to_string()).into(),
            );
        }

        let credentials = request
            .credentials
            .as_ref()
            .filter(|c| !c.username.trim().is_empty() && c.has_password())
            .ok_or_else(|| JobError::Validation("Username and password are required".to_string()))?;

        let database = match request.settings.as_ref() {
            Some(settings) => settings.database,
            None => self.settings()?.database,
        };

        let total_questions = u32::try_from(subjects.len())
            .ok()
            .and_then(|n| n.checked_mul(self.questions_per_subject))
            .ok_or_else(|| {
                JobError::Validation(format!(
                    "Too many questions: {} subjects x {} questions per subject",
                    subjects.len(),
                    self.questions_per_subject
                ))
            })?;

        let now = Utc::now();
        let job = ExtractionJob {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            status: JobStatus::Pending,
            database,
            subjects: subjects.join(","),
            username: credentials.username.trim().to_string(),
            total_questions,
            extracted_questions: 0,
            failed_questions: 0,
            start_time: None,
            end_time: None,
            created_at: now,
            updated_at: now,
        };

        let entry = ExtractionLog::new(
            &job.id,
            LogLevel::Info,
            format!("Extraction job \"{}\" created successfully", job.name),
        )
        .with_details(format!("Selected subjects: {}", subjects.join(", ")));

        self.db.with_transaction(|conn| {
            job_repo::insert_in(conn, &JobRow::from_job(&job))?;
            log_repo::insert_in(conn, &entry)
        })?;

        log::info!(
            "Created extraction job {} ({} subjects, {} questions)",
            job.id,
            subjects.len(),
            job.total_questions
        );
        self.publish(JobEventKind::Created, &job, &entry);
        Ok(job)
    }

    pub fn get_job(&self, job_id: &str) -> Result<ExtractionJob> {
        match job_repo::find_by_id(&self.db, job_id)? {
            Some(row) => Ok(row.into_job()?),
            None => Err(JobError::NotFound(job_id.to_string()).into()),
        }
    }

    /// Jobs newest first.
    pub fn list_jobs(&self, limit: u32) -> Result<Vec<ExtractionJob>> {
        let rows = job_repo::list(&self.db, limit)?;
        Ok(rows
            .into_iter()
            .map(JobRow::into_job)
            .collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Jobs currently stored with `status`.
    pub fn jobs_with_status(&self, status: JobStatus) -> Result<Vec<ExtractionJob>> {
        let rows = job_repo::list_by_status(&self.db, status)?;
        Ok(rows
            .into_iter()
            .map(JobRow::into_job)
            .collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Applies a user action (start, pause, stop) to a job.
    pub fn transition(&self, job_id: &str, action: JobAction) -> Result<ExtractionJob> {
        self.change_status(job_id, action, None, |_, _| Ok(()))
    }

    /// Moves a job that was running in a previous process to `paused`.
    pub fn mark_interrupted(&self, job_id: &str) -> Result<ExtractionJob> {
        let note = LogNote {
            level: LogLevel::Warning,
            message: "Extraction interrupted by server restart".to_string(),
            details: Some("Resume the job to continue extracting".to_string()),
        };
        self.change_status(job_id, JobAction::Pause, Some(note), |_, _| Ok(()))
    }

    /// Fails a running job after a simulation error.
    pub fn fail(&self, job_id: &str, reason: &str) -> Result<ExtractionJob> {
        let note = LogNote {
            level: LogLevel::Error,
            message: "Simulation error".to_string(),
            details: Some(reason.to_string()),
        };
        self.change_status(job_id, JobAction::Fail, Some(note), |_, _| Ok(()))
    }

    /// Completes a running job and writes one result per subject.
    pub fn complete(
        &self,
        job_id: &str,
        results_root: &str,
    ) -> Result<(ExtractionJob, Vec<ExtractionResult>)> {
        let mut results = Vec::new();
        let job = self.change_status(job_id, JobAction::Complete, None, |conn, job| {
            let subjects = job.subject_ids();
            let per_subject = job.extracted_questions / subjects.len().max(1) as u32;
            for subject in subjects {
                let result =
                    ExtractionResult::for_subject(&job.id, subject, per_subject, results_root);
                result_repo::insert_in(conn, &result)?;
                results.push(result);
            }
            Ok(())
        })?;
        Ok((job, results))
    }

    /// Adds `increment` to a running job's extracted count and optionally
    /// records a failed question. Returns `None` when the job is not running.
    pub fn record_progress(
        &self,
        job_id: &str,
        increment: u32,
        failure: Option<NewFailure<'_>>,
    ) -> Result<Option<ProgressOutcome>> {
        let now = format_timestamp(Utc::now());
        let failed_delta = u32::from(failure.is_some());

        let written = self.db.with_transaction(|conn| {
            let Some(counters) =
                job_repo::apply_progress(conn, job_id, increment, failed_delta, &now)?
            else {
                return Ok(None);
            };

            let failed_question = match failure {
                Some(failure) => {
                    let n = counters.extracted + counters.failed;
                    let question = FailedQuestion::new(
                        job_id,
                        format!("Q{}", n),
                        failure.subject,
                        Some(format!("{}/{}", failure.url_base.trim_end_matches('/'), n)),
                        failure.error,
                    );
                    failed_question_repo::insert_in(conn, &question)?;
                    Some(question)
                }
                None => None,
            };

            let entry = if counters.extracted % 100 == 0 || counters.extracted == counters.total {
                let entry = ExtractionLog::new(
                    job_id,
                    LogLevel::Info,
                    format!(
                        "Extraction progress: {}/{} questions",
                        counters.extracted, counters.total
                    ),
                )
                .with_details(format!(
                    "{}% complete",
                    percent(counters.extracted, counters.total)
                ));
                log_repo::insert_in(conn, &entry)?;
                Some(entry)
            } else {
                None
            };

            Ok(Some((counters, failed_question, entry)))
        })?;

        let Some((counters, failed_question, entry)) = written else {
            return Ok(None);
        };

        self.progress.send(JobProgressEvent::progress(
            job_id,
            counters.extracted,
            counters.failed,
            counters.total,
        ));
        if let Some(entry) = entry {
            self.logs.send(entry);
        }

        Ok(Some(ProgressOutcome {
            counters,
            failed_question,
        }))
    }

    /// Writes a standalone log entry for a job and broadcasts it.
    pub fn log(&self, entry: ExtractionLog) -> Result<()> {
        log_repo::insert(&self.db, &entry)?;
        self.logs.send(entry);
        Ok(())
    }

    pub fn list_logs(&self, job_id: &str, filter: &LogFilter) -> Result<Vec<ExtractionLog>> {
        self.get_job(job_id)?;
        Ok(log_repo::list(&self.db, job_id, filter)?)
    }

    /// Deletes a job's logs and returns how many were removed.
    pub fn clear_logs(&self, job_id: &str) -> Result<usize> {
        self.get_job(job_id)?;
        let deleted = log_repo::clear(&self.db, job_id)?;
        log::info!("Cleared {} log entries for job {}", deleted, job_id);
        Ok(deleted)
    }

    pub fn list_failed(&self, job_id: &str) -> Result<Vec<FailedQuestion>> {
        self.get_job(job_id)?;
        Ok(failed_question_repo::list_by_job(&self.db, job_id)?)
    }

    /// Stored settings for the default user, or the defaults.
    pub fn settings(&self) -> Result<UserSettings> {
        Ok(settings_repo::find(&self.db, DEFAULT_USER_ID)?.unwrap_or_default())
    }

    /// Validates and stores settings for the default user.
    pub fn save_settings(&self, settings: &UserSettings) -> Result<UserSettings> {
        settings.validate()?;
        settings_repo::upsert(&self.db, DEFAULT_USER_ID, settings)?;
        log::info!("Saved settings for {}", DEFAULT_USER_ID);
        self.settings()
    }

    /// Loads the job, applies `action` through the state machine and writes
    /// the status change, `extra` and the log row in one transaction.
    fn change_status<F>(
        &self,
        job_id: &str,
        action: JobAction,
        note: Option<LogNote>,
        extra: F,
    ) -> Result<ExtractionJob>
    where
        F: FnOnce(&Connection, &ExtractionJob) -> std::result::Result<(), DatabaseError>,
    {
        let now = Utc::now();
        let now_str = format_timestamp(now);

        let outcome = self.db.with_transaction(|conn| {
            let Some(row) = job_repo::find_by_id_in(conn, job_id)? else {
                return Ok(Err(JobError::NotFound(job_id.to_string())));
            };
            let job = row.into_job()?;
            let next = match job.status.apply(job_id, action) {
                Ok(next) => next,
                Err(e) => return Ok(Err(e)),
            };

            let change = StatusChange {
                from: job.status,
                to: next,
                now: &now_str,
                start_time: (action == JobAction::Start).then_some(now_str.as_str()),
                end_time: matches!(next, JobStatus::Completed | JobStatus::Failed)
                    .then_some(now_str.as_str()),
            };
            if !job_repo::compare_and_set_status(conn, job_id, &change)? {
                return Ok(Err(JobError::Conflict(job_id.to_string())));
            }

            extra(conn, &job)?;

            let note = note.unwrap_or_else(|| LogNote::for_action(action, &job));
            let mut entry = ExtractionLog::new(job_id, note.level, note.message);
            entry.details = note.details;
            entry.timestamp = now;
            log_repo::insert_in(conn, &entry)?;

            let updated = job_repo::find_by_id_in(conn, job_id)?
                .ok_or_else(|| DatabaseError::InvalidValue {
                    column: "id",
                    value: job_id.to_string(),
                })?
                .into_job()?;
            Ok(Ok((updated, entry)))
        })?;

        let (job, entry) = outcome?;
        log::info!("Job {} is now {} ({})", job.id, job.status, action);
        self.publish(JobEventKind::from(action), &job, &entry);
        Ok(job)
    }

    fn publish(&self, kind: JobEventKind, job: &ExtractionJob, entry: &ExtractionLog) {
        self.progress
            .send(JobProgressEvent::from_job(kind, job, entry.message.clone()));
        self.logs.send(entry.clone());
    }
}

impl From<JobAction> for JobEventKind {
    fn from(action: JobAction) -> Self {
        match action {
            JobAction::Start => JobEventKind::Started,
            JobAction::Pause => JobEventKind::Paused,
            JobAction::Stop => JobEventKind::Stopped,
            JobAction::Complete => JobEventKind::Completed,
            JobAction::Fail => JobEventKind::Failed,
        }
    }
}

/// The log row written with a status change.
struct LogNote {
    level: LogLevel,
    message: String,
    details: Option<String>,
}

impl LogNote {
    fn for_action(action: JobAction, job: &ExtractionJob) -> Self {
        let (level, message, details) = match action {
            JobAction::Start => (
                LogLevel::Info,
                "Extraction job started",
                format!("Job \"{}\" is now running", job.name),
            ),
            JobAction::Pause => (
                LogLevel::Info,
                "Extraction job paused",
                format!("Job \"{}\" has been paused by user", job.name),
            ),
            JobAction::Stop => (
                LogLevel::Warning,
                "Extraction job stopped by user",
                format!("Job \"{}\" was manually stopped", job.name),
            ),
            JobAction::Complete => (
                LogLevel::Info,
                "Extraction job completed successfully",
                format!(
                    "Total: {} extracted, {} failed",
                    job.extracted_questions, job.failed_questions
                ),
            ),
            JobAction::Fail => (
                LogLevel::Error,
                "Extraction job failed",
                format!("Job \"{}\" stopped after an error", job.name),
            ),
        };
        Self {
            level,
            message: message.to_string(),
            details: Some(details),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::QuestionDatabase;
    use crate::error::ExtractorError;
    use crate::model::Credentials;

    fn store() -> JobStore {
        JobStore::new(Database::open_in_memory().unwrap(), 1200)
    }

    fn request(name: &str, subjects: &[&str]) -> CreateJobRequest {
        CreateJobRequest {
            name: name.to_string(),
            subjects: subjects.iter().map(|s| s.to_string()).collect(),
            credentials: Some(Credentials::new("pilot", "secret")),
            settings: None,
        }
    }

    fn is_validation(err: &ExtractorError) -> bool {
        matches!(err, ExtractorError::Job(JobError::Validation(_)))
    }

    #[test]
    fn test_create_job_estimates_total_and_logs() {
        let store = store();
        let job = store.create_job(request("Air law", &["010", "021"])).unwrap();

        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.subjects, "010,021");
        assert_eq!(job.total_questions, 2400);
        assert_eq!(job.username, "pilot");

        let logs = store.list_logs(&job.id, &LogFilter::default()).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].message, "Extraction job \"Air law\" created successfully");
        assert_eq!(logs[0].details.as_deref(), Some("Selected subjects: 010, 021"));
    }

    #[test]
    fn test_create_job_validation() {
        let store = store();
        assert!(is_validation(&store.create_job(request("  ", &["010"])).unwrap_err()));
        assert!(is_validation(&store.create_job(request("Run", &[])).unwrap_err()));
        assert!(is_validation(&store.create_job(request("Run", &["999"])).unwrap_err()));

        let mut no_password = request("Run", &["010"]);
        no_password.credentials = Some(Credentials::new("pilot", ""));
        assert!(is_validation(&store.create_job(no_password).unwrap_err()));

        let mut no_credentials = request("Run", &["010"]);
        no_credentials.credentials = None;
        assert!(is_validation(&store.create_job(no_credentials).unwrap_err()));

        assert!(store.list_jobs(JOB_LIST_LIMIT).unwrap().is_empty());
    }

    #[test]
    fn test_create_job_uses_saved_database() {
        let store = store();
        store
            .save_settings(&UserSettings {
                database: QuestionDatabase::Easa2020AllQuestions,
                ..Default::default()
            })
            .unwrap();

        let job = store.create_job(request("Run", &["010"])).unwrap();
        assert_eq!(job.database, QuestionDatabase::Easa2020AllQuestions);

        let mut explicit = request("Run", &["010"]);
        explicit.settings = Some(UserSettings::default());
        let job = store.create_job(explicit).unwrap();
        assert_eq!(job.database, QuestionDatabase::Easa2020);
    }

    #[test]
    fn test_duplicate_subjects_are_collapsed() {
        let store = store();
        let job = store.create_job(request("Run", &["010", "010", "022"])).unwrap();
        assert_eq!(job.subjects, "010,022");
        assert_eq!(job.total_questions, 2400);
    }

    #[test]
    fn test_transitions_write_logs_and_timestamps() {
        let store = store();
        let job = store.create_job(request("Run", &["010"])).unwrap();

        let running = store.transition(&job.id, JobAction::Start).unwrap();
        assert_eq!(running.status, JobStatus::Running);
        let started_at = running.start_time.unwrap();

        let paused = store.transition(&job.id, JobAction::Pause).unwrap();
        assert_eq!(paused.status, JobStatus::Paused);

        let resumed = store.transition(&job.id, JobAction::Start).unwrap();
        assert_eq!(resumed.start_time, Some(started_at));

        let stopped = store.transition(&job.id, JobAction::Stop).unwrap();
        assert_eq!(stopped.status, JobStatus::Failed);
        assert!(stopped.end_time.is_some());

        let messages: Vec<String> = store
            .list_logs(&job.id, &LogFilter::default())
            .unwrap()
            .into_iter()
            .map(|l| l.message)
            .collect();
        assert_eq!(
            messages[1..],
            [
                "Extraction job started",
                "Extraction job paused",
                "Extraction job started",
                "Extraction job stopped by user"
            ]
        );
    }

    #[test]
    fn test_invalid_transition_is_rejected_without_log() {
        let store = store();
        let job = store.create_job(request("Run", &["010"])).unwrap();

        let err = store.transition(&job.id, JobAction::Pause).unwrap_err();
        assert!(matches!(
            err,
            ExtractorError::Job(JobError::InvalidTransition { .. })
        ));
        assert_eq!(store.get_job(&job.id).unwrap().status, JobStatus::Pending);
        assert_eq!(
            store.list_logs(&job.id, &LogFilter::default()).unwrap().len(),
            1
        );
    }

    #[test]
    fn test_unknown_job_is_not_found() {
        let store = store();
        let err = store.transition("missing", JobAction::Start).unwrap_err();
        assert!(matches!(err, ExtractorError::Job(JobError::NotFound(_))));
        assert!(matches!(
            store.list_failed("missing").unwrap_err(),
            ExtractorError::Job(JobError::NotFound(_))
        ));
    }

    #[test]
    fn test_record_progress_only_while_running() {
        let store = store();
        let job = store.create_job(request("Run", &["010"])).unwrap();

        assert!(store.record_progress(&job.id, 50, None).unwrap().is_none());

        store.transition(&job.id, JobAction::Start).unwrap();
        let failure = NewFailure {
            subject: "010",
            error: "Timeout: Request exceeded 30 second limit",
            url_base: "https://www.atplquestions.com/question",
        };
        let outcome = store
            .record_progress(&job.id, 50, Some(failure))
            .unwrap()
            .unwrap();
        assert_eq!(outcome.counters.extracted, 50);
        assert_eq!(outcome.counters.failed, 1);

        let failed = outcome.failed_question.unwrap();
        assert_eq!(failed.question_id, "Q51");
        assert_eq!(
            failed.url.as_deref(),
            Some("https://www.atplquestions.com/question/51")
        );
        assert_eq!(store.list_failed(&job.id).unwrap().len(), 1);
    }

    #[test]
    fn test_progress_log_on_hundreds() {
        let store = store();
        let job = store.create_job(request("Run", &["010"])).unwrap();
        store.transition(&job.id, JobAction::Start).unwrap();

        store.record_progress(&job.id, 60, None).unwrap();
        store.record_progress(&job.id, 40, None).unwrap();

        let filter = LogFilter {
            level: None,
            search: Some("Extraction progress".to_string()),
        };
        let logs = store.list_logs(&job.id, &filter).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].message, "Extraction progress: 100/1200 questions");
        assert_eq!(logs[0].details.as_deref(), Some("8% complete"));
    }

    #[test]
    fn test_complete_writes_results_per_subject() {
        let store = store();
        let job = store.create_job(request("Run", &["010", "022"])).unwrap();
        store.transition(&job.id, JobAction::Start).unwrap();
        store.record_progress(&job.id, 2401, None).unwrap();

        let (done, results) = store.complete(&job.id, "/results").unwrap();
        assert_eq!(done.status, JobStatus::Completed);
        assert!(done.end_time.is_some());
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].question_count, 1200);
        assert_eq!(
            results[1].file_path,
            format!("/results/{}/022_questions.json", job.id)
        );

        let last = store
            .list_logs(&job.id, &LogFilter::default())
            .unwrap()
            .pop()
            .unwrap();
        assert_eq!(last.message, "Extraction job completed successfully");
        assert_eq!(last.details.as_deref(), Some("Total: 2400 extracted, 0 failed"));
    }

    #[test]
    fn test_events_are_broadcast_after_commit() {
        let store = store();
        let mut events = store.progress().subscribe();
        let mut logs = store.logs().subscribe();

        let job = store.create_job(request("Run", &["010"])).unwrap();
        store.transition(&job.id, JobAction::Start).unwrap();

        assert_eq!(events.try_recv().unwrap().kind, JobEventKind::Created);
        let started = events.try_recv().unwrap();
        assert_eq!(started.kind, JobEventKind::Started);
        assert_eq!(started.status, JobStatus::Running);
        assert_eq!(logs.try_recv().unwrap().job_id, job.id);
    }

    #[test]
    fn test_mark_interrupted_pauses_with_warning() {
        let store = store();
        let job = store.create_job(request("Run", &["010"])).unwrap();
        store.transition(&job.id, JobAction::Start).unwrap();

        let paused = store.mark_interrupted(&job.id).unwrap();
        assert_eq!(paused.status, JobStatus::Paused);

        let warnings = store
            .list_logs(
                &job.id,
                &LogFilter {
                    level: Some(LogLevel::Warning),
                    search: None,
                },
            )
            .unwrap();
        assert_eq!(warnings[0].message, "Extraction interrupted by server restart");
    }

    #[test]
    fn test_oversized_total_is_rejected() {
        let store = JobStore::new(Database::open_in_memory().unwrap(), 3_000_000_000);
        let err = store
            .create_job(request("Run", &["010", "021"]))
            .unwrap_err();
        assert!(is_validation(&err));
        assert!(store.list_jobs(JOB_LIST_LIMIT).unwrap().is_empty());
    }

    #[test]
    fn test_fail_moves_running_job_to_failed() {
        let store = store();
        let job = store.create_job(request("Run", &["010"])).unwrap();
        store.transition(&job.id, JobAction::Start).unwrap();

        let failed = store.fail(&job.id, "disk full").unwrap();
        assert_eq!(failed.status, JobStatus::Failed);
        assert!(failed.end_time.is_some());

        let errors = store
            .list_logs(
                &job.id,
                &LogFilter {
                    level: Some(LogLevel::Error),
                    search: None,
                },
            )
            .unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Simulation error");
        assert_eq!(errors[0].details.as_deref(), Some("disk full"));

        // Only a running job can fail.
        assert!(store.fail(&job.id, "again").is_err());
    }

    #[test]
    fn test_settings_defaults_and_validation() {
        let store = store();
        assert_eq!(store.settings().unwrap(), UserSettings::default());

        let invalid = UserSettings {
            retry_attempts: 42,
            ..Default::default()
        };
        assert!(is_validation(&store.save_settings(&invalid).unwrap_err()));
    }
}
