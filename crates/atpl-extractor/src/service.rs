//! Extraction service: the single entry point used by the HTTP layer.

use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::db::{result_repo, Database};
use crate::error::{JobError, Result};
use crate::export::{self, ResultDocument, ResultPreview};
use crate::jobs::{JobStats, JobStore, JOB_LIST_LIMIT};
use crate::model::{
    CreateJobRequest, ExtractionJob, ExtractionLog, ExtractionResult, FailedQuestion, JobAction,
    JobStatus, LogFilter, UserSettings,
};
use crate::retry::{self, BatchRetryOutcome, RetryOutcome};
use crate::simulation::{
    OutcomeSource, RandomSource, SimulationConfig, SimulationRegistry, SourceFactory,
};

/// Default page size for result listings.
pub const RESULT_LIST_LIMIT: u32 = 100;

/// A generated file ready to be sent to the client.
#[derive(Debug, Clone)]
pub struct Download {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Joins the job store, the simulation tasks and retries.
#[derive(Clone)]
pub struct ExtractionService {
    store: JobStore,
    simulations: SimulationRegistry,
    retry_source: Arc<Mutex<Box<dyn OutcomeSource>>>,
}

impl ExtractionService {
    pub fn new(db: Database, config: SimulationConfig) -> Self {
        Self::with_sources(db, config, RandomSource::factory())
    }

    /// Builds the service with a custom outcome source, e.g. a scripted one.
    pub fn with_sources(db: Database, config: SimulationConfig, sources: SourceFactory) -> Self {
        let store = JobStore::new(db, config.questions_per_subject);
        let retry_source = Arc::new(Mutex::new(sources()));
        let simulations = SimulationRegistry::new(store.clone(), config, sources);
        Self {
            store,
            simulations,
            retry_source,
        }
    }

    pub fn store(&self) -> &JobStore {
        &self.store
    }

    pub fn simulations(&self) -> &SimulationRegistry {
        &self.simulations
    }

    pub fn config(&self) -> &SimulationConfig {
        self.simulations.config()
    }

    pub fn create_job(&self, request: CreateJobRequest) -> Result<ExtractionJob> {
        self.store.create_job(request)
    }

    pub fn get_job(&self, job_id: &str) -> Result<ExtractionJob> {
        self.store.get_job(job_id)
    }

    pub fn list_jobs(&self) -> Result<Vec<ExtractionJob>> {
        self.store.list_jobs(JOB_LIST_LIMIT)
    }

    /// Starts or resumes a job and launches its simulation.
    pub fn start(&self, job_id: &str) -> Result<ExtractionJob> {
        let job = self.store.transition(job_id, JobAction::Start)?;
        self.simulations.launch(job_id);
        Ok(job)
    }

    pub fn pause(&self, job_id: &str) -> Result<ExtractionJob> {
        let job = self.store.transition(job_id, JobAction::Pause)?;
        self.simulations.cancel(job_id);
        Ok(job)
    }

    pub fn stop(&self, job_id: &str) -> Result<ExtractionJob> {
        let job = self.store.transition(job_id, JobAction::Stop)?;
        self.simulations.cancel(job_id);
        Ok(job)
    }

    pub fn stats(&self, job_id: &str) -> Result<JobStats> {
        let job = self.store.get_job(job_id)?;
        Ok(JobStats::compute(&job, Utc::now()))
    }

    pub fn list_failed(&self, job_id: &str) -> Result<Vec<FailedQuestion>> {
        self.store.list_failed(job_id)
    }

    pub fn retry_question(&self, job_id: &str, question_id: &str) -> Result<RetryOutcome> {
        let probability = self.config().retry_success_probability;
        let mut source = self.retry_source();
        retry::retry_question(&self.store, job_id, question_id, &mut **source, probability)
    }

    pub fn retry_all(&self, job_id: &str, question_ids: &[String]) -> Result<BatchRetryOutcome> {
        let probability = self.config().retry_success_probability;
        let mut source = self.retry_source();
        retry::retry_all(&self.store, job_id, question_ids, &mut **source, probability)
    }

    pub fn list_logs(&self, job_id: &str, filter: &LogFilter) -> Result<Vec<ExtractionLog>> {
        self.store.list_logs(job_id, filter)
    }

    pub fn clear_logs(&self, job_id: &str) -> Result<usize> {
        self.store.clear_logs(job_id)
    }

    pub fn export_logs(&self, job_id: &str) -> Result<Download> {
        let logs = self.store.list_logs(job_id, &LogFilter::default())?;
        Ok(Download {
            file_name: export::logs_file_name(job_id),
            content_type: "text/csv",
            bytes: export::logs_csv(&logs)?,
        })
    }

    /// Results newest first, optionally for one job.
    pub fn list_results(&self, job_id: Option<&str>) -> Result<Vec<ExtractionResult>> {
        Ok(result_repo::list(
            self.store.database(),
            job_id,
            RESULT_LIST_LIMIT,
        )?)
    }

    pub fn delete_result(&self, result_id: &str) -> Result<()> {
        if !result_repo::delete(self.store.database(), result_id)? {
            return Err(JobError::ResultNotFound(result_id.to_string()).into());
        }
        log::info!("Deleted result {}", result_id);
        Ok(())
    }

    pub fn preview_result(&self, result_id: &str) -> Result<ResultPreview> {
        Ok(ResultPreview::for_result(&self.find_result(result_id)?))
    }

    pub fn download_result(&self, result_id: &str) -> Result<Download> {
        let result = self.find_result(result_id)?;
        Ok(Download {
            bytes: ResultDocument::for_result(&result).to_json()?,
            file_name: result.file_name,
            content_type: "application/json",
        })
    }

    /// Zips the selected results. Unknown ids are ignored.
    pub fn download_bulk(&self, result_ids: &[String]) -> Result<Download> {
        let results = result_repo::find_many(self.store.database(), result_ids)?;
        Ok(Download {
            file_name: export::BULK_ARCHIVE_NAME.to_string(),
            content_type: "application/zip",
            bytes: export::bulk_archive(&results)?,
        })
    }

    pub fn settings(&self) -> Result<UserSettings> {
        self.store.settings()
    }

    pub fn save_settings(&self, settings: &UserSettings) -> Result<UserSettings> {
        self.store.save_settings(settings)
    }

    /// Pauses jobs left `running` by a previous process. Returns their ids.
    pub fn reconcile_interrupted(&self) -> Result<Vec<String>> {
        let mut paused = Vec::new();
        for job in self.store.jobs_with_status(JobStatus::Running)? {
            if self.simulations.is_active(&job.id) {
                continue;
            }
            match self.store.mark_interrupted(&job.id) {
                Ok(_) => paused.push(job.id),
                Err(e) => log::warn!("Could not pause interrupted job {}: {}", job.id, e),
            }
        }
        if !paused.is_empty() {
            log::info!("Paused {} job(s) interrupted by a restart", paused.len());
        }
        Ok(paused)
    }

    /// Cancels every simulation task and waits for them to exit.
    pub async fn shutdown(&self) {
        self.simulations.cancel_all().await;
    }

    fn find_result(&self, result_id: &str) -> Result<ExtractionResult> {
        result_repo::find_by_id(self.store.database(), result_id)?
            .ok_or_else(|| JobError::ResultNotFound(result_id.to_string()).into())
    }

    fn retry_source(&self) -> std::sync::MutexGuard<'_, Box<dyn OutcomeSource>> {
        match self.retry_source.lock() {
            Ok(g) => g,
            Err(poisoned) => {
                log::warn!("Retry source lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }
}
