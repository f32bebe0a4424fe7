//! One step of the simulation loop.

use crate::error::{ExtractorError, JobError, Result};
use crate::jobs::{JobStore, NewFailure};
use crate::model::JobStatus;

use super::{OutcomeSource, SimulationConfig};

/// What the loop should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still running, tick again.
    Continue,
    /// Reached the target and completed the job.
    Finished,
    /// The job is no longer running (paused, stopped or gone).
    Halted,
}

/// Advances a running job by one tick.
///
/// Counters are written only while the stored status is `running`, so a
/// pause or stop that lands mid-tick wins and the loop halts.
pub fn tick(
    store: &JobStore,
    job_id: &str,
    source: &mut dyn OutcomeSource,
    config: &SimulationConfig,
) -> Result<TickOutcome> {
    let _span = tracing::info_span!("simulation.tick", job_id).entered();

    let job = match store.get_job(job_id) {
        Ok(job) => job,
        Err(ExtractorError::Job(JobError::NotFound(_))) => return Ok(TickOutcome::Halted),
        Err(e) => return Err(e),
    };
    if job.status != JobStatus::Running {
        return Ok(TickOutcome::Halted);
    }

    let increment = source.increment(config.increment_min, config.increment_max);

    let subjects = job.subject_ids();
    let failure_error;
    let failure = if !subjects.is_empty() && source.chance(config.failure_probability) {
        let subject = subjects[source.pick(subjects.len()).min(subjects.len() - 1)];
        failure_error = format!(
            "Timeout: Request exceeded {} second limit",
            store.settings()?.timeout_secs()
        );
        Some(NewFailure {
            subject,
            error: &failure_error,
            url_base: &config.question_url_base,
        })
    } else {
        None
    };

    let Some(outcome) = store.record_progress(job_id, increment, failure)? else {
        return Ok(TickOutcome::Halted);
    };
    tracing::debug!(
        extracted = outcome.counters.extracted,
        failed = outcome.counters.failed,
        total = outcome.counters.total,
        "tick applied"
    );

    if outcome.counters.extracted < outcome.counters.total {
        return Ok(TickOutcome::Continue);
    }

    match store.complete(job_id, &config.results_root) {
        Ok((job, results)) => {
            log::info!(
                "Job {} completed: {} extracted, {} failed, {} result files",
                job.id,
                job.extracted_questions,
                job.failed_questions,
                results.len()
            );
            Ok(TickOutcome::Finished)
        }
        // Paused or stopped between the progress write and completion.
        Err(ExtractorError::Job(
            JobError::InvalidTransition { .. } | JobError::Conflict(_),
        )) => Ok(TickOutcome::Halted),
        Err(e) => Err(e),
    }
}
