//! Status and counter changes of extraction jobs, fanned out to live views.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::model::{job::percent, ExtractionJob, JobStatus};

/// What happened to the job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobEventKind {
    Created,
    Started,
    Progress,
    Paused,
    Stopped,
    Completed,
    Failed,
}

impl std::fmt::Display for JobEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobEventKind::Created => write!(f, "Created"),
            JobEventKind::Started => write!(f, "Started"),
            JobEventKind::Progress => write!(f, "Progress"),
            JobEventKind::Paused => write!(f, "Paused"),
            JobEventKind::Stopped => write!(f, "Stopped"),
            JobEventKind::Completed => write!(f, "Completed"),
            JobEventKind::Failed => write!(f, "Failed"),
        }
    }
}

/// Progress event for a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobProgressEvent {
    pub job_id: String,
    pub kind: JobEventKind,
    /// Status after the event.
    pub status: JobStatus,
    pub extracted_questions: u32,
    pub failed_questions: u32,
    pub total_questions: u32,
    pub percent_complete: u32,
    /// Human-readable message describing current activity.
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl JobProgressEvent {
    /// Builds an event from the job's state after the change.
    pub fn from_job(kind: JobEventKind, job: &ExtractionJob, message: impl Into<String>) -> Self {
        Self {
            job_id: job.id.clone(),
            kind,
            status: job.status,
            extracted_questions: job.extracted_questions,
            failed_questions: job.failed_questions,
            total_questions: job.total_questions,
            percent_complete: job.percent_complete(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    /// A counter update for a running job.
    pub fn progress(job_id: &str, extracted: u32, failed: u32, total: u32) -> Self {
        let percent_complete = percent(extracted, total);
        Self {
            job_id: job_id.to_string(),
            kind: JobEventKind::Progress,
            status: JobStatus::Running,
            extracted_questions: extracted,
            failed_questions: failed,
            total_questions: total,
            percent_complete,
            message: format!("{}/{} questions ({}%)", extracted, total, percent_complete),
            timestamp: Utc::now(),
        }
    }
}

/// Fan-out of [`JobProgressEvent`]s. Clones share one channel.
#[derive(Clone)]
pub struct JobProgressBroadcaster {
    sender: Arc<broadcast::Sender<JobProgressEvent>>,
}

impl JobProgressBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Publishes `event`. Without subscribers the event is dropped.
    pub fn send(&self, event: JobProgressEvent) {
        if self.sender.send(event).is_err() {
            log::trace!("No progress subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<JobProgressEvent> {
        self.sender.subscribe()
    }
}

impl Default for JobProgressBroadcaster {
    fn default() -> Self {
        Self::new(256)
    }
}
