//! Extraction job record and its status state machine.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::QuestionDatabase;
use crate::error::JobError;
use crate::model::settings::UserSettings;

/// Lifecycle status of an extraction job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Paused,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Paused => "paused",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(JobStatus::Pending),
            "running" => Some(JobStatus::Running),
            "paused" => Some(JobStatus::Paused),
            "completed" => Some(JobStatus::Completed),
            "failed" => Some(JobStatus::Failed),
            _ => None,
        }
    }

    /// Returns true once the job can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Computes the status reached by applying `action`, or `None` if the
    /// action is not allowed from this status.
    pub fn next(&self, action: JobAction) -> Option<JobStatus> {
        use JobAction::*;
        use JobStatus::*;

        match (self, action) {
            (Pending | Paused, Start) => Some(Running),
            (Running, Pause) => Some(Paused),
            (Pending | Running | Paused, Stop) => Some(Failed),
            (Running, Complete) => Some(Completed),
            (Running, Fail) => Some(Failed),
            _ => None,
        }
    }

    /// Like [`JobStatus::next`] but produces a descriptive error.
    pub fn apply(&self, job_id: &str, action: JobAction) -> Result<JobStatus, JobError> {
        self.next(action).ok_or_else(|| JobError::InvalidTransition {
            job_id: job_id.to_string(),
            from: *self,
            action,
        })
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something that moves a job between statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobAction {
    Start,
    Pause,
    Stop,
    /// Reached the target count. Issued by the simulation only.
    Complete,
    /// Simulation error. Issued by the simulation only.
    Fail,
}

impl std::fmt::Display for JobAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobAction::Start => "start",
            JobAction::Pause => "pause",
            JobAction::Stop => "stop",
            JobAction::Complete => "complete",
            JobAction::Fail => "fail",
        };
        f.write_str(s)
    }
}

/// A user-initiated extraction job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionJob {
    pub id: String,
    pub name: String,
    pub status: JobStatus,
    pub database: QuestionDatabase,
    /// Comma-separated subject ids, e.g. `"010,021,022"`.
    pub subjects: String,
    pub username: String,
    pub total_questions: u32,
    pub extracted_questions: u32,
    pub failed_questions: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExtractionJob {
    /// Subject ids selected for this job, in selection order.
    pub fn subject_ids(&self) -> Vec<&str> {
        self.subjects
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn remaining(&self) -> u32 {
        self.total_questions.saturating_sub(self.extracted_questions)
    }

    /// Whole-number completion percentage.
    pub fn percent_complete(&self) -> u32 {
        percent(self.extracted_questions, self.total_questions)
    }
}

/// Rounded percentage of `part` in `total`, 100 when `total` is zero.
pub fn percent(part: u32, total: u32) -> u32 {
    if total == 0 {
        return 100;
    }
    ((part as f64 / total as f64) * 100.0).round() as u32
}

/// Login for the external question bank.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    #[serde(deserialize_with = "deserialize_secret")]
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    pub fn has_password(&self) -> bool {
        !self.password.expose_secret().is_empty()
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(SecretString::from(raw))
}

/// Body of a job creation request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub subjects: Vec<String>,
    pub credentials: Option<Credentials>,
    #[serde(default)]
    pub settings: Option<UserSettings>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(subjects: &str, total: u32, extracted: u32) -> ExtractionJob {
        let now = Utc::now();
        ExtractionJob {
            id: "job-1".to_string(),
            name: "Test".to_string(),
            status: JobStatus::Running,
            database: QuestionDatabase::Easa2020,
            subjects: subjects.to_string(),
            username: "pilot".to_string(),
            total_questions: total,
            extracted_questions: extracted,
            failed_questions: 0,
            start_time: Some(now),
            end_time: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_allowed_transitions() {
        assert_eq!(
            JobStatus::Pending.next(JobAction::Start),
            Some(JobStatus::Running)
        );
        assert_eq!(
            JobStatus::Paused.next(JobAction::Start),
            Some(JobStatus::Running)
        );
        assert_eq!(
            JobStatus::Running.next(JobAction::Pause),
            Some(JobStatus::Paused)
        );
        assert_eq!(
            JobStatus::Paused.next(JobAction::Stop),
            Some(JobStatus::Failed)
        );
        assert_eq!(
            JobStatus::Running.next(JobAction::Complete),
            Some(JobStatus::Completed)
        );
    }

    #[test]
    fn test_rejected_transitions() {
        assert_eq!(JobStatus::Running.next(JobAction::Start), None);
        assert_eq!(JobStatus::Pending.next(JobAction::Pause), None);
        assert_eq!(JobStatus::Completed.next(JobAction::Stop), None);
        assert_eq!(JobStatus::Failed.next(JobAction::Start), None);
        assert_eq!(JobStatus::Paused.next(JobAction::Complete), None);

        let err = JobStatus::Completed
            .apply("job-9", JobAction::Pause)
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot pause job job-9 while it is completed");
    }

    #[test]
    fn test_status_round_trip_through_str() {
        for status in [
            JobStatus::Pending,
            JobStatus::Running,
            JobStatus::Paused,
            JobStatus::Completed,
            JobStatus::Failed,
        ] {
            assert_eq!(JobStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(JobStatus::parse("stopped"), None);
    }

    #[test]
    fn test_subject_ids_and_progress() {
        let job = job("010, 021,,050", 3600, 900);
        assert_eq!(job.subject_ids(), vec!["010", "021", "050"]);
        assert_eq!(job.remaining(), 2700);
        assert_eq!(job.percent_complete(), 25);
    }

    #[test]
    fn test_job_serializes_camel_case() {
        let value = serde_json::to_value(job("010", 1200, 0)).unwrap();
        assert_eq!(value["totalQuestions"], 1200);
        assert_eq!(value["status"], "running");
        assert_eq!(value["database"], "EASA 2020");
        assert!(value.get("endTime").is_none());
    }

    #[test]
    fn test_create_request_keeps_password_secret() {
        let request: CreateJobRequest = serde_json::from_str(
            r#"{"name":"Air law","subjects":["010"],"credentials":{"username":"pilot","password":"hunter2"}}"#,
        )
        .unwrap();
        let credentials = request.credentials.unwrap();
        assert!(credentials.has_password());
        assert!(!format!("{:?}", credentials).contains("hunter2"));
        assert!(request.settings.is_none());
    }
}
