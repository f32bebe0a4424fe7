use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A question that could not be extracted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FailedQuestion {
    pub id: String,
    pub job_id: String,
    pub question_id: String,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub error: String,
    pub retry_count: u32,
    pub timestamp: DateTime<Utc>,
}

impl FailedQuestion {
    pub fn new(
        job_id: &str,
        question_id: impl Into<String>,
        subject: impl Into<String>,
        url: Option<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            job_id: job_id.to_string(),
            question_id: question_id.into(),
            subject: subject.into(),
            url,
            error: error.into(),
            retry_count: 0,
            timestamp: Utc::now(),
        }
    }
}
