use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Exported file metadata for one subject of a completed job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub id: String,
    pub job_id: String,
    pub subject: String,
    pub file_name: String,
    pub file_path: String,
    pub file_size: u64,
    pub question_count: u32,
    pub created_at: DateTime<Utc>,
}

impl ExtractionResult {
    /// Builds the result record for `subject`, laid out under
    /// `<results_root>/<job_id>/`.
    pub fn for_subject(job_id: &str, subject: &str, question_count: u32, results_root: &str) -> Self {
        let file_name = format!("{}_questions.json", subject);
        let file_path = format!(
            "{}/{}/{}",
            results_root.trim_end_matches('/'),
            job_id,
            file_name
        );

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            job_id: job_id.to_string(),
            subject: subject.to_string(),
            file_name,
            file_path,
            file_size: u64::from(question_count) * 1024,
            question_count,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_subject_layout() {
        let result = ExtractionResult::for_subject("job-7", "050", 300, "/results/");
        assert_eq!(result.file_name, "050_questions.json");
        assert_eq!(result.file_path, "/results/job-7/050_questions.json");
        assert_eq!(result.file_size, 300 * 1024);
        assert_eq!(result.question_count, 300);
    }
}
