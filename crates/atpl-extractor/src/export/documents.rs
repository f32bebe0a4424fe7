//! Sample documents served for finished results.
//!
//! Extraction is simulated, so result files are generated on demand from
//! the stored metadata instead of being read from disk.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ExportError;
use crate::model::ExtractionResult;

/// Questions included in a downloaded document.
pub const DOCUMENT_SAMPLE_SIZE: u32 = 10;
/// Questions included in a preview.
pub const PREVIEW_SAMPLE_SIZE: u32 = 3;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnswerOption {
    pub label: &'static str,
    pub text: &'static str,
}

const OPTIONS: [AnswerOption; 4] = [
    AnswerOption { label: "A", text: "Option A" },
    AnswerOption { label: "B", text: "Option B" },
    AnswerOption { label: "C", text: "Option C" },
    AnswerOption { label: "D", text: "Option D" },
];

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SampleQuestion {
    pub id: String,
    pub text: String,
    pub options: Vec<AnswerOption>,
    pub correct_answer: &'static str,
    pub explanation: String,
}

/// The downloadable JSON file for one result.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResultDocument {
    pub subject: String,
    pub question_count: u32,
    pub extracted_at: DateTime<Utc>,
    pub questions: Vec<SampleQuestion>,
}

impl ResultDocument {
    pub fn for_result(result: &ExtractionResult) -> Self {
        let questions = (1..=result.question_count.min(DOCUMENT_SAMPLE_SIZE))
            .map(|n| SampleQuestion {
                id: format!("Q{}", n),
                text: format!("Sample question {} for {}", n, result.subject),
                options: OPTIONS.to_vec(),
                correct_answer: "A",
                explanation: format!("Explanation for question {}", n),
            })
            .collect();

        Self {
            subject: result.subject.clone(),
            question_count: result.question_count,
            extracted_at: result.created_at,
            questions,
        }
    }

    /// Pretty-printed JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>, ExportError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PreviewQuestion {
    pub id: String,
    pub text: String,
    pub options: Vec<&'static str>,
    pub correct_answer: &'static str,
}

/// Metadata plus the first few questions of a result.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResultPreview {
    pub file_name: String,
    pub subject: String,
    pub question_count: u32,
    pub file_size: u64,
    pub created_at: DateTime<Utc>,
    pub preview: Vec<PreviewQuestion>,
}

impl ResultPreview {
    pub fn for_result(result: &ExtractionResult) -> Self {
        let preview = (1..=PREVIEW_SAMPLE_SIZE)
            .map(|n| PreviewQuestion {
                id: format!("Q{}", n),
                text: format!("Sample preview question {} for {}", n, result.subject),
                options: OPTIONS.iter().map(|o| o.text).collect(),
                correct_answer: "A",
            })
            .collect();

        Self {
            file_name: result.file_name.clone(),
            subject: result.subject.clone(),
            question_count: result.question_count,
            file_size: result.file_size,
            created_at: result.created_at,
            preview,
        }
    }
}

/// `Content-Disposition` value offering `file_name` as a download.
pub fn attachment_header(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| if c == '"' || c == '\\' || c.is_control() { '_' } else { c })
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_caps_questions() {
        let result = ExtractionResult::for_subject("job-1", "010", 1200, "/results");
        let doc = ResultDocument::for_result(&result);
        assert_eq!(doc.questions.len(), 10);
        assert_eq!(doc.questions[9].id, "Q10");
        assert_eq!(doc.questions[0].text, "Sample question 1 for 010");

        let small = ExtractionResult::for_subject("job-1", "010", 4, "/results");
        assert_eq!(ResultDocument::for_result(&small).questions.len(), 4);
    }

    #[test]
    fn test_document_json_shape() {
        let result = ExtractionResult::for_subject("job-1", "050", 2, "/results");
        let bytes = ResultDocument::for_result(&result).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["questionCount"], 2);
        assert_eq!(value["questions"][0]["correctAnswer"], "A");
        assert_eq!(value["questions"][0]["options"][3]["label"], "D");
        assert_eq!(value["questions"][1]["explanation"], "Explanation for question 2");
    }

    #[test]
    fn test_preview_has_three_questions() {
        let result = ExtractionResult::for_subject("job-1", "022", 0, "/results");
        let preview = ResultPreview::for_result(&result);
        assert_eq!(preview.preview.len(), 3);
        assert_eq!(preview.file_name, "022_questions.json");
        assert_eq!(preview.preview[2].options, vec!["Option A", "Option B", "Option C", "Option D"]);
    }

    #[test]
    fn test_attachment_header_escapes_quotes() {
        assert_eq!(
            attachment_header("010_questions.json"),
            "attachment; filename=\"010_questions.json\""
        );
        assert_eq!(attachment_header("a\"b"), "attachment; filename=\"a_b\"");
    }
}
