//! Per-user extraction settings.

use serde::{Deserialize, Serialize};

use crate::catalog::QuestionDatabase;
use crate::error::JobError;

/// User id used until the dashboard grows real sessions.
pub const DEFAULT_USER_ID: &str = "default_user";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Csv,
    Xml,
    Excel,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SpreadsheetLayout {
    SingleSheet,
    MultipleSheets,
    BySubject,
    BySubsection,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaDownloadFormat {
    Original,
    Optimized,
    Both,
}

/// Extraction preferences. Missing fields fall back to the defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    pub retry_attempts: u32,
    /// Milliseconds.
    pub delay_between_requests: u32,
    /// Milliseconds.
    pub timeout_duration: u32,
    pub enable_media_extraction: bool,
    pub output_format: OutputFormat,
    pub database: QuestionDatabase,
    pub spreadsheet_layout: SpreadsheetLayout,
    pub include_explanations: bool,
    pub include_comments: bool,
    pub include_media_files: bool,
    pub media_download_format: MediaDownloadFormat,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            retry_attempts: 3,
            delay_between_requests: 1000,
            timeout_duration: 30000,
            enable_media_extraction: true,
            output_format: OutputFormat::Excel,
            database: QuestionDatabase::Easa2020,
            spreadsheet_layout: SpreadsheetLayout::BySubject,
            include_explanations: true,
            include_comments: true,
            include_media_files: true,
            media_download_format: MediaDownloadFormat::Original,
        }
    }
}

impl UserSettings {
    pub fn validate(&self) -> Result<(), JobError> {
        if self.retry_attempts > 10 {
            return Err(JobError::Validation(
                "retryAttempts must be between 0 and 10".to_string(),
            ));
        }
        if !(1000..=300_000).contains(&self.timeout_duration) {
            return Err(JobError::Validation(
                "timeoutDuration must be between 1000 and 300000 ms".to_string(),
            ));
        }
        if self.delay_between_requests > 60_000 {
            return Err(JobError::Validation(
                "delayBetweenRequests must be at most 60000 ms".to_string(),
            ));
        }
        Ok(())
    }

    /// Request timeout in whole seconds.
    pub fn timeout_secs(&self) -> u32 {
        self.timeout_duration / 1000
    }
}

/// Serializes a unit-like enum to its wire string.
pub(crate) fn enum_to_str<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        _ => String::new(),
    }
}

/// Parses a wire string back into a unit-like enum.
pub(crate) fn enum_from_str<T: for<'de> Deserialize<'de>>(s: &str) -> Option<T> {
    serde_json::from_value(serde_json::Value::String(s.to_string())).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_body_fills_defaults() {
        let settings: UserSettings =
            serde_json::from_str(r#"{"retryAttempts":5,"outputFormat":"csv"}"#).unwrap();
        assert_eq!(settings.retry_attempts, 5);
        assert_eq!(settings.output_format, OutputFormat::Csv);
        assert_eq!(settings.timeout_duration, 30000);
        assert_eq!(settings.spreadsheet_layout, SpreadsheetLayout::BySubject);
    }

    #[test]
    fn test_wire_names() {
        let value = serde_json::to_value(UserSettings::default()).unwrap();
        assert_eq!(value["outputFormat"], "excel");
        assert_eq!(value["spreadsheetLayout"], "by_subject");
        assert_eq!(value["mediaDownloadFormat"], "original");
        assert_eq!(value["database"], "EASA 2020");
        assert_eq!(value["includeExplanations"], true);
    }

    #[test]
    fn test_validate_bounds() {
        assert!(UserSettings::default().validate().is_ok());

        let settings = UserSettings {
            retry_attempts: 11,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = UserSettings {
            timeout_duration: 500,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_enum_string_helpers() {
        assert_eq!(enum_to_str(&SpreadsheetLayout::MultipleSheets), "multiple_sheets");
        assert_eq!(
            enum_from_str::<MediaDownloadFormat>("both"),
            Some(MediaDownloadFormat::Both)
        );
        assert_eq!(enum_from_str::<OutputFormat>("pdf"), None);
    }
}
