//! Settings repository: one row per user in `user_settings`.

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use super::{format_timestamp, Database, DatabaseError};
use crate::catalog::QuestionDatabase;
use crate::model::settings::{enum_from_str, enum_to_str};
use crate::model::UserSettings;

/// A raw settings row. Enum columns hold their wire strings.
struct SettingsRow {
    retry_attempts: u32,
    delay_between_requests: u32,
    timeout_duration: u32,
    enable_media_extraction: bool,
    output_format: String,
    database: String,
    spreadsheet_layout: String,
    include_explanations: bool,
    include_comments: bool,
    include_media_files: bool,
    media_download_format: String,
}

impl SettingsRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            retry_attempts: row.get("retry_attempts")?,
            delay_between_requests: row.get("delay_between_requests")?,
            timeout_duration: row.get("timeout_duration")?,
            enable_media_extraction: row.get("enable_media_extraction")?,
            output_format: row.get("output_format")?,
            database: row.get("database")?,
            spreadsheet_layout: row.get("spreadsheet_layout")?,
            include_explanations: row.get("include_explanations")?,
            include_comments: row.get("include_comments")?,
            include_media_files: row.get("include_media_files")?,
            media_download_format: row.get("media_download_format")?,
        })
    }

    fn into_settings(self) -> Result<UserSettings, DatabaseError> {
        fn invalid(column: &'static str, value: String) -> DatabaseError {
            DatabaseError::InvalidValue { column, value }
        }

        Ok(UserSettings {
            retry_attempts: self.retry_attempts,
            delay_between_requests: self.delay_between_requests,
            timeout_duration: self.timeout_duration,
            enable_media_extraction: self.enable_media_extraction,
            output_format: enum_from_str(&self.output_format)
                .ok_or_else(|| invalid("output_format", self.output_format.clone()))?,
            database: QuestionDatabase::parse(&self.database)
                .ok_or_else(|| invalid("database", self.database.clone()))?,
            spreadsheet_layout: enum_from_str(&self.spreadsheet_layout)
                .ok_or_else(|| invalid("spreadsheet_layout", self.spreadsheet_layout.clone()))?,
            include_explanations: self.include_explanations,
            include_comments: self.include_comments,
            include_media_files: self.include_media_files,
            media_download_format: enum_from_str(&self.media_download_format).ok_or_else(
                || invalid("media_download_format", self.media_download_format.clone()),
            )?,
        })
    }
}

/// Loads a user's settings, or `None` if they never saved any.
pub fn find(db: &Database, user_id: &str) -> Result<Option<UserSettings>, DatabaseError> {
    let row = db.with_conn(|conn| {
        let row = conn
            .query_row(
                "SELECT * FROM user_settings WHERE user_id = ?1",
                params![user_id],
                SettingsRow::from_row,
            )
            .optional()?;
        Ok(row)
    })?;
    row.map(SettingsRow::into_settings).transpose()
}

/// Inserts or replaces a user's settings.
pub fn upsert(db: &Database, user_id: &str, settings: &UserSettings) -> Result<(), DatabaseError> {
    let now = format_timestamp(Utc::now());
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO user_settings (user_id, retry_attempts, delay_between_requests,
             timeout_duration, enable_media_extraction, output_format, database,
             spreadsheet_layout, include_explanations, include_comments, include_media_files,
             media_download_format, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
             ON CONFLICT(user_id) DO UPDATE SET
                retry_attempts = excluded.retry_attempts,
                delay_between_requests = excluded.delay_between_requests,
                timeout_duration = excluded.timeout_duration,
                enable_media_extraction = excluded.enable_media_extraction,
                output_format = excluded.output_format,
                database = excluded.database,
                spreadsheet_layout = excluded.spreadsheet_layout,
                include_explanations = excluded.include_explanations,
                include_comments = excluded.include_comments,
                include_media_files = excluded.include_media_files,
                media_download_format = excluded.media_download_format,
                updated_at = excluded.updated_at",
            params![
                user_id,
                settings.retry_attempts,
                settings.delay_between_requests,
                settings.timeout_duration,
                settings.enable_media_extraction,
                enum_to_str(&settings.output_format),
                settings.database.as_str(),
                enum_to_str(&settings.spreadsheet_layout),
                settings.include_explanations,
                settings.include_comments,
                settings.include_media_files,
                enum_to_str(&settings.media_download_format),
                now,
            ],
        )?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MediaDownloadFormat, OutputFormat, SpreadsheetLayout};

    #[test]
    fn test_find_missing_returns_none() {
        let db = Database::open_in_memory().unwrap();
        assert!(find(&db, "default_user").unwrap().is_none());
    }

    #[test]
    fn test_upsert_round_trip_and_overwrite() {
        let db = Database::open_in_memory().unwrap();
        upsert(&db, "default_user", &UserSettings::default()).unwrap();
        assert_eq!(
            find(&db, "default_user").unwrap().unwrap(),
            UserSettings::default()
        );

        let changed = UserSettings {
            retry_attempts: 5,
            output_format: OutputFormat::Csv,
            database: QuestionDatabase::Easa2020AllQuestions,
            spreadsheet_layout: SpreadsheetLayout::BySubsection,
            media_download_format: MediaDownloadFormat::Both,
            include_comments: false,
            ..Default::default()
        };
        upsert(&db, "default_user", &changed).unwrap();
        assert_eq!(find(&db, "default_user").unwrap().unwrap(), changed);

        let rows: u32 = db
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM user_settings", [], |r| r.get(0))?)
            })
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_column_defaults_match_model_defaults() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO user_settings (user_id, updated_at) VALUES ('u1', 'now')",
                [],
            )?;
            Ok(())
        })
        .unwrap();
        assert_eq!(find(&db, "u1").unwrap().unwrap(), UserSettings::default());
    }
}
