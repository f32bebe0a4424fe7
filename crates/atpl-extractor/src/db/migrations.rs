//! Schema versions. The highest applied version is kept in `_migrations`;
//! newer scripts run in order, one transaction each.

use rusqlite::Connection;

use super::error::DatabaseError;

struct Migration {
    version: u32,
    description: &'static str,
    sql: &'static str,
}

/// Append only. Versions must keep increasing.
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "create_extraction_jobs_table",
        sql: include_str!("sql/001_create_extraction_jobs.sql"),
    },
    Migration {
        version: 2,
        description: "create_extraction_logs_table",
        sql: include_str!("sql/002_create_extraction_logs.sql"),
    },
    Migration {
        version: 3,
        description: "create_failed_questions_table",
        sql: include_str!("sql/003_create_failed_questions.sql"),
    },
    Migration {
        version: 4,
        description: "create_extraction_results_table",
        sql: include_str!("sql/004_create_extraction_results.sql"),
    },
    Migration {
        version: 5,
        description: "create_user_settings_table",
        sql: include_str!("sql/005_create_user_settings.sql"),
    },
];

/// Brings the schema of `conn` up to the latest version.
pub fn run_all(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    let applied: u32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM _migrations",
        [],
        |r| r.get(0),
    )?;

    let pending = MIGRATIONS.iter().filter(|m| m.version > applied);
    for migration in pending {
        log::info!(
            "Applying schema v{} ({})",
            migration.version,
            migration.description
        );

        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(migration.sql)
            .map_err(|e| DatabaseError::Migration {
                version: migration.version,
                reason: e.to_string(),
            })?;
        tx.execute(
            "INSERT INTO _migrations (version, description) VALUES (?1, ?2)",
            rusqlite::params![migration.version, migration.description],
        )?;
        tx.commit()?;
    }

    Ok(())
}
