use std::path::{Path, PathBuf};

use crate::catalog::SUBJECTS;
use crate::config::schema::Config;
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../../../schema/config-v1.json");

/// Keeps a job's total (every subject selected) within `u32`.
pub const MAX_QUESTIONS_PER_SUBJECT: u32 = u32::MAX / SUBJECTS.len() as u32;

/// Config file path, when not given on the command line.
pub const CONFIG_ENV: &str = "ATPL_EXTRACTOR_CONFIG";
/// Overrides `server.port`.
pub const PORT_ENV: &str = "ATPL_EXTRACTOR_PORT";
/// Overrides `database_path`.
pub const DB_ENV: &str = "ATPL_EXTRACTOR_DB";

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: Config = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

/// Loads the effective configuration for the server process.
///
/// The file comes from `cli_path`, then `ATPL_EXTRACTOR_CONFIG`; without
/// either the built-in defaults are used. Port and database path can then be
/// overridden from the environment.
pub fn resolve_config(cli_path: Option<&Path>) -> Result<Config, ConfigError> {
    resolve_config_with(cli_path, |key| std::env::var(key).ok())
}

/// Like [`resolve_config`], reading variables through `env`.
pub fn resolve_config_with<F>(cli_path: Option<&Path>, env: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let path = cli_path
        .map(Path::to_path_buf)
        .or_else(|| env(CONFIG_ENV).filter(|v| !v.is_empty()).map(PathBuf::from));

    let mut config = match path {
        Some(path) => {
            log::info!("Loading configuration from {}", path.display());
            load_config(&path)?
        }
        None => Config::default(),
    };

    if let Some(port) = env(PORT_ENV).filter(|v| !v.is_empty()) {
        config.server.port = port.trim().parse().map_err(|_| ConfigError::Validation {
            message: format!("{} must be a port number, got '{}'", PORT_ENV, port),
        })?;
    }
    if let Some(db) = env(DB_ENV).filter(|v| !v.is_empty()) {
        config.database_path = Some(PathBuf::from(db));
    }

    validate_config(&config)?;
    Ok(config)
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    let sim = &config.simulation;
    if sim.tick_interval_ms < 10 {
        return Err(ConfigError::Validation {
            message: format!(
                "simulation.tick_interval_ms must be at least 10, got {}",
                sim.tick_interval_ms
            ),
        });
    }
    if sim.increment_min > sim.increment_max {
        return Err(ConfigError::Validation {
            message: format!(
                "simulation.increment_min ({}) exceeds increment_max ({})",
                sim.increment_min, sim.increment_max
            ),
        });
    }
    for (name, value) in [
        ("failure_probability", sim.failure_probability),
        ("retry_success_probability", sim.retry_success_probability),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::Validation {
                message: format!("simulation.{} must be within [0, 1], got {}", name, value),
            });
        }
    }
    if sim.questions_per_subject == 0 || sim.questions_per_subject > MAX_QUESTIONS_PER_SUBJECT {
        return Err(ConfigError::Validation {
            message: format!(
                "simulation.questions_per_subject must be within 1..={}, got {}",
                MAX_QUESTIONS_PER_SUBJECT, sim.questions_per_subject
            ),
        });
    }

    Ok(())
}
