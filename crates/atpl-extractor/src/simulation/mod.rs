//! Simulated extraction: a per-job loop that advances counters at random.

pub mod registry;
pub mod runner;
pub mod source;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use registry::SimulationRegistry;
pub use runner::{tick, TickOutcome};
pub use source::{OutcomeSource, RandomSource, ScriptedSource, SourceFactory};

/// Tuning knobs for the simulated extraction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub tick_interval_ms: u64,
    /// Smallest per-tick increment (inclusive).
    pub increment_min: u32,
    /// Largest per-tick increment (inclusive).
    pub increment_max: u32,
    pub failure_probability: f64,
    pub retry_success_probability: f64,
    /// Mock estimate used for a job's total question count.
    pub questions_per_subject: u32,
    pub results_root: String,
    pub question_url_base: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 2000,
            increment_min: 10,
            increment_max: 59,
            failure_probability: 0.05,
            retry_success_probability: 0.7,
            questions_per_subject: 1200,
            results_root: "/results".to_string(),
            question_url_base: "https://www.atplquestions.com/question".to_string(),
        }
    }
}

impl SimulationConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
