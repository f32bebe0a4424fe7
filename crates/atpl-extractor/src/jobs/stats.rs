//! Live throughput numbers for a job.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::display_subject;
use crate::model::ExtractionJob;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobStats {
    pub questions_per_minute: u32,
    /// Minutes.
    pub estimated_time_remaining: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_subject: Option<String>,
    pub last_extracted: DateTime<Utc>,
    pub percent_complete: u32,
}

impl JobStats {
    pub fn compute(job: &ExtractionJob, now: DateTime<Utc>) -> Self {
        let questions_per_minute = match job.start_time {
            Some(start) => {
                let minutes = (now - start).num_milliseconds() as f64 / 60_000.0;
                if minutes > 0.0 {
                    (job.extracted_questions as f64 / minutes).round() as u32
                } else {
                    0
                }
            }
            None => 0,
        };

        let estimated_time_remaining = if questions_per_minute > 0 {
            job.remaining() as f64 / questions_per_minute as f64
        } else {
            0.0
        };

        Self {
            questions_per_minute,
            estimated_time_remaining,
            current_subject: current_subject(job).map(display_subject),
            last_extracted: job.updated_at,
            percent_complete: job.percent_complete(),
        }
    }
}

/// Subjects are worked through in selection order, so the one in progress
/// is the slice of the total the extracted count falls into.
fn current_subject(job: &ExtractionJob) -> Option<&str> {
    let subjects = job.subject_ids();
    if subjects.is_empty() {
        return None;
    }
    let index = if job.total_questions == 0 {
        0
    } else {
        (job.extracted_questions as u64 * subjects.len() as u64 / job.total_questions as u64)
            as usize
    };
    subjects.get(index.min(subjects.len() - 1)).copied()
}
