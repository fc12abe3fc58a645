//! Error types for configuration and input normalization.
//!
//! The layout engine itself is infallible; everything here is raised while
//! turning caller input (config strings, raw task rows, dataset files) into
//! typed values.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimelineError {
    /// Reading or writing a file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Dataset or settings JSON could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A task timestamp could not be turned into an instant
    #[error("Task '{task_id}': invalid timestamp '{value}'")]
    InvalidTimestamp { task_id: String, value: String },

    /// A task ends before it starts
    #[error("Task '{task_id}': end is before start")]
    InvalidInterval { task_id: String },

    #[error("Unknown view mode '{0}' (expected hour, week or month)")]
    UnknownViewMode(String),

    #[error("Unknown preset '{0}'")]
    UnknownPreset(String),

    #[error("Preset '{preset}' is not available in {mode} view")]
    PresetMismatch { mode: String, preset: String },

    #[error("Invalid month '{0}' (expected YYYY-MM)")]
    InvalidMonth(String),

    #[error("Max lanes must be within 1..=20, got {0}")]
    MaxLanesOutOfRange(usize),

    #[error("Lane offset must be 2, 5 or 10 px, got {0}")]
    InvalidLaneOffset(u32),
}

pub type Result<T> = std::result::Result<T, TimelineError>;
