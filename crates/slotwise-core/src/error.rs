//! Core error types for slotwise-core.
//!
//! This module defines the error hierarchy using thiserror. Scheduling
//! configuration mistakes (`ScheduleError`) are fatal for the current call
//! and must be fixed by the caller; a task that cannot be placed is *not*
//! an error and is reported as `None` in the reschedule outcome.

use chrono::{DateTime, NaiveTime, Utc, Weekday};
use thiserror::Error;

/// Core error type for slotwise-core.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Malformed scheduling range or working-hours policy
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// External collaborator (calendar, store, suggestion service) failure
    #[error("Collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Scheduling-input errors. Fatal for the current pass: the caller must
/// fix the range or policy before retrying.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleError {
    /// The requested range is empty or inverted
    #[error("Invalid range: range_end ({end}) must be after range_start ({start})")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// A working-hours window is empty or inverted
    #[error("Invalid policy for {day}: window end ({end}) must be after start ({start})")]
    InvalidPolicy {
        day: Weekday,
        start: NaiveTime,
        end: NaiveTime,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed {
        path: std::path::PathBuf,
        message: String,
    },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed {
        path: std::path::PathBuf,
        message: String,
    },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Error reported by an external collaborator.
///
/// Collaborator I/O failures propagate unchanged; the engine never
/// retries internally.
#[derive(Error, Debug)]
#[error("'{service}': {message}")]
pub struct CollaboratorError {
    pub service: String,
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CollaboratorError {
    pub fn new(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        service: impl Into<String>,
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self {
            service: service.into(),
            message: message.into(),
            source: Some(source),
        }
    }
}

/// Result type alias for EngineError
pub type Result<T, E = EngineError> = std::result::Result<T, E>;
