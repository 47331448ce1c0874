//! Error types for Kondate
//!
//! Centralized error handling using thiserror.

use chrono::NaiveDate;
use thiserror::Error;

/// All error types that can occur in Kondate
#[derive(Debug, Error)]
pub enum KondateError {
    /// Malformed configuration (weekday table, window size, times)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A category required on some day has no candidate items
    #[error("No items in category '{category}' required on {date}")]
    EmptyCategory { category: String, date: NaiveDate },

    /// Persisted state error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Item source (file or remote database) error
    #[error("Item source error: {0}")]
    Source(String),

    /// Calendar rendering or output error
    #[error("Calendar error: {0}")]
    Calendar(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for Kondate operations
pub type Result<T> = std::result::Result<T, KondateError>;
