//! Error types shared across the Sigil engine crates.
use thiserror::Error;

/// Errors from the cumulative-experience pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgressionError {
    #[error("experience amount must be positive")] NonPositiveAmount,
    #[error("experience overflow")] ExperienceOverflow,
}

/// Errors from the analytics aggregator. These are caller errors and are
/// surfaced synchronously, never swallowed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("amount must be positive")] NonPositiveAmount,
    #[error("minutes must be positive")] NonPositiveMinutes,
    #[error("ritual must name at least one element")] EmptyElementSet,
    #[error("days must be positive")] NonPositiveDays,
    #[error("invalid day key: {0}")] InvalidDayKey(String),
}

/// Failure to parse an element name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown element: {0}")]
pub struct ElementParseError(pub String);

/// Errors from the local key-value store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("I/O error: {0}")] Io(String),
    #[error("corrupt value for key {key}: {reason}")] CorruptValue { key: String, reason: String },
    #[error("serialization: {0}")] Serialization(String),
}
