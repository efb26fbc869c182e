use thiserror::Error;

/// Validation and contract errors exposed by `universe-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ticker cannot be empty")]
    EmptyTicker,
    #[error("ticker length {len} exceeds max {max}")]
    TickerTooLong { len: usize, max: usize },
    #[error("ticker must start with an ASCII letter or '^': '{ch}'")]
    TickerInvalidStart { ch: char },
    #[error("ticker contains invalid character '{ch}' at index {index}")]
    TickerInvalidChar { ch: char, index: usize },

    #[error("date must be formatted as YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
    #[error("date range begin {begin} is after end {end}")]
    InvertedDateRange { begin: String, end: String },
    #[error("date range text must look like '[YYYY-MM-DD, YYYY-MM-DD]': '{value}'")]
    InvalidDateRangeText { value: String },

    #[error("measurement period must be a positive integer: {value}")]
    InvalidMeasurementPeriod { value: i64 },

    #[error("universe name cannot be empty")]
    EmptyUniverseName,

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}
