use thiserror::Error;

/// Rejected query settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("minimum magnitude must be a whole number, got '{0}'")]
    NotAnInteger(String),

    #[error("minimum magnitude {value} is above the maximum of {max}")]
    AboveMaximum { value: u32, max: u8 },

    #[error("start time {start} is after end time {end}")]
    InvertedWindow { start: String, end: String },

    #[error("result limit must be at least 1")]
    ZeroLimit,

    #[error("unknown sort order: {0}")]
    UnknownSortOrder(String),
}
