use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// Largest minimum magnitude a user may ask for.
pub const MAX_MIN_MAGNITUDE: u8 = 8;

/// Server-side ordering of the returned events (`orderby` query parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortOrder {
    /// Largest magnitude first
    #[default]
    #[serde(rename = "magnitude")]
    Magnitude,
    /// Most recent first
    #[serde(rename = "time")]
    Time,
    #[serde(rename = "magnitude-asc")]
    MagnitudeAsc,
    #[serde(rename = "time-asc")]
    TimeAsc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Magnitude => "magnitude",
            SortOrder::Time => "time",
            SortOrder::MagnitudeAsc => "magnitude-asc",
            SortOrder::TimeAsc => "time-asc",
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "magnitude" => Ok(SortOrder::Magnitude),
            "time" => Ok(SortOrder::Time),
            "magnitude-asc" => Ok(SortOrder::MagnitudeAsc),
            "time-asc" => Ok(SortOrder::TimeAsc),
            _ => Err(QueryError::UnknownSortOrder(s.to_string())),
        }
    }
}

/// Parameters for one fetch. Built right before the request and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    #[serde(default = "default_start_time")]
    pub start_time: NaiveDate,

    #[serde(default = "default_end_time")]
    pub end_time: NaiveDate,

    #[serde(default = "default_min_magnitude")]
    pub min_magnitude: u8,

    #[serde(default = "default_limit")]
    pub limit: u32,

    #[serde(default)]
    pub order_by: SortOrder,
}

fn default_start_time() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 12, 11).unwrap_or_default()
}

fn default_end_time() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 12, 13).unwrap_or_default()
}

fn default_min_magnitude() -> u8 {
    6
}

fn default_limit() -> u32 {
    100
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            start_time: default_start_time(),
            end_time: default_end_time(),
            min_magnitude: default_min_magnitude(),
            limit: default_limit(),
            order_by: SortOrder::default(),
        }
    }
}

impl QueryConfig {
    pub fn with_window(mut self, start_time: NaiveDate, end_time: NaiveDate) -> Self {
        self.start_time = start_time;
        self.end_time = end_time;
        self
    }

    pub fn with_min_magnitude(mut self, min_magnitude: u8) -> Self {
        self.min_magnitude = min_magnitude;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_order_by(mut self, order_by: SortOrder) -> Self {
        self.order_by = order_by;
        self
    }

    /// Validate a user-entered minimum magnitude.
    ///
    /// Only whole numbers up to [`MAX_MIN_MAGNITUDE`] are accepted.
    pub fn parse_min_magnitude(input: &str) -> Result<u8, QueryError> {
        let value: u32 = input
            .trim()
            .parse()
            .map_err(|_| QueryError::NotAnInteger(input.to_string()))?;

        if value > MAX_MIN_MAGNITUDE as u32 {
            return Err(QueryError::AboveMaximum {
                value,
                max: MAX_MIN_MAGNITUDE,
            });
        }

        Ok(value as u8)
    }

    pub fn validate(&self) -> Result<(), QueryError> {
        if self.min_magnitude > MAX_MIN_MAGNITUDE {
            return Err(QueryError::AboveMaximum {
                value: self.min_magnitude as u32,
                max: MAX_MIN_MAGNITUDE,
            });
        }
        if self.start_time > self.end_time {
            return Err(QueryError::InvertedWindow {
                start: self.start_time_param(),
                end: self.end_time_param(),
            });
        }
        if self.limit == 0 {
            return Err(QueryError::ZeroLimit);
        }
        Ok(())
    }

    /// `starttime` as the API expects it, e.g. "2021-12-11"
    pub fn start_time_param(&self) -> String {
        self.start_time.format("%Y-%m-%d").to_string()
    }

    /// `endtime` as the API expects it
    pub fn end_time_param(&self) -> String {
        self.end_time.format("%Y-%m-%d").to_string()
    }
}
