//! Failure reasons for the fetch and parse stages.
//!
//! Neither stage returns these to its caller; they are logged and collapsed
//! into the empty-body / `None` sentinels.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("request denied with status {0}")]
    Status(u16),
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response root is not a JSON object")]
    RootNotObject,

    #[error("feature {0} is not a JSON object")]
    FeatureNotObject(usize),

    #[error("feature {0} has no \"properties\" object")]
    MissingProperties(usize),
}
