///! USGS FDSN event service client
///!
///! Builds the `fdsnws/event/1/query` URL from a [`QueryConfig`] and
///! downloads the GeoJSON body. Every failure collapses into an empty body.

use async_trait::async_trait;
use quake_common::QueryConfig;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;

use crate::error::FetchError;

pub const USGS_BASE_URL: &str = "https://earthquake.usgs.gov";
pub const QUERY_PATH: &str = "fdsnws/event/1/query";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = "quake-backend/0.1";
const RESPONSE_FORMAT: &str = "geojson";

/// Anything that can produce a raw earthquake response body.
///
/// An empty string means the fetch failed.
#[async_trait]
pub trait EarthquakeSource: Send + Sync {
    async fn fetch(&self, config: &QueryConfig) -> String;
}

/// HTTP fetcher for the USGS event service. Issues one GET per call, no retry.
#[derive(Debug, Clone)]
pub struct UsgsFetcher {
    client:   Client,
    base_url: String,
}

impl UsgsFetcher {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Download the response body, keeping the failure reason.
    ///
    /// Only status 200 counts as success. The response is dropped on every
    /// return path, which closes the connection or hands it back to the pool.
    pub async fn try_fetch(&self, config: &QueryConfig) -> Result<String, FetchError> {
        let url = build_url(&self.base_url, config)?;
        tracing::debug!("Fetching earthquakes from {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        tracing::debug!("Downloaded {} bytes of earthquake data", body.len());
        Ok(body)
    }
}

#[async_trait]
impl EarthquakeSource for UsgsFetcher {
    async fn fetch(&self, config: &QueryConfig) -> String {
        match self.try_fetch(config).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Earthquake fetch failed: {}", e);
                String::new()
            }
        }
    }
}

/// Build the query URL for `config` on top of `base` (scheme + host).
pub fn build_url(base: &str, config: &QueryConfig) -> Result<Url, FetchError> {
    let mut url =
        Url::parse(base).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base, e)))?;

    if url.cannot_be_a_base() {
        return Err(FetchError::InvalidUrl(format!("{}: not a base URL", base)));
    }

    url.set_path(QUERY_PATH);
    url.set_query(None);
    url.query_pairs_mut()
        .append_pair("format", RESPONSE_FORMAT)
        .append_pair("starttime", &config.start_time_param())
        .append_pair("endtime", &config.end_time_param())
        .append_pair("limit", &config.limit.to_string())
        .append_pair("minmagnitude", &config.min_magnitude.to_string())
        .append_pair("orderby", config.order_by.as_str());

    Ok(url)
}
