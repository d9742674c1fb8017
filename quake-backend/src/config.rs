use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::Context;
use chrono::FixedOffset;
use quake_common::QueryConfig;
use serde::{Deserialize, Serialize};

use crate::module::quake::fetcher::{DEFAULT_TIMEOUT, USGS_BASE_URL};
use crate::module::quake::{EarthquakeParser, MissingProperties};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuakeConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Zone used to render event times, in minutes east of UTC
    #[serde(default)]
    pub utc_offset_minutes: i32,

    /// Drop features without "properties" instead of failing the whole response
    #[serde(default)]
    pub skip_features_without_properties: bool,

    #[serde(default)]
    pub query: QueryConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_api_base() -> String {
    USGS_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl Default for QuakeConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: default_log_dir(),
            api_base: default_api_base(),
            request_timeout_secs: default_request_timeout_secs(),
            utc_offset_minutes: 0,
            skip_features_without_properties: false,
            query: QueryConfig::default(),
        }
    }
}

pub static CONFIG: OnceLock<QuakeConfig> = OnceLock::new();

/// Load `path` into [`CONFIG`]. Later calls keep the first value.
pub fn read_config(path: impl AsRef<Path>) -> anyhow::Result<&'static QuakeConfig> {
    let config = QuakeConfig::load_or_default(path)?;
    Ok(CONFIG.get_or_init(|| config))
}

impl QuakeConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Like [`from_file`](Self::from_file), but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: QuakeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.query.validate().context("Invalid [query] settings")?;
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be at least 1");
        }
        self.display_offset()?;
        Ok(())
    }

    pub fn query(&self) -> QueryConfig {
        self.query.clone()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn display_offset(&self) -> anyhow::Result<FixedOffset> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .with_context(|| {
            format!("utc_offset_minutes out of range: {}", self.utc_offset_minutes)
        })
    }

    pub fn parser(&self) -> anyhow::Result<EarthquakeParser> {
        let missing_properties = if self.skip_features_without_properties {
            MissingProperties::Skip
        } else {
            MissingProperties::Fail
        };
        Ok(EarthquakeParser::new(self.display_offset()?, missing_properties))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quake_common::SortOrder;
    use tempfile::TempDir;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = QuakeConfig::from_toml("").unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_dir, "logs");
        assert_eq!(config.api_base, "https://earthquake.usgs.gov");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.query(), QueryConfig::default());
        assert_eq!(config.parser().unwrap().missing_properties(), MissingProperties::Fail);
    }

    #[test]
    fn test_full_toml() {
        let config = QuakeConfig::from_toml(
            r#"
            log_level = "debug"
            api_base = "http://127.0.0.1:9000"
            request_timeout_secs = 5
            utc_offset_minutes = 330
            skip_features_without_properties = true

            [query]
            start_time = "2024-01-01"
            end_time = "2024-01-31"
            min_magnitude = 4
            limit = 250
            order_by = "time-asc"
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.query.start_time_param(), "2024-01-01");
        assert_eq!(config.query.min_magnitude, 4);
        assert_eq!(config.query.limit, 250);
        assert_eq!(config.query.order_by, SortOrder::TimeAsc);

        let parser = config.parser().unwrap();
        assert_eq!(parser.zone().local_minus_utc(), 330 * 60);
        assert_eq!(parser.missing_properties(), MissingProperties::Skip);
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        assert!(QuakeConfig::from_toml("[query]\nmin_magnitude = 9").is_err());
        assert!(QuakeConfig::from_toml("[query]\norder_by = \"depth\"").is_err());
        assert!(QuakeConfig::from_toml("request_timeout_secs = 0").is_err());
        assert!(QuakeConfig::from_toml("utc_offset_minutes = 100000").is_err());
    }

    #[test]
    fn test_load_from_file_and_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[query]\nlimit = 10\n").unwrap();

        let config = QuakeConfig::from_file(&path).unwrap();
        assert_eq!(config.query.limit, 10);

        let missing = dir.path().join("absent.toml");
        assert!(QuakeConfig::from_file(&missing).is_err());
        assert_eq!(QuakeConfig::load_or_default(&missing).unwrap().query.limit, 100);
    }

    #[test]
    fn test_read_config_sets_global_once() {
        let dir = TempDir::new().unwrap();
        let config = read_config(dir.path().join("absent.toml")).unwrap();
        assert!(std::ptr::eq(config, CONFIG.get().unwrap()));
    }
}
