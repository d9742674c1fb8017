///! USGS GeoJSON parser
///!
///! Turns the `fdsnws/event/1/query?format=geojson` response into
///! [`EarthquakeRecord`]s. Optional fields are decoded one by one, each
///! with its own fixed fallback.

use chrono::{FixedOffset, Offset, Utc};
use quake_common::EarthquakeRecord;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ParseError;

const FEATURES_KEY: &str = "features";
const PROPERTIES_KEY: &str = "properties";
const MAG_KEY: &str = "mag";
const PLACE_KEY: &str = "place";
const TIME_KEY: &str = "time";
const URL_KEY: &str = "url";

const FALLBACK_MAGNITUDE: f64 = 0.0;
const FALLBACK_TIME_MS: i64 = 0;

/// What to do with a feature that has no `properties` object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingProperties {
    /// Reject the whole response
    #[default]
    Fail,
    /// Drop the feature and keep going
    Skip,
}

#[derive(Debug, Clone)]
pub struct EarthquakeParser {
    zone: FixedOffset,
    missing_properties: MissingProperties,
}

impl Default for EarthquakeParser {
    fn default() -> Self {
        Self::new(Utc.fix(), MissingProperties::default())
    }
}

impl EarthquakeParser {
    pub fn new(zone: FixedOffset, missing_properties: MissingProperties) -> Self {
        Self {
            zone,
            missing_properties,
        }
    }

    pub fn zone(&self) -> FixedOffset {
        self.zone
    }

    pub fn missing_properties(&self) -> MissingProperties {
        self.missing_properties
    }

    /// Parse a response body.
    ///
    /// `None` means the body could not be parsed at all; `Some(vec![])` means
    /// valid JSON without any features.
    pub fn parse(&self, body: &str) -> Option<Vec<EarthquakeRecord>> {
        match self.try_parse(body) {
            Ok(records) => Some(records),
            Err(e) => {
                tracing::warn!("Failed to parse earthquake response: {}", e);
                None
            }
        }
    }

    /// Parse a response body, keeping the failure reason.
    pub fn try_parse(&self, body: &str) -> Result<Vec<EarthquakeRecord>, ParseError> {
        let root: Value = serde_json::from_str(body)?;
        let root = root.as_object().ok_or(ParseError::RootNotObject)?;

        let Some(features) = root.get(FEATURES_KEY).and_then(Value::as_array) else {
            return Ok(Vec::new());
        };

        let mut records = Vec::with_capacity(features.len());
        for (index, feature) in features.iter().enumerate() {
            let feature = feature
                .as_object()
                .ok_or(ParseError::FeatureNotObject(index))?;

            let Some(properties) = feature.get(PROPERTIES_KEY).and_then(Value::as_object) else {
                match self.missing_properties {
                    MissingProperties::Fail => return Err(ParseError::MissingProperties(index)),
                    MissingProperties::Skip => {
                        tracing::debug!("Skipping feature {} without properties", index);
                        continue;
                    }
                }
            };

            records.push(self.record_from_properties(properties));
        }

        Ok(records)
    }

    fn record_from_properties(&self, properties: &Map<String, Value>) -> EarthquakeRecord {
        let magnitude = opt_f64(properties.get(MAG_KEY)).unwrap_or(FALLBACK_MAGNITUDE);
        let place = opt_string(properties.get(PLACE_KEY)).unwrap_or_default();
        let time_ms = opt_i64(properties.get(TIME_KEY)).unwrap_or(FALLBACK_TIME_MS);
        let url = opt_string(properties.get(URL_KEY)).unwrap_or_default();

        EarthquakeRecord::new(magnitude, &place, time_ms, url, &self.zone)
    }
}

/// Parse with UTC display times and all-or-nothing handling of bad features.
pub fn parse_earthquakes(body: &str) -> Option<Vec<EarthquakeRecord>> {
    EarthquakeParser::default().parse(body)
}

/// Number, or a string holding a number
fn opt_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Integer, float (truncated), or a string holding either
fn opt_i64(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

/// String as-is, other non-null values in their JSON text form.
/// JSON `null` counts as absent, so the caller's empty default applies
/// instead of the literal text `"null"`.
fn opt_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
