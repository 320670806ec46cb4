//! Extension metadata returned by the Open VSX API

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::openvsx::error::LookupError;

/// Highest value the registry uses for `averageRating`
pub const MAX_RATING: f64 = 5.0;

/// Subset of the extension document the badges care about.
///
/// Fields beyond these are ignored when decoding.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_count: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
}

impl ExtensionRecord {
    /// Decodes a response body and checks it against the record schema
    pub fn from_json(body: &str) -> Result<Self, LookupError> {
        let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
            warn!("Failed to parse Open VSX response: {}", e);
            LookupError::InvalidResponse(e.to_string())
        })?;

        if !value.is_object() {
            return Err(LookupError::InvalidResponse(
                "expected a JSON object".to_string(),
            ));
        }

        let record: ExtensionRecord = serde_json::from_value(value).map_err(|e| {
            warn!("Open VSX response has unexpected types: {}", e);
            LookupError::InvalidResponse(e.to_string())
        })?;

        record.validate_schema()?;
        Ok(record)
    }

    /// Checks the conditional field rules that serde cannot express.
    ///
    /// A record without `error` and without `version` passes; the caller
    /// treats it as a missing extension.
    pub fn validate_schema(&self) -> Result<(), LookupError> {
        if let Some(error) = &self.error {
            if error.is_empty() {
                return Err(invalid("\"error\" is not allowed to be empty"));
            }
            if self.version.is_some() {
                return Err(invalid("\"version\" is not allowed with \"error\""));
            }
            if self.timestamp.is_some() {
                return Err(invalid("\"timestamp\" is not allowed with \"error\""));
            }
        } else if self.version.as_deref().is_some_and(|v| !v.is_empty()) {
            match self.timestamp.as_deref() {
                None => return Err(invalid("\"timestamp\" is required")),
                Some(timestamp) if parse_iso_date(timestamp).is_none() => {
                    return Err(invalid("\"timestamp\" must be a valid ISO 8601 date"));
                }
                Some(_) => {}
            }
        }

        check_counter("downloadCount", self.download_count)?;
        check_counter("reviewCount", self.review_count)?;

        if let Some(rating) = self.average_rating {
            if self.review_count.is_none() {
                return Err(invalid("\"averageRating\" is not allowed"));
            }
            if !rating.is_finite() || !(0.0..=MAX_RATING).contains(&rating) {
                return Err(invalid(
                    "\"averageRating\" must be between 0 and 5",
                ));
            }
        }

        Ok(())
    }

    /// Publication time of this version, if the timestamp is present and parses
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_deref().and_then(parse_iso_date)
    }
}

fn invalid(reason: &str) -> LookupError {
    warn!("Open VSX response failed schema validation: {}", reason);
    LookupError::InvalidResponse(reason.to_string())
}

fn check_counter(name: &str, value: Option<f64>) -> Result<(), LookupError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(invalid(&format!(
            "\"{}\" must be greater than or equal to 0",
            name
        ))),
        _ => Ok(()),
    }
}

/// ISO 8601 date-time layouts with an offset; `%#z` takes `Z`, `+00`, `+0000` and `+00:00`
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M%#z"];

/// The same layouts without an offset, read as UTC
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parses ISO 8601 date-times (with or without seconds and offset) and plain dates
fn parse_iso_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(datetime) = DateTime::parse_from_str(value, format) {
            return Some(datetime.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
