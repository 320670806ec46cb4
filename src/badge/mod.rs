//! Badge data for Open VSX extensions
//!
//! Each [`BadgeKind`] turns a validated [`ExtensionRecord`] into the
//! label/message/color triple a renderer draws. Lookup failures become an
//! error badge under the default label.

pub mod format;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::openvsx::error::LookupError;
use crate::openvsx::lookup::{LookupRequest, RegistryExtensionLookup};
use crate::openvsx::record::ExtensionRecord;

/// Label used when a badge kind does not set its own, and for error badges
pub const DEFAULT_LABEL: &str = "open vsx";

pub const DEFAULT_COLOR: &str = "blue";

/// Search keywords the Open VSX badges are listed under
pub const KEYWORDS: [&str; 4] = [
    "ovsx",
    "open-vsx",
    "ovsx-marketplace",
    "open-vsx-marketplace",
];

const NOT_FOUND_COLOR: &str = "red";
const INACCESSIBLE_COLOR: &str = "lightgrey";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeData {
    pub label: String,
    pub message: String,
    pub color: String,
}

impl BadgeData {
    pub fn new(label: &str, message: impl Into<String>, color: &str) -> Self {
        Self {
            label: label.to_string(),
            message: message.into(),
            color: color.to_string(),
        }
    }

    pub fn from_error(error: &LookupError) -> Self {
        let color = if error.is_not_found() {
            NOT_FOUND_COLOR
        } else {
            INACCESSIBLE_COLOR
        };
        Self::new(DEFAULT_LABEL, error.pretty_message(), color)
    }
}

/// Which property of the extension the badge shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BadgeKind {
    Version,
    Downloads,
    Rating,
    ReleaseDate,
}

impl BadgeKind {
    pub fn label(&self) -> &'static str {
        match self {
            BadgeKind::Version => "version",
            BadgeKind::Downloads => "downloads",
            BadgeKind::Rating => "rating",
            BadgeKind::ReleaseDate => "release date",
        }
    }

    /// Renders a record that already passed `validate_response`
    pub fn render(&self, record: &ExtensionRecord, now: DateTime<Utc>) -> BadgeData {
        match self {
            BadgeKind::Version => {
                let version = record.version.as_deref().unwrap_or_default();
                BadgeData::new(
                    self.label(),
                    format::add_v(version),
                    format::version_color(version),
                )
            }
            BadgeKind::Downloads => {
                let downloads = record.download_count.unwrap_or(0.0);
                let color = if downloads > 0.0 { "brightgreen" } else { "red" };
                BadgeData::new(self.label(), format::metric(downloads), color)
            }
            BadgeKind::Rating => match (record.average_rating, record.review_count) {
                (Some(rating), Some(reviews)) => BadgeData::new(
                    self.label(),
                    format!("{:.1}/5 ({})", rating, format::metric(reviews)),
                    format::rating_color(rating),
                ),
                _ => BadgeData::new(self.label(), "no ratings", INACCESSIBLE_COLOR),
            },
            BadgeKind::ReleaseDate => match record.published_at() {
                Some(published) => BadgeData::new(
                    self.label(),
                    published.format("%Y-%m-%d").to_string(),
                    format::age_color((now - published).num_days()),
                ),
                None => BadgeData::new(self.label(), "unknown", INACCESSIBLE_COLOR),
            },
        }
    }
}

/// Looks up the extension and renders `kind`, or an error badge on failure
pub async fn fetch_badge(
    lookup: &RegistryExtensionLookup,
    kind: BadgeKind,
    request: &LookupRequest,
) -> BadgeData {
    match lookup.fetch(request).await {
        Ok(record) => kind.render(&record, Utc::now()),
        Err(e) => {
            debug!(
                "Lookup of {}/{} failed: {}",
                request.namespace, request.extension, e
            );
            BadgeData::from_error(&e)
        }
    }
}
