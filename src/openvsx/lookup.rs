//! Open VSX extension lookup

use std::sync::Arc;

use tracing::{debug, warn};

use crate::openvsx::error::LookupError;
use crate::openvsx::fetcher::JsonFetcher;
use crate::openvsx::record::ExtensionRecord;

/// Default base URL for the Open VSX API
pub const DEFAULT_BASE_URL: &str = "https://open-vsx.org/api";

/// Status messages specific to the extension endpoint
const ERROR_MESSAGES: &[(u16, &str)] = &[(400, "invalid extension id")];

/// Status messages shared by every JSON endpoint
const DEFAULT_ERROR_MESSAGES: &[(u16, &str)] = &[
    (404, "not found"),
    (429, "rate limited by upstream service"),
];

/// Coordinates of the extension (and optionally the version) to look up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub namespace: String,
    pub extension: String,
    pub version: Option<String>,
}

impl LookupRequest {
    pub fn new(namespace: &str, extension: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            extension: extension.to_string(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }
}

/// Fetches and validates extension metadata from the Open VSX API
pub struct RegistryExtensionLookup {
    fetcher: Arc<dyn JsonFetcher>,
    base_url: String,
}

impl RegistryExtensionLookup {
    /// Creates a lookup against a custom base URL
    pub fn new(fetcher: Arc<dyn JsonFetcher>, base_url: &str) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Creates a lookup against the public Open VSX instance
    pub fn with_default_base_url(fetcher: Arc<dyn JsonFetcher>) -> Self {
        Self::new(fetcher, DEFAULT_BASE_URL)
    }

    /// Builds `<base>/<namespace>/<extension>[/<version>]`
    pub fn request_url(&self, request: &LookupRequest) -> String {
        match &request.version {
            Some(version) => format!(
                "{}/{}/{}/{}",
                self.base_url, request.namespace, request.extension, version
            ),
            None => format!(
                "{}/{}/{}",
                self.base_url, request.namespace, request.extension
            ),
        }
    }

    /// Fetches one extension (or extension version) record
    ///
    /// # Returns
    /// * `Ok(ExtensionRecord)` - A record that has a version and a timestamp
    /// * `Err(LookupError)` - Transport, status, schema or not-found failure
    pub async fn fetch(&self, request: &LookupRequest) -> Result<ExtensionRecord, LookupError> {
        let url = self.request_url(request);
        debug!("Fetching Open VSX extension: {}", url);

        let response = self.fetcher.get(&url).await?;

        // Status wins over the body, so a 400 carrying {"error": ...} is still an invalid id
        if let Err(e) = check_status(response.status) {
            warn!("Open VSX returned status {}: {}", response.status, url);
            return Err(e);
        }

        let record = ExtensionRecord::from_json(&response.body)?;
        Self::validate_response(record)
    }

    /// Normalizes the registry's two ways of saying "no such extension"
    pub fn validate_response(record: ExtensionRecord) -> Result<ExtensionRecord, LookupError> {
        let has_version = record.version.as_deref().is_some_and(|v| !v.is_empty());
        if record.error.is_some() || !has_version {
            return Err(LookupError::not_found());
        }
        Ok(record)
    }
}

fn check_status(status: u16) -> Result<(), LookupError> {
    if (200..300).contains(&status) {
        return Ok(());
    }

    let message = error_message(status);
    if status == 404 {
        return Err(LookupError::NotFound(message));
    }
    Err(LookupError::Status { status, message })
}

fn error_message(status: u16) -> String {
    ERROR_MESSAGES
        .iter()
        .chain(DEFAULT_ERROR_MESSAGES)
        .find(|(code, _)| *code == status)
        .map(|(_, message)| message.to_string())
        .unwrap_or_else(|| {
            if status >= 500 {
                "inaccessible".to_string()
            } else {
                "invalid".to_string()
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openvsx::fetcher::{HttpResponse, MockJsonFetcher};
    use rstest::rstest;

    fn lookup_with(fetcher: MockJsonFetcher) -> RegistryExtensionLookup {
        RegistryExtensionLookup::with_default_base_url(Arc::new(fetcher))
    }

    fn fetcher_returning(url: &'static str, status: u16, body: &'static str) -> MockJsonFetcher {
        let mut fetcher = MockJsonFetcher::new();
        fetcher
            .expect_get()
            .withf(move |u| u == url)
            .times(1)
            .returning(move |_| Ok(HttpResponse::new(status, body)));
        fetcher
    }

    #[rstest]
    #[case(None, "https://open-vsx.org/api/redhat/java")]
    #[case(Some("1.2.3"), "https://open-vsx.org/api/redhat/java/1.2.3")]
    fn request_url_appends_version_only_when_given(
        #[case] version: Option<&str>,
        #[case] expected: &str,
    ) {
        let lookup = lookup_with(MockJsonFetcher::new());
        let mut request = LookupRequest::new("redhat", "java");
        if let Some(version) = version {
            request = request.with_version(version);
        }

        assert_eq!(lookup.request_url(&request), expected);
    }

    #[test]
    fn request_url_ignores_trailing_slash_in_base_url() {
        let lookup =
            RegistryExtensionLookup::new(Arc::new(MockJsonFetcher::new()), "http://localhost/api/");

        assert_eq!(
            lookup.request_url(&LookupRequest::new("ms-python", "python")),
            "http://localhost/api/ms-python/python"
        );
    }

    #[tokio::test]
    async fn fetch_returns_record_unchanged() {
        let lookup = lookup_with(fetcher_returning(
            "https://open-vsx.org/api/redhat/java",
            200,
            r#"{"version": "1.0.0", "timestamp": "2023-01-01T00:00:00Z", "downloadCount": 1000}"#,
        ));

        let record = lookup
            .fetch(&LookupRequest::new("redhat", "java"))
            .await
            .unwrap();

        assert_eq!(
            record,
            ExtensionRecord {
                version: Some("1.0.0".to_string()),
                timestamp: Some("2023-01-01T00:00:00Z".to_string()),
                download_count: Some(1000.0),
                ..Default::default()
            }
        );
    }

    #[tokio::test]
    async fn fetch_requests_specific_version() {
        let lookup = lookup_with(fetcher_returning(
            "https://open-vsx.org/api/redhat/java/1.2.3",
            200,
            r#"{"version": "1.2.3", "timestamp": "2023-01-01T00:00:00Z"}"#,
        ));

        let record = lookup
            .fetch(&LookupRequest::new("redhat", "java").with_version("1.2.3"))
            .await
            .unwrap();

        assert_eq!(record.version.as_deref(), Some("1.2.3"));
    }

    #[rstest]
    #[case::error_field(r#"{"error": "not found"}"#)]
    #[case::empty_object("{}")]
    #[case::empty_version(r#"{"version": "", "timestamp": "2023-01-01T00:00:00Z"}"#)]
    #[tokio::test]
    async fn fetch_normalizes_missing_extension(#[case] body: &'static str) {
        let lookup = lookup_with(fetcher_returning(
            "https://open-vsx.org/api/redhat/java",
            200,
            body,
        ));

        let result = lookup.fetch(&LookupRequest::new("redhat", "java")).await;

        match result {
            Err(LookupError::NotFound(message)) => assert_eq!(message, "extension not found"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[rstest]
    #[case(400, r#"{"error": "Invalid extension id"}"#, "invalid extension id")]
    #[case(400, "Bad Request", "invalid extension id")]
    #[case(429, "", "rate limited by upstream service")]
    #[case(403, "", "invalid")]
    #[case(500, "", "inaccessible")]
    #[case(503, "<html></html>", "inaccessible")]
    #[tokio::test]
    async fn fetch_maps_error_statuses(
        #[case] status: u16,
        #[case] body: &'static str,
        #[case] expected: &str,
    ) {
        let lookup = lookup_with(fetcher_returning(
            "https://open-vsx.org/api/redhat/java",
            status,
            body,
        ));

        let result = lookup.fetch(&LookupRequest::new("redhat", "java")).await;

        match result {
            Err(LookupError::Status {
                status: actual,
                message,
            }) => {
                assert_eq!(actual, status);
                assert_eq!(message, expected);
            }
            other => panic!("expected Status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_maps_404_to_not_found() {
        let lookup = lookup_with(fetcher_returning(
            "https://open-vsx.org/api/redhat/java",
            404,
            r#"{"error": "Extension not found: redhat.java"}"#,
        ));

        let result = lookup.fetch(&LookupRequest::new("redhat", "java")).await;

        assert!(matches!(result, Err(LookupError::NotFound(m)) if m == "not found"));
    }

    #[tokio::test]
    async fn fetch_rejects_rating_above_five() {
        let lookup = lookup_with(fetcher_returning(
            "https://open-vsx.org/api/redhat/java",
            200,
            r#"{"version": "2.0", "timestamp": "2023-01-01T00:00:00Z", "reviewCount": 10, "averageRating": 6}"#,
        ));

        let result = lookup.fetch(&LookupRequest::new("redhat", "java")).await;

        assert!(matches!(result, Err(LookupError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn fetch_propagates_fetcher_errors() {
        let mut fetcher = MockJsonFetcher::new();
        fetcher
            .expect_get()
            .times(1)
            .returning(|_| Err(LookupError::InvalidResponse("truncated body".to_string())));
        let lookup = lookup_with(fetcher);

        let result = lookup.fetch(&LookupRequest::new("redhat", "java")).await;

        assert!(matches!(result, Err(LookupError::InvalidResponse(m)) if m == "truncated body"));
    }

    #[test]
    fn validate_response_prefers_error_over_other_fields() {
        let record = ExtensionRecord {
            error: Some("gone".to_string()),
            version: Some("1.0.0".to_string()),
            timestamp: Some("2023-01-01T00:00:00Z".to_string()),
            ..Default::default()
        };

        let result = RegistryExtensionLookup::validate_response(record);

        assert!(matches!(result, Err(LookupError::NotFound(_))));
    }

    #[test]
    fn validate_response_passes_record_through() {
        let record = ExtensionRecord {
            version: Some("0.9.1".to_string()),
            timestamp: Some("2023-01-01T00:00:00Z".to_string()),
            review_count: Some(3.0),
            average_rating: Some(4.0),
            ..Default::default()
        };

        let result = RegistryExtensionLookup::validate_response(record.clone()).unwrap();

        assert_eq!(result, record);
    }
}
