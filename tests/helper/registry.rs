//! Registry test utilities

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use mockito::ServerGuard;

use ovsx_badge::openvsx::{
    HttpResponse, JsonFetcher, LookupError, RegistryExtensionLookup, ReqwestFetcher,
};

/// Fetcher serving canned responses keyed by URL
pub struct StaticFetcher {
    responses: HashMap<String, HttpResponse>,
    requested: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(mut self, url: &str, status: u16, body: &str) -> Self {
        self.responses
            .insert(url.to_string(), HttpResponse::new(status, body));
        self
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl JsonFetcher for StaticFetcher {
    async fn get(&self, url: &str) -> Result<HttpResponse, LookupError> {
        self.requested.lock().unwrap().push(url.to_string());
        Ok(self
            .responses
            .get(url)
            .cloned()
            .unwrap_or_else(|| HttpResponse::new(404, "")))
    }
}

/// Lookup wired to a mockito server through the real reqwest transport
pub fn create_http_lookup(server: &ServerGuard) -> RegistryExtensionLookup {
    let fetcher = ReqwestFetcher::new("ovsx-badge-test", Duration::from_secs(5)).unwrap();
    RegistryExtensionLookup::new(Arc::new(fetcher), &format!("{}/api", server.url()))
}
