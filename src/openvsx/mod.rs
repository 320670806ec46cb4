//! Open VSX registry access layer
//!
//! This module fetches extension metadata from the Open VSX JSON API and
//! normalizes registry failures for badge rendering.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Lookup    │────▶│   Fetcher   │────▶│  Open VSX   │
//! │  (fetch)    │     │ (HTTP GET)  │     │    API      │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   Record    │
//! │ (schema +   │
//! │  not found) │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error type for lookups
//! - [`fetcher`]: JSON fetcher trait and the reqwest-based transport
//! - [`lookup`]: URL building, status mapping and response validation
//! - [`record`]: `ExtensionRecord` and its schema checks

pub mod error;
pub mod fetcher;
pub mod lookup;
pub mod record;

pub use error::LookupError;
pub use fetcher::{HttpResponse, JsonFetcher, ReqwestFetcher};
pub use lookup::{LookupRequest, RegistryExtensionLookup};
pub use record::ExtensionRecord;
