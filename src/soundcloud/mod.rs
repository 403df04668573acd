//! # SoundCloud Integration Module
//!
//! This module talks to SoundCloud's undocumented `api-v2` and its CDNs. It is
//! the only place that knows about URLs, query parameters and payload shapes;
//! the [`crate::downloader`] layer above it only sees typed entities and bytes.
//!
//! ## Architecture
//!
//! ```text
//! Downloader (playlist / user / track flows)
//!          ↓
//! SoundCloud client
//!     ├── credential  (client id scraped from the web app's scripts)
//!     ├── resolve     (link path → User / Track / Playlist)
//!     ├── pagination  (cursor walk over listings)
//!     ├── tracks      (batch lookup by id)
//!     ├── stream      (rendition choice + manifest URL exchange)
//!     ├── hls         (manifest → concatenated segments)
//!     └── artwork     (cover images)
//!          ↓
//! http (retrying executor over three connection pools)
//! ```
//!
//! ## Credentials
//!
//! The web app embeds a `client_id` in one of its script bundles. It is
//! scraped once by [`credential::acquire`] before any other call and handed to
//! [`SoundCloud::new`]; there is no refresh. If it expires mid-run, later
//! calls fail like any other non-200 answer.
//!
//! ## Error Handling
//!
//! Transport errors that look transient are retried inside [`http::fetch`]
//! without delay. Status codes are never retried there; every call site turns
//! a non-200 into [`crate::error::Error::Status`].

pub mod artwork;
pub mod credential;
pub mod hls;
pub mod http;
pub mod pagination;
pub mod resolve;
pub mod stream;
pub mod tracks;

use reqwest::Url;

use crate::{config::Settings, error::Result};

use http::Pools;

/// The API key scraped from the web app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientId(String);

impl ClientId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Client for the SoundCloud API and CDNs, bound to one client id.
#[derive(Debug, Clone)]
pub struct SoundCloud {
    settings: Settings,
    client_id: ClientId,
    pools: Pools,
}

impl SoundCloud {
    pub fn new(settings: Settings, client_id: ClientId) -> Result<Self> {
        let pools = Pools::new(&settings)?;
        Ok(Self {
            settings,
            client_id,
            pools,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Builds `<api>/<path>?<params>&client_id=<id>`.
    fn api_endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.settings.api_url, path))?;
        url.query_pairs_mut()
            .extend_pairs(params)
            .append_pair("client_id", self.client_id.as_str());
        Ok(url)
    }

    /// Appends the client id to a URL handed out by the API itself.
    fn authorize(&self, url: &str) -> Result<Url> {
        let mut url = Url::parse(url)?;
        url.query_pairs_mut()
            .append_pair("client_id", self.client_id.as_str());
        Ok(url)
    }
}
