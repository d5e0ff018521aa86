//! The per-video facade tying resolution, retrieval and adaptation together.
//!
//! # Example
//!
//! ```rust,no_run
//! use vimeo_dl::Video;
//!
//! # fn example() -> vimeo_dl::Result<()> {
//! let video = Video::new("https://player.vimeo.com/video/498617513")?
//!     .with_referer("https://atpstar.com/plans-162.html");
//!
//! if let Some(best) = video.best_stream()? {
//!     let path = best.download("video", Some("test_stream"), false)?;
//!     println!("saved {}", path.display());
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;

use crate::adapter::streams_from_config;
use crate::error::{Error, Result};
use crate::extractor::{fetch_config, fetch_metadata, FetchContext};
use crate::http_client::HttpClient;
use crate::metadata::Metadata;
use crate::player::PlayerConfig;
use crate::resolver::{resolve, UrlShape};
use crate::stream::Stream;

/// A reference to one Vimeo video plus the context needed to fetch it.
///
/// Nothing is cached: every call to [`Video::streams`] or
/// [`Video::metadata`] goes back to Vimeo.
#[derive(Debug, Clone)]
pub struct Video {
    id: String,
    url: Option<String>,
    normalized_url: Option<String>,
    shape: Option<UrlShape>,
    referer: Option<String>,
    cookie: Option<String>,
    params: Vec<(String, String)>,
    client: HttpClient,
}

impl Video {
    /// Resolve a Vimeo URL using a default [`HttpClient`].
    pub fn new(url: &str) -> Result<Self> {
        Self::with_client(url, HttpClient::new()?)
    }

    /// Resolve a Vimeo URL, sharing an existing client.
    pub fn with_client(url: &str, client: HttpClient) -> Result<Self> {
        let resolved = resolve(url)?;
        Ok(Self {
            id: resolved.id,
            url: Some(url.trim().to_string()),
            normalized_url: Some(resolved.normalized),
            shape: Some(resolved.shape),
            referer: None,
            cookie: None,
            params: resolved.query,
            client,
        })
    }

    /// Refer to a video by identifier, skipping URL validation.
    pub fn from_id(id: &str) -> Result<Self> {
        Self::from_id_with_client(id, HttpClient::new()?)
    }

    /// Refer to a video by identifier, sharing an existing client.
    pub fn from_id_with_client(id: &str, client: HttpClient) -> Result<Self> {
        let id = id.trim();
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::InvalidVideoId { id: id.to_string() });
        }
        Ok(Self {
            id: id.to_string(),
            url: None,
            normalized_url: None,
            shape: None,
            referer: None,
            cookie: None,
            params: Vec::new(),
            client,
        })
    }

    /// Page the video is embedded on. Needed for embed-restricted videos.
    #[must_use]
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    /// Raw `Cookie` header value sent with config and metadata requests.
    #[must_use]
    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The URL as given, when built from a URL.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// The URL without its query string, when built from a URL.
    pub fn normalized_url(&self) -> Option<&str> {
        self.normalized_url.as_deref()
    }

    /// Which accepted shape the URL matched, when built from a URL.
    pub fn shape(&self) -> Option<UrlShape> {
        self.shape
    }

    pub fn referer(&self) -> Option<&str> {
        self.referer.as_deref()
    }

    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// Query parameters forwarded on every request.
    pub fn query(&self) -> &[(String, String)] {
        &self.params
    }

    fn context(&self) -> FetchContext<'_> {
        FetchContext {
            id: &self.id,
            page_url: self.normalized_url.as_deref(),
            referer: self.referer.as_deref(),
            cookie: self.cookie.as_deref(),
            params: &self.params,
        }
    }

    /// Fetch the player configuration document.
    pub fn config(&self) -> Result<PlayerConfig> {
        fetch_config(&self.client, self.client.endpoints(), self.context())
    }

    /// All live progressive streams, ascending by quality.
    pub fn streams(&self) -> Result<Vec<Stream>> {
        let config = self.config()?;
        Ok(streams_from_config(&config, &self.client, &self.client))
    }

    /// The highest-quality live stream, if any.
    pub fn best_stream(&self) -> Result<Option<Stream>> {
        Ok(self.streams()?.pop())
    }

    /// Fetch the video's metadata.
    pub fn metadata(&self) -> Result<Metadata> {
        fetch_metadata(&self.client, self.client.endpoints(), self.context())
    }
}

impl fmt::Display for Video {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.normalized_url {
            Some(url) => write!(f, "Vimeo<{url}>"),
            None => write!(f, "Vimeo<{}>", self.id),
        }
    }
}
