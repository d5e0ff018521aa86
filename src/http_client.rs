//! Blocking HTTP client for the Vimeo endpoints.
//!
//! Features:
//! - Fixed desktop User-Agent (Vimeo rejects obvious bots on the config API)
//! - Per-request Referer / Cookie / query parameters
//! - Brotli, Gzip, Deflate compression (auto-negotiated)
//! - Connection pooling with keep-alive
//! - Endpoint templates that can be redirected to a mirror or test server
//!
//! Everything here is synchronous: each call is one independent
//! request/response exchange and nothing is retried.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{COOKIE, REFERER};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::Result;

/// User-Agent sent with every request.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:84.0) Gecko/20100101 Firefox/84.0";

/// Per-video player configuration endpoint.
pub const CONFIG_ENDPOINT: &str = "https://player.vimeo.com/video/{id}/config";

/// Legacy v2 metadata endpoint.
pub const METADATA_ENDPOINT: &str = "http://vimeo.com/api/v2/video/{id}.json";

/// Upstream endpoint templates. `{id}` is replaced by the video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Player configuration document
    pub config: String,
    /// Metadata document
    pub metadata: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            config: CONFIG_ENDPOINT.to_string(),
            metadata: METADATA_ENDPOINT.to_string(),
        }
    }
}

impl Endpoints {
    /// Point both endpoints at `base` (e.g. a local test server), keeping
    /// the upstream path layout.
    #[must_use]
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            config: format!("{base}/video/{{id}}/config"),
            metadata: format!("{base}/api/v2/video/{{id}}.json"),
        }
    }

    /// Config endpoint URL for a video.
    pub fn config_url(&self, id: &str) -> String {
        self.config.replace("{id}", id)
    }

    /// Metadata endpoint URL for a video.
    pub fn metadata_url(&self, id: &str) -> String {
        self.metadata.replace("{id}", id)
    }
}

/// Settings used to build an [`HttpClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// User-Agent header value
    pub user_agent: String,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Whole-request timeout. `None` lets long downloads run to completion.
    pub timeout: Option<Duration>,
    /// Upstream endpoint templates
    pub endpoints: Endpoints,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout: Duration::from_secs(10),
            timeout: None,
            endpoints: Endpoints::default(),
        }
    }
}

/// A GET request with the optional per-video context attached.
#[derive(Debug, Clone, Copy)]
pub struct FetchRequest<'a> {
    pub url: &'a str,
    pub referer: Option<&'a str>,
    pub cookie: Option<&'a str>,
    pub params: &'a [(String, String)],
}

impl<'a> FetchRequest<'a> {
    /// Bare GET with no referer, cookie or parameters.
    pub fn get(url: &'a str) -> Self {
        Self {
            url,
            referer: None,
            cookie: None,
            params: &[],
        }
    }

    #[must_use]
    pub fn referer(mut self, referer: Option<&'a str>) -> Self {
        self.referer = referer;
        self
    }

    #[must_use]
    pub fn cookie(mut self, cookie: Option<&'a str>) -> Self {
        self.cookie = cookie;
        self
    }

    #[must_use]
    pub fn params(mut self, params: &'a [(String, String)]) -> Self {
        self.params = params;
        self
    }
}

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request/response seam the extractor runs against.
///
/// [`HttpClient`] is the real implementation. Tests script responses with
/// an in-memory one.
pub trait Transport {
    /// Perform a GET and read the whole body as text.
    fn get(&self, request: &FetchRequest<'_>) -> Result<FetchResponse>;

    /// Check that a URL is servable. Returns the status without reading
    /// the body.
    fn probe(&self, url: &str) -> Result<u16>;
}

/// Blocking HTTP client with the Vimeo defaults applied.
///
/// Cloning is cheap: the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    endpoints: Endpoints,
}

impl HttpClient {
    /// Create a client with [`ClientConfig::default`].
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client from explicit settings.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent)
            .use_rustls_tls()
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self {
            client,
            endpoints: config.endpoints,
        })
    }

    /// Endpoint templates this client was built with.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Send a GET and return the response with its body unread.
    #[instrument(skip(self, request), fields(url = %request.url))]
    pub fn send(&self, request: &FetchRequest<'_>) -> Result<Response> {
        let mut builder = self.client.get(request.url);
        if let Some(referer) = request.referer {
            builder = builder.header(REFERER, referer);
        }
        if let Some(cookie) = request.cookie {
            builder = builder.header(COOKIE, cookie);
        }
        if !request.params.is_empty() {
            builder = builder.query(request.params);
        }

        let response = builder.send()?;
        debug!(status = %response.status(), "Response received");
        Ok(response)
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

impl Transport for HttpClient {
    fn get(&self, request: &FetchRequest<'_>) -> Result<FetchResponse> {
        let response = self.send(request)?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(FetchResponse { status, body })
    }

    fn probe(&self, url: &str) -> Result<u16> {
        let response = self.send(&FetchRequest::get(url))?;
        Ok(response.status().as_u16())
    }
}
