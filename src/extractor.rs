//! Player configuration retrieval with the embed-restriction fallback.
//!
//! Vimeo answers the config endpoint with 403 for embed-restricted videos
//! unless the Referer matches the embedding site. In that case the video
//! page itself usually still carries a signed config URL in its inline
//! script, so the fetch is modelled as a small state machine:
//!
//! ```text
//! PrimaryFetch ──2xx──────────────────────────────▶ Done
//!      │ 403
//!      ▼
//! HtmlFallback ──page 2xx, signed URL found, 2xx──▶ Done
//! ```
//!
//! Every other outcome is an error returned straight to the caller.

use regex::Regex;
use tracing::{debug, info, instrument};

use crate::error::{Error, Result, EMBED_ONLY_HINT};
use crate::http_client::{Endpoints, FetchRequest, Transport};
use crate::metadata::Metadata;
use crate::player::PlayerConfig;

const FORBIDDEN: u16 = 403;

/// Per-video request context shared by every fetch.
#[derive(Debug, Clone, Copy)]
pub struct FetchContext<'a> {
    /// Video identifier
    pub id: &'a str,
    /// Public video page, scanned when the config endpoint is forbidden.
    /// `None` for videos built from a bare id.
    pub page_url: Option<&'a str>,
    pub referer: Option<&'a str>,
    pub cookie: Option<&'a str>,
    /// Query parameters from the original URL
    pub params: &'a [(String, String)],
}

impl<'a> FetchContext<'a> {
    fn request<'r>(&self, url: &'r str) -> FetchRequest<'r>
    where
        'a: 'r,
    {
        FetchRequest::get(url)
            .referer(self.referer)
            .cookie(self.cookie)
            .params(self.params)
    }
}

/// States of the config retrieval.
#[derive(Debug)]
pub enum FetchState {
    PrimaryFetch,
    HtmlFallback,
    Done(PlayerConfig),
}

/// Drives [`FetchState`] transitions against a [`Transport`].
pub struct ConfigFetcher<'a, T: Transport + ?Sized> {
    transport: &'a T,
    config_url: String,
    ctx: FetchContext<'a>,
}

impl<'a, T: Transport + ?Sized> ConfigFetcher<'a, T> {
    pub fn new(transport: &'a T, endpoints: &Endpoints, ctx: FetchContext<'a>) -> Self {
        Self {
            transport,
            config_url: endpoints.config_url(ctx.id),
            ctx,
        }
    }

    /// Run the state machine until it reaches [`FetchState::Done`].
    #[instrument(skip(self), fields(id = %self.ctx.id))]
    pub fn run(&self) -> Result<PlayerConfig> {
        let mut state = FetchState::PrimaryFetch;
        loop {
            state = match state {
                FetchState::Done(config) => return Ok(config),
                other => self.step(other)?,
            };
        }
    }

    /// Perform a single transition.
    pub fn step(&self, state: FetchState) -> Result<FetchState> {
        match state {
            FetchState::PrimaryFetch => self.primary_fetch(),
            FetchState::HtmlFallback => self.html_fallback(),
            done @ FetchState::Done(_) => Ok(done),
        }
    }

    fn primary_fetch(&self) -> Result<FetchState> {
        debug!(url = %self.config_url, "Fetching player config");
        let response = self.transport.get(&self.ctx.request(&self.config_url))?;

        if response.is_success() {
            let config = serde_json::from_str(&response.body)
                .map_err(|e| Error::caused_by("couldn't retrieve download links", e))?;
            return Ok(FetchState::Done(config));
        }

        if response.status == FORBIDDEN {
            info!("Config endpoint forbidden, falling back to the video page");
            return Ok(FetchState::HtmlFallback);
        }

        Err(Error::status(
            response.status,
            "unable to retrieve download links",
        ))
    }

    fn html_fallback(&self) -> Result<FetchState> {
        let Some(page_url) = self.ctx.page_url else {
            return Err(Error::status(FORBIDDEN, EMBED_ONLY_HINT));
        };

        debug!(url = %page_url, "Fetching video page");
        let page = self.transport.get(&self.ctx.request(page_url))?;

        if !page.is_success() {
            if page.status == FORBIDDEN {
                return Err(Error::status(FORBIDDEN, EMBED_ONLY_HINT));
            }
            return Err(Error::status(page.status, "unable to retrieve download links"));
        }

        let signed_url = find_config_url(&page.body, &self.config_url).ok_or_else(|| {
            Error::HtmlParseFailed {
                url: page_url.to_string(),
            }
        })?;

        debug!(url = %signed_url, "Found signed config URL in page");
        let request = FetchRequest::get(&signed_url).referer(self.ctx.referer);
        let response = self.transport.get(&request)?;
        if !response.is_success() {
            return Err(Error::status(
                response.status,
                "unable to retrieve download links",
            ));
        }

        let config = serde_json::from_str(&response.body)?;
        Ok(FetchState::Done(config))
    }
}

/// Fetch and parse the player configuration document for a video.
pub fn fetch_config<T: Transport + ?Sized>(
    transport: &T,
    endpoints: &Endpoints,
    ctx: FetchContext<'_>,
) -> Result<PlayerConfig> {
    ConfigFetcher::new(transport, endpoints, ctx).run()
}

/// Fetch the metadata document and adapt its first record.
#[instrument(skip(transport, endpoints, ctx), fields(id = %ctx.id))]
pub fn fetch_metadata<T: Transport + ?Sized>(
    transport: &T,
    endpoints: &Endpoints,
    ctx: FetchContext<'_>,
) -> Result<Metadata> {
    let url = endpoints.metadata_url(ctx.id);
    debug!(url = %url, "Fetching metadata");
    let response = transport.get(&ctx.request(&url))?;

    if !response.is_success() {
        return Err(Error::status(response.status, "unable to retrieve meta data"));
    }

    let document: serde_json::Value = serde_json::from_str(&response.body)
        .map_err(|e| Error::caused_by("couldn't retrieve meta data", e))?;
    Metadata::from_document(document)
}

/// Locate the slash-escaped config URL inside inline script content and
/// return it un-escaped.
///
/// Pages embed it as `"https:\/\/player.vimeo.com\/video\/123\/config?..."`.
pub fn find_config_url(html: &str, config_url: &str) -> Option<String> {
    let escaped = config_url.replace('/', r"\/");
    let pattern = format!(r#""({}[^"]*)""#, regex::escape(&escaped));
    let re = Regex::new(&pattern).ok()?;

    let found = re.captures(html)?.get(1)?.as_str();
    Some(found.replace(r"\/", "/").replace(r"\u0026", "&"))
}
