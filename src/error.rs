//! Error types for vimeo-dl
//!
//! Every failure is returned to the caller as soon as it happens. Nothing is
//! retried internally, so each variant carries enough context (status code,
//! offending URL) for the caller to decide whether to retry, supply a
//! referer, or give up.

use thiserror::Error;

/// Result type alias for vimeo-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Advice attached to 403 responses on embed-restricted videos.
pub(crate) const EMBED_ONLY_HINT: &str = "if the video is embed only, also provide the URL \
     of the page it is embedded on as the referer";

/// Main error type for vimeo-dl
#[derive(Debug, Error)]
pub enum Error {
    /// The URL matches none of the accepted Vimeo URL shapes
    #[error("{url} is not a supported Vimeo URL")]
    UnsupportedUrl {
        /// The normalized (query-stripped) URL that was rejected
        url: String,
    },

    /// A directly supplied video identifier is empty or not numeric
    #[error("invalid video id: {id:?}")]
    InvalidVideoId {
        /// The rejected identifier
        id: String,
    },

    /// Upstream answered with an unexpected status, or with a body that
    /// could not be understood
    #[error("{}", format_request_failed(.status, .message))]
    RequestFailed {
        /// HTTP status code, when the failure came from a response status
        status: Option<u16>,
        /// Human-readable description
        message: String,
        /// Underlying cause, e.g. the JSON error for a malformed body
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The stream URL is no longer valid (HTTP 410)
    #[error("the download URL has expired: {url}")]
    ExpiredLink {
        /// The expired stream URL
        url: String,
    },

    /// The fallback video page was fetched but holds no config URL
    #[error("couldn't find the config URL in {url}")]
    HtmlParseFailed {
        /// The page that was scanned
        url: String,
    },

    /// Network / transport error
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error on a config document fetched from a scraped URL
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while writing a download
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[allow(clippy::ref_option)]
fn format_request_failed(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("{code}: {message}"),
        None => message.to_string(),
    }
}

impl Error {
    /// Build a [`Error::RequestFailed`] for a response status.
    pub(crate) fn status(status: u16, message: impl Into<String>) -> Self {
        Self::RequestFailed {
            status: Some(status),
            message: message.into(),
            source: None,
        }
    }

    /// Build a [`Error::RequestFailed`] that has no status code.
    pub(crate) fn request(message: impl Into<String>) -> Self {
        Self::RequestFailed {
            status: None,
            message: message.into(),
            source: None,
        }
    }

    /// Build a [`Error::RequestFailed`] wrapping the error that caused it.
    pub(crate) fn caused_by(
        message: impl Into<String>,
        cause: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::RequestFailed {
            status: None,
            message: message.into(),
            source: Some(cause.into()),
        }
    }

    /// HTTP status code associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => *status,
            Self::ExpiredLink { .. } => Some(410),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` when the failure suggests supplying a referer may help.
    pub fn is_embed_restricted(&self) -> bool {
        matches!(self, Self::RequestFailed { status: Some(403), .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_failed_display_includes_status() {
        let err = Error::status(404, "unable to retrieve download links");
        assert_eq!(err.to_string(), "404: unable to retrieve download links");
        assert_eq!(err.status_code(), Some(404));
    }

    #[test]
    fn request_failed_without_status() {
        let err = Error::request("couldn't retrieve meta data");
        assert_eq!(err.to_string(), "couldn't retrieve meta data");
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn request_failed_keeps_its_cause() {
        use std::error::Error as _;

        let cause = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::caused_by("couldn't retrieve download links", cause);
        assert_eq!(err.to_string(), "couldn't retrieve download links");
        assert!(err.source().is_some_and(|s| s.is::<serde_json::Error>()));

        assert!(Error::request("plain").source().is_none());
    }

    #[test]
    fn forbidden_is_embed_restricted() {
        assert!(Error::status(403, EMBED_ONLY_HINT).is_embed_restricted());
        assert!(!Error::status(500, "boom").is_embed_restricted());
        assert!(!Error::ExpiredLink { url: "x".into() }.is_embed_restricted());
    }

    #[test]
    fn expired_link_reports_gone() {
        let err = Error::ExpiredLink {
            url: "https://cdn.example/1.mp4".into(),
        };
        assert_eq!(err.status_code(), Some(410));
        assert!(err.to_string().contains("expired"));
    }
}
