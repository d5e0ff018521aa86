//! Vimeo URL recognition.
//!
//! Input URLs are normalized by dropping the query string, then matched
//! against a fixed, ordered table of accepted shapes. The first shape that
//! matches wins and its captured digits become the video identifier.
//!
//! # Example
//!
//! ```rust
//! use vimeo_dl::resolver::{resolve, UrlShape};
//!
//! let resolved = resolve("https://vimeo.com/channels/staffpicks/143603739").unwrap();
//! assert_eq!(resolved.id, "143603739");
//! assert_eq!(resolved.shape, UrlShape::StaffPicks);
//! ```

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use url::form_urlencoded;

use crate::error::{Error, Result};

/// Which accepted URL shape a link matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlShape {
    /// `https://player.vimeo.com/video/<id>`
    Embed,
    /// `https://vimeo.com/<id>`
    Bare,
    /// `https://vimeo.com/groups/<group>/videos/<id>`
    Group,
    /// `https://vimeo.com/manage/videos/<id>`
    Manage,
    /// `https://vimeo.com/<id>/<hash>`
    Unlisted,
    /// `https://vimeo.com/channels/staffpicks/<id>`
    StaffPicks,
}

impl UrlShape {
    /// Short lowercase name (e.g. `"embed"`, `"unlisted"`).
    pub fn name(self) -> &'static str {
        match self {
            Self::Embed => "embed",
            Self::Bare => "bare",
            Self::Group => "group",
            Self::Manage => "manage",
            Self::Unlisted => "unlisted",
            Self::StaffPicks => "staffpicks",
        }
    }
}

impl fmt::Display for UrlShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Order matters: first match wins.
static ACCEPTED_PATTERNS: LazyLock<Vec<(UrlShape, Regex)>> = LazyLock::new(|| {
    [
        (UrlShape::Embed, r"^https://player\.vimeo\.com/video/(\d+)$"),
        (UrlShape::Bare, r"^https://vimeo\.com/(\d+)$"),
        (UrlShape::Group, r"^https://vimeo\.com/groups/.+?/videos/(\d+)$"),
        (UrlShape::Manage, r"^https://vimeo\.com/manage/videos/(\d+)$"),
        (UrlShape::Unlisted, r"^https://vimeo\.com/(\d+)/([a-zA-Z0-9]+)$"),
        (UrlShape::StaffPicks, r"^https://vimeo\.com/channels/staffpicks/(\d+)$"),
    ]
    .into_iter()
    .map(|(shape, pattern)| {
        (
            shape,
            Regex::new(pattern).expect("accepted URL patterns are valid regexes"),
        )
    })
    .collect()
});

/// A URL that matched one of the accepted shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUrl {
    /// Numeric video identifier.
    pub id: String,
    /// Which shape matched.
    pub shape: UrlShape,
    /// The input URL without query string or fragment.
    pub normalized: String,
    /// Query parameters from the input URL, in their original order.
    pub query: Vec<(String, String)>,
    /// Privacy hash of an unlisted link (`https://vimeo.com/<id>/<hash>`).
    pub unlisted_hash: Option<String>,
}

/// Resolve a Vimeo URL to its video identifier.
///
/// The query string is removed before matching but kept in
/// [`ResolvedUrl::query`] so it can be forwarded on later requests.
pub fn resolve(url: &str) -> Result<ResolvedUrl> {
    let (normalized, query) = normalize(url);

    for (shape, pattern) in ACCEPTED_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(&normalized) {
            let id = caps[1].to_string();
            let unlisted_hash = match shape {
                UrlShape::Unlisted => caps.get(2).map(|m| m.as_str().to_string()),
                _ => None,
            };
            tracing::debug!(%id, shape = %shape, "resolved Vimeo URL");
            return Ok(ResolvedUrl {
                id,
                shape: *shape,
                normalized,
                query,
                unlisted_hash,
            });
        }
    }

    Err(Error::UnsupportedUrl { url: normalized })
}

/// Returns `true` if the URL matches any accepted shape.
pub fn is_supported(url: &str) -> bool {
    resolve(url).is_ok()
}

/// Split a URL into its query-less form and its query pairs.
///
/// Only the query string and fragment are cut off; the rest of the input is
/// matched exactly as given.
fn normalize(raw: &str) -> (String, Vec<(String, String)>) {
    let raw = raw.trim();
    let (base, rest) = match raw.find(['?', '#']) {
        Some(end) => (&raw[..end], &raw[end..]),
        None => (raw, ""),
    };

    let query = rest
        .strip_prefix('?')
        .map(|q| q.split('#').next().unwrap_or_default())
        .unwrap_or_default();
    let pairs = form_urlencoded::parse(query.as_bytes())
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    (base.to_string(), pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id_of(url: &str) -> String {
        resolve(url).unwrap().id
    }

    #[test]
    fn resolves_all_accepted_shapes() {
        let cases = [
            ("https://player.vimeo.com/video/498617513", "498617513", UrlShape::Embed),
            ("https://vimeo.com/503166067", "503166067", UrlShape::Bare),
            (
                "https://vimeo.com/groups/animation/videos/12345",
                "12345",
                UrlShape::Group,
            ),
            ("https://vimeo.com/manage/videos/777", "777", UrlShape::Manage),
            ("https://vimeo.com/392479337/a52724358e", "392479337", UrlShape::Unlisted),
            (
                "https://vimeo.com/channels/staffpicks/143603739",
                "143603739",
                UrlShape::StaffPicks,
            ),
        ];

        for (url, id, shape) in cases {
            let resolved = resolve(url).unwrap();
            assert_eq!(resolved.id, id, "{url}");
            assert_eq!(resolved.shape, shape, "{url}");
            assert_eq!(resolved.normalized, url);
        }
    }

    #[test]
    fn unlisted_hash_is_exposed() {
        let resolved = resolve("https://vimeo.com/160743502/abd0e13fb4").unwrap();
        assert_eq!(resolved.unlisted_hash.as_deref(), Some("abd0e13fb4"));

        let bare = resolve("https://vimeo.com/160743502").unwrap();
        assert_eq!(bare.unlisted_hash, None);
    }

    #[test]
    fn query_is_stripped_but_preserved() {
        let resolved =
            resolve("https://player.vimeo.com/video/98044508?some_random_p=parameter&h=abc").unwrap();
        assert_eq!(resolved.id, "98044508");
        assert_eq!(resolved.normalized, "https://player.vimeo.com/video/98044508");
        assert_eq!(
            resolved.query,
            vec![
                ("some_random_p".to_string(), "parameter".to_string()),
                ("h".to_string(), "abc".to_string()),
            ]
        );
    }

    #[test]
    fn fragment_is_dropped() {
        assert_eq!(id_of("https://vimeo.com/503166067#t=30s"), "503166067");
    }

    #[test]
    fn group_name_may_contain_anything() {
        assert_eq!(
            id_of("https://vimeo.com/groups/motion-graphics_2024/videos/42"),
            "42"
        );
    }

    #[test]
    fn rejects_unsupported_urls() {
        let rejected = [
            "https://vimeo.com/",
            "https://vimeo.com/channels/other/143603739",
            "https://vimeo.com/user/123",
            "http://vimeo.com/503166067",
            "https://player.vimeo.com/video/abc",
            "https://youtube.com/watch?v=dQw4w9WgXcQ",
            "https://vimeo.com/123/abc/def",
            "not a url",
            "",
            "https://VIMEO.COM/123",
            "https://vimeo.com:443/123",
            "https://vimeo.com/./123",
            "https://vimeo.com\\123",
            "HTTPS://vimeo.com/123",
        ];

        for url in rejected {
            match resolve(url) {
                Err(Error::UnsupportedUrl { .. }) => {}
                other => panic!("{url:?} should be unsupported, got {other:?}"),
            }
        }
    }

    #[test]
    fn unsupported_error_carries_normalized_url() {
        let err = resolve("https://example.com/video/1?x=y").unwrap_err();
        match err {
            Error::UnsupportedUrl { url } => assert_eq!(url, "https://example.com/video/1"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn lookalike_domains_are_rejected() {
        assert!(!is_supported("https://playerXvimeo.com/video/1"));
        assert!(!is_supported("https://vimeoXcom/1"));
        assert!(!is_supported("https://notvimeo.com/1"));
    }

    #[test]
    fn input_is_matched_verbatim() {
        let err = resolve("https://vimeo.com:443/123?x=1").unwrap_err();
        match err {
            Error::UnsupportedUrl { url } => assert_eq!(url, "https://vimeo.com:443/123"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn encoded_query_values_are_decoded() {
        let resolved = resolve("https://vimeo.com/503166067?title=a%20b&empty=&x=1#frag").unwrap();
        assert_eq!(
            resolved.query,
            vec![
                ("title".to_string(), "a b".to_string()),
                ("x".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(id_of("  https://vimeo.com/503166067\n"), "503166067");
    }
}
