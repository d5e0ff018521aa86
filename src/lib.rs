//! `vimeo-dl` - resolve Vimeo links into downloadable streams
//!
//! # Features
//!
//! - **URL resolution**: embed, bare, group, manage, unlisted and staff-picks links
//! - **Embed-restricted videos**: Referer support plus a fallback that recovers
//!   the signed config URL from the video page
//! - **Streams**: live-checked progressive renditions, sorted by quality
//! - **Metadata**: title, uploader, duration, likes/views/comments
//!
//! # Example
//!
//! ```rust,no_run
//! use vimeo_dl::Video;
//!
//! fn main() -> vimeo_dl::Result<()> {
//!     let video = Video::new("https://vimeo.com/503166067")?;
//!     let meta = video.metadata()?;
//!     println!("{:?} ({:?} views)", meta.title(), meta.views());
//!
//!     let streams = video.streams()?;
//!     for stream in &streams {
//!         println!("{stream} {}", stream.direct_url());
//!     }
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod error;
pub mod extractor;
pub mod http_client;
pub mod metadata;
pub mod player;
pub mod resolver;
pub mod settings;
pub mod stream;
pub mod video;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use error::{Error, Result};
pub use extractor::{fetch_config, fetch_metadata, ConfigFetcher, FetchContext, FetchState};
pub use http_client::{ClientConfig, Endpoints, HttpClient, Transport};
pub use metadata::{Metadata, StandardMetadata};
pub use player::PlayerConfig;
pub use resolver::{resolve, ResolvedUrl, UrlShape};
pub use settings::Settings;
pub use stream::{DownloadProgress, Stream};
pub use video::Video;

/// Version of vimeo-dl
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
