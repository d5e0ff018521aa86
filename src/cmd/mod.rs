pub mod download;
pub mod info;
pub mod resolve;
pub mod streams;

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use vimeo_dl::{HttpClient, Settings, Video};

/// Options shared by every network command.
pub struct Context {
    pub referer: Option<String>,
    pub cookie: Option<String>,
    pub config: Option<PathBuf>,
}

impl Context {
    pub fn settings(&self) -> Result<Settings> {
        Settings::load(self.config.as_deref())
    }

    /// Build the video reference from either a URL or a bare id.
    pub fn video(&self, settings: &Settings, url: Option<&str>, id: Option<&str>) -> Result<Video> {
        let client = HttpClient::with_config(settings.client_config())
            .context("failed to build HTTP client")?;

        let mut video = match (url, id) {
            (_, Some(id)) => Video::from_id_with_client(id, client)?,
            (Some(url), None) => Video::with_client(url, client)?,
            (None, None) => anyhow::bail!("either a URL or --id is required"),
        };

        if let Some(ref referer) = self.referer {
            video = video.with_referer(referer.clone());
        }
        if let Some(ref cookie) = self.cookie {
            video = video.with_cookie(cookie.clone());
        }
        Ok(video)
    }
}

/// Format seconds as `m:ss` (or `h:mm:ss`).
pub fn format_duration(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(212), "3:32");
        assert_eq!(format_duration(3725), "1:02:05");
    }
}
