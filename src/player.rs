//! Serde model of the player configuration document
//! (`https://player.vimeo.com/video/{id}/config`).
//!
//! Only the parts the crate reads are modelled; everything else in the
//! document is ignored. Every section is optional because Vimeo omits
//! pieces depending on the video's privacy and delivery settings.

use serde::Deserialize;

/// Parsed player configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerConfig {
    #[serde(default)]
    pub video: Option<PlayerVideo>,
    #[serde(default)]
    pub request: Option<PlayerRequest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerVideo {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub duration: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerRequest {
    #[serde(default)]
    pub files: PlayerFiles,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerFiles {
    /// Single-file renditions, one per quality.
    #[serde(default)]
    pub progressive: Vec<ProgressiveFile>,
}

/// One entry of `request.files.progressive`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressiveFile {
    pub url: String,
    /// Quality label such as `"720p"`.
    pub quality: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fps: Option<f64>,
    pub mime: Option<String>,
}

impl PlayerConfig {
    /// Video title, if the document carries one.
    pub fn title(&self) -> Option<&str> {
        self.video.as_ref()?.title.as_deref()
    }

    /// Progressive renditions listed in the document (possibly none).
    pub fn progressive(&self) -> &[ProgressiveFile] {
        self.request
            .as_ref()
            .map(|r| r.files.progressive.as_slice())
            .unwrap_or_default()
    }
}
