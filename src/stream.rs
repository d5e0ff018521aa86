//! Progressive stream values and their download.

use std::cmp::Ordering;
use std::fmt;
use std::fs::{self, File};
use std::hash::{Hash, Hasher};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use reqwest::blocking::Response;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::http_client::{FetchRequest, HttpClient};

const GONE: u16 = 410;
const CHUNK_SIZE: usize = 64 * 1024;
const DEFAULT_EXTENSION: &str = ".mp4";

/// Snapshot of download progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadProgress {
    /// Bytes written so far.
    pub bytes_downloaded: u64,
    /// Content-Length of the response, when the server sent one.
    pub total_bytes: Option<u64>,
}

impl DownloadProgress {
    /// Completion in percent, if the total is known.
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self) -> Option<f64> {
        self.total_bytes
            .filter(|total| *total > 0)
            .map(|total| self.bytes_downloaded as f64 * 100.0 / total as f64)
    }
}

/// One downloadable rendition of a video.
///
/// Streams order by the numeric part of their quality label, so after
/// sorting the best one is last. Two streams are equal when they share
/// URL and quality.
#[derive(Debug, Clone)]
pub struct Stream {
    direct_url: String,
    quality: String,
    title: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    fps: Option<f64>,
    mime: Option<String>,
    client: HttpClient,
}

impl Stream {
    pub fn new(
        client: HttpClient,
        direct_url: impl Into<String>,
        quality: impl Into<String>,
        title: Option<String>,
    ) -> Self {
        Self {
            direct_url: direct_url.into(),
            quality: quality.into(),
            title,
            width: None,
            height: None,
            fps: None,
            mime: None,
            client,
        }
    }

    /// Attach the rendition's dimensions, frame rate and MIME type.
    #[must_use]
    pub fn with_format(
        mut self,
        width: Option<u32>,
        height: Option<u32>,
        fps: Option<f64>,
        mime: Option<String>,
    ) -> Self {
        self.width = width;
        self.height = height;
        self.fps = fps;
        self.mime = mime;
        self
    }

    /// Direct URL of the media file.
    pub fn direct_url(&self) -> &str {
        &self.direct_url
    }

    /// Quality label, e.g. `"720p"`.
    pub fn quality(&self) -> &str {
        &self.quality
    }

    /// Title of the parent video.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn width(&self) -> Option<u32> {
        self.width
    }

    pub fn height(&self) -> Option<u32> {
        self.height
    }

    pub fn fps(&self) -> Option<f64> {
        self.fps
    }

    pub fn mime(&self) -> Option<&str> {
        self.mime.as_deref()
    }

    /// Numeric part of the quality label (`"1080p"` → 1080, unknown → 0).
    pub fn resolution(&self) -> u32 {
        quality_value(&self.quality)
    }

    /// Size of the media file from its Content-Length header.
    ///
    /// Issues a GET whose body is never read.
    pub fn size_in_bytes(&self) -> Result<Option<u64>> {
        let response = self.open()?;
        Ok(response.content_length())
    }

    /// Size in megabytes (10^6 bytes).
    #[allow(clippy::cast_precision_loss)]
    pub fn size_in_megabytes(&self) -> Result<Option<f64>> {
        Ok(self.size_in_bytes()?.map(|bytes| bytes as f64 / 1_000_000.0))
    }

    /// Download into `directory` and return the written path.
    ///
    /// Unless `quiet`, progress is logged at `info` every 10%.
    pub fn download(
        &self,
        directory: impl AsRef<Path>,
        filename: Option<&str>,
        quiet: bool,
    ) -> Result<PathBuf> {
        let label = self.to_string();
        let mut next_report = 10.0;
        self.download_with_progress(directory, filename, |progress| {
            if quiet {
                return;
            }
            if let Some(percent) = progress.percent() {
                if percent >= next_report {
                    info!(stream = %label, "{percent:.0}% downloaded");
                    while next_report <= percent {
                        next_report += 10.0;
                    }
                }
            }
        })
    }

    /// Download into `directory`, calling `progress` after every chunk.
    pub fn download_with_progress<F>(
        &self,
        directory: impl AsRef<Path>,
        filename: Option<&str>,
        mut progress: F,
    ) -> Result<PathBuf>
    where
        F: FnMut(DownloadProgress),
    {
        let mut response = self.open()?;

        let directory = directory.as_ref();
        if !directory.as_os_str().is_empty() {
            fs::create_dir_all(directory)?;
        }
        let path = directory.join(self.file_name(filename));
        debug!(path = %path.display(), "Writing stream");

        let total_bytes = response.content_length();
        let bytes_downloaded = save_body(&mut response, &path, total_bytes, &mut progress)?;

        info!(path = %path.display(), bytes = bytes_downloaded, "Download complete");
        Ok(path)
    }

    /// File name used by [`Stream::download`].
    ///
    /// Explicit name, else the title, else the URL's `<digits>.mp4`/`.webm`
    /// segment, else `<quality>.mp4`.
    pub fn file_name(&self, explicit: Option<&str>) -> String {
        if let Some(name) = explicit.map(sanitize_file_name).filter(|n| !n.is_empty()) {
            return with_default_extension(name);
        }
        if let Some(name) = self.title().map(sanitize_file_name).filter(|n| !n.is_empty()) {
            return with_default_extension(name);
        }
        url_file_name(&self.direct_url)
            .unwrap_or_else(|| format!("{}{DEFAULT_EXTENSION}", self.quality))
    }

    fn open(&self) -> Result<Response> {
        let response = self.client.send(&FetchRequest::get(&self.direct_url))?;
        let status = response.status().as_u16();
        if status == GONE {
            return Err(Error::ExpiredLink {
                url: self.direct_url.clone(),
            });
        }
        if !response.status().is_success() {
            return Err(Error::status(status, "unable to fetch the video"));
        }
        Ok(response)
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stream({})", self.quality)
    }
}

impl PartialEq for Stream {
    fn eq(&self, other: &Self) -> bool {
        self.direct_url == other.direct_url && self.quality == other.quality
    }
}

impl Eq for Stream {}

impl Hash for Stream {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.direct_url.hash(state);
        self.quality.hash(state);
    }
}

impl Ord for Stream {
    fn cmp(&self, other: &Self) -> Ordering {
        self.resolution()
            .cmp(&other.resolution())
            .then_with(|| self.quality.cmp(&other.quality))
            .then_with(|| self.direct_url.cmp(&other.direct_url))
    }
}

impl PartialOrd for Stream {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Remove a partially written download.
fn discard_partial(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "Removed partial download"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove partial download"),
    }
}

/// Write `body` to `path`. On failure the partial file is removed.
fn save_body<R, F>(
    body: &mut R,
    path: &Path,
    total_bytes: Option<u64>,
    progress: &mut F,
) -> Result<u64>
where
    R: Read,
    F: FnMut(DownloadProgress),
{
    write_body(body, path, total_bytes, progress).inspect_err(|_| discard_partial(path))
}

/// Copy `body` into a new file at `path`, reporting progress per chunk.
fn write_body<R, F>(
    body: &mut R,
    path: &Path,
    total_bytes: Option<u64>,
    progress: &mut F,
) -> Result<u64>
where
    R: Read,
    F: FnMut(DownloadProgress),
{
    let mut writer = BufWriter::new(File::create(path)?);
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut bytes_downloaded = 0u64;

    loop {
        let n = body.read(&mut buf)?;
        if n == 0 {
            break;
        }
        writer.write_all(&buf[..n])?;
        bytes_downloaded += n as u64;
        progress(DownloadProgress {
            bytes_downloaded,
            total_bytes,
        });
    }
    writer.flush()?;
    Ok(bytes_downloaded)
}

/// Leading digits of a quality label.
pub fn quality_value(quality: &str) -> u32 {
    let digits: String = quality.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

fn with_default_extension(mut name: String) -> String {
    if !name.to_ascii_lowercase().ends_with(DEFAULT_EXTENSION) {
        name.push_str(DEFAULT_EXTENSION);
    }
    name
}

/// Replace characters that are not allowed in file names.
fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>()
        .trim()
        .trim_matches('.')
        .to_string()
}

fn url_file_name(direct_url: &str) -> Option<String> {
    let parsed = url::Url::parse(direct_url).ok()?;
    let last = parsed.path_segments()?.next_back()?;
    let (stem, ext) = last.rsplit_once('.')?;
    let media = matches!(ext, "mp4" | "webm");
    let numbered = !stem.is_empty() && stem.chars().all(|c| c.is_ascii_digit());
    (media && numbered).then(|| last.to_string())
}
