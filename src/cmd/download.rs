use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context as _, Result};

use vimeo_dl::{DownloadProgress, Stream};

use super::Context;

pub fn cmd_download(
    ctx: &Context,
    url: Option<&str>,
    id: Option<&str>,
    quality: &str,
    output: Option<PathBuf>,
    filename: Option<&str>,
    quiet: bool,
) -> Result<()> {
    let settings = ctx.settings()?;
    let video = ctx.video(&settings, url, id)?;

    if !quiet {
        eprintln!("📡 Fetching streams for {video}");
    }
    let streams = video.streams()?;
    let stream = select_stream(streams, quality)?;

    let directory = output
        .or_else(|| settings.download_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    if !quiet {
        eprintln!("⬇️  Downloading {stream} to {}", directory.display());
    }

    let result = if quiet {
        stream.download(&directory, filename, true)
    } else {
        stream.download_with_progress(&directory, filename, render_progress)
    };
    let path = result.with_context(|| format!("failed to download {stream}"))?;

    if !quiet {
        eprintln!();
    }
    println!("{}", path.display());
    Ok(())
}

/// Pick a stream by label. `best` / `worst` take the ends of the sorted list;
/// a bare number like `720` matches `720p`.
fn select_stream(mut streams: Vec<Stream>, quality: &str) -> Result<Stream> {
    if streams.is_empty() {
        anyhow::bail!("no live progressive streams found");
    }

    let wanted = quality.to_lowercase();
    let picked = match wanted.as_str() {
        "best" => streams.pop(),
        "worst" => Some(streams.remove(0)),
        label => {
            let label = if label.chars().all(|c| c.is_ascii_digit()) {
                format!("{label}p")
            } else {
                label.to_string()
            };
            let position = streams.iter().position(|s| s.quality().eq_ignore_ascii_case(&label));
            position.map(|i| streams.swap_remove(i))
        }
    };

    picked.ok_or_else(|| {
        let available: Vec<&str> = streams.iter().map(Stream::quality).collect();
        anyhow::anyhow!(
            "quality {quality} not found (available: {})",
            available.join(", ")
        )
    })
}

fn render_progress(progress: DownloadProgress) {
    let mb = progress.bytes_downloaded / 1_000_000;
    match (progress.percent(), progress.total_bytes) {
        (Some(percent), Some(total)) => {
            eprint!("\r   {percent:5.1}%  {mb} / {} MB", total / 1_000_000);
        }
        _ => eprint!("\r   {mb} MB"),
    }
    let _ = std::io::stderr().flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use vimeo_dl::HttpClient;

    fn streams() -> Vec<Stream> {
        let client = HttpClient::new().unwrap();
        ["240p", "360p", "720p", "1080p"]
            .into_iter()
            .map(|q| Stream::new(client.clone(), format!("https://cdn/{q}.mp4"), q, None))
            .collect()
    }

    #[test]
    fn best_and_worst() {
        assert_eq!(select_stream(streams(), "best").unwrap().quality(), "1080p");
        assert_eq!(select_stream(streams(), "WORST").unwrap().quality(), "240p");
    }

    #[test]
    fn exact_and_bare_number() {
        assert_eq!(select_stream(streams(), "720p").unwrap().quality(), "720p");
        assert_eq!(select_stream(streams(), "360").unwrap().quality(), "360p");
    }

    #[test]
    fn missing_quality_lists_available() {
        let err = select_stream(streams(), "540p").unwrap_err();
        assert!(err.to_string().contains("240p, 360p, 720p, 1080p"));
    }

    #[test]
    fn empty_list_fails() {
        assert!(select_stream(Vec::new(), "best").is_err());
    }
}
