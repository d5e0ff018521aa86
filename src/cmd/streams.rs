use anyhow::Result;

use super::Context;

pub fn cmd_streams(ctx: &Context, url: Option<&str>, id: Option<&str>) -> Result<()> {
    let settings = ctx.settings()?;
    let video = ctx.video(&settings, url, id)?;

    eprintln!("📡 Fetching streams for {video}");
    let streams = video.streams()?;

    if streams.is_empty() {
        eprintln!("⚠️  No live progressive streams found");
        return Ok(());
    }

    if let Some(title) = streams[0].title() {
        eprintln!("📺 {title}");
    }
    for stream in &streams {
        let size = match (stream.width(), stream.height()) {
            (Some(w), Some(h)) => format!("{w}x{h}"),
            _ => "-".to_string(),
        };
        println!("{:>6}  {:>9}  {}", stream.quality(), size, stream.direct_url());
    }
    eprintln!("({} streams)", streams.len());

    Ok(())
}
