use anyhow::Result;

use super::{format_duration, Context};

pub fn cmd_info(ctx: &Context, url: Option<&str>, id: Option<&str>, json: bool) -> Result<()> {
    let settings = ctx.settings()?;
    let video = ctx.video(&settings, url, id)?;

    eprintln!("📡 Fetching metadata for {video}");
    let meta = video.metadata()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&meta.to_json())?);
        return Ok(());
    }

    println!("Title: {}", meta.title().unwrap_or("(untitled)"));
    if let Some(user) = meta.user_name() {
        println!("Uploader: {user}");
    }
    if let Some(date) = meta.upload_date() {
        println!("Uploaded: {date}");
    }
    if let Some(duration) = meta.duration() {
        println!("Duration: {}", format_duration(duration));
    }
    if let (Some(w), Some(h)) = (meta.width(), meta.height()) {
        println!("Size: {w}x{h}");
    }
    if let Some(views) = meta.views() {
        println!("Views: {views}");
    }
    if let Some(likes) = meta.likes() {
        println!("Likes: {likes}");
    }
    if let Some(comments) = meta.number_of_comments() {
        println!("Comments: {comments}");
    }
    if let Some(tags) = meta.tags().filter(|t| !t.is_empty()) {
        println!("Tags: {tags}");
    }
    if let Some(url) = meta.url() {
        println!("URL: {url}");
    }

    Ok(())
}
