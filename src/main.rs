//! `vimeo-dl` CLI - inspect and download Vimeo videos

mod cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "vimeo-dl")]
#[command(about = "Resolve Vimeo links into downloadable streams")]
#[command(version)]
struct Cli {
    /// URL of the page the video is embedded on (for embed-only videos)
    #[arg(long, global = true)]
    referer: Option<String>,

    /// Raw Cookie header value to send with API requests
    #[arg(long, global = true)]
    cookie: Option<String>,

    /// Config file (default: ~/.config/vimeo-dl/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Which video to operate on.
#[derive(Args, Debug)]
struct Target {
    /// Vimeo video URL
    #[arg(required_unless_present = "id", conflicts_with = "id")]
    url: Option<String>,

    /// Numeric video id (skips URL validation)
    #[arg(long)]
    id: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the video id a URL resolves to (no network access)
    Resolve {
        /// Vimeo video URL
        url: String,
    },

    /// Show video metadata
    Info {
        #[command(flatten)]
        target: Target,

        /// Print the raw metadata record as JSON
        #[arg(long)]
        json: bool,
    },

    /// List available streams, lowest quality first
    Streams {
        #[command(flatten)]
        target: Target,
    },

    /// Download a stream
    Download {
        #[command(flatten)]
        target: Target,

        /// Quality label (e.g. 720p), "best" or "worst"
        #[arg(short, long, default_value = "best")]
        quality: String,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file name (".mp4" is appended if missing)
        #[arg(short, long)]
        filename: Option<String>,

        /// Don't show progress
        #[arg(long)]
        quiet: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = cmd::Context {
        referer: cli.referer,
        cookie: cli.cookie,
        config: cli.config,
    };

    match cli.command {
        Commands::Resolve { url } => cmd::resolve::cmd_resolve(&url)?,
        Commands::Info { target, json } => {
            cmd::info::cmd_info(&ctx, target.url.as_deref(), target.id.as_deref(), json)?;
        }
        Commands::Streams { target } => {
            cmd::streams::cmd_streams(&ctx, target.url.as_deref(), target.id.as_deref())?;
        }
        Commands::Download {
            target,
            quality,
            output,
            filename,
            quiet,
        } => {
            cmd::download::cmd_download(
                &ctx,
                target.url.as_deref(),
                target.id.as_deref(),
                &quality,
                output,
                filename.as_deref(),
                quiet,
            )?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
