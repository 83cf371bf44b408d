use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use dotenvy::dotenv;
use image_uploader::config::{UploaderConfig, WriteOrdering};
use image_uploader::create_widget;
use image_uploader::models::{SelectedFile, Selection};
use image_uploader::widget::TerminalRegion;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Preview an image as a data URI and upload it to the server
#[derive(Parser, Debug)]
#[command(name = "image-uploader", version)]
struct Cli {
    /// Server origin the upload endpoint is resolved against
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds (waits indefinitely when omitted)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Let every selection write its output in completion order
    #[arg(long)]
    unordered: bool,

    /// Selected files; only the first is previewed and uploaded
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "image_uploader=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = UploaderConfig::from_env();
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(secs) = cli.timeout_secs.filter(|s| *s > 0) {
        config.timeout = Some(std::time::Duration::from_secs(secs));
    }
    if cli.unordered {
        config.ordering = WriteOrdering::Unordered;
    }

    info!("📤 Upload endpoint: {}", config.endpoint_url()?);

    // Only the first file is ever read
    let selection = match cli.files.first() {
        Some(path) => Selection::from(SelectedFile::from_path(path).await?),
        None => Selection::empty(),
    };

    let widget = create_widget(
        &config,
        Arc::new(TerminalRegion::new("preview")),
        Arc::new(TerminalRegion::new("message")),
    )?;

    let Some(handle) = widget.handle_selection(selection) else {
        warn!("No file selected, nothing to do.");
        return Ok(());
    };

    let outcome = handle.join().await?;
    if !outcome.is_success() {
        anyhow::bail!("Upload did not succeed: {:?}", outcome);
    }

    Ok(())
}
