use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use yt_transcript::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries the transcript, logs go to stderr
    let default_level = if cli.verbose { "yt_transcript=debug" } else { "yt_transcript=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting yt-transcript v{}", env!("CARGO_PKG_VERSION"));

    cli.run().await?;

    Ok(())
}
