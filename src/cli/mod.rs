use crate::config::Config;
use crate::core::{FetchOutcome, TranscriptFetcher, TranscriptSource, ERROR_PREFIX};
use crate::extractors::YouTubeTranscriptSource;
use crate::utils::truncate_words;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

pub const NO_VIDEO_ID_MESSAGE: &str = "ERROR: No video ID provided.";

#[derive(Parser, Debug)]
#[command(name = "yt-transcript")]
#[command(about = "Print the transcript of a YouTube video (French, else English)")]
#[command(version)]
pub struct Cli {
    /// Video id, e.g. dQw4w9WgXcQ. Options must come before it
    #[arg(value_name = "VIDEO_ID", allow_hyphen_values = true)]
    pub video_id: Option<String>,

    /// Anything after the video id is ignored
    #[arg(
        value_name = "IGNORED",
        hide = true,
        num_args = 0..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub ignored: Vec<String>,

    /// TOML config file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Keep only the first N words of the transcript
    #[arg(long, value_name = "N")]
    pub max_words: Option<usize>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub async fn run(&self) -> Result<()> {
        println!("{}", self.output().await);
        Ok(())
    }

    /// Everything `run` prints, using the real YouTube source.
    pub async fn output(&self) -> String {
        if self.video_id.is_none() {
            return NO_VIDEO_ID_MESSAGE.to_string();
        }

        let source = Config::load(self.config.as_deref())
            .and_then(|config| YouTubeTranscriptSource::new(&config));
        match source {
            Ok(source) => self.output_with(&TranscriptFetcher::new(source)).await,
            Err(e) => format!("{}{:#}", ERROR_PREFIX, e),
        }
    }

    pub async fn output_with<S: TranscriptSource>(&self, fetcher: &TranscriptFetcher<S>) -> String {
        let Some(video_id) = self.video_id.as_deref() else {
            return NO_VIDEO_ID_MESSAGE.to_string();
        };

        if !self.ignored.is_empty() {
            tracing::debug!("Ignoring extra arguments: {:?}", self.ignored);
        }

        match fetcher.fetch(video_id).await {
            FetchOutcome::Text(text) => match self.max_words {
                Some(max) => truncate_words(&text, max),
                None => text,
            },
            failure => failure.to_string(),
        }
    }
}
