use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use yt_transcript::cli::{Cli, NO_VIDEO_ID_MESSAGE};
use yt_transcript::core::{CaptionEntry, TranscriptError, TranscriptList, TranscriptSource, TranscriptTrack};
use yt_transcript::{TranscriptFetcher, DEFAULT_LANGUAGES};

/// Splits printed output the way a caller of the binary does.
fn split_error(output: &str) -> Result<String, String> {
    match output.strip_prefix("ERROR:") {
        Some(description) => Err(description.trim().to_string()),
        None => Ok(output.to_string()),
    }
}

/// In-memory platform: video id -> (language code -> caption lines).
#[derive(Default)]
struct FakePlatform {
    videos: HashMap<String, HashMap<String, Vec<String>>>,
    calls: AtomicUsize,
}

impl FakePlatform {
    fn with_video(mut self, video_id: &str, language: &str, lines: &[&str]) -> Self {
        self.videos
            .entry(video_id.to_string())
            .or_default()
            .insert(language.to_string(), lines.iter().map(|l| l.to_string()).collect());
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranscriptSource for FakePlatform {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn fetch_entries(
        &self,
        video_id: &str,
        languages: &[&str],
    ) -> Result<Vec<CaptionEntry>, TranscriptError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let tracks = self
            .videos
            .get(video_id)
            .ok_or_else(|| TranscriptError::VideoUnavailable {
                video_id: video_id.to_string(),
            })?;

        let mut list = TranscriptList::new(video_id);
        for code in tracks.keys() {
            list.add(TranscriptTrack {
                video_id: video_id.to_string(),
                url: format!("fake://{}/{}", video_id, code),
                language: code.clone(),
                language_code: code.clone(),
                is_generated: false,
            });
        }

        let track = list.find_transcript(languages)?;
        Ok(tracks[&track.language_code]
            .iter()
            .enumerate()
            .map(|(i, text)| CaptionEntry::new(text.as_str(), i as f64 * 2.0, 2.0))
            .collect())
    }
}

#[tokio::test]
async fn test_french_transcript_preferred() -> Result<()> {
    let platform = FakePlatform::default()
        .with_video("abc123", "fr", &["Bonjour", "le monde"])
        .with_video("abc123", "en", &["Hello", "world"]);
    let fetcher = TranscriptFetcher::new(platform);

    assert_eq!(fetcher.fetch_text("abc123").await, "Bonjour\nle monde");
    Ok(())
}

#[tokio::test]
async fn test_english_fallback() -> Result<()> {
    let platform = FakePlatform::default().with_video("abc123", "en", &["Hello", "world"]);
    let fetcher = TranscriptFetcher::new(platform);

    assert_eq!(fetcher.fetch_text("abc123").await, "Hello\nworld");
    Ok(())
}

#[tokio::test]
async fn test_no_requested_language_is_error() -> Result<()> {
    let platform = FakePlatform::default().with_video("abc123", "de", &["Hallo"]);
    let fetcher = TranscriptFetcher::new(platform);

    let outcome = fetcher.fetch("abc123").await;
    assert!(matches!(
        outcome.into_result(),
        Err(TranscriptError::NoTranscriptFound { .. })
    ));

    let text = fetcher.fetch_text("abc123").await;
    assert!(text.starts_with("ERROR: "));
    assert!(text.ends_with("Available transcripts: de"));
    Ok(())
}

#[tokio::test]
async fn test_missing_video_is_error_string() -> Result<()> {
    let fetcher = TranscriptFetcher::new(FakePlatform::default());

    let text = fetcher.fetch_text("xyz000").await;
    assert!(text.starts_with("ERROR: "));
    assert!(text.contains("https://www.youtube.com/watch?v=xyz000"));

    let description = split_error(&text).unwrap_err();
    assert!(description.starts_with("Could not retrieve a transcript"));
    Ok(())
}

#[tokio::test]
async fn test_fetch_is_idempotent() -> Result<()> {
    let platform = FakePlatform::default().with_video("abc123", "fr", &["un", "deux", "trois"]);
    let fetcher = TranscriptFetcher::new(platform);

    let first = fetcher.fetch_text("abc123").await;
    let second = fetcher.fetch_text("abc123").await;
    assert_eq!(first, second);
    assert_eq!(fetcher.source().calls(), 2);
    Ok(())
}

#[tokio::test]
async fn test_default_languages() -> Result<()> {
    assert_eq!(DEFAULT_LANGUAGES, ["fr", "en"]);
    Ok(())
}

#[tokio::test]
async fn test_cli_without_id_makes_no_call() -> Result<()> {
    let cli = Cli::try_parse_from(["yt-transcript"])?;
    let fetcher = TranscriptFetcher::new(FakePlatform::default());

    let output = cli.output_with(&fetcher).await;
    assert_eq!(output, NO_VIDEO_ID_MESSAGE);
    assert_eq!(output, "ERROR: No video ID provided.");
    assert_eq!(fetcher.source().calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_cli_prints_transcript_and_ignores_extra_args() -> Result<()> {
    let cli = Cli::try_parse_from(["yt-transcript", "abc123", "other456"])?;
    let platform = FakePlatform::default()
        .with_video("abc123", "fr", &["Bonjour", "le monde"])
        .with_video("other456", "fr", &["Autre"]);
    let fetcher = TranscriptFetcher::new(platform);

    assert_eq!(cli.output_with(&fetcher).await, "Bonjour\nle monde");
    assert_eq!(fetcher.source().calls(), 1);
    Ok(())
}

#[tokio::test]
async fn test_cli_max_words_only_truncates_success() -> Result<()> {
    let cli = Cli::try_parse_from(["yt-transcript", "--max-words", "2", "abc123"])?;
    let platform = FakePlatform::default().with_video("abc123", "en", &["Hello there", "general world"]);
    let fetcher = TranscriptFetcher::new(platform);
    assert_eq!(cli.output_with(&fetcher).await, "Hello there");

    let cli = Cli::try_parse_from(["yt-transcript", "--max-words", "2", "xyz000"])?;
    let output = cli.output_with(&fetcher).await;
    assert!(output.starts_with("ERROR: Could not retrieve a transcript"));
    Ok(())
}
