use crate::core::{CaptionEntry, TranscriptError, DEFAULT_LANGUAGES};
use crate::utils::join_entries;
use async_trait::async_trait;
use std::fmt;
use tracing::{debug, info};

/// Prefix put in front of every failure description.
pub const ERROR_PREFIX: &str = "ERROR: ";

/// Anything that can hand back the caption entries of a video.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Entries of the first track matching `languages`, in order.
    async fn fetch_entries(
        &self,
        video_id: &str,
        languages: &[&str],
    ) -> Result<Vec<CaptionEntry>, TranscriptError>;
}

/// Result of one fetch. `Display` gives the printed form: the transcript
/// itself, or `ERROR: <description>`.
#[derive(Debug)]
pub enum FetchOutcome {
    Text(String),
    Failure(TranscriptError),
}

impl FetchOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Failure(_) => None,
        }
    }

    pub fn into_result(self) -> Result<String, TranscriptError> {
        match self {
            Self::Text(text) => Ok(text),
            Self::Failure(err) => Err(err),
        }
    }
}

impl From<Result<Vec<CaptionEntry>, TranscriptError>> for FetchOutcome {
    fn from(result: Result<Vec<CaptionEntry>, TranscriptError>) -> Self {
        match result {
            Ok(entries) => Self::Text(join_entries(&entries)),
            Err(err) => Self::Failure(err),
        }
    }
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Failure(err) => write!(f, "{}{}", ERROR_PREFIX, err),
        }
    }
}

pub struct TranscriptFetcher<S> {
    source: S,
}

impl<S: TranscriptSource> TranscriptFetcher<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn fetch(&self, video_id: &str) -> FetchOutcome {
        debug!(
            "Fetching transcript for {} via {} (languages: {:?})",
            video_id,
            self.source.name(),
            DEFAULT_LANGUAGES
        );

        let outcome = FetchOutcome::from(
            self.source
                .fetch_entries(video_id, &DEFAULT_LANGUAGES)
                .await,
        );

        match &outcome {
            FetchOutcome::Text(text) => info!("Fetched transcript for {} ({} bytes)", video_id, text.len()),
            FetchOutcome::Failure(err) => info!("Transcript fetch failed for {} [{}]", err.video_id(), err.kind()),
        }

        outcome
    }

    /// Same as [`fetch`](Self::fetch), rendered to the printed form.
    pub async fn fetch_text(&self, video_id: &str) -> String {
        self.fetch(video_id).await.to_string()
    }
}
