pub mod cli;
pub mod config;
pub mod core;
pub mod extractors;
pub mod utils;

pub use self::core::{
    CaptionEntry, FetchOutcome, TranscriptError, TranscriptFetcher, TranscriptSource,
    DEFAULT_LANGUAGES,
};
pub use extractors::YouTubeTranscriptSource;
