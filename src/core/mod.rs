pub mod error;
pub mod fetcher;
pub mod transcript;

pub use error::TranscriptError;
pub use fetcher::{FetchOutcome, TranscriptFetcher, TranscriptSource, ERROR_PREFIX};
pub use transcript::{CaptionEntry, TranscriptList, TranscriptTrack, DEFAULT_LANGUAGES};
