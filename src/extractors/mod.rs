pub mod timedtext;
pub mod youtube;

pub use timedtext::parse_timed_text;
pub use youtube::YouTubeTranscriptSource;
