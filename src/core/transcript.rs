use crate::core::TranscriptError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Languages tried in order when no other preference is given.
pub const DEFAULT_LANGUAGES: [&str; 2] = ["fr", "en"];

/// One caption line as served by the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionEntry {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

impl CaptionEntry {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }
}

/// A caption track available for a video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptTrack {
    pub video_id: String,
    pub url: String,
    pub language: String,
    pub language_code: String,
    pub is_generated: bool,
}

/// The caption tracks of one video, split by how they were produced.
#[derive(Debug, Clone, Default)]
pub struct TranscriptList {
    pub video_id: String,
    manually_created: BTreeMap<String, TranscriptTrack>,
    generated: BTreeMap<String, TranscriptTrack>,
}

impl TranscriptList {
    pub fn new(video_id: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            ..Default::default()
        }
    }

    pub fn add(&mut self, track: TranscriptTrack) {
        let target = if track.is_generated {
            &mut self.generated
        } else {
            &mut self.manually_created
        };
        // first track wins for a language code
        target.entry(track.language_code.clone()).or_insert(track);
    }

    pub fn len(&self) -> usize {
        self.manually_created.len() + self.generated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Language codes of every track, manual ones first.
    pub fn language_codes(&self) -> Vec<String> {
        self.manually_created
            .values()
            .map(|t| t.language_code.clone())
            .chain(
                self.generated
                    .values()
                    .map(|t| format!("{} (generated)", t.language_code)),
            )
            .collect()
    }

    /// Picks the track for the first requested language that has one.
    /// Within a language, a manually created track beats a generated one.
    pub fn find_transcript(&self, languages: &[&str]) -> Result<&TranscriptTrack, TranscriptError> {
        for code in languages {
            if let Some(track) = self
                .manually_created
                .get(*code)
                .or_else(|| self.generated.get(*code))
            {
                return Ok(track);
            }
        }

        Err(TranscriptError::NoTranscriptFound {
            video_id: self.video_id.clone(),
            requested: languages.iter().map(|l| l.to_string()).collect(),
            available: self.language_codes(),
        })
    }
}
