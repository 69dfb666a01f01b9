use thiserror::Error;

pub const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

pub fn watch_url(video_id: &str) -> String {
    format!("{}{}", WATCH_URL, video_id)
}

fn available_list(available: &[String]) -> String {
    if available.is_empty() {
        "none".to_string()
    } else {
        available.join(", ")
    }
}

/// Everything that can keep a transcript from being retrieved.
///
/// Each variant keeps the video id so the rendered message points at the
/// watch page, the way the platform errors are usually reported.
#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("Could not retrieve a transcript for the video {}! You provided an invalid video id. Make sure you are using the video id and NOT the url!", watch_url(.video_id))]
    InvalidVideoId { video_id: String },

    #[error("Could not retrieve a transcript for the video {}! The video is no longer available", watch_url(.video_id))]
    VideoUnavailable { video_id: String },

    #[error("Could not retrieve a transcript for the video {}! The video is unplayable: {reason}", watch_url(.video_id))]
    VideoUnplayable { video_id: String, reason: String },

    #[error("Could not retrieve a transcript for the video {}! This video is age-restricted and requires authentication", watch_url(.video_id))]
    AgeRestricted { video_id: String },

    #[error("Could not retrieve a transcript for the video {}! Subtitles are disabled for this video", watch_url(.video_id))]
    TranscriptsDisabled { video_id: String },

    #[error(
        "Could not retrieve a transcript for the video {}! No transcripts were found for any of the requested language codes: {requested:?}. Available transcripts: {}",
        watch_url(.video_id),
        available_list(.available)
    )]
    NoTranscriptFound {
        video_id: String,
        requested: Vec<String>,
        available: Vec<String>,
    },

    #[error("Could not retrieve a transcript for the video {}! YouTube is blocking requests from your IP (too many requests or bot check)", watch_url(.video_id))]
    RequestBlocked { video_id: String },

    #[error("Could not retrieve a transcript for the video {}! YouTube is blocking requests from your IP (captcha required)", watch_url(.video_id))]
    IpBlocked { video_id: String },

    #[error("Could not retrieve a transcript for the video {}! Failed to automatically give consent to saving cookies", watch_url(.video_id))]
    FailedToCreateConsentCookie { video_id: String },

    #[error("Could not retrieve a transcript for the video {}! Unexpected response from YouTube: {detail}", watch_url(.video_id))]
    Unparsable { video_id: String, detail: String },

    #[error("Could not retrieve a transcript for the video {}! HTTP error: {source}", watch_url(.video_id))]
    Http {
        video_id: String,
        #[source]
        source: reqwest::Error,
    },
}

impl TranscriptError {
    pub fn video_id(&self) -> &str {
        match self {
            Self::InvalidVideoId { video_id }
            | Self::VideoUnavailable { video_id }
            | Self::VideoUnplayable { video_id, .. }
            | Self::AgeRestricted { video_id }
            | Self::TranscriptsDisabled { video_id }
            | Self::NoTranscriptFound { video_id, .. }
            | Self::RequestBlocked { video_id }
            | Self::IpBlocked { video_id }
            | Self::FailedToCreateConsentCookie { video_id }
            | Self::Unparsable { video_id, .. }
            | Self::Http { video_id, .. } => video_id,
        }
    }

    /// Short machine-friendly name of the failure kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidVideoId { .. } => "invalid_video_id",
            Self::VideoUnavailable { .. } => "video_unavailable",
            Self::VideoUnplayable { .. } => "video_unplayable",
            Self::AgeRestricted { .. } => "age_restricted",
            Self::TranscriptsDisabled { .. } => "transcripts_disabled",
            Self::NoTranscriptFound { .. } => "no_transcript_found",
            Self::RequestBlocked { .. } => "request_blocked",
            Self::IpBlocked { .. } => "ip_blocked",
            Self::FailedToCreateConsentCookie { .. } => "consent_cookie",
            Self::Unparsable { .. } => "unparsable",
            Self::Http { .. } => "http",
        }
    }

    pub(crate) fn unparsable(video_id: &str, detail: impl Into<String>) -> Self {
        Self::Unparsable {
            video_id: video_id.to_string(),
            detail: detail.into(),
        }
    }

    pub(crate) fn http(video_id: &str, source: reqwest::Error) -> Self {
        Self::Http {
            video_id: video_id.to_string(),
            source,
        }
    }
}
