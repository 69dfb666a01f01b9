use crate::config::Config;
use crate::core::{
    error::watch_url, CaptionEntry, TranscriptError, TranscriptList, TranscriptSource,
    TranscriptTrack,
};
use crate::extractors::timedtext::parse_timed_text;
use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;
use reqwest::cookie::Jar;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use url::Url;

const YOUTUBE_URL: &str = "https://www.youtube.com";
const INNERTUBE_PLAYER_URL: &str = "https://www.youtube.com/youtubei/v1/player";
const INNERTUBE_CLIENT_NAME: &str = "ANDROID";
const INNERTUBE_CLIENT_VERSION: &str = "20.10.38";

const REASON_BOT_DETECTED: &str = "Sign in to confirm you";
const REASON_AGE_RESTRICTED: &str = "inappropriate for some users";
const REASON_UNAVAILABLE: &str = "This video is unavailable";

/// Transcript source backed by youtube.com: the watch page gives the
/// InnerTube key, the player API lists caption tracks, timed text gives
/// the lines.
pub struct YouTubeTranscriptSource {
    client: reqwest::Client,
    jar: Arc<Jar>,
    accept_language: String,
}

/// What a fetched watch page means for the next request.
#[derive(Debug, PartialEq)]
pub enum WatchPage {
    Ready(String),
    /// Consent wall; holds the hidden `v` value to put in the CONSENT cookie.
    NeedsConsent(String),
}

impl YouTubeTranscriptSource {
    pub fn new(config: &Config) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .cookie_provider(Arc::clone(&jar))
            .redirect(reqwest::redirect::Policy::limited(10));

        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            jar,
            accept_language: config.accept_language.clone(),
        })
    }

    /// True for input that is clearly a URL rather than a video id.
    pub fn looks_like_url(video_id: &str) -> bool {
        video_id.starts_with("http://")
            || video_id.starts_with("https://")
            || video_id.starts_with("www.")
    }

    pub fn extract_innertube_api_key(html: &str) -> Option<String> {
        let re = Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).ok()?;
        re.captures(html)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }

    pub fn extract_consent_value(html: &str) -> Option<String> {
        let re = Regex::new(r#"name="v" value="(.*?)""#).ok()?;
        re.captures(html)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }

    fn is_consent_page(html: &str) -> bool {
        html.contains("action=\"https://consent.youtube.com/s\"")
    }

    fn is_recaptcha_page(html: &str) -> bool {
        html.contains("class=\"g-recaptcha\"")
    }

    /// Rate limiting gets its own error; other statuses are left to `error_for_status`.
    pub fn check_status(video_id: &str, status: StatusCode) -> Result<(), TranscriptError> {
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TranscriptError::RequestBlocked {
                video_id: video_id.to_string(),
            });
        }
        Ok(())
    }

    /// `consent_sent` is true once the CONSENT cookie has been set; a consent
    /// wall after that means the cookie was not accepted.
    pub fn classify_watch_page(
        video_id: &str,
        html: String,
        consent_sent: bool,
    ) -> Result<WatchPage, TranscriptError> {
        if !Self::is_consent_page(&html) {
            return Ok(WatchPage::Ready(html));
        }

        let consent_failed = || TranscriptError::FailedToCreateConsentCookie {
            video_id: video_id.to_string(),
        };
        if consent_sent {
            return Err(consent_failed());
        }

        Self::extract_consent_value(&html)
            .map(WatchPage::NeedsConsent)
            .ok_or_else(consent_failed)
    }

    pub fn api_key_or_error(video_id: &str, html: &str) -> Result<String, TranscriptError> {
        match Self::extract_innertube_api_key(html) {
            Some(key) => Ok(key),
            None if Self::is_recaptcha_page(html) => Err(TranscriptError::IpBlocked {
                video_id: video_id.to_string(),
            }),
            None => Err(TranscriptError::unparsable(
                video_id,
                "INNERTUBE_API_KEY not found in watch page",
            )),
        }
    }

    fn accept_consent(&self, video_id: &str, value: &str) -> Result<(), TranscriptError> {
        let url = Url::parse(YOUTUBE_URL)
            .map_err(|e| TranscriptError::unparsable(video_id, e.to_string()))?;
        self.jar.add_cookie_str(
            &format!("CONSENT=YES+{}; Domain=.youtube.com", value),
            &url,
        );
        Ok(())
    }

    async fn get_watch_page(&self, video_id: &str) -> Result<String, TranscriptError> {
        let response = self
            .client
            .get(watch_url(video_id))
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", self.accept_language.as_str())
            .send()
            .await
            .map_err(|e| TranscriptError::http(video_id, e))?;

        Self::check_status(video_id, response.status())?;

        let response = response
            .error_for_status()
            .map_err(|e| TranscriptError::http(video_id, e))?;

        response
            .text()
            .await
            .map_err(|e| TranscriptError::http(video_id, e))
    }

    async fn fetch_watch_html(&self, video_id: &str) -> Result<String, TranscriptError> {
        let html = self.get_watch_page(video_id).await?;
        let value = match Self::classify_watch_page(video_id, html, false)? {
            WatchPage::Ready(html) => return Ok(html),
            WatchPage::NeedsConsent(value) => value,
        };

        tracing::debug!("Consent page served for {}, accepting cookies", video_id);
        self.accept_consent(video_id, &value)?;

        let html = self.get_watch_page(video_id).await?;
        match Self::classify_watch_page(video_id, html, true)? {
            WatchPage::Ready(html) => Ok(html),
            WatchPage::NeedsConsent(_) => Err(TranscriptError::FailedToCreateConsentCookie {
                video_id: video_id.to_string(),
            }),
        }
    }

    async fn fetch_player_response(
        &self,
        video_id: &str,
        api_key: &str,
    ) -> Result<Value, TranscriptError> {
        let body = json!({
            "context": {
                "client": {
                    "clientName": INNERTUBE_CLIENT_NAME,
                    "clientVersion": INNERTUBE_CLIENT_VERSION,
                }
            },
            "videoId": video_id,
        });

        let response = self
            .client
            .post(INNERTUBE_PLAYER_URL)
            .query(&[("key", api_key)])
            .header("Accept-Language", self.accept_language.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| TranscriptError::http(video_id, e))?;

        Self::check_status(video_id, response.status())?;

        response
            .error_for_status()
            .map_err(|e| TranscriptError::http(video_id, e))?
            .json::<Value>()
            .await
            .map_err(|e| TranscriptError::http(video_id, e))
    }

    /// Maps a non-playable `playabilityStatus` to the matching error.
    pub fn check_playability(
        video_id: &str,
        player_response: &Value,
    ) -> Result<(), TranscriptError> {
        let Some(playability) = player_response.get("playabilityStatus") else {
            return Ok(());
        };

        let status = playability
            .get("status")
            .and_then(|v| v.as_str())
            .unwrap_or("OK");
        if status == "OK" {
            return Ok(());
        }

        let reason = playability
            .get("reason")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        tracing::debug!("Playability status {} for {}: {}", status, video_id, reason);

        let video_id = video_id.to_string();
        match status {
            "LOGIN_REQUIRED" if reason.starts_with(REASON_BOT_DETECTED) => {
                return Err(TranscriptError::RequestBlocked { video_id });
            }
            "LOGIN_REQUIRED" if reason.contains(REASON_AGE_RESTRICTED) => {
                return Err(TranscriptError::AgeRestricted { video_id });
            }
            "ERROR" if reason == REASON_UNAVAILABLE => {
                return Err(TranscriptError::VideoUnavailable { video_id });
            }
            _ => {}
        }

        let subreasons: Vec<&str> = playability
            .pointer("/errorScreen/playerErrorMessageRenderer/subreason/runs")
            .and_then(|v| v.as_array())
            .map(|runs| {
                runs.iter()
                    .filter_map(|r| r.get("text").and_then(|t| t.as_str()))
                    .collect()
            })
            .unwrap_or_default();

        let mut reason = if reason.is_empty() {
            status.to_string()
        } else {
            reason.to_string()
        };
        if !subreasons.is_empty() {
            reason = format!("{} ({})", reason, subreasons.join(""));
        }

        Err(TranscriptError::VideoUnplayable { video_id, reason })
    }

    /// Builds the track list from `captions.playerCaptionsTracklistRenderer`.
    pub fn extract_transcript_list(
        video_id: &str,
        player_response: &Value,
    ) -> Result<TranscriptList, TranscriptError> {
        let tracks = player_response
            .pointer("/captions/playerCaptionsTracklistRenderer/captionTracks")
            .and_then(|v| v.as_array())
            .ok_or_else(|| TranscriptError::TranscriptsDisabled {
                video_id: video_id.to_string(),
            })?;

        let mut list = TranscriptList::new(video_id);
        for caption in tracks {
            let (Some(base_url), Some(language_code)) = (
                caption.get("baseUrl").and_then(|v| v.as_str()),
                caption.get("languageCode").and_then(|v| v.as_str()),
            ) else {
                tracing::debug!("Skipping caption track without url or language: {}", caption);
                continue;
            };

            let language = caption
                .pointer("/name/runs/0/text")
                .or_else(|| caption.pointer("/name/simpleText"))
                .and_then(|v| v.as_str())
                .unwrap_or(language_code)
                .to_string();

            list.add(TranscriptTrack {
                video_id: video_id.to_string(),
                url: base_url.replace("&fmt=srv3", ""),
                language,
                language_code: language_code.to_string(),
                is_generated: caption.get("kind").and_then(|v| v.as_str()) == Some("asr"),
            });
        }

        if list.is_empty() {
            return Err(TranscriptError::TranscriptsDisabled {
                video_id: video_id.to_string(),
            });
        }

        Ok(list)
    }

    pub async fn list_transcripts(
        &self,
        video_id: &str,
    ) -> Result<TranscriptList, TranscriptError> {
        if Self::looks_like_url(video_id) {
            return Err(TranscriptError::InvalidVideoId {
                video_id: video_id.to_string(),
            });
        }

        let html = self.fetch_watch_html(video_id).await?;

        let api_key = Self::api_key_or_error(video_id, &html)?;

        let player_response = self.fetch_player_response(video_id, &api_key).await?;
        Self::check_playability(video_id, &player_response)?;
        Self::extract_transcript_list(video_id, &player_response)
    }

    async fn fetch_track(
        &self,
        track: &TranscriptTrack,
    ) -> Result<Vec<CaptionEntry>, TranscriptError> {
        let video_id = track.video_id.as_str();
        let url = Url::parse(&track.url)
            .map_err(|e| TranscriptError::unparsable(video_id, format!("bad caption url: {}", e)))?;

        tracing::debug!(
            "Fetching {} track ({}) for {}",
            track.language_code,
            if track.is_generated { "generated" } else { "manual" },
            video_id
        );

        let response = self
            .client
            .get(url)
            .header("Accept-Language", self.accept_language.as_str())
            .send()
            .await
            .map_err(|e| TranscriptError::http(video_id, e))?;

        Self::check_status(video_id, response.status())?;

        let xml = response
            .error_for_status()
            .map_err(|e| TranscriptError::http(video_id, e))?
            .text()
            .await
            .map_err(|e| TranscriptError::http(video_id, e))?;

        Ok(parse_timed_text(&xml))
    }
}

#[async_trait]
impl TranscriptSource for YouTubeTranscriptSource {
    fn name(&self) -> &'static str {
        "YouTube"
    }

    async fn fetch_entries(
        &self,
        video_id: &str,
        languages: &[&str],
    ) -> Result<Vec<CaptionEntry>, TranscriptError> {
        let list = self.list_transcripts(video_id).await?;
        let track = list.find_transcript(languages)?;
        tracing::info!(
            "Using {} transcript ({}) for {}",
            track.language,
            track.language_code,
            video_id
        );
        self.fetch_track(track).await
    }
}
