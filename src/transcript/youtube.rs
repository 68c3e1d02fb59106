use crate::errors::ProviderError;
use crate::transcript::{CaptionChunk, CaptionProvider, CaptionTrack};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

pub struct YoutubeCaptionProvider {
    base_url: String,
    client_version: String,
    client: Client,
}

impl YoutubeCaptionProvider {
    /// Must be called outside of an async context; the blocking client owns
    /// its own runtime thread.
    pub fn new(
        base_url: String,
        client_version: String,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tube-summarizer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::Http(format!("build client: {e}")))?;
        Ok(Self {
            base_url,
            client_version,
            client,
        })
    }

    fn player_url(&self) -> String {
        format!(
            "{}/youtubei/v1/player?prettyPrint=false",
            self.base_url.trim_end_matches('/')
        )
    }
}

impl CaptionProvider for YoutubeCaptionProvider {
    fn list_tracks(&self, video_id: &str) -> Result<Vec<CaptionTrack>, ProviderError> {
        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": "ANDROID",
                    "clientVersion": self.client_version,
                    "hl": "en",
                }
            },
            "videoId": video_id,
        });
        let resp = self
            .client
            .post(self.player_url())
            .json(&body)
            .send()
            .map_err(|e| ProviderError::Http(format!("player request: {e}")))?;
        if !resp.status().is_success() {
            return Err(ProviderError::Http(format!(
                "status {} from player endpoint",
                resp.status()
            )));
        }
        let player: PlayerResponse = resp
            .json()
            .map_err(|e| ProviderError::Decode(format!("player response: {e}")))?;
        tracks_from_player(player)
    }

    fn fetch_chunks(&self, track: &CaptionTrack) -> Result<Vec<CaptionChunk>, ProviderError> {
        let url = json3_url(&track.handle)?;
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| ProviderError::Http(format!("timedtext request: {e}")))?;
        if !resp.status().is_success() {
            return Err(ProviderError::Http(format!(
                "status {} from timedtext endpoint",
                resp.status()
            )));
        }
        let timed: TimedText = resp
            .json()
            .map_err(|e| ProviderError::Decode(format!("timedtext response: {e}")))?;
        Ok(chunks_from_timedtext(timed))
    }
}

// Wire structs for the InnerTube player response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    playability_status: Option<PlayabilityStatus>,
    captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: String,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Captions {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    tracklist: Option<Tracklist>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Tracklist {
    #[serde(default)]
    caption_tracks: Vec<RawTrack>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTrack {
    base_url: String,
    language_code: String,
    kind: Option<String>,
    name: Option<TrackName>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackName {
    simple_text: Option<String>,
    #[serde(default)]
    runs: Vec<TextRun>,
}

#[derive(Debug, Deserialize)]
struct TextRun {
    text: String,
}

// Wire structs for the json3 timedtext format
#[derive(Debug, Deserialize)]
struct TimedText {
    #[serde(default)]
    events: Vec<TimedEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimedEvent {
    #[serde(default)]
    t_start_ms: u64,
    segs: Option<Vec<Segment>>,
}

#[derive(Debug, Deserialize)]
struct Segment {
    #[serde(default)]
    utf8: String,
}

fn tracks_from_player(player: PlayerResponse) -> Result<Vec<CaptionTrack>, ProviderError> {
    let raw = player
        .captions
        .and_then(|c| c.tracklist)
        .map(|t| t.caption_tracks)
        .unwrap_or_default();
    if raw.is_empty() {
        return match player.playability_status {
            Some(p) if p.status != "OK" => {
                Err(ProviderError::Unplayable(p.reason.unwrap_or(p.status)))
            }
            _ => Err(ProviderError::CaptionsDisabled),
        };
    }
    Ok(raw
        .into_iter()
        .map(|t| {
            let name = t
                .name
                .map(|n| {
                    n.simple_text
                        .unwrap_or_else(|| n.runs.into_iter().map(|r| r.text).collect())
                })
                .unwrap_or_else(|| t.language_code.clone());
            CaptionTrack {
                is_generated: t.kind.as_deref() == Some("asr"),
                language_code: t.language_code,
                name,
                handle: t.base_url,
            }
        })
        .collect())
}

fn chunks_from_timedtext(timed: TimedText) -> Vec<CaptionChunk> {
    timed
        .events
        .into_iter()
        .filter_map(|event| {
            let segs = event.segs?;
            let text: String = segs.iter().map(|s| s.utf8.as_str()).collect();
            Some(CaptionChunk {
                start_ms: event.t_start_ms,
                text: text.replace('\n', " "),
            })
        })
        .collect()
}

/// Track URL with its `fmt` parameter forced to `json3`.
fn json3_url(handle: &str) -> Result<Url, ProviderError> {
    let mut url =
        Url::parse(handle).map_err(|e| ProviderError::Decode(format!("track url {handle}: {e}")))?;
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "fmt")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("fmt", "json3");
    Ok(url)
}
