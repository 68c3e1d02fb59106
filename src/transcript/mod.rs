use crate::errors::{ProviderError, TranscriptUnavailable};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionTrack {
    pub language_code: String,
    pub name: String,
    pub is_generated: bool,
    /// Provider-specific locator used to fetch the chunks.
    pub handle: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionChunk {
    pub start_ms: u64,
    pub text: String,
}

pub trait CaptionProvider: Send + Sync {
    fn list_tracks(&self, video_id: &str) -> Result<Vec<CaptionTrack>, ProviderError>;
    fn fetch_chunks(&self, track: &CaptionTrack) -> Result<Vec<CaptionChunk>, ProviderError>;
}

mod rules;
mod youtube;

pub use rules::TrackSelector;
pub use youtube::YoutubeCaptionProvider;

/// Chronological, trimmed, non-blank chunk texts joined by single spaces.
pub fn join_chunks(mut chunks: Vec<CaptionChunk>) -> String {
    chunks.sort_by_key(|c| c.start_ms);
    chunks
        .iter()
        .map(|c| c.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct TranscriptAcquirer {
    provider: Arc<dyn CaptionProvider>,
}

impl TranscriptAcquirer {
    pub fn new(provider: Arc<dyn CaptionProvider>) -> Self {
        Self { provider }
    }

    pub fn acquire(
        &self,
        video_id: &str,
        preferred_languages: &[String],
    ) -> Result<String, TranscriptUnavailable> {
        self.acquire_with(video_id, &TrackSelector::standard(preferred_languages))
            .inspect_err(|e| {
                tracing::warn!(%video_id, reason = e.reason().as_str(), error = ?e, "transcript unavailable")
            })
    }

    pub fn acquire_with(
        &self,
        video_id: &str,
        selector: &TrackSelector,
    ) -> Result<String, TranscriptUnavailable> {
        let tracks = self.provider.list_tracks(video_id)?;
        let (rule, track) = selector
            .select(&tracks)
            .ok_or(TranscriptUnavailable::NotFound)?;
        tracing::info!(
            %video_id,
            rule,
            language = %track.language_code,
            generated = track.is_generated,
            available = tracks.len(),
            "caption track selected"
        );
        let chunks = self.provider.fetch_chunks(track)?;
        let text = join_chunks(chunks);
        if text.is_empty() {
            return Err(TranscriptUnavailable::Empty);
        }
        Ok(text)
    }
}
