use crate::errors::SummarizeError;
use crate::summarize::Summarizer;
use crate::transcript::{CaptionProvider, TranscriptAcquirer};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::sync::Arc;

static VIDEO_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:v=|youtu\.be/)([A-Za-z0-9_-]{11})").expect("video id regex"));

pub fn extract_video_id(url: &str) -> Result<String, SummarizeError> {
    VIDEO_ID_RE
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| SummarizeError::validation("Could not extract video ID from URL."))
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub video_id: String,
    pub ratio: f64,
    pub summary: String,
    pub sentences: Vec<String>,
    pub word_count: usize,
    pub sentence_count: usize,
}

pub struct SummarizerService {
    acquirer: TranscriptAcquirer,
    summarizer: Arc<dyn Summarizer>,
    preferred_languages: Vec<String>,
}

impl SummarizerService {
    pub fn new(
        provider: Arc<dyn CaptionProvider>,
        summarizer: Arc<dyn Summarizer>,
        preferred_languages: Vec<String>,
    ) -> Self {
        Self {
            acquirer: TranscriptAcquirer::new(provider),
            summarizer,
            preferred_languages,
        }
    }

    /// Blocking: performs provider network calls.
    pub fn fetch_and_summarize(&self, url: &str, ratio: f64) -> Result<SummaryReport, SummarizeError> {
        let video_id = extract_video_id(url)?;
        self.summarize_video(&video_id, ratio)
    }

    pub fn summarize_video(&self, video_id: &str, ratio: f64) -> Result<SummaryReport, SummarizeError> {
        let transcript = self.acquirer.acquire(video_id, &self.preferred_languages)?;
        let result = self.summarizer.summarize(&transcript, ratio)?;
        let word_count = transcript.split_whitespace().count();
        tracing::info!(
            %video_id,
            backend = %result.backend,
            word_count,
            total_sentences = result.total_sentences,
            selected = result.sentences.len(),
            "summary built"
        );
        Ok(SummaryReport {
            video_id: video_id.to_string(),
            ratio,
            summary: result.sentences.join(" "),
            sentence_count: result.sentences.len(),
            sentences: result.sentences,
            word_count,
        })
    }
}
