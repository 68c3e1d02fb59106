use crate::errors::SummarizeError;

#[derive(Debug, Clone)]
pub struct SummarizeResult {
    pub sentences: Vec<String>,
    pub total_sentences: usize,
    pub backend: String,
}

pub trait Summarizer: Send + Sync {
    fn summarize(&self, text: &str, ratio: f64) -> Result<SummarizeResult, SummarizeError>;
}

mod rank;
mod segment;
mod select;
mod similarity;
mod stopwords;

use rank::rank;
use segment::segment;
use select::select;
use similarity::similarity;

#[cfg(test)]
use segment::Sentence;

#[derive(Default)]
pub struct TextRankSummarizer;

impl Summarizer for TextRankSummarizer {
    fn summarize(&self, text: &str, ratio: f64) -> Result<SummarizeResult, SummarizeError> {
        let sentences = segment(text);
        let ranking = rank(&sentences, similarity);
        if let Some(bad) = ranking.scores.iter().position(|s| !s.is_finite()) {
            return Err(SummarizeError::internal(format!(
                "non-finite rank for sentence {bad} of {}",
                sentences.len()
            )));
        }
        tracing::debug!(
            sentences = sentences.len(),
            iterations = ranking.iterations,
            converged = ranking.converged,
            "textrank finished"
        );
        let chosen = select(&sentences, &ranking.scores, ratio)
            .into_iter()
            .map(|s| s.text.clone())
            .collect();
        Ok(SummarizeResult {
            sentences: chosen,
            total_sentences: sentences.len(),
            backend: "textrank".into(),
        })
    }
}
