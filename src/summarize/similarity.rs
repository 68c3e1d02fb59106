use std::collections::BTreeMap;

use super::segment::Sentence;

fn norm(terms: &BTreeMap<String, usize>) -> f64 {
    terms
        .values()
        .map(|&tf| (tf * tf) as f64)
        .sum::<f64>()
        .sqrt()
}

/// Cosine similarity of the term-frequency vectors of two sentences.
///
/// The dot product always runs over the shared stems in key order, so
/// `similarity(a, b) == similarity(b, a)` holds bit for bit.
pub fn similarity(a: &Sentence, b: &Sentence) -> f64 {
    if a.terms.is_empty() || b.terms.is_empty() {
        return 0.0;
    }
    let (small, large) = if a.terms.len() <= b.terms.len() {
        (&a.terms, &b.terms)
    } else {
        (&b.terms, &a.terms)
    };
    let dot: f64 = small
        .iter()
        .filter_map(|(term, &tf)| large.get(term).map(|&other| (tf * other) as f64))
        .sum();
    if dot == 0.0 {
        return 0.0;
    }
    (dot / (norm(&a.terms) * norm(&b.terms))).clamp(0.0, 1.0)
}
