use super::segment::Sentence;

pub const MIN_SENTENCES: usize = 3;

/// `max(3, floor(total * ratio))`, or zero for an empty transcript. May exceed
/// `total`; `select` clamps.
pub fn summary_count(total: usize, ratio: f64) -> usize {
    if total == 0 {
        return 0;
    }
    let scaled = (total as f64 * ratio).floor();
    let scaled = if scaled.is_finite() && scaled > 0.0 {
        scaled as usize
    } else {
        0
    };
    scaled.max(MIN_SENTENCES)
}

/// Pick the highest-scoring sentences (earlier position wins ties) and return
/// them in transcript order.
pub fn select<'a>(sentences: &'a [Sentence], scores: &[f64], ratio: f64) -> Vec<&'a Sentence> {
    let total = sentences.len();
    let count = summary_count(total, ratio);
    if count >= total {
        return sentences.iter().collect();
    }

    let mut order: Vec<usize> = (0..total).collect();
    order.sort_by(|&a, &b| {
        let sa = scores.get(a).copied().unwrap_or(0.0);
        let sb = scores.get(b).copied().unwrap_or(0.0);
        sb.total_cmp(&sa).then(a.cmp(&b))
    });
    order.truncate(count);
    order.sort_unstable();
    order.into_iter().map(|i| &sentences[i]).collect()
}
