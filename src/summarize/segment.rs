use rust_stemmers::{Algorithm, Stemmer};
use std::collections::BTreeMap;

use super::stopwords::is_stopword;

/// A sentence of the transcript. `text` is the original span; `terms` holds
/// the stemmed, stopword-free token counts used only for scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct Sentence {
    pub position: usize,
    pub text: String,
    pub terms: BTreeMap<String, usize>,
}

const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "e.g", "i.e", "approx", "fig",
    "inc", "ltd", "co", "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct",
    "nov", "dec",
];

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '…')
}

fn is_closer(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '”' | '’' | '»')
}

fn first_word(text: &str) -> &str {
    text.trim_start()
        .split(|c: char| !c.is_alphanumeric())
        .next()
        .unwrap_or("")
}

// `after_dot` is the text following the dot and any closers.
fn is_abbreviation(before_dot: &str, after_dot: &str) -> bool {
    let word = before_dot
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("")
        .trim_start_matches(|c: char| !c.is_alphanumeric());
    let lower = word.to_lowercase();
    let mut chars = word.chars();
    match (chars.next(), chars.next()) {
        // Initials as in "J. Smith"; a lone "I." ends a sentence.
        (Some(c), None) => {
            let next = first_word(after_dot);
            c.is_uppercase()
                && c != 'I'
                && next != "I"
                && next.chars().next().is_some_and(char::is_uppercase)
        }
        // "No. 5" but not the answer "No."
        (Some(_), Some(_)) if lower == "no" => after_dot
            .trim_start()
            .starts_with(|c: char| c.is_ascii_digit()),
        (Some(_), Some(_)) => ABBREVIATIONS.contains(&lower.as_str()),
        _ => false,
    }
}

/// Split text into trimmed sentence spans on `.`, `!`, `?` and `…` runs that
/// are followed by whitespace or the end of the text. Approximate: dots
/// inside numbers or words and after common abbreviations do not split.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut spans = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;

    while i < chars.len() {
        let (offset, c) = chars[i];
        if !is_terminator(c) {
            i += 1;
            continue;
        }
        let mut j = i;
        while j + 1 < chars.len() && is_terminator(chars[j + 1].1) {
            j += 1;
        }
        let single_dot = c == '.' && j == i;
        while j + 1 < chars.len() && is_closer(chars[j + 1].1) {
            j += 1;
        }
        let end = chars.get(j + 1).map(|(o, _)| *o).unwrap_or(text.len());
        let at_boundary = end == text.len() || chars[j + 1].1.is_whitespace();
        let abbreviation = single_dot && is_abbreviation(&text[start..offset], &text[end..]);

        if at_boundary && !abbreviation {
            let span = text[start..end].trim();
            if !span.is_empty() {
                spans.push(span);
            }
            start = end;
        }
        i = j + 1;
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        spans.push(tail);
    }
    spans
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '\'' || c == '’' || c == '-'
}

/// Lowercased words of a sentence. A word must start with a letter.
pub fn words(sentence: &str) -> Vec<String> {
    sentence
        .split(|c: char| !is_word_char(c))
        .map(|w| w.trim_matches(|c: char| c == '\'' || c == '’' || c == '-'))
        .filter(|w| w.chars().next().is_some_and(char::is_alphabetic))
        .map(|w| w.to_lowercase().replace('’', "'"))
        .collect()
}

fn normalize(sentence: &str, stemmer: &Stemmer) -> BTreeMap<String, usize> {
    let mut terms = BTreeMap::new();
    for word in words(sentence) {
        if is_stopword(&word) {
            continue;
        }
        let stem = stemmer.stem(&word).into_owned();
        *terms.entry(stem).or_insert(0) += 1;
    }
    terms
}

pub fn segment(text: &str) -> Vec<Sentence> {
    let stemmer = Stemmer::create(Algorithm::English);
    split_sentences(text)
        .into_iter()
        .enumerate()
        .map(|(position, span)| Sentence {
            position,
            text: span.to_string(),
            terms: normalize(span, &stemmer),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_terminal_punctuation() {
        let spans = split_sentences("First one. Second one! Third one? Tail without stop");
        assert_eq!(
            spans,
            vec!["First one.", "Second one!", "Third one?", "Tail without stop"]
        );
    }

    #[test]
    fn keeps_decimals_urls_and_abbreviations_together() {
        let spans =
            split_sentences("Dr. Smith paid 3.50 dollars at example.com today. Then he left.");
        assert_eq!(
            spans,
            vec!["Dr. Smith paid 3.50 dollars at example.com today.", "Then he left."]
        );
    }

    #[test]
    fn spoken_no_and_i_end_sentences() {
        assert_eq!(
            split_sentences("Is it hard? No. It is easy."),
            vec!["Is it hard?", "No.", "It is easy."]
        );
        assert_eq!(
            split_sentences("Nobody else came, just me and I. Then we left."),
            vec!["Nobody else came, just me and I.", "Then we left."]
        );
        assert_eq!(segment("Is it hard? No. It is easy. Yes. So go.").len(), 5);
    }

    #[test]
    fn numbered_items_and_initials_do_not_split() {
        assert_eq!(
            split_sentences("Track no. 5 is great. J. R. Tolkien wrote it. Plan b. Then go."),
            vec!["Track no. 5 is great.", "J. R. Tolkien wrote it.", "Plan b.", "Then go."]
        );
    }

    #[test]
    fn closing_quotes_stay_with_their_sentence() {
        let spans = split_sentences("He said \"stop.\" We stopped... Really?!");
        assert_eq!(spans, vec!["He said \"stop.\"", "We stopped...", "Really?!"]);
    }

    #[test]
    fn newlines_are_not_boundaries() {
        let spans = split_sentences("so this is\nthe first line. and the\nsecond");
        assert_eq!(spans, vec!["so this is\nthe first line.", "and the\nsecond"]);
    }

    #[test]
    fn empty_and_blank_text_yield_no_sentences() {
        assert!(segment("").is_empty());
        assert!(segment("   \n ").is_empty());
    }

    #[test]
    fn words_skip_numbers_and_normalize_apostrophes() {
        assert_eq!(
            words("It’s 2024, and Rust-lang rocks!"),
            vec!["it's", "and", "rust-lang", "rocks"]
        );
    }

    #[test]
    fn terms_are_stemmed_and_stopword_free() {
        let sentences = segment("The runners were running quickly. The runner runs.");
        assert_eq!(sentences.len(), 2);
        let first = &sentences[0];
        assert_eq!(first.position, 0);
        assert_eq!(first.text, "The runners were running quickly.");
        assert!(!first.terms.contains_key("the"));
        assert!(!first.terms.contains_key("were"));
        assert_eq!(first.terms.get("run"), Some(&1));
        assert_eq!(first.terms.get("runner"), Some(&1));
        assert_eq!(sentences[1].terms.get("run"), Some(&1));
    }

    #[test]
    fn sentence_of_only_stopwords_has_no_terms() {
        let sentences = segment("And so it is.");
        assert_eq!(sentences.len(), 1);
        assert!(sentences[0].terms.is_empty());
        assert_eq!(sentences[0].text, "And so it is.");
    }
}
