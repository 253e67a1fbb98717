//! crates/text_summarizer_core/src/nlp/mod.rs
//!
//! Extractive summarization. Every algorithm rates the body sentences of a
//! [`Document`]; the best-rated ones are returned in document order.

pub mod document;
pub mod stemmer;
pub mod stop_words;
pub mod tokenizer;

mod edmundson;
mod lex_rank;
mod lsa;
mod text_rank;

pub use document::{Document, Paragraph, Sentence};

use crate::domain::SummarizationMethod;

/// Only this many leading body sentences are rated. The graph methods compare
/// every pair of sentences, so very long pages are cut here.
pub const MAX_RATED_SENTENCES: usize = 1500;

/// Picks up to `sentence_count` sentences from `document` with `method`.
pub fn summarize(
    document: &Document,
    method: SummarizationMethod,
    sentence_count: usize,
) -> Vec<String> {
    let mut sentences = document.sentences();
    sentences.truncate(MAX_RATED_SENTENCES);
    if sentences.is_empty() || sentence_count == 0 {
        return Vec::new();
    }

    let ratings = match method {
        SummarizationMethod::Lsa => lsa::rate(&sentences, sentence_count),
        SummarizationMethod::LexRank => lex_rank::rate(&sentences),
        SummarizationMethod::TextRank => text_rank::rate(&sentences),
        SummarizationMethod::Edmundson => edmundson::rate(document, &sentences),
    };

    select_best(&sentences, &ratings, sentence_count)
}

/// Keeps the `count` highest ratings (earlier sentence wins a tie) and
/// returns those sentences in document order.
fn select_best(sentences: &[&Sentence], ratings: &[f64], count: usize) -> Vec<String> {
    let mut order: Vec<usize> = (0..sentences.len()).collect();
    order.sort_by(|&a, &b| ratings[b].total_cmp(&ratings[a]).then(a.cmp(&b)));
    order.truncate(count);
    order.sort_unstable();
    order.into_iter().map(|i| sentences[i].text.clone()).collect()
}

/// Iterates `rank = base + damping * transitionᵀ · rank` until the L1 change
/// drops below `epsilon`. Rows of `transition` must sum to one (or zero).
fn power_iteration(transition: &[Vec<f64>], damping: f64, epsilon: f64) -> Vec<f64> {
    const MAX_ITERATIONS: usize = 200;
    let n = transition.len();
    let base = (1.0 - damping) / n as f64;
    let mut rank = vec![1.0 / n as f64; n];

    for _ in 0..MAX_ITERATIONS {
        let mut next = vec![base; n];
        for (i, row) in transition.iter().enumerate() {
            for (j, weight) in row.iter().enumerate() {
                next[j] += damping * weight * rank[i];
            }
        }
        let delta: f64 = next.iter().zip(&rank).map(|(a, b)| (a - b).abs()).sum();
        rank = next;
        if delta < epsilon {
            break;
        }
    }
    rank
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = "Rust Memory Safety\n\n\
        Rust is a systems programming language focused on memory safety. \
        The borrow checker enforces memory safety rules at compile time. \
        Many developers enjoy writing command line tools. \
        Memory safety without garbage collection makes Rust fast. \
        The weather was pleasant during the conference.\n\n\
        Ownership\n\n\
        Ownership rules decide when memory is freed. \
        Each value in Rust has a single owner. \
        Lunch was served at noon. \
        When the owner goes out of scope the memory is released safely.";

    fn document() -> Document {
        Document::from_plain_text(ARTICLE)
    }

    #[test]
    fn every_method_respects_the_sentence_count() {
        let doc = document();
        for method in SummarizationMethod::ALL {
            let summary = summarize(&doc, method, 3);
            assert_eq!(summary.len(), 3, "{method} returned {summary:?}");
        }
    }

    #[test]
    fn summaries_keep_document_order() {
        let doc = document();
        let texts: Vec<String> = doc.sentences().iter().map(|s| s.text.clone()).collect();
        for method in SummarizationMethod::ALL {
            let summary = summarize(&doc, method, 4);
            let positions: Vec<usize> = summary
                .iter()
                .map(|s| texts.iter().position(|t| t == s).unwrap())
                .collect();
            let mut sorted = positions.clone();
            sorted.sort_unstable();
            assert_eq!(positions, sorted, "{method} reordered sentences");
        }
    }

    #[test]
    fn off_topic_sentences_are_dropped_first() {
        let doc = document();
        for method in SummarizationMethod::ALL {
            let summary = summarize(&doc, method, 3).join(" ");
            assert!(!summary.contains("Lunch was served"), "{method}: {summary}");
            assert!(!summary.contains("weather"), "{method}: {summary}");
        }
    }

    #[test]
    fn short_documents_are_returned_whole() {
        let doc = Document::from_plain_text("One sentence. Two sentences.");
        for method in SummarizationMethod::ALL {
            assert_eq!(summarize(&doc, method, 10).len(), 2);
        }
    }

    #[test]
    fn empty_document_yields_empty_summary() {
        let doc = Document::default();
        for method in SummarizationMethod::ALL {
            assert!(summarize(&doc, method, 5).is_empty());
        }
    }

    #[test]
    fn select_best_breaks_ties_by_position() {
        let a = Sentence::new("A.", false);
        let b = Sentence::new("B.", false);
        let c = Sentence::new("C.", false);
        let picked = select_best(&[&a, &b, &c], &[1.0, 2.0, 1.0], 2);
        assert_eq!(picked, vec!["A.", "B."]);
    }

    #[test]
    fn sentences_past_the_rating_cap_are_never_picked() {
        let mut body = "Filler text keeps going. ".repeat(MAX_RATED_SENTENCES + 100);
        body.push_str("The closing remark stands alone.");
        let doc = Document {
            paragraphs: vec![Paragraph::new(&[], &body)],
            ..Document::default()
        };
        assert_eq!(doc.sentences().len(), MAX_RATED_SENTENCES + 101);

        // Unlimited, Edmundson's location bonus would pick the last sentence.
        let picked = summarize(&doc, SummarizationMethod::Edmundson, 5);
        assert_eq!(picked.len(), 5);
        assert!(picked.iter().all(|s| s == "Filler text keeps going."));
    }
}
