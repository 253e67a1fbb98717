//! Edmundson's method: a weighted sum of cue, key, title and location ratings.

use super::{stemmer, stop_words, Document, Sentence};
use std::collections::{HashMap, HashSet};

const CUE_WEIGHT: f64 = 1.0;
const KEY_WEIGHT: f64 = 0.0;
const TITLE_WEIGHT: f64 = 1.0;
const LOCATION_WEIGHT: f64 = 1.0;

/// Share of the top term frequency a word needs to count as a key word.
const KEY_FREQUENCY_RATIO: f64 = 0.5;

pub(crate) fn rate(document: &Document, sentences: &[&Sentence]) -> Vec<f64> {
    let bonus = stem_set(&document.significant_words);
    let stigma = stem_set(&document.stigma_words);
    let title = heading_terms(document.headings().into_iter());

    let cue = cue_ratings(sentences, &bonus, &stigma);
    let key = if KEY_WEIGHT > 0.0 {
        key_ratings(sentences)
    } else {
        vec![0.0; sentences.len()]
    };
    let title_ratings: Vec<f64> = sentences
        .iter()
        .map(|s| count_in(&s.content_terms(), &title))
        .collect();
    let location = location_ratings(document);

    (0..sentences.len())
        .map(|i| {
            CUE_WEIGHT * cue[i]
                + KEY_WEIGHT * key[i]
                + TITLE_WEIGHT * title_ratings[i]
                + LOCATION_WEIGHT * location[i]
        })
        .collect()
}

fn stem_set(words: &[String]) -> HashSet<String> {
    words
        .iter()
        .map(|w| w.to_lowercase())
        .filter(|w| !stop_words::is_stop_word(w))
        .map(|w| stemmer::stem(&w))
        .collect()
}

fn heading_terms<'a>(headings: impl Iterator<Item = &'a Sentence>) -> HashSet<String> {
    headings.flat_map(|h| h.content_terms()).collect()
}

fn count_in(terms: &[String], set: &HashSet<String>) -> f64 {
    terms.iter().filter(|t| set.contains(*t)).count() as f64
}

fn cue_ratings(sentences: &[&Sentence], bonus: &HashSet<String>, stigma: &HashSet<String>) -> Vec<f64> {
    sentences
        .iter()
        .map(|s| {
            let terms = s.content_terms();
            count_in(&terms, bonus) - count_in(&terms, stigma)
        })
        .collect()
}

fn key_ratings(sentences: &[&Sentence]) -> Vec<f64> {
    let mut frequencies: HashMap<String, usize> = HashMap::new();
    for sentence in sentences {
        for term in sentence.content_terms() {
            *frequencies.entry(term).or_default() += 1;
        }
    }
    let max = frequencies.values().copied().max().unwrap_or(0) as f64;
    let keys: HashSet<String> = frequencies
        .into_iter()
        .filter(|(_, count)| *count as f64 >= max * KEY_FREQUENCY_RATIO)
        .map(|(term, _)| term)
        .collect();
    sentences
        .iter()
        .map(|s| count_in(&s.content_terms(), &keys))
        .collect()
}

/// Heading overlap within the paragraph plus a point each for sitting in the
/// first or last paragraph and at the start or end of a paragraph. Ratings
/// come out in the same order as `Document::sentences`.
fn location_ratings(document: &Document) -> Vec<f64> {
    let paragraph_count = document.paragraphs.len();
    let mut ratings = Vec::new();

    for (p, paragraph) in document.paragraphs.iter().enumerate() {
        let headings = heading_terms(paragraph.headings());
        let body: Vec<&Sentence> = paragraph.body().collect();
        for (s, sentence) in body.iter().enumerate() {
            let mut rating = count_in(&sentence.content_terms(), &headings);
            if p == 0 {
                rating += 1.0;
            } else if p + 1 == paragraph_count {
                rating += 1.0;
            }
            if s == 0 {
                rating += 1.0;
            } else if s + 1 == body.len() {
                rating += 1.0;
            }
            ratings.push(rating);
        }
    }
    ratings
}
