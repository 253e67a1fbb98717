//! LexRank: centrality in a graph of sentences linked by TF-IDF cosine similarity.

use super::{power_iteration, Sentence};
use std::collections::HashMap;

const THRESHOLD: f64 = 0.1;
const EPSILON: f64 = 1e-4;

pub(crate) fn rate(sentences: &[&Sentence]) -> Vec<f64> {
    let n = sentences.len();
    let term_frequencies: Vec<HashMap<String, f64>> =
        sentences.iter().map(|s| term_frequency(s)).collect();
    let idf = inverse_document_frequency(&term_frequencies);

    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in i..n {
            let similarity = cosine(&term_frequencies[i], &term_frequencies[j], &idf);
            if similarity > THRESHOLD {
                matrix[i][j] = 1.0;
                matrix[j][i] = 1.0;
            }
        }
    }

    for row in matrix.iter_mut() {
        let degree: f64 = row.iter().sum();
        if degree > 0.0 {
            row.iter_mut().for_each(|w| *w /= degree);
        } else {
            // A sentence without terms links to nothing; spread its weight evenly.
            row.iter_mut().for_each(|w| *w = 1.0 / n as f64);
        }
    }

    power_iteration(&matrix, 1.0, EPSILON)
}

/// Term counts scaled by the most frequent term of the sentence.
fn term_frequency(sentence: &Sentence) -> HashMap<String, f64> {
    let mut counts: HashMap<String, f64> = HashMap::new();
    for term in sentence.content_terms() {
        *counts.entry(term).or_default() += 1.0;
    }
    let max = counts.values().copied().fold(0.0, f64::max);
    if max > 0.0 {
        counts.values_mut().for_each(|v| *v /= max);
    }
    counts
}

fn inverse_document_frequency(term_frequencies: &[HashMap<String, f64>]) -> HashMap<String, f64> {
    let n = term_frequencies.len() as f64;
    let mut document_frequency: HashMap<&str, f64> = HashMap::new();
    for tf in term_frequencies {
        for term in tf.keys() {
            *document_frequency.entry(term.as_str()).or_default() += 1.0;
        }
    }
    document_frequency
        .into_iter()
        .map(|(term, df)| (term.to_string(), ((1.0 + n) / (1.0 + df)).ln() + 1.0))
        .collect()
}

fn cosine(a: &HashMap<String, f64>, b: &HashMap<String, f64>, idf: &HashMap<String, f64>) -> f64 {
    let weight = |term: &str| idf.get(term).copied().unwrap_or(0.0);
    let numerator: f64 = a
        .iter()
        .filter_map(|(term, x)| b.get(term).map(|y| x * y * weight(term).powi(2)))
        .sum();
    let norm = |v: &HashMap<String, f64>| -> f64 {
        v.iter().map(|(term, x)| (x * weight(term)).powi(2)).sum::<f64>().sqrt()
    };
    let denominator = norm(a) * norm(b);
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_sentences_have_cosine_one() {
        let s = Sentence::new("Borrow checker rules.", false);
        let tf = term_frequency(&s);
        let idf = inverse_document_frequency(&[tf.clone(), tf.clone()]);
        assert!((cosine(&tf, &tf, &idf) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ranks_form_a_distribution() {
        let a = Sentence::new("Rust guarantees memory safety.", false);
        let b = Sentence::new("Memory safety matters in Rust.", false);
        let c = Sentence::new("Bananas are yellow.", false);
        let ranks = rate(&[&a, &b, &c]);
        assert!((ranks.iter().sum::<f64>() - 1.0).abs() < 1e-6);
    }
}
