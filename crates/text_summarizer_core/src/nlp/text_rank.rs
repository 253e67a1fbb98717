//! TextRank: PageRank over sentences weighted by normalized word overlap.

use super::{power_iteration, Sentence};
use std::collections::HashSet;

const DAMPING: f64 = 0.85;
const EPSILON: f64 = 1e-4;

pub(crate) fn rate(sentences: &[&Sentence]) -> Vec<f64> {
    let n = sentences.len();
    let term_sets: Vec<HashSet<String>> = sentences
        .iter()
        .map(|s| s.content_terms().into_iter().collect())
        .collect();

    let mut weights = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let similarity = overlap(&term_sets[i], &term_sets[j]);
            weights[i][j] = similarity;
            weights[j][i] = similarity;
        }
    }

    for row in weights.iter_mut() {
        let total: f64 = row.iter().sum();
        if total > 0.0 {
            row.iter_mut().for_each(|w| *w /= total);
        }
    }

    power_iteration(&weights, DAMPING, EPSILON)
}

/// Shared terms divided by the log lengths of both sentences.
fn overlap(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let common = a.intersection(b).count() as f64;
    if common == 0.0 {
        return 0.0;
    }
    let normalizer = (a.len() as f64).ln() + (b.len() as f64).ln();
    if normalizer > 0.0 {
        common / normalizer
    } else {
        // Two single-term sentences with the same term.
        1.0
    }
}
