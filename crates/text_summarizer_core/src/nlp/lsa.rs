//! Latent semantic analysis.
//!
//! Sentences are columns of a sparse term matrix `A` with smoothed term
//! frequencies. The top eigenpairs of the sentence Gram matrix `AᵀA` give the
//! latent topics (eigenvalues are the squared singular values of `A`); a
//! sentence is ranked by the length of its vector in that topic space.
//!
//! `AᵀA` is never formed: each power step multiplies through the sparse `A`,
//! and later topics are found by projecting out the earlier ones. A step costs
//! one pass over the matrix entries plus one dot product per topic found.

use super::Sentence;
use std::collections::HashMap;

const MIN_DIMENSIONS: usize = 3;
const SMOOTHING: f64 = 0.4;
const MAX_ITERATIONS: usize = 100;
/// Power iteration stops once the eigenvalue estimate moves by less than this fraction.
const RELATIVE_TOLERANCE: f64 = 1e-6;
const TOLERANCE: f64 = 1e-10;

/// `topics` is the requested summary length; at least [`MIN_DIMENSIONS`]
/// topics are kept when the document has that many sentences.
pub(crate) fn rate(sentences: &[&Sentence], topics: usize) -> Vec<f64> {
    let n = sentences.len();
    let matrix = TermMatrix::new(sentences);
    if matrix.is_empty() {
        return vec![0.0; n];
    }

    let dimensions = topics.max(MIN_DIMENSIONS).min(n);
    let mut found: Vec<Vec<f64>> = Vec::with_capacity(dimensions);
    let mut ranks = vec![0.0; n];
    for _ in 0..dimensions {
        let Some((eigenvalue, vector)) = dominant_eigenpair(&matrix, &found) else {
            break;
        };
        for (rank, component) in ranks.iter_mut().zip(&vector) {
            *rank += eigenvalue * component * component;
        }
        found.push(vector);
    }

    ranks.into_iter().map(f64::sqrt).collect()
}

/// Column-sparse term matrix: one `(term index, weight)` list per sentence.
struct TermMatrix {
    columns: Vec<Vec<(usize, f64)>>,
    terms: usize,
}

impl TermMatrix {
    fn new(sentences: &[&Sentence]) -> Self {
        let mut index: HashMap<String, usize> = HashMap::new();
        let columns = sentences
            .iter()
            .map(|sentence| {
                let mut counts: HashMap<usize, f64> = HashMap::new();
                for term in sentence.content_terms() {
                    let next = index.len();
                    let id = *index.entry(term).or_insert(next);
                    *counts.entry(id).or_default() += 1.0;
                }
                let max = counts.values().copied().fold(0.0, f64::max);
                let mut column: Vec<(usize, f64)> = counts
                    .into_iter()
                    .map(|(id, count)| (id, SMOOTHING + (1.0 - SMOOTHING) * (count / max)))
                    .collect();
                column.sort_unstable_by_key(|&(id, _)| id);
                column
            })
            .collect();
        Self { columns, terms: index.len() }
    }

    fn is_empty(&self) -> bool {
        self.columns.iter().all(Vec::is_empty)
    }

    /// `A · v`, one entry per term.
    fn times(&self, vector: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; self.terms];
        for (column, &weight) in self.columns.iter().zip(vector) {
            for &(term, value) in column {
                out[term] += value * weight;
            }
        }
        out
    }

    /// `Aᵀ · w`, one entry per sentence.
    fn transpose_times(&self, vector: &[f64]) -> Vec<f64> {
        self.columns
            .iter()
            .map(|column| column.iter().map(|&(term, value)| value * vector[term]).sum())
            .collect()
    }
}

/// Power iteration on `AᵀA` restricted to the complement of the `found` topics,
/// which must be orthonormal.
fn dominant_eigenpair(matrix: &TermMatrix, found: &[Vec<f64>]) -> Option<(f64, Vec<f64>)> {
    let n = matrix.columns.len();
    // A slightly uneven start avoids being orthogonal to the dominant vector.
    let mut vector: Vec<f64> = (0..n).map(|i| 1.0 + i as f64 * 1e-3).collect();
    project_out(&mut vector, found);
    normalize(&mut vector)?;

    let mut eigenvalue = 0.0;
    for _ in 0..MAX_ITERATIONS {
        let projected = matrix.times(&vector);
        // Rayleigh quotient vᵀAᵀAv for the unit vector v.
        let estimate: f64 = projected.iter().map(|x| x * x).sum();
        let mut next = matrix.transpose_times(&projected);
        project_out(&mut next, found);
        normalize(&mut next)?;
        vector = next;

        let converged = (estimate - eigenvalue).abs() <= RELATIVE_TOLERANCE * estimate;
        eigenvalue = estimate;
        if converged {
            break;
        }
    }

    (eigenvalue > TOLERANCE).then_some((eigenvalue, vector))
}

/// Removes the components along each of the orthonormal `basis` vectors.
fn project_out(vector: &mut [f64], basis: &[Vec<f64>]) {
    for direction in basis {
        let overlap: f64 = vector.iter().zip(direction).map(|(a, b)| a * b).sum();
        for (x, d) in vector.iter_mut().zip(direction) {
            *x -= overlap * d;
        }
    }
}

/// Scales to unit length and returns the previous length.
fn normalize(vector: &mut [f64]) -> Option<f64> {
    let norm = vector.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm <= TOLERANCE {
        return None;
    }
    vector.iter_mut().for_each(|x| *x /= norm);
    Some(norm)
}
