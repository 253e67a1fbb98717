//! Sentence and word tokenization for English prose.

use regex::Regex;
use std::sync::OnceLock;

/// Lowercased tokens that end with a period without ending a sentence.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "inc", "ltd", "co", "corp",
    "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec", "no",
    "fig", "e.g", "i.e", "a.m", "p.m", "u.s", "u.k", "approx", "gen", "gov", "sen", "rep",
];

fn word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"[\p{L}\p{N}]+(?:['’][\p{L}]+)*").expect("word pattern is valid")
    })
}

/// Splits running text into sentences, keeping terminal punctuation.
pub fn split_sentences(text: &str) -> Vec<String> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let chars: Vec<char> = normalized.chars().collect();
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        current.push(c);

        if matches!(c, '.' | '!' | '?') {
            // Swallow runs like "?!" or "..." and any closing quotes or brackets.
            while i + 1 < chars.len() && matches!(chars[i + 1], '.' | '!' | '?' | '"' | '\'' | ')' | ']' | '”' | '’') {
                i += 1;
                current.push(chars[i]);
            }
            let at_boundary = i + 1 >= chars.len() || chars[i + 1] == ' ';
            if at_boundary && !(c == '.' && ends_with_abbreviation(&current)) {
                push_sentence(&mut sentences, &current);
                current.clear();
            }
        }
        i += 1;
    }
    push_sentence(&mut sentences, &current);
    sentences
}

fn push_sentence(sentences: &mut Vec<String>, candidate: &str) {
    let trimmed = candidate.trim();
    if trimmed.chars().any(char::is_alphanumeric) {
        sentences.push(trimmed.to_string());
    }
}

fn ends_with_abbreviation(current: &str) -> bool {
    let last = current
        .trim_end_matches(|c: char| matches!(c, '.' | '"' | '\'' | ')' | ']' | '”' | '’'))
        .rsplit(' ')
        .next()
        .unwrap_or_default()
        .trim_start_matches(|c: char| matches!(c, '"' | '\'' | '(' | '[' | '“' | '‘'));
    if last.is_empty() {
        return false;
    }
    // Single-letter initials such as "J. R. R. Tolkien".
    let mut letters = last.chars();
    if let (Some(first), None) = (letters.next(), letters.next()) {
        if first.is_uppercase() {
            return true;
        }
    }
    ABBREVIATIONS.contains(&last.to_lowercase().as_str())
}

/// Lowercased word tokens. Pure numbers are dropped.
pub fn words(text: &str) -> Vec<String> {
    word_pattern()
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|w| w.chars().any(char::is_alphabetic))
        .collect()
}
