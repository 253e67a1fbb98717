//! A light English suffix stemmer.
//!
//! Covers the inflectional suffixes (plurals, `-ed`, `-ing`, `-y`) and the most
//! common derivational ones. Good enough to merge word forms when comparing
//! sentences; not a linguistic tool.

const DERIVATIONAL: &[(&str, &str)] = &[
    ("ational", "ate"),
    ("tional", "tion"),
    ("ization", "ize"),
    ("iveness", "ive"),
    ("fulness", "ful"),
    ("ousness", "ous"),
    ("biliti", "ble"),
    ("ation", "ate"),
    ("alism", "al"),
    ("aliti", "al"),
    ("iviti", "ive"),
    ("ement", ""),
    ("ness", ""),
    ("ment", ""),
    ("ator", "ate"),
    ("alli", "al"),
    ("ousli", "ous"),
    ("entli", "ent"),
    ("ful", ""),
];

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn has_vowel(s: &str) -> bool {
    s.chars().any(is_vowel)
}

fn ends_with_double_consonant(s: &str) -> bool {
    let mut rev = s.chars().rev();
    match (rev.next(), rev.next()) {
        (Some(a), Some(b)) => a == b && !is_vowel(a) && !matches!(a, 'l' | 's' | 'z'),
        _ => false,
    }
}

/// Reduces a lowercase word to its stem.
pub fn stem(word: &str) -> String {
    if word.chars().count() <= 3 || !word.is_ascii() {
        return word.to_string();
    }
    let mut w = word.trim_end_matches("'s").to_string();

    // Plurals.
    if let Some(base) = w.strip_suffix("sses") {
        w = format!("{base}ss");
    } else if let Some(base) = w.strip_suffix("ies") {
        w = format!("{base}i");
    } else if w.ends_with('s') && !w.ends_with("ss") && !w.ends_with("us") && !w.ends_with("is") {
        w.pop();
    }

    // Past tense and gerunds.
    if let Some(base) = w.strip_suffix("eed") {
        if base.len() > 1 {
            w = format!("{base}ee");
        }
    } else {
        let stripped = w
            .strip_suffix("ing")
            .or_else(|| w.strip_suffix("ed"))
            .filter(|base| base.len() > 1 && has_vowel(base))
            .map(str::to_string);
        if let Some(mut base) = stripped {
            if base.ends_with("at") || base.ends_with("bl") || base.ends_with("iz") {
                base.push('e');
            } else if ends_with_double_consonant(&base) {
                base.pop();
            }
            w = base;
        }
    }

    // Terminal y.
    if w.len() > 2 && w.ends_with('y') && has_vowel(&w[..w.len() - 1]) {
        w.pop();
        w.push('i');
    }

    for (suffix, replacement) in DERIVATIONAL {
        if let Some(base) = w.strip_suffix(suffix) {
            if base.len() >= 3 && has_vowel(base) {
                w = format!("{base}{replacement}");
            }
            break;
        }
    }

    w
}
