//! The document model the summarization algorithms operate on.

use super::{stemmer, stop_words, tokenizer};

/// A sentence with its pre-computed word tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct Sentence {
    pub text: String,
    pub words: Vec<String>,
    pub is_heading: bool,
}

impl Sentence {
    pub fn new(text: impl Into<String>, is_heading: bool) -> Self {
        let text = text.into();
        let words = tokenizer::words(&text);
        Self { text, words, is_heading }
    }

    /// Stems of the words that are not stop words.
    pub fn content_terms(&self) -> Vec<String> {
        self.words
            .iter()
            .filter(|w| !stop_words::is_stop_word(w))
            .map(|w| stemmer::stem(w))
            .collect()
    }
}

/// A block of body sentences, optionally preceded by headings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paragraph {
    pub sentences: Vec<Sentence>,
}

impl Paragraph {
    /// Builds a paragraph from heading lines followed by running body text.
    pub fn new(headings: &[String], body: &str) -> Self {
        let sentences = headings
            .iter()
            .filter(|h| !h.trim().is_empty())
            .map(|h| Sentence::new(h.trim(), true))
            .chain(tokenizer::split_sentences(body).into_iter().map(|s| Sentence::new(s, false)))
            .collect();
        Self { sentences }
    }

    pub fn headings(&self) -> impl Iterator<Item = &Sentence> {
        self.sentences.iter().filter(|s| s.is_heading)
    }

    pub fn body(&self) -> impl Iterator<Item = &Sentence> {
        self.sentences.iter().filter(|s| !s.is_heading)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub paragraphs: Vec<Paragraph>,
    /// Words the source marked as important (headings, emphasis).
    pub significant_words: Vec<String>,
    /// Words the source marked as incidental (fine print, citations).
    pub stigma_words: Vec<String>,
}

impl Document {
    /// Treats blank lines as paragraph breaks and lines ending without
    /// punctuation directly before a paragraph as headings.
    pub fn from_plain_text(text: &str) -> Self {
        let mut paragraphs = Vec::new();
        let mut pending_headings = Vec::new();

        for block in text.split("\n\n").map(str::trim).filter(|b| !b.is_empty()) {
            let is_heading = !block.contains('\n')
                && !block.ends_with(|c: char| matches!(c, '.' | '!' | '?' | ':' | ';' | ','))
                && block.split_whitespace().count() <= 12;
            if is_heading {
                pending_headings.push(block.to_string());
            } else {
                paragraphs.push(Paragraph::new(&pending_headings, block));
                pending_headings.clear();
            }
        }
        if !pending_headings.is_empty() {
            paragraphs.push(Paragraph::new(&pending_headings, ""));
        }

        let significant_words = paragraphs
            .iter()
            .flat_map(|p| p.headings())
            .flat_map(|s| s.words.iter().cloned())
            .collect();

        Self { paragraphs, significant_words, stigma_words: Vec::new() }
    }

    /// Body sentences in document order.
    pub fn sentences(&self) -> Vec<&Sentence> {
        self.paragraphs.iter().flat_map(|p| p.body()).collect()
    }

    pub fn headings(&self) -> Vec<&Sentence> {
        self.paragraphs.iter().flat_map(|p| p.headings()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences().is_empty()
    }
}
