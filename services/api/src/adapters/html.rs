//! services/api/src/adapters/html.rs
//!
//! Turns a fetched HTML page into the core `Document` model.

use scraper::{ElementRef, Html, Selector};
use text_summarizer_core::nlp::{tokenizer, Document, Paragraph};

const BLOCKS: &str = "h1, h2, h3, h4, h5, h6, p";
const SIGNIFICANT: &str = "h1, h2, h3, h4, h5, h6, b, strong, big, dfn, em";
const STIGMA: &str = "small, cite, sub, sup, s, strike, del";

/// Containers whose text is page chrome rather than article content.
const BOILERPLATE: &[&str] = &["nav", "footer", "aside", "form", "noscript", "script", "style"];

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

fn is_heading(element: &ElementRef<'_>) -> bool {
    matches!(element.value().name(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

fn in_boilerplate(element: &ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| BOILERPLATE.contains(&a.value().name()))
}

/// Text content without script or style bodies, whitespace collapsed.
fn visible_text(element: ElementRef<'_>) -> String {
    let text = element
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let parent = node.parent().and_then(ElementRef::wrap)?;
            (!matches!(parent.value().name(), "script" | "style" | "noscript")).then(|| &**text)
        })
        .collect::<Vec<_>>()
        .join(" ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn words_of(page: &Html, css: &'static str) -> Vec<String> {
    page.select(&selector(css))
        .filter(|e| !in_boilerplate(e))
        .flat_map(|e| tokenizer::words(&visible_text(e)))
        .collect()
}

/// Headings start a new section; each `<p>` becomes a paragraph carrying the
/// headings seen since the previous one.
pub fn parse_document(html: &str) -> Document {
    let page = Html::parse_document(html);
    let mut paragraphs = Vec::new();
    let mut pending_headings: Vec<String> = Vec::new();

    for element in page.select(&selector(BLOCKS)).filter(|e| !in_boilerplate(e)) {
        let text = visible_text(element);
        if text.is_empty() {
            continue;
        }
        if is_heading(&element) {
            pending_headings.push(text);
        } else {
            paragraphs.push(Paragraph::new(&pending_headings, &text));
            pending_headings.clear();
        }
    }

    // Pages without <p> markup: fall back to the whole body as one paragraph.
    if paragraphs.is_empty() {
        if let Some(body) = page.select(&selector("body")).next() {
            let text = visible_text(body);
            if !text.is_empty() {
                paragraphs.push(Paragraph::new(&pending_headings, &text));
            }
        }
    }

    Document {
        paragraphs,
        significant_words: words_of(&page, SIGNIFICANT),
        stigma_words: words_of(&page, STIGMA),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html>
          <head><title>Ignored</title><style>p { color: red; }</style></head>
          <body>
            <nav><p>Home. About. Contact.</p></nav>
            <h1>Fearless Concurrency</h1>
            <p>Rust makes <strong>threads</strong> safe. Data races are compile errors.</p>
            <h2>Channels</h2>
            <p>Channels move values between threads. <small>See the appendix.</small></p>
            <script>var sentences = "not text.";</script>
            <footer><p>Copyright notice.</p></footer>
          </body>
        </html>"#;

    #[test]
    fn paragraphs_carry_their_headings() {
        let doc = parse_document(PAGE);
        assert_eq!(doc.paragraphs.len(), 2);
        assert_eq!(doc.headings()[0].text, "Fearless Concurrency");
        assert_eq!(doc.headings()[1].text, "Channels");
        let texts: Vec<&str> = doc.sentences().iter().map(|s| s.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Rust makes threads safe.",
                "Data races are compile errors.",
                "Channels move values between threads.",
                "See the appendix.",
            ]
        );
    }

    #[test]
    fn emphasis_and_fine_print_feed_the_word_lists() {
        let doc = parse_document(PAGE);
        assert!(doc.significant_words.contains(&"threads".to_string()));
        assert!(doc.significant_words.contains(&"fearless".to_string()));
        assert!(doc.stigma_words.contains(&"appendix".to_string()));
        assert!(!doc.significant_words.contains(&"home".to_string()));
    }

    #[test]
    fn body_text_is_used_when_there_are_no_paragraphs() {
        let doc = parse_document("<html><body><div>Plain text page. Second sentence.</div></body></html>");
        assert_eq!(doc.sentences().len(), 2);
    }

    #[test]
    fn empty_page_gives_empty_document() {
        assert!(parse_document("<html><body></body></html>").is_empty());
    }
}
