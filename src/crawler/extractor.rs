//! Boilerplate-stripping text extraction
//!
//! This module turns a fetched HTML page into the plain text that gets
//! persisted for the downstream retrieval pipeline. Non-content elements
//! are dropped, and when the page declares a `<main>` region only that
//! region's text is kept.

use scraper::{Html, Node, Selector};

/// Elements whose text never counts as page content
const BOILERPLATE_TAGS: &[&str] = &["script", "style", "nav", "header", "footer", "img"];

/// Extracts the primary text content of an HTML page
///
/// Text nodes inside boilerplate elements are dropped. If the document
/// has a `<main>` element, only text inside it is kept; otherwise the
/// whole stripped document is used. Segments are trimmed and joined with
/// newlines, so the output is always valid UTF-8 plain text.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let has_main = Selector::parse("main")
        .ok()
        .map(|sel| document.select(&sel).next().is_some())
        .unwrap_or(false);

    let mut lines: Vec<String> = Vec::new();

    for node in document.root_element().descendants() {
        if let Node::Text(text) = node.value() {
            let mut inside_main = false;
            let mut inside_boilerplate = false;

            for ancestor in node.ancestors() {
                if let Node::Element(element) = ancestor.value() {
                    let name = element.name();
                    if name == "main" {
                        inside_main = true;
                    } else if BOILERPLATE_TAGS.contains(&name) {
                        inside_boilerplate = true;
                    }
                }
            }

            if inside_boilerplate {
                continue;
            }
            if has_main && !inside_main {
                continue;
            }

            let trimmed = text.trim();
            if !trimmed.is_empty() {
                lines.push(trimmed.to_string());
            }
        }
    }

    lines.join("\n")
}
