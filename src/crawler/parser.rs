//! HTML parser for extracting hyperlinks and metadata
//!
//! This module parses HTML content to extract the page title and the set of
//! links to consider for scheduling. Links are resolved to absolute URLs and
//! deduplicated within the page; cross-page dedup belongs to the ledger.

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// Deduplicated absolute links found on the page, in document order
    pub links: Vec<Url>,
}

/// Parses HTML content and extracts the title and hyperlinks
///
/// # Link Extraction Rules
///
/// **Include:** `<a href="...">` anywhere in the document.
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` links and data URIs
/// - fragment-only links (same-page anchors)
/// - hrefs that fail to resolve against the base URL
/// - non-HTTP(S) URLs after resolution
///
/// Resolved links have their fragment stripped, so `/page` and
/// `/page#section` deduplicate to one entry.
pub fn parse_page(html: &str, base_url: &Url) -> Result<ParsedPage, String> {
    let document = Html::parse_document(html);

    let title = extract_title(&document);
    let links = extract_links(&document, base_url)?;

    Ok(ParsedPage { title, links })
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts all valid links from the HTML document, deduplicated per page
fn extract_links(document: &Html, base_url: &Url) -> Result<Vec<Url>, String> {
    let selector =
        Selector::parse("a[href]").map_err(|e| format!("Invalid selector: {:?}", e))?;

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href") {
            if let Some(absolute) = resolve_link(href, base_url) {
                if seen.insert(absolute.to_string()) {
                    links.push(absolute);
                }
            }
        }
    }

    Ok(links)
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    // Same-page anchors never lead anywhere new
    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(mut absolute) => {
            if absolute.scheme() != "http" && absolute.scheme() != "https" {
                return None;
            }
            absolute.set_fragment(None);
            Some(absolute)
        }
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    fn link_strings(parsed: &ParsedPage) -> Vec<&str> {
        parsed.links.iter().map(|u| u.as_str()).collect()
    }

    #[test]
    fn test_extract_title() {
        let html = r#"<html><head><title>Test Page</title></head><body></body></html>"#;
        let parsed = parse_page(html, &base_url()).unwrap();
        assert_eq!(parsed.title, Some("Test Page".to_string()));
    }

    #[test]
    fn test_extract_title_with_whitespace() {
        let html = r#"<html><head><title>  Test Page  </title></head><body></body></html>"#;
        let parsed = parse_page(html, &base_url()).unwrap();
        assert_eq!(parsed.title, Some("Test Page".to_string()));
    }

    #[test]
    fn test_no_title() {
        let html = r#"<html><head></head><body></body></html>"#;
        let parsed = parse_page(html, &base_url()).unwrap();
        assert_eq!(parsed.title, None);
    }

    #[test]
    fn test_extract_absolute_link() {
        let html = r#"<html><body><a href="https://other.com/page">Link</a></body></html>"#;
        let parsed = parse_page(html, &base_url()).unwrap();
        assert_eq!(link_strings(&parsed), vec!["https://other.com/page"]);
    }

    #[test]
    fn test_extract_relative_link() {
        let html = r#"<html><body><a href="/other">Link</a></body></html>"#;
        let parsed = parse_page(html, &base_url()).unwrap();
        assert_eq!(link_strings(&parsed), vec!["https://example.com/other"]);
    }

    #[test]
    fn test_extract_relative_path_link() {
        let html = r#"<html><body><a href="other">Link</a></body></html>"#;
        let parsed = parse_page(html, &base_url()).unwrap();
        assert_eq!(link_strings(&parsed), vec!["https://example.com/other"]);
    }

    #[test]
    fn test_skip_javascript_link() {
        let html = r#"<html><body><a href="javascript:void(0)">Link</a></body></html>"#;
        let parsed = parse_page(html, &base_url()).unwrap();
        assert!(parsed.links.is_empty());
    }

    #[test]
    fn test_skip_mailto_link() {
        let html = r#"<html><body><a href="mailto:test@example.com">Email</a></body></html>"#;
        let parsed = parse_page(html, &base_url()).unwrap();
        assert!(parsed.links.is_empty());
    }

    #[test]
    fn test_skip_tel_link() {
        let html = r#"<html><body><a href="tel:+1234567890">Call</a></body></html>"#;
        let parsed = parse_page(html, &base_url()).unwrap();
        assert!(parsed.links.is_empty());
    }

    #[test]
    fn test_skip_data_uri() {
        let html = r#"<html><body><a href="data:text/html,<h1>Test</h1>">Data</a></body></html>"#;
        let parsed = parse_page(html, &base_url()).unwrap();
        assert!(parsed.links.is_empty());
    }

    #[test]
    fn test_skip_fragment_only() {
        let html = r##"<html><body><a href="#section">Jump</a></body></html>"##;
        let parsed = parse_page(html, &base_url()).unwrap();
        assert!(parsed.links.is_empty());
    }

    #[test]
    fn test_fragment_stripped_from_resolved_link() {
        let html = r##"<html><body><a href="/docs#intro">Docs</a></body></html>"##;
        let parsed = parse_page(html, &base_url()).unwrap();
        assert_eq!(link_strings(&parsed), vec!["https://example.com/docs"]);
    }

    #[test]
    fn test_repeated_hrefs_collapse_to_one() {
        let html = r##"
            <html>
            <body>
                <a href="/page1">First</a>
                <a href="/page1">Again</a>
                <a href="/page1#section">Same after fragment strip</a>
            </body>
            </html>
        "##;
        let parsed = parse_page(html, &base_url()).unwrap();
        assert_eq!(link_strings(&parsed), vec!["https://example.com/page1"]);
    }

    #[test]
    fn test_multiple_links_in_document_order() {
        let html = r#"
            <html>
            <body>
                <a href="/page1">Link 1</a>
                <a href="/page2">Link 2</a>
                <a href="https://other.com/page3">Link 3</a>
            </body>
            </html>
        "#;
        let parsed = parse_page(html, &base_url()).unwrap();
        assert_eq!(
            link_strings(&parsed),
            vec![
                "https://example.com/page1",
                "https://example.com/page2",
                "https://other.com/page3"
            ]
        );
    }

    #[test]
    fn test_mixed_valid_and_invalid_links() {
        let html = r#"
            <html>
            <body>
                <a href="/valid">Valid</a>
                <a href="javascript:alert('no')">Invalid</a>
                <a href="mailto:test@example.com">Invalid</a>
                <a href="/another-valid">Valid</a>
            </body>
            </html>
        "#;
        let parsed = parse_page(html, &base_url()).unwrap();
        assert_eq!(parsed.links.len(), 2);
    }
}
