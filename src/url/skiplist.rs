use url::Url;

/// Checks a URL against the configured skip list
///
/// A URL is skipped when its string form contains any of the patterns,
/// case-insensitively. This is a plain substring check, used to keep
/// known-noisy URLs (vendor script paths and the like) out of the crawl.
pub fn matches_skip_list(url: &Url, patterns: &[String]) -> bool {
    if patterns.is_empty() {
        return false;
    }

    let lowered = url.as_str().to_lowercase();
    patterns
        .iter()
        .any(|pattern| lowered.contains(&pattern.to_lowercase()))
}
