use url::Url;

/// Extracts the authority from a URL
///
/// The authority is the lowercase host plus the port when one is explicitly
/// present. The port matters: two servers on the same host but different
/// ports are different crawl targets.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use gleaner::url::extract_authority;
///
/// let url = Url::parse("https://Example.COM/path").unwrap();
/// assert_eq!(extract_authority(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:4545/").unwrap();
/// assert_eq!(extract_authority(&url), Some("127.0.0.1:4545".to_string()));
/// ```
pub fn extract_authority(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}
