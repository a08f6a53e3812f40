use serde::Deserialize;

/// Main configuration structure for Gleaner
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// The URL the crawl starts from; its host scopes the whole crawl
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Delay applied after a page's subtree completes (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Cap on simultaneously in-flight HTTP requests
    #[serde(rename = "max-concurrent-fetches")]
    pub max_concurrent_fetches: u32,

    /// URLs containing any of these substrings are never scheduled
    #[serde(rename = "skip-substrings", default)]
    pub skip_substrings: Vec<String>,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one text or PDF file per crawled page
    #[serde(rename = "data-dir")]
    pub data_dir: String,

    /// Path to the JSON visitation ledger
    #[serde(rename = "status-file")]
    pub status_file: String,

    /// Path to the append-only out-of-domain link log
    #[serde(rename = "external-links-file")]
    pub external_links_file: String,
}
