//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler: building the
//! client with a proper user agent string, fetching page bodies, and the
//! dedicated binary download path for PDF documents.
//!
//! There is no retry and no redirect handling beyond what the transport
//! does natively; every transport error is reported the same way as a
//! non-success status.

use crate::config::UserAgentConfig;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Result of a page fetch
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page body
    Success {
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value, empty if absent
        content_type: String,
        /// Page body content
        body: String,
    },

    /// Response carried a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Transport failure (connection refused, timeout, body read error)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// The user agent follows the `Name/Version (+ContactUrl; ContactEmail)`
/// convention so site operators can identify and reach the crawler.
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page body with a GET request
///
/// Success means a 2xx response whose body decoded as text. Anything
/// else, HTTP or transport, is a failure the caller treats uniformly.
pub async fn fetch_page(client: &Client, url: &Url) -> FetchResult {
    match client.get(url.clone()).send().await {
        Ok(response) => {
            let status = response.status();
            if !status.is_success() {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                };
            }

            let content_type = response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();

            match response.text().await {
                Ok(body) => FetchResult::Success {
                    status_code: status.as_u16(),
                    content_type,
                    body,
                },
                Err(e) => FetchResult::NetworkError {
                    error: e.to_string(),
                },
            }
        }
        Err(e) => FetchResult::NetworkError {
            error: e.to_string(),
        },
    }
}

/// Downloads raw bytes for a binary document
///
/// This is the dedicated PDF request path; PDF URLs never pass through
/// `fetch_page` or HTML extraction.
pub async fn fetch_binary(client: &Client, url: &Url) -> Result<Vec<u8>, String> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("HTTP {}", status.as_u16()));
    }

    response
        .bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|e| e.to_string())
}
