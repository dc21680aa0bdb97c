//! HTTP fetcher implementation
//!
//! This module handles page requests for the crawler, including:
//! - Building the HTTP client with the per-request timeout
//! - GET requests for HTML pages
//! - Error classification (transport, status, content type)

use crate::MirrorError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Builds the HTTP client shared by page fetches and resource downloads
///
/// Default headers are used; redirects follow reqwest's default policy.
///
/// # Arguments
///
/// * `timeout` - Upper bound for each individual request
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use sumi_mirror::crawler::build_http_client;
///
/// let client = build_http_client(Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches an HTML page
///
/// # Errors
///
/// | Condition | Error |
/// |-----------|-------|
/// | Transport failure or timeout | `MirrorError::Http` |
/// | Non-2xx status | `MirrorError::Status` |
/// | Content-Type present and not HTML | `MirrorError::NotHtml` |
/// | Body not readable as text | `MirrorError::Http` |
///
/// A missing Content-Type header is accepted.
pub async fn fetch_page(client: &Client, url: &Url) -> Result<String, MirrorError> {
    let response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|source| MirrorError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(MirrorError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if let Some(content_type) = content_type {
        if !is_html(&content_type) {
            return Err(MirrorError::NotHtml {
                url: url.to_string(),
                content_type,
            });
        }
    }

    response.text().await.map_err(|source| MirrorError::Http {
        url: url.to_string(),
        source,
    })
}

fn is_html(content_type: &str) -> bool {
    let lowered = content_type.to_ascii_lowercase();
    lowered.contains("text/html") || lowered.contains("application/xhtml+xml")
}
