use async_trait::async_trait;
use log2::{debug, info};
use reqwest::Client;
use reqwest::header::USER_AGENT;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::time::Duration;

use super::config::{DEFAULT_USER_AGENT, FETCH_TIMEOUT_SEC};
use super::error::FetchError;
use super::url_utils::{is_valid, normalize, resolve};

/// Per-request settings handed to a fetcher by the crawl session
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(FETCH_TIMEOUT_SEC),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Given a normalized URL, returns the normalized absolute URLs of every
/// hyperlink on that page. The crawler never retries a failed call.
#[async_trait]
pub trait PageLinkFetcher: Send + Sync {
    async fn fetch_links(&self, url: &str, options: &FetchOptions) -> Result<HashSet<String>, FetchError>;
}

/// Fetches pages over HTTP(S) and extracts `<a href>` targets
#[derive(Debug, Clone, Default)]
pub struct HttpLinkFetcher {
    client: Client,
}

impl HttpLinkFetcher {
    pub fn new() -> Self {
        Self { client: Client::new() }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageLinkFetcher for HttpLinkFetcher {
    async fn fetch_links(&self, url: &str, options: &FetchOptions) -> Result<HashSet<String>, FetchError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, options.user_agent.as_str())
            .timeout(options.timeout)
            .send()
            .await
            .map_err(|e| timeout_or(e, options.timeout))?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status().as_u16()));
        }

        let html = response.text().await.map_err(|e| timeout_or(e, options.timeout))?;
        let found_urls = extract_links(&html, url)?;

        info!("Found {} urls on page {}", found_urls.len(), url);

        Ok(found_urls)
    }
}

fn timeout_or(error: reqwest::Error, timeout: Duration) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout(timeout)
    } else {
        FetchError::Request(error)
    }
}

/// Collects the normalized, valid absolute targets of all `<a href>`
/// elements in `html`, resolving relative references against `page_url`.
pub fn extract_links(html: &str, page_url: &str) -> Result<HashSet<String>, FetchError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]")
        .map_err(|e| FetchError::Parse(format!("Failed to parse <a> selector: {}", e)))?;

    let mut found_urls = HashSet::new();
    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if href.is_empty() {
            continue;
        }

        let absolute = normalize(&resolve(page_url, href));
        if is_valid(&absolute) {
            found_urls.insert(absolute);
        } else {
            debug!("Skipped invalid link {} on {}", href, page_url);
        }
    }

    Ok(found_urls)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_links_resolves_and_normalizes() -> Result<(), Box<dyn std::error::Error>> {
        let html = r##"
            <html><body>
                <a href="/docs#intro">Docs</a>
                <a href="guide">Guide</a>
                <a href="https://other.com/x">Other</a>
                <a href="  ">Blank</a>
                <a href="mailto:me@example.com">Mail</a>
                <a href="javascript:void(0)">Script</a>
                <a>No href</a>
            </body></html>
        "##;
        let links = extract_links(html, "https://example.com/base/page")?;
        let expected: HashSet<String> = [
            "https://example.com/docs",
            "https://example.com/base/guide",
            "https://other.com/x",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        assert_eq!(links, expected);
        Ok(())
    }

    #[test]
    fn test_extract_links_fragment_only_points_to_page() -> Result<(), Box<dyn std::error::Error>> {
        let links = extract_links(r##"<a href="#top">Top</a>"##, "https://example.com/a")?;
        assert_eq!(links.len(), 1);
        assert!(links.contains("https://example.com/a"));
        Ok(())
    }

    #[test]
    fn test_extract_links_empty_document() -> Result<(), Box<dyn std::error::Error>> {
        assert!(extract_links("", "https://example.com/")?.is_empty());
        Ok(())
    }
}
