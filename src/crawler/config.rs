use std::time::Duration;

/// Timeout for a single page fetch in seconds. Not part of the crawl parameters.
pub const FETCH_TIMEOUT_SEC: u64 = 10;

/// User agent sent when the caller does not supply one
pub const DEFAULT_USER_AGENT: &str = "Crawler Toolbox/1.0 (+https://github.com/crawler-toolbox)";

pub const DEFAULT_MAX_DEPTH: usize = 2;
pub const DEFAULT_MAX_PAGES: usize = 100;
pub const DEFAULT_REQUEST_DELAY_SEC: f64 = 1.0;

/// Immutable configuration of one crawl invocation
#[derive(Debug, Clone)]
pub struct CrawlParameters {
    pub seed_url: String,
    /// Literal prefix discovered links must start with. Empty or unset falls
    /// back to the normalized seed.
    pub url_prefix: Option<String>,
    pub max_depth: usize,
    /// Budget of pages fetched, always at least 1
    pub max_pages: usize,
    pub request_delay: Duration,
    pub user_agent: Option<String>,
}

impl CrawlParameters {
    pub fn new(seed_url: impl Into<String>) -> Self {
        Self {
            seed_url: seed_url.into(),
            url_prefix: None,
            max_depth: DEFAULT_MAX_DEPTH,
            max_pages: DEFAULT_MAX_PAGES,
            request_delay: Duration::from_secs_f64(DEFAULT_REQUEST_DELAY_SEC),
            user_agent: None,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = Some(prefix.into());
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Negative, NaN and infinite delays disable rate limiting. Delays too
    /// large for a `Duration` saturate to `Duration::MAX`.
    pub fn with_request_delay(mut self, seconds: f64) -> Self {
        self.request_delay = if seconds.is_finite() && seconds > 0.0 {
            Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        };
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Prefix filter for a session whose seed normalized to `normalized_seed`
    pub fn prefix_for(&self, normalized_seed: &str) -> String {
        match self.url_prefix.as_deref().map(str::trim) {
            Some(prefix) if !prefix.is_empty() => prefix.to_string(),
            _ => normalized_seed.to_string(),
        }
    }

    pub fn effective_user_agent(&self) -> &str {
        match self.user_agent.as_deref() {
            Some(agent) if !agent.trim().is_empty() => agent,
            _ => DEFAULT_USER_AGENT,
        }
    }
}
