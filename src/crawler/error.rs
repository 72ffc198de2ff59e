use std::time::Duration;

/// Failure of a single page fetch. Never fatal to a crawl session.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP Error Status Code = {0}")]
    HttpStatus(u16),

    #[error(transparent)]
    Request(#[from] reqwest::Error),

    #[error("{0}")]
    Parse(String),
}

impl FetchError {
    /// Human-readable line for the error sink, naming the offending page.
    pub fn describe(&self, url: &str) -> String {
        match self {
            FetchError::Parse(_) => format!("Error parsing {}: {}", url, self),
            _ => format!("Error fetching {}: {}", url, self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_names_the_url() {
        let message = FetchError::HttpStatus(503).describe("https://example.com/a");
        assert_eq!(
            message,
            "Error fetching https://example.com/a: HTTP Error Status Code = 503"
        );
    }

    #[test]
    fn test_describe_parse_error() {
        let message = FetchError::Parse("bad selector".to_string()).describe("https://example.com/");
        assert_eq!(message, "Error parsing https://example.com/: bad selector");
    }
}
