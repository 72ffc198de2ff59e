use url::Url;

/// Canonical form of a URL: surrounding whitespace trimmed, fragment removed,
/// scheme/authority/path/query kept. Input that does not parse is returned
/// with only the textual fragment stripped, and fails `is_valid` later.
pub fn normalize(url: &str) -> String {
    let trimmed = url.trim();
    match Url::parse(trimmed) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => {
            let without_fragment = match trimmed.find('#') {
                Some(index) => &trimmed[..index],
                None => trimmed,
            };
            without_fragment.trim().to_string()
        }
    }
}

/// True iff the URL parses with a non-empty scheme and a non-empty host.
pub fn is_valid(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => {
            !parsed.scheme().is_empty() && parsed.host_str().is_some_and(|host| !host.is_empty())
        }
        Err(_) => false,
    }
}

/// Resolves a possibly-relative reference against `base`.
/// An absolute `relative` wins over the base; when the base itself cannot be
/// parsed the reference is returned untouched.
pub fn resolve(base: &str, relative: &str) -> String {
    let relative = relative.trim();
    match Url::parse(base.trim()).and_then(|base_url| base_url.join(relative)) {
        Ok(joined) => joined.to_string(),
        Err(_) => relative.to_string(),
    }
}

/// Literal string prefix test. Not path-segment aware:
/// `https://x.com/a` matches `https://x.com/ab` as well.
pub fn matches_prefix(url: &str, prefix: &str) -> bool {
    url.starts_with(prefix)
}
