use log2::debug;
use std::collections::{BTreeSet, HashSet, VecDeque};

/// A not-yet-fetched URL and its distance from the seed (seed = 0)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: String,
    pub depth: usize,
}

/// FIFO work queue driving the breadth-first traversal.
/// Duplicates are allowed here; the session discards them at dequeue.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, url: String, depth: usize) {
        self.queue.push_back(FrontierEntry { url, depth });
    }

    pub fn dequeue_next(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Mutable state of one crawl invocation. Created fresh per crawl and
/// consumed into the result when the loop exits.
#[derive(Debug)]
pub struct CrawlSession {
    frontier: Frontier,
    /// URLs already handed to the fetcher
    visited: HashSet<String>,
    /// Prefix-matching URLs discovered so far, kept sorted
    found_links: BTreeSet<String>,
    pages_crawled: usize,
}

impl CrawlSession {
    pub fn new(seed: String) -> Self {
        let mut frontier = Frontier::new();
        frontier.enqueue(seed, 0);

        Self {
            frontier,
            visited: HashSet::new(),
            found_links: BTreeSet::new(),
            pages_crawled: 0,
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.frontier.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.frontier.len()
    }

    /// Pops the next entry that still needs fetching. Entries already
    /// visited or deeper than `max_depth` are discarded without touching the
    /// page budget. Returns `None` once the frontier is drained.
    pub fn next_entry(&mut self, max_depth: usize) -> Option<FrontierEntry> {
        while let Some(entry) = self.frontier.dequeue_next() {
            if self.visited.contains(&entry.url) {
                debug!("Skipping already visited {}", entry.url);
                continue;
            }
            if entry.depth > max_depth {
                debug!("Skipping {} beyond max depth {}", entry.url, max_depth);
                continue;
            }
            return Some(entry);
        }
        None
    }

    /// Marks the URL visited and counts it against the page budget.
    pub fn mark_visited(&mut self, url: &str) -> usize {
        self.visited.insert(url.to_string());
        self.pages_crawled += 1;
        self.pages_crawled
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn pages_crawled(&self) -> usize {
        self.pages_crawled
    }

    pub fn record_found(&mut self, url: String) {
        self.found_links.insert(url);
    }

    pub fn enqueue(&mut self, url: String, depth: usize) {
        self.frontier.enqueue(url, depth);
    }

    pub fn found_count(&self) -> usize {
        self.found_links.len()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Found links in lexicographic order
    pub fn into_sorted_links(self) -> Vec<String> {
        self.found_links.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frontier_is_fifo() {
        let mut frontier = Frontier::new();
        frontier.enqueue("a".to_string(), 0);
        frontier.enqueue("b".to_string(), 1);
        frontier.enqueue("c".to_string(), 1);

        assert_eq!(frontier.len(), 3);
        assert_eq!(frontier.dequeue_next().map(|e| e.url), Some("a".to_string()));
        assert_eq!(frontier.dequeue_next().map(|e| e.url), Some("b".to_string()));
        assert_eq!(frontier.dequeue_next().map(|e| e.url), Some("c".to_string()));
        assert!(frontier.dequeue_next().is_none());
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_session_seeded_at_depth_zero() {
        let mut session = CrawlSession::new("https://example.com/".to_string());
        assert_eq!(
            session.next_entry(2),
            Some(FrontierEntry {
                url: "https://example.com/".to_string(),
                depth: 0
            })
        );
        assert!(!session.has_pending());
    }

    #[test]
    fn test_next_entry_skips_visited_duplicates() {
        let mut session = CrawlSession::new("https://example.com/".to_string());
        let seed = session.next_entry(2).unwrap();
        session.mark_visited(&seed.url);

        session.enqueue("https://example.com/".to_string(), 1);
        session.enqueue("https://example.com/a".to_string(), 1);
        session.enqueue("https://example.com/a".to_string(), 1);

        let first = session.next_entry(2).unwrap();
        assert_eq!(first.url, "https://example.com/a");
        session.mark_visited(&first.url);

        assert!(session.next_entry(2).is_none());
        assert_eq!(session.pages_crawled(), 2);
        assert_eq!(session.visited_count(), 2);
    }

    #[test]
    fn test_next_entry_skips_entries_beyond_max_depth() {
        let mut session = CrawlSession::new("https://example.com/".to_string());
        session.next_entry(1);
        session.enqueue("https://example.com/deep".to_string(), 2);
        session.enqueue("https://example.com/ok".to_string(), 1);

        assert_eq!(session.next_entry(1).map(|e| e.url), Some("https://example.com/ok".to_string()));
        assert_eq!(session.pages_crawled(), 0);
    }

    #[test]
    fn test_found_links_sorted_and_deduplicated() {
        let mut session = CrawlSession::new("https://example.com/".to_string());
        session.record_found("https://example.com/b".to_string());
        session.record_found("https://example.com/a".to_string());
        session.record_found("https://example.com/b".to_string());

        assert_eq!(session.found_count(), 2);
        assert_eq!(
            session.into_sorted_links(),
            vec!["https://example.com/a".to_string(), "https://example.com/b".to_string()]
        );
    }
}
