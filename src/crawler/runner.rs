use std::collections::HashSet;
use std::sync::Arc;
use anyhow::Result;
use log2::*;
use tokio::task::JoinHandle;
use tokio::time::Duration;

use super::config::{CrawlParameters, FETCH_TIMEOUT_SEC};
use super::control::{CrawlControl, CrawlerStatus};
use super::reporter::{NullReporter, Reporter};
use super::scrape::{FetchOptions, HttpLinkFetcher, PageLinkFetcher};
use super::state::CrawlSession;
use super::url_utils::{is_valid, matches_prefix, normalize};

/// Breadth-first crawl controller. Holds only collaborators; every call to
/// `crawl`/`start` gets its own session state.
#[derive(Clone)]
pub struct Crawler {
    fetcher: Arc<dyn PageLinkFetcher>,
    reporter: Arc<dyn Reporter>,
}

impl Crawler {
    pub fn new(fetcher: Arc<dyn PageLinkFetcher>) -> Self {
        Self {
            fetcher,
            reporter: Arc::new(NullReporter),
        }
    }

    /// Crawler fetching over HTTP with a default `reqwest` client
    pub fn http() -> Self {
        Self::new(Arc::new(HttpLinkFetcher::new()))
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Runs a crawl to completion in the current task.
    pub async fn crawl(&self, params: &CrawlParameters) -> Vec<String> {
        self.crawl_with(params, &CrawlControl::new()).await
    }

    /// Runs a crawl in the current task, steered by a caller-owned control.
    pub async fn crawl_with(&self, params: &CrawlParameters, control: &CrawlControl) -> Vec<String> {
        control.begin();
        self.run_session(params, control).await
    }

    /// Spawns the crawl onto its own task and returns a handle to steer it.
    pub fn start(&self, params: CrawlParameters) -> CrawlHandle {
        let control = CrawlControl::new();
        control.begin();

        let crawler = self.clone();
        let worker_control = control.clone();
        let task = tokio::spawn(async move { crawler.run_session(&params, &worker_control).await });

        CrawlHandle {
            remote: CrawlRemote {
                control,
                reporter: Arc::clone(&self.reporter),
            },
            task,
        }
    }

    async fn run_session(&self, params: &CrawlParameters, control: &CrawlControl) -> Vec<String> {
        let seed = normalize(&params.seed_url);
        if !is_valid(&seed) {
            self.reporter
                .error(&format!("Invalid start URL provided: {}", params.seed_url));
            control.finish();
            return Vec::new();
        }

        let prefix = params.prefix_for(&seed);
        let options = FetchOptions {
            timeout: Duration::from_secs(FETCH_TIMEOUT_SEC),
            user_agent: params.effective_user_agent().to_string(),
        };

        self.reporter.progress(&format!("Starting crawl from: {}", seed));
        self.reporter.progress(&format!("URL prefix filter: {}", prefix));
        info!(
            "Crawl started: seed={} max_depth={} max_pages={} delay={:?}",
            seed, params.max_depth, params.max_pages, params.request_delay
        );

        let mut session = CrawlSession::new(seed);

        while session.has_pending() && control.is_running() && session.pages_crawled() < params.max_pages {
            control.wait_while_paused().await;
            if !control.is_running() {
                break;
            }

            let Some(entry) = session.next_entry(params.max_depth) else {
                break;
            };

            let page_number = session.mark_visited(&entry.url);
            self.reporter.progress(&format!(
                "Crawling [{}/{}] depth {}: {}",
                page_number, params.max_pages, entry.depth, entry.url
            ));

            let links = match self.fetcher.fetch_links(&entry.url, &options).await {
                Ok(links) => links,
                Err(e) => {
                    self.reporter.error(&e.describe(&entry.url));
                    HashSet::new()
                }
            };

            let mut links: Vec<String> = links.into_iter().collect();
            links.sort();

            for link in links {
                let link = normalize(&link);
                if !is_valid(&link) {
                    debug!("Discarding invalid link {} from {}", link, entry.url);
                    continue;
                }
                if !matches_prefix(&link, &prefix) {
                    debug!("Link {} does not match prefix {}", link, prefix);
                    continue;
                }

                session.record_found(link.clone());
                if entry.depth < params.max_depth && !session.is_visited(&link) {
                    session.enqueue(link, entry.depth + 1);
                }
            }

            let more_to_do = session.has_pending() && session.pages_crawled() < params.max_pages;
            if !params.request_delay.is_zero() && more_to_do && control.is_running() {
                control.sleep_unless_stopped(params.request_delay).await;
            }
        }

        let status = control.finish();
        match status {
            CrawlerStatus::Stopped => self.reporter.progress("Crawl stopped by user."),
            _ => self.reporter.progress(&format!(
                "Crawl completed. Found {} unique links.",
                session.found_count()
            )),
        }
        info!(
            "Crawl {}: {} pages fetched, {} links found, {} left in frontier",
            status,
            session.pages_crawled(),
            session.found_count(),
            session.pending()
        );

        session.into_sorted_links()
    }
}

/// Steers a running crawl from any task and reports each change of state
/// to the crawl's sink. Cheap to clone.
#[derive(Clone)]
pub struct CrawlRemote {
    control: CrawlControl,
    reporter: Arc<dyn Reporter>,
}

impl CrawlRemote {
    /// Cooperative: an in-flight fetch finishes, the loop exits at its next check.
    /// Returns false if the crawl was no longer running.
    pub fn stop(&self) -> bool {
        let stopped = self.control.stop();
        if stopped {
            self.reporter.progress("Stopping crawl...");
        }
        stopped
    }

    pub fn pause(&self) -> bool {
        let paused = self.control.pause();
        if paused {
            self.reporter.progress("Crawl paused...");
        }
        paused
    }

    pub fn resume(&self) -> bool {
        let resumed = self.control.resume();
        if resumed {
            self.reporter.progress("Crawl resumed...");
        }
        resumed
    }

    pub fn status(&self) -> CrawlerStatus {
        self.control.status()
    }
}

/// A crawl running on its own tokio task
pub struct CrawlHandle {
    remote: CrawlRemote,
    task: JoinHandle<Vec<String>>,
}

impl CrawlHandle {
    pub fn stop(&self) -> bool {
        self.remote.stop()
    }

    pub fn pause(&self) -> bool {
        self.remote.pause()
    }

    pub fn resume(&self) -> bool {
        self.remote.resume()
    }

    pub fn status(&self) -> CrawlerStatus {
        self.remote.status()
    }

    /// A clone that stays usable after `join` consumes the handle
    pub fn remote(&self) -> CrawlRemote {
        self.remote.clone()
    }

    pub fn control(&self) -> CrawlControl {
        self.remote.control.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the worker and returns the sorted found links.
    pub async fn join(self) -> Result<Vec<String>> {
        Ok(self.task.await?)
    }
}
