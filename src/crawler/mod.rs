pub mod config;
pub mod control;
pub mod error;
pub mod reporter;
pub mod runner;
pub mod scrape;
pub mod state;
pub mod url_utils;


pub use config::{CrawlParameters, DEFAULT_USER_AGENT, FETCH_TIMEOUT_SEC};
pub use control::{CrawlControl, CrawlerStatus};
pub use error::FetchError;
pub use reporter::{FnReporter, LogReporter, NullReporter, Reporter};
pub use runner::{CrawlHandle, CrawlRemote, Crawler};
pub use scrape::{FetchOptions, HttpLinkFetcher, PageLinkFetcher, extract_links};
pub use state::{CrawlSession, Frontier, FrontierEntry};
pub use url_utils::{is_valid, matches_prefix, normalize, resolve};
