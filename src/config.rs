use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::crawler::CrawlParameters;

/// Log levels as defined in log2 crate
#[derive(Debug, Serialize, Deserialize, Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Receives all program arguments; `CrawlParameters` describes only the crawl
#[derive(Parser, Debug, Serialize, Deserialize)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// URL to start crawling from
    #[arg(short, long)]
    pub start_url: String,
    /// Only links starting with this text are collected (defaults to the start URL)
    #[arg(short, long)]
    pub prefix: Option<String>,
    /// Maximum depth to crawl
    #[arg(long, default_value = "2")]
    pub max_depth: usize,
    /// Maximum number of pages to fetch
    #[arg(long, default_value = "100")]
    pub max_pages: usize,
    /// Delay between requests in seconds
    #[arg(short, long, default_value = "1.0")]
    pub request_delay: f64,
    /// User agent sent with every request
    #[arg(short, long)]
    pub user_agent: Option<String>,
    /// Write the found links to this file
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", value_enum)]
    pub log_level: LogLevel,
}

impl Config {
    pub fn new() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.start_url.trim().is_empty() {
            anyhow::bail!("start_url must not be empty");
        }
        if self.max_pages == 0 {
            anyhow::bail!("max_pages must be greater than 0");
        }
        if !self.request_delay.is_finite() || self.request_delay < 0.0 {
            anyhow::bail!("request_delay must be a non-negative number of seconds");
        }
        Ok(())
    }

    pub fn crawl_parameters(&self) -> CrawlParameters {
        let mut params = CrawlParameters::new(self.start_url.clone())
            .with_max_depth(self.max_depth)
            .with_max_pages(self.max_pages)
            .with_request_delay(self.request_delay);
        if let Some(prefix) = &self.prefix {
            params = params.with_prefix(prefix.clone());
        }
        if let Some(agent) = &self.user_agent {
            params = params.with_user_agent(agent.clone());
        }
        params
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        write!(f, "{}", s)
    }
}
