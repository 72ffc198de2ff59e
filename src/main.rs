use log2::*;
use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;

use sublink_crawler::config;
use sublink_crawler::crawler::{Crawler, LogReporter, Reporter};
use sublink_crawler::export;

/// Indicates start time of a project, lazily initialized
pub static START_TIME: once_cell::sync::Lazy<Instant> = once_cell::sync::Lazy::new(Instant::now);

#[tokio::main]
async fn main() -> Result<()> {
    let _ = *START_TIME;
    let cfg = config::Config::new();
    cfg.validate()?;
    let _log2 = stdout()
        .module(true) // include module name
        .module_with_line(true) // include line number from module
        .module_filter(|module| module.starts_with("sublink_crawler")) // include only modules having this pattern
        .compress(false) // compress output
        .level(cfg.log_level.to_string()) // level of logging (trace -
        .start();

    let reporter: Arc<dyn Reporter> = Arc::new(LogReporter);
    let crawler = Crawler::http().with_reporter(Arc::clone(&reporter));
    let handle = crawler.start(cfg.crawl_parameters());

    // Ctrl+C asks the worker to stop; links found so far are still printed
    let remote = handle.remote();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received Ctrl+C");
            remote.stop();
        }
    });

    let links = handle.join().await?;
    ctrl_c.abort();

    for link in &links {
        println!("{}", link);
    }
    info!("{} links found in {:?}", links.len(), START_TIME.elapsed());

    if let Some(path) = &cfg.output_file {
        if !export::export_and_report(&links, path, reporter.as_ref()) {
            anyhow::bail!("failed to export links to {:?}", path);
        }
    }

    Ok(())
}
