use log2::{error, info};

/// Sink for progress and error lines produced by a crawl.
/// Called from the crawl worker; implementations must not assume any
/// particular thread. Return values are never inspected.
pub trait Reporter: Send + Sync {
    fn progress(&self, message: &str);
    fn error(&self, message: &str);
}

/// Discards everything. Used when no sink is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn progress(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

/// Forwards progress to `info!` and errors to `error!`
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn progress(&self, message: &str) {
        info!("{}", message);
    }

    fn error(&self, message: &str) {
        error!("{}", message);
    }
}

/// Adapts a pair of closures, e.g. ones that marshal lines onto a UI thread
pub struct FnReporter<P, E>
where
    P: Fn(&str) + Send + Sync,
    E: Fn(&str) + Send + Sync,
{
    on_progress: P,
    on_error: E,
}

impl<P, E> FnReporter<P, E>
where
    P: Fn(&str) + Send + Sync,
    E: Fn(&str) + Send + Sync,
{
    pub fn new(on_progress: P, on_error: E) -> Self {
        Self { on_progress, on_error }
    }
}

impl<P, E> Reporter for FnReporter<P, E>
where
    P: Fn(&str) + Send + Sync,
    E: Fn(&str) + Send + Sync,
{
    fn progress(&self, message: &str) {
        (self.on_progress)(message)
    }

    fn error(&self, message: &str) {
        (self.on_error)(message)
    }
}
