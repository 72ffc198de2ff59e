use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use tokio::sync::Notify;
use tokio::time::{Duration, sleep};

/// How often a paused crawl re-checks its flags
pub const PAUSE_POLL_INTERVAL_MS: u64 = 100;

/// Lifecycle of a crawl session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CrawlerStatus {
    Idle = 0,
    Running = 1,
    Paused = 2,
    Completed = 3,
    Stopped = 4,
}

impl CrawlerStatus {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => CrawlerStatus::Running,
            2 => CrawlerStatus::Paused,
            3 => CrawlerStatus::Completed,
            4 => CrawlerStatus::Stopped,
            _ => CrawlerStatus::Idle,
        }
    }

    pub fn is_finished(self) -> bool {
        matches!(self, CrawlerStatus::Completed | CrawlerStatus::Stopped)
    }
}

impl fmt::Display for CrawlerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CrawlerStatus::Idle => "idle",
            CrawlerStatus::Running => "running",
            CrawlerStatus::Paused => "paused",
            CrawlerStatus::Completed => "completed",
            CrawlerStatus::Stopped => "stopped",
        };
        write!(f, "{}", s)
    }
}

struct ControlState {
    running: AtomicBool,
    paused: AtomicBool,
    status: AtomicU8,
    /// Wakes the worker out of a delay or pause wait on stop
    wake: Notify,
}

/// Cross-thread control surface of one crawl. Cheap to clone; every clone
/// refers to the same flags.
#[derive(Clone)]
pub struct CrawlControl {
    state: Arc<ControlState>,
}

impl CrawlControl {
    pub fn new() -> Self {
        Self {
            state: Arc::new(ControlState {
                running: AtomicBool::new(false),
                paused: AtomicBool::new(false),
                status: AtomicU8::new(CrawlerStatus::Idle as u8),
                wake: Notify::new(),
            }),
        }
    }

    pub fn status(&self) -> CrawlerStatus {
        CrawlerStatus::from_u8(self.state.status.load(Ordering::SeqCst))
    }

    pub fn is_running(&self) -> bool {
        self.state.running.load(Ordering::SeqCst)
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused.load(Ordering::SeqCst)
    }

    /// Requests a cooperative stop. Returns false if no crawl was running.
    pub fn stop(&self) -> bool {
        if !self.state.running.swap(false, Ordering::SeqCst) {
            return false;
        }
        self.state.paused.store(false, Ordering::SeqCst);
        // Wakes only current waiters; no permit outlives this session
        self.state.wake.notify_waiters();
        true
    }

    /// Returns false if no crawl was running or it was already paused.
    pub fn pause(&self) -> bool {
        if !self.is_running() || self.state.paused.swap(true, Ordering::SeqCst) {
            return false;
        }
        if !self.transition(CrawlerStatus::Running, CrawlerStatus::Paused) {
            self.state.paused.store(false, Ordering::SeqCst);
            return false;
        }
        true
    }

    /// Returns false if no crawl was running or it was not paused.
    pub fn resume(&self) -> bool {
        if !self.is_running() || !self.transition(CrawlerStatus::Paused, CrawlerStatus::Running) {
            return false;
        }
        self.state.paused.store(false, Ordering::SeqCst);
        true
    }

    pub(crate) fn begin(&self) {
        self.state.paused.store(false, Ordering::SeqCst);
        self.state.running.store(true, Ordering::SeqCst);
        self.set_status(CrawlerStatus::Running);
    }

    /// Moves to the terminal state matching how the loop ended.
    pub(crate) fn finish(&self) -> CrawlerStatus {
        let status = if self.state.running.swap(false, Ordering::SeqCst) {
            CrawlerStatus::Completed
        } else {
            CrawlerStatus::Stopped
        };
        self.state.paused.store(false, Ordering::SeqCst);
        self.set_status(status);
        status
    }

    /// Blocks while paused, polling in short increments. Returns early once
    /// a stop is requested.
    pub(crate) async fn wait_while_paused(&self) {
        loop {
            let woken = self.state.wake.notified();
            tokio::pin!(woken);
            woken.as_mut().enable();
            if !self.is_paused() || !self.is_running() {
                return;
            }
            tokio::select! {
                _ = sleep(Duration::from_millis(PAUSE_POLL_INTERVAL_MS)) => {}
                _ = &mut woken => {}
            }
        }
    }

    /// Sleeps for `delay` unless a stop arrives first.
    pub(crate) async fn sleep_unless_stopped(&self, delay: Duration) {
        // Registered before the running check so a concurrent stop is not missed
        let woken = self.state.wake.notified();
        tokio::pin!(woken);
        woken.as_mut().enable();
        if !self.is_running() {
            return;
        }
        tokio::select! {
            _ = sleep(delay) => {}
            _ = &mut woken => {}
        }
    }

    fn set_status(&self, status: CrawlerStatus) {
        self.state.status.store(status as u8, Ordering::SeqCst);
    }

    /// Moves `from` -> `to` only if the status is still `from`. Never leaves
    /// a terminal state.
    fn transition(&self, from: CrawlerStatus, to: CrawlerStatus) -> bool {
        self.state
            .status
            .compare_exchange(from as u8, to as u8, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

impl Default for CrawlControl {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CrawlControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrawlControl")
            .field("running", &self.is_running())
            .field("paused", &self.is_paused())
            .field("status", &self.status())
            .finish()
    }
}
