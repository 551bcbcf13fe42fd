//! The event sink for case execution, and an in-memory implementation.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::Serialize;

/// Receives structured events while one run case executes.
///
/// `start` precedes every other call for a case and `finish` is the last.
/// Implementations must be `Send + Sync` so fixtures can hold a handle.
pub trait Recorder: Send + Sync {
    fn start(&self);
    fn info(&self, note: &str);
    fn debug(&self, note: &str);
    /// An ordinary failure: an error returned or a panic caught.
    fn threw(&self, error: &str);
    fn skipped(&self, note: &str);
    fn finish(&self);
}

/// Overall status of a recorded case. Later variants dominate earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    Running,
    Pass,
    Skip,
    Fail,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Running => "running",
            CaseStatus::Pass => "pass",
            CaseStatus::Skip => "skip",
            CaseStatus::Fail => "fail",
        }
    }
}

/// One event captured by [`CaseLog`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "note", rename_all = "lowercase")]
pub enum LogEvent {
    Start,
    Info(String),
    Debug(String),
    Threw(String),
    Skipped(String),
    Finish,
}

#[derive(Debug)]
struct LogState {
    events: Vec<LogEvent>,
    status: CaseStatus,
    started_at: Option<Instant>,
    elapsed: Option<Duration>,
}

/// A thread-safe recorder that keeps every event in memory.
#[derive(Debug)]
pub struct CaseLog {
    debug_enabled: bool,
    state: Mutex<LogState>,
}

impl CaseLog {
    /// Create a log that drops debug notes.
    pub fn new() -> Self {
        Self::with_debug(false)
    }

    pub fn with_debug(debug_enabled: bool) -> Self {
        CaseLog {
            debug_enabled,
            state: Mutex::new(LogState {
                events: Vec::new(),
                status: CaseStatus::Running,
                started_at: None,
                elapsed: None,
            }),
        }
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.lock().events.clone()
    }

    /// The worst outcome observed so far; `Pass` once finished cleanly.
    pub fn status(&self) -> CaseStatus {
        self.lock().status
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.lock().elapsed
    }

    /// Number of events matching `pred`.
    pub fn count(&self, pred: impl Fn(&LogEvent) -> bool) -> usize {
        self.lock().events.iter().filter(|e| pred(e)).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LogState> {
        // A poisoned log still holds every event recorded before the panic.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn push(&self, event: LogEvent) {
        self.lock().events.push(event);
    }

    fn raise(&self, status: CaseStatus) {
        let mut state = self.lock();
        state.status = state.status.max(status);
    }
}

impl Default for CaseLog {
    fn default() -> Self {
        Self::new()
    }
}

impl Recorder for CaseLog {
    fn start(&self) {
        let mut state = self.lock();
        state.started_at = Some(Instant::now());
        state.status = CaseStatus::Running;
        state.events.push(LogEvent::Start);
    }

    fn info(&self, note: &str) {
        self.push(LogEvent::Info(note.to_string()));
    }

    fn debug(&self, note: &str) {
        if self.debug_enabled {
            self.push(LogEvent::Debug(note.to_string()));
        }
    }

    fn threw(&self, error: &str) {
        self.push(LogEvent::Threw(error.to_string()));
        self.raise(CaseStatus::Fail);
    }

    fn skipped(&self, note: &str) {
        self.push(LogEvent::Skipped(note.to_string()));
        self.raise(CaseStatus::Skip);
    }

    fn finish(&self) {
        let mut state = self.lock();
        state.elapsed = state.started_at.map(|t| t.elapsed());
        state.status = state.status.max(CaseStatus::Pass);
        state.events.push(LogEvent::Finish);
    }
}
