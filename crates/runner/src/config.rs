use casework_core::TestPath;

/// Environment variable holding a test path prefix to run.
pub const FILTER_ENV: &str = "CASEWORK_FILTER";
/// Environment variable enabling debug notes (`1` or `true`).
pub const DEBUG_ENV: &str = "CASEWORK_DEBUG";

/// Options controlling which cases run and what gets recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Only tests whose joined path starts with this prefix run.
    pub filter: Option<String>,
    /// Keep debug notes (such as demoted subcase skips) in case logs.
    pub debug_notes: bool,
}

impl RunnerConfig {
    /// Read `CASEWORK_FILTER` and `CASEWORK_DEBUG`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let filter = lookup(FILTER_ENV)
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty());
        let debug_notes = lookup(DEBUG_ENV)
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        RunnerConfig {
            filter,
            debug_notes,
        }
    }

    pub fn with_filter(mut self, prefix: impl Into<String>) -> Self {
        self.filter = Some(prefix.into());
        self
    }

    pub fn with_debug_notes(mut self, enabled: bool) -> Self {
        self.debug_notes = enabled;
        self
    }

    /// Whether the test at `path` is selected.
    pub fn selects(&self, path: &TestPath) -> bool {
        self.filter.as_deref().map_or(true, |prefix| path.starts_with(prefix))
    }
}
