use std::fmt;

use casework_core::{CaseLog, CaseStatus, LogEvent};
use serde::Serialize;

/// Outcome of one run case.
#[derive(Debug, Clone, Serialize)]
pub struct CaseResult {
    /// `path:params` identity of the case.
    pub query: String,
    pub status: CaseStatus,
    pub events: Vec<LogEvent>,
    /// Wall time between `start` and `finish`, in milliseconds.
    pub elapsed_ms: Option<f64>,
}

impl CaseResult {
    pub fn from_log(query: String, log: &CaseLog) -> Self {
        CaseResult {
            query,
            status: log.status(),
            events: log.events(),
            elapsed_ms: log.elapsed().map(|d| d.as_secs_f64() * 1000.0),
        }
    }

    /// Messages of every `threw` event, in order.
    pub fn failures(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                LogEvent::Threw(m) => Some(m.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The case-level skip reason, if the case was skipped.
    pub fn skip_reason(&self) -> Option<&str> {
        self.events.iter().find_map(|e| match e {
            LogEvent::Skipped(m) => Some(m.as_str()),
            _ => None,
        })
    }
}

/// Aggregated results from running a group.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub results: Vec<CaseResult>,
    pub passed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub total: usize,
}

impl RunReport {
    pub fn from_results(results: Vec<CaseResult>) -> Self {
        let count = |s: CaseStatus| results.iter().filter(|r| r.status == s).count();
        let passed = count(CaseStatus::Pass);
        let skipped = count(CaseStatus::Skip);
        let total = results.len();
        RunReport {
            passed,
            skipped,
            failed: total - passed - skipped,
            total,
            results,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Cases: {}/{} passed ({} skipped, {} failed)",
            self.passed, self.total, self.skipped, self.failed
        )?;
        for r in &self.results {
            if r.status == CaseStatus::Fail || r.status == CaseStatus::Running {
                let failures = r.failures();
                let message = if failures.is_empty() {
                    "(no message)".to_string()
                } else {
                    failures.join("; ")
                };
                writeln!(f, "  FAIL [{}]: {}", r.query, message)?;
            }
        }
        Ok(())
    }
}
