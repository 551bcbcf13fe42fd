use std::fmt::Write as _;

use casework_core::CaseStatus;

use crate::report::RunReport;

/// TAP (Test Anything Protocol) v14 output for a run report.
pub struct Tap {
    tests: Vec<TapTest>,
}

struct TapTest {
    ok: bool,
    desc: String,
    skip: Option<String>,
    diagnostics: Option<String>,
}

impl Tap {
    pub fn new() -> Self {
        Tap { tests: Vec::new() }
    }

    pub fn from_report(report: &RunReport) -> Self {
        let mut tap = Tap::new();
        for r in &report.results {
            match r.status {
                CaseStatus::Fail | CaseStatus::Running => {
                    tap.not_ok(&r.query, r.failures().join("\n"))
                }
                CaseStatus::Skip => tap.skip(&r.query, r.skip_reason().unwrap_or_default()),
                CaseStatus::Pass => tap.ok(&r.query),
            }
        }
        tap
    }

    pub fn ok(&mut self, desc: impl Into<String>) {
        self.tests.push(TapTest {
            ok: true,
            desc: desc.into(),
            skip: None,
            diagnostics: None,
        });
    }

    pub fn skip(&mut self, desc: impl Into<String>, reason: impl Into<String>) {
        self.tests.push(TapTest {
            ok: true,
            desc: desc.into(),
            skip: Some(reason.into()),
            diagnostics: None,
        });
    }

    pub fn not_ok(&mut self, desc: impl Into<String>, diagnostics: impl Into<String>) {
        self.tests.push(TapTest {
            ok: false,
            desc: desc.into(),
            skip: None,
            diagnostics: Some(diagnostics.into()),
        });
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "TAP version 14");
        let _ = writeln!(out, "1..{}", self.tests.len());
        let mut pass = 0usize;
        let mut fail = 0usize;
        let mut skip = 0usize;
        for (i, t) in self.tests.iter().enumerate() {
            let n = i + 1;
            if !t.ok {
                let _ = writeln!(out, "not ok {} - {}", n, t.desc);
                if let Some(diag) = &t.diagnostics {
                    // TAP diagnostics are prefixed with "# "
                    for line in diag.lines() {
                        let _ = writeln!(out, "  # {}", line);
                    }
                }
                fail += 1;
            } else if let Some(reason) = &t.skip {
                let _ = writeln!(out, "ok {} - {} # SKIP {}", n, t.desc, reason);
                skip += 1;
            } else {
                let _ = writeln!(out, "ok {} - {}", n, t.desc);
                pass += 1;
            }
        }
        let _ = writeln!(out, "# tests {}", self.tests.len());
        let _ = writeln!(out, "# pass  {}", pass);
        let _ = writeln!(out, "# skip  {}", skip);
        let _ = writeln!(out, "# fail  {}", fail);
        out
    }

    pub fn failure_count(&self) -> usize {
        self.tests.iter().filter(|t| !t.ok).count()
    }
}

impl Default for Tap {
    fn default() -> Self {
        Self::new()
    }
}
