//! casework-runner: sequential execution and reporting for test groups.
//!
//! Provides [`run_group`] to execute every case of a validated group against
//! fresh [`CaseLog`]s, a [`RunReport`] summary, TAP v14 output, and the
//! [`casework_suite!`] macro for wiring a group into `cargo test`.

pub mod config;
pub mod report;
pub mod suite;
pub mod tap;

use std::sync::Arc;

use casework_core::{CaseLog, DeclarationError, Fixture, TestGroup};

pub use config::RunnerConfig;
pub use report::{CaseResult, RunReport};
pub use tap::Tap;

/// Run every selected case of `group`, one at a time, in declaration order.
///
/// Each case gets its own [`CaseLog`]. Execution outcomes never escape a
/// case; they are collected into the returned report.
pub async fn run_group<F: Fixture>(group: &TestGroup<F>, config: &RunnerConfig) -> RunReport {
    let mut results = Vec::new();
    for test in group.iter() {
        if !config.selects(test.path()) {
            continue;
        }
        for case in test.cases() {
            let log = Arc::new(CaseLog::with_debug(config.debug_notes));
            case.run(log.clone()).await;
            let result = CaseResult::from_log(case.query(), &log);
            tracing::info!(
                case = %result.query,
                status = result.status.as_str(),
                "case finished"
            );
            results.push(result);
        }
    }
    RunReport::from_results(results)
}

/// Validate the whole group, then run it. Nothing runs if validation fails.
pub async fn validate_and_run<F: Fixture>(
    group: &TestGroup<F>,
    config: &RunnerConfig,
) -> Result<RunReport, DeclarationError> {
    group.validate_all()?;
    Ok(run_group(group, config).await)
}
