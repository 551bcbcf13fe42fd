//! Shared fixtures and logging setup for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use casework_core::{CaseLog, Fixture, LogEvent, ParamRecord, Recorder, RunCase, TestError, TestResult};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a test-writer subscriber once. Respects `RUST_LOG`.
pub fn setup() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer())
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();
}

/// Fixture that notes each lifecycle step to the recorder.
///
/// Private params steer failures: `_fail_new`, `_panic_new`, `_fail_init`,
/// `_skip_init`, `_fail_finalize`, `_skip_finalize`.
pub struct LifecycleFixture {
    rec: Arc<dyn Recorder>,
    fail_init: bool,
    skip_init: bool,
    fail_finalize: bool,
    skip_finalize: bool,
}

impl LifecycleFixture {
    pub fn note(&self, text: &str) {
        self.rec.info(text);
    }
}

fn flag(params: &ParamRecord, key: &str) -> bool {
    params.get_as::<bool>(key).unwrap_or(false)
}

#[async_trait]
impl Fixture for LifecycleFixture {
    fn new(rec: Arc<dyn Recorder>, params: &ParamRecord) -> Result<Self, TestError> {
        if flag(params, "_fail_new") {
            return Err(TestError::fail("construction failed"));
        }
        if flag(params, "_panic_new") {
            panic!("constructor exploded");
        }
        rec.info("new");
        Ok(LifecycleFixture {
            rec,
            fail_init: flag(params, "_fail_init"),
            skip_init: flag(params, "_skip_init"),
            fail_finalize: flag(params, "_fail_finalize"),
            skip_finalize: flag(params, "_skip_finalize"),
        })
    }

    async fn init(&mut self) -> TestResult {
        self.rec.info("init");
        if self.fail_init {
            return Err(TestError::fail("init failed"));
        }
        if self.skip_init {
            return Err(TestError::skip("device unavailable"));
        }
        Ok(())
    }

    async fn finalize(&mut self) -> TestResult {
        self.rec.info("finalize");
        if self.fail_finalize {
            return Err(TestError::fail("leaked resource"));
        }
        if self.skip_finalize {
            return Err(TestError::skip("teardown unsupported"));
        }
        Ok(())
    }
}

/// Run one case against a fresh debug-enabled log.
pub async fn run_case<F: Fixture>(case: &RunCase<'_, F>) -> Arc<CaseLog> {
    let log = Arc::new(CaseLog::with_debug(true));
    case.run(log.clone()).await;
    log
}

pub fn infos(log: &CaseLog, text: &str) -> usize {
    log.count(|e| matches!(e, LogEvent::Info(n) if n == text))
}

pub fn threw(log: &CaseLog) -> usize {
    log.count(|e| matches!(e, LogEvent::Threw(_)))
}

pub fn skipped(log: &CaseLog) -> usize {
    log.count(|e| matches!(e, LogEvent::Skipped(_)))
}

pub fn debugs(log: &CaseLog) -> usize {
    log.count(|e| matches!(e, LogEvent::Debug(_)))
}
