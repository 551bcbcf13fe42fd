//! Fixture contract and the context handed to test bodies.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::{TestError, TestResult};
use crate::params::ParamRecord;
use crate::recorder::Recorder;

/// Per-case setup and teardown around a test body.
///
/// One instance is constructed per trial (a case, or one subcase of it)
/// and never reused. `finalize` runs whenever construction succeeded,
/// including after a failed or skipped `init` or body, and must tolerate
/// that.
#[async_trait]
pub trait Fixture: Sized + Send + 'static {
    fn new(rec: Arc<dyn Recorder>, params: &ParamRecord) -> Result<Self, TestError>;

    async fn init(&mut self) -> TestResult {
        Ok(())
    }

    async fn finalize(&mut self) -> TestResult {
        Ok(())
    }
}

/// A fixture with no resources. Keeps the recorder so bodies can log.
pub struct UnitFixture {
    rec: Arc<dyn Recorder>,
}

impl UnitFixture {
    pub fn rec(&self) -> &dyn Recorder {
        self.rec.as_ref()
    }
}

#[async_trait]
impl Fixture for UnitFixture {
    fn new(rec: Arc<dyn Recorder>, _params: &ParamRecord) -> Result<Self, TestError> {
        Ok(UnitFixture { rec })
    }
}

/// The fixture plus the parameters merged for the current trial.
///
/// Derefs to the fixture, so fixture helpers are called directly on `t`.
pub struct TestContext<F> {
    fixture: F,
    params: ParamRecord,
}

impl<F> TestContext<F> {
    pub(crate) fn new(fixture: F, params: ParamRecord) -> Self {
        TestContext { fixture, params }
    }

    pub(crate) fn fixture_mut(&mut self) -> &mut F {
        &mut self.fixture
    }

    pub fn params(&self) -> &ParamRecord {
        &self.params
    }

    /// Deserialize parameter `key`, failing the trial if absent or mistyped.
    pub fn param<T: DeserializeOwned>(&self, key: &str) -> Result<T, TestError> {
        let value = self
            .params
            .get(key)
            .ok_or_else(|| TestError::fail(format!("missing test parameter '{}'", key)))?;
        serde_json::from_value(value.clone())
            .map_err(|e| TestError::fail(format!("test parameter '{}': {}", key, e)))
    }

    /// Build the skip signal for this trial: `return Err(t.skip("..."))`.
    pub fn skip(&self, reason: impl Into<String>) -> TestError {
        TestError::skip(reason)
    }
}

impl<F> Deref for TestContext<F> {
    type Target = F;

    fn deref(&self) -> &F {
        &self.fixture
    }
}

impl<F> DerefMut for TestContext<F> {
    fn deref_mut(&mut self) -> &mut F {
        &mut self.fixture
    }
}
