//! Run cases and the trial execution protocol.
//!
//! A trial is one pass of construct -> init -> body -> finalize for a case,
//! or for one subcase of it. `finalize` runs on every exit path once
//! construction succeeded. Errors and panics are caught at the trial
//! boundary and turned into a [`TrialOutcome`]; nothing escapes a run case
//! except through the [`Recorder`].

use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures::FutureExt;

use crate::declaration::TestDeclaration;
use crate::error::{TestResult, TrialOutcome};
use crate::fixture::{Fixture, TestContext};
use crate::params::ParamRecord;
use crate::path::TestPath;
use crate::recorder::Recorder;

/// One runnable (test path, case params) pair.
pub struct RunCase<'g, F> {
    decl: &'g TestDeclaration<F>,
    params: ParamRecord,
}

impl<'g, F: Fixture> RunCase<'g, F> {
    pub(crate) fn new(decl: &'g TestDeclaration<F>, params: ParamRecord) -> Self {
        RunCase { decl, params }
    }

    pub fn path(&self) -> &'g TestPath {
        self.decl.path()
    }

    /// The identity params: the case record without private keys.
    pub fn params(&self) -> ParamRecord {
        self.params.public_view()
    }

    /// `path:params`, the string reports use to name this case.
    pub fn query(&self) -> String {
        format!("{}:{}", self.decl.path(), self.params.render_human())
    }

    /// Execute the case, reporting every outcome to `rec`.
    pub async fn run(&self, rec: Arc<dyn Recorder>) {
        rec.start();
        match self.decl.subcases() {
            None => match self.run_trial(&rec, self.params.clone()).await {
                TrialOutcome::Pass => {}
                TrialOutcome::Skip(reason) => rec.skipped(&reason),
                TrialOutcome::Fail(message) => rec.threw(&message),
            },
            Some(generator) => {
                let generated = panic::catch_unwind(AssertUnwindSafe(|| (**generator)(&self.params)));
                match generated {
                    Ok(subcases) => self.run_subcases(&rec, subcases).await,
                    Err(payload) => rec.threw(&format!(
                        "subcase generator panicked: {}",
                        panic_message(payload.as_ref())
                    )),
                }
            }
        }
        rec.finish();
    }

    async fn run_subcases(&self, rec: &Arc<dyn Recorder>, subcases: Vec<ParamRecord>) {
        let mut total = 0usize;
        let mut skipped = 0usize;
        for subcase in subcases {
            rec.info(&format!("subcase: {}", subcase.render_human()));
            let merged = self.params.merge(&subcase);
            match self.run_trial(rec, merged).await {
                TrialOutcome::Pass => {}
                TrialOutcome::Skip(reason) => {
                    skipped += 1;
                    rec.debug(&format!("subcase skipped: {}", reason));
                }
                TrialOutcome::Fail(message) => rec.threw(&message),
            }
            total += 1;
        }
        tracing::debug!(case = %self.query(), total, skipped, "subcases finished");
        if total > 0 && skipped == total {
            rec.skipped("all subcases were skipped");
        }
    }

    async fn run_trial(&self, rec: &Arc<dyn Recorder>, params: ParamRecord) -> TrialOutcome {
        let Some(body) = self.decl.body() else {
            return TrialOutcome::Fail(format!("test {} has no body", self.decl.path()));
        };

        let constructed = panic::catch_unwind(AssertUnwindSafe(|| F::new(Arc::clone(rec), &params)));
        let fixture = match constructed {
            Ok(Ok(fixture)) => fixture,
            Ok(Err(e)) => return e.into(),
            Err(payload) => return TrialOutcome::Fail(panic_message(payload.as_ref())),
        };

        let mut t = TestContext::new(fixture, params);
        tracing::debug!(case = %self.query(), "fixture init");
        let mut outcome = guarded(t.fixture_mut().init()).await;
        if outcome == TrialOutcome::Pass {
            outcome = guarded((**body)(&mut t)).await;
        }

        tracing::debug!(case = %self.query(), "fixture finalize");
        match guarded(t.fixture_mut().finalize()).await {
            TrialOutcome::Pass => outcome,
            TrialOutcome::Skip(reason) => match outcome {
                TrialOutcome::Pass => TrialOutcome::Skip(reason),
                other => other,
            },
            TrialOutcome::Fail(reason) => {
                tracing::warn!(case = %self.query(), error = %reason, "finalize failed");
                match outcome {
                    TrialOutcome::Fail(original) => TrialOutcome::Fail(format!(
                        "{}\nfinalize also failed: {}",
                        original, reason
                    )),
                    _ => TrialOutcome::Fail(format!("finalize failed: {}", reason)),
                }
            }
        }
    }
}

// Await a lifecycle or body future, folding panics into failures.
async fn guarded<Fut>(fut: Fut) -> TrialOutcome
where
    Fut: Future<Output = TestResult>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(result) => result.into(),
        Err(payload) => TrialOutcome::Fail(panic_message(payload.as_ref())),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}
