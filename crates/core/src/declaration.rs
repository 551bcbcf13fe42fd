//! Test declarations and the phase-typed builder that fills them in.
//!
//! A declaration is created by [`TestGroup::test`](crate::TestGroup::test)
//! and shaped through a [`TestBuilder`]. Each builder call consumes the
//! handle and returns one for the next phase, so attaching cases, subcases,
//! or a body twice does not compile:
//!
//! ```text
//! Declared --cases--> Cased --subcases--> Subcased
//!     \                  \                    \
//!      +------------------+--------------------+--body / unimplemented--> (done)
//! ```

use std::collections::HashSet;
use std::marker::PhantomData;
use std::panic::Location;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::{DeclarationError, TestError, TestResult};
use crate::fixture::TestContext;
use crate::params::ParamRecord;
use crate::path::TestPath;

/// Appended to the description of tests marked unimplemented.
pub const UNIMPLEMENTED_MARKER: &str = "TODO: not yet implemented";
/// Skip reason raised by the body of a test marked unimplemented.
pub const UNIMPLEMENTED_SKIP_REASON: &str = "test unimplemented";

/// A test body: borrows the trial context and returns a boxed future.
pub type TestBody<F> =
    Arc<dyn for<'a> Fn(&'a mut TestContext<F>) -> BoxFuture<'a, TestResult> + Send + Sync>;

/// Produces the subcase parameter records for one case.
pub type SubcaseGenerator = Arc<dyn Fn(&ParamRecord) -> Vec<ParamRecord> + Send + Sync>;

/// The accumulated shape of one declared test.
pub struct TestDeclaration<F> {
    path: TestPath,
    description: Option<String>,
    cases: Option<Vec<ParamRecord>>,
    subcases: Option<SubcaseGenerator>,
    body: Option<TestBody<F>>,
    unimplemented: bool,
    origin: &'static Location<'static>,
}

impl<F> TestDeclaration<F> {
    pub(crate) fn new(path: TestPath, origin: &'static Location<'static>) -> Self {
        TestDeclaration {
            path,
            description: None,
            cases: None,
            subcases: None,
            body: None,
            unimplemented: false,
            origin,
        }
    }

    pub fn path(&self) -> &TestPath {
        &self.path
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_unimplemented(&self) -> bool {
        self.unimplemented
    }

    /// Where `TestGroup::test` was called for this declaration.
    pub fn origin(&self) -> &'static Location<'static> {
        self.origin
    }

    pub(crate) fn cases(&self) -> Option<&[ParamRecord]> {
        self.cases.as_deref()
    }

    pub(crate) fn subcases(&self) -> Option<&SubcaseGenerator> {
        self.subcases.as_ref()
    }

    pub(crate) fn body(&self) -> Option<&TestBody<F>> {
        self.body.as_ref()
    }

    pub(crate) fn set_description(&mut self, text: &str) {
        self.description = Some(text.trim().to_string());
    }

    #[track_caller]
    pub(crate) fn set_cases(&mut self, cases: Vec<ParamRecord>) {
        assert!(
            self.cases.is_none(),
            "test {}: cases attached more than once",
            self.path
        );
        self.cases = Some(cases);
    }

    #[track_caller]
    pub(crate) fn set_subcases(&mut self, generator: SubcaseGenerator) {
        assert!(
            self.subcases.is_none(),
            "test {}: subcases attached more than once",
            self.path
        );
        self.subcases = Some(generator);
    }

    #[track_caller]
    pub(crate) fn set_body(&mut self, body: TestBody<F>) {
        assert!(
            self.body.is_none(),
            "test {}: body attached more than once",
            self.path
        );
        self.body = Some(body);
    }

    #[track_caller]
    pub(crate) fn mark_unimplemented(&mut self)
    where
        F: 'static,
    {
        self.description = Some(match self.description.take() {
            Some(d) if !d.is_empty() => format!("{}\n\n{}", d, UNIMPLEMENTED_MARKER),
            _ => UNIMPLEMENTED_MARKER.to_string(),
        });
        self.set_body(Arc::new(unimplemented_body::<F>));
        self.unimplemented = true;
    }

    /// Check that a body exists and that no two cases share an identity.
    pub fn validate(&self) -> Result<(), DeclarationError> {
        if self.body.is_none() {
            return Err(DeclarationError::MissingBody {
                path: self.path.joined(),
                origin: self.origin,
            });
        }
        if let Some(cases) = &self.cases {
            let mut seen = HashSet::with_capacity(cases.len());
            for case in cases {
                if !seen.insert(case.render_unique()) {
                    return Err(DeclarationError::DuplicateCase {
                        path: self.path.joined(),
                        case: case.render_human(),
                        origin: self.origin,
                    });
                }
            }
        }
        Ok(())
    }
}

fn unimplemented_body<F>(_t: &mut TestContext<F>) -> BoxFuture<'_, TestResult> {
    Box::pin(async { Err(TestError::skip(UNIMPLEMENTED_SKIP_REASON)) })
}

// ── Builder phases ──────────────────────────────────────────────────────

/// Nothing attached yet.
pub struct Declared;
/// Case parameters attached.
pub struct Cased;
/// Subcase generator attached.
pub struct Subcased;

mod sealed {
    pub trait AcceptsSubcases {}
    impl AcceptsSubcases for super::Declared {}
    impl AcceptsSubcases for super::Cased {}
}

/// Fluent handle bound to one declaration inside a group.
#[must_use = "a test without a body fails validation"]
pub struct TestBuilder<'g, F, Phase = Declared> {
    decl: &'g mut TestDeclaration<F>,
    _phase: PhantomData<Phase>,
}

impl<'g, F, P> TestBuilder<'g, F, P> {
    pub(crate) fn bind(decl: &'g mut TestDeclaration<F>) -> Self {
        TestBuilder {
            decl,
            _phase: PhantomData,
        }
    }

    fn advance<Q>(self) -> TestBuilder<'g, F, Q> {
        TestBuilder {
            decl: self.decl,
            _phase: PhantomData,
        }
    }

    /// Set (or overwrite) the trimmed description.
    pub fn desc(self, text: &str) -> Self {
        self.decl.set_description(text);
        self
    }

    /// Attach the test body, completing the declaration.
    ///
    /// ```ignore
    /// g.test("basic").body(|t| Box::pin(async move {
    ///     let x: u32 = t.param("x")?;
    ///     Ok(())
    /// }));
    /// ```
    #[track_caller]
    pub fn body<B>(self, body: B)
    where
        B: for<'a> Fn(&'a mut TestContext<F>) -> BoxFuture<'a, TestResult> + Send + Sync + 'static,
    {
        self.decl.set_body(Arc::new(body));
    }

    /// Mark the test as not yet written: every trial skips.
    #[track_caller]
    pub fn unimplemented(self)
    where
        F: 'static,
    {
        self.decl.mark_unimplemented();
    }
}

impl<'g, F> TestBuilder<'g, F, Declared> {
    /// Attach the case parameter records. Each becomes one run case.
    #[track_caller]
    pub fn cases<I, P>(self, cases: I) -> TestBuilder<'g, F, Cased>
    where
        I: IntoIterator<Item = P>,
        P: Into<ParamRecord>,
    {
        self.decl
            .set_cases(cases.into_iter().map(Into::into).collect());
        self.advance()
    }

    /// Older spelling of [`cases`](Self::cases).
    #[track_caller]
    pub fn params<I, P>(self, cases: I) -> TestBuilder<'g, F, Cased>
    where
        I: IntoIterator<Item = P>,
        P: Into<ParamRecord>,
    {
        self.cases(cases)
    }
}

impl<'g, F, P: sealed::AcceptsSubcases> TestBuilder<'g, F, P> {
    /// Attach a generator producing subcase records from each case's params.
    #[track_caller]
    pub fn subcases<G, I>(self, generator: G) -> TestBuilder<'g, F, Subcased>
    where
        G: Fn(&ParamRecord) -> I + Send + Sync + 'static,
        I: IntoIterator<Item = ParamRecord>,
    {
        self.decl.set_subcases(Arc::new(move |p: &ParamRecord| {
            generator(p).into_iter().collect::<Vec<_>>()
        }));
        self.advance()
    }
}
