//! Test groups: the registry of declarations for one fixture type.

use std::collections::HashSet;
use std::marker::PhantomData;
use std::panic::Location;

use crate::case::RunCase;
use crate::declaration::{Declared, TestBuilder, TestDeclaration};
use crate::error::DeclarationError;
use crate::fixture::Fixture;
use crate::path::TestPath;

/// Create an empty group whose tests run against fixture `F`.
pub fn make_group<F: Fixture>() -> TestGroup<F> {
    TestGroup::new()
}

/// An ordered set of uniquely named test declarations.
pub struct TestGroup<F> {
    seen: HashSet<String>,
    tests: Vec<TestDeclaration<F>>,
    _fixture: PhantomData<fn() -> F>,
}

impl<F: Fixture> TestGroup<F> {
    pub fn new() -> Self {
        TestGroup {
            seen: HashSet::new(),
            tests: Vec::new(),
            _fixture: PhantomData,
        }
    }

    /// Declare a test named by `,`-separated segments.
    ///
    /// # Panics
    ///
    /// On a malformed or already-registered name. Both are authoring
    /// mistakes, reported at the caller's location.
    #[track_caller]
    pub fn test(&mut self, name: &str) -> TestBuilder<'_, F, Declared> {
        match self.try_test(name) {
            Ok(builder) => builder,
            Err(e) => panic!("{}", e),
        }
    }

    /// Like [`test`](Self::test), returning the defect instead of panicking.
    #[track_caller]
    pub fn try_test(&mut self, name: &str) -> Result<TestBuilder<'_, F, Declared>, DeclarationError> {
        let origin = Location::caller();
        let path = TestPath::parse(name)?;
        let joined = path.joined();
        if !self.seen.insert(joined.clone()) {
            return Err(DeclarationError::DuplicatePath { name: joined });
        }
        tracing::debug!(test = %joined, origin = %origin, "declared test");
        let index = self.tests.len();
        self.tests.push(TestDeclaration::new(path, origin));
        Ok(TestBuilder::bind(&mut self.tests[index]))
    }

    /// Validate every declaration, stopping at the first defect.
    pub fn validate_all(&self) -> Result<(), DeclarationError> {
        for decl in &self.tests {
            decl.validate()?;
        }
        tracing::debug!(tests = self.tests.len(), "group validated");
        Ok(())
    }

    /// Iterate declarations in order. Restartable: each call starts over.
    pub fn iter(&self) -> impl Iterator<Item = TestInfo<'_, F>> + '_ {
        self.tests.iter().map(|decl| TestInfo { decl })
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}

impl<F: Fixture> Default for TestGroup<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// One declaration as seen during iteration.
pub struct TestInfo<'g, F> {
    decl: &'g TestDeclaration<F>,
}

impl<'g, F: Fixture> TestInfo<'g, F> {
    pub fn path(&self) -> &'g TestPath {
        self.decl.path()
    }

    pub fn description(&self) -> Option<&'g str> {
        self.decl.description()
    }

    pub fn is_unimplemented(&self) -> bool {
        self.decl.is_unimplemented()
    }

    pub fn origin(&self) -> &'static Location<'static> {
        self.decl.origin()
    }

    /// Number of run cases [`cases`](Self::cases) will yield.
    pub fn case_count(&self) -> usize {
        self.decl.cases().map_or(1, |c| c.len())
    }

    /// Expand into run cases, in case declaration order.
    ///
    /// A declaration without cases yields a single case with empty params.
    pub fn cases(&self) -> Box<dyn Iterator<Item = RunCase<'g, F>> + 'g> {
        let decl = self.decl;
        match decl.cases() {
            None => Box::new(std::iter::once(RunCase::new(decl, Default::default()))),
            Some(cases) => Box::new(cases.iter().map(move |p| RunCase::new(decl, p.clone()))),
        }
    }
}
