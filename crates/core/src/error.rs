use std::panic::Location;

/// Authoring defects found while declaring or validating tests.
///
/// These are programming mistakes in test code, never runtime outcomes.
/// Registration panics with this message; validation returns it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeclarationError {
    #[error("test name must not be empty")]
    EmptyPath,

    #[error("invalid test name segment {segment:?} in {name:?}")]
    InvalidSegment { name: String, segment: String },

    #[error("test name {name:?} is not stable under percent-decoding")]
    NotDecodeIdempotent { name: String },

    #[error("duplicate test name: {name}")]
    DuplicatePath { name: String },

    #[error("parameter {key:?} cannot be recorded: {reason}")]
    InvalidParam { key: String, reason: String },

    /// No body was ever attached.
    #[error("test is missing a body: {path}\n-> test declared at {origin}")]
    MissingBody {
        path: String,
        origin: &'static Location<'static>,
    },

    /// Two cases share the same unique parameter rendering.
    #[error("duplicate public test case params for test {path}: {case}\n-> test declared at {origin}")]
    DuplicateCase {
        path: String,
        case: String,
        origin: &'static Location<'static>,
    },
}

/// Early exit from a test body or fixture lifecycle call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TestError {
    /// The trial deliberately does not apply.
    #[error("{0}")]
    Skip(String),

    #[error("{0}")]
    Failed(String),
}

impl TestError {
    pub fn skip(reason: impl Into<String>) -> Self {
        TestError::Skip(reason.into())
    }

    pub fn fail(message: impl Into<String>) -> Self {
        TestError::Failed(message.into())
    }

    /// Wrap any error as an ordinary failure.
    pub fn from_error<E: std::error::Error>(err: E) -> Self {
        TestError::Failed(err.to_string())
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, TestError::Skip(_))
    }
}

impl From<serde_json::Error> for TestError {
    fn from(err: serde_json::Error) -> Self {
        TestError::from_error(err)
    }
}

impl From<std::io::Error> for TestError {
    fn from(err: std::io::Error) -> Self {
        TestError::from_error(err)
    }
}

/// Result type returned by test bodies and fixture lifecycle calls.
pub type TestResult = Result<(), TestError>;

/// How a single trial ended, as seen at the trial boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrialOutcome {
    Pass,
    Fail(String),
    Skip(String),
}

impl From<Result<(), TestError>> for TrialOutcome {
    fn from(result: Result<(), TestError>) -> Self {
        match result {
            Ok(()) => TrialOutcome::Pass,
            Err(TestError::Skip(reason)) => TrialOutcome::Skip(reason),
            Err(TestError::Failed(message)) => TrialOutcome::Fail(message),
        }
    }
}

impl From<TestError> for TrialOutcome {
    fn from(err: TestError) -> Self {
        Err::<(), _>(err).into()
    }
}
