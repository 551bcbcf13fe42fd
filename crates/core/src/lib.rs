//! casework-core: parameterized test declaration and execution.
//!
//! Tests are declared into a [`TestGroup`] bound to a [`Fixture`] type,
//! optionally given case parameters and a subcase generator, validated once
//! with [`TestGroup::validate_all`], then expanded into [`RunCase`]s that
//! execute against a [`Recorder`].
//!
//! ```ignore
//! use casework_core::{make_group, params, UnitFixture};
//!
//! pub fn register() -> casework_core::TestGroup<UnitFixture> {
//!     let mut g = make_group::<UnitFixture>();
//!     g.test("math,add")
//!         .desc("addition is commutative")
//!         .cases([params! { "a" => 1, "b" => 2 }])
//!         .body(|t| Box::pin(async move {
//!             let (a, b): (i64, i64) = (t.param("a")?, t.param("b")?);
//!             assert_eq!(a + b, b + a);
//!             Ok(())
//!         }));
//!     g
//! }
//! ```
//!
//! # Public API
//!
//! - [`make_group`], [`TestGroup`], [`TestInfo`] -- registration and iteration
//! - [`TestBuilder`] -- phase-typed declaration builder
//! - [`RunCase`] -- one runnable case and the trial protocol
//! - [`Fixture`], [`TestContext`], [`UnitFixture`] -- per-trial resources
//! - [`Recorder`], [`CaseLog`] -- event sink and its in-memory implementation
//! - [`ParamRecord`], [`ParamGrid`], [`params!`] -- parameter records
//! - [`TestPath`] -- validated test names

pub mod case;
pub mod declaration;
pub mod error;
pub mod fixture;
pub mod grid;
pub mod group;
pub mod params;
pub mod path;
pub mod recorder;

pub use case::RunCase;
pub use declaration::{
    Cased, Declared, Subcased, TestBuilder, TestDeclaration, UNIMPLEMENTED_MARKER,
    UNIMPLEMENTED_SKIP_REASON,
};
pub use error::{DeclarationError, TestError, TestResult, TrialOutcome};
pub use fixture::{Fixture, TestContext, UnitFixture};
pub use grid::ParamGrid;
pub use group::{make_group, TestGroup, TestInfo};
pub use params::{param_key_is_public, ParamRecord};
pub use path::{is_valid_segment, TestPath, PATH_SEPARATOR};
pub use recorder::{CaseLog, CaseStatus, LogEvent, Recorder};

pub use futures::future::BoxFuture;
