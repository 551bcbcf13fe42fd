//! The `casework_suite!` macro.
//!
//! This macro turns a registration function into a `#[tokio::test]` that
//! validates the group, runs every selected case, and fails if any case
//! failed.
//!
//! # Usage
//!
//! ```rust,ignore
//! use casework_core::{make_group, TestGroup, UnitFixture};
//! use casework_runner::casework_suite;
//!
//! fn register() -> TestGroup<UnitFixture> {
//!     let mut g = make_group::<UnitFixture>();
//!     g.test("smoke").body(|_t| Box::pin(async { Ok(()) }));
//!     g
//! }
//!
//! casework_suite!(smoke_suite, register);
//! ```
//!
//! The registration function is called fresh for each generated test, and
//! `CASEWORK_FILTER` / `CASEWORK_DEBUG` are honored via
//! [`RunnerConfig::from_env`](crate::RunnerConfig::from_env).

/// Generate a `#[tokio::test]` running every case of a registered group.
#[macro_export]
macro_rules! casework_suite {
    ($test_name:ident, $register:path) => {
        #[tokio::test]
        async fn $test_name() {
            let group = $register();
            let config = $crate::RunnerConfig::from_env();
            let report = $crate::validate_and_run(&group, &config)
                .await
                .unwrap_or_else(|e| panic!("{}: group validation failed: {}", stringify!($test_name), e));
            assert!(report.is_success(), "{}", report);
        }
    };
}
