//! Declaration-time defects and the explicit validation pass.

use casework_core::{
    make_group, params, DeclarationError, ParamGrid, TestGroup, UnitFixture,
};

fn register(g: &mut TestGroup<UnitFixture>) {
    g.test("buffers,create")
        .desc("  creates buffers of every size  ")
        .cases(ParamGrid::new().combine("size", [4, 16, 256]))
        .body(|_t| Box::pin(async { Ok(()) }));
    g.test("buffers,map").body(|_t| Box::pin(async { Ok(()) }));
    g.test("textures,sample").unimplemented();
}

#[test]
fn iteration_follows_declaration_order_and_restarts() {
    let mut g = make_group::<UnitFixture>();
    register(&mut g);
    g.validate_all().unwrap();

    let names: Vec<String> = g.iter().map(|t| t.path().to_string()).collect();
    assert_eq!(names, ["buffers,create", "buffers,map", "textures,sample"]);
    let again: Vec<String> = g.iter().map(|t| t.path().to_string()).collect();
    assert_eq!(names, again);

    let first = g.iter().next().unwrap();
    assert_eq!(first.description(), Some("creates buffers of every size"));
    assert_eq!(first.case_count(), 3);
    let queries: Vec<String> = first.cases().map(|c| c.query()).collect();
    assert_eq!(
        queries,
        [
            "buffers,create:size:4",
            "buffers,create:size:16",
            "buffers,create:size:256"
        ]
    );
}

#[test]
#[should_panic(expected = "duplicate test name: basic")]
fn duplicate_name_panics_at_declaration() {
    let mut g = make_group::<UnitFixture>();
    g.test("basic").body(|_t| Box::pin(async { Ok(()) }));
    g.test("basic").body(|_t| Box::pin(async { Ok(()) }));
}

#[test]
#[should_panic(expected = "not stable under percent-decoding")]
fn percent_encoded_name_panics_at_declaration() {
    let mut g = make_group::<UnitFixture>();
    g.test("a%2Cb").unimplemented();
}

#[test]
#[should_panic(expected = "invalid test name segment")]
fn malformed_segment_panics_at_declaration() {
    let mut g = make_group::<UnitFixture>();
    g.test("a,b c").unimplemented();
}

#[test]
fn try_test_reports_defects_without_panicking() {
    let mut g = make_group::<UnitFixture>();
    g.try_test("ok").unwrap().unimplemented();
    assert!(matches!(
        g.try_test("ok"),
        Err(DeclarationError::DuplicatePath { .. })
    ));
    assert!(matches!(
        g.try_test("caf%C3%A9"),
        Err(DeclarationError::NotDecodeIdempotent { .. })
    ));
    assert!(matches!(g.try_test(""), Err(DeclarationError::EmptyPath)));
    assert_eq!(g.len(), 1);
}

#[test]
fn validation_rejects_missing_body_and_cites_origin() {
    let mut g = make_group::<UnitFixture>();
    g.test("fine").body(|_t| Box::pin(async { Ok(()) }));
    let _ = g.test("forgot,body").desc("never finished");

    let err = g.validate_all().unwrap_err();
    assert!(matches!(err, DeclarationError::MissingBody { .. }));
    let msg = err.to_string();
    assert!(msg.contains("forgot,body"), "{msg}");
    assert!(msg.contains("registration.rs"), "{msg}");

    let forgot = g.iter().nth(1).unwrap();
    assert!(forgot.origin().file().ends_with("registration.rs"));
    assert!(msg.contains(&forgot.origin().to_string()), "{msg}");
}

#[test]
fn validation_rejects_duplicate_cases_with_human_rendering() {
    let mut g = make_group::<UnitFixture>();
    g.test("dup")
        .cases([params! { "x" => 1 }, params! { "x" => 1 }])
        .body(|_t| Box::pin(async { Ok(()) }));

    let err = g.validate_all().unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("x:1"), "{msg}");
    assert!(msg.contains("dup"), "{msg}");
}

#[test]
fn validation_stops_at_first_defect() {
    let mut g = make_group::<UnitFixture>();
    let _ = g.test("first");
    g.test("second")
        .cases([params! { "x" => 1 }, params! { "x" => 1.0 }])
        .body(|_t| Box::pin(async { Ok(()) }));

    match g.validate_all() {
        Err(DeclarationError::MissingBody { path, .. }) => assert_eq!(path, "first"),
        other => panic!("expected missing body for 'first', got {:?}", other),
    }
}

#[test]
fn empty_case_list_yields_no_run_cases() {
    let mut g = make_group::<UnitFixture>();
    g.test("none")
        .cases(Vec::<casework_core::ParamRecord>::new())
        .body(|_t| Box::pin(async { Ok(()) }));
    g.validate_all().unwrap();
    let info = g.iter().next().unwrap();
    assert_eq!(info.case_count(), 0);
    assert_eq!(info.cases().count(), 0);
}

#[test]
fn legacy_params_alias_attaches_cases() {
    let mut g = make_group::<UnitFixture>();
    g.test("legacy")
        .params([params! { "mode" => "read" }, params! { "mode" => "write" }])
        .body(|_t| Box::pin(async { Ok(()) }));
    assert_eq!(g.iter().next().unwrap().cases().count(), 2);
}
