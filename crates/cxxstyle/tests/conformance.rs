//! End-to-end conformance tests for the default pipeline.
//!
//! Each test feeds C++ fixtures through the full rule set and checks
//! the guide-level behavior: which rule fires, how often, and how the
//! engine-level plumbing (ordering, dedup, overrides, suppression,
//! cancellation, unreadable files) shapes the final report.

use std::path::PathBuf;

use cxxstyle::rules::{IdentifierCase, Preset};
use cxxstyle::{CancelFlag, CheckResult, Checker, Config, Diagnostic, Severity, SourceFile};

fn run(source: &str) -> CheckResult {
    cxxstyle::check_sources(&[SourceFile::new("unit.cpp", source)]).unwrap()
}

fn with_code<'a>(result: &'a CheckResult, code: &str) -> Vec<&'a Diagnostic> {
    result
        .diagnostics
        .iter()
        .filter(|d| d.code == code)
        .collect()
}

#[test]
fn namespace_word_repetition_is_reported_once() {
    let result = run("namespace kmx::gis::gis_data {}\n");
    let hits = with_code(&result, "CS202");
    assert_eq!(hits.len(), 1);
    assert!(hits[0].message.contains("`gis`"));
}

#[test]
fn distinct_namespace_words_pass() {
    let result = run("namespace kmx::gis::coordinate {}\n");
    assert!(with_code(&result, "CS202").is_empty());
}

#[test]
fn anonymous_namespace_is_reported() {
    let result = run("namespace\n{\nvoid helper() noexcept;\n}\n");
    assert_eq!(with_code(&result, "CS201").len(), 1);
    // An anonymous namespace never enters the project-wide path table.
    assert!(with_code(&result, "CS202").is_empty());
}

#[test]
fn each_missing_doc_tag_is_a_separate_diagnostic() {
    // @brief only: two missing @param plus one missing @return.
    let result = run("/// @brief Adds.\nint add(int lhs, int rhs) noexcept;\n");
    let hits = with_code(&result, "CS501");
    assert_eq!(hits.len(), 3);
    let params = hits
        .iter()
        .filter(|d| d.message.contains("`@param`"))
        .count();
    let returns = hits
        .iter()
        .filter(|d| d.message.contains("`@return`"))
        .count();
    assert_eq!((params, returns), (2, 1));
}

#[test]
fn braced_single_statement_body_is_the_only_finding() {
    let code = "/// @brief Fires when ready.\n/// @param ready Whether to fire.\nvoid fire_if_ready(const bool ready) noexcept\n{\n    if (ready)\n    {\n        fire();\n    }\n}\n";
    let result = run(code);
    assert_eq!(result.diagnostics.len(), 1, "{:?}", result.diagnostics);
    assert_eq!(result.diagnostics[0].code, "CS402");
}

#[test]
fn multi_statement_scope_brace_must_be_alone() {
    let code = "/// @brief Runs both steps.\nvoid run_steps() noexcept {\n    step_one();\n    step_two();\n}\n";
    let result = run(code);
    assert_eq!(result.diagnostics.len(), 1, "{:?}", result.diagnostics);
    assert_eq!(result.diagnostics[0].code, "CS401");
}

#[test]
fn repeated_runs_yield_identical_reports() {
    let code = "namespace Data\n{\nusing Row = int;\nvoid Process(int Count);\n}\n";
    let checker = cxxstyle::checker(Preset::Strict, Config::default()).unwrap();
    let sources = [SourceFile::new("unit.cpp", code)];

    let key = |result: &CheckResult| -> Vec<(String, usize, usize, String)> {
        result
            .diagnostics
            .iter()
            .map(|d| {
                (
                    d.code.clone(),
                    d.location.line,
                    d.location.column,
                    d.message.clone(),
                )
            })
            .collect()
    };

    let first = checker.check_sources(&sources);
    let second = checker.check_sources(&sources);
    assert!(!first.diagnostics.is_empty());
    assert_eq!(key(&first), key(&second));
}

#[test]
fn duplicate_rule_registrations_collapse() {
    let checker = Checker::builder()
        .rule(IdentifierCase::new())
        .rule(IdentifierCase::new())
        .build()
        .unwrap();
    let result = checker.check_sources(&[SourceFile::new("unit.cpp", "int BadName = 0;\n")]);
    assert_eq!(with_code(&result, "CS101").len(), 1);
}

#[test]
fn severity_override_applies_to_report() {
    let config = Config::parse("[severity_overrides]\nCS201 = \"warning\"\n").unwrap();
    let checker = cxxstyle::checker(Preset::Recommended, config).unwrap();
    let result = checker.check_sources(&[SourceFile::new(
        "unit.cpp",
        "namespace\n{\nvoid helper() noexcept;\n}\n",
    )]);

    let hits = with_code(&result, "CS201");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].severity, Severity::Warning);
}

#[test]
fn disabled_rules_stay_silent() {
    let config = Config::parse("rules = [\"identifier-case\"]\n").unwrap();
    let checker = cxxstyle::checker(Preset::Recommended, config).unwrap();
    let result = checker.check_sources(&[SourceFile::new(
        "unit.cpp",
        "namespace\n{\nint BadName = 0;\n}\n",
    )]);

    assert!(!with_code(&result, "CS101").is_empty());
    assert!(with_code(&result, "CS201").is_empty());
}

#[test]
fn allow_comment_suppresses_the_flagged_line_only() {
    // The blank line keeps the second alias out of the directive's
    // one-line reach.
    let code = "using BadAlias = int; // cxxstyle: allow(identifier-case, type-alias-suffix)\n\nusing OtherAlias = int;\n";
    let result = run(code);

    let cs101 = with_code(&result, "CS101");
    assert_eq!(cs101.len(), 1);
    assert_eq!(cs101[0].location.line, 3);
    assert_eq!(with_code(&result, "CS102").len(), 1);
}

#[test]
fn allow_comment_accepts_rule_codes() {
    let result = run("int BadName = 0; // cxxstyle: allow(CS101)\n");
    assert!(with_code(&result, "CS101").is_empty());
}

#[test]
fn cancelled_batch_reports_interruption() {
    let flag = CancelFlag::new();
    flag.cancel();

    let mut builder = Checker::builder().cancel_flag(flag);
    for rule in cxxstyle::rules::all_rules() {
        builder = builder.rule_box(rule);
    }
    let checker = builder.build().unwrap();

    let result = checker.check_sources(&[SourceFile::new("unit.cpp", "int BadName = 0;\n")]);
    assert!(result.interrupted);
    assert_eq!(result.files_checked, 0);
    assert!(result.diagnostics.is_empty());
}

#[test]
fn unreadable_file_becomes_a_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("gone.cpp");

    let result = cxxstyle::check_paths(&[missing.clone()]).unwrap();
    let hits = with_code(&result, "CS001");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].location.file, missing);
    assert_eq!(result.files_checked, 0);
}

#[test]
fn non_utf8_file_becomes_a_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latin1.cpp");
    std::fs::write(&path, b"int caf\xe9 = 0;\n").unwrap();

    let result = cxxstyle::check_paths(&[path]).unwrap();
    assert_eq!(with_code(&result, "CS001").len(), 1);
}

#[test]
fn unparseable_region_degrades_to_a_warning() {
    let result = run("}\n");
    let hits = with_code(&result, "CS002");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].severity, Severity::Warning);
}

#[test]
fn diagnostics_are_ordered_by_file_then_position() {
    let sources = [
        SourceFile::new("b.cpp", "using Alias = int;\n"),
        SourceFile::new("a.cpp", "int BadName = 0;\n"),
    ];
    let result = cxxstyle::check_sources(&sources).unwrap();
    assert_eq!(result.files_checked, 2);
    assert!(!result.diagnostics.is_empty());

    let keys: Vec<(PathBuf, usize, usize, String)> = result
        .diagnostics
        .iter()
        .map(|d| {
            (
                d.location.file.clone(),
                d.location.line,
                d.location.column,
                d.code.clone(),
            )
        })
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}
