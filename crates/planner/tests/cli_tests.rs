use std::fs;

use clap::Parser;
use keyplate_planner::{Args, CliError, run};
use layout_format::LoadError;

const LAYOUT: &str = r#"[{"name": "Mini"}, ["Q", "W", "E", "R"], ["A", "S", "D", "F"]]"#;

fn args(dir: &std::path::Path, extra: &[&str]) -> Args {
    let input = dir.join("mini.json");
    let out = dir.join("out");
    let mut argv = vec![
        "keyplate".to_string(),
        "-i".into(),
        input.display().to_string(),
        "-o".into(),
        out.display().to_string(),
    ];
    argv.extend(extra.iter().map(|s| s.to_string()));
    Args::try_parse_from(argv).unwrap()
}

fn setup(params: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("mini.json"), LAYOUT).unwrap();
    fs::write(dir.path().join("params.json"), params).unwrap();
    dir
}

#[test]
fn whole_board_writes_one_plan() {
    let dir = setup("{}");
    let written = run(&args(dir.path(), &[])).unwrap();
    assert_eq!(written.len(), 1);
    assert!(written[0].ends_with("mini_plan.json"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&written[0]).unwrap()).unwrap();
    assert_eq!(json["name"], "Mini");
    assert_eq!(json["section_count"], 1);
}

#[test]
fn every_section_writes_a_plan_each() {
    let dir = setup(r#"{"x_build_size": 45}"#);
    let params = dir.path().join("params.json").display().to_string();
    let written = run(&args(dir.path(), &["-p", &params, "-s", "-2"])).unwrap();
    assert_eq!(written.len(), 2);
    assert!(written[0].ends_with("mini_section_0_plan.json"));
    assert!(written[1].ends_with("mini_section_1_plan.json"));
}

#[test]
fn bad_parameters_fail() {
    let dir = setup(r#"{"screw_count": 3}"#);
    let params = dir.path().join("params.json").display().to_string();
    let err = run(&args(dir.path(), &["-p", &params])).unwrap_err();
    assert!(matches!(err, CliError::Load(LoadError::Config(_))));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn out_of_range_section_fails() {
    let dir = setup("{}");
    let err = run(&args(dir.path(), &["-s", "5"])).unwrap_err();
    assert!(matches!(err, CliError::UnknownSection { index: 5, count: 1 }));
    assert_eq!(err.exit_code(), 2);
}
