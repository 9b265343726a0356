mod common;

use std::fs;

use common::{write_study, RecordingEngine};
use serde_json::{json, Value};
use study_blocks::PluginSet;
use study_core::serde::read_yaml;
use study_core::StudyError;
use study_pipeline::{
    analyze_definition, analyze_study, run_study, AnalysisDefinition, RunOptions,
};

const STUDY: &str = "\
name: tube_bank
model: example_model
tallies: [integral-set]
params:
  temp: [1, 2]
";

const ANALYSIS: &str = "\
available_observables: [absorption, fission, nu-fission]
metrics:
  - case_count
  - multiplication_factor
  - reaction_rates
artifacts:
  - summary_table
  - report
  - k_histogram: {bins: 4}
";

fn run_bank(root: &std::path::Path, analysis: Option<&str>) -> std::path::PathBuf {
    write_study(&root.join("studies"), "bank", STUDY, analysis);
    let options = RunOptions {
        studies_root: root.join("studies"),
        runs_root: root.join("runs"),
        plot_only: false,
    };
    let plugins = PluginSet::builtin().expect("plugins");
    run_study("bank", &options, &plugins, &RecordingEngine::default())
        .expect("run")
        .run_dir
}

#[test]
fn run_then_analyze_with_frozen_definition() {
    let dir = tempfile::tempdir().expect("tempdir");
    let run_dir = run_bank(dir.path(), Some(ANALYSIS));
    let plugins = PluginSet::builtin().expect("plugins");

    let report = analyze_study(&run_dir, None, &plugins).expect("analysis");

    let names: Vec<_> = report.results.names().collect();
    assert_eq!(names, vec!["case_count", "multiplication_factor", "reaction_rates"]);
    assert_eq!(report.results.get("case_count"), Some(&json!(2)));
    let k = report.results.get("multiplication_factor").expect("k");
    assert_eq!(k["cases"]["case_0001"], json!(1.0));
    assert_eq!(k["cases"]["case_0002"], json!(2.0));
    assert_eq!(report.artifacts, vec!["summary_table", "report", "k_histogram"]);

    let written: Value = read_yaml(&report.metrics_path).expect("metrics.yaml");
    assert_eq!(written["case_count"], json!(2));
    assert!(run_dir.join("artifacts/summary.csv").exists());
    assert!(run_dir.join("artifacts/report.md").exists());
    assert!(run_dir.join("artifacts/k_histogram.svg").exists());
}

#[test]
fn metric_requirement_is_checked_before_compute() {
    let dir = tempfile::tempdir().expect("tempdir");
    let plugins = PluginSet::builtin().expect("plugins");
    let definition = AnalysisDefinition::from_yaml_str(
        "available_observables: [absorption]\nmetrics: [case_count, reaction_rates]\n",
    )
    .expect("definition");

    let err = analyze_definition(dir.path(), &definition, &plugins).expect_err("missing fission");

    assert!(matches!(err, StudyError::Requirement(_)));
    assert!(err.to_string().contains("metric 'reaction_rates' missing observables: [fission]"));
    assert!(!dir.path().join("metrics.yaml").exists());
}

#[test]
fn artifact_requirement_is_checked_against_results() {
    let dir = tempfile::tempdir().expect("tempdir");
    let plugins = PluginSet::builtin().expect("plugins");
    let definition =
        AnalysisDefinition::from_yaml_str("metrics: [parameters]\nartifacts: [report]\n")
            .expect("definition");

    let err = analyze_definition(dir.path(), &definition, &plugins).expect_err("no case_count");

    assert!(matches!(err, StudyError::Requirement(_)));
    assert!(err.to_string().contains("artifact 'report' missing results: [case_count]"));
    assert!(dir.path().join("metrics.yaml").exists());
    assert!(!dir.path().join("artifacts/report.md").exists());
}

#[test]
fn named_metric_instances_are_stored_separately() {
    let dir = tempfile::tempdir().expect("tempdir");
    let run_dir = run_bank(dir.path(), None);
    let plugins = PluginSet::builtin().expect("plugins");
    let definition = AnalysisDefinition::from_yaml_str(
        "\
available_observables: [absorption, fission, nu-fission]
metrics:
  - reaction_rates:
      fission_only: {tallies: [fission]}
      both: {}
",
    )
    .expect("definition");

    let report = analyze_definition(&run_dir, &definition, &plugins).expect("analysis");
    let only = report
        .results
        .get("reaction_rates:fission_only")
        .expect("fission only");
    assert_eq!(only["case_0001"], json!({"fission": 0.5}));
    let both = report.results.get("reaction_rates:both").expect("both");
    assert_eq!(both["case_0002"]["absorption"], json!(2.0));
}

#[test]
fn repeated_anonymous_metric_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let plugins = PluginSet::builtin().expect("plugins");
    let definition = AnalysisDefinition::from_yaml_str("metrics: [case_count, case_count]\n")
        .expect("definition");
    let err = analyze_definition(dir.path(), &definition, &plugins).expect_err("duplicate");
    assert_eq!(err.info().code, "results_duplicate");
}

#[test]
fn missing_analysis_definition_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("cases")).expect("cases");
    let plugins = PluginSet::builtin().expect("plugins");
    let err = analyze_study(dir.path(), None, &plugins).expect_err("no definition");
    assert_eq!(err.info().code, "analysis_missing");
}
