mod common;

use common::{write_study, RecordingEngine};
use serde_json::{json, Value};
use study_blocks::PluginSet;
use study_core::serde::{read_json, read_yaml};
use study_core::{hash_bytes, stable_hash_string, StudyError};
use study_pipeline::{run_definition, run_study, RunManifest, RunOptions, StudyDefinition};

const STUDY: &str = "\
name: tube_bank
model: example_model
tallies:
  - integral-set
params:
  temp: [1, 2]
  pressure: 5
plot:
  - top: {basis: xy}
";

fn options(root: &std::path::Path, plot_only: bool) -> RunOptions {
    RunOptions {
        studies_root: root.join("studies"),
        runs_root: root.join("runs"),
        plot_only,
    }
}

#[test]
fn sweep_cases_are_written_and_run_in_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_study(&dir.path().join("studies"), "bank", STUDY, None);
    let plugins = PluginSet::builtin().expect("plugins");
    let engine = RecordingEngine::default();

    let summary =
        run_study("bank", &options(dir.path(), false), &plugins, &engine).expect("run");

    assert_eq!(summary.run_dir, dir.path().join("runs/tube_bank"));
    let cases_dir = summary.run_dir.join("cases");
    let first: Value = read_json(&cases_dir.join("case_0001/params.json")).expect("case 1");
    let second: Value = read_json(&cases_dir.join("case_0002/params.json")).expect("case 2");
    assert_eq!(first, json!({"temp": 1, "pressure": 5}));
    assert_eq!(second, json!({"temp": 2, "pressure": 5}));
    assert_eq!(
        engine.calls(),
        vec![
            "export case_0001",
            "plot case_0001 top",
            "run case_0001",
            "export case_0002",
            "plot case_0002 top",
            "run case_0002",
        ]
    );

    let model: Value = read_json(&cases_dir.join("case_0002/model.json")).expect("model");
    assert_eq!(model["parameters"]["temp"], json!(2));
    assert_eq!(model["parameters"]["N_tubes_z"], json!(10));
    assert_eq!(model["tallies"].as_array().map(Vec::len), Some(3));
}

#[test]
fn study_is_frozen_and_manifest_written() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_study(
        &dir.path().join("studies"),
        "bank",
        STUDY,
        Some("metrics: [case_count]\n"),
    );
    let plugins = PluginSet::builtin().expect("plugins");
    let engine = RecordingEngine::default();
    let summary =
        run_study("bank", &options(dir.path(), false), &plugins, &engine).expect("run");

    let frozen: StudyDefinition =
        read_yaml(&summary.run_dir.join("study_frozen.yaml")).expect("frozen study");
    assert_eq!(frozen.name, "tube_bank");
    assert_eq!(frozen.params["temp"], json!([1, 2]));
    assert!(summary.run_dir.join("analysis_frozen.yaml").exists());

    let manifest: RunManifest =
        read_json(&summary.run_dir.join("run_manifest.json")).expect("manifest");
    assert_eq!(manifest, summary.manifest);
    assert_eq!(manifest.cases.len(), 2);
    assert_eq!(manifest.cases[1].name, "case_0002");
    assert_eq!(manifest.study_hash.len(), 64);
    assert!(!manifest.plot_only);
}

#[test]
fn plot_only_skips_the_engine_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_study(&dir.path().join("studies"), "bank", STUDY, None);
    let plugins = PluginSet::builtin().expect("plugins");
    let engine = RecordingEngine::default();

    run_study("bank", &options(dir.path(), true), &plugins, &engine).expect("run");

    let calls = engine.calls();
    assert_eq!(calls.len(), 4);
    assert!(calls.iter().all(|call| !call.starts_with("run ")));
    let plot: Value = read_json(
        &dir.path()
            .join("runs/tube_bank/cases/case_0001/top.plot.json"),
    )
    .expect("plot request");
    assert_eq!(plot["outline"], json!(false));
    assert_eq!(plot["basis"], json!("xy"));
}

#[test]
fn empty_sweep_runs_a_single_case() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_study(
        &dir.path().join("studies"),
        "single",
        "name: single\nmodel: example_model\n",
        None,
    );
    let plugins = PluginSet::builtin().expect("plugins");
    let engine = RecordingEngine::default();
    let summary =
        run_study("single", &options(dir.path(), false), &plugins, &engine).expect("run");

    assert_eq!(summary.cases.len(), 1);
    let params: Value =
        read_json(&summary.run_dir.join("cases/case_0001/params.json")).expect("params");
    assert_eq!(params, json!({}));
}

#[test]
fn unknown_model_fails_before_any_case() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_study(
        &dir.path().join("studies"),
        "bad",
        "name: bad\nmodel: reactor\n",
        None,
    );
    let plugins = PluginSet::builtin().expect("plugins");
    let engine = RecordingEngine::default();
    let err = run_study("bad", &options(dir.path(), false), &plugins, &engine)
        .expect_err("unknown model");

    assert!(matches!(err, StudyError::UnknownPlugin(_)));
    assert!(err.to_string().contains("Available: example_model"));
    assert!(engine.calls().is_empty());
    assert!(!dir.path().join("runs/bad").exists());
}

#[test]
fn engine_failure_aborts_remaining_cases() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_study(&dir.path().join("studies"), "bank", STUDY, None);
    let plugins = PluginSet::builtin().expect("plugins");
    let engine = RecordingEngine {
        fail_on_run: Some("case_0001".into()),
        ..RecordingEngine::default()
    };
    let err = run_study("bank", &options(dir.path(), false), &plugins, &engine)
        .expect_err("engine failure");

    assert!(matches!(err, StudyError::Engine(_)));
    assert_eq!(engine.calls().last().map(String::as_str), Some("run case_0001"));
    let run_dir = dir.path().join("runs/tube_bank");
    assert!(!run_dir.join("cases/case_0002").exists());
    assert!(!run_dir.join("run_manifest.json").exists());
    assert!(run_dir.join("cases/case_0001/params.json").exists());
}

#[test]
fn frozen_study_is_a_verbatim_copy() {
    let source = "\
# geometry scan for the tube bank
name: annotated
description: geometry scan over tube radius
model: example_model
params:
  tube_radius: [1.5, 2.0]
";
    let dir = tempfile::tempdir().expect("tempdir");
    write_study(&dir.path().join("studies"), "annotated", source, None);
    let plugins = PluginSet::builtin().expect("plugins");
    let engine = RecordingEngine::default();
    let summary =
        run_study("annotated", &options(dir.path(), true), &plugins, &engine).expect("run");

    let frozen =
        std::fs::read_to_string(summary.run_dir.join("study_frozen.yaml")).expect("frozen");
    assert_eq!(frozen, source);
    assert!(frozen.contains("description: geometry scan"));
    assert_eq!(summary.manifest.study_hash, hash_bytes(source.as_bytes()));
}

#[test]
fn in_memory_definition_is_frozen_by_serialization() {
    let dir = tempfile::tempdir().expect("tempdir");
    let definition = StudyDefinition::from_yaml_str("name: inline\nmodel: example_model\n")
        .expect("definition");
    let plugins = PluginSet::builtin().expect("plugins");
    let engine = RecordingEngine::default();
    let summary = run_definition(&definition, None, &options(dir.path(), true), &plugins, &engine)
        .expect("run");

    let frozen: StudyDefinition =
        read_yaml(&summary.run_dir.join("study_frozen.yaml")).expect("frozen");
    assert_eq!(frozen, definition);
    assert_eq!(
        summary.manifest.study_hash,
        stable_hash_string(&definition).expect("hash")
    );
}

#[test]
fn study_without_plot_key_renders_default_plot() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_study(
        &dir.path().join("studies"),
        "plain",
        "name: plain\nmodel: example_model\nparams:\n  temp: [1, 2]\n",
        None,
    );
    let plugins = PluginSet::builtin().expect("plugins");
    let engine = RecordingEngine::default();
    run_study("plain", &options(dir.path(), true), &plugins, &engine).expect("run");

    assert_eq!(
        engine.calls(),
        vec![
            "export case_0001",
            "plot case_0001 plot",
            "export case_0002",
            "plot case_0002 plot",
        ]
    );
    let plot: Value = read_json(&dir.path().join("runs/plain/cases/case_0002/plot.plot.json"))
        .expect("plot request");
    assert_eq!(plot["outline"], json!(false));
    assert!(plot["colors"].is_object());
}
