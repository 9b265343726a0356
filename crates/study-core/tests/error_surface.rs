use std::path::Path;

use study_core::errors::{ErrorInfo, StudyError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("block", "metric:a")
        .with_context("reason", "example")
}

#[test]
fn config_error_surface() {
    let err = StudyError::Config(sample_info("entry_mixed", "mixed instance/config"));
    assert_eq!(err.info().code, "entry_mixed");
    assert!(err.info().context.contains_key("block"));
}

#[test]
fn unknown_plugin_error_surface() {
    let err = StudyError::UnknownPlugin(
        ErrorInfo::new("plugin_unknown", "unknown metric 'x'").with_hint("available: a, b"),
    );
    let text = err.to_string();
    assert!(text.starts_with("unknown plugin: unknown metric 'x'"));
    assert!(text.contains("hint: available: a, b"));
}

#[test]
fn io_helper_records_path() {
    let err = StudyError::io("dir_create", Path::new("runs/demo"), "permission denied");
    assert_eq!(err.info().code, "dir_create");
    assert_eq!(
        err.info().context.get("path").map(String::as_str),
        Some("runs/demo")
    );
    assert!(matches!(err, StudyError::Io(_)));
}

#[test]
fn context_is_rendered_in_key_order() {
    let info = sample_info("R001", "missing");
    assert_eq!(
        info.to_string(),
        "missing (code: R001) | context: [block=metric:a, reason=example]"
    );
}

#[test]
fn errors_roundtrip_through_json() {
    let err = StudyError::Requirement(sample_info("requirement_missing", "missing flux"));
    let json = serde_json::to_string(&err).expect("serialize");
    let back: StudyError = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(err, back);
}
