#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use study_blocks::Model;
use study_core::serde::{read_json, write_json};
use study_core::StudyError;
use study_pipeline::engine::plot_options;
use study_pipeline::{PlotRequest, SimulationEngine};

/// Engine double that records every call and fakes tally output.
///
/// `run` writes a `tallies.json` whose multiplication factor equals the
/// case's `temp` parameter.
#[derive(Default)]
pub struct RecordingEngine {
    pub calls: RefCell<Vec<String>>,
    pub fail_on_run: Option<String>,
}

impl RecordingEngine {
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

fn case_of(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

impl SimulationEngine for RecordingEngine {
    fn export(&self, model: &Model, case_dir: &Path) -> Result<PathBuf, StudyError> {
        self.record(format!("export {}", case_of(case_dir)));
        let path = case_dir.join("model.json");
        write_json(&path, model)?;
        Ok(path)
    }

    fn plot(
        &self,
        _model: &Model,
        plot: &PlotRequest,
        case_dir: &Path,
    ) -> Result<PathBuf, StudyError> {
        self.record(format!("plot {} {}", case_of(case_dir), plot.name));
        let path = case_dir.join(format!("{}.plot.json", plot.name));
        write_json(&path, &plot_options(plot))?;
        Ok(path)
    }

    fn run(&self, case_dir: &Path) -> Result<(), StudyError> {
        let case = case_of(case_dir);
        self.record(format!("run {case}"));
        if self.fail_on_run.as_deref() == Some(case.as_str()) {
            return Err(StudyError::Engine(study_core::ErrorInfo::new(
                "engine_failed",
                "fake engine failure",
            )));
        }
        let params: Value = read_json(&case_dir.join("params.json"))?;
        let temp = params.get("temp").and_then(Value::as_f64).unwrap_or(1.0);
        write_json(
            &case_dir.join("tallies.json"),
            &json!({
                "absorption": [1.0, 1.0],
                "fission": [0.5],
                "nu-fission": [temp * 2.0],
            }),
        )
    }
}

/// Writes `<root>/<study>/study.yaml` and, optionally, `analysis.yaml`.
pub fn write_study(root: &Path, study: &str, yaml: &str, analysis: Option<&str>) {
    let dir = root.join(study);
    fs::create_dir_all(&dir).expect("study dir");
    fs::write(dir.join("study.yaml"), yaml).expect("study yaml");
    if let Some(analysis) = analysis {
        fs::write(dir.join("analysis.yaml"), analysis).expect("analysis yaml");
    }
}
