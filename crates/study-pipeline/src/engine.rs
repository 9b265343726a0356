//! Boundary to the external simulation engine.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::{json, Value};
use study_blocks::Model;
use study_core::serde::write_json;
use study_core::{merge_shallow, ConfigMap, ErrorInfo, StudyError};
use tracing::debug;

use crate::definition::PlotRequest;

/// Engine input written into every case directory.
pub const MODEL_FILE: &str = "model.json";
/// Suffix of the plot request files handed to the engine.
pub const PLOT_SUFFIX: &str = ".plot.json";

const PASTEL_PALETTE: [[u8; 3]; 10] = [
    [161, 201, 244],
    [255, 180, 130],
    [141, 229, 161],
    [255, 159, 155],
    [208, 187, 255],
    [222, 187, 155],
    [250, 176, 228],
    [207, 207, 207],
    [255, 254, 163],
    [185, 242, 240],
];

/// Options every plot request carries: no outlines and a pastel colour per
/// material id, starting at `-1` for void.
pub fn plot_defaults() -> ConfigMap {
    let mut colors = ConfigMap::new();
    for (idx, rgb) in PASTEL_PALETTE.iter().enumerate() {
        colors.insert((idx as i64 - 1).to_string(), json!(rgb));
    }
    let mut defaults = ConfigMap::new();
    defaults.insert("outline".into(), Value::Bool(false));
    defaults.insert("colors".into(), Value::Object(colors));
    defaults
}

/// Caller options with the plot defaults applied on top.
pub fn plot_options(plot: &PlotRequest) -> ConfigMap {
    merge_shallow(&plot.config, &plot_defaults())
}

/// Operations the run mode needs from a simulation engine. Every call blocks
/// until the engine is done with the case.
pub trait SimulationEngine {
    /// Serializes the model into the engine's input format inside `case_dir`.
    fn export(&self, model: &Model, case_dir: &Path) -> Result<PathBuf, StudyError>;

    /// Renders one slice plot of the exported model.
    fn plot(&self, model: &Model, plot: &PlotRequest, case_dir: &Path)
        -> Result<PathBuf, StudyError>;

    /// Runs the simulation with `case_dir` as working directory.
    fn run(&self, case_dir: &Path) -> Result<(), StudyError>;
}

/// Engine driven through an external executable.
///
/// The model is exported as `model.json`; plots are requested by writing
/// `<name>.plot.json` and invoking `<program> --plot <file>`; simulations by
/// invoking `<program>` with no arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEngine {
    program: PathBuf,
}

impl CommandEngine {
    /// Creates an engine that invokes `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Executable being invoked.
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn invoke(&self, case_dir: &Path, args: &[&str]) -> Result<(), StudyError> {
        debug!(
            program = %self.program.display(),
            ?args,
            dir = %case_dir.display(),
            "invoking engine"
        );
        let status = Command::new(&self.program)
            .args(args)
            .current_dir(case_dir)
            .status()
            .map_err(|err| {
                StudyError::Engine(
                    ErrorInfo::new("engine_spawn", format!("failed to start engine: {err}"))
                        .with_context("program", self.program.display().to_string())
                        .with_hint("check --engine or put the engine executable on PATH"),
                )
            })?;
        if !status.success() {
            return Err(StudyError::Engine(
                ErrorInfo::new("engine_failed", format!("engine exited with {status}"))
                    .with_context("program", self.program.display().to_string())
                    .with_context("case_dir", case_dir.display().to_string()),
            ));
        }
        Ok(())
    }
}

impl SimulationEngine for CommandEngine {
    fn export(&self, model: &Model, case_dir: &Path) -> Result<PathBuf, StudyError> {
        let path = case_dir.join(MODEL_FILE);
        write_json(&path, model)?;
        Ok(path)
    }

    fn plot(
        &self,
        _model: &Model,
        plot: &PlotRequest,
        case_dir: &Path,
    ) -> Result<PathBuf, StudyError> {
        let file = format!("{}{PLOT_SUFFIX}", plot.name);
        let request = json!({
            "name": plot.name,
            "model": MODEL_FILE,
            "options": plot_options(plot),
        });
        write_json(&case_dir.join(&file), &request)?;
        self.invoke(case_dir, &["--plot", &file])?;
        Ok(case_dir.join(&plot.name))
    }

    fn run(&self, case_dir: &Path) -> Result<(), StudyError> {
        self.invoke(case_dir, &[])
    }
}
