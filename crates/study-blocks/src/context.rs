//! Read-only view over a study's results directory.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use study_core::serde::read_json;
use study_core::{ErrorInfo, Params, StudyError};

/// Per-case parameter record written by the run mode.
pub const PARAMS_FILE: &str = "params.json";
/// Engine-neutral tally means written next to the raw engine output.
pub const TALLY_OUTPUT_FILE: &str = "tallies.json";
/// Glob matched against case directories to find the raw engine output.
pub const DEFAULT_OUTPUT_PATTERN: &str = "statepoint*";
/// Subdirectory of a study's results holding the case directories.
pub const CASES_DIR: &str = "cases";
/// Subdirectory of a study's results that artifacts write into.
pub const ARTIFACTS_DIR: &str = "artifacts";

/// One completed case discovered under `cases/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseRecord {
    /// Directory name, e.g. `case_0003`.
    pub name: String,
    /// Case working directory.
    pub dir: PathBuf,
    /// Path of the recorded parameter assignment.
    pub params_path: PathBuf,
    /// Recorded parameter assignment.
    pub params: Params,
    /// Raw engine output, when the engine produced one.
    pub output: Option<PathBuf>,
}

impl CaseRecord {
    /// Loads the case stored in `dir`.
    pub fn load(dir: &Path, output_pattern: &str) -> Result<Self, StudyError> {
        let name = dir
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let params_path = dir.join(PARAMS_FILE);
        let params: Params = read_json(&params_path)?;
        let output = find_output(dir, output_pattern)?;
        Ok(Self {
            name,
            dir: dir.to_path_buf(),
            params_path,
            params,
            output,
        })
    }

    /// Reads the tally means the engine reported for this case.
    pub fn tally_output(&self) -> Result<TallyOutput, StudyError> {
        let path = self.dir.join(TALLY_OUTPUT_FILE);
        if !path.exists() {
            return Err(StudyError::Engine(
                ErrorInfo::new("tally_output_missing", "case has no tally output")
                    .with_context("case", self.name.clone())
                    .with_context("path", path.display().to_string())
                    .with_hint("run the study without --plot before analysing it"),
            ));
        }
        let means: IndexMap<String, Vec<f64>> = read_json(&path)?;
        Ok(TallyOutput {
            case: self.name.clone(),
            means,
        })
    }
}

/// Tally means of one case, keyed by tally name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TallyOutput {
    case: String,
    means: IndexMap<String, Vec<f64>>,
}

impl TallyOutput {
    /// Builds an output from in-memory means.
    pub fn new(case: impl Into<String>, means: IndexMap<String, Vec<f64>>) -> Self {
        Self {
            case: case.into(),
            means,
        }
    }

    /// Mean values of the named tally.
    pub fn mean(&self, tally: &str) -> Result<&[f64], StudyError> {
        self.means.get(tally).map(Vec::as_slice).ok_or_else(|| {
            StudyError::Engine(
                ErrorInfo::new(
                    "tally_missing",
                    format!("tally '{tally}' not found in case output"),
                )
                .with_context("case", self.case.clone())
                .with_context(
                    "tallies",
                    self.means.keys().cloned().collect::<Vec<_>>().join(", "),
                ),
            )
        })
    }

    /// Sum of the named tally's means.
    pub fn total(&self, tally: &str) -> Result<f64, StudyError> {
        Ok(self.mean(tally)?.iter().sum())
    }
}

/// Read-only view of a study's results: the completed cases in name order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyContext {
    study_dir: PathBuf,
    cases_dir: PathBuf,
    cases: Vec<CaseRecord>,
}

impl StudyContext {
    /// Scans `study_dir/cases` using the default output pattern.
    pub fn scan(study_dir: &Path) -> Result<Self, StudyError> {
        Self::scan_with_pattern(study_dir, DEFAULT_OUTPUT_PATTERN)
    }

    /// Scans `study_dir/cases`, keeping directories with a parameter record.
    pub fn scan_with_pattern(study_dir: &Path, output_pattern: &str) -> Result<Self, StudyError> {
        let cases_dir = study_dir.join(CASES_DIR);
        let mut dirs = Vec::new();
        if cases_dir.exists() {
            let entries = fs::read_dir(&cases_dir)
                .map_err(|err| StudyError::io("cases_read", &cases_dir, err))?;
            for entry in entries {
                let entry = entry.map_err(|err| StudyError::io("cases_read", &cases_dir, err))?;
                let path = entry.path();
                if path.is_dir() && path.join(PARAMS_FILE).exists() {
                    dirs.push(path);
                }
            }
        }
        dirs.sort();
        let cases = dirs
            .iter()
            .map(|dir| CaseRecord::load(dir, output_pattern))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            study_dir: study_dir.to_path_buf(),
            cases_dir,
            cases,
        })
    }

    /// Root of the study's results.
    pub fn study_dir(&self) -> &Path {
        &self.study_dir
    }

    /// Directory holding the case subdirectories.
    pub fn cases_dir(&self) -> &Path {
        &self.cases_dir
    }

    /// Completed cases in name order.
    pub fn cases(&self) -> &[CaseRecord] {
        &self.cases
    }

    /// Location for an artifact file under the study's artifact directory.
    pub fn artifact_path(&self, file: &str) -> PathBuf {
        self.study_dir.join(ARTIFACTS_DIR).join(file)
    }
}

fn find_output(dir: &Path, pattern: &str) -> Result<Option<PathBuf>, StudyError> {
    let full = dir.join(pattern);
    let paths = glob::glob(&full.to_string_lossy()).map_err(|err| {
        StudyError::Config(
            ErrorInfo::new("output_pattern", err.to_string()).with_context("pattern", pattern),
        )
    })?;
    let mut matches: Vec<PathBuf> = paths.filter_map(Result::ok).collect();
    matches.sort();
    Ok(matches.into_iter().next())
}
