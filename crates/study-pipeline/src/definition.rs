//! Study and analysis definition documents.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use study_core::serde::{from_yaml_slice, read_yaml};
use study_core::{describe, kind_of, ConfigMap, ErrorInfo, StudyError};

/// Study definition file inside `<studies_root>/<study>/`.
pub const STUDY_FILE: &str = "study.yaml";
/// Analysis definition file next to the study definition.
pub const ANALYSIS_FILE: &str = "analysis.yaml";
/// Copy of the study definition written at the run root.
pub const STUDY_FROZEN_FILE: &str = "study_frozen.yaml";
/// Copy of the analysis definition written at the run root.
pub const ANALYSIS_FROZEN_FILE: &str = "analysis_frozen.yaml";

const DEFAULT_PLOT_NAME: &str = "plot";
const OPTIONAL_KEYS: [&str; 4] = ["tallies", "observables", "params", "plot"];

/// Declarative description of one simulation study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyDefinition {
    /// Run directory name under the runs root.
    pub name: String,
    /// Registered model type name.
    pub model: String,
    /// Observable entries in normalizer form.
    #[serde(default, alias = "observables")]
    pub tallies: Vec<Value>,
    /// Sweep mapping `name -> value | [values]`.
    #[serde(default)]
    pub params: ConfigMap,
    /// Slice plot requests; see [`StudyDefinition::plots`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<Value>,
}

/// A named slice plot rendered for every case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotRequest {
    /// File stem of the rendered plot.
    pub name: String,
    /// Caller-supplied plot options.
    pub config: ConfigMap,
}

impl StudyDefinition {
    /// Location of a study's definition under `studies_root`.
    pub fn path_for(studies_root: &Path, study: &str) -> PathBuf {
        studies_root.join(study).join(STUDY_FILE)
    }

    /// Reads a definition from disk.
    pub fn load(path: &Path) -> Result<Self, StudyError> {
        let document: Value = read_yaml(path)?;
        Self::from_value(document).map_err(|err| match err {
            StudyError::Config(info) => {
                StudyError::Config(info.with_context("path", path.display().to_string()))
            }
            other => other,
        })
    }

    /// Parses a definition from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, StudyError> {
        let document: Value = from_yaml_slice(text.as_bytes())?;
        Self::from_value(document)
    }

    fn from_value(document: Value) -> Result<Self, StudyError> {
        let mut map = match document {
            Value::Object(map) => map,
            other => {
                return Err(StudyError::Config(ErrorInfo::new(
                    "study_type",
                    format!("study definition must be a mapping, got {}", kind_of(&other)),
                )))
            }
        };
        for key in ["name", "model"] {
            if !map.contains_key(key) {
                return Err(StudyError::Config(ErrorInfo::new(
                    "study_missing_key",
                    format!("study definition is missing required key '{key}'"),
                )));
            }
        }
        map.retain(|key, value| !(value.is_null() && OPTIONAL_KEYS.contains(&key.as_str())));
        serde_json::from_value(Value::Object(map)).map_err(|err| {
            StudyError::Config(ErrorInfo::new("study_invalid", err.to_string()))
        })
    }

    /// Plot requests in declaration order.
    ///
    /// `plot` is either a list of single-key `{name: options}` mappings or one
    /// bare options mapping, which becomes a single plot named `plot`. An
    /// absent (or null) `plot` is the empty mapping: one default plot.
    pub fn plots(&self) -> Result<Vec<PlotRequest>, StudyError> {
        match &self.plot {
            None => Ok(vec![PlotRequest {
                name: DEFAULT_PLOT_NAME.to_string(),
                config: ConfigMap::new(),
            }]),
            Some(Value::Object(options)) => Ok(vec![PlotRequest {
                name: DEFAULT_PLOT_NAME.to_string(),
                config: options.clone(),
            }]),
            Some(Value::Array(items)) => items.iter().map(plot_item).collect(),
            Some(other) => Err(StudyError::Config(
                ErrorInfo::new(
                    "plot_type",
                    format!("plot must be a list or a mapping, got {}", kind_of(other)),
                )
                .with_context("plot", describe(other)),
            )),
        }
    }
}

fn plot_item(item: &Value) -> Result<PlotRequest, StudyError> {
    let malformed = || {
        StudyError::Config(
            ErrorInfo::new(
                "plot_malformed",
                "plot entries must be single-key mappings of name to options",
            )
            .with_context("entry", describe(item)),
        )
    };
    let map = item.as_object().filter(|map| map.len() == 1).ok_or_else(malformed)?;
    let (name, options) = map.iter().next().ok_or_else(malformed)?;
    let config = match options {
        Value::Null => ConfigMap::new(),
        Value::Object(options) => options.clone(),
        _ => return Err(malformed()),
    };
    Ok(PlotRequest {
        name: name.clone(),
        config,
    })
}

/// Metric and artifact entries applied to a finished run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisDefinition {
    /// Observables the run recorded; metric requirements are checked against it.
    #[serde(default)]
    pub available_observables: Vec<String>,
    /// Metric entries in normalizer form.
    #[serde(default)]
    pub metrics: Vec<Value>,
    /// Artifact entries in normalizer form.
    #[serde(default)]
    pub artifacts: Vec<Value>,
}

impl AnalysisDefinition {
    /// Reads a definition from disk.
    pub fn load(path: &Path) -> Result<Self, StudyError> {
        read_yaml(path)
    }

    /// Parses a definition from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, StudyError> {
        from_yaml_slice(text.as_bytes())
    }

    /// Finds the definition of a results directory: the frozen copy if the
    /// run wrote one, else a plain `analysis.yaml`.
    pub fn locate(results_dir: &Path) -> Result<PathBuf, StudyError> {
        [ANALYSIS_FROZEN_FILE, ANALYSIS_FILE]
            .iter()
            .map(|file| results_dir.join(file))
            .find(|path| path.exists())
            .ok_or_else(|| {
                StudyError::Config(
                    ErrorInfo::new("analysis_missing", "no analysis definition found")
                        .with_context("results_dir", results_dir.display().to_string())
                        .with_hint("pass --analysis <path> or add analysis.yaml to the study"),
                )
            })
    }
}
