use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use study_blocks::context::{CASES_DIR, PARAMS_FILE};
use study_blocks::{attach_observables, ModelBlock, ObservableBlock, PluginSet};
use study_core::serde::{write_json, write_yaml};
use study_core::{hash_bytes, stable_hash_string, Params, StudyError};
use study_registry::normalize;
use study_sweep::{plan_cases, Case};
use tracing::{debug, info};

use crate::definition::{
    PlotRequest, StudyDefinition, ANALYSIS_FILE, ANALYSIS_FROZEN_FILE, STUDY_FROZEN_FILE,
};
use crate::engine::SimulationEngine;

/// Provenance record written at the run root after the case loop.
pub const MANIFEST_FILE: &str = "run_manifest.json";

/// Where studies are read from and run directories are created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Directory holding `<study>/study.yaml`.
    pub studies_root: PathBuf,
    /// Directory run directories are created in.
    pub runs_root: PathBuf,
    /// Export and plot every case without running the engine.
    pub plot_only: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            studies_root: PathBuf::from("studies"),
            runs_root: PathBuf::from("runs"),
            plot_only: false,
        }
    }
}

/// Case entry of a [`RunManifest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestCase {
    /// Case directory name.
    pub name: String,
    /// Parameter assignment of the case.
    pub params: Params,
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    /// Study name.
    pub study: String,
    /// Model type name.
    pub model: String,
    /// SHA-256 of the frozen study definition.
    pub study_hash: String,
    /// RFC 3339 timestamp of manifest creation.
    pub created_at: String,
    /// Whether the engine was skipped.
    pub plot_only: bool,
    /// Executed cases in order.
    pub cases: Vec<ManifestCase>,
}

/// Outcome of [`run_study`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Run directory `<runs_root>/<name>`.
    pub run_dir: PathBuf,
    /// Cases in execution order.
    pub cases: Vec<Case>,
    /// Manifest written at the run root.
    pub manifest: RunManifest,
}

/// Loads `<studies_root>/<study>/study.yaml` and runs it.
pub fn run_study(
    study: &str,
    options: &RunOptions,
    plugins: &PluginSet,
    engine: &dyn SimulationEngine,
) -> Result<RunSummary, StudyError> {
    let path = StudyDefinition::path_for(&options.studies_root, study);
    let definition = StudyDefinition::load(&path)?;
    let analysis = path
        .parent()
        .map(|dir| dir.join(ANALYSIS_FILE))
        .filter(|candidate| candidate.exists());
    execute(
        &definition,
        Some(&path),
        analysis.as_deref(),
        options,
        plugins,
        engine,
    )
}

/// Runs every case of an already loaded definition.
///
/// Without a source file the frozen study is the re-serialized definition.
/// `analysis` is an analysis definition frozen next to the study when given.
/// Any failure aborts the run; cases already written stay on disk.
pub fn run_definition(
    definition: &StudyDefinition,
    analysis: Option<&Path>,
    options: &RunOptions,
    plugins: &PluginSet,
    engine: &dyn SimulationEngine,
) -> Result<RunSummary, StudyError> {
    execute(definition, None, analysis, options, plugins, engine)
}

fn execute(
    definition: &StudyDefinition,
    source: Option<&Path>,
    analysis: Option<&Path>,
    options: &RunOptions,
    plugins: &PluginSet,
    engine: &dyn SimulationEngine,
) -> Result<RunSummary, StudyError> {
    let model = plugins.models.lookup(&definition.model)?.instantiate();
    let observables = normalize(&definition.tallies, &plugins.observables)?;
    let plots = definition.plots()?;

    let run_dir = options.runs_root.join(&definition.name);
    let cases_dir = run_dir.join(CASES_DIR);
    fs::create_dir_all(&cases_dir).map_err(|err| StudyError::io("run_dir", &cases_dir, err))?;
    let study_hash = freeze_study(definition, source, &run_dir.join(STUDY_FROZEN_FILE))?;
    if let Some(analysis) = analysis {
        let frozen = run_dir.join(ANALYSIS_FROZEN_FILE);
        fs::copy(analysis, &frozen)
            .map_err(|err| StudyError::io("analysis_freeze", analysis, err))?;
    }

    let cases = plan_cases(&definition.params);
    info!(
        study = %definition.name,
        model = %definition.model,
        cases = cases.len(),
        plot_only = options.plot_only,
        "running study"
    );
    for case in &cases {
        run_case(
            case,
            &cases_dir,
            &model,
            &observables,
            &plots,
            options.plot_only,
            engine,
        )?;
    }

    let manifest = RunManifest {
        study: definition.name.clone(),
        model: definition.model.clone(),
        study_hash,
        created_at: chrono::Utc::now().to_rfc3339(),
        plot_only: options.plot_only,
        cases: cases
            .iter()
            .map(|case| ManifestCase {
                name: case.name.clone(),
                params: case.params.clone(),
            })
            .collect(),
    };
    write_json(&run_dir.join(MANIFEST_FILE), &manifest)?;
    info!(run_dir = %run_dir.display(), "run complete");
    Ok(RunSummary {
        run_dir,
        cases,
        manifest,
    })
}

/// Writes the frozen study and returns its content hash. A source file is
/// copied verbatim and hashed as bytes.
fn freeze_study(
    definition: &StudyDefinition,
    source: Option<&Path>,
    frozen: &Path,
) -> Result<String, StudyError> {
    match source {
        Some(source) => {
            let bytes = fs::read(source).map_err(|err| StudyError::io("study_read", source, err))?;
            fs::write(frozen, &bytes).map_err(|err| StudyError::io("study_freeze", frozen, err))?;
            Ok(hash_bytes(&bytes))
        }
        None => {
            write_yaml(frozen, definition)?;
            stable_hash_string(definition)
        }
    }
}

fn run_case(
    case: &Case,
    cases_dir: &Path,
    model_block: &ModelBlock,
    observables: &[ObservableBlock],
    plots: &[PlotRequest],
    plot_only: bool,
    engine: &dyn SimulationEngine,
) -> Result<(), StudyError> {
    let case_dir = case.dir(cases_dir);
    fs::create_dir_all(&case_dir).map_err(|err| StudyError::io("case_dir", &case_dir, err))?;
    write_json(&case_dir.join(PARAMS_FILE), &case.params)?;

    let mut model = model_block
        .plugin()
        .build(model_block.meta(), &case.params)?;
    attach_observables(observables, &mut model);
    engine.export(&model, &case_dir)?;
    for plot in plots {
        engine.plot(&model, plot, &case_dir)?;
    }
    if plot_only {
        debug!(case = %case.name, "plot only, engine skipped");
        return Ok(());
    }
    info!(case = %case.name, "running engine");
    engine.run(&case_dir)
}
