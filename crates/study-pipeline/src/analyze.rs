use std::path::{Path, PathBuf};

use serde::Serialize;
use study_blocks::{PluginSet, ResultsStore, StudyContext};
use study_core::serde::write_yaml;
use study_core::StudyError;
use study_registry::{check_requirements, normalize, Stage};
use tracing::info;

use crate::definition::AnalysisDefinition;

/// Metric results written at the results root between the two phases.
pub const METRICS_FILE: &str = "metrics.yaml";

/// Outcome of an analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Metric values in computation order.
    pub results: ResultsStore,
    /// Qualified names of the artifacts assembled, in order.
    pub artifacts: Vec<String>,
    /// Location of the written metric results.
    pub metrics_path: PathBuf,
}

/// Analyses `results_dir` using `analysis`, or the definition found there.
pub fn analyze_study(
    results_dir: &Path,
    analysis: Option<&Path>,
    plugins: &PluginSet,
) -> Result<AnalysisReport, StudyError> {
    let path = match analysis {
        Some(path) => path.to_path_buf(),
        None => AnalysisDefinition::locate(results_dir)?,
    };
    let definition = AnalysisDefinition::load(&path)?;
    analyze_definition(results_dir, &definition, plugins)
}

/// Computes every metric, writes `metrics.yaml`, then assembles every artifact.
pub fn analyze_definition(
    results_dir: &Path,
    definition: &AnalysisDefinition,
    plugins: &PluginSet,
) -> Result<AnalysisReport, StudyError> {
    let context = StudyContext::scan(results_dir)?;
    info!(
        results = %results_dir.display(),
        cases = context.cases().len(),
        "analysing study"
    );

    let mut results = ResultsStore::new();
    for block in normalize(&definition.metrics, &plugins.metrics)? {
        check_requirements(&block, definition.available_observables.as_slice(), Stage::Metric)?;
        info!("[metric] {}", block.name());
        let value = block.plugin().compute(block.meta(), &context)?;
        results.insert(block.name(), value)?;
    }
    let metrics_path = results_dir.join(METRICS_FILE);
    write_yaml(&metrics_path, &results)?;

    let mut artifacts = Vec::new();
    for block in normalize(&definition.artifacts, &plugins.artifacts)? {
        check_requirements(&block, &results, Stage::Artifact)?;
        info!("[artifact] {}", block.name());
        block.plugin().assemble(block.meta(), &context, &results)?;
        artifacts.push(block.name().to_string());
    }
    Ok(AnalysisReport {
        results,
        artifacts,
        metrics_path,
    })
}
