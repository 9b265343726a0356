#![deny(missing_docs)]
#![doc = "Run mode and analysis mode of the study driver."]

mod analyze;
pub mod definition;
pub mod engine;
mod run;

pub use analyze::{analyze_definition, analyze_study, AnalysisReport, METRICS_FILE};
pub use definition::{AnalysisDefinition, PlotRequest, StudyDefinition};
pub use engine::{CommandEngine, SimulationEngine};
pub use run::{
    run_definition, run_study, ManifestCase, RunManifest, RunOptions, RunSummary, MANIFEST_FILE,
};
