use study_core::StudyError;
use study_registry::Registry;

use crate::artifact::ArtifactPlugin;
use crate::builtin;
use crate::metric::MetricPlugin;
use crate::model::ModelPlugin;
use crate::observable::ObservablePlugin;

/// The four plugin registries a study run resolves names against.
///
/// A set is populated once, before any definition is normalized, and is
/// only handed out by shared reference afterwards.
#[derive(Debug)]
pub struct PluginSet {
    /// Simulation models, looked up by the study's `model` key.
    pub models: Registry<dyn ModelPlugin>,
    /// Observable/tally definitions for the study's `tallies` entries.
    pub observables: Registry<dyn ObservablePlugin>,
    /// Derived metrics for the analysis `metrics` entries.
    pub metrics: Registry<dyn MetricPlugin>,
    /// Output artifacts for the analysis `artifacts` entries.
    pub artifacts: Registry<dyn ArtifactPlugin>,
}

impl PluginSet {
    /// Creates a set with four empty registries.
    pub fn empty() -> Self {
        Self {
            models: Registry::new("model"),
            observables: Registry::new("observable"),
            metrics: Registry::new("metric"),
            artifacts: Registry::new("artifact"),
        }
    }

    /// Creates a set holding every built-in plugin.
    pub fn builtin() -> Result<Self, StudyError> {
        let mut set = Self::empty();
        builtin::register_all(&mut set)?;
        Ok(set)
    }
}

/// Loading phase run once at start-up; returns the immutable plugin set.
pub fn load_plugins() -> Result<PluginSet, StudyError> {
    PluginSet::builtin()
}
