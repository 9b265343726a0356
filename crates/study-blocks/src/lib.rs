#![deny(missing_docs)]
#![doc = "Plugin families (models, observables, metrics, artifacts), the study context and the built-in plugin set."]

mod artifact;
pub mod builtin;
pub mod context;
mod metric;
mod model;
mod observable;
mod plugins;
mod results;

pub use artifact::{ArtifactBlock, ArtifactPlugin};
pub use context::{CaseRecord, StudyContext, TallyOutput};
pub use metric::{MetricBlock, MetricPlugin};
pub use model::{Model, ModelBlock, ModelPlugin, TallySpec};
pub use observable::{attach_observables, ObservableBlock, ObservablePlugin};
pub use plugins::{load_plugins, PluginSet};
pub use results::ResultsStore;
