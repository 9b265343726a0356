use serde::{Deserialize, Serialize};
use study_core::{ConfigMap, Params, StudyError};
use study_registry::{Block, BlockMeta};

/// Engine-neutral description of one case's simulation model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// Model plugin type that produced the description.
    pub kind: String,
    /// Model parameters after overlaying the case assignment on the defaults.
    pub parameters: Params,
    /// Run settings forwarded to the engine (batches, particles, seed, ...).
    #[serde(default)]
    pub settings: ConfigMap,
    /// Tallies attached by observable blocks, in attachment order.
    #[serde(default)]
    pub tallies: Vec<TallySpec>,
}

impl Model {
    /// Creates an empty model of the given kind.
    pub fn new(kind: impl Into<String>, parameters: Params) -> Self {
        Self {
            kind: kind.into(),
            parameters,
            settings: ConfigMap::new(),
            tallies: Vec::new(),
        }
    }
}

/// A single tally request understood by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TallySpec {
    /// Tally name, used to find its means in the engine output.
    pub name: String,
    /// Scores accumulated by the tally.
    pub scores: Vec<String>,
    /// Extra options copied from the observable block configuration.
    #[serde(default, skip_serializing_if = "ConfigMap::is_empty")]
    pub options: ConfigMap,
}

/// Builds the simulation model for one concrete parameter assignment.
pub trait ModelPlugin: Send + Sync {
    /// Produces the model; `block` carries the plugin's default parameters.
    fn build(&self, block: &BlockMeta, params: &Params) -> Result<Model, StudyError>;
}

/// Configured model block.
pub type ModelBlock = Block<dyn ModelPlugin>;
