use serde_json::Value;
use study_core::StudyError;
use study_registry::{Block, BlockMeta};

use crate::context::StudyContext;

/// Computes a derived result from the raw outputs of a study's cases.
pub trait MetricPlugin: Send + Sync {
    /// Returns the value stored under the block's qualified name.
    fn compute(&self, block: &BlockMeta, context: &StudyContext) -> Result<Value, StudyError>;
}

/// Configured metric block.
pub type MetricBlock = Block<dyn MetricPlugin>;
