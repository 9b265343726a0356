use study_core::StudyError;
use study_registry::{Block, BlockMeta};

use crate::context::StudyContext;
use crate::results::ResultsStore;

/// Assembles a deliverable (table, report, figure) from computed metrics.
pub trait ArtifactPlugin: Send + Sync {
    /// Produces the artifact; effects happen on disk.
    fn assemble(
        &self,
        block: &BlockMeta,
        context: &StudyContext,
        results: &ResultsStore,
    ) -> Result<(), StudyError>;
}

/// Configured artifact block.
pub type ArtifactBlock = Block<dyn ArtifactPlugin>;
