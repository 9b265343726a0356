use study_registry::{Block, BlockMeta};

use crate::model::{Model, TallySpec};

/// Defines a quantity measured while the engine runs.
pub trait ObservablePlugin: Send + Sync {
    /// Tally specifications for this block, named after the block.
    fn build(&self, block: &BlockMeta) -> Vec<TallySpec>;

    /// Adds the block's tallies to `model`.
    fn attach(&self, block: &BlockMeta, model: &mut Model) {
        model.tallies.extend(self.build(block));
    }
}

/// Configured observable block.
pub type ObservableBlock = Block<dyn ObservablePlugin>;

/// Attaches every block to the model, in block order.
pub fn attach_observables(blocks: &[ObservableBlock], model: &mut Model) {
    for block in blocks {
        block.plugin().attach(block.meta(), model);
    }
}
