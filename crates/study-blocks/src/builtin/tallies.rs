use study_core::StudyError;
use study_registry::{BlockMeta, PluginDescriptor, Registry};

use crate::model::TallySpec;
use crate::observable::ObservablePlugin;

/// Scores bundled by the `integral-set` observable.
pub const INTEGRAL_SCORES: [&str; 3] = ["absorption", "fission", "nu-fission"];

/// Single-score tally named after its block.
struct ScoreTally {
    score: &'static str,
}

impl ObservablePlugin for ScoreTally {
    fn build(&self, block: &BlockMeta) -> Vec<TallySpec> {
        vec![TallySpec {
            name: block.name().to_string(),
            scores: vec![self.score.to_string()],
            options: block.config().clone(),
        }]
    }
}

/// Absorption, fission and nu-fission tallies in one entry. Each member is
/// named like the standalone observable would be, so metrics requiring
/// `absorption` read the same tally either way.
struct IntegralSet;

impl ObservablePlugin for IntegralSet {
    fn build(&self, block: &BlockMeta) -> Vec<TallySpec> {
        INTEGRAL_SCORES
            .iter()
            .map(|score| TallySpec {
                name: match block.instance() {
                    Some(instance) => format!("{score}:{instance}"),
                    None => score.to_string(),
                },
                scores: vec![score.to_string()],
                options: block.config().clone(),
            })
            .collect()
    }
}

fn score_tally(score: &'static str) -> PluginDescriptor<dyn ObservablePlugin> {
    PluginDescriptor::new(score, move || {
        Box::new(ScoreTally { score }) as Box<dyn ObservablePlugin>
    })
}

pub(super) fn register(registry: &mut Registry<dyn ObservablePlugin>) -> Result<(), StudyError> {
    for score in INTEGRAL_SCORES {
        registry.register(score_tally(score))?;
    }
    registry.register(score_tally("flux"))?;
    registry.register(PluginDescriptor::new("integral-set", || {
        Box::new(IntegralSet) as Box<dyn ObservablePlugin>
    }))
}
