//! Plugins shipped with the toolkit, registered by [`crate::PluginSet::builtin`].

mod artifacts;
mod figures;
mod metrics;
mod models;
mod tallies;

use study_core::StudyError;
use study_registry::BlockMeta;

use crate::plugins::PluginSet;

pub use figures::{FigureConfig, Histogram, MAX_BINS};
pub use models::EXAMPLE_MODEL;
pub use tallies::INTEGRAL_SCORES;

pub(crate) fn register_all(set: &mut PluginSet) -> Result<(), StudyError> {
    models::register(&mut set.models)?;
    tallies::register(&mut set.observables)?;
    metrics::register(&mut set.metrics)?;
    artifacts::register(&mut set.artifacts)?;
    Ok(())
}

fn config_str<'a>(block: &'a BlockMeta, key: &str) -> Option<&'a str> {
    block.config().get(key).and_then(|value| value.as_str())
}

fn config_usize(block: &BlockMeta, key: &str) -> Option<usize> {
    block
        .config()
        .get(key)
        .and_then(|value| value.as_u64())
        .and_then(|value| usize::try_from(value).ok())
}

fn config_strings(block: &BlockMeta, key: &str) -> Option<Vec<String>> {
    block.config().get(key).and_then(|value| {
        value.as_array().map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
    })
}
