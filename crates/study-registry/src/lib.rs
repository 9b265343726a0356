#![deny(missing_docs)]
#![doc = "Plugin registry, definition entry normalizer and requirement resolver, generic over the plugin family."]

mod block;
pub mod entry;
mod registry;
pub mod requirements;

pub use block::{Block, BlockMeta, PluginDescriptor};
pub use entry::{normalize, EntryShape};
pub use registry::Registry;
pub use requirements::{check_requirements, missing_requirements, Available, Stage};
