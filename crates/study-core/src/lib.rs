#![deny(missing_docs)]
#![doc = "Error taxonomy, configuration aliases and document helpers shared by the study crates."]

pub mod errors;
pub mod hash;
pub mod serde;
mod types;

pub use errors::{ErrorInfo, StudyError};
pub use hash::{hash_bytes, stable_hash_string};
pub use types::{describe, kind_of, merge_shallow, ConfigMap, Params};
