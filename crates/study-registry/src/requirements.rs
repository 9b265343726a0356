//! Availability checks run immediately before metric and artifact blocks.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use indexmap::{IndexMap, IndexSet};
use study_core::{ErrorInfo, StudyError};

use crate::block::Block;

/// Pipeline tier a requirement check is performed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Metric blocks require observables declared by the analysis definition.
    Metric,
    /// Artifact blocks require entries of the results store.
    Artifact,
}

impl Stage {
    fn block_label(self) -> &'static str {
        match self {
            Stage::Metric => "metric",
            Stage::Artifact => "artifact",
        }
    }

    fn upstream_label(self) -> &'static str {
        match self {
            Stage::Metric => "observables",
            Stage::Artifact => "results",
        }
    }
}

/// A set of upstream names a block can be checked against.
pub trait Available {
    /// Whether `name` is provided.
    fn provides(&self, name: &str) -> bool;
}

impl Available for BTreeSet<String> {
    fn provides(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl Available for HashSet<String> {
    fn provides(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl Available for IndexSet<String> {
    fn provides(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl Available for [String] {
    fn provides(&self, name: &str) -> bool {
        self.iter().any(|candidate| candidate == name)
    }
}

impl<V> Available for IndexMap<String, V> {
    fn provides(&self, name: &str) -> bool {
        self.contains_key(name)
    }
}

impl<V> Available for BTreeMap<String, V> {
    fn provides(&self, name: &str) -> bool {
        self.contains_key(name)
    }
}

/// Requirements absent from `available`, in declaration order without repeats.
pub fn missing_requirements<'a, A>(requires: &'a [String], available: &A) -> Vec<&'a str>
where
    A: Available + ?Sized,
{
    let mut missing: Vec<&str> = Vec::new();
    for name in requires {
        if !available.provides(name) && !missing.contains(&name.as_str()) {
            missing.push(name);
        }
    }
    missing
}

/// Fails when any of the block's declared requirements is unavailable.
pub fn check_requirements<P, A>(
    block: &Block<P>,
    available: &A,
    stage: Stage,
) -> Result<(), StudyError>
where
    P: ?Sized,
    A: Available + ?Sized,
{
    let missing = missing_requirements(block.requires(), available);
    if missing.is_empty() {
        return Ok(());
    }
    let listed = missing.join(", ");
    Err(StudyError::Requirement(
        ErrorInfo::new(
            "requirement_missing",
            format!(
                "{} '{}' missing {}: [{}]",
                stage.block_label(),
                block.name(),
                stage.upstream_label(),
                listed
            ),
        )
        .with_context("block", block.name())
        .with_context("missing", listed),
    ))
}
