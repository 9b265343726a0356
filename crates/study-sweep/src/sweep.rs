use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use study_core::{ConfigMap, Params};

/// One concrete point of a parameter sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    /// 1-based position in expansion order.
    pub index: usize,
    /// Directory name derived from the index, e.g. `case_0001`.
    pub name: String,
    /// Concrete parameter assignment in declared key order.
    pub params: Params,
}

impl Case {
    /// Working directory of the case under `cases_root`.
    pub fn dir(&self, cases_root: &Path) -> PathBuf {
        cases_root.join(&self.name)
    }
}

/// Stable, zero-padded case directory name for a 1-based index.
pub fn case_name(index: usize) -> String {
    format!("case_{:04}", index)
}

/// Upper bound on the output buffer reserved ahead of expansion.
const MAX_PREALLOCATED_CASES: usize = 4096;

/// Expands a sweep mapping into the ordered cartesian product of its values.
///
/// Lists are candidate sequences and every other value is a single candidate.
/// The first declared key varies slowest and the last fastest. An empty
/// mapping yields one empty assignment; a key with an empty list yields no
/// assignments at all.
pub fn expand_parameters(params: &ConfigMap) -> Vec<Params> {
    let axes: Vec<(&str, Vec<&Value>)> = params
        .iter()
        .map(|(name, value)| (name.as_str(), candidates(value)))
        .collect();
    if axes.iter().any(|(_, values)| values.is_empty()) {
        return Vec::new();
    }
    let capacity = sweep_size(params)
        .unwrap_or(MAX_PREALLOCATED_CASES)
        .min(MAX_PREALLOCATED_CASES);
    let mut outputs = Vec::with_capacity(capacity);
    expand_grid(&axes, 0, Params::new(), &mut outputs);
    outputs
}

/// Number of assignments [`expand_parameters`] produces, or `None` when the
/// count does not fit in `usize`.
pub fn sweep_size(params: &ConfigMap) -> Option<usize> {
    let lengths: Vec<usize> = params
        .values()
        .map(|value| match value {
            Value::Array(items) => items.len(),
            _ => 1,
        })
        .collect();
    if lengths.contains(&0) {
        return Some(0);
    }
    lengths
        .into_iter()
        .try_fold(1usize, |size, len| size.checked_mul(len))
}

/// Expands `params` and numbers the resulting cases from 1.
pub fn plan_cases(params: &ConfigMap) -> Vec<Case> {
    expand_parameters(params)
        .into_iter()
        .enumerate()
        .map(|(idx, params)| Case {
            index: idx + 1,
            name: case_name(idx + 1),
            params,
        })
        .collect()
}

fn candidates(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

fn expand_grid(
    axes: &[(&str, Vec<&Value>)],
    idx: usize,
    current: Params,
    outputs: &mut Vec<Params>,
) {
    if idx == axes.len() {
        outputs.push(current);
        return;
    }
    let (name, values) = &axes[idx];
    for value in values {
        let mut next = current.clone();
        next.insert((*name).to_string(), (*value).clone());
        expand_grid(axes, idx + 1, next, outputs);
    }
}
