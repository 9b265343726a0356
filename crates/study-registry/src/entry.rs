//! Normalization of loosely typed definition entries into configured blocks.
//!
//! Study and analysis files list plugins in several shorthand forms:
//!
//! ```yaml
//! metrics:
//!   - case_count                      # bare name
//!   - parameters: null                # same as the bare name
//!   - reaction_rates: [inner, outer]  # named instances, defaults only
//!   - flux: [1, 2]                    # scalar names become `flux:1`, `flux:2`
//!   - summary_table:                  # named instances with their own config
//!       short: {file: short.csv}
//!       long: {file: long.csv}
//!   - k_histogram: {bins: 8}          # one anonymous, configured instance
//! ```
//!
//! [`EntryShape::classify`] turns each entry into an explicit variant and
//! [`normalize`] resolves the variants against a [`Registry`].

use serde_json::Value;
use study_core::{describe, kind_of, ConfigMap, ErrorInfo, StudyError};

use crate::block::Block;
use crate::registry::Registry;

/// Explicit form of one definition entry.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryShape {
    /// `name` or `{name: null}`: one anonymous block with default config.
    Anonymous {
        /// Plugin type name.
        type_name: String,
    },
    /// `{name: [a, b]}`: one block per listed instance name, default config.
    /// Number and boolean names are kept in their textual form.
    Named {
        /// Plugin type name.
        type_name: String,
        /// Instance names in listed order.
        instances: Vec<String>,
    },
    /// `{name: {a: {...}, b: {...}}}`: one configured block per key.
    Instances {
        /// Plugin type name.
        type_name: String,
        /// Instance name and overlay pairs in document order.
        instances: Vec<(String, ConfigMap)>,
    },
    /// `{name: {k: v, ...}}` with only non-mapping values: one anonymous block
    /// configured with the whole mapping. An empty mapping lands here too.
    Configured {
        /// Plugin type name.
        type_name: String,
        /// Overlay applied over the plugin defaults.
        config: ConfigMap,
    },
}

impl EntryShape {
    /// Classifies a raw entry, rejecting malformed and ambiguous forms.
    pub fn classify(entry: &Value) -> Result<Self, StudyError> {
        match entry {
            Value::String(type_name) => Ok(EntryShape::Anonymous {
                type_name: type_name.clone(),
            }),
            Value::Object(map) => {
                if map.len() != 1 {
                    return Err(entry_error(
                        "entry_malformed",
                        format!(
                            "entry must have exactly one top-level key, found {}",
                            map.len()
                        ),
                        entry,
                    ));
                }
                let Some((type_name, nested)) = map.iter().next() else {
                    return Err(entry_error(
                        "entry_malformed",
                        "entry must have exactly one top-level key",
                        entry,
                    ));
                };
                classify_nested(type_name, nested, entry)
            }
            other => Err(entry_error(
                "entry_type",
                format!(
                    "entry must be a plugin name or a single-key mapping, found {}",
                    kind_of(other)
                ),
                entry,
            )),
        }
    }

    /// Plugin type name the entry refers to.
    pub fn type_name(&self) -> &str {
        match self {
            EntryShape::Anonymous { type_name }
            | EntryShape::Named { type_name, .. }
            | EntryShape::Instances { type_name, .. }
            | EntryShape::Configured { type_name, .. } => type_name,
        }
    }

    /// Resolved `(instance name, overlay)` pairs; an empty instance name
    /// denotes an anonymous block.
    pub fn instances(&self) -> Vec<(&str, Option<&ConfigMap>)> {
        match self {
            EntryShape::Anonymous { .. } => vec![("", None)],
            EntryShape::Named { instances, .. } => {
                instances.iter().map(|name| (name.as_str(), None)).collect()
            }
            EntryShape::Instances { instances, .. } => instances
                .iter()
                .map(|(name, config)| (name.as_str(), Some(config)))
                .collect(),
            EntryShape::Configured { config, .. } => vec![("", Some(config))],
        }
    }
}

fn classify_nested(
    type_name: &str,
    nested: &Value,
    entry: &Value,
) -> Result<EntryShape, StudyError> {
    match nested {
        Value::Null => Ok(EntryShape::Anonymous {
            type_name: type_name.to_string(),
        }),
        Value::Array(items) => {
            let mut instances = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(name) => instances.push(name.clone()),
                    Value::Number(number) => instances.push(number.to_string()),
                    Value::Bool(flag) => instances.push(flag.to_string()),
                    other => {
                        return Err(entry_error(
                            "entry_instance_type",
                            format!(
                                "instance names for '{}' must be scalars, found {}",
                                type_name,
                                kind_of(other)
                            ),
                            entry,
                        ))
                    }
                }
            }
            Ok(EntryShape::Named {
                type_name: type_name.to_string(),
                instances,
            })
        }
        Value::Object(map) => {
            let mapping_count = map.values().filter(|value| value.is_object()).count();
            if mapping_count == 0 {
                return Ok(EntryShape::Configured {
                    type_name: type_name.to_string(),
                    config: map.clone(),
                });
            }
            if mapping_count != map.len() {
                return Err(entry_error(
                    "entry_mixed",
                    format!(
                        "mixed instance/config entry for '{}': define either named instances or one configuration",
                        type_name
                    ),
                    entry,
                ));
            }
            let instances = map
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .as_object()
                        .map(|config| (name.clone(), config.clone()))
                })
                .collect();
            Ok(EntryShape::Instances {
                type_name: type_name.to_string(),
                instances,
            })
        }
        other => Err(entry_error(
            "entry_type",
            format!(
                "invalid configuration for '{}': expected null, a list or a mapping, found {}",
                type_name,
                kind_of(other)
            ),
            entry,
        )),
    }
}

fn entry_error(code: &str, message: impl Into<String>, entry: &Value) -> StudyError {
    StudyError::Config(ErrorInfo::new(code, message).with_context("entry", describe(entry)))
}

/// Normalizes `entries` against `registry`, preserving entry order and the
/// instance order within each entry.
///
/// Every entry is classified before the registry is consulted, so shape
/// errors surface ahead of unknown plugin names.
pub fn normalize<P: ?Sized>(
    entries: &[Value],
    registry: &Registry<P>,
) -> Result<Vec<Block<P>>, StudyError> {
    let shapes = entries
        .iter()
        .map(EntryShape::classify)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| match err {
            StudyError::Config(info) => {
                StudyError::Config(info.with_context("family", registry.family()))
            }
            other => other,
        })?;

    let mut blocks = Vec::new();
    for shape in &shapes {
        let descriptor = registry.lookup(shape.type_name())?;
        for (instance, overlay) in shape.instances() {
            let mut block = descriptor.instantiate();
            block.set_name(instance);
            if let Some(overlay) = overlay {
                block.merge_config(overlay);
            }
            blocks.push(block);
        }
    }
    Ok(blocks)
}
