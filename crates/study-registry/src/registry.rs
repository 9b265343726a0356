use std::fmt;

use indexmap::IndexMap;
use study_core::{ErrorInfo, StudyError};

use crate::block::PluginDescriptor;

/// Name to descriptor table for a single plugin family.
///
/// Registration is append-only: there is no removal and a name can only be
/// registered once. Names are kept in registration order, which is also the
/// order they are listed in lookup failures.
pub struct Registry<P: ?Sized> {
    family: &'static str,
    entries: IndexMap<String, PluginDescriptor<P>>,
}

impl<P: ?Sized> Registry<P> {
    /// Creates an empty registry for the named family (`metric`, `artifact`, ...).
    pub fn new(family: &'static str) -> Self {
        Self {
            family,
            entries: IndexMap::new(),
        }
    }

    /// Family label used in diagnostics.
    pub fn family(&self) -> &'static str {
        self.family
    }

    /// Registers a descriptor under its type name.
    pub fn register(&mut self, descriptor: PluginDescriptor<P>) -> Result<(), StudyError> {
        let name = descriptor.type_name().to_string();
        if self.entries.contains_key(&name) {
            return Err(StudyError::DuplicateName(
                ErrorInfo::new(
                    "plugin_duplicate",
                    format!("{} '{}' already registered", self.family, name),
                )
                .with_context("family", self.family)
                .with_context("name", name),
            ));
        }
        self.entries.insert(name, descriptor);
        Ok(())
    }

    /// Looks up a descriptor, listing every registered name on failure.
    pub fn lookup(&self, name: &str) -> Result<&PluginDescriptor<P>, StudyError> {
        self.entries.get(name).ok_or_else(|| {
            let available = self.names().collect::<Vec<_>>().join(", ");
            StudyError::UnknownPlugin(
                ErrorInfo::new(
                    "plugin_unknown",
                    format!(
                        "unknown {} '{}'. Available: {}",
                        self.family, name, available
                    ),
                )
                .with_context("family", self.family)
                .with_context("name", name)
                .with_hint("check the plugin name in the study or analysis definition"),
            )
        })
    }

    /// Returns true when `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// Registered descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &PluginDescriptor<P>> + '_ {
        self.entries.values()
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<P: ?Sized> fmt::Debug for Registry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("family", &self.family)
            .field("names", &self.names().collect::<Vec<_>>())
            .finish()
    }
}
