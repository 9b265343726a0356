use std::fmt;
use std::sync::Arc;

use study_core::{merge_shallow, ConfigMap};

type Factory<P> = Arc<dyn Fn() -> Box<P> + Send + Sync>;

/// Registration record for one plugin type within a family.
///
/// The descriptor is the prototype every block of this type is instantiated
/// from: the factory yields a fresh plugin value, the defaults seed the block
/// configuration and the requirement list is copied verbatim onto the block.
pub struct PluginDescriptor<P: ?Sized> {
    type_name: String,
    defaults: ConfigMap,
    requires: Vec<String>,
    factory: Factory<P>,
}

impl<P: ?Sized> PluginDescriptor<P> {
    /// Creates a descriptor with empty defaults and no requirements.
    pub fn new<F>(type_name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Box<P> + Send + Sync + 'static,
    {
        Self {
            type_name: type_name.into(),
            defaults: ConfigMap::new(),
            requires: Vec::new(),
            factory: Arc::new(factory),
        }
    }

    /// Sets the default configuration overlays are merged onto.
    pub fn with_defaults(mut self, defaults: ConfigMap) -> Self {
        self.defaults = defaults;
        self
    }

    /// Declares the upstream names a block of this type needs before it runs.
    pub fn with_requires<I, S>(mut self, requires: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires = requires.into_iter().map(Into::into).collect();
        self
    }

    /// Registered type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Declared default configuration.
    pub fn defaults(&self) -> &ConfigMap {
        &self.defaults
    }

    /// Declared upstream requirements.
    pub fn requires(&self) -> &[String] {
        &self.requires
    }

    /// Builds an unnamed, unconfigured block from the prototype.
    pub fn instantiate(&self) -> Block<P> {
        Block {
            meta: BlockMeta {
                type_name: self.type_name.clone(),
                name: self.type_name.clone(),
                instance: None,
                config: self.defaults.clone(),
                requires: self.requires.clone(),
            },
            plugin: (self.factory)(),
        }
    }
}

impl<P: ?Sized> fmt::Debug for PluginDescriptor<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("type_name", &self.type_name)
            .field("defaults", &self.defaults)
            .field("requires", &self.requires)
            .finish_non_exhaustive()
    }
}

/// Name and configuration of a block, handed to plugin implementations.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockMeta {
    type_name: String,
    name: String,
    instance: Option<String>,
    config: ConfigMap,
    requires: Vec<String>,
}

impl BlockMeta {
    /// Qualified name: `type` or `type:instance`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registered type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Instance name, if the block is not anonymous.
    pub fn instance(&self) -> Option<&str> {
        self.instance.as_deref()
    }

    /// Effective configuration after merging.
    pub fn config(&self) -> &ConfigMap {
        &self.config
    }

    /// Declared upstream requirements.
    pub fn requires(&self) -> &[String] {
        &self.requires
    }
}

/// A named, configured plugin instance ready to be invoked.
pub struct Block<P: ?Sized> {
    meta: BlockMeta,
    plugin: Box<P>,
}

impl<P: ?Sized> Block<P> {
    /// Applies an instance name. An empty name keeps the block anonymous and
    /// its qualified name equal to the type name.
    pub fn set_name(&mut self, instance: &str) {
        let meta = &mut self.meta;
        if instance.is_empty() {
            meta.instance = None;
            meta.name = meta.type_name.clone();
        } else {
            meta.instance = Some(instance.to_string());
            meta.name = format!("{}:{}", meta.type_name, instance);
        }
    }

    /// Shallow-merges a user overlay over the current configuration.
    pub fn merge_config(&mut self, overlay: &ConfigMap) {
        self.meta.config = merge_shallow(&self.meta.config, overlay);
    }

    /// Name, configuration and requirements of the block.
    pub fn meta(&self) -> &BlockMeta {
        &self.meta
    }

    /// Qualified name: `type` or `type:instance`.
    pub fn name(&self) -> &str {
        self.meta.name()
    }

    /// Registered type name.
    pub fn type_name(&self) -> &str {
        self.meta.type_name()
    }

    /// Instance name, if the block is not anonymous.
    pub fn instance(&self) -> Option<&str> {
        self.meta.instance()
    }

    /// Effective configuration after merging.
    pub fn config(&self) -> &ConfigMap {
        self.meta.config()
    }

    /// Declared upstream requirements.
    pub fn requires(&self) -> &[String] {
        self.meta.requires()
    }

    /// The plugin implementation backing this block.
    pub fn plugin(&self) -> &P {
        &self.plugin
    }
}

impl<P: ?Sized> fmt::Debug for Block<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}
