//! Type-tag driven stage construction.
//!
//! Each stage kind has its own [`Factory`], mapping a plugin type tag to a
//! constructor. Constructors receive the plugin's [`PluginConfig`] plus an
//! auxiliary argument: nothing for sinks, filters and transforms, the
//! downstream sink for sources.

use std::collections::HashMap;
use std::fmt;

use gatherflow_utils::error::Error;
use gatherflow_utils::GatherFlowResult;

use crate::config::PluginConfig;
use crate::filters::{self, Filter};
use crate::sinks::{self, Sink};
use crate::sources::{self, Source};
use crate::transforms::{self, Transform};

/// The four plugin kinds, also the slots of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Source,
    Sink,
    Filter,
    Transform,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Source => write!(f, "source"),
            StageKind::Sink => write!(f, "sink"),
            StageKind::Filter => write!(f, "filter"),
            StageKind::Transform => write!(f, "transform"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    #[error("unknown {kind} plugin type `{tag}`")]
    UnknownType { kind: StageKind, tag: String },
    #[error("{kind} plugin `{tag}` could not be built: {source}")]
    Construction {
        kind: StageKind,
        tag: String,
        #[source]
        source: Error,
    },
}

pub type Constructor<T, A> =
    Box<dyn Fn(&PluginConfig, A) -> GatherFlowResult<Box<T>> + Send + Sync>;

/// Registry of constructors for one stage kind.
pub struct Factory<T: ?Sized + 'static, A: 'static = ()> {
    kind: StageKind,
    constructors: HashMap<String, Constructor<T, A>>,
}

pub type SourceFactory = Factory<dyn Source, Box<dyn Sink>>;
pub type SinkFactory = Factory<dyn Sink>;
pub type FilterFactory = Factory<dyn Filter>;
pub type TransformFactory = Factory<dyn Transform>;

impl<T: ?Sized + 'static, A: 'static> Factory<T, A> {
    pub fn new(kind: StageKind) -> Self {
        Self {
            kind,
            constructors: HashMap::new(),
        }
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    /// Register a constructor under `tag`, replacing any previous one.
    pub fn register<F>(&mut self, tag: impl Into<String>, constructor: F) -> &mut Self
    where
        F: Fn(&PluginConfig, A) -> GatherFlowResult<Box<T>> + Send + Sync + 'static,
    {
        let tag = tag.into();
        if self.constructors.insert(tag.clone(), Box::new(constructor)).is_some() {
            tracing::warn!(kind = %self.kind, tag = %tag, "plugin type registered twice, keeping the latest");
        }
        self
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.constructors.contains_key(tag)
    }

    /// Registered type tags, sorted.
    pub fn types(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Build a stage from its configuration record.
    pub fn construct(&self, config: &PluginConfig, aux: A) -> Result<Box<T>, FactoryError> {
        let constructor = self.constructors.get(&config.plugin_type).ok_or_else(|| {
            FactoryError::UnknownType {
                kind: self.kind,
                tag: config.plugin_type.clone(),
            }
        })?;
        constructor(config, aux).map_err(|source| FactoryError::Construction {
            kind: self.kind,
            tag: config.plugin_type.clone(),
            source,
        })
    }
}

impl<T: ?Sized + 'static, A: 'static> fmt::Debug for Factory<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("kind", &self.kind)
            .field("types", &self.types())
            .finish()
    }
}

/// The four factories a job is assembled from.
#[derive(Debug)]
pub struct Plugins {
    pub sources: SourceFactory,
    pub sinks: SinkFactory,
    pub filters: FilterFactory,
    pub transforms: TransformFactory,
}

impl Plugins {
    /// Empty factories; register your own plugins.
    pub fn new() -> Self {
        Self {
            sources: Factory::new(StageKind::Source),
            sinks: Factory::new(StageKind::Sink),
            filters: Factory::new(StageKind::Filter),
            transforms: Factory::new(StageKind::Transform),
        }
    }

    /// Factories pre-loaded with the plugins shipped in this crate.
    pub fn builtin() -> Self {
        let mut plugins = Self::new();
        sources::register_builtin(&mut plugins.sources);
        sinks::register_builtin(&mut plugins.sinks);
        filters::register_builtin(&mut plugins.filters);
        transforms::register_builtin(&mut plugins.transforms);
        plugins
    }
}

impl Default for Plugins {
    fn default() -> Self {
        Self::new()
    }
}
