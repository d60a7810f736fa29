use gatherflow_utils::GatherFlowResult;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// The whole configuration snapshot a set of jobs is assembled from.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub sources: HashMap<String, PluginConfig>,
    #[serde(default)]
    pub sinks: HashMap<String, PluginConfig>,
    #[serde(default)]
    pub filters: HashMap<String, PluginConfig>,
    #[serde(default)]
    pub transforms: HashMap<String, PluginConfig>,
    #[serde(default)]
    pub jobs: HashMap<String, JobConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Seconds between runs for jobs without an override.
    #[serde(default = "default_interval")]
    pub default_interval: u64,
    /// Seconds a single run may take. Defaults to the job's interval.
    #[serde(default)]
    pub run_timeout: Option<u64>,
    /// Fire every job once as soon as the scheduler starts.
    #[serde(default)]
    pub run_on_start: bool,
    #[serde(default)]
    pub on_assembly_error: AssemblyPolicy,
    #[serde(default)]
    pub log: LogSettings,
}

fn default_interval() -> u64 {
    60
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_interval: default_interval(),
            run_timeout: None,
            run_on_start: false,
            on_assembly_error: AssemblyPolicy::default(),
            log: LogSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LogSettings {
    #[serde(default)]
    pub debugging: bool,
}

/// What to do with the remaining jobs when one of them fails to assemble.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssemblyPolicy {
    #[default]
    Abort,
    Skip,
}

/// A named plugin instance: its type tag plus the payload handed to the plugin.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PluginConfig {
    #[serde(rename = "type")]
    pub plugin_type: String,
    #[serde(default)]
    pub interval: Option<u64>,
    /// All other fields are passed to the plugin implementation as params
    #[serde(flatten)]
    pub params: HashMap<String, serde_yaml::Value>,
}

impl PluginConfig {
    pub fn new(plugin_type: impl Into<String>) -> Self {
        Self {
            plugin_type: plugin_type.into(),
            interval: None,
            params: HashMap::new(),
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<serde_yaml::Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Deserialize the payload into the plugin's own parameter type.
    pub fn parse_params<T: DeserializeOwned>(&self) -> GatherFlowResult<T> {
        let mapping: serde_yaml::Mapping = self
            .params
            .iter()
            .map(|(k, v)| (serde_yaml::Value::String(k.clone()), v.clone()))
            .collect();
        Ok(serde_yaml::from_value(serde_yaml::Value::Mapping(mapping))?)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobConfig {
    pub source: String,
    pub sink: String,
    #[serde(default)]
    pub transforms: Vec<String>,
    #[serde(default)]
    pub filters: Vec<String>,
    /// Seconds; zero or absent falls back to `settings.default_interval`.
    #[serde(default)]
    pub interval: Option<u64>,
}

impl JobConfig {
    pub fn new(source: impl Into<String>, sink: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            sink: sink.into(),
            ..Self::default()
        }
    }

    pub fn transform(mut self, name: impl Into<String>) -> Self {
        self.transforms.push(name.into());
        self
    }

    pub fn filter(mut self, name: impl Into<String>) -> Self {
        self.filters.push(name.into());
        self
    }

    pub fn interval(mut self, seconds: u64) -> Self {
        self.interval = Some(seconds);
        self
    }

    pub fn effective_interval(&self, default_seconds: u64) -> Duration {
        match self.interval {
            Some(seconds) if seconds != 0 => Duration::from_secs(seconds),
            _ => Duration::from_secs(default_seconds),
        }
    }
}
