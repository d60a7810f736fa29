use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::types::{GlobalConfig, Settings};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Load a configuration from a YAML file.
pub fn load_config(path: impl AsRef<Path>) -> Result<GlobalConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse a configuration from a YAML string.
pub fn parse_config(yaml: &str) -> Result<GlobalConfig, ConfigError> {
    let config: GlobalConfig = serde_yaml::from_str(yaml)?;
    validate(&config)?;
    Ok(config)
}

/// Load and merge every `*.yaml` / `*.yml` file of a directory.
///
/// Files are read in name order. Settings come from the first file; a name
/// defined in more than one file is rejected.
pub fn load_config_dir(dir: impl AsRef<Path>) -> Result<GlobalConfig, ConfigError> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if matches!(path.extension().and_then(|e| e.to_str()), Some("yaml" | "yml")) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut merged: Option<GlobalConfig> = None;
    for path in paths {
        let content = std::fs::read_to_string(&path)?;
        let part: GlobalConfig = serde_yaml::from_str(&content)?;
        merged = Some(match merged {
            None => part,
            Some(mut acc) => {
                if part.settings != Settings::default() && part.settings != acc.settings {
                    tracing::warn!(file = %path.display(), "ignoring settings outside the first config file");
                }
                merge_section("sources", &mut acc.sources, part.sources, &path)?;
                merge_section("sinks", &mut acc.sinks, part.sinks, &path)?;
                merge_section("filters", &mut acc.filters, part.filters, &path)?;
                merge_section("transforms", &mut acc.transforms, part.transforms, &path)?;
                merge_section("jobs", &mut acc.jobs, part.jobs, &path)?;
                acc
            }
        });
    }

    let config = merged.unwrap_or_default();
    validate(&config)?;
    Ok(config)
}

fn merge_section<V>(
    section: &str,
    into: &mut HashMap<String, V>,
    from: HashMap<String, V>,
    path: &Path,
) -> Result<(), ConfigError> {
    for (name, value) in from {
        if into.contains_key(&name) {
            return Err(ConfigError::Invalid(format!(
                "{section} entry `{name}` in {} is already defined",
                path.display()
            )));
        }
        into.insert(name, value);
    }
    Ok(())
}

fn validate(config: &GlobalConfig) -> Result<(), ConfigError> {
    if config.settings.default_interval == 0 {
        return Err(ConfigError::Invalid("settings.default_interval must be greater than zero".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::AssemblyPolicy;
    use std::time::Duration;

    const FULL: &str = r#"
settings:
  default_interval: 60
  run_timeout: 30
  on_assembly_error: skip
  log:
    debugging: true

sources:
  readings:
    type: http
    url: "https://api.example.com/readings"
    token: secret

sinks:
  archive:
    type: file
    path: /data/readings.jsonl

filters:
  positive:
    type: range
    min: 0

transforms:
  double:
    type: scale
    factor: 2

jobs:
  collect:
    source: readings
    sink: archive
    transforms: [double]
    filters: [positive]
    interval: 300
"#;

    #[test]
    fn parse_full_config() {
        let config = parse_config(FULL).unwrap();
        assert_eq!(config.settings.default_interval, 60);
        assert_eq!(config.settings.run_timeout, Some(30));
        assert_eq!(config.settings.on_assembly_error, AssemblyPolicy::Skip);
        assert!(config.settings.log.debugging);

        let source = &config.sources["readings"];
        assert_eq!(source.plugin_type, "http");
        assert_eq!(source.params["url"].as_str(), Some("https://api.example.com/readings"));
        assert!(!source.params.contains_key("type"));

        let job = &config.jobs["collect"];
        assert_eq!(job.source, "readings");
        assert_eq!(job.transforms, vec!["double"]);
        assert_eq!(job.filters, vec!["positive"]);
        assert_eq!(job.effective_interval(60), Duration::from_secs(300));
    }

    #[test]
    fn settings_default_when_absent() {
        let config = parse_config("jobs: {}").unwrap();
        assert_eq!(config.settings.default_interval, 60);
        assert_eq!(config.settings.on_assembly_error, AssemblyPolicy::Abort);
        assert!(config.sources.is_empty());
    }

    #[test]
    fn zero_default_interval_is_rejected() {
        let err = parse_config("settings:\n  default_interval: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn plugin_without_type_is_a_parse_error() {
        let err = parse_config("sinks:\n  out:\n    path: /tmp/x\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn directory_configs_merge() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("00-settings.yaml"),
            "settings:\n  default_interval: 15\nsinks:\n  out:\n    type: log\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("10-jobs.yml"),
            "sources:\n  nums:\n    type: static\n    items: [1, 2]\njobs:\n  count:\n    source: nums\n    sink: out\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not yaml").unwrap();

        let config = load_config_dir(dir.path()).unwrap();
        assert_eq!(config.settings.default_interval, 15);
        assert!(config.sinks.contains_key("out"));
        assert!(config.sources.contains_key("nums"));
        assert_eq!(config.jobs["count"].sink, "out");
    }

    #[test]
    fn duplicate_names_across_files_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.yaml"), "sinks:\n  out:\n    type: log\n").unwrap();
        std::fs::write(dir.path().join("b.yaml"), "sinks:\n  out:\n    type: log\n").unwrap();

        let err = load_config_dir(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("`out`")));
    }
}
