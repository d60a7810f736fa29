use std::collections::HashMap;
use std::fmt;

use crate::config::{GlobalConfig, JobConfig, PluginConfig};
use crate::pipeline::{FilterStage, Job, TransformStage};
use crate::registry::{FactoryError, Plugins, StageKind};
use crate::sinks::Sink;

/// Why a single job could not be assembled.
#[derive(Debug, thiserror::Error)]
#[error("job `{job}`: {kind}")]
pub struct AssembleError {
    pub job: String,
    /// Which slot of the job failed; `None` for job-level settings such as
    /// the interval.
    pub slot: Option<StageKind>,
    pub kind: AssembleErrorKind,
}

#[derive(Debug, thiserror::Error)]
pub enum AssembleErrorKind {
    #[error("{0} `{1}` is not configured")]
    MissingReference(StageKind, String),
    #[error("{slot} `{name}` has unknown plugin type `{tag}`")]
    UnknownType { slot: StageKind, name: String, tag: String },
    #[error("{slot} `{name}` ({tag}) failed to build: {source}")]
    Construction {
        slot: StageKind,
        name: String,
        tag: String,
        #[source]
        source: gatherflow_utils::error::Error,
    },
    #[error("effective interval is zero")]
    ZeroInterval,
}

impl AssembleError {
    fn new(job: &str, slot: StageKind, kind: AssembleErrorKind) -> Self {
        Self { job: job.to_string(), slot: Some(slot), kind }
    }

    fn job_level(job: &str, kind: AssembleErrorKind) -> Self {
        Self { job: job.to_string(), slot: None, kind }
    }

    pub fn is_missing_reference(&self) -> bool {
        matches!(self.kind, AssembleErrorKind::MissingReference(..))
    }

    pub fn is_unknown_type(&self) -> bool {
        matches!(self.kind, AssembleErrorKind::UnknownType { .. })
    }
}

/// Turns job specifications into runnable jobs.
///
/// The chain is built from the sink outwards: the sink first, then each
/// transform in listed order, then each filter in listed order, each wrapping
/// the chain built so far. The last-listed filter therefore sees items first
/// and every filter runs before any transform. The source is built last,
/// bound to the finished chain.
pub struct JobAssembler<'a> {
    config: &'a GlobalConfig,
    plugins: &'a Plugins,
}

impl<'a> JobAssembler<'a> {
    pub fn new(config: &'a GlobalConfig, plugins: &'a Plugins) -> Self {
        Self { config, plugins }
    }

    /// Assemble one job. Nothing is kept when any step fails.
    pub fn assemble(&self, job: &str, spec: &JobConfig) -> Result<Job, AssembleError> {
        let chain = self.build_chain(job, spec)?;

        let (source_config, _) =
            self.resolve(job, StageKind::Source, &self.config.sources, &spec.source)?;
        let source = self
            .plugins
            .sources
            .construct(source_config, chain)
            .map_err(|e| factory_error(job, &spec.source, e))?;

        let interval = spec.effective_interval(self.config.settings.default_interval);
        if interval.is_zero() {
            return Err(AssembleError::job_level(job, AssembleErrorKind::ZeroInterval));
        }

        tracing::debug!(
            job = %job,
            interval_secs = interval.as_secs(),
            transforms = spec.transforms.len(),
            filters = spec.filters.len(),
            "job assembled"
        );
        Ok(Job::new(job, interval, source))
    }

    /// Build the sink chain a job's source pushes into: filters, then
    /// transforms, then the sink.
    pub fn build_chain(&self, job: &str, spec: &JobConfig) -> Result<Box<dyn Sink>, AssembleError> {
        let (sink_config, _) = self.resolve(job, StageKind::Sink, &self.config.sinks, &spec.sink)?;
        let mut tail: Box<dyn Sink> = self
            .plugins
            .sinks
            .construct(sink_config, ())
            .map_err(|e| factory_error(job, &spec.sink, e))?;

        for name in &spec.transforms {
            let (config, name) =
                self.resolve(job, StageKind::Transform, &self.config.transforms, name)?;
            let transform = self
                .plugins
                .transforms
                .construct(config, ())
                .map_err(|e| factory_error(job, name, e))?;
            tail = Box::new(TransformStage::new(transform, tail));
        }

        for name in &spec.filters {
            let (config, name) = self.resolve(job, StageKind::Filter, &self.config.filters, name)?;
            let filter = self
                .plugins
                .filters
                .construct(config, ())
                .map_err(|e| factory_error(job, name, e))?;
            tail = Box::new(FilterStage::new(filter, tail));
        }

        Ok(tail)
    }

    fn resolve<'n>(
        &self,
        job: &str,
        slot: StageKind,
        section: &'a HashMap<String, PluginConfig>,
        name: &'n str,
    ) -> Result<(&'a PluginConfig, &'n str), AssembleError> {
        section
            .get(name)
            .map(|config| (config, name))
            .ok_or_else(|| {
                AssembleError::new(job, slot, AssembleErrorKind::MissingReference(slot, name.to_string()))
            })
    }
}

fn factory_error(job: &str, name: &str, err: FactoryError) -> AssembleError {
    match err {
        FactoryError::UnknownType { kind, tag } => AssembleError::new(
            job,
            kind,
            AssembleErrorKind::UnknownType { slot: kind, name: name.to_string(), tag },
        ),
        FactoryError::Construction { kind, tag, source } => AssembleError::new(
            job,
            kind,
            AssembleErrorKind::Construction { slot: kind, name: name.to_string(), tag, source },
        ),
    }
}

impl fmt::Debug for JobAssembler<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobAssembler").field("jobs", &self.config.jobs.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::Filter;
    use crate::sources::{push_all, Source};
    use crate::transforms::Transform;
    use async_trait::async_trait;
    use gatherflow_utils::{GatherFlowResult, Item, RunSummary};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    type Log = Arc<Mutex<Vec<String>>>;

    struct TraceFilter {
        label: String,
        log: Log,
    }

    #[async_trait]
    impl Filter for TraceFilter {
        fn name(&self) -> &str { "trace" }
        async fn allows(&self, _: &Item) -> GatherFlowResult<bool> {
            self.log.lock().unwrap().push(self.label.clone());
            Ok(true)
        }
    }

    struct TraceTransform {
        label: String,
        log: Log,
    }

    #[async_trait]
    impl Transform for TraceTransform {
        fn name(&self) -> &str { "trace" }
        async fn transform(&self, item: Item) -> GatherFlowResult<Vec<Item>> {
            self.log.lock().unwrap().push(self.label.clone());
            Ok(vec![item])
        }
    }

    struct RecordSink {
        log: Log,
        items: Arc<Mutex<Vec<Item>>>,
    }

    #[async_trait]
    impl Sink for RecordSink {
        fn name(&self) -> &str { "record" }
        async fn accept(&self, item: Item) -> GatherFlowResult<()> {
            self.log.lock().unwrap().push("sink".to_string());
            self.items.lock().unwrap().push(item);
            Ok(())
        }
    }

    struct OneShot {
        item: Item,
        sink: Box<dyn Sink>,
    }

    #[async_trait]
    impl Source for OneShot {
        fn name(&self) -> &str { "one_shot" }
        async fn gather(&self) -> GatherFlowResult<RunSummary> {
            push_all(self.sink.as_ref(), vec![self.item.clone()]).await
        }
    }

    /// Builtin plugins plus `trace` filter/transform and a `record` sink that
    /// all write to the same log. The `label` param names each instance.
    fn tracing_plugins(log: &Log, items: &Arc<Mutex<Vec<Item>>>) -> Plugins {
        let mut plugins = Plugins::builtin();
        let l = log.clone();
        plugins.filters.register("trace", move |config: &PluginConfig, _| -> GatherFlowResult<Box<dyn Filter>> {
            let label = config.params["label"].as_str().unwrap_or_default().to_string();
            Ok(Box::new(TraceFilter { label, log: l.clone() }))
        });
        let l = log.clone();
        plugins.transforms.register("trace", move |config: &PluginConfig, _| -> GatherFlowResult<Box<dyn Transform>> {
            let label = config.params["label"].as_str().unwrap_or_default().to_string();
            Ok(Box::new(TraceTransform { label, log: l.clone() }))
        });
        let (l, i) = (log.clone(), items.clone());
        plugins.sinks.register("record", move |_: &PluginConfig, _| -> GatherFlowResult<Box<dyn Sink>> {
            Ok(Box::new(RecordSink { log: l.clone(), items: i.clone() }))
        });
        plugins.sources.register("one_shot", |config: &PluginConfig, sink| -> GatherFlowResult<Box<dyn Source>> {
            let value = config.params["value"].as_i64().unwrap_or_default();
            Ok(Box::new(OneShot { item: Item::new("only", value), sink }))
        });
        plugins
    }

    fn traced(kind: &str, label: &str) -> PluginConfig {
        PluginConfig::new(kind).param("label", label)
    }

    fn base_config() -> GlobalConfig {
        let mut config = GlobalConfig::default();
        config.sinks.insert("S".into(), PluginConfig::new("record"));
        config.sources.insert("Src".into(), PluginConfig::new("one_shot").param("value", 1));
        config
    }

    #[tokio::test]
    async fn filters_wrap_transforms_in_reverse_listing_order() {
        let log: Log = Arc::default();
        let items = Arc::default();
        let plugins = tracing_plugins(&log, &items);

        let mut config = base_config();
        for label in ["T1", "T2", "T3"] {
            config.transforms.insert(label.into(), traced("trace", label));
        }
        for label in ["F1", "F2"] {
            config.filters.insert(label.into(), traced("trace", label));
        }
        let spec = JobConfig::new("Src", "S")
            .transform("T1")
            .transform("T2")
            .transform("T3")
            .filter("F1")
            .filter("F2");

        let job = JobAssembler::new(&config, &plugins).assemble("ordered", &spec).unwrap();
        job.run().await.unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["F2", "F1", "T3", "T2", "T1", "sink"]);
    }

    #[tokio::test]
    async fn filter_listed_before_transform_still_runs_first() {
        let log: Log = Arc::default();
        let items = Arc::default();
        let plugins = tracing_plugins(&log, &items);

        let mut config = base_config();
        config.transforms.insert("T".into(), traced("trace", "T"));
        config.filters.insert("F".into(), traced("trace", "F"));
        // builder order deliberately lists the transform after the filter
        let spec = JobConfig::new("Src", "S").filter("F").transform("T");

        let chain = JobAssembler::new(&config, &plugins).build_chain("j", &spec).unwrap();
        chain.accept(Item::new("x", 1)).await.unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["F", "T", "sink"]);
    }

    #[tokio::test]
    async fn scenario_filter_sees_items_before_doubling() {
        let log: Log = Arc::default();
        let items: Arc<Mutex<Vec<Item>>> = Arc::default();
        let plugins = tracing_plugins(&log, &items);

        let mut config = base_config();
        config.settings.default_interval = 60;
        config.transforms.insert("T1".into(), PluginConfig::new("scale").param("factor", 2));
        config.filters.insert("F1".into(), PluginConfig::new("range").param("min", 0));
        let spec = JobConfig::new("Src", "S").transform("T1").filter("F1");

        let assembler = JobAssembler::new(&config, &plugins);
        let job = assembler.assemble("scenario", &spec).unwrap();
        assert_eq!(job.interval(), Duration::from_secs(60));

        let chain = assembler.build_chain("scenario", &spec).unwrap();
        chain.accept(Item::new("neg", -1)).await.unwrap();
        assert!(items.lock().unwrap().is_empty());

        chain.accept(Item::new("pos", 3)).await.unwrap();
        assert_eq!(*items.lock().unwrap(), vec![Item::new("pos", 6)]);
    }

    #[tokio::test]
    async fn split_outputs_each_reach_the_sink_once() {
        let log: Log = Arc::default();
        let items: Arc<Mutex<Vec<Item>>> = Arc::default();
        let plugins = tracing_plugins(&log, &items);

        let mut config = base_config();
        config.transforms.insert("double".into(), PluginConfig::new("scale").param("factor", 2));
        config.transforms.insert("explode".into(), PluginConfig::new("split"));
        // explode is listed last, so it runs first and double sees each element
        let spec = JobConfig::new("Src", "S").transform("double").transform("explode");

        let chain = JobAssembler::new(&config, &plugins).build_chain("j", &spec).unwrap();
        chain.accept(Item::new("b", serde_json::json!([1, 2, 3]))).await.unwrap();

        let values: Vec<i64> = items.lock().unwrap().iter().filter_map(|i| i.value.as_i64()).collect();
        assert_eq!(values, vec![2, 4, 6]);
    }

    #[test]
    fn interval_override_and_default() {
        let plugins = Plugins::builtin();
        let mut config = GlobalConfig::default();
        config.settings.default_interval = 60;
        config.sinks.insert("S".into(), PluginConfig::new("log"));
        config.sources.insert("Src".into(), PluginConfig::new("static").param("items", vec![1, 2]));
        let assembler = JobAssembler::new(&config, &plugins);

        let job = assembler.assemble("zero", &JobConfig::new("Src", "S").interval(0)).unwrap();
        assert_eq!(job.interval(), Duration::from_secs(60));
        let job = assembler.assemble("fast", &JobConfig::new("Src", "S").interval(5)).unwrap();
        assert_eq!(job.interval(), Duration::from_secs(5));
        assert_eq!(job.name(), "fast");
    }

    #[test]
    fn missing_references_name_job_slot_and_name() {
        let plugins = Plugins::builtin();
        let mut config = GlobalConfig::default();
        config.sinks.insert("S".into(), PluginConfig::new("log"));
        config.sources.insert("Src".into(), PluginConfig::new("static").param("items", vec![1]));
        let assembler = JobAssembler::new(&config, &plugins);

        let cases = [
            (JobConfig::new("nope", "S"), StageKind::Source, "nope"),
            (JobConfig::new("Src", "gone"), StageKind::Sink, "gone"),
            (JobConfig::new("Src", "S").filter("ghost"), StageKind::Filter, "ghost"),
            (JobConfig::new("Src", "S").transform("phantom"), StageKind::Transform, "phantom"),
        ];
        for (spec, slot, missing) in cases {
            let err = assembler.assemble("broken", &spec).unwrap_err();
            assert!(err.is_missing_reference(), "{err}");
            assert_eq!(err.job, "broken");
            assert_eq!(err.slot, Some(slot));
            assert_eq!(err.to_string(), format!("job `broken`: {slot} `{missing}` is not configured"));
        }
    }

    #[test]
    fn unknown_type_is_reported() {
        let plugins = Plugins::builtin();
        let mut config = GlobalConfig::default();
        config.sinks.insert("S".into(), PluginConfig::new("webdav"));
        config.sources.insert("Src".into(), PluginConfig::new("static").param("items", vec![1]));

        let err = JobAssembler::new(&config, &plugins)
            .assemble("upload", &JobConfig::new("Src", "S"))
            .unwrap_err();
        assert!(err.is_unknown_type());
        assert_eq!(err.slot, Some(StageKind::Sink));
        assert_eq!(err.to_string(), "job `upload`: sink `S` has unknown plugin type `webdav`");
    }

    #[test]
    fn unknown_type_names_every_slot() {
        let plugins = Plugins::builtin();
        let mut config = GlobalConfig::default();
        config.sinks.insert("S".into(), PluginConfig::new("log"));
        config.sources.insert("Src".into(), PluginConfig::new("static").param("items", vec![1]));
        config.sources.insert("Ftp".into(), PluginConfig::new("ftp"));
        config.filters.insert("Fuzzy".into(), PluginConfig::new("fuzzy"));
        config.transforms.insert("Morph".into(), PluginConfig::new("morph"));
        let assembler = JobAssembler::new(&config, &plugins);

        let cases = [
            (JobConfig::new("Ftp", "S"), StageKind::Source, "Ftp", "ftp"),
            (JobConfig::new("Src", "S").filter("Fuzzy"), StageKind::Filter, "Fuzzy", "fuzzy"),
            (JobConfig::new("Src", "S").transform("Morph"), StageKind::Transform, "Morph", "morph"),
        ];
        for (spec, slot, name, tag) in cases {
            let err = assembler.assemble("odd", &spec).unwrap_err();
            assert!(err.is_unknown_type(), "{err}");
            assert_eq!(err.slot, Some(slot));
            assert_eq!(
                err.to_string(),
                format!("job `odd`: {slot} `{name}` has unknown plugin type `{tag}`")
            );
        }
    }

    #[test]
    fn zero_interval_is_a_job_level_error() {
        let plugins = Plugins::builtin();
        let mut config = GlobalConfig::default();
        config.settings.default_interval = 0;
        config.sinks.insert("S".into(), PluginConfig::new("log"));
        config.sources.insert("Src".into(), PluginConfig::new("static").param("items", vec![1]));

        let err = JobAssembler::new(&config, &plugins)
            .assemble("idle", &JobConfig::new("Src", "S"))
            .unwrap_err();
        assert!(matches!(err.kind, AssembleErrorKind::ZeroInterval));
        assert_eq!(err.slot, None);
        assert_eq!(err.to_string(), "job `idle`: effective interval is zero");
    }

    #[test]
    fn construction_failure_carries_plugin_error() {
        let plugins = Plugins::builtin();
        let mut config = GlobalConfig::default();
        config.sinks.insert("S".into(), PluginConfig::new("log"));
        config.sources.insert("Src".into(), PluginConfig::new("static").param("items", vec![1]));
        config.filters.insert("bad".into(), PluginConfig::new("key_pattern").param("pattern", "("));

        let err = JobAssembler::new(&config, &plugins)
            .assemble("j", &JobConfig::new("Src", "S").filter("bad"))
            .unwrap_err();
        assert!(matches!(
            err.kind,
            AssembleErrorKind::Construction { slot: StageKind::Filter, ref name, .. } if name == "bad"
        ));
    }

    #[test]
    fn failed_assembly_builds_no_source() {
        let built = Arc::new(Mutex::new(0usize));
        let mut plugins = Plugins::builtin();
        let b = built.clone();
        plugins.sources.register("counted", move |_: &PluginConfig, sink| -> GatherFlowResult<Box<dyn Source>> {
            *b.lock().unwrap() += 1;
            Ok(Box::new(OneShot { item: Item::new("x", 0), sink }))
        });

        let mut config = GlobalConfig::default();
        config.sinks.insert("S".into(), PluginConfig::new("log"));
        config.sources.insert("Src".into(), PluginConfig::new("counted"));

        let result = JobAssembler::new(&config, &plugins)
            .assemble("j", &JobConfig::new("Src", "S").transform("missing"));
        assert!(result.is_err());
        assert_eq!(*built.lock().unwrap(), 0);
    }
}
