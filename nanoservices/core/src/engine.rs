use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use gatherflow_utils::error::Error;
use gatherflow_utils::GatherFlowResult;

use crate::builder::{AssembleError, JobAssembler};
use crate::config::{AssemblyPolicy, GlobalConfig};
use crate::events::bus::{EventBus, TriggerHandle};
use crate::events::interval::spawn_interval_trigger;
use crate::pipeline::Job;
use crate::registry::Plugins;
use crate::scheduler::{run_scheduler, SchedulerState};

/// Top-level orchestrator: assembles every configured job once, then drives
/// them on their intervals.
pub struct GatherFlow {
    config: GlobalConfig,
    jobs: Vec<Arc<Job>>,
    failures: Vec<AssembleError>,
    bus: EventBus,
}

impl GatherFlow {
    /// Assemble all jobs of `config`, in job-name order.
    ///
    /// With `on_assembly_error: abort` the first broken job is returned as the
    /// error. With `skip` it is logged, kept in [`Self::assembly_failures`],
    /// and the other jobs are still assembled.
    pub fn new(config: GlobalConfig, plugins: &Plugins) -> Result<Self, AssembleError> {
        let assembler = JobAssembler::new(&config, plugins);
        let mut names: Vec<&String> = config.jobs.keys().collect();
        names.sort();

        let mut jobs = Vec::with_capacity(names.len());
        let mut failures = Vec::new();
        for name in names {
            match assembler.assemble(name, &config.jobs[name]) {
                Ok(job) => {
                    tracing::info!(job = %name, interval_secs = job.interval().as_secs(), "job ready");
                    jobs.push(Arc::new(job));
                }
                Err(e) if config.settings.on_assembly_error == AssemblyPolicy::Skip => {
                    tracing::error!(job = %name, slot = ?e.slot, error = %e, "skipping job that failed to assemble");
                    failures.push(e);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(Self {
            config,
            jobs,
            failures,
            bus: EventBus::new(256),
        })
    }

    pub fn config(&self) -> &GlobalConfig {
        &self.config
    }

    pub fn jobs(&self) -> &[Arc<Job>] {
        &self.jobs
    }

    pub fn job(&self, name: &str) -> Option<&Arc<Job>> {
        self.jobs.iter().find(|j| j.name() == name)
    }

    /// Jobs skipped under `on_assembly_error: skip`.
    pub fn assembly_failures(&self) -> &[AssembleError] {
        &self.failures
    }

    /// A handle for firing jobs on demand while the scheduler runs.
    pub fn trigger_handle(&self) -> TriggerHandle {
        TriggerHandle::new(self.bus.sender())
    }

    /// Run the scheduler until Ctrl-C.
    pub async fn run(self) -> GatherFlowResult<SchedulerState> {
        let shutdown = tokio::signal::ctrl_c();
        self.run_with_shutdown(async { let _ = shutdown.await; }).await
    }

    /// Run with a custom shutdown signal (useful for testing).
    pub async fn run_with_shutdown<F: Future>(self, shutdown: F) -> GatherFlowResult<SchedulerState> {
        let settings = &self.config.settings;
        let (event_tx, event_rx) = self.bus.split();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let mut trigger_handles = Vec::with_capacity(self.jobs.len());
        let mut job_map: HashMap<String, Arc<Job>> = HashMap::new();
        for job in self.jobs {
            trigger_handles.push(spawn_interval_trigger(
                job.name().to_string(),
                job.interval(),
                settings.run_on_start,
                event_tx.clone(),
            ));
            job_map.insert(job.name().to_string(), job);
        }
        drop(event_tx);

        let timeout = settings.run_timeout.map(Duration::from_secs);
        tracing::info!(jobs = job_map.len(), "scheduler starting");
        let scheduler = tokio::spawn(run_scheduler(event_rx, job_map, timeout, shutdown_rx));

        shutdown.await;

        let _ = shutdown_tx.send(true);
        for handle in trigger_handles {
            handle.abort();
        }

        let state = scheduler
            .await
            .map_err(|e| Error::stage(format!("scheduler task failed: {e}")))?;
        tracing::info!("gatherflow shutdown complete");
        Ok(state)
    }
}
