use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use uuid::Uuid;

use gatherflow_utils::RunSummary;
use crate::events::trigger::TriggerEvent;
use crate::pipeline::Job;
use crate::scheduler::state::{RunStatus, SchedulerState};

/// Result of a single job run, handed back to the scheduler loop.
struct RunResult {
    run_id: String,
    job: String,
    status: RunStatus,
    summary: Option<RunSummary>,
    error: Option<String>,
    duration_ms: u64,
}

/// The scheduler loop. Receives trigger events and runs jobs.
///
/// Every run executes on its own task and is aborted once it exceeds
/// `timeout` (or the job's interval when `timeout` is `None`), so a stuck job
/// never holds up the others. A trigger for a job that is still running is
/// skipped. On shutdown no new runs start and in-flight runs are awaited.
pub async fn run_scheduler(
    mut event_rx: mpsc::Receiver<TriggerEvent>,
    jobs: HashMap<String, Arc<Job>>,
    timeout: Option<Duration>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> SchedulerState {
    let mut state = SchedulerState::new();
    let mut running: JoinSet<RunResult> = JoinSet::new();

    loop {
        tokio::select! {
            Some(event) = event_rx.recv() => {
                let Some(job) = jobs.get(&event.job) else {
                    tracing::warn!(job = %event.job, "received trigger for unknown job");
                    continue;
                };

                let run_id = Uuid::new_v4().to_string();
                if !state.try_start(job.name(), &run_id) {
                    tracing::warn!(job = %job.name(), "previous run still in flight, skipping trigger");
                    crate::metrics::inc_skipped(job.name());
                    continue;
                }

                tracing::debug!(job = %job.name(), run = %run_id, trigger = ?event.trigger, "dispatching run");
                let limit = timeout.unwrap_or_else(|| job.interval());
                running.spawn(execute(run_id, job.clone(), limit));
            }

            Some(joined) = running.join_next(), if !running.is_empty() => {
                match joined {
                    Ok(result) => record(&mut state, result),
                    Err(e) => tracing::error!(error = %e, "run supervisor task failed"),
                }
            }

            _ = shutdown_rx.changed() => {
                tracing::info!(in_flight = state.in_flight(), "scheduler shutting down");
                break;
            }
        }
    }

    while let Some(joined) = running.join_next().await {
        match joined {
            Ok(result) => record(&mut state, result),
            Err(e) => tracing::error!(error = %e, "run supervisor task failed"),
        }
    }

    state
}

/// Run one job on its own task, bounded by `limit`.
async fn execute(run_id: String, job: Arc<Job>, limit: Duration) -> RunResult {
    let start = Instant::now();
    let name = job.name().to_string();
    let mut handle = tokio::spawn(async move { job.run().await });

    let (status, summary, error) = match tokio::time::timeout(limit, &mut handle).await {
        Ok(Ok(Ok(summary))) => (RunStatus::Completed, Some(summary), None),
        Ok(Ok(Err(e))) => (RunStatus::Failed, None, Some(e.to_string())),
        Ok(Err(join_err)) => (RunStatus::Failed, None, Some(format!("run task failed: {join_err}"))),
        Err(_) => {
            handle.abort();
            (RunStatus::TimedOut, None, Some(format!("run exceeded {}ms", limit.as_millis())))
        }
    };

    RunResult {
        run_id,
        job: name,
        status,
        summary,
        error,
        duration_ms: start.elapsed().as_millis() as u64,
    }
}

fn record(state: &mut SchedulerState, result: RunResult) {
    state.finish(&result.job, &result.run_id, result.status);

    crate::metrics::inc_run(&result.job);
    crate::metrics::observe_duration(&result.job, result.duration_ms as f64);

    match (&result.summary, &result.error) {
        (Some(summary), _) => {
            crate::metrics::add_items(&result.job, summary.produced as u64);
            tracing::info!(
                job = %result.job,
                run = %result.run_id,
                items = summary.produced,
                duration_ms = result.duration_ms,
                "job run finished"
            );
        }
        (None, error) => {
            crate::metrics::inc_failure(&result.job);
            tracing::error!(
                job = %result.job,
                run = %result.run_id,
                status = result.status.as_str(),
                error = error.as_deref().unwrap_or("unknown"),
                duration_ms = result.duration_ms,
                "job run failed"
            );
        }
    }
}
