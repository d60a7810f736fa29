use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use crate::events::trigger::{Trigger, TriggerEvent};

/// Spawns a task that asks for a run of `job` every `interval`.
///
/// With `run_on_start` the first event is sent immediately, otherwise after
/// one full interval. Ticks missed while the scheduler is busy are skipped
/// rather than bunched up. The task ends when the receiver is dropped.
pub fn spawn_interval_trigger(
    job: String,
    interval: Duration,
    run_on_start: bool,
    sender: mpsc::Sender<TriggerEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        if !run_on_start {
            ticker.tick().await;
        }
        loop {
            ticker.tick().await;
            let event = TriggerEvent {
                job: job.clone(),
                trigger: Trigger::Interval(interval),
            };
            if sender.send(event).await.is_err() {
                tracing::debug!(job = %job, "scheduler gone, interval trigger stopping");
                break;
            }
        }
    })
}
