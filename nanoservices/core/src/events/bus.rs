use tokio::sync::mpsc;
use crate::events::trigger::{Trigger, TriggerEvent};

/// Channel-based event bus for delivering trigger events to the scheduler.
pub struct EventBus {
    sender: mpsc::Sender<TriggerEvent>,
    receiver: mpsc::Receiver<TriggerEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity);
        Self { sender, receiver }
    }

    /// Get a sender handle that can be cloned and given to trigger producers.
    pub fn sender(&self) -> mpsc::Sender<TriggerEvent> {
        self.sender.clone()
    }

    /// Split into sender and receiver (consumes self).
    pub fn split(self) -> (mpsc::Sender<TriggerEvent>, mpsc::Receiver<TriggerEvent>) {
        (self.sender, self.receiver)
    }
}

/// Lets callers fire a job outside its schedule.
#[derive(Clone, Debug)]
pub struct TriggerHandle {
    sender: mpsc::Sender<TriggerEvent>,
}

impl TriggerHandle {
    pub fn new(sender: mpsc::Sender<TriggerEvent>) -> Self {
        Self { sender }
    }

    /// Request a run of `job`. Returns false once the scheduler is gone.
    pub async fn trigger(&self, job: impl Into<String>) -> bool {
        let event = TriggerEvent { job: job.into(), trigger: Trigger::Manual };
        self.sender.send(event).await.is_ok()
    }
}
