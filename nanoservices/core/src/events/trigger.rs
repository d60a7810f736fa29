use std::time::Duration;

/// What caused a job run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// The job's interval elapsed
    Interval(Duration),
    /// Someone asked for a run through a trigger handle
    Manual,
}

/// An event delivered to the scheduler.
#[derive(Debug, Clone)]
pub struct TriggerEvent {
    /// Which job this event is for
    pub job: String,
    pub trigger: Trigger,
}
