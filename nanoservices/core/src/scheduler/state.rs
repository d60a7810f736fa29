use std::collections::HashMap;

/// How a single job run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    Failed,
    TimedOut,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
            RunStatus::TimedOut => "timed_out",
        }
    }
}

/// Bookkeeping for one job across its runs.
#[derive(Debug, Clone, Default)]
pub struct JobState {
    /// Id of the run currently executing, if any.
    pub in_flight: Option<String>,
    pub runs: u64,
    pub failures: u64,
    /// Triggers ignored because a run was still in flight.
    pub skipped: u64,
    pub last_status: Option<RunStatus>,
}

/// In-memory scheduler state. A job never has more than one run in flight.
#[derive(Debug, Default)]
pub struct SchedulerState {
    jobs: HashMap<String, JobState>,
}

impl SchedulerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a run slot for `job` under `run_id`. Returns false, and counts a
    /// skip, when the job is already running.
    pub fn try_start(&mut self, job: &str, run_id: &str) -> bool {
        let state = self.jobs.entry(job.to_string()).or_default();
        if state.in_flight.is_some() {
            state.skipped += 1;
            return false;
        }
        state.in_flight = Some(run_id.to_string());
        true
    }

    /// Record the end of a run. Stale run ids are ignored.
    pub fn finish(&mut self, job: &str, run_id: &str, status: RunStatus) {
        let Some(state) = self.jobs.get_mut(job) else {
            return;
        };
        if state.in_flight.as_deref() != Some(run_id) {
            return;
        }
        state.in_flight = None;
        state.runs += 1;
        if status != RunStatus::Completed {
            state.failures += 1;
        }
        state.last_status = Some(status);
    }

    pub fn job(&self, job: &str) -> Option<&JobState> {
        self.jobs.get(job)
    }

    /// Number of runs currently executing.
    pub fn in_flight(&self) -> usize {
        self.jobs.values().filter(|s| s.in_flight.is_some()).count()
    }
}
