pub mod runner;
pub mod state;

pub use runner::run_scheduler;
pub use state::{JobState, RunStatus, SchedulerState};
