// Launcher control: stop everything, start one demo, report back.

mod control;
mod types;
mod worker;

pub use control::Launcher;
pub use types::{
    ALL_STOPPED, Completion, INITIAL_STATUS, LaunchOutcome, LaunchPhase, LauncherEvent,
    SELECT_PROMPT, StopReport,
};
pub use worker::{SharedLauncher, lock, shared, spawn_launch, spawn_stop_all};
