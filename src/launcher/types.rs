use serde::Serialize;

use crate::docker::ContainerHandle;
use crate::registry::DemoDescriptor;

/// Status shown before anything has happened.
pub const INITIAL_STATUS: &str = "Select a demo and click launch.";
pub const SELECT_PROMPT: &str = "Please select a demo to launch.";
pub const ALL_STOPPED: &str = "All demos have been stopped.";

/// Result of a stop-all sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StopReport {
    /// Containers stopped and removed, in teardown order.
    pub stopped: Vec<String>,
    /// Containers the runtime refused to look up, stop or remove, with the error.
    pub failures: Vec<(String, String)>,
}

impl StopReport {
    pub fn message(&self) -> String {
        ALL_STOPPED.to_string()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Every container the sweep acted on or failed at, deduplicated.
    pub fn touched(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        let names = self.stopped.iter().chain(self.failures.iter().map(|(name, _)| name));
        for name in names {
            if !out.contains(&name.as_str()) {
                out.push(name.as_str());
            }
        }
        out
    }
}

/// What `launch_demo` ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// Nothing was selected.
    NoSelection,
    /// The selection is not in the registry.
    UnknownDemo { name: String },
    /// Compose brought the service up.
    Started {
        demo: DemoDescriptor,
        /// Informational only; the lookup may have failed.
        container: Option<ContainerHandle>,
    },
    /// Compose failed. `error` is for logs, never for the user.
    Failed { demo: DemoDescriptor, error: String },
}

impl LaunchOutcome {
    /// Markdown message for the user.
    pub fn message(&self) -> String {
        match self {
            LaunchOutcome::NoSelection => SELECT_PROMPT.to_string(),
            LaunchOutcome::UnknownDemo { name } => {
                format!("Unknown demo: {name}. Please select one of the listed demos.")
            }
            LaunchOutcome::Started { demo, .. } => format!(
                "✅ **{} is starting!** It may take a moment to become available.\n\n\
                 Access it here: [{url}]({url})",
                demo.display_name,
                url = demo.url
            ),
            LaunchOutcome::Failed { demo, .. } => format!(
                "❌ Error launching {}. Check logs for details.",
                demo.display_name
            ),
        }
    }

    /// Short machine-readable status for the JSON API.
    pub fn status(&self) -> &'static str {
        match self {
            LaunchOutcome::NoSelection => "no_selection",
            LaunchOutcome::UnknownDemo { .. } => "unknown_demo",
            LaunchOutcome::Started { .. } => "started",
            LaunchOutcome::Failed { .. } => "failed",
        }
    }

    pub fn is_started(&self) -> bool {
        matches!(self, LaunchOutcome::Started { .. })
    }

    /// Display name of the demo that is now live, if any.
    pub fn launched(&self) -> Option<&str> {
        match self {
            LaunchOutcome::Started { demo, .. } => Some(&demo.display_name),
            _ => None,
        }
    }
}

/// Where a launch currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchPhase {
    StoppingAll,
    /// Waiting for the old containers to let go of their ports.
    Releasing,
    Starting { demo: String },
}

impl LaunchPhase {
    pub fn label(&self) -> String {
        match self {
            LaunchPhase::StoppingAll => "Stopping running demos…".to_string(),
            LaunchPhase::Releasing => "Waiting for ports to be released…".to_string(),
            LaunchPhase::Starting { demo } => format!("Starting {demo}…"),
        }
    }
}

/// Final result of a background operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub message: String,
    /// Display name of the demo now running, when the operation launched one.
    pub launched: Option<String>,
}

/// Events emitted while a launcher operation runs on a worker thread.
///
/// The final event is always `Finished`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LauncherEvent {
    PhaseChanged(LaunchPhase),
    Log(String),
    Finished(Completion),
}
