use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::control::Launcher;
use super::types::{Completion, LauncherEvent};
use crate::docker::CancelToken;

/// A launcher shared between UI surfaces. The mutex serialises operations,
/// so at most one stop or launch touches the runtime at a time.
pub type SharedLauncher = Arc<Mutex<Launcher>>;

pub fn shared(launcher: Launcher) -> SharedLauncher {
    Arc::new(Mutex::new(launcher))
}

/// Lock the launcher, recovering from a panicked holder.
pub fn lock(shared: &SharedLauncher) -> MutexGuard<'_, Launcher> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Run `launch_demo` on a background thread.
///
/// Returns a receiver that streams [`LauncherEvent`] values. The final
/// event is always `Finished`.
pub fn spawn_launch(
    shared: SharedLauncher,
    selection: Option<String>,
    cancel: CancelToken,
) -> Receiver<LauncherEvent> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut launcher = lock(&shared);
        let outcome = launcher.launch_demo_with(selection.as_deref(), &cancel, &mut |event| {
            // Receiver may be dropped; ignore send errors.
            let _ = tx.send(event);
        });
        let _ = tx.send(LauncherEvent::Finished(Completion {
            message: outcome.message(),
            launched: outcome.launched().map(str::to_string),
        }));
    });
    rx
}

/// Run `stop_all_demos` on a background thread.
pub fn spawn_stop_all(shared: SharedLauncher) -> Receiver<LauncherEvent> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let report = lock(&shared).stop_all_demos();
        for (service, error) in &report.failures {
            let _ = tx.send(LauncherEvent::Log(format!("{service}: {error}")));
        }
        let _ = tx.send(LauncherEvent::Finished(Completion {
            message: report.message(),
            launched: None,
        }));
    });
    rx
}
