use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::Serialize;

/// Cooperative cancellation token backed by an `AtomicBool`.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Signal cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Snapshot of a container as reported by the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerHandle {
    pub id: String,
    pub name: String,
    pub status: String,
}

impl ContainerHandle {
    pub fn is_running(&self) -> bool {
        self.status == "running"
    }
}

/// A process invocation. `program` is looked up on PATH.
#[derive(Debug, Clone)]
pub struct ProcessCommand {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
    /// Kill the process after this long. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl ProcessCommand {
    /// Render the invocation for logs.
    pub fn display(&self) -> String {
        let mut words = Vec::with_capacity(self.args.len() + 1);
        words.push(self.program.as_str());
        words.extend(self.args.iter().map(String::as_str));
        shell_words::join(words)
    }
}

/// Outcome of a streamed process run.
#[derive(Debug)]
pub struct ProcessResult {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub cancelled: bool,
    pub timed_out: bool,
}

/// Streamed output from a running process.
#[derive(Debug)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
    Done(ProcessResult),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_token_starts_uncancelled() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn cancel_token_transitions_once() {
        let token = CancelToken::new();
        token.cancel();
        assert!(token.is_cancelled());
        // Idempotent; calling again is fine.
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn cancel_token_is_visible_across_clones() {
        let a = CancelToken::new();
        let b = a.clone();
        a.cancel();
        assert!(b.is_cancelled());
    }

    #[test]
    fn display_quotes_arguments_with_spaces() {
        let cmd = ProcessCommand {
            program: "docker".into(),
            args: vec!["compose".into(), "-f".into(), "my file.yml".into()],
            current_dir: None,
            timeout: None,
        };
        assert_eq!(cmd.display(), "docker compose -f 'my file.yml'");
    }

    #[test]
    fn handle_running_status() {
        let handle = ContainerHandle {
            id: "abc".into(),
            name: "svc".into(),
            status: "running".into(),
        };
        assert!(handle.is_running());
        let exited = ContainerHandle {
            status: "exited".into(),
            ..handle
        };
        assert!(!exited.is_running());
    }
}
