use std::io::BufRead;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use super::types::{CancelToken, OutputLine, ProcessCommand, ProcessResult};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Spawn a process and return a channel that streams its output.
///
/// The caller receives [`OutputLine::Stdout`]/[`Stderr`] as they arrive,
/// followed by exactly one [`OutputLine::Done`] carrying the final result.
pub fn spawn(cmd: ProcessCommand, cancel: CancelToken) -> Result<Receiver<OutputLine>> {
    let mut command = Command::new(&cmd.program);
    command
        .args(&cmd.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = &cmd.current_dir {
        command.current_dir(dir);
    }

    let mut child = command
        .spawn()
        .with_context(|| format!("failed to spawn `{}`", cmd.display()))?;

    let stdout = child.stdout.take().context("stdout was not piped")?;
    let stderr = child.stderr.take().context("stderr was not piped")?;

    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || {
        supervise(child, stdout, stderr, tx, cancel, cmd.timeout);
    });

    Ok(rx)
}

fn forward_lines<R: std::io::Read + Send + 'static>(
    reader: R,
    tx: Sender<OutputLine>,
    wrap: fn(String) -> OutputLine,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let reader = std::io::BufReader::new(reader);
        for line in reader.lines() {
            let Ok(l) = line else { break };
            // Receiver may be dropped; ignore send errors.
            let _ = tx.send(wrap(l));
        }
    })
}

fn supervise(
    mut child: std::process::Child,
    stdout: std::process::ChildStdout,
    stderr: std::process::ChildStderr,
    tx: Sender<OutputLine>,
    cancel: CancelToken,
    timeout: Option<Duration>,
) {
    let stdout_handle = forward_lines(stdout, tx.clone(), OutputLine::Stdout);
    let stderr_handle = forward_lines(stderr, tx.clone(), OutputLine::Stderr);

    // --- poll loop ---------------------------------------------------------
    let start = Instant::now();
    let mut cancelled = false;
    let mut timed_out = false;

    let exit_status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break Some(status),
            Ok(None) => {}
            Err(_) => break None,
        }

        if cancel.is_cancelled() {
            cancelled = true;
            let _ = child.kill();
            let _ = child.wait();
            break None;
        }

        if timeout.is_some_and(|t| start.elapsed() > t) {
            timed_out = true;
            let _ = child.kill();
            let _ = child.wait();
            break None;
        }

        std::thread::sleep(POLL_INTERVAL);
    };

    // --- finalize ----------------------------------------------------------
    let _ = stdout_handle.join();
    let _ = stderr_handle.join();

    let exit_code = exit_status.and_then(|s| s.code());

    let _ = tx.send(OutputLine::Done(ProcessResult {
        success: exit_code == Some(0),
        exit_code,
        cancelled,
        timed_out,
    }));
}

/// Output of a short-lived command run to completion.
#[derive(Debug)]
pub struct Captured {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Run a command to completion and capture its output.
pub fn capture(cmd: &ProcessCommand) -> Result<Captured> {
    let mut command = Command::new(&cmd.program);
    command.args(&cmd.args).stdin(Stdio::null());
    if let Some(dir) = &cmd.current_dir {
        command.current_dir(dir);
    }
    let output = command
        .output()
        .with_context(|| format!("failed to invoke `{}`", cmd.display()))?;
    Ok(Captured {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
