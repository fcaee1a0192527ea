use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::debug;

use super::run::{self, Captured};
use super::runtime::ContainerRuntime;
use super::types::{CancelToken, ContainerHandle, OutputLine, ProcessCommand};
use crate::config::{ComposeCommand, Config};

const INSPECT_FORMAT: &str = "{{.Id}}|{{.Name}}|{{.State.Status}}";

/// Verify that the Docker daemon is reachable.
pub fn ensure_available() -> Result<()> {
    let status = Command::new("docker")
        .args(["version", "--format", "{{.Server.Version}}"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .context("failed to invoke `docker`; is it installed and on PATH?")?;

    if !status.success() {
        bail!("docker daemon is not running (exit {})", status);
    }
    Ok(())
}

/// Container runtime backed by the `docker` CLI.
#[derive(Debug, Clone)]
pub struct DockerCli {
    docker: String,
    compose: ComposeCommand,
    compose_file: Option<PathBuf>,
    project_dir: Option<PathBuf>,
    project_name: Option<String>,
    compose_timeout: Option<Duration>,
}

impl Default for DockerCli {
    fn default() -> Self {
        Self {
            docker: "docker".to_string(),
            compose: ComposeCommand::default(),
            compose_file: None,
            project_dir: None,
            project_name: None,
            compose_timeout: None,
        }
    }
}

impl DockerCli {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            docker: "docker".to_string(),
            compose: cfg.compose_command.clone(),
            compose_file: cfg.compose_file.clone(),
            project_dir: cfg.project_dir.clone(),
            project_name: cfg.project_name.clone(),
            compose_timeout: cfg.compose_timeout(),
        }
    }

    fn docker_command(&self, args: Vec<String>) -> ProcessCommand {
        ProcessCommand {
            program: self.docker.clone(),
            args,
            current_dir: None,
            timeout: None,
        }
    }

    pub fn inspect_command(&self, name: &str) -> ProcessCommand {
        self.docker_command(vec![
            "inspect".into(),
            "--type".into(),
            "container".into(),
            "--format".into(),
            INSPECT_FORMAT.into(),
            name.into(),
        ])
    }

    pub fn stop_command(&self, container: &ContainerHandle) -> ProcessCommand {
        self.docker_command(vec!["stop".into(), container.id.clone()])
    }

    pub fn remove_command(&self, container: &ContainerHandle) -> ProcessCommand {
        self.docker_command(vec!["rm".into(), container.id.clone()])
    }

    /// `docker compose [-f FILE] [-p NAME] up -d SERVICE`
    pub fn compose_up_command(&self, service: &str) -> ProcessCommand {
        let mut args: Vec<String> = self.compose.leading_args().to_vec();
        if let Some(file) = &self.compose_file {
            args.push("-f".into());
            args.push(file.display().to_string());
        }
        if let Some(name) = &self.project_name {
            args.push("-p".into());
            args.push(name.clone());
        }
        args.extend(["up".into(), "-d".into(), service.to_string()]);

        ProcessCommand {
            program: self.compose.program().to_string(),
            args,
            current_dir: self.project_dir.clone(),
            timeout: self.compose_timeout,
        }
    }

    fn run_checked(&self, cmd: ProcessCommand) -> Result<Captured> {
        debug!(command = %cmd.display(), "running docker command");
        let out = run::capture(&cmd)?;
        if !out.success {
            bail!("`{}` failed: {}", cmd.display(), out.stderr.trim());
        }
        Ok(out)
    }
}

/// Parse one line of `docker inspect` output in [`INSPECT_FORMAT`].
fn parse_inspect(line: &str) -> Option<ContainerHandle> {
    let mut parts = line.trim().splitn(3, '|');
    let id = parts.next()?.to_string();
    let name = parts.next()?.trim_start_matches('/').to_string();
    let status = parts.next()?.to_string();
    if id.is_empty() {
        return None;
    }
    Some(ContainerHandle { id, name, status })
}

fn is_not_found(stderr: &str) -> bool {
    let lower = stderr.to_ascii_lowercase();
    lower.contains("no such container") || lower.contains("no such object")
}

impl ContainerRuntime for DockerCli {
    fn get_container(&self, name: &str) -> Result<Option<ContainerHandle>> {
        let cmd = self.inspect_command(name);
        let out = run::capture(&cmd)?;
        if !out.success {
            if is_not_found(&out.stderr) {
                return Ok(None);
            }
            bail!("`{}` failed: {}", cmd.display(), out.stderr.trim());
        }
        let handle = out
            .stdout
            .lines()
            .find_map(parse_inspect)
            .with_context(|| format!("unexpected `docker inspect` output for {name}"))?;
        Ok(Some(handle))
    }

    fn stop_container(&self, container: &ContainerHandle) -> Result<()> {
        self.run_checked(self.stop_command(container))?;
        Ok(())
    }

    fn remove_container(&self, container: &ContainerHandle) -> Result<()> {
        self.run_checked(self.remove_command(container))?;
        Ok(())
    }

    fn compose_up(
        &self,
        service: &str,
        cancel: &CancelToken,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<()> {
        let cmd = self.compose_up_command(service);
        let shown = cmd.display();
        debug!(command = %shown, "running compose");

        let rx = run::spawn(cmd, cancel.clone())?;
        for line in rx {
            match line {
                OutputLine::Stdout(s) | OutputLine::Stderr(s) => on_line(&s),
                OutputLine::Done(result) => {
                    if result.cancelled {
                        bail!("`{shown}` was cancelled");
                    }
                    if result.timed_out {
                        bail!("`{shown}` timed out");
                    }
                    if !result.success {
                        match result.exit_code {
                            Some(code) => bail!("`{shown}` exited with status {code}"),
                            None => bail!("`{shown}` was terminated by a signal"),
                        }
                    }
                    return Ok(());
                }
            }
        }
        bail!("`{shown}` ended without reporting a result")
    }
}
