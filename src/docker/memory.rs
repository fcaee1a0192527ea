use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Result, bail};

use super::runtime::ContainerRuntime;
use super::types::{CancelToken, ContainerHandle};

/// A runtime call recorded by [`InMemoryRuntime`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeCall {
    Get(String),
    Stop(String),
    Remove(String),
    ComposeUp(String),
}

#[derive(Debug, Default)]
struct State {
    containers: BTreeMap<String, ContainerHandle>,
    calls: Vec<RuntimeCall>,
    failing: HashSet<String>,
    stuck: HashSet<String>,
    compose_deps: HashMap<String, Vec<String>>,
    next_id: u64,
}

impl State {
    fn start(&mut self, name: &str) {
        self.next_id += 1;
        let id = format!("{:012x}", self.next_id);
        self.containers.insert(
            name.to_string(),
            ContainerHandle {
                id,
                name: name.to_string(),
                status: "running".to_string(),
            },
        );
    }
}

/// Container runtime that only exists in memory.
///
/// Clones share state, so a test can keep one handle while the launcher owns
/// another. Also backs `--dry-run`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRuntime {
    state: Arc<Mutex<State>>,
}

impl InMemoryRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a container outside of compose, as if left over from a
    /// previous run.
    pub fn start(&self, name: &str) {
        self.lock().start(name);
    }

    /// Make `compose_up` fail for `service`.
    pub fn fail_compose_for(&self, service: &str) {
        self.lock().failing.insert(service.to_string());
    }

    /// Make `stop_container` fail for `name`, leaving it running.
    pub fn fail_stop_for(&self, name: &str) {
        self.lock().stuck.insert(name.to_string());
    }

    /// Starting `service` via compose also starts `deps`, like `depends_on`.
    pub fn with_compose_deps<I, S>(self, service: &str, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lock()
            .compose_deps
            .insert(service.to_string(), deps.into_iter().map(Into::into).collect());
        self
    }

    /// Names of containers currently running, sorted.
    pub fn running(&self) -> Vec<String> {
        self.lock()
            .containers
            .values()
            .filter(|c| c.is_running())
            .map(|c| c.name.clone())
            .collect()
    }

    /// Names of all known containers, running or not, sorted.
    pub fn existing(&self) -> Vec<String> {
        self.lock().containers.keys().cloned().collect()
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.lock()
            .containers
            .get(name)
            .is_some_and(ContainerHandle::is_running)
    }

    pub fn calls(&self) -> Vec<RuntimeCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }
}

impl ContainerRuntime for InMemoryRuntime {
    fn get_container(&self, name: &str) -> Result<Option<ContainerHandle>> {
        let mut state = self.lock();
        state.calls.push(RuntimeCall::Get(name.to_string()));
        Ok(state.containers.get(name).cloned())
    }

    fn stop_container(&self, container: &ContainerHandle) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(RuntimeCall::Stop(container.name.clone()));
        if state.stuck.contains(&container.name) {
            bail!("cannot stop container {}: did not exit in time", container.name);
        }
        match state.containers.get_mut(&container.name) {
            Some(c) => {
                c.status = "exited".to_string();
                Ok(())
            }
            None => bail!("No such container: {}", container.name),
        }
    }

    fn remove_container(&self, container: &ContainerHandle) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(RuntimeCall::Remove(container.name.clone()));
        match state.containers.remove(&container.name) {
            Some(c) if c.is_running() => {
                let name = c.name.clone();
                state.containers.insert(name.clone(), c);
                bail!("cannot remove running container {name}; stop it first")
            }
            Some(_) => Ok(()),
            None => bail!("No such container: {}", container.name),
        }
    }

    fn compose_up(
        &self,
        service: &str,
        cancel: &CancelToken,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(RuntimeCall::ComposeUp(service.to_string()));
        if cancel.is_cancelled() {
            bail!("compose up for {service} was cancelled");
        }
        if state.failing.contains(service) {
            on_line(&format!("Error response from daemon: {service} failed to start"));
            bail!("compose up for {service} exited with status 1");
        }
        let deps = state.compose_deps.get(service).cloned().unwrap_or_default();
        for name in deps.iter().map(String::as_str).chain([service]) {
            state.start(name);
            on_line(&format!("Container {name}  Started"));
        }
        Ok(())
    }
}
