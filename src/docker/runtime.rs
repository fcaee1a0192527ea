use anyhow::Result;

use super::types::{CancelToken, ContainerHandle};

/// The container operations the launcher relies on.
///
/// Implementations are driven from one thread at a time; the launcher is
/// kept behind a mutex.
pub trait ContainerRuntime: Send {
    /// Look a container up by name. A missing container is `Ok(None)`.
    fn get_container(&self, name: &str) -> Result<Option<ContainerHandle>>;

    fn stop_container(&self, container: &ContainerHandle) -> Result<()>;

    fn remove_container(&self, container: &ContainerHandle) -> Result<()>;

    /// Bring a single compose service up in the background.
    ///
    /// Output lines are handed to `on_line` as they arrive. Non-zero exit,
    /// cancellation and timeout are all errors.
    fn compose_up(
        &self,
        service: &str,
        cancel: &CancelToken,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<()>;
}
