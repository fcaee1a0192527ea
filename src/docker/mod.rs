// Container runtime: docker CLI calls, compose invocation, in-memory stand-in.

pub mod engine;
pub mod memory;
pub mod run;
pub mod runtime;
pub mod types;

pub use engine::{DockerCli, ensure_available};
pub use memory::{InMemoryRuntime, RuntimeCall};
pub use runtime::ContainerRuntime;
pub use types::{CancelToken, ContainerHandle, OutputLine, ProcessCommand, ProcessResult};
