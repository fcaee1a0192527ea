// Launcher configuration: demo table, compose invocation, server and logging.

mod loader;
mod types;

pub use loader::{CONFIG_FILE_NAME, ConfigError, load, load_file, validate};
pub use types::{ComposeCommand, Config, ReleaseStrategy, ServerConfig};
