use std::path::{Path, PathBuf};

use thiserror::Error;

use super::types::Config;
use crate::registry::RegistryError;

/// File looked up in the working directory when no path is given.
pub const CONFIG_FILE_NAME: &str = ".demolauncher.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("no demos configured")]
    NoDemos,
    #[error("server.port must be non-zero")]
    ZeroPort,
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Load `.demolauncher.yaml` from `dir`, falling back to defaults when the
/// file does not exist.
pub fn load(dir: &Path) -> Result<Config, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(Config::default());
    }
    load_file(&path)
}

/// Load and validate an explicit config file. The file must exist.
pub fn load_file(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: Config = serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate(&config)?;
    Ok(config)
}

pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.demos.is_empty() {
        return Err(ConfigError::NoDemos);
    }
    if config.server.port == 0 {
        return Err(ConfigError::ZeroPort);
    }
    config.registry()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load(dir.path()).unwrap();
        assert_eq!(cfg.demos.len(), 3);
    }

    #[test]
    fn file_in_dir_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "title: Test\nserver:\n  port: 8080\n",
        )
        .unwrap();
        let cfg = load(dir.path()).unwrap();
        assert_eq!(cfg.title, "Test");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.host, "0.0.0.0");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "demos: [unterminated").unwrap();
        assert!(matches!(load_file(&path).unwrap_err(), ConfigError::Parse { .. }));
    }

    #[test]
    fn empty_demo_list_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.yaml");
        std::fs::write(&path, "demos: []\n").unwrap();
        assert!(matches!(load_file(&path).unwrap_err(), ConfigError::NoDemos));
    }

    #[test]
    fn duplicate_demo_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.yaml");
        std::fs::write(
            &path,
            "demos:\n  - {name: A, service: a, url: x}\n  - {name: A, service: b, url: y}\n",
        )
        .unwrap();
        assert!(matches!(
            load_file(&path).unwrap_err(),
            ConfigError::Registry(RegistryError::DuplicateName(_))
        ));
    }

    #[test]
    fn zero_port_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.yaml");
        std::fs::write(&path, "server:\n  port: 0\n").unwrap();
        assert!(matches!(load_file(&path).unwrap_err(), ConfigError::ZeroPort));
    }
}
