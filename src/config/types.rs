use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::registry::{DemoDescriptor, DemoRegistry, RegistryError, default_demos};

/// How long to wait between stopping old demos and starting the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum ReleaseStrategy {
    /// Sleep for a fixed delay.
    Fixed {
        #[serde(default = "default_delay_ms")]
        delay_ms: u64,
    },
    /// Poll the runtime until every launcher-owned container is gone.
    Poll {
        #[serde(default = "default_interval_ms")]
        interval_ms: u64,
        #[serde(default = "default_timeout_ms")]
        timeout_ms: u64,
    },
}

fn default_delay_ms() -> u64 {
    2000
}

fn default_interval_ms() -> u64 {
    250
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for ReleaseStrategy {
    fn default() -> Self {
        ReleaseStrategy::Fixed {
            delay_ms: default_delay_ms(),
        }
    }
}

/// Program and leading arguments used to invoke compose.
///
/// Accepts either a shell-style string (`"docker compose"`) or a list
/// (`["docker-compose"]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeCommand(Vec<String>);

impl ComposeCommand {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let words = shell_words::split(raw).map_err(|e| e.to_string())?;
        Self::from_words(words)
    }

    fn from_words(words: Vec<String>) -> Result<Self, String> {
        if words.is_empty() || words[0].is_empty() {
            return Err("compose_command must name a program".into());
        }
        Ok(Self(words))
    }

    pub fn program(&self) -> &str {
        &self.0[0]
    }

    pub fn leading_args(&self) -> &[String] {
        &self.0[1..]
    }
}

impl Default for ComposeCommand {
    fn default() -> Self {
        Self(vec!["docker".into(), "compose".into()])
    }
}

impl Serialize for ComposeCommand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&shell_words::join(&self.0))
    }
}

impl<'de> Deserialize<'de> for ComposeCommand {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ComposeVisitor;

        impl<'de> Visitor<'de> for ComposeVisitor {
            type Value = ComposeCommand;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a command string or a list of arguments")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<ComposeCommand, E> {
                ComposeCommand::parse(value).map_err(E::custom)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<ComposeCommand, A::Error> {
                let mut words = Vec::new();
                while let Some(word) = seq.next_element::<String>()? {
                    words.push(word);
                }
                ComposeCommand::from_words(words).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_any(ComposeVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7860,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub title: String,
    pub compose_command: ComposeCommand,
    pub compose_file: Option<PathBuf>,
    pub project_dir: Option<PathBuf>,
    pub project_name: Option<String>,
    pub compose_timeout_secs: Option<u64>,
    pub release: ReleaseStrategy,
    pub server: ServerConfig,
    pub log_file: PathBuf,
    pub demos: Vec<DemoDescriptor>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Ampere Optimized AI Playground".to_string(),
            compose_command: ComposeCommand::default(),
            compose_file: None,
            project_dir: None,
            project_name: None,
            compose_timeout_secs: None,
            release: ReleaseStrategy::default(),
            server: ServerConfig::default(),
            log_file: PathBuf::from("demolauncher.log"),
            demos: default_demos(),
        }
    }
}

impl Config {
    pub fn compose_timeout(&self) -> Option<Duration> {
        self.compose_timeout_secs.map(Duration::from_secs)
    }

    /// Build the registry, checking names and services.
    pub fn registry(&self) -> Result<DemoRegistry, RegistryError> {
        DemoRegistry::new(self.demos.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_launcher() {
        let cfg = Config::default();
        assert_eq!(cfg.server.bind_addr(), "0.0.0.0:7860");
        assert_eq!(cfg.release, ReleaseStrategy::Fixed { delay_ms: 2000 });
        assert_eq!(cfg.compose_command.program(), "docker");
        assert_eq!(cfg.compose_command.leading_args(), ["compose".to_string()]);
        assert!(cfg.compose_timeout().is_none());
        assert_eq!(cfg.demos.len(), 3);
    }

    #[test]
    fn empty_document_yields_defaults() {
        let cfg: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg.demos.len(), 3);
        assert_eq!(cfg.server.port, 7860);
    }

    #[test]
    fn release_poll_fills_missing_fields() {
        let yaml = "release:\n  strategy: poll\n  interval_ms: 100\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            cfg.release,
            ReleaseStrategy::Poll {
                interval_ms: 100,
                timeout_ms: 10_000
            }
        );
    }

    #[test]
    fn release_fixed_custom_delay() {
        let yaml = "release:\n  strategy: fixed\n  delay_ms: 0\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.release, ReleaseStrategy::Fixed { delay_ms: 0 });
    }

    #[test]
    fn compose_command_from_string() {
        let yaml = "compose_command: docker-compose --ansi never";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.compose_command.program(), "docker-compose");
        assert_eq!(
            cfg.compose_command.leading_args(),
            ["--ansi".to_string(), "never".to_string()]
        );
    }

    #[test]
    fn compose_command_from_list() {
        let cfg: Config = serde_yaml::from_str("compose_command: [podman, compose]").unwrap();
        assert_eq!(cfg.compose_command.program(), "podman");
    }

    #[test]
    fn compose_command_empty_rejected() {
        assert!(serde_yaml::from_str::<Config>("compose_command: \"\"").is_err());
        assert!(serde_yaml::from_str::<Config>("compose_command: []").is_err());
    }

    #[test]
    fn demos_replace_defaults() {
        let yaml = r#"
demos:
  - name: A
    service: svc_a
    url: http://localhost:9001
  - name: B
    service: svc_b
    url: http://localhost:9002
    dependents: [svc_b_db]
"#;
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        let registry = cfg.registry().unwrap();
        assert_eq!(registry.names(), vec!["A", "B"]);
        let b = registry.resolve("B").unwrap();
        assert_eq!(b.dependents, vec!["svc_b_db".to_string()]);
    }
}
