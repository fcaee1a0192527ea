// Demo registry: static mapping of display name to service and URL.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A demo the launcher knows how to start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoDescriptor {
    /// User-facing name, also the selection key.
    #[serde(rename = "name")]
    pub display_name: String,
    /// Compose service name; the container carries the same name.
    #[serde(rename = "service")]
    pub service_id: String,
    /// Endpoint advertised once the demo is up.
    pub url: String,
    /// Sidecar services torn down together with this one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependents: Vec<String>,
}

impl DemoDescriptor {
    pub fn new(display_name: &str, service_id: &str, url: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            service_id: service_id.to_string(),
            url: url.to_string(),
            dependents: Vec::new(),
        }
    }

    pub fn with_dependents<I, S>(mut self, dependents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependents = dependents.into_iter().map(Into::into).collect();
        self
    }
}

/// The demos shipped by default when no config file is present.
pub fn default_demos() -> Vec<DemoDescriptor> {
    vec![
        DemoDescriptor::new(
            "Object Detection (YOLO)",
            "yolo_demo_service",
            "http://localhost:7861",
        ),
        DemoDescriptor::new(
            "Speech-to-Text (Whisper)",
            "whisper_demo_service",
            "http://localhost:7862",
        ),
        DemoDescriptor::new(
            "LLM Chat (Ollama)",
            "llmchat_demo_service",
            "http://localhost:7863",
        )
        .with_dependents(["ollama_demo_service"]),
    ]
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown demo: {0}")]
    UnknownDemo(String),
    #[error("demo #{index} has an empty name")]
    EmptyName { index: usize },
    #[error("demo {name:?} has an empty service name")]
    EmptyService { name: String },
    #[error("demo {0:?} is defined more than once")]
    DuplicateName(String),
}

/// Read-only set of demos, kept in configuration order.
#[derive(Debug, Clone)]
pub struct DemoRegistry {
    demos: Vec<DemoDescriptor>,
}

impl DemoRegistry {
    pub fn new(demos: Vec<DemoDescriptor>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for (index, demo) in demos.iter().enumerate() {
            if demo.display_name.trim().is_empty() {
                return Err(RegistryError::EmptyName { index });
            }
            if demo.service_id.trim().is_empty()
                || demo.dependents.iter().any(|d| d.trim().is_empty())
            {
                return Err(RegistryError::EmptyService {
                    name: demo.display_name.clone(),
                });
            }
            if !seen.insert(demo.display_name.as_str()) {
                return Err(RegistryError::DuplicateName(demo.display_name.clone()));
            }
        }
        Ok(Self { demos })
    }

    /// Look up a demo by its display name.
    pub fn resolve(&self, name: &str) -> Result<&DemoDescriptor, RegistryError> {
        self.demos
            .iter()
            .find(|d| d.display_name == name)
            .ok_or_else(|| RegistryError::UnknownDemo(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &DemoDescriptor> {
        self.demos.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.demos.iter().map(|d| d.display_name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.demos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.demos.is_empty()
    }
}

impl Default for DemoRegistry {
    fn default() -> Self {
        Self {
            demos: default_demos(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_resolves_every_name() {
        let registry = DemoRegistry::default();
        assert_eq!(registry.len(), 3);
        for name in registry.names() {
            assert!(registry.resolve(name).is_ok());
        }
    }

    #[test]
    fn resolve_unknown_name_errors() {
        let registry = DemoRegistry::default();
        assert_eq!(
            registry.resolve("Nope").unwrap_err(),
            RegistryError::UnknownDemo("Nope".into())
        );
    }

    #[test]
    fn resolve_is_case_sensitive() {
        let registry = DemoRegistry::default();
        assert!(registry.resolve("llm chat (ollama)").is_err());
    }

    #[test]
    fn names_keep_configuration_order() {
        let registry = DemoRegistry::default();
        assert_eq!(
            registry.names(),
            vec![
                "Object Detection (YOLO)",
                "Speech-to-Text (Whisper)",
                "LLM Chat (Ollama)"
            ]
        );
    }

    #[test]
    fn llm_chat_carries_ollama_sidecar() {
        let registry = DemoRegistry::default();
        let chat = registry.resolve("LLM Chat (Ollama)").unwrap();
        assert_eq!(chat.dependents, vec!["ollama_demo_service".to_string()]);
    }

    #[test]
    fn duplicate_names_rejected() {
        let err = DemoRegistry::new(vec![
            DemoDescriptor::new("A", "svc_a", "http://a"),
            DemoDescriptor::new("A", "svc_b", "http://b"),
        ])
        .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateName("A".into()));
    }

    #[test]
    fn blank_fields_rejected() {
        let err = DemoRegistry::new(vec![DemoDescriptor::new(" ", "svc", "http://a")]).unwrap_err();
        assert_eq!(err, RegistryError::EmptyName { index: 0 });

        let err = DemoRegistry::new(vec![DemoDescriptor::new("A", "", "http://a")]).unwrap_err();
        assert_eq!(err, RegistryError::EmptyService { name: "A".into() });
    }

    #[test]
    fn descriptor_deserializes_from_short_keys() {
        let yaml = "name: A\nservice: svc_a\nurl: http://a\n";
        let demo: DemoDescriptor = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(demo, DemoDescriptor::new("A", "svc_a", "http://a"));
    }
}
