//! Configuration structures for extraction and the hosting CLI.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// UBL 2.x common basic components namespace.
pub const UBL_CBC: &str = "urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2";

/// UBL 2.x common aggregate components namespace.
pub const UBL_CAC: &str =
    "urn:oasis:names:specification:ubl:schema:xsd:CommonAggregateComponents-2";

/// Main configuration for rxh.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RxhConfig {
    /// Document extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output rendering configuration.
    pub output: OutputConfig,

    /// Invoice draft configuration.
    pub draft: DraftConfig,
}

/// Document extraction configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Well-known component namespaces.
    pub namespaces: NamespaceConfig,

    /// Required local name of the root element. `None` accepts any root.
    pub expected_root: Option<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            namespaces: NamespaceConfig::default(),
            expected_root: Some("Invoice".to_string()),
        }
    }
}

/// URIs used to recognise the `cbc`/`cac` families whatever prefix a document picks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespaceConfig {
    pub basic_components: String,
    pub aggregate_components: String,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            basic_components: UBL_CBC.to_string(),
            aggregate_components: UBL_CAC.to_string(),
        }
    }
}

/// Output rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty_json: true }
    }
}

/// Defaults for building supplier invoice drafts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftConfig {
    /// Expense account used for the draft line.
    pub account: Option<String>,

    /// Create the supplier when it is not found in the partner directory.
    pub create_supplier: bool,

    /// JSON file with known partners.
    pub partners_file: Option<PathBuf>,
}

impl RxhConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: RxhConfig =
            serde_json::from_str(r#"{"extraction": {"expected_root": null}}"#).unwrap();
        assert_eq!(config.extraction.expected_root, None);
        assert_eq!(config.extraction.namespaces, NamespaceConfig::default());
        assert!(config.output.pretty_json);
        assert!(!config.draft.create_supplier);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = RxhConfig::default();
        config.draft.account = Some("6329".to_string());
        config.save(&path).unwrap();

        let loaded = RxhConfig::from_file(&path).unwrap();
        assert_eq!(loaded.draft.account.as_deref(), Some("6329"));
        assert_eq!(loaded.extraction, ExtractionConfig::default());
    }

    #[test]
    fn test_invalid_json_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = RxhConfig::from_file(&path).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }
}
