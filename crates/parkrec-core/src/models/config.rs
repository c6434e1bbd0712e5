//! Configuration structures for the receipt pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ParkrecError, Result};

/// Main configuration for parkrec.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParkrecConfig {
    /// Per-page field extraction.
    pub extraction: ExtractionConfig,

    /// Document vocabulary heuristic.
    pub validation: ValidationConfig,

    /// Input file checks.
    pub input: InputConfig,

    /// Output file naming.
    pub output: OutputConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Characters of raw page text kept on each record.
    pub snippet_length: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            snippet_length: 200,
        }
    }
}

/// Thresholds for the receipt vocabulary heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Keywords a page needs when it has no ticket number.
    pub min_indicators: usize,

    /// Keywords a page needs alongside a ticket number.
    pub min_indicators_with_ticket: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_indicators: 2,
            min_indicators_with_ticket: 1,
        }
    }
}

/// Input file configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Size above which a warning is emitted (MB).
    pub max_file_size_mb: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 100,
        }
    }
}

/// Output file names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default name of the filtered PDF.
    pub pdf_file_name: String,

    /// Default name of the text summary.
    pub summary_file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pdf_file_name: "processed_receipts.pdf".to_string(),
            summary_file_name: "summary.txt".to_string(),
        }
    }
}

impl ParkrecConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| ParkrecError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ParkrecError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ParkrecConfig =
            serde_json::from_str(r#"{"validation": {"min_indicators": 3}}"#).unwrap();

        assert_eq!(config.validation.min_indicators, 3);
        assert_eq!(config.validation.min_indicators_with_ticket, 1);
        assert_eq!(config.extraction.snippet_length, 200);
        assert_eq!(config.output.pdf_file_name, "processed_receipts.pdf");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = ParkrecConfig::default();
        config.input.max_file_size_mb = 25;
        config.save(&path).unwrap();

        assert_eq!(ParkrecConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            ParkrecConfig::from_file(&path),
            Err(ParkrecError::Config(_))
        ));
    }
}
