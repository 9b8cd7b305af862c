//! Configuration structures for the extraction pipeline.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::container::KindRules;
use crate::error::VirexError;
use crate::extraction::DEFAULT_SENTINEL;

/// Main configuration for the virex pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VirexConfig {
    /// Container walk configuration.
    pub walker: WalkerConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Delimited report configuration.
    pub report: ReportConfig,

    /// Artifact output configuration.
    pub artifacts: ArtifactConfig,
}

/// Container walk configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkerConfig {
    /// Extensions treated as nested message containers.
    pub container_extensions: Vec<String>,

    /// Extensions treated as PDF documents.
    pub pdf_extensions: Vec<String>,

    /// Give up on a single PDF after this many seconds (None = no limit).
    pub pdf_timeout_secs: Option<u64>,

    /// Share one visited set across all top-level containers of a run.
    pub dedupe_across_containers: bool,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        let kinds = KindRules::default();
        Self {
            container_extensions: kinds.container_extensions,
            pdf_extensions: kinds.pdf_extensions,
            pdf_timeout_secs: Some(60),
            dedupe_across_containers: true,
        }
    }
}

impl WalkerConfig {
    pub fn kind_rules(&self) -> KindRules {
        KindRules {
            pdf_extensions: self.pdf_extensions.clone(),
            container_extensions: self.container_extensions.clone(),
        }
    }

    pub fn pdf_timeout(&self) -> Option<Duration> {
        self.pdf_timeout_secs.filter(|s| *s > 0).map(Duration::from_secs)
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Value for fields no pattern matched.
    pub sentinel: String,

    /// JSON schema replacing the built-in transfer-order schema.
    pub schema_path: Option<PathBuf>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            sentinel: DEFAULT_SENTINEL.to_string(),
            schema_path: None,
        }
    }
}

/// Delimited report configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Column delimiter.
    pub delimiter: char,

    /// Explicit column order; empty derives it from the schema.
    pub columns: Vec<String>,

    /// Write per-container summaries and the global report.
    pub write_summaries: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            delimiter: '|',
            columns: Vec::new(),
            write_summaries: true,
        }
    }
}

/// Artifact output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Save rendered PDF text.
    pub save_text: bool,

    /// Save per-document field dumps.
    pub save_records: bool,

    /// Longest file name stem written before the suffix.
    pub max_file_name_len: usize,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            save_text: false,
            save_records: false,
            max_file_name_len: 120,
        }
    }
}

impl VirexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> crate::Result<()> {
        let walker = &self.walker;
        if walker.pdf_extensions.is_empty() || walker.container_extensions.is_empty() {
            return Err(VirexError::Config(
                "walker extension lists must not be empty".to_string(),
            ));
        }
        if let Some(ext) = walker.pdf_extensions.iter().find(|p| {
            walker
                .container_extensions
                .iter()
                .any(|c| c.eq_ignore_ascii_case(p))
        }) {
            return Err(VirexError::Config(format!(
                "extension {:?} is listed as both PDF and container",
                ext
            )));
        }
        if matches!(self.report.delimiter, '\n' | '\r' | '"') {
            return Err(VirexError::Config(format!(
                "unusable report delimiter {:?}",
                self.report.delimiter
            )));
        }
        if self.extraction.sentinel.trim().is_empty() {
            return Err(VirexError::Config("sentinel must not be empty".to_string()));
        }
        if self.artifacts.max_file_name_len < 16 {
            return Err(VirexError::Config(
                "artifacts.max_file_name_len must be at least 16".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: VirexConfig =
            serde_json::from_str(r#"{"report": {"delimiter": ";"}, "walker": {"pdf_timeout_secs": null}}"#)
                .unwrap();
        assert_eq!(config.report.delimiter, ';');
        assert!(config.report.write_summaries);
        assert_eq!(config.walker.pdf_timeout(), None);
        assert_eq!(config.walker.container_extensions, vec!["msg".to_string()]);
        assert_eq!(config.extraction.sentinel, "Non trouvé");
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let mut config = VirexConfig::default();
        config.artifacts.save_text = true;
        config.save(&path).unwrap();

        let loaded = VirexConfig::from_file(&path).unwrap();
        assert!(loaded.artifacts.save_text);
        assert_eq!(loaded.walker.pdf_timeout(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_validate() {
        assert!(VirexConfig::default().validate().is_ok());

        let mut overlap = VirexConfig::default();
        overlap.walker.container_extensions.push("PDF".to_string());
        assert!(overlap.validate().is_err());

        let mut newline = VirexConfig::default();
        newline.report.delimiter = '\n';
        assert!(newline.validate().is_err());

        let mut short = VirexConfig::default();
        short.artifacts.max_file_name_len = 4;
        assert!(short.validate().is_err());
    }
}
