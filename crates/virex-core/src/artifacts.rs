//! Optional on-disk artifacts: raw PDF text and per-document field dumps.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, error, warn};

use crate::container::ContainerId;
use crate::extraction::ExtractionRecord;
use crate::models::config::ArtifactConfig;

const TEXT_SUFFIX: &str = "_extracted_text.txt";
const RECORD_SUFFIX: &str = "_extracted_info.txt";

/// Writes artifacts under `<dir>/<container id>/`.
///
/// Failures are logged and never interrupt a walk.
#[derive(Debug, Clone)]
pub struct ArtifactSink {
    dir: PathBuf,
    save_text: bool,
    save_records: bool,
    max_name_len: usize,
}

impl ArtifactSink {
    pub fn new(dir: impl Into<PathBuf>, config: &ArtifactConfig) -> Self {
        Self {
            dir: dir.into(),
            save_text: config.save_text,
            save_records: config.save_records,
            max_name_len: config.max_file_name_len.max(8),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save the rendered text of a PDF attachment.
    pub fn save_text(&self, container: &ContainerId, name: &str, text: &str) -> Option<PathBuf> {
        if !self.save_text {
            return None;
        }
        self.write(container, name, TEXT_SUFFIX, text)
    }

    /// Save a record as `Field: value` lines.
    pub fn save_record(
        &self,
        container: &ContainerId,
        name: &str,
        record: &ExtractionRecord,
    ) -> Option<PathBuf> {
        if !self.save_records {
            return None;
        }
        let contents: String = record
            .iter()
            .map(|(field, value)| format!("{}: {}\n", field, value))
            .collect();
        self.write(container, name, RECORD_SUFFIX, &contents)
    }

    fn write(&self, container: &ContainerId, name: &str, suffix: &str, contents: &str) -> Option<PathBuf> {
        let target_dir = self.dir.join(container.short());
        if let Err(e) = fs::create_dir_all(&target_dir) {
            error!("Cannot create artifact directory {}: {}", target_dir.display(), e);
            return None;
        }

        let preferred = target_dir.join(format!(
            "{}{}",
            sanitize_file_name(name, self.max_name_len),
            suffix
        ));
        match fs::write(&preferred, contents) {
            Ok(()) => {
                debug!("Saved {}", preferred.display());
                return Some(preferred);
            }
            Err(e) => warn!(
                "Cannot write {} ({}), falling back to a hashed name",
                preferred.display(),
                e
            ),
        }

        let fallback = target_dir.join(format!("{}{}", hashed_name(name), suffix));
        match fs::write(&fallback, contents) {
            Ok(()) => Some(fallback),
            Err(e) => {
                error!("Cannot write {}: {}", fallback.display(), e);
                None
            }
        }
    }
}

/// Replace characters that are unsafe in file names and cap the length.
pub fn sanitize_file_name(name: &str, max_len: usize) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .take(max_len)
        .collect();

    let trimmed = cleaned.trim_end_matches(['.', ' ']);
    if trimmed.is_empty() {
        hashed_name(name)
    } else {
        trimmed.to_string()
    }
}

/// Short name derived from the SHA-256 of `name`.
pub fn hashed_name(name: &str) -> String {
    let digest = Sha256::digest(name.as_bytes());
    hex::encode(&digest[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::FieldExtractor;
    use tempfile::TempDir;

    fn config() -> ArtifactConfig {
        ArtifactConfig {
            save_text: true,
            save_records: true,
            max_file_name_len: 120,
        }
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("a.msg>b.pdf", 120), "a.msg_b.pdf");
        assert_eq!(sanitize_file_name("re: x/y?", 120), "re_ x_y_");
        assert_eq!(sanitize_file_name("abcdef", 3), "abc");
        assert_eq!(sanitize_file_name("...", 120).len(), 16);
    }

    #[test]
    fn test_save_text_and_record() {
        let dir = TempDir::new().unwrap();
        let sink = ArtifactSink::new(dir.path(), &config());
        let id = ContainerId::of_bytes(b"container");

        let text_path = sink.save_text(&id, "ordre.pdf", "Swift: ABC").unwrap();
        assert!(text_path.ends_with(format!("{}/ordre.pdf_extracted_text.txt", id.short())));
        assert_eq!(fs::read_to_string(&text_path).unwrap(), "Swift: ABC");

        let record = FieldExtractor::default().extract("Swift: ABC");
        let record_path = sink.save_record(&id, "ordre.pdf", &record).unwrap();
        let dumped = fs::read_to_string(record_path).unwrap();
        assert!(dumped.contains("SWIFT: ABC\n"));
        assert!(dumped.contains("Devise: Non trouvé\n"));
    }

    #[test]
    fn test_disabled_sink_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let sink = ArtifactSink::new(dir.path(), &ArtifactConfig::default());
        let id = ContainerId::of_bytes(b"container");
        assert!(sink.save_text(&id, "a.pdf", "x").is_none());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_overlong_name_falls_back_to_hash() {
        let dir = TempDir::new().unwrap();
        let sink = ArtifactSink::new(
            dir.path(),
            &ArtifactConfig {
                max_file_name_len: 4000,
                ..config()
            },
        );
        let id = ContainerId::of_bytes(b"container");
        let long_name = "x".repeat(1000);

        let path = sink.save_text(&id, &long_name, "text").unwrap();
        let file_name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert_eq!(file_name, format!("{}_extracted_text.txt", hashed_name(&long_name)));
    }
}
