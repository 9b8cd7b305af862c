//! Per-container summaries and the global run report.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::models::document::{WalkOutput, nesting_depth};

/// File name of the global run report.
pub const RUN_REPORT_FILE: &str = "rapport_global.txt";

/// Summary keys and the record fields they are read from.
const KEY_FIELDS: &[(&str, &str)] = &[
    ("Montant", "Montant décaissement"),
    ("Devise", "Devise"),
    ("Bénéficiaire", "Bénéficiaire"),
    ("IBAN", "IBAN Bénéficiaire"),
    ("Date", "Date Document"),
    ("Référence", "Référence"),
];

/// Key information of one extracted document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSummary {
    pub label: String,
    pub key_info: Vec<(String, String)>,
}

/// What a single top-level container produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerSummary {
    pub source: String,
    pub pdf_count: usize,
    pub nested_count: usize,
    pub documents: Vec<DocumentSummary>,
}

impl ContainerSummary {
    /// Summarize a walk. PDFs found directly in the container count as
    /// PDFs; anything reached through a nested container counts as nested.
    pub fn from_walk(source: impl Into<String>, output: &WalkOutput, sentinel: &str) -> Self {
        let pdf_count = output.labels().filter(|l| nesting_depth(l) == 0).count();
        let nested_count = output.labels().filter(|l| nesting_depth(l) > 0).count();

        let documents = output
            .iter()
            .map(|(label, document)| DocumentSummary {
                label: label.to_string(),
                key_info: KEY_FIELDS
                    .iter()
                    .map(|(key, field)| {
                        let value = document.record.get(field).unwrap_or(sentinel);
                        (key.to_string(), value.to_string())
                    })
                    .collect(),
            })
            .collect();

        Self {
            source: source.into(),
            pdf_count,
            nested_count,
            documents,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Résumé du traitement pour {}", self.source);
        let _ = writeln!(out, "Nombre de PDF extraits: {}", self.pdf_count);
        let _ = writeln!(out, "Nombre de .msg imbriqués: {}\n", self.nested_count);

        if self.documents.is_empty() {
            out.push_str("Aucune information extraite.\n");
            return out;
        }

        out.push_str("Liste des fichiers traités avec informations clés:\n");
        for document in &self.documents {
            let _ = writeln!(out, "\n--- {} ---", document.label);
            for (key, value) in &document.key_info {
                let _ = writeln!(out, "{}: {}", key, value);
            }
        }
        out
    }

    /// Write `<file_name>_summary.txt` into `dir`.
    pub fn write_to(&self, dir: &Path, file_name: &str) -> std::io::Result<PathBuf> {
        let path = dir.join(format!("{}_summary.txt", file_name));
        fs::write(&path, self.render())?;
        Ok(path)
    }
}

/// Totals over a whole batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub containers: usize,
    pub pdfs: usize,
    pub nested: usize,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, summary: &ContainerSummary) {
        self.containers += 1;
        self.pdfs += summary.pdf_count;
        self.nested += summary.nested_count;
    }

    pub fn render(&self) -> String {
        format!(
            "Rapport global d'extraction\n\
             ==========================\n\n\
             Total de fichiers .msg traités: {}\n\
             Total de fichiers PDF extraits: {}\n\
             Total de fichiers .msg imbriqués: {}\n",
            self.containers, self.pdfs, self.nested
        )
    }

    /// Write the report into `dir`.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        let path = dir.join(RUN_REPORT_FILE);
        fs::write(&path, self.render())?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::MessageMetadata;
    use crate::extraction::FieldExtractor;
    use crate::models::document::ExtractedDocument;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn output() -> WalkOutput {
        let extractor = FieldExtractor::default();
        let document = |text: &str| ExtractedDocument {
            record: extractor.extract(text),
            page_count: 1,
            source: MessageMetadata::default(),
        };

        let mut output = WalkOutput::new();
        output.insert(
            "ordre.pdf",
            document("Notre référence / Our reference: 4521\nTransfer id 99 X"),
        );
        output.insert("fwd.msg>annexe.pdf", document("rien"));
        output.insert("fwd.msg>inner.msg>deep.pdf", document("rien"));
        output
    }

    #[test]
    fn test_counts() {
        let summary = ContainerSummary::from_walk("in/a.msg", &output(), "Non trouvé");
        assert_eq!(summary.pdf_count, 1);
        assert_eq!(summary.nested_count, 2);
        assert_eq!(summary.documents.len(), 3);
        assert_eq!(
            summary.documents[0].key_info[5],
            ("Référence".to_string(), "4521".to_string())
        );
        assert_eq!(
            summary.documents[1].key_info[0],
            ("Montant".to_string(), "Non trouvé".to_string())
        );
    }

    #[test]
    fn test_render_empty_summary() {
        let summary = ContainerSummary::from_walk("in/a.msg", &WalkOutput::new(), "Non trouvé");
        assert_eq!(
            summary.render(),
            "Résumé du traitement pour in/a.msg\n\
             Nombre de PDF extraits: 0\n\
             Nombre de .msg imbriqués: 0\n\n\
             Aucune information extraite.\n"
        );
    }

    #[test]
    fn test_run_report() {
        let dir = TempDir::new().unwrap();
        let mut report = RunReport::new();
        report.add(&ContainerSummary::from_walk("a.msg", &output(), "Non trouvé"));
        report.add(&ContainerSummary::from_walk("b.msg", &WalkOutput::new(), "Non trouvé"));

        let path = report.write_to(dir.path()).unwrap();
        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("Total de fichiers .msg traités: 2\n"));
        assert!(content.contains("Total de fichiers PDF extraits: 1\n"));
        assert!(content.contains("Total de fichiers .msg imbriqués: 2\n"));
    }

    #[test]
    fn test_write_summary_file() {
        let dir = TempDir::new().unwrap();
        let summary = ContainerSummary::from_walk("in/a.msg", &output(), "Non trouvé");
        let path = summary.write_to(dir.path(), "a.msg").unwrap();

        assert!(path.ends_with("a.msg_summary.txt"));
        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("\n--- fwd.msg>annexe.pdf ---\nMontant: Non trouvé\n"));
    }
}
