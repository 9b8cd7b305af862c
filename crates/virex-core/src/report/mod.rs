//! Delimited report output.
//!
//! One header line of normalized column names, then one line per extracted
//! document. Values are accent-stripped and uppercased; columns a row does
//! not carry render as the sentinel.

mod summary;
mod writer;

pub use summary::{ContainerSummary, DocumentSummary, RunReport};
pub use writer::PipeWriter;

use crate::extraction::{ExtractionRecord, FieldSchema};
use crate::models::config::ReportConfig;
use crate::models::document::{ExtractedDocument, LABEL_SEPARATOR};
use crate::text::normalize_value;

/// Message subject.
pub const COLUMN_SUBJECT: &str = "OBJET";
/// Sender e-mail address.
pub const COLUMN_SENDER_EMAIL: &str = "Mail_Expediteur";
/// Sender display name.
pub const COLUMN_SENDER_NAME: &str = "Expéditeur";
/// Message submit time.
pub const COLUMN_SENT_AT: &str = "DATE HEURE ENVOI";
/// Page count of the PDF.
pub const COLUMN_PAGES: &str = "N page";
/// Provenance of the row.
pub const COLUMN_PATH: &str = "PATH";

/// Format of [`COLUMN_SENT_AT`] values.
pub const SENT_AT_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Columns placed before the schema fields in the default layout.
pub const METADATA_COLUMNS: &[&str] = &[
    COLUMN_SUBJECT,
    COLUMN_SENDER_EMAIL,
    COLUMN_SENDER_NAME,
    COLUMN_SENT_AT,
    COLUMN_PAGES,
];

/// Column order and formatting of the delimited report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLayout {
    columns: Vec<String>,
    delimiter: char,
    sentinel: String,
}

impl ReportLayout {
    pub fn new(columns: Vec<String>, delimiter: char, sentinel: impl Into<String>) -> Self {
        Self {
            columns,
            delimiter,
            sentinel: sentinel.into(),
        }
    }

    /// Metadata columns, then every schema field, then `PATH`.
    pub fn for_schema(schema: &FieldSchema, delimiter: char, sentinel: impl Into<String>) -> Self {
        let columns = METADATA_COLUMNS
            .iter()
            .copied()
            .chain(schema.field_names())
            .chain(std::iter::once(COLUMN_PATH))
            .map(str::to_string)
            .collect();
        Self::new(columns, delimiter, sentinel)
    }

    /// Layout from configuration; an empty column list derives it from the schema.
    pub fn from_config(config: &ReportConfig, schema: &FieldSchema, sentinel: &str) -> Self {
        if config.columns.is_empty() {
            Self::for_schema(schema, config.delimiter, sentinel)
        } else {
            Self::new(config.columns.clone(), config.delimiter, sentinel)
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn header_line(&self) -> String {
        let cells: Vec<String> = self.columns.iter().map(|c| self.cell(c)).collect();
        cells.join(&self.delimiter.to_string())
    }

    pub fn render_row(&self, row: &ExtractionRecord) -> String {
        let cells: Vec<String> = self
            .columns
            .iter()
            .map(|column| self.cell(row.get(column).unwrap_or(self.sentinel.as_str())))
            .collect();
        cells.join(&self.delimiter.to_string())
    }

    fn cell(&self, value: &str) -> String {
        normalize_value(value)
            .chars()
            .map(|c| {
                if c == self.delimiter || c == '\n' || c == '\r' {
                    ' '
                } else {
                    c
                }
            })
            .collect()
    }
}

/// Record of a document with the synthetic report columns added.
///
/// `container_path` is the top-level container; `label` the provenance
/// label inside it.
pub fn build_row(container_path: &str, label: &str, document: &ExtractedDocument) -> ExtractionRecord {
    let source = &document.source;
    let mut row = document.record.clone();

    if let Some(subject) = &source.subject {
        row = row.with_synthetic(COLUMN_SUBJECT, subject.as_str());
    }
    if let Some(email) = &source.sender_email {
        row = row.with_synthetic(COLUMN_SENDER_EMAIL, email.as_str());
    }
    if let Some(name) = &source.sender_name {
        row = row.with_synthetic(COLUMN_SENDER_NAME, name.as_str());
    }
    if let Some(sent_at) = source.sent_at {
        row = row.with_synthetic(COLUMN_SENT_AT, sent_at.format(SENT_AT_FORMAT).to_string());
    }

    row.with_synthetic(COLUMN_PAGES, document.page_count.to_string())
        .with_synthetic(
            COLUMN_PATH,
            format!("{}{}{}", container_path, LABEL_SEPARATOR, label),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::MessageMetadata;
    use crate::extraction::{FieldExtractor, SchemaDefinition};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn small_schema() -> FieldSchema {
        let definition = SchemaDefinition::from_json(
            r#"[
                {"name": "SWIFT", "patterns": ["Swift:\\s*([A-Z0-9]+)"]},
                {"name": "Bénéficiaire", "patterns": ["Bénéficiaire:\\s*(.+)"]}
            ]"#,
        )
        .unwrap();
        FieldSchema::compile(&definition).unwrap()
    }

    fn document(text: &str) -> ExtractedDocument {
        ExtractedDocument {
            record: FieldExtractor::new(small_schema()).extract(text),
            page_count: 2,
            source: MessageMetadata {
                subject: Some("Ordre de virement".to_string()),
                sender_name: Some("Hélène Dupré".to_string()),
                sender_email: Some("helene@example.com".to_string()),
                recipients: None,
                sent_at: NaiveDate::from_ymd_opt(2024, 11, 5)
                    .and_then(|d| d.and_hms_opt(9, 30, 0)),
            },
        }
    }

    #[test]
    fn test_default_layout_header() {
        let layout = ReportLayout::for_schema(&small_schema(), '|', "Non trouvé");
        assert_eq!(
            layout.header_line(),
            "OBJET|MAIL_EXPEDITEUR|EXPEDITEUR|DATE HEURE ENVOI|N PAGE|SWIFT|BENEFICIAIRE|PATH"
        );
    }

    #[test]
    fn test_render_row() {
        let layout = ReportLayout::for_schema(&small_schema(), '|', "Non trouvé");
        let row = build_row("in/mail.msg", "fwd.msg>ordre.pdf", &document("Swift: ABC123\n"));

        assert_eq!(
            layout.render_row(&row),
            "ORDRE DE VIREMENT|HELENE@EXAMPLE.COM|HELENE DUPRE|05/11/2024 09:30:00|2|ABC123|NON TROUVE|IN/MAIL.MSG>FWD.MSG>ORDRE.PDF"
        );
    }

    #[test]
    fn test_missing_column_renders_sentinel() {
        let layout = ReportLayout::new(
            vec!["SWIFT".to_string(), "Commission".to_string()],
            '|',
            "Non trouvé",
        );
        let row = build_row("a.msg", "x.pdf", &document("Swift: ABC123"));
        assert_eq!(layout.render_row(&row), "ABC123|NON TROUVE");
    }

    #[test]
    fn test_delimiter_and_newlines_replaced() {
        let layout = ReportLayout::new(
            vec!["Bénéficiaire".to_string(), "Note".to_string()],
            '|',
            "Non trouvé",
        );
        let row = build_row("a.msg", "x.pdf", &document("Bénéficiaire: ACME | Co"))
            .with_synthetic("Note", "ligne 1\nligne|2");
        assert_eq!(layout.render_row(&row), "ACME   CO|LIGNE 1 LIGNE 2");
    }

    #[test]
    fn test_synthetic_columns_do_not_override_content() {
        let definition =
            SchemaDefinition::from_json(r#"[{"name": "OBJET", "patterns": ["Objet:\\s*(.+)"]}]"#)
                .unwrap();
        let schema = FieldSchema::compile(&definition).unwrap();
        let mut doc = document("");
        doc.record = FieldExtractor::new(schema).extract("Objet: Paiement fournisseur");

        let row = build_row("a.msg", "x.pdf", &doc);
        assert_eq!(row.get(COLUMN_SUBJECT), Some("Paiement fournisseur"));
    }
}
