//! Extracted documents and walk results.

use serde::Serialize;

use crate::container::MessageMetadata;
use crate::extraction::ExtractionRecord;

/// Separator between nesting levels in provenance labels.
pub const LABEL_SEPARATOR: char = '>';

/// One PDF attachment run through the extraction engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedDocument {
    /// Extracted fields.
    pub record: ExtractionRecord,

    /// Page count of the source PDF.
    pub page_count: u32,

    /// Metadata of the message that carried the PDF.
    pub source: MessageMetadata,
}

/// Insertion-ordered mapping of provenance label to document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WalkOutput {
    documents: Vec<(String, ExtractedDocument)>,
}

impl WalkOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document; an existing label is replaced in place.
    pub fn insert(&mut self, label: impl Into<String>, document: ExtractedDocument) {
        let label = label.into();
        match self.documents.iter_mut().find(|(l, _)| *l == label) {
            Some(slot) => slot.1 = document,
            None => self.documents.push((label, document)),
        }
    }

    /// Merge a nested walk, prefixing each label with `parent>`.
    pub fn merge_nested(&mut self, parent: &str, nested: WalkOutput) {
        for (label, document) in nested.documents {
            self.insert(format!("{}{}{}", parent, LABEL_SEPARATOR, label), document);
        }
    }

    pub fn get(&self, label: &str) -> Option<&ExtractedDocument> {
        self.documents
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, d)| d)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(|(l, _)| l.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExtractedDocument)> {
        self.documents.iter().map(|(l, d)| (l.as_str(), d))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl IntoIterator for WalkOutput {
    type Item = (String, ExtractedDocument);
    type IntoIter = std::vec::IntoIter<(String, ExtractedDocument)>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.into_iter()
    }
}

/// Number of nesting separators in a label.
pub fn nesting_depth(label: &str) -> usize {
    label.matches(LABEL_SEPARATOR).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::FieldExtractor;

    fn document(text: &str) -> ExtractedDocument {
        ExtractedDocument {
            record: FieldExtractor::default().extract(text),
            page_count: 1,
            source: MessageMetadata::default(),
        }
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut output = WalkOutput::new();
        output.insert("a.pdf", document("Swift: A1"));
        output.insert("b.pdf", document("Swift: B1"));
        output.insert("a.pdf", document("Swift: A2"));

        assert_eq!(output.labels().collect::<Vec<_>>(), vec!["a.pdf", "b.pdf"]);
        assert_eq!(output.get("a.pdf").unwrap().record.get("SWIFT"), Some("A2"));
    }

    #[test]
    fn test_merge_nested_labels() {
        let mut inner = WalkOutput::new();
        inner.insert("c.pdf", document(""));
        let mut middle = WalkOutput::new();
        middle.merge_nested("b.msg", inner);
        let mut outer = WalkOutput::new();
        outer.merge_nested("a.msg", middle);

        let labels: Vec<_> = outer.labels().collect();
        assert_eq!(labels, vec!["a.msg>b.msg>c.pdf"]);
        assert_eq!(nesting_depth(labels[0]), 2);
    }
}
