//! Extraction records.

use serde::ser::{Serialize, Serializer};

/// Field name to value mapping produced for one document.
///
/// Content fields keep schema order and are fixed once extracted.
/// Synthetic fields (provenance, page count, sender metadata) can be
/// appended afterwards but never replace a content field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRecord {
    fields: Vec<(String, String)>,
    content_len: usize,
    sentinel: String,
}

impl ExtractionRecord {
    pub(crate) fn new(fields: Vec<(String, String)>, sentinel: &str) -> Self {
        Self {
            content_len: fields.len(),
            fields,
            sentinel: sentinel.to_string(),
        }
    }

    /// Value of a field, content or synthetic.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// True when the field exists and holds something other than the sentinel.
    pub fn is_found(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| v != self.sentinel)
    }

    /// Number of content fields that matched.
    pub fn found_count(&self) -> usize {
        self.content()
            .filter(|(_, value)| *value != self.sentinel)
            .count()
    }

    /// Content fields in schema order.
    pub fn content(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields[..self.content_len]
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// All fields, content first, then synthetic ones in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    /// Add a synthetic field.
    ///
    /// Content fields are left untouched; a synthetic field with the same
    /// name is replaced.
    pub fn with_synthetic(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        if self.fields[..self.content_len].iter().any(|(k, _)| *k == name) {
            return self;
        }

        let value = value.into();
        match self.fields[self.content_len..]
            .iter_mut()
            .find(|(k, _)| *k == name)
        {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
        self
    }
}

impl Serialize for ExtractionRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}
