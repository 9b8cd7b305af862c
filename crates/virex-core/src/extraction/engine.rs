//! Field extraction engine.

use tracing::trace;

use super::record::ExtractionRecord;
use super::schema::FieldSchema;

/// Value stored for fields no alternative matched.
pub const DEFAULT_SENTINEL: &str = "Non trouvé";

/// Applies a field schema to document text.
///
/// Fields are independent: each one tries its alternatives in order and
/// keeps the first hit, or the sentinel when none match. The extractor
/// holds no per-call state, so identical text always yields an identical
/// record.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    schema: FieldSchema,
    sentinel: String,
}

impl FieldExtractor {
    /// Create an extractor for a schema with the default sentinel.
    pub fn new(schema: FieldSchema) -> Self {
        Self {
            schema,
            sentinel: DEFAULT_SENTINEL.to_string(),
        }
    }

    /// Set the not-found placeholder.
    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = sentinel.into();
        self
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    /// Extract every schema field from `text`.
    pub fn extract(&self, text: &str) -> ExtractionRecord {
        let fields = self
            .schema
            .fields()
            .iter()
            .map(|field| {
                let value = match field.find(text) {
                    Some(value) => {
                        trace!("{} = {:?}", field.name(), value);
                        value.to_string()
                    }
                    None => self.sentinel.clone(),
                };
                (field.name().to_string(), value)
            })
            .collect();

        ExtractionRecord::new(fields, &self.sentinel)
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new(FieldSchema::transfer_order())
    }
}
