//! Field extraction: flat, per-field regex lookups over document text.

mod engine;
pub mod patterns;
mod record;
mod schema;

pub use engine::{DEFAULT_SENTINEL, FieldExtractor};
pub use record::ExtractionRecord;
pub use schema::{FieldDefinition, FieldPattern, FieldSchema, FieldSpec, SchemaDefinition};
