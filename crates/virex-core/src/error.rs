//! Error types for the virex-core library.

use thiserror::Error;

/// Main error type for the virex library.
#[derive(Error, Debug)]
pub enum VirexError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Message container error.
    #[error("container error: {0}")]
    Container(#[from] ContainerError),

    /// Field schema error.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Report rendering or post-processing error.
    #[error("report error: {0}")]
    Report(#[from] ReportError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Text extraction did not finish in time.
    #[error("text extraction timed out after {0}s")]
    Timeout(u64),
}

/// Errors related to message container decoding.
#[derive(Error, Debug)]
pub enum ContainerError {
    /// The blob is not a readable compound file.
    #[error("failed to open container: {0}")]
    Open(std::io::Error),

    /// A stream or storage inside the container could not be read.
    #[error("failed to read {path}: {source}")]
    Stream {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The container is structurally invalid.
    #[error("malformed container: {0}")]
    Malformed(String),
}

/// Errors raised while compiling a field schema.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A field has an empty name.
    #[error("field #{0} has an empty name")]
    EmptyName(usize),

    /// The same field name appears twice.
    #[error("duplicate field: {0}")]
    DuplicateField(String),

    /// A field declares no pattern alternatives.
    #[error("field {0} has no patterns")]
    NoPatterns(String),

    /// A pattern alternative failed to compile.
    #[error("invalid pattern #{index} for {field}: {source}")]
    InvalidPattern {
        field: String,
        index: usize,
        #[source]
        source: regex::Error,
    },

    /// The schema file could not be parsed.
    #[error("failed to parse schema: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors related to delimited output and post-processing.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The input has no header line.
    #[error("input has no header line")]
    MissingHeader,

    /// A required column is absent from the header.
    #[error("column not found: {0}")]
    MissingColumn(String),

    /// CSV conversion failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for the virex library.
pub type Result<T> = std::result::Result<T, VirexError>;
