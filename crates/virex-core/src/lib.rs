//! Core library for transfer-order extraction from e-mail containers.
//!
//! This crate provides:
//! - Outlook `.msg` decoding, including messages embedded in messages
//! - A recursive, cycle-safe walk that finds every PDF attachment
//! - PDF text rendering
//! - Regex-driven field extraction over a swappable schema
//! - Pipe-delimited reports, summaries, and date filtering

pub mod artifacts;
pub mod container;
pub mod error;
pub mod extraction;
pub mod filter;
pub mod models;
pub mod pdf;
pub mod report;
pub mod text;
pub mod walker;

pub use artifacts::ArtifactSink;
pub use container::{
    Attachment, AttachmentKind, AttachmentPayload, ContainerDecoder, ContainerId, KindRules,
    MessageContainer, MessageMetadata, MsgDecoder,
};
pub use error::{Result, VirexError};
pub use extraction::{DEFAULT_SENTINEL, ExtractionRecord, FieldExtractor, FieldSchema};
pub use models::config::VirexConfig;
pub use models::document::{ExtractedDocument, WalkOutput};
pub use pdf::{PdfExtractor, PdfText, PdfTextExtractor};
pub use report::{ContainerSummary, PipeWriter, ReportLayout, RunReport};
pub use walker::{ContainerWalker, WalkContext};
