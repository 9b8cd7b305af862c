//! Message containers: metadata plus attachments, possibly nested.

mod msg;

pub use msg::MsgDecoder;

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ContainerError;

/// Result type for container operations.
pub type Result<T> = std::result::Result<T, ContainerError>;

/// Content-derived identity of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId([u8; 32]);

impl ContainerId {
    /// SHA-256 of a raw container blob.
    pub fn of_bytes(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    pub fn from_digest(digest: [u8; 32]) -> Self {
        Self(digest)
    }

    /// First 16 hex characters, for directory names and logs.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Header information of a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageMetadata {
    pub subject: Option<String>,
    pub sender_name: Option<String>,
    pub sender_email: Option<String>,
    pub recipients: Option<String>,
    pub sent_at: Option<NaiveDateTime>,
}

/// Payload of an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentPayload {
    /// Opaque bytes (a PDF, or a serialized container).
    Binary(Vec<u8>),
    /// A message stored inline and already decoded.
    Embedded(Box<MessageContainer>),
}

/// A named payload inside a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    name: Option<String>,
    pub payload: AttachmentPayload,
}

impl Attachment {
    /// Create an attachment; blank or NUL-only names count as absent.
    pub fn new(name: Option<&str>, payload: AttachmentPayload) -> Self {
        Self {
            name: name.and_then(crate::text::clean_attachment_name),
            payload,
        }
    }

    /// Declared file name, if one could be resolved.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Attachment category, inferred from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Pdf,
    Container,
    Other,
}

/// Extension lists used to classify attachments (case-insensitive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindRules {
    pub pdf_extensions: Vec<String>,
    pub container_extensions: Vec<String>,
}

impl Default for KindRules {
    fn default() -> Self {
        Self {
            pdf_extensions: vec!["pdf".to_string()],
            container_extensions: vec!["msg".to_string()],
        }
    }
}

impl KindRules {
    pub fn classify(&self, file_name: &str) -> AttachmentKind {
        let Some((_, ext)) = file_name.rsplit_once('.') else {
            return AttachmentKind::Other;
        };
        if self.pdf_extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
            AttachmentKind::Pdf
        } else if self
            .container_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
        {
            AttachmentKind::Container
        } else {
            AttachmentKind::Other
        }
    }

    /// True when a path on disk names a container file.
    pub fn is_container_file(&self, file_name: &str) -> bool {
        self.classify(file_name) == AttachmentKind::Container
    }
}

/// A decoded message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContainer {
    pub metadata: MessageMetadata,
    pub attachments: Vec<Attachment>,
    pub fingerprint: ContainerId,
}

/// Trait for container decoders.
pub trait ContainerDecoder: Send + Sync {
    /// Decode a container blob into metadata and attachments.
    fn decode(&self, data: &[u8]) -> Result<MessageContainer>;
}
