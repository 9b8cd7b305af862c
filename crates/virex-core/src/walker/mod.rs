//! Recursive container walk: find PDFs at any nesting depth and extract them.

mod context;

pub use context::{VisitedSet, WalkContext, WalkStats, WalkStatsSnapshot};

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::artifacts::ArtifactSink;
use crate::container::{
    AttachmentKind, AttachmentPayload, ContainerDecoder, ContainerId, KindRules,
    MessageContainer, MsgDecoder,
};
use crate::extraction::FieldExtractor;
use crate::models::config::VirexConfig;
use crate::models::document::{ExtractedDocument, WalkOutput};
use crate::pdf::{self, PdfExtractor, PdfTextExtractor};

/// Walks message containers and extracts every PDF they hold.
///
/// Nothing below the top-level call is fatal: unreadable containers and
/// PDFs are logged and contribute nothing to the output.
pub struct ContainerWalker {
    decoder: Box<dyn ContainerDecoder>,
    pdf: Arc<dyn PdfTextExtractor>,
    engine: FieldExtractor,
    kinds: KindRules,
    pdf_timeout: Option<Duration>,
    sink: Option<ArtifactSink>,
}

impl ContainerWalker {
    /// Create a walker with the Outlook decoder and the lopdf-based PDF reader.
    pub fn new(engine: FieldExtractor) -> Self {
        Self {
            decoder: Box::new(MsgDecoder::new()),
            pdf: Arc::new(PdfExtractor::new()),
            engine,
            kinds: KindRules::default(),
            pdf_timeout: None,
            sink: None,
        }
    }

    /// Create a walker from configuration.
    pub fn from_config(engine: FieldExtractor, config: &VirexConfig) -> Self {
        Self::new(engine)
            .with_kind_rules(config.walker.kind_rules())
            .with_pdf_timeout(config.walker.pdf_timeout())
    }

    pub fn with_decoder(mut self, decoder: impl ContainerDecoder + 'static) -> Self {
        self.decoder = Box::new(decoder);
        self
    }

    pub fn with_pdf_extractor(mut self, extractor: impl PdfTextExtractor + 'static) -> Self {
        self.pdf = Arc::new(extractor);
        self
    }

    pub fn with_kind_rules(mut self, kinds: KindRules) -> Self {
        self.kinds = kinds;
        self
    }

    pub fn with_pdf_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.pdf_timeout = timeout;
        self
    }

    pub fn with_artifacts(mut self, sink: ArtifactSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn engine(&self) -> &FieldExtractor {
        &self.engine
    }

    pub fn kind_rules(&self) -> &KindRules {
        &self.kinds
    }

    /// Read a container file and walk it.
    pub fn walk_path(&self, ctx: &WalkContext, path: &Path) -> WalkOutput {
        match std::fs::read(path) {
            Ok(data) => self.walk_bytes(ctx, &data),
            Err(e) => {
                error!("Error opening {}: {}", path.display(), e);
                WalkStats::bump(&ctx.stats.open_failures);
                WalkOutput::new()
            }
        }
    }

    /// Walk a serialized container.
    pub fn walk_bytes(&self, ctx: &WalkContext, data: &[u8]) -> WalkOutput {
        let id = ContainerId::of_bytes(data);
        if !self.enter(ctx, id) {
            return WalkOutput::new();
        }

        match self.decoder.decode(data) {
            Ok(container) => self.process(ctx, &container),
            Err(e) => {
                error!("Error opening container {}: {}", id.short(), e);
                WalkStats::bump(&ctx.stats.open_failures);
                WalkOutput::new()
            }
        }
    }

    /// Walk a container that is already decoded.
    pub fn walk_container(&self, ctx: &WalkContext, container: &MessageContainer) -> WalkOutput {
        if !self.enter(ctx, container.fingerprint) {
            return WalkOutput::new();
        }
        self.process(ctx, container)
    }

    fn enter(&self, ctx: &WalkContext, id: ContainerId) -> bool {
        if ctx.visited.mark(id) {
            WalkStats::bump(&ctx.stats.containers_opened);
            true
        } else {
            warn!("Container {} already processed, skipping to avoid loops", id.short());
            WalkStats::bump(&ctx.stats.containers_skipped);
            false
        }
    }

    fn process(&self, ctx: &WalkContext, container: &MessageContainer) -> WalkOutput {
        let mut output = WalkOutput::new();

        if container.attachments.is_empty() {
            info!("No attachments in container {}", container.fingerprint.short());
            return output;
        }

        for attachment in &container.attachments {
            let Some(declared) = attachment.name() else {
                warn!("Attachment without a name, skipping");
                continue;
            };
            let name = declared.to_lowercase();

            match (self.kinds.classify(&name), &attachment.payload) {
                (AttachmentKind::Pdf, AttachmentPayload::Binary(data)) => {
                    info!("PDF found: {}", name);
                    if let Some(document) = self.extract_pdf(ctx, container, &name, data) {
                        output.insert(name, document);
                    }
                }
                (AttachmentKind::Container, payload) => {
                    info!("Nested container found: {}", name);
                    let nested = match payload {
                        AttachmentPayload::Binary(data) => self.walk_bytes(ctx, data),
                        AttachmentPayload::Embedded(inner) => self.walk_container(ctx, inner),
                    };
                    output.merge_nested(&name, nested);
                }
                (kind, _) => debug!("Skipping attachment {} ({:?})", name, kind),
            }
        }

        output
    }

    fn extract_pdf(
        &self,
        ctx: &WalkContext,
        container: &MessageContainer,
        name: &str,
        data: &[u8],
    ) -> Option<ExtractedDocument> {
        let rendered = pdf::render_lossy(&self.pdf, data, self.pdf_timeout);

        if rendered.is_blank() {
            warn!("No text extracted from {}; the file may be scanned or empty", name);
            WalkStats::bump(&ctx.stats.pdfs_without_text);
            return None;
        }

        let record = self.engine.extract(&rendered.text);
        WalkStats::bump(&ctx.stats.pdfs_extracted);
        debug!(
            "{}: {}/{} fields found",
            name,
            record.found_count(),
            self.engine.schema().len()
        );

        if let Some(sink) = &self.sink {
            sink.save_text(&container.fingerprint, name, &rendered.text);
            sink.save_record(&container.fingerprint, name, &record);
        }

        Some(ExtractedDocument {
            record,
            page_count: rendered.page_count,
            source: container.metadata.clone(),
        })
    }
}
