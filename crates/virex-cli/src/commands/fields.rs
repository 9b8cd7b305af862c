//! Fields command - run field extraction on a single PDF or text file.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::info;

use virex_core::pdf::{PdfExtractor, PdfTextExtractor};
use virex_core::{AttachmentKind, ExtractionRecord};

use super::{load_config, load_extractor};

/// Arguments for the fields command.
#[derive(Args)]
pub struct FieldsArgs {
    /// Input file (PDF or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// Field schema (JSON) replacing the built-in one
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// `Field: value` lines
    Text,
    /// JSON object
    Json,
}

#[derive(Serialize)]
struct FieldsOutput<'a> {
    file: String,
    page_count: Option<u32>,
    fields: &'a ExtractionRecord,
}

pub async fn run(args: FieldsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Extracting fields from {}", args.input.display());

    let kind = config
        .walker
        .kind_rules()
        .classify(&args.input.to_string_lossy());

    let (text, page_count) = if kind == AttachmentKind::Pdf {
        let data = fs::read(&args.input)?;
        let rendered = PdfExtractor::new().render_to_text(&data)?;
        (rendered.text, Some(rendered.page_count))
    } else {
        (fs::read_to_string(&args.input)?, None)
    };

    if text.trim().is_empty() {
        eprintln!(
            "{} No text found in {}; the file may be scanned or empty",
            style("⚠").yellow(),
            args.input.display()
        );
    }

    let extractor = load_extractor(&config, args.schema.as_deref())?;
    let record = extractor.extract(&text);

    match args.format {
        OutputFormat::Text => {
            for (field, value) in record.iter() {
                let value = if record.is_found(field) {
                    style(value).green()
                } else {
                    style(value).dim()
                };
                println!("{}: {}", field, value);
            }
            println!();
            println!(
                "{} {}/{} fields found",
                style("ℹ").blue(),
                record.found_count(),
                extractor.schema().len()
            );
        }
        OutputFormat::Json => {
            let output = FieldsOutput {
                file: args.input.display().to_string(),
                page_count,
                fields: &record,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
