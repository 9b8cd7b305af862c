//! Filter and to-csv commands - post-process a delimited report.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::Args;
use console::style;

use virex_core::filter::{convert_delimited, filter_by_date};
use virex_core::report::{COLUMN_SENT_AT, SENT_AT_FORMAT};

use super::load_config;

/// Arguments for the filter command.
#[derive(Args)]
pub struct FilterArgs {
    /// Delimited report to read
    #[arg(required = true)]
    input: PathBuf,

    /// Filtered report to write
    #[arg(required = true)]
    output: PathBuf,

    /// Keep rows strictly after this date (dd/mm/YYYY HH:MM:SS)
    #[arg(long, default_value = "01/11/2024 00:00:00")]
    after: String,

    /// Column holding the date
    #[arg(long, default_value = COLUMN_SENT_AT)]
    column: String,
}

/// Arguments for the to-csv command.
#[derive(Args)]
pub struct ToCsvArgs {
    /// Delimited report to read
    #[arg(required = true)]
    input: PathBuf,

    /// CSV file to write
    #[arg(required = true)]
    output: PathBuf,
}

pub async fn run_filter(args: FilterArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let after = NaiveDateTime::parse_from_str(&args.after, SENT_AT_FORMAT).map_err(|e| {
        anyhow::anyhow!(
            "Invalid --after value '{}' (expected dd/mm/YYYY HH:MM:SS): {}",
            args.after,
            e
        )
    })?;

    let reader = BufReader::new(File::open(&args.input)?);
    let writer = BufWriter::new(File::create(&args.output)?);
    let stats = filter_by_date(reader, writer, &args.column, after, config.report.delimiter)?;

    println!(
        "{} Kept {} rows, dropped {} ({})",
        style("✓").green(),
        stats.kept,
        stats.dropped,
        args.output.display()
    );
    Ok(())
}

pub async fn run_to_csv(args: ToCsvArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let reader = BufReader::new(File::open(&args.input)?);
    let writer = BufWriter::new(File::create(&args.output)?);
    let count = convert_delimited(reader, writer, config.report.delimiter)?;

    println!(
        "{} Converted {} lines to {}",
        style("✓").green(),
        count,
        args.output.display()
    );
    Ok(())
}
