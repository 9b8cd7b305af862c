//! Post-processing of delimited reports: date filtering and CSV conversion.

use std::io::{BufRead, Write};

use chrono::NaiveDateTime;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::ReportError;
use crate::report::SENT_AT_FORMAT;

lazy_static! {
    // dd/mm/YYYY HH:MM:SS
    static ref DMY_TIMESTAMP: Regex = Regex::new(
        r"(\d{2}/\d{2}/\d{4}\s+\d{2}:\d{2}:\d{2})"
    ).unwrap();

    // YYYY-MM-DD HH:MM:SS with optional fraction and offset
    static ref ISO_TIMESTAMP: Regex = Regex::new(
        r"(\d{4}-\d{2}-\d{2}\s+\d{2}:\d{2}:\d{2})(?:\.\d+)?(?:[+-]\d{2}:?\d{2})?"
    ).unwrap();

    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Find a timestamp anywhere in `value`.
///
/// Accepts `dd/mm/YYYY HH:MM:SS` or `YYYY-MM-DD HH:MM:SS`, the latter with
/// optional fractional seconds and UTC offset (ignored).
pub fn clean_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Some(caps) = DMY_TIMESTAMP.captures(value) {
        let normalized = WHITESPACE.replace_all(&caps[1], " ");
        return NaiveDateTime::parse_from_str(&normalized, SENT_AT_FORMAT).ok();
    }

    let caps = ISO_TIMESTAMP.captures(value)?;
    let normalized = WHITESPACE.replace_all(&caps[1], " ");
    NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%d %H:%M:%S").ok()
}

/// Outcome of [`filter_by_date`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub kept: usize,
    pub dropped: usize,
}

/// Keep the rows whose `column` holds a timestamp strictly after `after`.
///
/// The header is copied as is. Kept rows have the date column rewritten as
/// `dd/mm/YYYY HH:MM:SS`; rows without a readable timestamp are dropped.
pub fn filter_by_date<R: BufRead, W: Write>(
    reader: R,
    mut writer: W,
    column: &str,
    after: NaiveDateTime,
    delimiter: char,
) -> crate::Result<FilterStats> {
    let mut lines = reader.lines();
    let header = match lines.next() {
        Some(line) => line?,
        None => return Err(ReportError::MissingHeader.into()),
    };
    let header = header.trim_end_matches(['\r', '\n']);

    let index = header
        .split(delimiter)
        .position(|name| name == column)
        .ok_or_else(|| ReportError::MissingColumn(column.to_string()))?;
    writeln!(writer, "{}", header)?;

    let mut stats = FilterStats::default();
    for line in lines {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let cells: Vec<&str> = line.split(delimiter).collect();
        let Some(sent_at) = cells.get(index).and_then(|cell| clean_timestamp(cell)) else {
            warn!("No readable date in column {}, dropping row: {}", column, line);
            stats.dropped += 1;
            continue;
        };

        if sent_at > after {
            let formatted = sent_at.format(SENT_AT_FORMAT).to_string();
            let row: Vec<&str> = cells
                .iter()
                .enumerate()
                .map(|(i, cell)| if i == index { formatted.as_str() } else { *cell })
                .collect();
            writeln!(writer, "{}", row.join(&delimiter.to_string()))?;
            stats.kept += 1;
        } else {
            debug!("Row dated {} is not after {}, dropping", sent_at, after);
            stats.dropped += 1;
        }
    }

    writer.flush()?;
    Ok(stats)
}

/// Convert delimited text to CSV. Blank lines are skipped.
///
/// Returns the number of records written.
pub fn convert_delimited<R: BufRead, W: Write>(
    reader: R,
    writer: W,
    delimiter: char,
) -> crate::Result<usize> {
    let mut csv_writer = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    let mut count = 0;
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        csv_writer
            .write_record(line.split(delimiter))
            .map_err(ReportError::from)?;
        count += 1;
    }

    csv_writer.flush()?;
    Ok(count)
}
