//! Text normalization for output formatting.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Remove diacritics by decomposing to NFD and dropping combining marks.
pub fn strip_accents(input: &str) -> String {
    input.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Accent-stripped, uppercased form used for report headers and values.
pub fn normalize_value(input: &str) -> String {
    strip_accents(input).to_uppercase()
}

/// Clean a declared attachment file name.
///
/// Outlook pads some names with NUL characters; those and surrounding
/// whitespace are removed. Returns `None` when nothing is left.
pub fn clean_attachment_name(raw: &str) -> Option<String> {
    let cleaned = raw.trim_end_matches('\0').trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}
