use std::io::{self, IsTerminal, Write};
use std::path::Path;

use touki::{Document, ExtractOptions, UnicodeNorm};

use crate::page_range::parse_page_range;

/// Open a PDF file with user-friendly error messages.
///
/// Returns `Err(1)` with a message printed to stderr if the file is not found
/// or cannot be parsed as a valid PDF.
pub fn open_document(file: &Path, unicode_norm: Option<UnicodeNorm>) -> Result<Document, i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }

    let options = ExtractOptions {
        unicode_norm: unicode_norm.unwrap_or_default(),
        ..ExtractOptions::default()
    };
    tracing::debug!(file = %file.display(), "opening PDF");
    Document::open_file(file, Some(options)).map_err(|e| {
        eprintln!("Error: failed to open PDF: {e}");
        1
    })
}

/// Resolve an optional page range string into 0-indexed page indices.
///
/// If `pages` is `None`, returns all pages (0..page_count).
/// If `pages` is `Some`, parses the range string and validates against page_count.
pub fn resolve_pages(pages: Option<&str>, page_count: usize) -> Result<Vec<usize>, i32> {
    match pages {
        Some(range) => parse_page_range(range, page_count).map_err(|e| {
            eprintln!("Error: {e}");
            1
        }),
        None => Ok((0..page_count).collect()),
    }
}

/// Escape a string for CSV output.
///
/// If the text contains commas, double quotes, or newlines, wraps it in
/// double quotes and escapes any internal double quotes by doubling them.
pub fn csv_escape(text: &str) -> String {
    if text.contains(',') || text.contains('"') || text.contains('\n') {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

/// Serialize a JSON value on one line, mapping failures to exit code 1.
pub fn to_json_line(value: &serde_json::Value) -> Result<String, i32> {
    serde_json::to_string(value).map_err(|e| {
        eprintln!("Error: failed to serialize output: {e}");
        1
    })
}

/// A progress reporter that prints "Processing {unit} N/M..." to stderr,
/// but only when stderr is connected to a TTY (terminal).
pub struct ProgressReporter {
    unit: &'static str,
    total: usize,
    is_tty: bool,
}

impl ProgressReporter {
    /// Create a new progress reporter for `total` items named `unit`.
    pub fn new(unit: &'static str, total: usize) -> Self {
        Self {
            unit,
            total,
            is_tty: io::stderr().is_terminal(),
        }
    }

    /// Report progress for item `current` (1-indexed).
    pub fn report(&self, current: usize) {
        if self.is_tty {
            eprint!("\rProcessing {} {}/{}...", self.unit, current, self.total);
            let _ = io::stderr().flush();
        }
    }

    /// Clear the progress line (if TTY).
    pub fn finish(&self) {
        if self.is_tty {
            eprint!("\r{}\r", " ".repeat(40));
            let _ = io::stderr().flush();
        }
    }
}
