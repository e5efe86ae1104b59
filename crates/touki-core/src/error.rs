//! Error and warning types for touki.
//!
//! Provides [`PdfError`] for fatal errors that stop processing of one file,
//! [`ExtractWarning`] for non-fatal issues that allow best-effort continuation,
//! [`ExtractResult`] for pairing a value with collected warnings, and
//! [`ExtractOptions`] for configuring resource limits and warning behavior.

use std::fmt;

use crate::unicode_norm::UnicodeNorm;

/// Fatal error types for PDF processing.
///
/// A `PdfError` always concerns a single file. Callers processing many files
/// report it next to the successes of the other files.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfError {
    /// The bytes are not a parseable PDF (the decode failure).
    ParseError(String),
    /// I/O error reading PDF data.
    IoError(String),
    /// A configured resource limit was exceeded.
    ResourceLimitExceeded {
        /// Name of the limit that was exceeded (e.g., "max_input_bytes").
        limit_name: String,
        /// The configured limit value.
        limit_value: usize,
        /// The actual value that exceeded the limit.
        actual_value: usize,
    },
    /// The PDF is encrypted and requires a password to open.
    PasswordRequired,
}

impl PdfError {
    /// Returns true if the error means the input is not a readable PDF.
    pub fn is_decode_failure(&self) -> bool {
        matches!(self, PdfError::ParseError(_) | PdfError::PasswordRequired)
    }
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfError::ParseError(msg) => write!(f, "parse error: {msg}"),
            PdfError::IoError(msg) => write!(f, "I/O error: {msg}"),
            PdfError::ResourceLimitExceeded {
                limit_name,
                limit_value,
                actual_value,
            } => write!(
                f,
                "resource limit exceeded: {limit_name} (limit: {limit_value}, actual: {actual_value})"
            ),
            PdfError::PasswordRequired => write!(f, "PDF is encrypted and requires a password"),
        }
    }
}

impl std::error::Error for PdfError {}

impl From<std::io::Error> for PdfError {
    fn from(err: std::io::Error) -> Self {
        PdfError::IoError(err.to_string())
    }
}

/// Machine-readable warning code for categorizing extraction issues.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "detail")
)]
pub enum ExtractWarningCode {
    /// A referenced font was not found in page resources.
    MissingFont,
    /// A content stream or XObject could not be decoded and was skipped.
    MalformedObject,
    /// A configured resource limit was reached during extraction.
    ResourceLimitReached,
    /// Character codes had no Unicode mapping and were replaced.
    EncodingFallback,
    /// Any other warning not covered by specific variants.
    Other(String),
}

impl ExtractWarningCode {
    /// Returns the string tag for this warning code.
    pub fn as_str(&self) -> &str {
        match self {
            ExtractWarningCode::MissingFont => "MISSING_FONT",
            ExtractWarningCode::MalformedObject => "MALFORMED_OBJECT",
            ExtractWarningCode::ResourceLimitReached => "RESOURCE_LIMIT_REACHED",
            ExtractWarningCode::EncodingFallback => "ENCODING_FALLBACK",
            ExtractWarningCode::Other(_) => "OTHER",
        }
    }
}

impl fmt::Display for ExtractWarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal warning encountered during extraction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractWarning {
    /// Machine-readable warning code.
    pub code: ExtractWarningCode,
    /// Human-readable description of the warning.
    pub description: String,
    /// Page number where the warning occurred (0-indexed), if applicable.
    pub page: Option<usize>,
    /// Index of the operator in the content stream where the warning occurred.
    pub operator_index: Option<usize>,
    /// Font resource name associated with the warning, if applicable.
    pub font_name: Option<String>,
}

impl ExtractWarning {
    /// Create a warning with a specific code and description.
    pub fn with_code(code: ExtractWarningCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            page: None,
            operator_index: None,
            font_name: None,
        }
    }

    /// Create a warning with operator and font context.
    pub fn with_operator_context(
        code: ExtractWarningCode,
        description: impl Into<String>,
        operator_index: usize,
        font_name: impl Into<String>,
    ) -> Self {
        Self {
            operator_index: Some(operator_index),
            font_name: Some(font_name.into()),
            ..Self::with_code(code, description)
        }
    }

    /// Set the page index, returning the modified warning.
    pub fn on_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }
}

impl fmt::Display for ExtractWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)?;
        if let Some(page) = self.page {
            write!(f, " (page {page})")?;
        }
        if let Some(ref font_name) = self.font_name {
            write!(f, " [font {font_name}]")?;
        }
        if let Some(index) = self.operator_index {
            write!(f, " [operator #{index}]")?;
        }
        Ok(())
    }
}

/// Result wrapper that pairs a value with collected warnings.
#[derive(Debug, Clone)]
pub struct ExtractResult<T> {
    /// The extracted value.
    pub value: T,
    /// Warnings collected during extraction.
    pub warnings: Vec<ExtractWarning>,
}

impl<T> ExtractResult<T> {
    /// Create a result with no warnings.
    pub fn ok(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Create a result with warnings.
    pub fn with_warnings(value: T, warnings: Vec<ExtractWarning>) -> Self {
        Self { value, warnings }
    }

    /// Returns true if there are no warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Transform the value while preserving warnings.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ExtractResult<U> {
        ExtractResult {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}

/// Options controlling extraction behavior and resource limits.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Maximum recursion depth for nested Form XObjects (default: 10).
    pub max_recursion_depth: usize,
    /// Maximum decoded content stream bytes to interpret (default: 100 MB).
    pub max_stream_bytes: usize,
    /// Whether to collect warnings during extraction (default: true).
    pub collect_warnings: bool,
    /// Unicode normalization applied to fragment text (default: none).
    ///
    /// Full-width digits in registry extracts are significant, so any
    /// compatibility form (NFKC/NFKD) changes the parsed addresses.
    pub unicode_norm: UnicodeNorm,
    /// Maximum input PDF size in bytes (default: None = no limit).
    pub max_input_bytes: Option<usize>,
    /// Maximum number of pages to process (default: None = no limit).
    pub max_pages: Option<usize>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_recursion_depth: 10,
            max_stream_bytes: 100 * 1024 * 1024,
            collect_warnings: true,
            unicode_norm: UnicodeNorm::None,
            max_input_bytes: None,
            max_pages: None,
        }
    }
}

impl ExtractOptions {
    /// Check `len` against [`max_input_bytes`](Self::max_input_bytes).
    pub fn check_input_size(&self, len: usize) -> Result<(), PdfError> {
        match self.max_input_bytes {
            Some(limit) if len > limit => Err(PdfError::ResourceLimitExceeded {
                limit_name: "max_input_bytes".to_string(),
                limit_value: limit,
                actual_value: len,
            }),
            _ => Ok(()),
        }
    }

    /// Number of pages to process for a document with `page_count` pages.
    pub fn effective_page_count(&self, page_count: usize) -> usize {
        self.max_pages.map_or(page_count, |max| page_count.min(max))
    }
}
