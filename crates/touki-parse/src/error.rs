//! Error types for the backend and interpreter layers.
//!
//! Uses [`thiserror`] for the derivation. [`BackendError`] converts into
//! [`PdfError`] so callers only ever see the core error type.

use thiserror::Error;
use touki_core::PdfError;

/// Error type for PDF backend operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The bytes are not a parseable PDF, or an object could not be resolved.
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// A core library error.
    #[error(transparent)]
    Core(#[from] PdfError),
}

impl From<BackendError> for PdfError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => PdfError::ParseError(msg),
            BackendError::Core(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_parse() {
        let err = BackendError::Parse("invalid xref table".to_string());
        assert_eq!(err.to_string(), "PDF parse error: invalid xref table");
    }

    #[test]
    fn parse_becomes_decode_failure() {
        let pdf_err: PdfError = BackendError::Parse("bad syntax".to_string()).into();
        assert_eq!(pdf_err, PdfError::ParseError("bad syntax".to_string()));
        assert!(pdf_err.is_decode_failure());
    }

    #[test]
    fn core_error_passes_through() {
        let pdf_err: PdfError = BackendError::Core(PdfError::PasswordRequired).into();
        assert_eq!(pdf_err, PdfError::PasswordRequired);
    }

    #[test]
    fn backend_error_implements_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(BackendError::Parse("test".to_string()));
        assert!(err.to_string().contains("test"));
    }
}
