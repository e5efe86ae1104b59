//! touki: Extract ownership records from Japanese property-registry PDFs.
//!
//! This is the public API facade crate of the touki workspace. It re-exports
//! types from touki-core and uses touki-parse for PDF reading and content
//! interpretation.
//!
//! # Architecture
//!
//! - **touki-core**: Backend-independent types, linearization and the record parser
//! - **touki-parse**: PDF backend and content stream interpreter
//! - **touki** (this crate): Public API that ties everything together
//!
//! # Example
//!
//! ```ignore
//! let bytes = std::fs::read("registry.pdf")?;
//! for record in touki::extract_records(&bytes)? {
//!     println!("{} {}", record.owner_name, record.owner_address);
//! }
//! ```

pub mod batch;
mod document;
#[cfg(feature = "serde")]
pub mod events;

pub use batch::{
    BatchInput, BatchOptions, BatchProgress, FileOutcome, InputFile, process_batch,
    process_batch_with_progress, process_file,
};
pub use document::{Document, Page, extract, extract_records, extract_with_options};
#[cfg(feature = "serde")]
pub use events::BatchEvent;
pub use touki_core::{
    ExtractOptions, ExtractResult, ExtractWarning, ExtractWarningCode, LINE_TOLERANCE,
    LinearizedText, OwnershipRecord, POINTS_PER_PAGE_UNIT, ParseReport, PdfError,
    PositionedTextFragment, UnicodeNorm, linearize, page_break_marker, parse, parse_with_report,
    to_full_width, to_half_width,
};

pub use touki_core;
pub use touki_parse;
