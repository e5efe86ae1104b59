//! touki-core: Backend-independent data types and algorithms.
//!
//! This crate provides the types shared by the touki workspace (positioned
//! fragments, linearized text, ownership records, errors and options) and
//! the two PDF-independent algorithms: reading-order linearization and the
//! registry record parser.

pub mod digits;
pub mod error;
pub mod fragment;
pub mod linearize;
pub mod record;
pub mod registry;
pub mod unicode_norm;

pub use digits::{to_full_width, to_half_width};
pub use error::{
    ExtractOptions, ExtractResult, ExtractWarning, ExtractWarningCode, PdfError,
};
pub use fragment::{POINTS_PER_PAGE_UNIT, PositionedTextFragment};
pub use linearize::{LINE_TOLERANCE, LinearizedText, linearize, page_break_marker, reading_order};
pub use record::OwnershipRecord;
pub use registry::{ParseReport, parse, parse_with_report};
pub use unicode_norm::{UnicodeNorm, normalize_fragments};
