//! touki-parse: PDF parsing backend and content stream interpreter.
//!
//! This crate implements the PDF side of touki: the [`FragmentBackend`]
//! trait, its lopdf implementation, font and CMap decoding (including the
//! predefined Japanese CMaps), and the content stream interpreter that
//! reports positioned [`TextRun`]s to a [`TextSink`].

pub mod backend;
pub mod cjk_encoding;
pub mod cmap;
pub mod error;
pub mod font;
pub mod handler;
mod interpreter;
pub mod lopdf_backend;
pub mod text_state;

pub use backend::{FragmentBackend, MediaBox};
pub use error::BackendError;
pub use font::strip_subset_prefix;
pub use handler::{FragmentCollector, TextRun, TextSink, to_page_units};
pub use lopdf_backend::{LopdfBackend, LopdfDocument, LopdfPage};
pub use text_state::{GraphicsStack, Matrix, TextState};
pub use touki_core;
