//! PDF backend trait.
//!
//! Defines the [`FragmentBackend`] trait that abstracts the PDF operations
//! text extraction needs: opening bytes, walking pages, reading the page box
//! and interpreting page content into a [`TextSink`].

use touki_core::{ExtractOptions, PdfError};

use crate::handler::TextSink;

/// A page box in PDF user space (points, bottom-left origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl MediaBox {
    /// Build a box from two corners given in any order.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    /// US Letter, used when a page tree has no usable `/MediaBox`.
    pub fn letter() -> Self {
        Self::new(0.0, 0.0, 612.0, 792.0)
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }
}

/// Trait abstracting PDF parsing for text extraction.
///
/// # Usage
///
/// ```ignore
/// let doc = MyBackend::open(pdf_bytes)?;
/// for index in 0..MyBackend::page_count(&doc) {
///     let page = MyBackend::get_page(&doc, index)?;
///     let media_box = MyBackend::page_media_box(&doc, &page)?;
///     MyBackend::interpret_page(&doc, &page, &mut sink, &options)?;
/// }
/// ```
pub trait FragmentBackend {
    /// The parsed PDF document type.
    type Document;

    /// A reference to a single page within a document.
    type Page;

    /// Backend-specific error type, convertible to [`PdfError`].
    type Error: std::error::Error + Into<PdfError>;

    /// Parse PDF bytes into a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a PDF, or the PDF is encrypted.
    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error>;

    /// Return the number of pages in the document.
    fn page_count(doc: &Self::Document) -> usize;

    /// Access a page by 0-based index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range.
    fn get_page(doc: &Self::Document, index: usize) -> Result<Self::Page, Self::Error>;

    /// The page's MediaBox, inherited through the page tree when needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the MediaBox entry exists but is malformed.
    fn page_media_box(doc: &Self::Document, page: &Self::Page) -> Result<MediaBox, Self::Error>;

    /// Interpret the page's content stream, reporting text runs to `sink`.
    ///
    /// Problems confined to a part of the page (a missing font, an
    /// undecodable stream) are reported as warnings through the sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the page dictionary itself cannot be read.
    fn interpret_page(
        doc: &Self::Document,
        page: &Self::Page,
        sink: &mut dyn TextSink,
        options: &ExtractOptions,
    ) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_box_normalizes_corners() {
        let mb = MediaBox::new(612.0, 792.0, 0.0, 0.0);
        assert_eq!(mb, MediaBox::letter());
        assert_eq!(mb.width(), 612.0);
        assert_eq!(mb.height(), 792.0);
    }
}
