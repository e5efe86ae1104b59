//! Top-level document type for opening registry PDFs and extracting text.

use touki_core::{
    ExtractOptions, ExtractResult, ExtractWarning, LinearizedText, OwnershipRecord, PdfError,
    PositionedTextFragment, linearize, normalize_fragments, parse,
};
use touki_parse::{FragmentBackend, FragmentCollector, LopdfBackend, LopdfDocument, to_page_units};

/// One page of a document after content interpretation.
#[derive(Debug, Clone)]
pub struct Page {
    /// 0-based page index.
    pub index: usize,
    /// Page width in page units.
    pub width: f64,
    /// Page height in page units.
    pub height: f64,
    /// Fragments in content stream order.
    pub fragments: Vec<PositionedTextFragment>,
    /// Non-fatal problems met while interpreting this page.
    pub warnings: Vec<ExtractWarning>,
}

/// A PDF document opened for extraction.
///
/// # Example
///
/// ```ignore
/// let doc = Document::open(&bytes, None)?;
/// let records = doc.records()?;
/// ```
pub struct Document {
    doc: LopdfDocument,
    options: ExtractOptions,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("doc", &self.doc)
            .field("options", &self.options)
            .finish()
    }
}

impl Document {
    /// Open a document from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::IoError`] if the file cannot be read, and the
    /// errors of [`Document::open`] otherwise.
    #[cfg(feature = "std")]
    pub fn open_file(
        path: impl AsRef<std::path::Path>,
        options: Option<ExtractOptions>,
    ) -> Result<Self, PdfError> {
        let bytes = std::fs::read(path.as_ref()).map_err(|e| PdfError::IoError(e.to_string()))?;
        Self::open(&bytes, options)
    }

    /// Open a document from bytes.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::ResourceLimitExceeded`] if the input is larger than
    /// `max_input_bytes`, [`PdfError::PasswordRequired`] if it is encrypted,
    /// and [`PdfError::ParseError`] if the bytes are not a PDF.
    pub fn open(bytes: &[u8], options: Option<ExtractOptions>) -> Result<Self, PdfError> {
        let options = options.unwrap_or_default();
        options.check_input_size(bytes.len())?;
        let doc = LopdfBackend::open(bytes).map_err(PdfError::from)?;
        Ok(Self { doc, options })
    }

    /// The options this document was opened with.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Number of pages that will be processed (capped by `max_pages`).
    pub fn page_count(&self) -> usize {
        self.options
            .effective_page_count(LopdfBackend::page_count(&self.doc))
    }

    /// Interpret one page by 0-based index.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the index is out of range or the page
    /// dictionary cannot be read.
    pub fn page(&self, index: usize) -> Result<Page, PdfError> {
        if index >= self.page_count() {
            return Err(PdfError::ParseError(format!(
                "page index {index} out of range (0..{})",
                self.page_count()
            )));
        }
        let page = LopdfBackend::get_page(&self.doc, index).map_err(PdfError::from)?;
        let media_box = LopdfBackend::page_media_box(&self.doc, &page).map_err(PdfError::from)?;

        let mut collector = FragmentCollector::new(media_box, index);
        LopdfBackend::interpret_page(&self.doc, &page, &mut collector, &self.options)
            .map_err(PdfError::from)?;
        let (mut fragments, warnings) = collector.finish();
        normalize_fragments(&mut fragments, self.options.unicode_norm);

        #[cfg(feature = "tracing")]
        tracing::trace!(
            page = index,
            fragments = fragments.len(),
            warnings = warnings.len(),
            "interpreted page"
        );

        Ok(Page {
            index,
            width: to_page_units(media_box.width()),
            height: to_page_units(media_box.height()),
            fragments,
            warnings,
        })
    }

    /// Interpret every page, in page order.
    ///
    /// With the `parallel` feature pages are interpreted on the rayon pool.
    ///
    /// # Errors
    ///
    /// Returns the first page error.
    pub fn pages(&self) -> Result<Vec<Page>, PdfError> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            (0..self.page_count())
                .into_par_iter()
                .map(|i| self.page(i))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            (0..self.page_count()).map(|i| self.page(i)).collect()
        }
    }

    /// The fragments of every page, in page order.
    ///
    /// # Errors
    ///
    /// Returns the first page error.
    pub fn pages_fragments(&self) -> Result<Vec<Vec<PositionedTextFragment>>, PdfError> {
        Ok(self.pages()?.into_iter().map(|page| page.fragments).collect())
    }

    /// The linearized text of the whole document.
    ///
    /// # Errors
    ///
    /// Returns the first page error.
    pub fn text(&self) -> Result<LinearizedText, PdfError> {
        Ok(self.text_with_warnings()?.value)
    }

    /// The linearized text together with the warnings of every page.
    ///
    /// # Errors
    ///
    /// Returns the first page error.
    pub fn text_with_warnings(&self) -> Result<ExtractResult<LinearizedText>, PdfError> {
        let pages = self.pages()?;
        let mut warnings = Vec::new();
        let mut fragments = Vec::with_capacity(pages.len());
        for page in pages {
            warnings.extend(page.warnings);
            fragments.push(page.fragments);
        }
        Ok(ExtractResult::with_warnings(linearize(&fragments), warnings))
    }

    /// Ownership records of the document.
    ///
    /// # Errors
    ///
    /// Returns the first page error.
    pub fn records(&self) -> Result<Vec<OwnershipRecord>, PdfError> {
        Ok(parse(&self.text()?))
    }

    /// All warnings collected while interpreting the document.
    ///
    /// # Errors
    ///
    /// Returns the first page error.
    pub fn warnings(&self) -> Result<Vec<ExtractWarning>, PdfError> {
        Ok(self.text_with_warnings()?.warnings)
    }
}

/// Extract the linearized text of a PDF.
///
/// # Errors
///
/// Returns [`PdfError::ParseError`] if the bytes are not a parseable PDF.
pub fn extract(bytes: &[u8]) -> Result<LinearizedText, PdfError> {
    extract_with_options(bytes, ExtractOptions::default())
}

/// Like [`extract`], with explicit options.
///
/// # Errors
///
/// Returns the errors of [`Document::open`] and [`Document::text`].
pub fn extract_with_options(
    bytes: &[u8],
    options: ExtractOptions,
) -> Result<LinearizedText, PdfError> {
    Document::open(bytes, Some(options))?.text()
}

/// Extract the ownership records of a PDF.
///
/// The parsed document is dropped before the records are parsed.
///
/// # Errors
///
/// Returns [`PdfError::ParseError`] if the bytes are not a parseable PDF.
pub fn extract_records(bytes: &[u8]) -> Result<Vec<OwnershipRecord>, PdfError> {
    let text = extract(bytes)?;
    Ok(parse(&text))
}
