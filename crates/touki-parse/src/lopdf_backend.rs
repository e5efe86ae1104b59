//! lopdf-based PDF backend.
//!
//! Implements [`FragmentBackend`] using the [lopdf](https://crates.io/crates/lopdf)
//! crate for document parsing and content stream decoding.

use touki_core::{ExtractOptions, ExtractWarning, ExtractWarningCode, PdfError};

use crate::backend::{FragmentBackend, MediaBox};
use crate::error::BackendError;
use crate::handler::TextSink;
use crate::text_state::{GraphicsStack, TextState};

/// A parsed PDF document backed by lopdf.
pub struct LopdfDocument {
    inner: lopdf::Document,
    /// Page object IDs in page order.
    page_ids: Vec<lopdf::ObjectId>,
}

impl LopdfDocument {
    /// Access the underlying lopdf document.
    pub fn inner(&self) -> &lopdf::Document {
        &self.inner
    }
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

/// A reference to a single page within a [`LopdfDocument`].
#[derive(Debug, Clone, Copy)]
pub struct LopdfPage {
    /// The lopdf object ID for this page.
    pub object_id: lopdf::ObjectId,
    /// The 0-based page index.
    pub index: usize,
}

/// The lopdf-based PDF backend.
///
/// # Example
///
/// ```ignore
/// use touki_parse::{FragmentBackend, LopdfBackend};
///
/// let doc = LopdfBackend::open(pdf_bytes)?;
/// let count = LopdfBackend::page_count(&doc);
/// let page = LopdfBackend::get_page(&doc, 0)?;
/// ```
pub struct LopdfBackend;

/// Convert a lopdf numeric object (Integer or Real) to f64.
pub(crate) fn object_to_f64(obj: &lopdf::Object) -> Result<f64, BackendError> {
    match obj {
        lopdf::Object::Integer(i) => Ok(*i as f64),
        lopdf::Object::Real(f) => Ok(f64::from(*f)),
        _ => Err(BackendError::Parse(format!("expected number, got {obj:?}"))),
    }
}

/// Follow an indirect reference; unresolvable references are returned as is.
pub(crate) fn resolve_ref<'a>(doc: &'a lopdf::Document, obj: &'a lopdf::Object) -> &'a lopdf::Object {
    match obj {
        lopdf::Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Decode a stream, decompressing if needed.
pub(crate) fn decode_stream(stream: &lopdf::Stream) -> Result<Vec<u8>, BackendError> {
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .map_err(|e| BackendError::Parse(format!("failed to decompress stream: {e}")))
    } else {
        Ok(stream.content.clone())
    }
}

/// Look up a key in the page dictionary, walking up the page tree
/// (via /Parent) if the key is not found on the page itself.
fn resolve_inherited<'a>(
    doc: &'a lopdf::Document,
    page_id: lopdf::ObjectId,
    key: &[u8],
) -> Result<Option<&'a lopdf::Object>, BackendError> {
    let mut current_id = page_id;
    // Bounded so that a /Parent cycle cannot loop forever.
    for _ in 0..64 {
        let dict = doc
            .get_object(current_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

        if let Ok(value) = dict.get(key) {
            return Ok(Some(resolve_ref(doc, value)));
        }

        match dict.get(b"Parent") {
            Ok(parent) => {
                current_id = parent
                    .as_reference()
                    .map_err(|e| BackendError::Parse(format!("invalid /Parent reference: {e}")))?;
            }
            Err(_) => return Ok(None),
        }
    }
    Ok(None)
}

/// Content stream bytes of a page; `/Contents` may be one stream or an array.
///
/// Parts that cannot be resolved or decompressed are skipped with a warning.
fn get_page_content_bytes(
    doc: &lopdf::Document,
    page_dict: &lopdf::Dictionary,
    sink: &mut dyn TextSink,
    options: &ExtractOptions,
) -> Vec<u8> {
    let Ok(contents) = page_dict.get(b"Contents") else {
        return Vec::new();
    };
    let parts: Vec<&lopdf::Object> = match resolve_ref(doc, contents) {
        lopdf::Object::Array(items) => items.iter().map(|item| resolve_ref(doc, item)).collect(),
        other => vec![other],
    };

    let mut content = Vec::new();
    for part in parts {
        let decoded = part
            .as_stream()
            .map_err(|e| BackendError::Parse(format!("/Contents entry is not a stream: {e}")))
            .and_then(decode_stream);
        match decoded {
            Ok(bytes) => {
                if !content.is_empty() {
                    content.push(b'\n');
                }
                content.extend_from_slice(&bytes);
            }
            Err(e) => {
                if options.collect_warnings {
                    sink.on_warning(ExtractWarning::with_code(
                        ExtractWarningCode::MalformedObject,
                        format!("skipped page content stream: {e}"),
                    ));
                }
            }
        }
    }
    content
}

/// The resources dictionary of a page, inherited through the page tree.
fn get_page_resources(
    doc: &lopdf::Document,
    page_id: lopdf::ObjectId,
) -> Result<&lopdf::Dictionary, BackendError> {
    match resolve_inherited(doc, page_id, b"Resources")? {
        Some(obj) => obj
            .as_dict()
            .map_err(|_| BackendError::Parse("/Resources is not a dictionary".to_string())),
        None => {
            static EMPTY_DICT: std::sync::LazyLock<lopdf::Dictionary> =
                std::sync::LazyLock::new(lopdf::Dictionary::new);
            Ok(&EMPTY_DICT)
        }
    }
}

impl FragmentBackend for LopdfBackend {
    type Document = LopdfDocument;
    type Page = LopdfPage;
    type Error = BackendError;

    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error> {
        let inner = lopdf::Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;

        if inner.is_encrypted() {
            return Err(BackendError::Core(PdfError::PasswordRequired));
        }

        // get_pages returns a BTreeMap keyed by 1-based page number.
        let page_ids: Vec<lopdf::ObjectId> = inner.get_pages().values().copied().collect();

        #[cfg(feature = "tracing")]
        tracing::debug!(pages = page_ids.len(), bytes = bytes.len(), "opened PDF");

        Ok(LopdfDocument { inner, page_ids })
    }

    fn page_count(doc: &Self::Document) -> usize {
        doc.page_ids.len()
    }

    fn get_page(doc: &Self::Document, index: usize) -> Result<Self::Page, Self::Error> {
        let object_id = doc.page_ids.get(index).copied().ok_or_else(|| {
            BackendError::Parse(format!(
                "page index {index} out of range (0..{})",
                doc.page_ids.len()
            ))
        })?;
        Ok(LopdfPage { object_id, index })
    }

    fn page_media_box(doc: &Self::Document, page: &Self::Page) -> Result<MediaBox, Self::Error> {
        let Some(obj) = resolve_inherited(&doc.inner, page.object_id, b"MediaBox")? else {
            return Ok(MediaBox::letter());
        };
        let array = obj
            .as_array()
            .map_err(|_| BackendError::Parse("/MediaBox is not an array".to_string()))?;
        let values = array
            .iter()
            .map(|item| object_to_f64(resolve_ref(&doc.inner, item)))
            .collect::<Result<Vec<f64>, _>>()?;
        match values.as_slice() {
            [x0, y0, x1, y1] => Ok(MediaBox::new(*x0, *y0, *x1, *y1)),
            _ => Err(BackendError::Parse(format!(
                "expected 4-element array for /MediaBox, got {}",
                values.len()
            ))),
        }
    }

    fn interpret_page(
        doc: &Self::Document,
        page: &Self::Page,
        sink: &mut dyn TextSink,
        options: &ExtractOptions,
    ) -> Result<(), Self::Error> {
        let inner = &doc.inner;
        let page_dict = inner
            .get_object(page.object_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

        let content_bytes = get_page_content_bytes(inner, page_dict, sink, options);
        let resources = get_page_resources(inner, page.object_id)?;

        let mut gstate = GraphicsStack::new();
        let mut tstate = TextState::new();
        crate::interpreter::interpret_content_stream(
            inner,
            &content_bytes,
            resources,
            sink,
            options,
            0,
            &mut gstate,
            &mut tstate,
        )
    }
}
