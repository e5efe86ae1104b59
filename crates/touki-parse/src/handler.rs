//! Callback trait between the content stream interpreter and its consumers.
//!
//! The interpreter reports one [`TextRun`] per text-showing operator to a
//! [`TextSink`]. [`FragmentCollector`] is the sink used for extraction: it
//! places runs on the page and turns them into positioned fragments.

use touki_core::{ExtractWarning, POINTS_PER_PAGE_UNIT, PositionedTextFragment};

use crate::backend::MediaBox;

/// Text shown by one `Tj`, `TJ`, `'` or `"` operator.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Decoded text of the run (all strings of a `TJ` array joined).
    pub text: String,
    /// Run origin in PDF user space (points, bottom-left origin).
    pub x: f64,
    /// Baseline of the run origin in PDF user space.
    pub y: f64,
    /// Font resource name active for the run.
    pub font_name: String,
    /// Effective font size (Tf size scaled by the text and current matrices).
    pub font_size: f64,
}

/// Receiver of interpreter events.
///
/// Both methods default to no-ops so sinks only implement what they need.
pub trait TextSink {
    /// Called for every text-showing operator whose text is not blank.
    fn on_text_run(&mut self, _run: TextRun) {}

    /// Called for non-fatal problems; interpretation continues.
    fn on_warning(&mut self, _warning: ExtractWarning) {}
}

/// Collects the runs of one page as [`PositionedTextFragment`]s.
#[derive(Debug)]
pub struct FragmentCollector {
    media_box: MediaBox,
    page_index: usize,
    fragments: Vec<PositionedTextFragment>,
    warnings: Vec<ExtractWarning>,
}

impl FragmentCollector {
    pub fn new(media_box: MediaBox, page_index: usize) -> Self {
        Self {
            media_box,
            page_index,
            fragments: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Fragments in emission order, plus the warnings of the page.
    pub fn finish(self) -> (Vec<PositionedTextFragment>, Vec<ExtractWarning>) {
        (self.fragments, self.warnings)
    }
}

impl TextSink for FragmentCollector {
    fn on_text_run(&mut self, run: TextRun) {
        let x = run.x - self.media_box.x0;
        let y = self.media_box.y1 - run.y;
        self.fragments
            .push(PositionedTextFragment::from_points(run.text, x, y));
    }

    fn on_warning(&mut self, warning: ExtractWarning) {
        self.warnings.push(warning.on_page(self.page_index));
    }
}

/// Page width or height in page units.
pub fn to_page_units(points: f64) -> f64 {
    points / POINTS_PER_PAGE_UNIT
}
