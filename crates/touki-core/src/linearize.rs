//! Reading-order linearization of positioned fragments.
//!
//! Turns the fragments of every page into one string: fragments are sorted
//! top-to-bottom then left-to-right, fragments on the same visual line are
//! separated by a space, lines by `\n`, and pages after the first are
//! introduced by a page-break marker.

use std::fmt;
use std::ops::Deref;

use crate::fragment::PositionedTextFragment;

/// Maximum vertical distance (page units) between two fragments on one line.
///
/// Row boundaries of the registry tables depend on this value; it must not
/// be made configurable.
pub const LINE_TOLERANCE: f64 = 0.1;

/// Marker inserted before page `page_number` (1-based) for every page but the first.
pub fn page_break_marker(page_number: usize) -> String {
    format!("\n\n--- ページ {page_number} ---\n\n")
}

/// The whole document as a single reading-order string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct LinearizedText(String);

impl LinearizedText {
    /// The text as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the owned string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for LinearizedText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for LinearizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for LinearizedText {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl fmt::Display for LinearizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sort one page's fragments into reading order.
///
/// The sort is stable: fragments with equal `(y, x)` keep emission order.
pub fn reading_order(fragments: &[PositionedTextFragment]) -> Vec<&PositionedTextFragment> {
    let mut sorted: Vec<&PositionedTextFragment> = fragments.iter().collect();
    sorted.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
    sorted
}

fn push_page(out: &mut String, fragments: &[PositionedTextFragment]) {
    let mut prev_y: Option<f64> = None;
    for fragment in reading_order(fragments) {
        if let Some(prev) = prev_y {
            if (fragment.y - prev).abs() > LINE_TOLERANCE {
                out.push('\n');
            }
        }
        out.push_str(&fragment.text);
        out.push(' ');
        prev_y = Some(fragment.y);
    }
}

/// Linearize the fragments of all pages (page 0 first).
pub fn linearize<P>(pages: &[P]) -> LinearizedText
where
    P: AsRef<[PositionedTextFragment]>,
{
    let mut out = String::new();
    for (index, page) in pages.iter().enumerate() {
        if index > 0 {
            out.push_str(&page_break_marker(index + 1));
        }
        push_page(&mut out, page.as_ref());
    }
    LinearizedText(out.trim().to_string())
}
