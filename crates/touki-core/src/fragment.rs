//! Positioned text fragments.

/// Number of PDF points in one page unit.
///
/// Fragment coordinates use the page-unit system of positioned-text JSON
/// dumps: a US-letter page (612pt wide) is 38.25 units wide.
pub const POINTS_PER_PAGE_UNIT: f64 = 16.0;

/// One glyph run placed on a page.
///
/// Coordinates are page-relative page units with the origin at the top-left
/// corner; `y` grows downward. `text` is plain Unicode (never percent-encoded).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionedTextFragment {
    /// Decoded text of the run.
    pub text: String,
    /// Horizontal position of the run origin.
    pub x: f64,
    /// Vertical position of the run baseline.
    pub y: f64,
}

impl PositionedTextFragment {
    /// Create a fragment from already-decoded text.
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
        }
    }

    /// Create a fragment from percent-encoded text.
    ///
    /// Text whose escapes do not decode to UTF-8 is kept as given.
    pub fn from_encoded(encoded: &str, x: f64, y: f64) -> Self {
        let text = urlencoding::decode(encoded)
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| encoded.to_string());
        Self { text, x, y }
    }

    /// Create a fragment from a position in PDF points (top-left origin).
    pub fn from_points(text: impl Into<String>, x_pt: f64, y_pt: f64) -> Self {
        Self::new(text, x_pt / POINTS_PER_PAGE_UNIT, y_pt / POINTS_PER_PAGE_UNIT)
    }
}
