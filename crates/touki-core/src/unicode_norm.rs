//! Unicode normalization for extracted fragment text.
//!
//! Provides [`UnicodeNorm`] for selecting a normalization form and
//! [`normalize_fragments`] for applying it to a page of fragments.

use unicode_normalization::UnicodeNormalization;

use crate::fragment::PositionedTextFragment;

/// Unicode normalization form to apply to extracted text.
///
/// Different PDF generators emit different Unicode representations for the
/// same glyph (e.g. composed vs. decomposed dakuten). NFC unifies those
/// without touching full-width digits; the compatibility forms fold
/// full-width digits and letters to ASCII.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnicodeNorm {
    /// No normalization (default).
    #[default]
    None,
    /// Canonical Decomposition, followed by Canonical Composition (NFC).
    Nfc,
    /// Canonical Decomposition (NFD).
    Nfd,
    /// Compatibility Decomposition, followed by Canonical Composition (NFKC).
    Nfkc,
    /// Compatibility Decomposition (NFKD).
    Nfkd,
}

impl UnicodeNorm {
    /// Apply this normalization form to the given string.
    pub fn normalize(&self, text: &str) -> String {
        match self {
            UnicodeNorm::None => text.to_string(),
            UnicodeNorm::Nfc => text.nfc().collect(),
            UnicodeNorm::Nfd => text.nfd().collect(),
            UnicodeNorm::Nfkc => text.nfkc().collect(),
            UnicodeNorm::Nfkd => text.nfkd().collect(),
        }
    }
}

/// Apply Unicode normalization to the text of each fragment in place.
pub fn normalize_fragments(fragments: &mut [PositionedTextFragment], norm: UnicodeNorm) {
    if norm == UnicodeNorm::None {
        return;
    }
    for fragment in fragments {
        fragment.text = norm.normalize(&fragment.text);
    }
}
