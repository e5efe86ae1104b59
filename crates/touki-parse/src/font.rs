//! Font loading: string decoding and glyph advances.
//!
//! A [`Font`] turns the bytes of a shown string into glyphs carrying their
//! Unicode text and advance width. Text comes from the `/ToUnicode` CMap
//! when there is one, then from a predefined Japanese CMap for Type0 fonts,
//! and from Windows-1252 for simple fonts.

use std::collections::HashMap;

use encoding_rs::Encoding;

use crate::cjk_encoding::{decode_cjk_string, encoding_for_cmap};
use crate::cmap::{CMap, code_from_bytes};
use crate::lopdf_backend::{decode_stream, object_to_f64, resolve_ref};

/// Default `/DW` of CID fonts (glyph space units).
const DEFAULT_CID_WIDTH: f64 = 1000.0;
/// Advance used by simple fonts without a `/Widths` array.
const DEFAULT_SIMPLE_WIDTH: f64 = 500.0;

/// One decoded glyph of a shown string.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// Character code read from the string.
    pub code: u32,
    /// Unicode text; U+FFFD when the code has no mapping.
    pub text: String,
    /// Advance width in glyph space (1/1000 of text space).
    pub width: f64,
    /// Single-byte code 32, which receives word spacing.
    pub is_word_space: bool,
    /// Whether `text` came from a real mapping.
    pub mapped: bool,
}

/// How the bytes of a string are split into codes and mapped to text.
#[derive(Debug, Clone, Copy, PartialEq)]
enum CodeScheme {
    /// One byte per code; Windows-1252 without ToUnicode.
    Simple,
    /// Two-byte codes equal to CIDs (Identity-H/V or an unknown CMap).
    Identity,
    /// A predefined CMap backed by a text encoding.
    Predefined(&'static Encoding),
}

#[derive(Debug, Clone)]
enum GlyphWidths {
    Simple {
        first_char: u32,
        widths: Vec<f64>,
        missing: f64,
    },
    Cid {
        default: f64,
        widths: HashMap<u32, f64>,
    },
}

impl GlyphWidths {
    fn width(&self, code: u32) -> f64 {
        match self {
            GlyphWidths::Simple {
                first_char,
                widths,
                missing,
            } => code
                .checked_sub(*first_char)
                .and_then(|i| widths.get(i as usize))
                .copied()
                .unwrap_or(*missing),
            GlyphWidths::Cid { default, widths } => {
                widths.get(&code).copied().unwrap_or(*default)
            }
        }
    }
}

/// A font resource ready to decode shown strings.
#[derive(Debug, Clone)]
pub struct Font {
    /// Resource name used by `Tf` (e.g. `F1`).
    pub resource_name: String,
    /// `/BaseFont` without a subset prefix.
    pub base_name: String,
    scheme: CodeScheme,
    to_unicode: Option<CMap>,
    widths: GlyphWidths,
}

impl Font {
    /// Stand-in for a font missing from the page resources.
    pub fn fallback(resource_name: &str) -> Self {
        Self {
            resource_name: resource_name.to_string(),
            base_name: resource_name.to_string(),
            scheme: CodeScheme::Simple,
            to_unicode: None,
            widths: GlyphWidths::Simple {
                first_char: 0,
                widths: Vec::new(),
                missing: DEFAULT_SIMPLE_WIDTH,
            },
        }
    }

    /// Load a font from its dictionary.
    pub fn load(doc: &lopdf::Document, resource_name: &str, dict: &lopdf::Dictionary) -> Self {
        let base_name = dict
            .get(b"BaseFont")
            .ok()
            .and_then(|o| o.as_name().ok())
            .map(|n| strip_subset_prefix(&String::from_utf8_lossy(n)).to_string())
            .unwrap_or_else(|| resource_name.to_string());
        let to_unicode = extract_tounicode_cmap(doc, dict);

        let is_type0 = dict
            .get(b"Subtype")
            .ok()
            .and_then(|o| o.as_name().ok())
            .is_some_and(|n| n == b"Type0");

        let (scheme, widths) = if is_type0 {
            let scheme = type0_encoding_name(doc, dict)
                .and_then(|name| encoding_for_cmap(&name))
                .map_or(CodeScheme::Identity, CodeScheme::Predefined);
            (scheme, cid_widths(doc, dict))
        } else {
            (CodeScheme::Simple, simple_widths(doc, dict))
        };

        Self {
            resource_name: resource_name.to_string(),
            base_name,
            scheme,
            to_unicode,
            widths,
        }
    }

    pub fn is_composite(&self) -> bool {
        self.scheme != CodeScheme::Simple
    }

    pub fn has_to_unicode(&self) -> bool {
        self.to_unicode.is_some()
    }

    /// Decode a shown string into glyphs.
    pub fn decode(&self, bytes: &[u8]) -> Vec<Glyph> {
        match self.scheme {
            CodeScheme::Simple => bytes
                .iter()
                .map(|&byte| {
                    let code = u32::from(byte);
                    let text = self.mapped_text(code).unwrap_or_else(|| {
                        let buf = [byte];
                        let (text, _) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(&buf);
                        text.into_owned()
                    });
                    Glyph {
                        code,
                        text,
                        width: self.widths.width(code),
                        is_word_space: byte == b' ',
                        mapped: true,
                    }
                })
                .collect(),
            CodeScheme::Identity => {
                let codes = match &self.to_unicode {
                    Some(cmap) => cmap.split_codes(bytes, 2),
                    None => bytes
                        .chunks(2)
                        .map(|chunk| (code_from_bytes(chunk), chunk.len()))
                        .collect(),
                };
                codes
                    .into_iter()
                    .map(|(code, len)| {
                        let text = self.mapped_text(code);
                        Glyph {
                            code,
                            mapped: text.is_some(),
                            text: text.unwrap_or_else(|| "\u{FFFD}".to_string()),
                            width: self.widths.width(code),
                            is_word_space: len == 1 && code == 32,
                        }
                    })
                    .collect()
            }
            CodeScheme::Predefined(encoding) => decode_cjk_string(bytes, encoding)
                .into_iter()
                .map(|decoded| {
                    let text = self
                        .mapped_text(decoded.char_code)
                        .unwrap_or(decoded.unicode);
                    Glyph {
                        code: decoded.char_code,
                        mapped: text != "\u{FFFD}",
                        text,
                        // CIDs of predefined CMaps are not resolved; every glyph gets /DW.
                        width: self.widths.width(u32::MAX),
                        is_word_space: decoded.byte_len == 1 && decoded.char_code == 32,
                    }
                })
                .collect(),
        }
    }

    fn mapped_text(&self, code: u32) -> Option<String> {
        self.to_unicode
            .as_ref()
            .and_then(|cmap| cmap.lookup(code))
            .map(str::to_string)
    }
}

/// Strip a subset tag such as `ABCDEF+` from a font name.
pub fn strip_subset_prefix(name: &str) -> &str {
    match name.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 && tag.bytes().all(|b| b.is_ascii_uppercase()) => rest,
        _ => name,
    }
}

fn extract_tounicode_cmap(doc: &lopdf::Document, dict: &lopdf::Dictionary) -> Option<CMap> {
    let obj = resolve_ref(doc, dict.get(b"ToUnicode").ok()?);
    let stream = obj.as_stream().ok()?;
    let data = decode_stream(stream).ok()?;
    CMap::parse(&data).ok()
}

/// Name of a Type0 font's `/Encoding`: a name, or the `/CMapName` of an embedded CMap.
fn type0_encoding_name(doc: &lopdf::Document, dict: &lopdf::Dictionary) -> Option<String> {
    let obj = resolve_ref(doc, dict.get(b"Encoding").ok()?);
    let name = match obj {
        lopdf::Object::Name(name) => name.as_slice(),
        lopdf::Object::Stream(stream) => stream.dict.get(b"CMapName").ok()?.as_name().ok()?,
        _ => return None,
    };
    Some(String::from_utf8_lossy(name).into_owned())
}

fn number_list(doc: &lopdf::Document, obj: &lopdf::Object) -> Vec<f64> {
    resolve_ref(doc, obj)
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|item| object_to_f64(resolve_ref(doc, item)).unwrap_or(0.0))
                .collect()
        })
        .unwrap_or_default()
}

fn simple_widths(doc: &lopdf::Document, dict: &lopdf::Dictionary) -> GlyphWidths {
    let widths = dict
        .get(b"Widths")
        .map(|obj| number_list(doc, obj))
        .unwrap_or_default();
    let first_char = dict
        .get(b"FirstChar")
        .ok()
        .and_then(|o| o.as_i64().ok())
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0);
    let missing = dict
        .get(b"FontDescriptor")
        .ok()
        .and_then(|o| resolve_ref(doc, o).as_dict().ok())
        .and_then(|fd| fd.get(b"MissingWidth").ok())
        .and_then(|o| object_to_f64(o).ok())
        .unwrap_or(if widths.is_empty() {
            DEFAULT_SIMPLE_WIDTH
        } else {
            0.0
        });
    GlyphWidths::Simple {
        first_char,
        widths,
        missing,
    }
}

fn descendant_font<'a>(
    doc: &'a lopdf::Document,
    dict: &'a lopdf::Dictionary,
) -> Option<&'a lopdf::Dictionary> {
    let descendants = resolve_ref(doc, dict.get(b"DescendantFonts").ok()?);
    let first = descendants.as_array().ok()?.first()?;
    resolve_ref(doc, first).as_dict().ok()
}

fn cid_widths(doc: &lopdf::Document, dict: &lopdf::Dictionary) -> GlyphWidths {
    let Some(cid_font) = descendant_font(doc, dict) else {
        return GlyphWidths::Cid {
            default: DEFAULT_CID_WIDTH,
            widths: HashMap::new(),
        };
    };
    let default = cid_font
        .get(b"DW")
        .ok()
        .and_then(|o| object_to_f64(resolve_ref(doc, o)).ok())
        .unwrap_or(DEFAULT_CID_WIDTH);
    let widths = cid_font
        .get(b"W")
        .ok()
        .and_then(|o| resolve_ref(doc, o).as_array().ok())
        .map(|items| parse_w_array(doc, items))
        .unwrap_or_default();
    GlyphWidths::Cid { default, widths }
}

/// Parse a CID `/W` array: `c [w1 w2 ...]` and `c_first c_last w` entries.
fn parse_w_array(doc: &lopdf::Document, items: &[lopdf::Object]) -> HashMap<u32, f64> {
    let mut widths = HashMap::new();
    let mut i = 0;
    while i < items.len() {
        let Some(first) = items[i].as_i64().ok().and_then(|n| u32::try_from(n).ok()) else {
            break;
        };
        match items.get(i + 1).map(|o| resolve_ref(doc, o)) {
            Some(lopdf::Object::Array(list)) => {
                for (offset, w) in list.iter().enumerate() {
                    if let Ok(w) = object_to_f64(w) {
                        widths.insert(first + offset as u32, w);
                    }
                }
                i += 2;
            }
            Some(last) => {
                let last = last.as_i64().ok().and_then(|n| u32::try_from(n).ok());
                let w = items.get(i + 2).and_then(|o| object_to_f64(o).ok());
                if let (Some(last), Some(w)) = (last, w) {
                    for cid in first..=last.min(first.saturating_add(0xFFFF)) {
                        widths.insert(cid, w);
                    }
                }
                i += 3;
            }
            None => break,
        }
    }
    widths
}
