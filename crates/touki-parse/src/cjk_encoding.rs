//! Predefined Japanese CMap encodings.
//!
//! Type0 fonts without a `/ToUnicode` stream may name a predefined CMap such
//! as `90ms-RKSJ-H` (Shift_JIS), `EUC-H` (EUC-JP) or `UniJIS-UCS2-H`
//! (UTF-16BE). Shown strings in those fonts are decoded with `encoding_rs`.

use encoding_rs::Encoding;

/// A decoded character from a CMap-encoded byte string.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedChar {
    /// The raw character code (the bytes of the character, big-endian).
    pub char_code: u32,
    /// The Unicode text of the character.
    pub unicode: String,
    /// Number of bytes consumed.
    pub byte_len: usize,
}

/// The `encoding_rs` encoding behind a predefined CMap name.
///
/// Returns `None` for Identity-H/V and unknown names.
pub fn encoding_for_cmap(cmap_name: &str) -> Option<&'static Encoding> {
    let base = cmap_name
        .strip_suffix("-H")
        .or_else(|| cmap_name.strip_suffix("-V"))
        .unwrap_or(cmap_name);

    match base {
        "90ms-RKSJ" | "90msp-RKSJ" | "90pv-RKSJ" | "83pv-RKSJ" | "78-RKSJ" | "Add-RKSJ"
        | "Ext-RKSJ" | "78ms-RKSJ" => Some(encoding_rs::SHIFT_JIS),
        "EUC" | "78-EUC" | "Hankaku" => Some(encoding_rs::EUC_JP),
        "UniJIS-UCS2" | "UniJIS-UCS2-HW" | "UniJIS-UTF16" | "UniJIS2004-UTF16" => {
            Some(encoding_rs::UTF_16BE)
        }
        "UniJIS-UTF8" | "UniJIS2004-UTF8" => Some(encoding_rs::UTF_8),
        _ => None,
    }
}

/// Byte length of the character starting at `bytes[0]`.
fn char_len(bytes: &[u8], encoding: &'static Encoding) -> usize {
    let lead = bytes[0];
    let len = if encoding == encoding_rs::SHIFT_JIS {
        if (0x81..=0x9F).contains(&lead) || (0xE0..=0xFC).contains(&lead) {
            2
        } else {
            1
        }
    } else if encoding == encoding_rs::EUC_JP {
        match lead {
            0x8F => 3,
            0x8E | 0xA1..=0xFE => 2,
            _ => 1,
        }
    } else if encoding == encoding_rs::UTF_16BE {
        match lead {
            0xD8..=0xDB => 4,
            _ => 2,
        }
    } else if encoding == encoding_rs::UTF_8 {
        match lead {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        }
    } else {
        1
    };
    len.min(bytes.len())
}

/// Decode a shown string character by character.
///
/// Bytes that do not form a valid character decode to U+FFFD.
pub fn decode_cjk_string(bytes: &[u8], encoding: &'static Encoding) -> Vec<DecodedChar> {
    let mut result = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let byte_len = char_len(&bytes[i..], encoding);
        let char_bytes = &bytes[i..i + byte_len];
        let (unicode, _) = encoding.decode_without_bom_handling(char_bytes);
        result.push(DecodedChar {
            char_code: crate::cmap::code_from_bytes(char_bytes),
            unicode: unicode.into_owned(),
            byte_len,
        });
        i += byte_len;
    }
    result
}
